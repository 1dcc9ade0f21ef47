use rect_packer_core::Packer;
use rect_packer_core::packer::shelf::ShelfPacker;
use rect_packer_core::prelude::*;

fn packer(max_w: u32, max_h: u32) -> RectanglePacker<()> {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(max_w, max_h)
        .padding(0)
        .pow2(false)
        .build();
    RectanglePacker::with_config(cfg).expect("valid config")
}

#[test]
fn three_images_fill_two_shelves() {
    let mut p = packer(128, 256);
    p.add_image("A", 64, 32, ()).unwrap();
    p.add_image("B", 32, 32, ()).unwrap();
    p.add_image("C", 64, 64, ()).unwrap();
    p.pack().expect("pack");

    // C opens shelf 0, A joins it, B overflows the width and opens shelf 1.
    assert_eq!(
        p.image_position("C"),
        Some(Placement { x: 0, y: 0, rotated: false })
    );
    assert_eq!(
        p.image_position("A"),
        Some(Placement { x: 64, y: 0, rotated: false })
    );
    assert_eq!(
        p.image_position("B"),
        Some(Placement { x: 0, y: 64, rotated: false })
    );
    assert_eq!(p.packed_width(), 128);
    assert_eq!(p.packed_height(), 96);
}

#[test]
fn oversized_image_fails_and_leaves_packer_unpacked() {
    let mut p = packer(50, 50);
    p.add_image("X", 100, 100, ()).unwrap();
    let err = p.pack().expect_err("must not fit");
    match err {
        PackerError::DoesNotFit {
            name,
            width,
            height,
        } => {
            assert_eq!(name, "X");
            assert_eq!((width, height), (100, 100));
        }
        other => panic!("expected DoesNotFit, got {other:?}"),
    }
    assert!(!p.is_packed());
    assert_eq!(p.packed_size(), (0, 0));
    assert!(p.items().iter().all(|it| !it.packed));
}

#[test]
fn too_wide_image_fails_even_when_height_fits() {
    let mut p = packer(50, 500);
    p.add_image("wide", 80, 10, ()).unwrap();
    assert!(matches!(p.pack(), Err(PackerError::DoesNotFit { .. })));
}

#[test]
fn later_overflow_discards_earlier_placements() {
    let mut p = packer(64, 64);
    p.add_image("a", 64, 40, ()).unwrap();
    p.add_image("b", 64, 30, ()).unwrap();
    let err = p.pack().expect_err("second shelf overflows");
    assert!(matches!(err, PackerError::DoesNotFit { ref name, .. } if name == "b"));
    assert_eq!(p.image_position("a"), None);
    assert_eq!(p.iter_packed().count(), 0);
    assert_eq!(p.efficiency(), 0.0);
}

#[test]
fn missing_position_is_none_before_and_after_packing() {
    let mut p = packer(128, 128);
    p.add_image("a", 10, 10, ()).unwrap();
    assert_eq!(p.image_position("missing"), None);
    assert_eq!(p.image_position("a"), None);
    p.pack().unwrap();
    assert_eq!(p.image_position("missing"), None);
    assert!(p.image_position("a").is_some());
}

#[test]
fn empty_registry_fails_with_empty() {
    let mut p = packer(128, 128);
    assert!(matches!(p.pack(), Err(PackerError::Empty)));
    assert_eq!(p.packed_size(), (0, 0));
    assert!(!p.is_packed());
}

#[test]
fn shelves_do_not_grow_once_opened() {
    // The short item opens the first shelf only if it comes first; tall ones
    // are sorted ahead of it, so it rides on the tall shelf instead.
    let mut p = packer(100, 100);
    p.add_image("short", 10, 10, ()).unwrap();
    p.add_image("tall", 10, 50, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(
        p.image_position("tall"),
        Some(Placement { x: 0, y: 0, rotated: false })
    );
    assert_eq!(
        p.image_position("short"),
        Some(Placement { x: 10, y: 0, rotated: false })
    );
    assert_eq!(p.packed_size(), (20, 50));
}

#[test]
fn padding_spaces_items_and_extends_bounds() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(64, 64)
        .padding(2)
        .build();
    let mut p: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
    p.add_image("a", 10, 10, ()).unwrap();
    p.add_image("b", 10, 10, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(p.image_position("a").unwrap().x, 0);
    assert_eq!(p.image_position("b").unwrap().x, 12);
    assert_eq!(p.packed_size(), (24, 12));
}

#[test]
fn padding_counts_against_the_limit() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(64, 64)
        .padding(1)
        .build();
    let mut p: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
    p.add_image("full", 64, 10, ()).unwrap();
    assert!(matches!(p.pack(), Err(PackerError::DoesNotFit { .. })));
}

#[test]
fn unimplemented_methods_pack_like_shelf() {
    let mut shelf = packer(128, 256);
    let mut maxrects = packer(128, 256);
    let mut guillotine = packer(128, 256);
    maxrects.set_method(PackMethod::MaxRects);
    guillotine.set_method(PackMethod::Guillotine);
    for p in [&mut shelf, &mut maxrects, &mut guillotine] {
        p.add_image("A", 64, 32, ()).unwrap();
        p.add_image("B", 32, 32, ()).unwrap();
        p.add_image("C", 64, 64, ()).unwrap();
        p.pack().expect("pack");
    }
    for name in ["A", "B", "C"] {
        assert_eq!(shelf.image_position(name), maxrects.image_position(name));
        assert_eq!(shelf.image_position(name), guillotine.image_position(name));
    }
    assert_eq!(maxrects.config().method, PackMethod::MaxRects);
}

#[test]
fn repacking_recomputes_from_scratch() {
    let mut p = packer(128, 256);
    p.add_image("A", 64, 32, ()).unwrap();
    p.add_image("C", 64, 64, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(p.packed_size(), (128, 64));
    p.add_image("B", 32, 32, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(p.packed_size(), (128, 96));
    assert_eq!(p.image_position("B").unwrap().y, 64);
}

#[test]
fn shelf_packer_opens_rows_only_on_overflow() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(128, 256)
        .build();
    let mut shelves = ShelfPacker::new(&cfg);
    assert_eq!(shelves.shelf_count(), 0);

    assert_eq!(shelves.place(64, 64), Some(Placement { x: 0, y: 0, rotated: false }));
    assert_eq!(shelves.place(64, 32), Some(Placement { x: 64, y: 0, rotated: false }));
    assert_eq!(shelves.shelf_count(), 1);

    // row 0 is full, so the next item opens row 1 under it
    assert_eq!(shelves.place(32, 32), Some(Placement { x: 0, y: 64, rotated: false }));
    assert_eq!(shelves.shelf_count(), 2);

    // too tall for any row and for the space left below
    assert_eq!(shelves.place(10, 200), None);
    assert_eq!(shelves.shelf_count(), 2);
    assert_eq!(shelves.extent(), (128, 96));
}
