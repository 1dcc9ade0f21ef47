use rand::{Rng, SeedableRng, rngs::StdRng};
use rect_packer_core::prelude::*;

fn is_pow2(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

/// Placement rectangles including padding, as reserved by the packer.
fn reserved(p: &RectanglePacker<()>) -> Vec<Rect> {
    let pad = p.config().padding;
    p.iter_packed()
        .map(|img| {
            let f = img.frame();
            Rect::new(f.x, f.y, f.w + pad, f.h + pad)
        })
        .collect()
}

fn random_packer(seed: u64, cfg: PackerConfig) -> RectanglePacker<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut p = RectanglePacker::with_config(cfg).expect("config");
    let n = rng.gen_range(1..=60);
    for i in 0..n {
        let w = rng.gen_range(1..=48);
        let h = rng.gen_range(1..=48);
        p.add_image(format!("img_{i}"), w, h, ()).unwrap();
    }
    p
}

fn configs() -> Vec<PackerConfig> {
    let mut out = Vec::new();
    for padding in [0, 1, 3] {
        for rotation in [false, true] {
            for pow2 in [false, true] {
                out.push(
                    PackerConfig::builder()
                        .with_max_dimensions(256, 1024)
                        .padding(padding)
                        .allow_rotation(rotation)
                        .pow2(pow2)
                        .build(),
                );
            }
        }
    }
    out
}

#[test]
fn random_packs_are_disjoint_and_contained() {
    for (ci, cfg) in configs().into_iter().enumerate() {
        for seed in 0..20u64 {
            let mut p = random_packer(seed * 31 + ci as u64, cfg.clone());
            p.pack().expect("generous bounds should always fit");
            assert_eq!(p.iter_packed().count(), p.image_count());

            let rects = reserved(&p);
            let bounds = Rect::new(0, 0, p.packed_width(), p.packed_height());
            for (i, a) in rects.iter().enumerate() {
                assert!(bounds.contains(a), "{a:?} escapes {bounds:?}");
                assert!(a.x + a.w <= cfg.max_width);
                for b in &rects[i + 1..] {
                    assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                }
            }

            let e = p.efficiency();
            assert!((0.0..=1.0).contains(&e), "efficiency {e}");
        }
    }
}

#[test]
fn packing_is_deterministic() {
    for seed in 0..10u64 {
        let cfg = PackerConfig::builder()
            .with_max_dimensions(200, 2000)
            .padding(2)
            .build();
        let mut a = random_packer(seed, cfg.clone());
        let mut b = random_packer(seed, cfg);
        a.pack().unwrap();
        b.pack().unwrap();
        let pa: Vec<_> = a.iter_packed().map(|i| (i.name.to_owned(), i.placement())).collect();
        let pb: Vec<_> = b.iter_packed().map(|i| (i.name.to_owned(), i.placement())).collect();
        assert_eq!(pa, pb);

        // packing the same packer twice gives the same answer too
        a.pack().unwrap();
        let again: Vec<_> = a.iter_packed().map(|i| (i.name.to_owned(), i.placement())).collect();
        assert_eq!(pa, again);
    }
}

#[test]
fn pow2_rounds_each_dimension_up() {
    for seed in 0..15u64 {
        let plain_cfg = PackerConfig::builder()
            .with_max_dimensions(300, 1000)
            .padding(1)
            .build();
        let pow2_cfg = PackerConfig {
            power_of_two: true,
            ..plain_cfg.clone()
        };
        let mut plain = random_packer(seed, plain_cfg);
        let mut rounded = random_packer(seed, pow2_cfg);
        plain.pack().unwrap();
        rounded.pack().unwrap();
        assert!(is_pow2(rounded.packed_width()));
        assert!(is_pow2(rounded.packed_height()));
        assert!(rounded.packed_width() >= plain.packed_width());
        assert!(rounded.packed_height() >= plain.packed_height());
        assert!(rounded.packed_width() < plain.packed_width() * 2);
        assert!(rounded.packed_height() < plain.packed_height() * 2);
    }
}

#[test]
fn pow2_scenario_values() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(128, 256)
        .pow2(true)
        .build();
    let mut p: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
    p.add_image("A", 64, 32, ()).unwrap();
    p.add_image("B", 32, 32, ()).unwrap();
    p.add_image("C", 64, 64, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(p.packed_size(), (128, 128));
    assert_eq!(rect_packer_core::next_pow2(0), Some(1));
    assert_eq!(rect_packer_core::next_pow2(96), Some(128));
    assert_eq!(rect_packer_core::next_pow2(128), Some(128));
    assert_eq!(rect_packer_core::next_pow2(1 << 31), Some(1 << 31));
    assert_eq!(rect_packer_core::next_pow2((1 << 31) + 1), None);
}

#[test]
fn pow2_rounding_past_u32_fails_cleanly() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(3_000_000_000, 16)
        .pow2(true)
        .build();
    let mut p: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
    p.add_image("wide", 2_500_000_000, 1, ()).unwrap();
    assert!(matches!(
        p.pack(),
        Err(PackerError::SizeOverflow {
            width: 2_500_000_000,
            height: 1
        })
    ));
    assert!(!p.is_packed());
    assert_eq!(p.packed_size(), (0, 0));
    assert!(p.image_position("wide").is_none());
    assert_eq!(p.iter_packed().count(), 0);

    // the same layout packs once rounding is off
    p.set_power_of_two(false);
    p.pack().expect("fits without rounding");
    assert_eq!(p.packed_size(), (2_500_000_000, 1));
}

#[test]
fn efficiency_is_zero_until_packed() {
    let mut p: RectanglePacker = RectanglePacker::new();
    assert_eq!(p.efficiency(), 0.0);
    p.add_image("a", 10, 10, ()).unwrap();
    assert_eq!(p.efficiency(), 0.0);
    p.pack().unwrap();
    assert_eq!(p.efficiency(), 1.0);

    p.set_max_size(5, 5).unwrap();
    assert!(p.pack().is_err());
    assert_eq!(p.efficiency(), 0.0);
}

#[test]
fn efficiency_ignores_padding() {
    let cfg = PackerConfig::builder()
        .with_max_dimensions(64, 64)
        .padding(2)
        .build();
    let mut p: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
    p.add_image("a", 8, 8, ()).unwrap();
    p.pack().unwrap();
    assert_eq!(p.packed_size(), (10, 10));
    assert!((p.efficiency() - 0.64).abs() < 1e-9);
}

#[test]
fn huge_item_count_still_completes() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut p: RectanglePacker = RectanglePacker::new();
    p.set_max_size(4096, 16384).unwrap();
    for i in 0..2000 {
        let w = rng.gen_range(1..=32);
        let h = rng.gen_range(1..=32);
        p.add_image(format!("t{i}"), w, h, ()).unwrap();
    }
    p.pack().unwrap();
    let stats = p.stats();
    assert_eq!(stats.num_packed, 2000);
    assert!(stats.efficiency > 0.5, "{}", stats.summary());
}
