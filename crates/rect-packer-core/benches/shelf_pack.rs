use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use rect_packer_core::prelude::*;

fn generate_textures(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("tex_{}", i), w, h)
        })
        .collect()
}

fn bench_shelf_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("shelf_pack");

    for count in [100, 1000, 5000] {
        let textures = generate_textures(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (label, rotation) in [("upright", false), ("rotation", true)] {
            group.bench_with_input(BenchmarkId::new(label, count), &textures, |b, textures| {
                b.iter(|| {
                    let cfg = PackerConfig::builder()
                        .with_max_dimensions(4096, 16384)
                        .padding(1)
                        .allow_rotation(rotation)
                        .build();
                    let mut packer: RectanglePacker = RectanglePacker::with_config(cfg).unwrap();
                    for (key, w, h) in textures {
                        let _ = packer.add_image(key.clone(), *w, *h, ());
                    }
                    let _ = packer.pack();
                    black_box(packer.packed_size())
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_shelf_pack);
criterion_main!(benches);
