use std::hint::black_box;
use std::time::Instant;

use glade_terrain::{NoiseField, TerrainBuilder, TerrainConfig};

fn bench_noise(octaves: u32, iterations: usize) {
    let field = NoiseField::new(octaves, 0.2, Some(42)).expect("valid noise field");

    let start = Instant::now();
    let mut acc = 0.0;
    for i in 0..iterations {
        acc += field.sample(black_box(i as f64 * 0.37), black_box(i as f64 * 0.11));
    }
    black_box(acc);
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  sample ({octaves} octaves, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_build(world_size: usize, decoration_chance: f64, iterations: usize) {
    let builder = TerrainBuilder::new(TerrainConfig {
        world_size,
        seed: Some(7),
        decoration_chance,
        ..TerrainConfig::default()
    })
    .expect("valid terrain config");

    let start = Instant::now();
    let mut directives = 0;
    for _ in 0..iterations {
        let build = builder.build().expect("build succeeds");
        directives = black_box(build.directives.len());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build ({world_size}x{world_size}, chance={decoration_chance}, {directives} directives, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Terrain Benchmarks ===\n");

    println!("Noise sampling:");
    bench_noise(1, 100_000);
    bench_noise(4, 100_000);
    bench_noise(8, 100_000);

    println!("\nWorld build:");
    bench_build(16, 0.03, 200);
    bench_build(64, 0.03, 20);
    bench_build(64, 0.3, 20);
    bench_build(128, 0.03, 5);

    println!("\n=== Done ===");
}
