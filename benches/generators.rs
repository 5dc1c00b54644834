use criterion::{criterion_group, criterion_main, Criterion};
use mazenav::{
    generators,
    units::{Height, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_prim_maze_31(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(31);
    c.bench_function("prim_maze_31", move |b| {
        b.iter(|| generators::prim_maze(Width(31), Height(31), &mut rng))
    });
}

fn bench_prim_maze_101(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(101);
    c.bench_function("prim_maze_101", move |b| {
        b.iter(|| generators::prim_maze(Width(101), Height(101), &mut rng))
    });
}

criterion_group!(
    benches,
    bench_prim_maze_31,
    bench_prim_maze_101
);
criterion_main!(benches);
