use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use glam::Vec3;
use mazenav::generators;
use mazenav::grid::Grid;
use mazenav::navigation::NavigationTracker;
use mazenav::pathing::{self, AStar, PathFinder};
use mazenav::units::{CellSize, Height, Width};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn large_maze() -> Grid {
    let mut rng = XorShiftRng::seed_from_u64(351);
    generators::prim_maze(Width(351), Height(351), &mut rng).unwrap()
}

fn bench_a_star_entrance_to_exit(c: &mut Criterion) {
    c.bench_function("a_star_entrance_to_exit", |b| {
        let g = large_maze();
        let (start, goal) = (g.entrance(), g.exit());
        b.iter(|| AStar.find_path(start, goal, &g, pathing::grid_walkable))
    });
}

fn bench_tracker_replan(c: &mut Criterion) {
    c.bench_function("tracker_replan", |b| {
        let g = large_maze();
        let mut tracker = NavigationTracker::new(CellSize(1.0)).unwrap();
        let agent = tracker.to_world(g.entrance());
        let goal = tracker.to_world(g.exit());
        b.iter(|| {
            tracker.reset_on_goal_moved();
            tracker.advance(agent, goal, &g)
        })
    });
}

fn bench_tracker_cached(c: &mut Criterion) {
    c.bench_function("tracker_cached", |b| {
        let g = large_maze();
        let mut tracker = NavigationTracker::new(CellSize(1.0)).unwrap();
        let agent = tracker.to_world(g.entrance());
        let goal = tracker.to_world(g.exit());
        tracker.advance(agent, goal, &g);
        b.iter(|| tracker.advance(agent + Vec3::new(0.1, 0.0, 0.1), goal, &g))
    });
}

criterion_group!(benches,
    bench_a_star_entrance_to_exit,
    bench_tracker_replan,
    bench_tracker_cached
);
criterion_main!(benches);
