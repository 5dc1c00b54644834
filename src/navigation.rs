use error_chain::bail;
use glam::Vec3;
use itertools::Itertools;
use log::{debug, trace};

use crate::cells::Coordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::{grid_walkable, AStar, Path, PathFinder};
use crate::units::CellSize;

/// What the tracker remembers between calls.
#[derive(Debug, Clone, Default, PartialEq)]
struct NavigationState {
    path: Path,
    /// None means the next call always re-plans.
    last_agent_cell: Option<Coordinate>,
    last_waypoint: Vec3,
}

/// Reports where an agent should head next to reach the goal, re-planning only when the
/// agent has moved into a different grid cell (or the goal owner asked for it with
/// `reset_on_goal_moved`).
#[derive(Debug, Clone)]
pub struct NavigationTracker<P: PathFinder = AStar> {
    cell_size: f32,
    path_finder: P,
    state: NavigationState,
}

impl NavigationTracker<AStar> {
    pub fn new(cell_size: CellSize) -> Result<NavigationTracker<AStar>> {
        NavigationTracker::with_path_finder(cell_size, AStar)
    }
}

impl<P: PathFinder> NavigationTracker<P> {
    pub fn with_path_finder(cell_size: CellSize, path_finder: P) -> Result<NavigationTracker<P>> {
        let CellSize(size) = cell_size;
        if !(size.is_finite() && size > 0.0) {
            bail!(ErrorKind::InvalidCellSize(size));
        }
        Ok(NavigationTracker {
            cell_size: size,
            path_finder,
            state: NavigationState::default(),
        })
    }

    #[inline]
    pub fn path_finder(&self) -> &P {
        &self.path_finder
    }

    /// The path from the last re-plan. Empty if it found no route.
    #[inline]
    pub fn current_path(&self) -> &[Coordinate] {
        &self.state.path
    }

    #[inline]
    pub fn last_waypoint(&self) -> Vec3 {
        self.state.last_waypoint
    }

    /// World position to grid cell, rounding halfway cases to even.
    pub fn to_grid(&self, position: Vec3) -> Coordinate {
        Coordinate::new((position.x / self.cell_size).round_ties_even() as i32,
                        (position.z / self.cell_size).round_ties_even() as i32)
    }

    /// Centre of a grid cell on the ground plane.
    pub fn to_world(&self, coord: Coordinate) -> Vec3 {
        Vec3::new(coord.x as f32 * self.cell_size, 0.0, coord.y as f32 * self.cell_size)
    }

    /// Next waypoint for an agent at `agent` chasing the goal at `goal`.
    ///
    /// While the agent stays inside the same cell the previous answer is returned as is,
    /// even if the goal has moved in the meantime.
    pub fn advance(&mut self, agent: Vec3, goal: Vec3, grid: &Grid) -> Vec3 {
        let start = self.to_grid(agent);
        if self.state.last_agent_cell == Some(start) {
            trace!("agent still in {:?}, keeping waypoint {:?}", start, self.state.last_waypoint);
            return self.state.last_waypoint;
        }

        let goal_cell = self.to_grid(goal);
        self.state.last_agent_cell = Some(start);

        if !grid.is_walkable(start) || !grid.is_walkable(goal_cell) {
            debug!("agent {:?} or goal {:?} is not walkable, pointing at the goal", start, goal_cell);
            self.state.last_waypoint = self.to_world(goal_cell);
            return self.state.last_waypoint;
        }

        let path = self.path_finder.find_path(start, goal_cell, grid, grid_walkable);
        debug!("re-planned from {:?} to {:?}: {} cells", start, goal_cell, path.len());
        if path.is_empty() {
            self.state.path.clear();
        } else {
            self.state.path = path;
        }

        let next = self.next_path_point(start, goal_cell);
        self.state.last_waypoint = self.to_world(next);
        self.state.last_waypoint
    }

    /// Forget the agent's last cell so the next `advance` searches again.
    pub fn reset_on_goal_moved(&mut self) {
        self.state.last_agent_cell = None;
    }

    /// The point after the path point nearest to `agent_cell`. Going by the nearest point
    /// rather than an index copes with the agent being pushed off the path.
    fn next_path_point(&self, agent_cell: Coordinate, goal_cell: Coordinate) -> Coordinate {
        let path = &self.state.path;

        let closest = path.iter()
            .map(|point| agent_cell.distance(*point))
            .position_min_by(|a, b| a.total_cmp(b));

        match closest {
            Some(i) if i + 1 < path.len() => path[i + 1],
            Some(i) => path[i],
            None => goal_cell,
        }
    }
}

#[cfg(test)]
mod tests {

    use std::cell::Cell;

    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators;
    use crate::pathing::path_length;
    use crate::units::{Height, Width};

    fn gc(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[derive(Default)]
    struct CountingFinder {
        calls: Cell<usize>,
    }

    impl PathFinder for CountingFinder {
        fn find_path<F>(&self, start: Coordinate, goal: Coordinate, grid: &Grid, is_walkable: F) -> Path
            where F: Fn(&Grid, Coordinate) -> bool
        {
            self.calls.set(self.calls.get() + 1);
            AStar.find_path(start, goal, grid, is_walkable)
        }
    }

    fn counting_tracker() -> NavigationTracker<CountingFinder> {
        NavigationTracker::with_path_finder(CellSize(2.0), CountingFinder::default()).unwrap()
    }

    fn corridor() -> Grid {
        "
            #######
            #.....#
            #######
        ".parse().unwrap()
    }

    #[test]
    fn rejects_bad_cell_sizes() {
        for size in &[0.0, -1.0, std::f32::NAN, std::f32::INFINITY] {
            assert!(NavigationTracker::new(CellSize(*size)).is_err());
        }
        assert!(NavigationTracker::new(CellSize(0.5)).is_ok());
    }

    #[test]
    fn world_grid_conversion() {
        let t = NavigationTracker::new(CellSize(2.0)).unwrap();
        assert_eq!(t.to_grid(Vec3::new(4.0, 7.0, 6.0)), gc(2, 3));
        assert_eq!(t.to_grid(Vec3::new(4.9, 0.0, 5.1)), gc(2, 3));
        // Halfway cases round to even
        assert_eq!(t.to_grid(Vec3::new(1.0, 0.0, 3.0)), gc(0, 2));
        assert_eq!(t.to_grid(Vec3::new(5.0, 0.0, -1.0)), gc(2, 0));
        assert_eq!(t.to_grid(Vec3::new(-3.0, 0.0, 0.0)), gc(-2, 0));
        assert_eq!(t.to_world(gc(2, 3)), Vec3::new(4.0, 0.0, 6.0));
    }

    #[test]
    fn same_cell_reuses_the_cached_waypoint() {
        let g = corridor();
        let mut t = counting_tracker();
        let goal = t.to_world(gc(5, 1));

        let first = t.advance(Vec3::new(2.0, 0.0, 2.0), goal, &g);
        let second = t.advance(Vec3::new(2.6, 1.0, 1.5), goal, &g);
        assert_eq!(first, t.to_world(gc(2, 1)));
        assert_eq!(first, second);
        assert_eq!(t.path_finder().calls.get(), 1);

        // A new cell searches again
        let third = t.advance(t.to_world(gc(2, 1)), goal, &g);
        assert_eq!(third, t.to_world(gc(3, 1)));
        assert_eq!(t.path_finder().calls.get(), 2);
    }

    #[test]
    fn goal_moves_are_ignored_until_reset() {
        let g = corridor();
        let mut t = counting_tracker();
        let agent = t.to_world(gc(3, 1));

        let towards_right = t.advance(agent, t.to_world(gc(5, 1)), &g);
        assert_eq!(towards_right, t.to_world(gc(4, 1)));

        let stale = t.advance(agent, t.to_world(gc(1, 1)), &g);
        assert_eq!(stale, towards_right);
        assert_eq!(t.path_finder().calls.get(), 1);

        t.reset_on_goal_moved();
        let towards_left = t.advance(agent, t.to_world(gc(1, 1)), &g);
        assert_eq!(towards_left, t.to_world(gc(2, 1)));
        assert_eq!(t.path_finder().calls.get(), 2);
        assert_eq!(t.current_path(), &[gc(3, 1), gc(2, 1), gc(1, 1)][..]);
    }

    #[test]
    fn unwalkable_end_points_point_straight_at_the_goal() {
        let g = corridor();
        let mut t = counting_tracker();

        // Agent inside a wall
        let goal = Vec3::new(10.3, 0.0, 2.2);
        assert_eq!(t.advance(Vec3::new(0.0, 0.0, 0.0), goal, &g), t.to_world(gc(5, 1)));
        // Goal inside a wall
        let wall_goal = t.to_world(gc(6, 1));
        assert_eq!(t.advance(t.to_world(gc(1, 1)), wall_goal, &g), wall_goal);
        // Agent off the grid
        t.reset_on_goal_moved();
        assert_eq!(t.advance(Vec3::new(-40.0, 0.0, 2.0), goal, &g), t.to_world(gc(5, 1)));

        assert_eq!(t.path_finder().calls.get(), 0);
        assert_eq!(t.last_waypoint(), t.to_world(gc(5, 1)));
    }

    #[test]
    fn no_route_clears_the_cached_path() {
        let open = corridor();
        let blocked: Grid = "
            #######
            #..#..#
            #######
        ".parse().unwrap();
        let mut t = NavigationTracker::new(CellSize(1.0)).unwrap();
        let goal = t.to_world(gc(5, 1));

        t.advance(t.to_world(gc(1, 1)), goal, &open);
        assert_eq!(t.current_path().len(), 5);

        let waypoint = t.advance(t.to_world(gc(2, 1)), goal, &blocked);
        assert!(t.current_path().is_empty());
        assert_eq!(waypoint, goal);

        // With no route the waypoint is the goal itself, beyond the wall. Only the empty
        // path tells the two cases apart.
        let walled_off: Grid = "
            #####
            #.#.#
            #####
        ".parse().unwrap();
        let goal = t.to_world(gc(3, 1));
        let waypoint = t.advance(t.to_world(gc(1, 1)), goal, &walled_off);
        assert_eq!(waypoint, goal);
        assert!(t.current_path().is_empty());
    }

    #[test]
    fn arrival_keeps_pointing_at_the_goal() {
        let g = corridor();
        let mut t = NavigationTracker::new(CellSize(2.0)).unwrap();
        let goal = t.to_world(gc(4, 1));
        assert_eq!(t.advance(goal, goal, &g), goal);
        assert_eq!(t.current_path(), &[gc(4, 1)][..]);
    }

    #[test]
    fn closest_point_handles_an_agent_off_the_path() {
        let mut t = NavigationTracker::new(CellSize(1.0)).unwrap();
        t.state.path = vec![gc(1, 1), gc(2, 1), gc(3, 1)];
        assert_eq!(t.next_path_point(gc(2, 2), gc(3, 1)), gc(3, 1));
        assert_eq!(t.next_path_point(gc(1, 2), gc(3, 1)), gc(2, 1));
        assert_eq!(t.next_path_point(gc(3, 2), gc(3, 1)), gc(3, 1));
        t.state.path.clear();
        assert_eq!(t.next_path_point(gc(1, 2), gc(3, 1)), gc(3, 1));
    }

    #[test]
    fn walking_the_waypoints_reaches_the_goal() {
        let mut rng = XorShiftRng::seed_from_u64(10);
        let mut g = generators::prim_maze(Width(10), Height(10), &mut rng).unwrap();
        let start = g.entrance();

        // Use the reachable cell furthest from the entrance as the goal.
        let goal_cell = g.free_cells()
            .into_iter()
            .filter_map(|c| path_length(&AStar.find_path(start, c, &g, grid_walkable)).map(|len| (len, c)))
            .max()
            .map(|(_, c)| c)
            .unwrap();
        g.set_goal(goal_cell).unwrap();

        let mut t = NavigationTracker::new(CellSize(2.0)).unwrap();
        let goal = t.to_world(goal_cell);
        let mut agent = t.to_world(start);
        let remaining = |from: Coordinate| path_length(&AStar.find_path(from, goal_cell, &g, grid_walkable));

        let mut left = remaining(start).unwrap();
        assert!(left > 0);
        let mut steps = 0;
        while t.to_grid(agent) != goal_cell {
            agent = t.advance(agent, goal, &g);
            let now = remaining(t.to_grid(agent)).unwrap();
            assert!(now < left, "step {}: {} -> {}", steps, left, now);
            left = now;
            steps += 1;
            assert!(steps <= g.size());
        }
        assert_eq!(left, 0);
    }
}
