use error_chain::bail;
use glam::Vec3;
use log::info;
use rand::Rng;

use crate::cells::Coordinate;
use crate::config::MazeConfig;
use crate::errors::*;
use crate::generators;
use crate::grid::Grid;
use crate::navigation::NavigationTracker;

/// A generated maze with a goal that can be moved about, and the tracker guiding an agent
/// to it.
#[derive(Debug)]
pub struct MazeWorld<R: Rng> {
    config: MazeConfig,
    grid: Grid,
    goal: Coordinate,
    tracker: NavigationTracker,
    rng: R,
}

impl<R: Rng> MazeWorld<R> {
    pub fn new(config: MazeConfig, mut rng: R) -> Result<MazeWorld<R>> {
        config.validate()?;
        let mut grid = generators::prim_maze(config.width, config.height, &mut rng)?;
        let goal = place_goal(&mut grid, &mut rng)?;
        let tracker = NavigationTracker::new(config.cell_size)?;
        info!("maze {}x{} ready, goal at {:?}", grid.width(), grid.height(), goal);

        Ok(MazeWorld { config, grid, goal, tracker, rng })
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn tracker(&self) -> &NavigationTracker {
        &self.tracker
    }

    #[inline]
    pub fn goal(&self) -> Coordinate {
        self.goal
    }

    pub fn goal_world_position(&self) -> Vec3 {
        self.tracker.to_world(self.goal)
    }

    pub fn entrance_world_position(&self) -> Vec3 {
        self.tracker.to_world(self.grid.entrance())
    }

    pub fn agent_reached_goal(&self, agent: Vec3) -> bool {
        self.tracker.to_grid(agent) == self.goal
    }

    /// Where an agent at `agent` should head next.
    pub fn waypoint(&mut self, agent: Vec3) -> Vec3 {
        let goal = self.goal_world_position();
        self.tracker.advance(agent, goal, &self.grid)
    }

    /// Send the goal to a random free cell and make the tracker re-plan.
    pub fn relocate_goal(&mut self) -> Result<Coordinate> {
        self.goal = place_goal(&mut self.grid, &mut self.rng)?;
        self.tracker.reset_on_goal_moved();
        info!("goal moved to {:?}", self.goal);
        Ok(self.goal)
    }
}

fn place_goal<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<Coordinate> {
    let free = grid.free_cells();
    if free.is_empty() {
        bail!(ErrorKind::NoFreeCell);
    }
    let goal = free[rng.gen_range(0..free.len())];
    grid.set_goal(goal)?;
    Ok(goal)
}
