use error_chain::bail;
use log::debug;
use rand::Rng;

use crate::cells::{CellState, Coordinate, Direction};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// A frontier wall waiting to be knocked through: `wall` is adjacent to the already
/// carved `passage` cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct Edge {
    passage: Coordinate,
    wall: Coordinate,
}

impl Edge {
    fn new(passage: Coordinate, dir: Direction) -> Edge {
        Edge { passage, wall: passage.offset(dir) }
    }

    /// The cell one further step beyond the wall, away from the passage.
    fn opposite(&self) -> Coordinate {
        self.wall + (self.wall - self.passage)
    }
}

/// Apply the randomised Prim's maze generation algorithm to a fresh grid.
///
/// Carving starts at (1, 1). Each step picks a random frontier wall; if the cell beyond
/// it is still solid both are carved and the walls around that new cell join the
/// frontier. Passages therefore run between cells that are two apart, which leaves a
/// perfect maze inside the border.
/// Finally the entrance at (1, 0) and the exit at (width - 2, height - 1) are opened.
///
/// The grid has no goal cell yet.
pub fn prim_maze<R: Rng>(width: Width, height: Height, rng: &mut R) -> Result<Grid> {
    let (Width(w), Height(h)) = (width, height);
    if w < 3 || h < 3 {
        bail!(ErrorKind::InvalidConfiguration(w, h));
    }

    let mut grid = Grid::new(width, height);
    let (max_x, max_y) = (w as i32 - 2, h as i32 - 2);

    let start = Coordinate::new(1, 1);
    grid.set(start, CellState::Floor);

    let mut frontier = Vec::with_capacity(w * h / 2);
    if start.x > 1 {
        frontier.push(Edge::new(start, Direction::Left));
    }
    if start.x < max_x {
        frontier.push(Edge::new(start, Direction::Right));
    }
    if start.y > 1 {
        frontier.push(Edge::new(start, Direction::Down));
    }
    if start.y < max_y {
        frontier.push(Edge::new(start, Direction::Up));
    }

    let mut carved = 1;
    let mut consumed = 0;
    while !frontier.is_empty() {
        // `remove` rather than `swap_remove`: the frontier order is part of what a seed
        // reproduces.
        let edge = frontier.remove(rng.gen_range(0..frontier.len()));
        consumed += 1;

        let opposite = edge.opposite();
        if !grid.is_wall(opposite) {
            // Off the grid or already carved.
            continue;
        }

        grid.set(edge.wall, CellState::Floor);
        grid.set(opposite, CellState::Floor);
        carved += 2;

        let two_away = |dir: Direction| opposite.offset(dir).offset(dir);
        if opposite.x > 1 && grid.is_wall(two_away(Direction::Left)) {
            frontier.push(Edge::new(opposite, Direction::Left));
        }
        if opposite.x < max_x && grid.is_wall(two_away(Direction::Right)) {
            frontier.push(Edge::new(opposite, Direction::Right));
        }
        if opposite.y > 1 && grid.is_wall(two_away(Direction::Down)) {
            frontier.push(Edge::new(opposite, Direction::Down));
        }
        if opposite.y < max_y && grid.is_wall(two_away(Direction::Up)) {
            frontier.push(Edge::new(opposite, Direction::Up));
        }
    }

    let (entrance, exit) = (grid.entrance(), grid.exit());
    grid.set(entrance, CellState::Floor);
    grid.set(exit, CellState::Floor);

    debug!("prim maze {}x{}: carved {} cells from {} frontier edges", w, h, carved, consumed);
    Ok(grid)
}
