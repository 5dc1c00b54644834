use std::str::FromStr;

use error_chain::bail;
use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};

use crate::cells::{CellState, Coordinate, CoordinateSmallVec, Direction};
use crate::errors::*;
use crate::units::{Height, Width};

pub type PassageGraph = Graph<Coordinate, (), Undirected>;

/// Occupancy grid of a maze. Cells are stored row major, `index = y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    goal: Option<Coordinate>,
}

impl Grid {
    /// A grid of the given size with every cell a wall.
    pub fn new(width: Width, height: Height) -> Grid {
        let (Width(w), Height(h)) = (width, height);
        Grid {
            width: w,
            height: h,
            cells: vec![CellState::Wall; w * h],
            goal: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as usize) < self.width &&
        (coord.y as usize) < self.height
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new((index % self.width) as i32, (index / self.width) as i32)
    }

    #[inline]
    pub fn get(&self, coord: Coordinate) -> Option<CellState> {
        self.grid_coordinate_to_index(coord).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns false if the coordinate is off the grid.
    ///
    /// Writing a `Goal` here bypasses the single goal bookkeeping, so that is left to
    /// `set_goal`.
    pub(crate) fn set(&mut self, coord: Coordinate, state: CellState) -> bool {
        debug_assert!(state != CellState::Goal);
        if let Some(i) = self.grid_coordinate_to_index(coord) {
            if self.goal == Some(coord) {
                self.goal = None;
            }
            self.cells[i] = state;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_wall(&self, coord: Coordinate) -> bool {
        self.get(coord).map_or(false, CellState::is_wall)
    }

    /// In bounds and not a wall.
    #[inline]
    pub fn is_walkable(&self, coord: Coordinate) -> bool {
        self.get(coord).map_or(false, |state| !state.is_wall())
    }

    /// Cells up, right, down and left of `coord` that lie on the grid, walls included.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        Direction::ALL.iter()
            .map(|dir| coord.offset(*dir))
            .filter(|neighbour| self.is_valid_coordinate(*neighbour))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.size()).map(move |index| self.index_to_grid_coordinate(index))
    }

    #[inline]
    pub fn goal(&self) -> Option<Coordinate> {
        self.goal
    }

    /// Mark `coord` as the single goal cell. The previous goal cell, if any, goes back
    /// to being floor.
    pub fn set_goal(&mut self, coord: Coordinate) -> Result<()> {
        match self.get(coord) {
            Some(CellState::Goal) => return Ok(()),
            Some(CellState::Floor) => {}
            _ => {
                bail!(ErrorKind::InvalidGoalCell(coord));
            }
        }

        if let Some(previous) = self.goal.take() {
            self.set(previous, CellState::Floor);
        }
        if let Some(i) = self.grid_coordinate_to_index(coord) {
            self.cells[i] = CellState::Goal;
        }
        self.goal = Some(coord);
        Ok(())
    }

    /// Every `Floor` cell in row major order. The goal cell is not free.
    pub fn free_cells(&self) -> Vec<Coordinate> {
        self.iter()
            .filter(|coord| self.get(*coord) == Some(CellState::Floor))
            .collect()
    }

    /// Opening forced on the bottom edge next to the generation start cell.
    #[inline]
    pub fn entrance(&self) -> Coordinate {
        Coordinate::new(1, 0)
    }

    /// Opening forced on the top edge next to the far corner.
    #[inline]
    pub fn exit(&self) -> Coordinate {
        Coordinate::new(self.width as i32 - 2, self.height as i32 - 1)
    }

    /// Undirected graph with a node per walkable cell and an edge between every pair of
    /// orthogonally adjacent walkable cells.
    pub fn passage_graph(&self) -> PassageGraph {
        let walkable = self.iter().filter(|c| self.is_walkable(*c)).count();
        let mut graph = PassageGraph::with_capacity(walkable, walkable + 1);
        let mut node_at: Vec<Option<NodeIndex>> = vec![None; self.size()];

        for coord in self.iter() {
            if self.is_walkable(coord) {
                let i = self.grid_coordinate_to_index(coord).expect("iter gives valid coordinates");
                node_at[i] = Some(graph.add_node(coord));
            }
        }

        for coord in self.iter() {
            let src = match self.grid_coordinate_to_index(coord).and_then(|i| node_at[i]) {
                Some(node) => node,
                None => continue,
            };
            // Only look forward so each adjacent pair is linked once.
            for dir in &[Direction::Right, Direction::Up] {
                let dst = self.grid_coordinate_to_index(coord.offset(*dir)).and_then(|i| node_at[i]);
                if let Some(dst) = dst {
                    graph.add_edge(src, dst, ());
                }
            }
        }
        graph
    }
}

/// Parses the text form written by `Display`: one line per row starting at `y = 0`,
/// `#` wall, `.` floor, `G` goal. Blank lines and surrounding whitespace are ignored.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(text: &str) -> Result<Grid> {
        let rows: Vec<&str> = text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            bail!(ErrorKind::MalformedGrid("no rows".to_string()));
        }

        let mut grid = Grid::new(Width(width), Height(height));
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!(ErrorKind::MalformedGrid(format!("row {} is not {} cells wide", y, width)));
            }
            for (x, glyph) in row.chars().enumerate() {
                let coord = Coordinate::new(x as i32, y as i32);
                match glyph {
                    '#' => {}
                    '.' => {
                        grid.set(coord, CellState::Floor);
                    }
                    'G' => {
                        if goal.is_some() {
                            bail!(ErrorKind::MalformedGrid("more than one goal cell".to_string()));
                        }
                        grid.set(coord, CellState::Floor);
                        goal = Some(coord);
                    }
                    other => {
                        bail!(ErrorKind::MalformedGrid(format!("unexpected {:?} at ({}, {})", other, x, y)));
                    }
                }
            }
        }

        if let Some(coord) = goal {
            grid.set_goal(coord)?;
        }
        Ok(grid)
    }
}
