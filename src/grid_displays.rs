use std::fmt;

use fnv::FnvHashSet;

use crate::cells::{CellState, Coordinate};
use crate::grid::Grid;

pub trait GridDisplay {
    /// Render the contents of a grid cell as a single glyph, or None to show the cell
    /// itself.
    fn render_cell_body(&self, _: Coordinate) -> Option<char> {
        None
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Coordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Coordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> Option<char> {
        if self.on_path_coordinates.contains(&coord) {
            Some('*')
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Coordinate,
    end: Coordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: Coordinate, end: Coordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> Option<char> {
        if coord == self.start {
            Some('S')
        } else if coord == self.end {
            Some('E')
        } else {
            None
        }
    }
}

/// Stack of displays, the first one with something to say about a cell wins.
pub struct LayeredDisplay<'a> {
    layers: Vec<&'a dyn GridDisplay>,
}
impl<'a> LayeredDisplay<'a> {
    pub fn new(layers: Vec<&'a dyn GridDisplay>) -> LayeredDisplay<'a> {
        LayeredDisplay { layers }
    }
}
impl<'a> GridDisplay for LayeredDisplay<'a> {
    fn render_cell_body(&self, coord: Coordinate) -> Option<char> {
        self.layers.iter().filter_map(|layer| layer.render_cell_body(coord)).next()
    }
}

fn cell_glyph(state: CellState) -> char {
    match state {
        CellState::Wall => '#',
        CellState::Floor => '.',
        CellState::Goal => 'G',
    }
}

/// Text rendering of the grid, with the overlay drawn over walkable cells.
pub fn render(grid: &Grid, overlay: Option<&dyn GridDisplay>) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let coord = Coordinate::new(x as i32, y as i32);
            let state = grid.get(coord).unwrap_or(CellState::Wall);
            let glyph = if state.is_wall() {
                None
            } else {
                overlay.and_then(|o| o.render_cell_body(coord))
            };
            out.push(glyph.unwrap_or_else(|| cell_glyph(state)));
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(self, None))
    }
}
