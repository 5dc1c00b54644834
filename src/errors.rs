// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get at everything `error_chain!` creates.
use error_chain::*;

use crate::cells::Coordinate;

error_chain! {

    errors {
        InvalidConfiguration(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: both sides must be at least 3", width, height)
        }
        InvalidCellSize(cell_size: f32) {
            description("invalid cell size")
            display("invalid cell size {}: must be a positive finite number", cell_size)
        }
        MalformedGrid(reason: String) {
            description("malformed grid text")
            display("malformed grid text: {}", reason)
        }
        InvalidGoalCell(coord: Coordinate) {
            description("goal cell is not a floor cell")
            display("cannot place the goal at ({}, {}): not a floor cell", coord.x, coord.y)
        }
        NoFreeCell {
            description("no free floor cell")
            display("the maze has no free floor cell to place the goal on")
        }
    }
}
