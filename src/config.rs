use error_chain::bail;

use crate::errors::*;
use crate::units::{CellSize, Height, Width};

/// Size of the maze and of its cells in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MazeConfig {
    pub width: Width,
    pub height: Height,
    pub cell_size: CellSize,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            width: Width(10),
            height: Height(10),
            cell_size: CellSize(2.0),
        }
    }
}

impl MazeConfig {
    pub fn new(width: Width, height: Height, cell_size: CellSize) -> MazeConfig {
        MazeConfig { width, height, cell_size }
    }

    pub fn validate(&self) -> Result<()> {
        let (Width(w), Height(h), CellSize(size)) = (self.width, self.height, self.cell_size);
        if w < 3 || h < 3 {
            bail!(ErrorKind::InvalidConfiguration(w, h));
        }
        if !(size.is_finite() && size > 0.0) {
            bail!(ErrorKind::InvalidCellSize(size));
        }
        Ok(())
    }
}
