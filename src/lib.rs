//! **mazenav** generates mazes, finds routes through them and steers an agent towards a
//! goal that does not stay put.

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod navigation;
pub mod pathing;
pub mod units;
pub mod world;
