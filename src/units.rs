#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

/// World units covered by one side of a grid cell.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct CellSize(pub f32);
