use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bit_set::BitSet;
use fnv::FnvHashMap;
use log::{debug, trace};

use crate::cells::Coordinate;
use crate::grid::Grid;

/// Cells from start to goal inclusive. Empty when the goal cannot be reached.
pub type Path = Vec<Coordinate>;

/// Shortest route search over a grid.
pub trait PathFinder {
    /// Find a path from `start` to `goal` moving only between cells accepted by
    /// `is_walkable`.
    ///
    /// Both end points are expected to be walkable; that is up to the caller to check.
    fn find_path<F>(&self, start: Coordinate, goal: Coordinate, grid: &Grid, is_walkable: F) -> Path
        where F: Fn(&Grid, Coordinate) -> bool;
}

/// Adapter so `Grid::is_walkable` can be handed straight to a `PathFinder`.
#[inline]
pub fn grid_walkable(grid: &Grid, coord: Coordinate) -> bool {
    grid.is_walkable(coord)
}

#[inline]
pub fn manhattan_distance(a: Coordinate, b: Coordinate) -> f32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f32
}

/// Number of steps along a path, None for the empty "no path" result.
pub fn path_length(path: &[Coordinate]) -> Option<usize> {
    if path.is_empty() {
        None
    } else {
        Some(path.len() - 1)
    }
}

type NodeId = usize;

#[derive(Debug, Clone)]
struct PathNode {
    position: Coordinate,
    g_cost: f32,
    h_cost: f32,
    parent: Option<NodeId>,
}

impl PathNode {
    #[inline]
    fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }
}

/// Open set entry. Ordered so the max-heap pops the lowest f, then the lowest h, then
/// the oldest node.
#[derive(Debug, Copy, Clone)]
struct OpenEntry {
    f_cost: f32,
    h_cost: f32,
    node: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_cost.total_cmp(&self.f_cost)
            .then_with(|| other.h_cost.total_cmp(&self.h_cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}
impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for OpenEntry {}

/// A* with a Manhattan distance heuristic over 4-connected moves.
#[derive(Debug, Copy, Clone, Default)]
pub struct AStar;

impl PathFinder for AStar {
    fn find_path<F>(&self, start: Coordinate, goal: Coordinate, grid: &Grid, is_walkable: F) -> Path
        where F: Fn(&Grid, Coordinate) -> bool
    {
        // Search nodes live in an arena; parents are arena ids, so the parent links
        // form a tree held by `nodes`.
        let mut nodes: Vec<PathNode> = Vec::new();
        let mut open = BinaryHeap::new();
        let mut open_ids: FnvHashMap<Coordinate, NodeId> = FnvHashMap::default();
        let mut closed = BitSet::with_capacity(grid.size());

        let start_node = PathNode {
            position: start,
            g_cost: 0.0,
            h_cost: manhattan_distance(start, goal),
            parent: None,
        };
        open.push(OpenEntry { f_cost: start_node.f_cost(), h_cost: start_node.h_cost, node: 0 });
        open_ids.insert(start, 0);
        nodes.push(start_node);

        while let Some(entry) = open.pop() {
            let current = entry.node;
            let position = nodes[current].position;

            // An entry left behind by a cheaper update of the same node.
            if entry.f_cost != nodes[current].f_cost() || open_ids.get(&position) != Some(&current) {
                continue;
            }

            if position == goal {
                trace!("a* reached {:?} after creating {} nodes", goal, nodes.len());
                return retrace_path(&nodes, current);
            }

            open_ids.remove(&position);
            if let Some(i) = grid.grid_coordinate_to_index(position) {
                closed.insert(i);
            }

            for &neighbour in grid.neighbours(position).iter() {
                let is_closed = grid.grid_coordinate_to_index(neighbour)
                    .map_or(true, |i| closed.contains(i));
                if is_closed || !is_walkable(grid, neighbour) {
                    continue;
                }

                let g_cost = nodes[current].g_cost + position.distance(neighbour);
                match open_ids.get(&neighbour) {
                    None => {
                        let id = nodes.len();
                        let node = PathNode {
                            position: neighbour,
                            g_cost,
                            h_cost: manhattan_distance(neighbour, goal),
                            parent: Some(current),
                        };
                        open.push(OpenEntry { f_cost: node.f_cost(), h_cost: node.h_cost, node: id });
                        open_ids.insert(neighbour, id);
                        nodes.push(node);
                    }
                    Some(&id) if g_cost < nodes[id].g_cost => {
                        let node = &mut nodes[id];
                        node.g_cost = g_cost;
                        node.parent = Some(current);
                        open.push(OpenEntry { f_cost: node.f_cost(), h_cost: node.h_cost, node: id });
                    }
                    Some(_) => {}
                }
            }
        }

        debug!("a* found no path from {:?} to {:?}", start, goal);
        Path::new()
    }
}

fn retrace_path(nodes: &[PathNode], end: NodeId) -> Path {
    let mut path = Path::new();
    let mut current = Some(end);
    while let Some(id) = current {
        path.push(nodes[id].position);
        current = nodes[id].parent;
    }
    path.reverse();
    path
}
