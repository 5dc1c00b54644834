use docopt::Docopt;
use log::{info, warn};
use mazenav::{
    config::MazeConfig,
    grid::Grid,
    grid_displays::{self, GridDisplay, LayeredDisplay, PathDisplay, StartEndPointsDisplay},
    pathing::{self, PathFinder},
    units::{CellSize, Height, Width},
    world::MazeWorld,
};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazenav

Usage:
    mazenav_driver -h | --help
    mazenav_driver [--width=<w> --height=<h> --cell-size=<s> --seed=<n>] [--show-path] [--walk=<steps>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --width=<w>            The maze width in cells [default: 10].
    --height=<h>           The maze height in cells [default: 10].
    --cell-size=<s>        World units covered by one cell [default: 2.0].
    --seed=<n>             Seed for maze generation and goal placement. Chosen at random if not given.
    --show-path            Show the A* path from the maze entrance to the goal.
    --walk=<steps>         Walk an agent from the entrance along the navigation waypoints for up to <steps> steps. The goal moves every time the agent reaches it.
    --save-edges=<path>    Serialize the maze passages to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_cell_size: f32,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_walk: Option<usize>,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazenav::errors::Error, ::mazenav::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("using seed {}", seed);

    let config = MazeConfig::new(Width(args.flag_width),
                                 Height(args.flag_height),
                                 CellSize(args.flag_cell_size));
    let mut world = MazeWorld::new(config, XorShiftRng::seed_from_u64(seed))?;
    info!("{:?}", world.config());

    if args.flag_show_path {
        print_with_path(world.grid());
    } else {
        println!("{}", world.grid());
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(world.grid(), &args.flag_save_edges)?;
    }

    if let Some(steps) = args.flag_walk {
        walk(&mut world, steps)?;
    }

    Ok(())
}

fn print_with_path(grid: &Grid) {
    let start = grid.entrance();
    let goal = match grid.goal() {
        Some(goal) => goal,
        None => {
            println!("{}", grid);
            return;
        }
    };

    let path = pathing::AStar.find_path(start, goal, grid, pathing::grid_walkable);
    if path.is_empty() {
        warn!("no path from the entrance {:?} to the goal {:?}", start, goal);
    }
    let path_display = PathDisplay::new(&path);
    let points = StartEndPointsDisplay::new(start, goal);
    let overlay = LayeredDisplay::new(vec![&points as &dyn GridDisplay, &path_display]);
    println!("{}", grid_displays::render(grid, Some(&overlay)));
    match pathing::path_length(&path) {
        Some(length) => println!("path length {}", length),
        None => println!("no path"),
    }
}

/// Step an agent straight onto each waypoint the tracker hands out.
fn walk<R: Rng>(world: &mut MazeWorld<R>, steps: usize) -> Result<()> {
    let mut agent = world.entrance_world_position();
    let mut goals_found = 0;

    for step in 1..=steps {
        let waypoint = world.waypoint(agent);
        let (here, next) = (world.tracker().to_grid(agent), world.tracker().to_grid(waypoint));
        info!("step {}: {:?} -> {:?}", step, here, next);

        // Without a route the tracker points straight at the goal, possibly through walls.
        if world.tracker().current_path().is_empty() {
            warn!("no route from {:?} to the goal {:?}, moving the goal", here, world.goal());
            world.relocate_goal()?;
            continue;
        }
        agent = waypoint;

        if world.agent_reached_goal(agent) {
            goals_found += 1;
            println!("step {}: reached the goal at {:?}", step, world.goal());
            world.relocate_goal()?;
        }
    }

    println!("walked {} steps, found the goal {} times", steps, goals_found);
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();

    let mut graph_data = String::new();
    graph_data.push_str(maze_grid.size().to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(graph.edge_count().to_string().as_ref());
    graph_data.push('\n');

    for edge in graph.raw_edges() {
        let (src, dst) = (graph[edge.source()], graph[edge.target()]);
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .ok_or("Passage graph should give valid coordinates")?;
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .ok_or("Passage graph should give valid coordinates")?;

        graph_data.push_str((index_a + 1).to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str((index_b + 1).to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
