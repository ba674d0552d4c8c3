//! Terminal demo: runs each search strategy over a small rail yard a few
//! expansions per tick, printing the search frontier as it grows.
//!
//! Run: cargo run --bin railnav

use std::collections::HashSet;

use railnav_core::Point;
use railnav_paths::{
    AStar, BreadthFirst, Budget, ConfigError, DepthFirst, Frontier, Grid, GridError, Projection,
    SearchEngine, SearchState,
};

const YARD: &str = "
    ..........#.........
    .########.#.######..
    .#......#.#......#..
    .#.####.#.####.#.#..
    .#.#..#.#....#.#.#..
    ...#..#.####.#.#....
    ####..#......#.####.
    ......######.#......
    .####........#####..
    ......55555.........
";

const START: Point = Point::new(0, 0);
const END: Point = Point::new(19, 9);
const EXPANSIONS_PER_TICK: u32 = 12;
const FRAME_EVERY: u32 = 4;
const CELL_SIZE: f32 = 3.0;

#[derive(Debug)]
enum DemoError {
    Grid(GridError),
    Config(ConfigError),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Grid(e) => write!(f, "bad yard map: {e}"),
            DemoError::Config(e) => write!(f, "bad search setup: {e}"),
        }
    }
}

impl From<GridError> for DemoError {
    fn from(e: GridError) -> Self {
        DemoError::Grid(e)
    }
}

impl From<ConfigError> for DemoError {
    fn from(e: ConfigError) -> Self {
        DemoError::Config(e)
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let grid = Grid::from_ascii(YARD)?;
    let strategies: [(&str, Box<dyn Frontier>); 3] = [
        ("breadth-first", Box::new(BreadthFirst::new())),
        ("depth-first", Box::new(DepthFirst::new())),
        ("A*", Box::new(AStar::new())),
    ];
    for (name, frontier) in strategies {
        println!("=== {name} ===");
        let mut search = SearchEngine::new(grid.clone(), frontier);
        search.on_search_finished(move |found| println!("{name}: {}", outcome(found)));
        search.start(START, END)?;
        drive(&mut search);
        report(&search);
    }
    Ok(())
}

fn outcome(found: bool) -> &'static str {
    if found { "route found" } else { "no route" }
}

/// Tick the search until it ends, printing a frame every few ticks.
fn drive<F: Frontier>(search: &mut SearchEngine<F>) {
    let mut tick = 0;
    while search.update(Budget::IterationBounded(EXPANSIONS_PER_TICK)) == SearchState::Running {
        tick += 1;
        if tick % FRAME_EVERY == 0 {
            println!("tick {tick}, {} pending", search.frontier().len());
            println!("{}", render(search));
        }
    }
    println!("{}", render(search));
}

fn report<F: Frontier>(search: &SearchEngine<F>) {
    let stats = search.stats();
    println!(
        "{:?} after {} expansions over {} ticks ({:?})",
        search.state(),
        stats.total_iterations,
        stats.update_calls,
        stats.total_time
    );
    let Some(mut path) = search.path_with(Projection::cell_centers(CELL_SIZE)) else {
        println!();
        return;
    };
    let cost: i32 = search
        .route()
        .unwrap_or_default()
        .iter()
        .filter_map(|&p| search.grid().at(p))
        .map(|c| c.cost)
        .sum();
    println!(
        "{} waypoints, length {:.1}, cost {cost}",
        path.len(),
        path.length()
    );
    let step = path.length() / 4.0;
    print!("  train at {}", path.position());
    while path.advance(step) {
        print!(" -> {}", path.position());
    }
    println!(" -> {}\n", path.position());
}

fn render<F: Frontier>(search: &SearchEngine<F>) -> String {
    let grid = search.grid();
    let route: HashSet<Point> = search.route().unwrap_or_default().iter().copied().collect();
    let pending: HashSet<Point> = search.snapshot().into_iter().collect();
    let mut out = String::with_capacity(grid.len() + grid.height() as usize);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            let Some(node) = search.node(p) else {
                continue;
            };
            let ch = if p == START {
                'S'
            } else if p == END {
                'E'
            } else if !node.navigable {
                '#'
            } else if route.contains(&p) {
                '='
            } else if pending.contains(&p) {
                '+'
            } else if node.visited {
                'o'
            } else if node.node_cost > 0 {
                char::from_digit(node.node_cost.clamp(0, 9) as u32, 10).unwrap_or('?')
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
