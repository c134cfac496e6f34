use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser, ValueEnum};
use indicatif::ParallelProgressIterator;
use log::{error, info, warn, LevelFilter};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use starpaths::{
    config::SearchConfig,
    graphs::{distance_graph::DistanceGraph, generator::random_sector, VertexId},
    search::{
        alt::landmark_table::LandmarkTable,
        astar::{astar, AStarOutcome},
        dijkstra::dijkstra_one_to_all,
        DistanceHeuristic, TrivialHeuristic,
    },
    utility::{get_progressbar, round_to},
    Error,
};

/// Routes random queries over a generated sector with landmark-guided A* and
/// checks every answer against plain Dijkstra.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search config in json format. Flags given below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Hex columns of the sector
    #[arg(long)]
    width: Option<i32>,
    /// Hex rows of the sector
    #[arg(long)]
    height: Option<i32>,
    /// Longest jump in parsecs
    #[arg(long)]
    max_jump: Option<u32>,
    /// Seed of the sector generator
    #[arg(long)]
    sector_seed: Option<u64>,
    /// Landmarks per component
    #[arg(short, long)]
    slots: Option<usize>,
    /// Edge weight multiplier used for the landmark table
    #[arg(short, long)]
    divisor: Option<f64>,
    /// Number of queries
    #[arg(short = 'n', long)]
    queries: Option<usize>,
    /// Heuristic guiding A*
    #[arg(long, value_enum, default_value = "landmarks")]
    heuristic: Heuristic,
}

#[derive(Debug, ValueEnum, Clone)]
enum Heuristic {
    Landmarks,
    None,
}

struct QueryReport {
    found: bool,
    matches: bool,
    nodes_expanded: u64,
    nodes_queued: u64,
    branch_factor: f64,
}

#[derive(Serialize)]
struct Summary {
    config: SearchConfig,
    vertices: usize,
    edges: usize,
    landmarks: usize,
    table_build_ms: u128,
    queries_ms: u128,
    found: usize,
    mismatches: usize,
    avg_nodes_expanded: f64,
    avg_nodes_queued: f64,
    avg_branch_factor: f64,
}

fn main() -> ExitCode {
    if let Err(err) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logging: {}", err);
    }
    let args = Args::parse();

    match run(&args) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{}", json);
                if summary.mismatches > 0 {
                    warn!("{} queries disagree with dijkstra", summary.mismatches);
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("could not serialize summary: {}", err);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn read_config(args: &Args) -> Result<SearchConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => SearchConfig::default(),
    };

    if let Some(width) = args.width {
        config.sector.width = width;
    }
    if let Some(height) = args.height {
        config.sector.height = height;
    }
    if let Some(max_jump) = args.max_jump {
        config.sector.max_jump = max_jump;
    }
    if let Some(seed) = args.sector_seed {
        config.sector.seed = seed;
    }
    if let Some(slots) = args.slots {
        config.landmarks.slots = slots;
    }
    if let Some(divisor) = args.divisor {
        config.landmarks.divisor = divisor;
    }
    if let Some(queries) = args.queries {
        config.queries = queries;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<Summary, Box<dyn std::error::Error>> {
    let config = read_config(args)?;
    let sector = random_sector(&config.sector)?;
    let graph = &sector.graph;
    info!(
        "generated sector with {} systems and {} jumps",
        graph.number_of_vertices(),
        graph.number_of_edges()
    );
    if graph.number_of_vertices() == 0 {
        return Err("generated sector is empty".into());
    }

    let start = Instant::now();
    let (landmarks, table) = LandmarkTable::with_config(graph, &sector.positions, &config.landmarks)?;
    let table_build_ms = start.elapsed().as_millis();

    let heuristic: Box<dyn DistanceHeuristic> = match args.heuristic {
        Heuristic::Landmarks => Box::new(table),
        Heuristic::None => Box::new(TrivialHeuristic {
            number_of_vertices: graph.number_of_vertices(),
        }),
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    let number_of_vertices = graph.number_of_vertices() as VertexId;
    let requests: Vec<(VertexId, VertexId)> = (0..config.queries)
        .map(|_| {
            (
                rng.gen_range(0..number_of_vertices),
                rng.gen_range(0..number_of_vertices),
            )
        })
        .collect();

    let start = Instant::now();
    let reports = requests
        .par_iter()
        .progress_with(get_progressbar("Routing queries", requests.len() as u64))
        .map(|&(source, target)| route(graph, heuristic.as_ref(), source, target))
        .collect::<Result<Vec<_>, Error>>()?;
    let queries_ms = start.elapsed().as_millis();

    let found = reports.iter().filter(|report| report.found).count();
    let average = |value: fn(&QueryReport) -> f64| {
        let found_reports = reports.iter().filter(|report| report.found);
        round_to(found_reports.map(value).sum::<f64>() / found.max(1) as f64, 3)
    };

    Ok(Summary {
        vertices: graph.number_of_vertices(),
        edges: graph.number_of_edges(),
        landmarks: landmarks.vertices().len(),
        table_build_ms,
        queries_ms,
        found,
        mismatches: reports.iter().filter(|report| !report.matches).count(),
        avg_nodes_expanded: average(|report| report.nodes_expanded as f64),
        avg_nodes_queued: average(|report| report.nodes_queued as f64),
        avg_branch_factor: average(|report| report.branch_factor),
        config,
    })
}

fn route(
    graph: &DistanceGraph,
    heuristic: &dyn DistanceHeuristic,
    source: VertexId,
    target: VertexId,
) -> Result<QueryReport, Error> {
    let potentials = heuristic.lower_bounds(target)?;
    let expected = dijkstra_one_to_all(graph, source)?.get_distance(target);

    let report = match astar(graph, source, target, &potentials, None, None) {
        Ok(AStarOutcome::Found(result)) => QueryReport {
            found: true,
            matches: result.cost == expected,
            nodes_expanded: result.diagnostics.nodes_expanded,
            nodes_queued: result.diagnostics.nodes_queued,
            branch_factor: result.diagnostics.branch_factor,
        },
        Ok(AStarOutcome::BoundNotImproved(_)) | Err(Error::NoPath { .. }) => QueryReport {
            found: false,
            matches: expected.is_infinite(),
            nodes_expanded: 0,
            nodes_queued: 0,
            branch_factor: 1.0,
        },
        Err(err) => return Err(err),
    };
    Ok(report)
}
