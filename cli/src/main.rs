//! Racing line CLI: inspect track files and optimize racing lines

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use racing_line::{fastest, RacingLinePlanner, RacingLineSolution, RunConfig, TrackCatalog};
use tracing::info;

#[derive(Parser)]
#[command(name = "racing-line", version, about = "Racing line optimization with Particle Swarm Optimization")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tracks of a track file
    Tracks {
        /// Track file (JSON)
        #[arg(long)]
        file: PathBuf,
    },
    /// Show the sectors of a track
    Sectors {
        #[arg(long)]
        file: PathBuf,

        /// Track name
        #[arg(long)]
        track: String,

        /// Number of sectors
        #[arg(long, default_value_t = 40)]
        sectors: usize,
    },
    /// Optimize the racing line of a track
    Optimize {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        track: String,

        /// Run configuration (YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Random seed; batch runs use consecutive seeds from here
        #[arg(long)]
        seed: Option<u64>,

        /// Number of independent runs
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        runs: u64,

        #[arg(long)]
        particles: Option<usize>,

        #[arg(long)]
        iterations: Option<usize>,

        #[arg(long)]
        sectors: Option<usize>,

        /// Show the progress banner and bar
        #[arg(long)]
        verbose: bool,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tracks { file } => run_tracks(&file, &cli.format),
        Commands::Sectors {
            file,
            track,
            sectors,
        } => run_sectors(&file, &track, sectors, &cli.format),
        Commands::Optimize {
            file,
            track,
            config,
            seed,
            runs,
            particles,
            iterations,
            sectors,
            verbose,
        } => {
            let overrides = Overrides {
                seed,
                particles,
                iterations,
                sectors,
                verbose,
            };
            run_optimize(&file, &track, config, overrides, runs, &cli.format)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Command-line values that take precedence over the config file.
struct Overrides {
    seed: Option<u64>,
    particles: Option<usize>,
    iterations: Option<usize>,
    sectors: Option<usize>,
    verbose: bool,
}

impl Overrides {
    fn apply(self, mut config: RunConfig) -> RunConfig {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(particles) = self.particles {
            config.n_particles = particles;
        }
        if let Some(iterations) = self.iterations {
            config.n_iterations = iterations;
        }
        if let Some(sectors) = self.sectors {
            config.n_sectors = sectors;
        }
        config.verbose |= self.verbose;
        config
    }
}

fn run_tracks(file: &Path, format: &OutputFormat) -> CliResult {
    let catalog = TrackCatalog::from_file(file)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        OutputFormat::Csv => {
            println!("name,points,width,length");
            for (name, track) in catalog.iter() {
                println!("{},{},{},{}", csv_field(name), track.layout.len(), track.width, track.length());
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Track", "Points", "Width", "Length"]);
            for (name, track) in catalog.iter() {
                table.add_row(vec![
                    name.to_string(),
                    track.layout.len().to_string(),
                    format!("{:.2}", track.width),
                    format!("{:.2}", track.length()),
                ]);
            }
            println!("{}", table);
            println!("{} track(s)", catalog.len());
        }
    }

    Ok(())
}

fn run_sectors(file: &Path, track_name: &str, n_sectors: usize, format: &OutputFormat) -> CliResult {
    let catalog = TrackCatalog::from_file(file)?;
    let track = catalog.get(track_name)?;
    let config = RunConfig {
        n_sectors,
        ..RunConfig::default()
    };
    let planner = RacingLinePlanner::new(track, config)?;
    let sectors = planner.sectors();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(sectors)?);
        }
        OutputFormat::Csv => {
            println!("sector,inside_x,inside_y,outside_x,outside_y,width");
            for i in 0..sectors.len() {
                let (a, b) = (sectors.inside[i], sectors.outside[i]);
                println!("{},{},{},{},{},{}", i, a.x, a.y, b.x, b.y, sectors.width(i));
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&["Sector", "Inside", "Outside", "Width"]);
            for i in 0..sectors.len() {
                table.add_row(vec![
                    i.to_string(),
                    sectors.inside[i].to_string(),
                    sectors.outside[i].to_string(),
                    format!("{:.3}", sectors.width(i)),
                ]);
            }
            println!("{}", table);
            println!("{} sector(s) on '{}'", sectors.len(), track_name);
        }
    }

    Ok(())
}

fn run_optimize(
    file: &Path,
    track_name: &str,
    config_path: Option<PathBuf>,
    overrides: Overrides,
    runs: u64,
    format: &OutputFormat,
) -> CliResult {
    let catalog = TrackCatalog::from_file(file)?;
    let track = catalog.get(track_name)?;

    let config = match config_path {
        Some(path) => RunConfig::from_yaml_file(path)?,
        None => RunConfig::default(),
    };
    let config = overrides.apply(config);

    let planner = RacingLinePlanner::new(track, config)?;
    let baseline = planner.baseline_lap_time()?;

    let solutions = if runs > 1 {
        let first = planner.config().seed.unwrap_or(0);
        let seeds: Vec<u64> = (0..runs).map(|k| first.wrapping_add(k)).collect();
        planner.plan_batch(&seeds)?
    } else {
        vec![planner.plan()?]
    };
    let best = fastest(&solutions).ok_or("no runs requested")?;

    info!(
        track = %track_name,
        runs = solutions.len(),
        lap_time = best.lap_time,
        baseline,
        "Optimization finished"
    );

    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "track": track_name,
                "baseline_lap_time": baseline,
                "best": best,
                "runs": solutions.iter().map(|s| serde_json::json!({
                    "seed": s.seed,
                    "lap_time": s.lap_time,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Csv => {
            println!("sector,offset,x,y");
            for (i, (offset, p)) in best.offsets.iter().zip(&best.racing_line).enumerate() {
                println!("{},{},{},{}", i, offset, p.x, p.y);
            }
        }
        OutputFormat::Table => print_solution_tables(track_name, baseline, best, &solutions),
    }

    Ok(())
}

fn print_solution_tables(track_name: &str, baseline: f64, best: &RacingLineSolution, solutions: &[RacingLineSolution]) {
    let mut summary = new_table(&["Run", "Seed", "Lap time (s)", "Elapsed (s)"]);
    for (i, s) in solutions.iter().enumerate() {
        summary.add_row(vec![
            i.to_string(),
            s.seed.map(|seed| seed.to_string()).unwrap_or_else(|| "-".to_string()),
            format!("{:.3}", s.lap_time),
            format!("{:.2}", s.elapsed.as_secs_f64()),
        ]);
    }
    println!("{}", summary);
    println!(
        "Best lap on '{}': {:.3} s (centerline {:.3} s)",
        track_name, best.lap_time, baseline
    );

    let mut offsets = new_table(&["Sector", "Offset", "Width", "Point"]);
    for (i, (offset, p)) in best.offsets.iter().zip(&best.racing_line).enumerate() {
        offsets.add_row(vec![
            i.to_string(),
            format!("{:.3}", offset),
            format!("{:.3}", best.sectors.width(i)),
            p.to_string(),
        ]);
    }
    println!("{}", offsets);

    let mut history = new_table(&["Iteration", "Lap time (s)"]);
    for (i, cost) in best.cost_history.iter().enumerate() {
        history.add_row(vec![i.to_string(), format!("{:.4}", cost)]);
    }
    println!("{}", history);
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("racing-line").chain(args.iter().copied()))
    }

    #[test]
    fn test_runs_must_be_positive() {
        let base = ["optimize", "--file", "tracks.json", "--track", "test_track"];

        let err = parse(&[&base[..], &["--runs", "0"][..]].concat()).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        match parse(&base).unwrap().command {
            Commands::Optimize { runs, .. } => assert_eq!(runs, 1),
            _ => panic!("expected optimize"),
        }
        match parse(&[&base[..], &["--runs", "4"][..]].concat()).unwrap().command {
            Commands::Optimize { runs, .. } => assert_eq!(runs, 4),
            _ => panic!("expected optimize"),
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = Overrides {
            seed: Some(9),
            particles: Some(12),
            iterations: None,
            sectors: Some(20),
            verbose: true,
        };
        let config = overrides.apply(RunConfig::default());

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.n_particles, 12);
        assert_eq!(config.n_iterations, 150);
        assert_eq!(config.n_sectors, 20);
        assert!(config.verbose);
    }
}
