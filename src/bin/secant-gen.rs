//! Secant program generator CLI

use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use constrained_secant::{
    generate_with, parse_rank, planner_for, Configuration, ConfigurationBuilder, ConstraintSet,
    Strategy, TensorShape,
};
use log::{info, warn};

#[derive(Parser)]
#[command(name = "secant-gen")]
#[command(about = "Generate Macaulay2 programs for graph-constrained secant varieties")]
#[command(version)]
struct Cli {
    /// Which construction to emit
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<Kind>,

    /// Coefficient field passed to the engine, e.g. ZZ/32003 or QQ
    #[arg(long)]
    field: Option<String>,

    /// Tensor dimensions, e.g. '3,3,3'
    #[arg(long)]
    shape: Option<TensorShape>,

    /// CP rank
    #[arg(long, value_parser = parse_rank, allow_hyphen_values = true)]
    rank: Option<usize>,

    /// Zeroed factor entries 'mode,row,col;...', e.g. '2,0,0;2,1,2'
    #[arg(long)]
    constraints: Option<ConstraintSet>,

    /// Minor size for slicing (default 3) or flattening (default rank + 1)
    #[arg(long)]
    minor_size: Option<usize>,

    /// Seed for the Terracini evaluation point (default: fresh entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration; command-line options override its fields
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file (default: stdout); parent directories are created
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write the Terracini identifiability report as JSON
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Flattening,
    Full,
    Slicing,
    Strassen,
    Terracini,
}

impl Kind {
    fn strategy(self) -> Strategy {
        match self {
            Kind::Flattening => Strategy::Flattening { minor_size: None },
            Kind::Full => Strategy::Full,
            Kind::Slicing => Strategy::Slicing {
                minor_size: constrained_secant::DEFAULT_SLICE_MINOR_SIZE,
            },
            Kind::Strassen => Strategy::Strassen,
            Kind::Terracini => Strategy::Terracini { seed: None },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Read `--config` if given, then apply the command-line overrides
fn configuration(cli: &Cli) -> Result<Configuration, Box<dyn std::error::Error>> {
    let base = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Some(serde_json::from_str::<Configuration>(&text)?)
        }
        None => None,
    };
    merge(cli, base)
}

/// Overlay the command-line options on a base configuration.
///
/// Every option given on the command line wins over the JSON value. `--type`
/// replaces the strategy with its defaults before `--minor-size` and `--seed`
/// are applied, so `--type slicing --minor-size 2` never inherits parameters
/// from a different strategy in the JSON. Without a base, `--type`, `--shape`
/// and `--rank` are required.
fn merge(
    cli: &Cli,
    base: Option<Configuration>,
) -> Result<Configuration, Box<dyn std::error::Error>> {
    let (mut builder, mut strategy) = match base {
        Some(config) => {
            let strategy = config.strategy();
            (ConfigurationBuilder::from(config), strategy)
        }
        None => match (cli.kind, &cli.shape, cli.rank) {
            (Some(kind), Some(_), Some(_)) => (Configuration::builder(), kind.strategy()),
            _ => return Err("--type, --shape and --rank are required without --config".into()),
        },
    };

    if let Some(kind) = cli.kind {
        strategy = kind.strategy();
    }
    if let Some(shape) = &cli.shape {
        builder = builder.with_tensor_shape(shape.clone());
    }
    if let Some(rank) = cli.rank {
        builder = builder.with_rank(rank);
    }
    if let Some(constraints) = &cli.constraints {
        builder = builder.with_constraints(constraints.clone());
    }
    if let Some(field) = &cli.field {
        builder = builder.with_field(field.clone());
    }
    if let Some(size) = cli.minor_size {
        strategy = strategy.with_minor_size(size);
    }
    if let Some(seed) = cli.seed {
        strategy = strategy.with_seed(seed);
    }

    Ok(builder.with_strategy(strategy).build()?)
}

/// Write output to file or stdout
fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            info!("compiled into {}", path.display());
        }
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = configuration(&cli)?;
    let mut planner = planner_for(config.strategy());
    let script = generate_with(&config, planner.as_mut());
    write_output(cli.out.as_deref(), script.as_str())?;

    match (planner.report(), &cli.report_json) {
        (Some(report), Some(path)) => {
            write_output(Some(path.as_path()), &serde_json::to_string_pretty(report)?)?;
        }
        (None, Some(_)) => {
            warn!("--report-json is only produced by the terracini strategy");
        }
        (Some(report), None) => {
            info!(
                "expected dimension {}, observed rank {}",
                report.expected_dimension,
                report
                    .observed_rank
                    .map_or_else(|| "left to the engine".to_string(), |r| r.to_string())
            );
        }
        (None, None) => {}
    }
    Ok(())
}
