//! ZoneLab CLI — run the zone engines and inspect their building blocks.
//!
//! Commands:
//! - `run` — run an engine over a bar file or a seeded synthetic walk
//! - `levels` — print the ladder or psychological boxes around a price
//! - `classify` — print the per-bar zone fact for a bar file
//! - `config` — print a default config as TOML

mod input;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zonelab_core::classifier::{classifier_for, ZoneClassifier};
use zonelab_core::config::{BoxConfig, EngineConfig, LadderConfig};
use zonelab_core::data::random_walk;
use zonelab_core::domain::Bar;
use zonelab_core::fingerprint::dataset_hash;
use zonelab_core::levels::psych::{first_multiple_down, first_multiple_up, nearest_multiple};
use zonelab_core::levels::process_levels;
use zonelab_core::{run, RunSummary};

#[derive(Parser)]
#[command(
    name = "zonelab",
    about = "ZoneLab CLI — level-ladder and psychological-box zone engines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    LevelLadder,
    PsychBox,
}

impl EngineKind {
    fn default_config(self) -> EngineConfig {
        match self {
            Self::LevelLadder => LadderConfig::default().into(),
            Self::PsychBox => BoxConfig::default().into(),
        }
    }

    fn matches(self, config: &EngineConfig) -> bool {
        matches!(
            (self, config),
            (Self::LevelLadder, EngineConfig::LevelLadder(_))
                | (Self::PsychBox, EngineConfig::PsychBox(_))
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run an engine bar by bar and report the result.
    Run {
        /// Bar file (.csv or .json).
        #[arg(long, conflicts_with = "synthetic")]
        bars: Option<PathBuf>,

        /// Generate this many synthetic bars instead of reading a file.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First open price for --synthetic.
        #[arg(long, default_value_t = 2000.0)]
        start_price: f64,

        /// Path to a TOML config file. Defaults to the engine's defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Engine to run when no config file is given.
        #[arg(long, value_enum)]
        engine: Option<EngineKind>,

        /// Print the full run output as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the levels around a price.
    Levels {
        #[arg(long)]
        price: f64,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum)]
        engine: Option<EngineKind>,
    },
    /// Classify every bar of a file, one zone fact per line.
    Classify {
        #[arg(long)]
        bars: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum)]
        engine: Option<EngineKind>,
    },
    /// Print the default config for an engine as TOML.
    Config {
        #[arg(long, value_enum, default_value = "level-ladder")]
        engine: EngineKind,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            bars,
            synthetic,
            seed,
            start_price,
            config,
            engine,
            json,
        } => run_engine_cmd(
            bars.as_deref(),
            synthetic,
            seed,
            start_price,
            config.as_deref(),
            engine,
            json,
        ),
        Commands::Levels {
            price,
            config,
            engine,
        } => run_levels_cmd(price, config.as_deref(), engine),
        Commands::Classify {
            bars,
            config,
            engine,
        } => run_classify_cmd(&bars, config.as_deref(), engine),
        Commands::Config { engine } => {
            print!("{}", engine.default_config().to_toml()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output stays clean. `RUST_LOG` overrides.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zonelab_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<&Path>, engine: Option<EngineKind>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let config = EngineConfig::from_file(path)
                .with_context(|| format!("load config {}", path.display()))?;
            if let Some(kind) = engine {
                if !kind.matches(&config) {
                    bail!(
                        "--engine disagrees with {} (engine = \"{}\")",
                        path.display(),
                        config.engine_name()
                    );
                }
            }
            config
        }
        None => engine.unwrap_or(EngineKind::LevelLadder).default_config(),
    };
    config.validate()?;
    Ok(config)
}

fn run_engine_cmd(
    bars_path: Option<&Path>,
    synthetic: Option<usize>,
    seed: u64,
    start_price: f64,
    config_path: Option<&Path>,
    engine: Option<EngineKind>,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path, engine)?;
    let bars: Vec<Bar> = match (bars_path, synthetic) {
        (Some(path), None) => input::load_bars(path)?,
        (None, Some(n)) => random_walk(n, seed, start_price),
        _ => bail!("pass exactly one of --bars or --synthetic"),
    };

    let data_hash = dataset_hash(&bars);
    info!(
        engine = config.engine_name(),
        bars = bars.len(),
        dataset = data_hash.short(12),
        "starting run"
    );
    let output = run(&bars, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", RunSummary::from_output(&output));
    println!("config:     {}", config.config_hash().short(16));
    println!("dataset:    {}", data_hash.short(16));
    println!("digest:     {}", output.digest().short(16));
    Ok(())
}

fn run_levels_cmd(
    price: f64,
    config_path: Option<&Path>,
    engine: Option<EngineKind>,
) -> Result<()> {
    match resolve_config(config_path, engine)? {
        EngineConfig::LevelLadder(c) => {
            let levels = process_levels(price, c.level_size(), c.n_levels);
            let half = c.entry_zone_half_width();
            for level in levels.up.iter().rev() {
                println!("up  {level:>14.5}  zone [{:.5}, {:.5}]", level - half, level + half);
            }
            println!("--  {price:>14.5}  price");
            for level in &levels.dn {
                println!("dn  {level:>14.5}  zone [{:.5}, {:.5}]", level - half, level + half);
            }
        }
        EngineConfig::PsychBox(c) => {
            let rows = [
                ("above", first_multiple_up(price, c.psych_step)),
                ("nearest", nearest_multiple(price, c.psych_step)),
                ("below", first_multiple_down(price, c.psych_step)),
            ];
            for (label, mid) in rows {
                println!(
                    "{label:<8} {mid:>14.5}  box [{:.5}, {:.5}]",
                    mid - c.box_step,
                    mid + c.box_step
                );
            }
        }
    }
    Ok(())
}

fn run_classify_cmd(
    bars_path: &Path,
    config_path: Option<&Path>,
    engine: Option<EngineKind>,
) -> Result<()> {
    let config = resolve_config(config_path, engine)?;
    let bars = input::load_bars(bars_path)?;
    let classifier = classifier_for(&config);

    for (index, bar) in bars.iter().enumerate() {
        if let Err(reason) = bar.validate() {
            bail!("bar {index}: {reason}");
        }
        let fact = classifier.classify(bar);
        println!("{index:>6}  {}", serde_json::to_string(&fact)?);
    }
    Ok(())
}
