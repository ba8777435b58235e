use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tilefind::io::{load_rgba_raster, load_tile_dir};
use tilefind::{BatchConfig, BatchLocator, ProgressEvent, ProgressObserver, SearchConfig};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Places puzzle tiles on a reference image (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SearchConfigJson {
    opacity_threshold: u8,
    color_tolerance: u32,
    coarse_step: usize,
    medium_step: usize,
    coarse_rate: f32,
    medium_rate: f32,
    parallel: bool,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            opacity_threshold: cfg.opacity_threshold,
            color_tolerance: cfg.color_tolerance,
            coarse_step: cfg.coarse_step,
            medium_step: cfg.medium_step,
            coarse_rate: cfg.coarse_rate,
            medium_rate: cfg.medium_rate,
            parallel: cfg.parallel,
        }
    }
}

impl From<SearchConfigJson> for SearchConfig {
    fn from(value: SearchConfigJson) -> Self {
        Self {
            opacity_threshold: value.opacity_threshold,
            color_tolerance: value.color_tolerance,
            coarse_step: value.coarse_step,
            medium_step: value.medium_step,
            coarse_rate: value.coarse_rate,
            medium_rate: value.medium_rate,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    base_path: String,
    tiles_dir: String,
    output_path: Option<String>,
    accept_threshold: f32,
    tile_deadline_ms: Option<u64>,
    search: SearchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            tiles_dir: String::new(),
            output_path: None,
            accept_threshold: BatchConfig::default().accept_threshold,
            tile_deadline_ms: None,
            search: SearchConfigJson::default(),
        }
    }
}

impl Config {
    fn batch_config(self) -> BatchConfig {
        BatchConfig {
            search: self.search.into(),
            accept_threshold: self.accept_threshold,
            tile_deadline: self.tile_deadline_ms.map(Duration::from_millis),
        }
    }
}

/// Progress bar fed by batch events.
struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressObserver for BarObserver {
    fn on_tile(&self, event: &ProgressEvent<'_>) {
        self.bar.set_message(format!("{}: {}", event.id, event.summary()));
        self.bar.inc(1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tilefind=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = std::fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.base_path.is_empty() || config.tiles_dir.is_empty() {
        return Err("base_path and tiles_dir must be set in the config".into());
    }

    let base = load_rgba_raster(&config.base_path)
        .map_err(|err| format!("failed to load base image {}: {err}", config.base_path))?;
    let tiles = load_tile_dir(&config.tiles_dir)?;
    let output_path = config.output_path.clone();
    let batch = BatchLocator::new(config.batch_config())?;

    let observer = BarObserver::new(tiles.len());
    let map = batch.run_with_observer(&base, tiles, &observer);
    observer.bar.finish_and_clear();

    match output_path {
        Some(path) => {
            map.write_to(&path)?;
            eprintln!("wrote {path}");
        }
        None => println!("{}", map.to_json_pretty()?),
    }

    let summary = map.summary();
    eprintln!(
        "{} tiles: {} placed, {} flagged",
        summary.total, summary.placed, summary.flagged
    );
    for id in map.flagged_ids() {
        eprintln!("  needs review: {id}");
    }

    Ok(())
}
