use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trackline::driver::{FrameLoop, JsonLinesSource};
use trackline::{ArrivalCounter, Counting, SceneConfig};

/// Turns tracker output of one video into a log of line arrivals
#[derive(Parser, Debug)]
#[command(name = "trackline", version)]
struct Args {
    /// Tracker output of the video, one JSON frame per line
    input: PathBuf,

    /// Where to write the arrivals (JSON), defaults to `<input>_arrivals.json`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Y-coordinate of the arrival line (default: middle of the frame)
    #[arg(short = 'a', long)]
    arrival_line: Option<f32>,

    /// Minimum detection confidence (0.0-1.0) of tracks to count
    #[arg(short, long)]
    confidence: Option<f32>,

    /// Print every arrival as it happens
    #[arg(short, long)]
    show: bool,

    /// Treat a track id unseen for this many seconds as a new object
    #[arg(long)]
    max_idle: Option<f64>,

    /// JSON file with scene settings; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "trackline".to_string());

    input.with_file_name(format!("{}_arrivals.json", stem))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trackline=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    if args.arrival_line.is_some() {
        config.line_y = args.arrival_line;
    }
    if let Some(confidence) = args.confidence {
        config.min_confidence = confidence;
    }
    if args.max_idle.is_some() {
        config.max_idle_secs = args.max_idle;
    }

    let mut counter = ArrivalCounter::new(config)?;

    let mut source = JsonLinesSource::open(&args.input)
        .with_context(|| format!("could not open tracker output {}", args.input.display()))?;

    let src = args.input.display().to_string();
    info!("processing {}", src);

    let stats = FrameLoop::new(&src).run(&mut counter, &mut source, |record| {
        if args.show {
            println!("{}", record);
        }
    })?;

    info!(
        frames = stats.frames,
        malformed = stats.malformed_lines,
        malformed_tracks = stats.malformed_tracks,
        unconfirmed = stats.unconfirmed,
        low_confidence = stats.low_confidence,
        "processing complete"
    );

    if let Some(scene) = counter.scene(&src) {
        let s = scene.stats();
        info!(
            line_y = scene.line_y(),
            skipped = s.skipped,
            ignored = s.ignored,
            evicted = s.evicted,
            "scene"
        );
    }

    let arrivals = counter.arrivals(&src);
    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));

    let mut writer = BufWriter::new(
        File::create(&output).with_context(|| format!("could not create {}", output.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, &*arrivals)?;
    writer.flush()?;

    println!("Total arrivals detected: {}", arrivals.len());
    if arrivals.is_empty() {
        warn!("no arrivals detected, check the arrival line position");
    }

    if let Some(scene) = counter.scene(&src) {
        let summary = scene.log().summary();

        if !summary.is_empty() {
            println!("{}", "=".repeat(50));
            println!("SUMMARY STATISTICS");
            println!("{}", "=".repeat(50));

            for entry in summary {
                println!(
                    "{:20}: {:4} ({:5.1}%)",
                    entry.entity.as_str(),
                    entry.count,
                    entry.percentage
                );
            }

            println!("{}", "=".repeat(50));
        }
    }

    println!("Results saved to: {}", output.display());

    Ok(())
}
