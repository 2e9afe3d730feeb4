use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linecount::{Config, FrameReader, Pipeline};

/// Replays recorded person detections through the tracker and line counter.
#[derive(Parser, Debug)]
#[command(name = "linecount", version)]
struct Args {
    /// Recorded detections, one `<frame>: <json array>` line per frame
    #[arg(value_name = "DETECTIONS")]
    detections: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    line_y: Option<i32>,

    #[arg(long)]
    max_distance: Option<f32>,

    #[arg(long)]
    max_age: Option<u32>,

    #[arg(long)]
    hysteresis: Option<i32>,

    #[arg(long)]
    cooldown_frames: Option<u32>,

    #[arg(long)]
    max_missed_frames: Option<u32>,

    #[arg(long)]
    min_confidence: Option<f32>,

    /// Print every crossing event as a JSON line on stdout
    #[arg(long)]
    events: bool,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(v) = self.line_y {
            config.line_y = v;
        }
        if let Some(v) = self.max_distance {
            config.max_distance = v;
        }
        if let Some(v) = self.max_age {
            config.max_age = v;
        }
        if let Some(v) = self.hysteresis {
            config.hysteresis = v;
        }
        if let Some(v) = self.cooldown_frames {
            config.cooldown_frames = v;
        }
        if let Some(v) = self.max_missed_frames {
            config.max_missed_frames = v;
        }
        if let Some(v) = self.min_confidence {
            config.min_confidence = v;
        }

        config.validate().context("invalid configuration")?;

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linecount=info")),
        )
        .with_writer(io::stderr)
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let config = args.config()?;
    let mut pipeline = Pipeline::new(&config)?;

    let file = File::open(&args.detections)
        .with_context(|| format!("failed to open {}", args.detections.display()))?;

    info!("replaying detections from {}", args.detections.display());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut last_index = None;

    for frame in FrameReader::new(BufReader::new(file)) {
        let frame = frame.with_context(|| format!("reading {}", args.detections.display()))?;

        if let Some(prev) = last_index {
            if frame.index <= prev {
                warn!("frame {} recorded after frame {}", frame.index, prev);
            }
        }
        last_index = Some(frame.index);

        let report = pipeline.process(&frame.detections);

        if args.events {
            for event in &report.crossings {
                serde_json::to_writer(&mut out, event)?;
                writeln!(out)?;
            }
        }
    }

    let stats = pipeline.stats();
    info!(
        "processing finished: {} frames processed",
        pipeline.frames_processed()
    );
    info!(
        "final stats: entered={}, exited={}, total={}",
        stats.entered, stats.exited, stats.total
    );

    serde_json::to_writer(&mut out, &stats)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
