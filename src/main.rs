//! High Quality 3D Denoiser CLI
//!
//! Denoises raw planar YUV files, or synthetic noisy content when no
//! input is given.

use clap::Parser;
use hqdn3d::{
    analysis::PlaneStatistics,
    config::FileConfig,
    digest::{FrameHasher, HashAlgorithm},
    filter::Denoiser,
    metrics::{MetricsRegistry, MetricsSnapshot},
    video::{FrameSource, PixelFormat, RawYuvReader, RawYuvWriter, StreamLayout, SyntheticSource},
    Strengths,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "hqdn3d", version)]
#[command(about = "High quality spatio-temporal denoiser for raw planar YUV video")]
struct Cli {
    /// Raw planar YUV input file
    #[arg(short, long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many frames of noisy test content instead of reading input
    #[arg(long)]
    synthetic: Option<u64>,

    /// Seed for synthetic content
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Raw planar YUV output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Luma width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Luma height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Pixel format, e.g. yuv420p or yuv422p10
    #[arg(long)]
    pix_fmt: Option<PixelFormat>,

    /// Strengths as luma_spatial:chroma_spatial:luma_temporal:chroma_temporal
    #[arg(short, long)]
    strengths: Option<Strengths>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print a digest of every output frame
    #[arg(long)]
    hash: Option<HashAlgorithm>,

    /// Write Prometheus metrics to this file when done
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    info!("hqdn3d v{}", hqdn3d::VERSION);

    let config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let strengths = match cli.strengths {
        Some(strengths) => strengths,
        None => config.denoise.strengths()?,
    };
    let layout = resolve_layout(&cli, config.stream)?;
    let frame_limit = cli.frames.or(config.output.frame_limit);
    let hasher = cli.hash.or(config.output.hash).map(FrameHasher::new);
    let metrics_path = cli.metrics_out.clone().or(config.output.metrics_path.clone());

    let mut denoiser = Denoiser::new(&strengths)?;
    denoiser.configure(layout)?;
    info!(%strengths, %layout, "Denoising");

    let mut source: Box<dyn FrameSource> = match (&cli.input, cli.synthetic) {
        (Some(path), _) => Box::new(RawYuvReader::new(BufReader::new(File::open(path)?), layout)),
        (None, Some(frames)) => Box::new(SyntheticSource::new(layout, frames, cli.seed)),
        (None, None) => return Err("either --input or --synthetic is required".into()),
    };
    let mut sink = match &cli.output {
        Some(path) => Some(RawYuvWriter::new(BufWriter::new(File::create(path)?), layout)),
        None => None,
    };

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let metrics = MetricsRegistry::new()?;
    let mut last_luma = None;

    while running.load(Ordering::SeqCst) {
        if frame_limit.is_some_and(|limit| denoiser.frames_processed() >= limit) {
            break;
        }
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let output = denoiser.process(&frame)?;
        last_luma = PlaneStatistics::compare(frame.plane(0), output.plane(0));

        if let Some(hasher) = &hasher {
            println!("{} {}", output.sequence(), hasher.digest(&output));
        }
        if let Some(sink) = sink.as_mut() {
            sink.write_frame(&output)?;
        }
        metrics.update(&MetricsSnapshot::from_components(&denoiser, last_luma.as_ref()));
    }

    if !running.load(Ordering::SeqCst) {
        warn!("Interrupted, stopping after frame {}", denoiser.frames_processed());
    }
    if let Some(sink) = sink {
        sink.into_inner()?;
    }

    match &last_luma {
        Some(stats) => info!(
            frames = denoiser.frames_processed(),
            luma_mean_abs_change = stats.mean_abs_change,
            luma_psnr = stats.psnr,
            "Done"
        ),
        None => info!(frames = denoiser.frames_processed(), "Done"),
    }

    if let Some(path) = metrics_path {
        std::fs::write(&path, metrics.encode()?)?;
        info!("Metrics written to {}", path.display());
    }

    Ok(())
}

/// Command-line dimensions override the config file's stream section.
fn resolve_layout(
    cli: &Cli,
    stream: Option<StreamLayout>,
) -> Result<StreamLayout, Box<dyn std::error::Error>> {
    let width = cli.width.or(stream.map(|s| s.width));
    let height = cli.height.or(stream.map(|s| s.height));
    let format = cli
        .pix_fmt
        .or(stream.map(|s| s.format))
        .unwrap_or(PixelFormat::Yuv420p);

    match (width, height) {
        (Some(width), Some(height)) => {
            let layout = StreamLayout::new(width, height, format);
            layout.validate()?;
            Ok(layout)
        }
        _ => Err("frame dimensions required (--width and --height, or [stream] in config)".into()),
    }
}
