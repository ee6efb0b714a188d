use clap::Parser;
use page_tiler::{page, tiling::Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[derive(Parser, Debug)]
#[command(name = "page-tiler")]
#[command(about = "Cut scanned document pages into square crops and image pyramids")]
#[command(version)]
pub struct Args {
    /// PDF or image file to read pages from
    #[arg(long, env = "TILER_INPUT")]
    pub input: PathBuf,

    /// Output path; with several images the index is inserted before the extension
    #[arg(long, env = "TILER_OUTPUT")]
    pub output: PathBuf,

    /// Rotate pages clockwise by this many degrees
    #[arg(long, env = "TILER_ROTATE", allow_negative_numbers = true)]
    pub rotate: Option<f32>,

    /// Convert pages to grayscale
    #[arg(long, env = "TILER_GRAYSCALE")]
    pub grayscale: bool,

    /// Side length of the sliding window
    #[arg(long, env = "TILER_WINDOW_SIZE", conflicts_with = "pyramid_sizes")]
    pub window_size: Option<u32>,

    /// Window stride (default: window size / step divisor)
    #[arg(long, env = "TILER_STEP", requires = "window_size")]
    pub step: Option<u32>,

    /// Comma separated window sizes for pyramid tiling, e.g. "200,300"
    #[arg(
        long,
        env = "TILER_PYRAMID_SIZES",
        value_delimiter = ',',
        requires = "target_size"
    )]
    pub pyramid_sizes: Vec<u32>,

    /// Side length every output image is resized to
    #[arg(long, env = "TILER_TARGET_SIZE")]
    pub target_size: Option<u32>,

    /// Resampling method (nearest, bilinear, bicubic, lanczos)
    #[arg(long, env = "TILER_RESAMPLING", default_value = "nearest")]
    pub resampling: String,

    /// Window size is divided by this to get the default step
    #[arg(long, env = "TILER_STEP_DIVISOR", default_value = "10")]
    pub step_divisor: u32,

    /// Print a JSON report of the run to stdout
    #[arg(long, env = "TILER_REPORT")]
    pub report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Validate everything before touching the input
    let config = config::Config::try_from(args)?;

    tracing::info!("Starting page-tiler v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Stages: {:?}", config.stages);

    // Crops are always numbered, even when only one window fits
    let tiled = config.stages.iter().any(|stage| stage.is_tiling());

    let pages = page::load(&config.input)?;
    let result = Pipeline::new(config.stages).process(pages)?;

    match result.images.as_slice() {
        [] => tracing::warn!("Nothing to save: pipeline produced no images"),
        [single] if !tiled => page::save(single, &config.output)?,
        images => {
            page::save_all(images, &config.output)?;
        }
    }

    if config.report {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
