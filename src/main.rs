use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use palette_extract::config::{CloudinaryConfig, Configuration};
use palette_extract::{CloudinaryStore, PalettePipeline, PaletteRequest, PaletteResponse, RemoteScoreBackend};
use tracing::Level;

/// Extract a ranked color palette from an image using Cloudinary color scores.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image to analyse
    image: PathBuf,

    /// Configuration file (defaults to ./palette.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample quality, 1 (best) to 10 (fastest)
    #[arg(short, long)]
    quality: Option<i64>,

    /// Upper bound on distinct colors, 16 to 256
    #[arg(short, long)]
    max_color_count: Option<i64>,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let configuration = Configuration::load(args.config.as_deref())?;
    init_logging(configuration.log_level());

    let store = CloudinaryStore::new(CloudinaryConfig::from_env()?);
    let pipeline = PalettePipeline::builder()
        .backend(RemoteScoreBackend::new(store))
        .configuration(&configuration)
        .build()?;

    let image = fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let mut request = PaletteRequest::new(image);
    request.quality = args.quality;
    request.max_color_count = args.max_color_count;

    let (status, response) = pipeline.respond(request).await;
    println!("{}", response.to_json());
    if let PaletteResponse::Failure { error, .. } = response {
        anyhow::bail!("palette extraction failed with status {}: {}", status, error);
    }
    Ok(())
}
