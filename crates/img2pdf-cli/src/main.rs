//! img2pdf CLI - Command line tool for combining images into one PDF.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use img2pdf_core::{
    AlphaHandling, AppConfig, DOWNLOAD_FILENAME, ImageConverter, UploadSet, UploadedFile,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlphaOption {
    Discard,
    Flatten,
}

impl From<AlphaOption> for AlphaHandling {
    fn from(opt: AlphaOption) -> Self {
        match opt {
            AlphaOption::Discard => Self::Discard,
            AlphaOption::Flatten => Self::Flatten,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "img2pdf")]
#[command(author, version, about = "Combine images into a single PDF, one page per image", long_about = None)]
struct Args {
    /// Input image files, in page order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF file
    #[arg(short, long, default_value = DOWNLOAD_FILENAME)]
    output: PathBuf,

    /// How to remove transparency (overrides config)
    #[arg(long, value_enum)]
    alpha: Option<AlphaOption>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_inputs(paths: &[PathBuf]) -> Result<UploadSet> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(UploadedFile::new(display_name(path), bytes))
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    if let Some(alpha) = args.alpha {
        config.conversion.alpha = alpha.into();
    }

    let uploads = read_inputs(&args.inputs)?;
    info!("Loaded {} images ({} bytes)", uploads.len(), uploads.total_bytes());

    let pb = ProgressBar::new(u64::try_from(uploads.len()).unwrap_or(u64::MAX));
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("decoding");

    let converter = ImageConverter::new(config.conversion);
    let progress = |done: usize, _total: usize| {
        pb.set_position(u64::try_from(done).unwrap_or(u64::MAX));
    };
    let document = converter
        .convert_with_progress(&uploads, Some(&progress))
        .context("Failed to convert images")?;

    pb.finish_with_message("done");

    std::fs::write(&args.output, &document.bytes)
        .with_context(|| format!("Failed to write output: {}", args.output.display()))?;

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "Saved {} pages to {}",
            document.page_count,
            args.output.display()
        );
    }

    Ok(())
}
