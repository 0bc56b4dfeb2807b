//! img2pdf Web - Web server converting uploaded images into one PDF.

use anyhow::{Context, Result};
use clap::Parser;
use img2pdf_core::AppConfig;
use img2pdf_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "img2pdf-web")]
#[command(author, version, about = "Image to PDF converter web server", long_about = None)]
struct Args {
    /// Host to bind to (overrides config)
    #[arg(long, env = "IMG2PDF_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config)
    #[arg(short, long, env = "IMG2PDF_PORT")]
    port: Option<u16>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path).context("Failed to load config file")?,
        None => AppConfig::load(),
    };

    // Command line overrides config file
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.server.debug |= args.debug;
    config.validate().context("Invalid configuration")?;

    let default_level = match (args.verbose, config.server.debug) {
        (0, false) => "info",
        (0 | 1, _) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},tower_http={default_level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    info!(
        "Alpha handling: {}, upload limit: {} bytes",
        config.conversion.alpha, config.server.max_upload_bytes
    );

    let app = img2pdf_web::app(AppState::new(config));

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
