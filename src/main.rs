//! cert-fetcher command line tool
//!
//! This binary is the command-line interface for cert-fetcher.

use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;
use tokio::io::BufReader;

use cert_fetcher::channel::{serve_json_lines, spawn_channel, MethodCallHandler};
use cert_fetcher::common::{init_logger, ConnectionTarget, FetchError, Result};
use cert_fetcher::config::{ConfigLoader, ConfigValidator, FetcherConfig, HexCase};
use cert_fetcher::{CertificateFetcher, APP_NAME, VERSION};

/// Fetch the leaf TLS certificate of a server as hex-encoded DER
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Load configuration from a JSON file
    #[clap(long, global = true)]
    config_file: Option<PathBuf>,

    /// Deadline for resolve + connect + handshake, in seconds
    #[clap(long, global = true)]
    timeout: Option<u64>,

    /// Print hex in uppercase
    #[clap(long, global = true)]
    uppercase: bool,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one certificate and print it on stdout
    Fetch {
        /// Host name or IP address
        host: String,
        /// TCP port
        port: u16,
    },
    /// Answer newline-delimited JSON method calls from stdin on stdout
    Stdio,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = FetcherConfig::load(args.config_file.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.uppercase {
        config.hex_case = HexCase::Upper;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    init_logger(&config.log_level);
    info!("Starting {} v{}", APP_NAME, VERSION);

    config.validate()?;
    for warning in config.check_warnings() {
        warn!("{}", warning);
    }

    match args.command {
        Command::Fetch { host, port } => fetch(&config, host, port).await,
        Command::Stdio => serve_stdio(&config).await,
    }
}

async fn fetch(config: &FetcherConfig, host: String, port: u16) -> Result<()> {
    let fetcher = CertificateFetcher::new(config)?;
    let target = ConnectionTarget::new(host, port)?;

    let record = fetcher.fetch_certificate(&target).await?;

    match record.subject() {
        Ok(subject) => info!("Certificate subject: {}", subject),
        Err(e) => warn!("Unable to get certificate subject: {}", e),
    }
    match record.sha256_fingerprint() {
        Ok(fingerprint) => info!("Certificate fingerprint: {}", fingerprint),
        Err(e) => warn!("Unable to get certificate fingerprint: {}", e),
    }

    println!("{}", record.to_hex(config.hex_case));
    Ok(())
}

async fn serve_stdio(config: &FetcherConfig) -> Result<()> {
    let fetcher = CertificateFetcher::new(config)?;
    let (handle, worker) = spawn_channel(MethodCallHandler::new(fetcher), config.queue_capacity);

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    info!("Reading method calls from stdin");
    serve_json_lines(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &handle,
        config.queue_capacity,
        interrupt,
    )
    .await?;

    handle.shutdown().await?;
    worker
        .await
        .map_err(|e| FetchError::Other(format!("Channel worker failed: {}", e)))?;

    info!("Done");
    Ok(())
}
