//! XedOut Relay
//!
//! Native messaging host that classifies posts for the XedOut extension.
//!
//! stdout carries length-prefixed replies to the browser, so all logging goes
//! to stderr.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use xedout_classifier::ClassifierClient;
use xedout_relay::{host, ConfigOverrides, Relay, RelayConfig};

#[derive(Parser, Debug)]
#[command(name = "xedout-relay")]
#[command(about = "XedOut native messaging moderation relay", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "xedout.yaml", env = "XEDOUT_CONFIG")]
    config: String,

    /// Chat-completion endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Requests processed concurrently
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Origin of the calling extension, passed by the browser
    #[arg(hide = true)]
    origin: Option<String>,

    /// Window handle passed by Chrome on Windows
    #[arg(long, hide = true)]
    parent_window: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!(
        origin = cli.origin.as_deref().unwrap_or("unknown"),
        "Starting XedOut relay"
    );

    let overrides = ConfigOverrides {
        endpoint: cli.endpoint.clone(),
        model: cli.model.clone(),
        max_in_flight: cli.max_in_flight,
    };
    let config = RelayConfig::load(&cli.config, &overrides)?;
    info!(
        endpoint = %config.classifier.endpoint,
        model = %config.classifier.model,
        max_images = config.classifier.max_images,
        "Configuration loaded"
    );

    let classifier = ClassifierClient::from_config(config.classifier.clone())?;
    let relay = Relay::new(classifier);

    let served = host::run(
        tokio::io::stdin(),
        tokio::io::stdout(),
        &relay,
        config.host_options(),
    )
    .await?;

    info!(served, "Relay shutdown complete");
    Ok(())
}

/// Initialize tracing/logging on stderr
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("xedout=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xedout=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
