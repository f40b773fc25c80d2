use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use slide_notifier::config::CONFIG_FILE_NAME;
use slide_notifier::{HttpDispatcher, NotifierConfig, PageLocation, spawn_notifier};

#[derive(Parser)]
#[command(name = "slide-notifier")]
#[command(about = "Report presentation slide changes to a local listener")]
#[command(
    long_about = "Reads the page's URL fragment from stdin, one navigation per line, \
                  and reports every new #slide=... fragment to the slide listener."
)]
struct Args {
    /// Config file (defaults to ./slide-notifier.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_directive = if args.debug {
        "slide_notifier=debug"
    } else {
        "slide_notifier=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = NotifierConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    info!("Notifying {}", config.target.base_url());

    let dispatcher =
        HttpDispatcher::new(config.target.clone()).context("Failed to create dispatcher")?;

    let (location, observer) = PageLocation::new();
    let notifier = spawn_notifier(observer, dispatcher, &config);

    // Each stdin line is one navigation of the page.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown_signal = tokio::signal::ctrl_c();
    tokio::pin!(shutdown_signal);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        let fragment = line.trim();
                        if location.set_fragment(fragment) {
                            debug!("Navigated to {:?}", fragment);
                        }
                    }
                    None => {
                        info!("Input closed, shutting down");
                        break;
                    }
                }
            }
            _ = &mut shutdown_signal => {
                info!("Received shutdown signal, shutting down");
                break;
            }
        }
    }

    // Let the loop see the last navigation, then tear the page down.
    tokio::time::sleep(config.poll_interval).await;
    drop(location);
    notifier.await.context("Notifier task panicked")?;

    Ok(())
}
