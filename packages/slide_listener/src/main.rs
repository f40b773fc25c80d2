use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::prelude::*;

use slide_listener::{ListenerState, SlideMapping, serve};

#[derive(Parser)]
#[command(name = "slide-listener")]
#[command(about = "Receive slide-change notifications and track the current slide")]
struct Args {
    /// Port for the HTTP server
    #[arg(short, long, default_value = "8765")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'b', long, default_value = "127.0.0.1")]
    host: String,

    /// Slide object ids in presentation order (first is slide 1)
    #[arg(short, long, value_delimiter = ',')]
    slides: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_directive = if args.debug {
        "slide_listener=debug,tower_http=debug"
    } else {
        "slide_listener=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let mapping = SlideMapping::from_ordered_ids(args.slides);
    info!("Loaded {} slide ids", mapping.len());
    let state = ListenerState::new(mapping);

    let mut events = state.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("Now showing slide {} ({})", event.index, event.slide_id);
        }
    });

    let addr = format!("{}:{}", args.host, args.port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Slide listener listening on http://{}/slide-change",
        listener.local_addr()?
    );

    let shutdown_signal = async {
        // A failed handler install just means no graceful shutdown.
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
    };

    serve(listener, state, shutdown_signal).await?;
    Ok(())
}
