use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::sync::Arc;

mod application;
mod domain;
mod infrastructure;

use application::messaging::{extract_text, Dispatcher, EventProjector};
use domain::entities::InboundMessage;
use infrastructure::adapters::loopback::{FileSink, LoopbackSession};
use infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "spoofcraft")]
#[command(about = "Command-driven crafting of spoofed quoted replies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the command loop
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run(cli.config);
        }
        Commands::Version => {
            println!("spoofcraft v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(cli.config);
        }
    }
}

fn run(config_path: String) {
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };

    tracing::info!("Starting {}", config.bot.name);

    if config.session.adapter != "loopback" {
        tracing::warn!(
            "Unknown session adapter {:?}, falling back to loopback",
            config.session.adapter
        );
    }
    let session = Arc::new(LoopbackSession::new(config.session.message_id_prefix.clone()));
    let dispatcher = Dispatcher::new(Arc::clone(&session) as Arc<dyn domain::traits::MessagingSession>);
    let sink = Arc::new(FileSink::new(config.downloads.directory.clone()));
    let projector = EventProjector::new(Arc::clone(&session) as Arc<dyn domain::traits::MessagingSession>, sink);

    let rt = tokio::runtime::Runtime::new().unwrap();

    // One command per line; each command blocks until its send resolves.
    // The loopback session echoes sends back as inbound events; the most
    // recent one is what spoofed-reply-this operates on.
    let mut last_inbound: Option<InboundMessage> = None;
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        let report = rt.block_on(dispatcher.dispatch(line, last_inbound.as_ref()));
        println!("{}", report);

        while let Some(evt) = session.take_inbound() {
            tracing::info!(
                "Received message {} from {} at {}: {}",
                evt.id,
                evt.chat,
                evt.timestamp,
                extract_text(&evt)
            );
            if evt.attachment.is_some() {
                if let Err(e) = rt.block_on(projector.download_attachment("Message", &evt)) {
                    tracing::error!("Failed to save event file: {}", e);
                }
            }
            last_inbound = Some(evt);
        }
    }
}

fn init_config(path: String) {
    let config = Config::default();
    match config.save(&path) {
        Ok(()) => println!("Wrote default config to {}", path),
        Err(e) => tracing::error!("Failed to write config: {}", e),
    }
}
