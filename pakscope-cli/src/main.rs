//! pakscope binary

use pakscope_cli::{Cli, Commands, WriterCommandSink};
use pakscope_core::Result;
use pakscope_ipc::{InspectorConfig, InspectorServer};
use pakscope_session::{ActionDispatcher, IncomingPacket, IngestQueue, ProxyRegistry, Session};
use pakscope_store::{NotificationChannel, PacketRecorder, PacketStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // stdout carries upstream commands, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!(error = %e, "pakscope failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Backends => {
            list_backends(&ProxyRegistry::with_builtin());
            Ok(())
        }
        Commands::Serve {
            bind,
            port,
            platform,
            ingest,
            icon_dir,
        } => {
            let config = InspectorConfig::new().with_bind_addr(bind).with_port(port);
            let dispatcher = ActionDispatcher::new().with_icon_dir(icon_dir);
            serve(config, dispatcher, platform, ingest).await
        }
    }
}

fn list_backends(registry: &ProxyRegistry) {
    println!("{:<10} {:<24} {:<6} {:<8} {:<4}", "NAME", "DESCRIPTION", "JSON", "MODIFY", "RAW");
    for backend in registry.list() {
        let name = if backend.is_default {
            format!("{}*", backend.shortname)
        } else {
            backend.shortname
        };
        println!(
            "{:<10} {:<24} {:<6} {:<8} {:<4}",
            name,
            backend.name,
            backend.capabilities.json_data,
            backend.capabilities.modify_packets,
            backend.capabilities.raw_data
        );
    }
}

async fn serve(
    config: InspectorConfig,
    dispatcher: ActionDispatcher,
    platform: Option<String>,
    ingest: bool,
) -> Result<()> {
    let recorder = PacketRecorder::new(PacketStore::new(), Arc::new(NotificationChannel::new()));
    let session = Arc::new(
        Session::new(Arc::new(ProxyRegistry::with_builtin()), recorder)
            .with_command_sink(Arc::new(WriterCommandSink::stdout()))
            .with_dispatcher(dispatcher),
    );

    if let Some(platform) = platform {
        session.start(&platform)?;
    }

    let server = InspectorServer::new(config, Arc::clone(&session));
    let listener = server.bind().await?;

    if ingest {
        let (queue, _consumer) = IngestQueue::spawn(Arc::clone(&session));
        tokio::spawn(read_stdin(queue));
    }

    tokio::select! {
        result = server.serve(listener) => result,
        _ = tokio::signal::ctrl_c() => {
            info!(status = %session.stats().format(), "Shutting down");
            Ok(())
        }
    }
}

/// Feed NDJSON packets from stdin into the ingest queue until EOF
async fn read_stdin(queue: IngestQueue) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match IncomingPacket::parse(&line) {
            Ok(packet) => {
                if let Err(e) = queue.push(packet) {
                    error!(error = %e, "Ingest queue closed");
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Skipping malformed upstream packet"),
        }
    }
    info!("Upstream input closed");
}
