use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use vibeboard::{config::BoardConfig, rest, storage::Storage, AppContext};

#[derive(Parser)]
#[command(
    name = "vibeboard",
    about = "VibeBoard — kanban task board with a scratch note",
    version
)]
struct Args {
    /// HTTP API port
    #[arg(long, env = "VIBEBOARD_PORT")]
    port: Option<u16>,

    /// Data directory for config and the SQLite database
    #[arg(long, env = "VIBEBOARD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VIBEBOARD_LOG")]
    log: Option<String>,

    /// Bind address (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "VIBEBOARD_BIND")]
    bind_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = BoardConfig::new(args.port, args.bind_address, args.data_dir, args.log);

    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .compact()
        .init();

    info!("vibeboard v{} starting", env!("CARGO_PKG_VERSION"));

    let storage = Storage::new(&config.data_dir).await?;
    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        storage: Arc::new(storage),
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}
