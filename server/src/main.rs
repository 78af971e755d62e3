use anyhow::Result;
use clap::Parser;
use key_server::{AppState, ServerConfig, ServerKeys};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "key-server")]
#[command(about = "Development server for the public key and login endpoints", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "key-server.toml")]
    config: String,

    /// Listen address
    #[arg(long, env = "KEY_SERVER_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Private key PEM path
    #[arg(long, env = "KEY_SERVER_PRIVATE_KEY_PATH")]
    private_key_path: Option<String>,

    /// Serve plain HTTP instead of HTTPS
    #[arg(long, env = "KEY_SERVER_PLAIN_HTTP")]
    plain_http: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut cfg = ServerConfig::load_or_default(&args.config)?;

    // Override with command line arguments
    if let Some(listen_addr) = args.listen_addr {
        cfg.listen_addr = listen_addr;
    }
    if let Some(private_key_path) = args.private_key_path {
        cfg.private_key_path = private_key_path;
    }
    if args.plain_http {
        cfg.tls = false;
    }

    let _guard = common::init_tracing(cfg.log_dir.as_deref(), &cfg.log_file, &cfg.log_level);

    info!("Starting key server with configuration: {:?}", cfg);
    if cfg.accounts.is_empty() {
        info!("No accounts configured, every login will be rejected");
    }

    let keys = Arc::new(ServerKeys::load_or_generate(&cfg.private_key_path)?);
    let state = AppState::new(keys, cfg.accounts.clone());
    let cfg = Arc::new(cfg);

    let server = tokio::spawn(async move {
        if let Err(e) = key_server::start_server(cfg, state).await {
            error!("Key server error: {}", e);
        }
    });

    tokio::select! {
        _ = server => {
            error!("Key server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down key server");
    Ok(())
}
