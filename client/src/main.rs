mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use login_client::ClientConfig;
use std::process::ExitCode;
use tracing::info;

fn load_config(args: CliArgs) -> Result<ClientConfig> {
    let mut cfg = ClientConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;

    // Override with command line arguments
    args.apply_to(&mut cfg);

    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let cfg = match load_config(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error[config]: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = common::init_tracing(cfg.log_dir.as_deref(), &cfg.log_file, &cfg.log_level);

    info!("Starting login client with configuration: {:?}", cfg);

    match login_client::run_login(&cfg).await {
        Ok(outcome) => {
            println!("{}", outcome.response.render());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error[{}]: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
