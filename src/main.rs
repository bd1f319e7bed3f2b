//! FlashAI binary
//!
//! `serve` (the default) starts the Axum server; `config` prints a template;
//! `study` runs a terminal session against a running server.

use clap::Parser;
use flashai::{
    cli::{Cli, Command, generate_config_template},
    client::{HttpGenerateApi, Orchestrator, study},
    config::Config,
    error::AppResult,
    handlers::{self, AppState},
    telemetry,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Config { output } => write_template(output)?,
        Command::Serve => serve(&cli.config).await?,
        Command::Study { file, server } => run_study(&cli.config, file, server).await?,
    }

    Ok(())
}

fn write_template(output: Option<String>) -> AppResult<()> {
    let template = generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(&path, template)?;
            eprintln!("Wrote configuration template to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}

async fn serve(config_path: &str) -> AppResult<()> {
    let config = Config::from_file(config_path)?;
    telemetry::init(&config.observability.log_level);

    // Fails before binding if the provider credential is missing
    let state = AppState::new(config.clone()).inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start");
    })?;

    let addr = config.server.socket_addr()?;

    tracing::info!(
        model = %config.provider.model,
        timeout_ms = config.provider.timeout_ms,
        min_chars = config.limits.min_chars,
        max_chars = config.limits.max_chars,
        "Starting FlashAI server on {}",
        addr
    );
    tracing::info!("Generation endpoint available at http://{}/api/generate", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, handlers::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn run_study(config_path: &str, file: PathBuf, server: Option<String>) -> AppResult<()> {
    // The study client runs fine without a config file
    let config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        generate_config_template().parse::<Config>()?
    };
    telemetry::init("warn");

    let text = tokio::fs::read_to_string(&file).await?;
    let server_url = server.unwrap_or_else(|| config.client.server_url.clone());
    let api = HttpGenerateApi::new(&server_url)?;
    let mut orchestrator = Orchestrator::new(api, config.limits, &config.client);

    let mut stdout = tokio::io::stdout();
    study::run(&mut orchestrator, &text, tokio::io::stdin(), &mut stdout).await
}
