//! pwassist-server: serves `POST /api/analyze-codegen`.
//!
//! Config: optional JSON file (`--config`), then env overrides:
//!   OPENAI_API_KEY, GEMINI_API_KEY: provider credentials (optional at startup)
//!   OPENAI_API_BASE_URL: alternate OpenAI-compatible endpoint
//!   PWASSIST_BIND_ADDR: listen address (default: 0.0.0.0:3000)

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pwassist_runtime::config_store::ConfigStore;
use pwassist_runtime::env::{apply_env_overrides, credentials_from_env, process_env};
use pwassist_runtime::runtime_engine::build_orchestrator_from_config;
use pwassist_server::router::build_router;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "pwassist-server", about = "Playwright codegen analysis / BDD generation API")]
struct Args {
    /// JSON config file; missing file means defaults.
    #[arg(long, env = "PWASSIST_CONFIG", default_value = "pwassist.json")]
    config: PathBuf,

    /// Listen address; overrides config and PWASSIST_BIND_ADDR.
    #[arg(long)]
    bind: Option<String>,

    /// Write the effective config (file, env and flags merged) to `--config` and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pwassist_server=debug,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let store = ConfigStore::at_path(&args.config);
    let mut cfg = apply_env_overrides(store.load_or_default()?, process_env);
    if let Some(bind) = args.bind {
        cfg.bind_addr = bind;
    }

    if args.write_config {
        store.save(&cfg)?;
        tracing::info!(path = %store.path().display(), "config written");
        return Ok(());
    }

    let orchestrator = build_orchestrator_from_config(&cfg, credentials_from_env(process_env))?;
    let app = build_router(orchestrator);

    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("bind {}", cfg.bind_addr))?;
    tracing::info!(
        addr = %cfg.bind_addr,
        openai_model = %cfg.openai.model,
        gemini_model = %cfg.gemini.model,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install ctrl-c handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
