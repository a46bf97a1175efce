//! quiz-solver server entrypoint
//!
//! Wires the adapters into the solve use case and serves the HTTP API.

mod cli;
mod error;
mod logging;
mod routes;
mod state;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::Cli;
use quiz_application::{LlmGateway, RunLogger, RunRegistry, SolveQuizUseCase};
use quiz_infrastructure::{
    ConfigLoader, FileConfig, GeminiLlmGateway, GeminiSettings, HttpAnswerSubmitter,
    JsonlRunLogger, PythonCodeRunner, Severity, discover_interpreter, select_scraper,
};
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Models printed by the startup check
const LISTED_MODELS: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .context("Failed to load configuration")?;

    let _log_guard = logging::init(
        cli.verbose,
        cli.log_json || config.logging.json,
        config.logging.file_dir.as_deref(),
    );

    info!(version = env!("CARGO_PKG_VERSION"), "Starting quiz-solver");
    check_config(&config)?;

    // === Dependency Injection ===
    let gateway = build_gateway(&config)?;
    log_available_models(gateway.as_ref()).await;

    let solver = build_solver(&config, gateway)?;
    let registry = Arc::new(RunRegistry::new(config.server.run_history));
    let state = AppState::new(solver, registry, config.server.max_concurrent_runs);
    let app = routes::build_router(state.clone());

    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!(address = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Log every config issue; refuse to start on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!(field = issue.field, "{}", issue.message),
            Severity::Warning => warn!(field = issue.field, "{}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

fn build_gateway(config: &FileConfig) -> Result<Arc<dyn LlmGateway>> {
    // Without a key the server still starts; every model call then fails
    // and the run reports why.
    let settings = config.llm.to_gemini_settings().unwrap_or_else(|| {
        GeminiSettings::new("")
            .with_base_url(config.llm.base_url.clone())
            .with_timeout(Duration::from_secs(config.llm.timeout_secs))
    });
    Ok(Arc::new(GeminiLlmGateway::new(settings)?))
}

fn build_solver(config: &FileConfig, gateway: Arc<dyn LlmGateway>) -> Result<SolveQuizUseCase> {
    let scraper = select_scraper(&config.browser.to_browser_settings())?;

    let interpreter = match config.executor.interpreter.clone().or_else(discover_interpreter) {
        Some(path) => path,
        None => {
            warn!("No Python interpreter found on PATH; every answer will be null");
            "python3".into()
        }
    };
    info!(interpreter = %interpreter.display(), "Using Python interpreter");
    let mut runner = PythonCodeRunner::new(interpreter)
        .with_timeout(Duration::from_secs(config.executor.timeout_secs));
    if let Some(dir) = &config.executor.working_dir {
        runner = runner.with_working_dir(dir);
    }

    let submitter =
        HttpAnswerSubmitter::new(Duration::from_secs(config.solver.submit_timeout_secs));
    let params = config.solver.to_solver_params(config.llm.parse_model());
    info!(model = %params.model, max_steps = params.max_steps, "Solver configured");

    let mut solver = SolveQuizUseCase::new(
        gateway,
        scraper,
        Arc::new(runner),
        Arc::new(submitter),
        params,
    );

    if let Some(path) = &config.logging.run_log {
        let logger = JsonlRunLogger::open(path)
            .with_context(|| format!("Failed to open run log {}", path.display()))?;
        info!(path = %logger.path().display(), "Writing run log");
        solver = solver.with_run_logger(Arc::new(logger) as Arc<dyn RunLogger>);
    }

    Ok(solver)
}

/// List the models the API key can use. Failure is not fatal.
async fn log_available_models(gateway: &dyn LlmGateway) {
    match gateway.available_models().await {
        Ok(models) => {
            let listed: Vec<_> = models.iter().take(LISTED_MODELS).collect();
            info!(total = models.len(), models = ?listed, "Available models");
        }
        Err(e) => warn!(error = %e, "Could not list models"),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
