// src/main.rs

use axum::serve;
use fastuator::{
    cli::{Cli, Commands, ProbeKind},
    config, setup_configuration, AppError, FastuatorBuilder,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!(signal = "Ctrl+C", "Received signal. Initiating graceful shutdown...") },
        () = terminate => { info!(signal = "Terminate", "Received signal. Initiating graceful shutdown...") },
    }
}

fn init_tracing(cli: &Cli) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if cli.plain_logs {
        registry.with(fmt::layer()).init();
    } else {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true);
        registry.with(json_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    match cli.command.clone() {
        Some(Commands::Config { file }) => validate_config_file(file.or(cli.config)),
        Some(Commands::Check { details, probe }) => run_checks_once(&cli, details, probe).await,
        Some(Commands::Serve) | None => serve_app(cli).await,
    }
}

fn validate_config_file(path: Option<PathBuf>) -> Result<(), AppError> {
    let path = path.unwrap_or_else(|| PathBuf::from("config.yaml"));
    let loaded = config::load_config(&path)?;
    let rendered = serde_yaml::to_string(&loaded)?;
    println!("Configuration '{}' is valid:\n{}", path.display(), rendered);
    Ok(())
}

async fn run_checks_once(cli: &Cli, details: bool, probe: ProbeKind) -> Result<(), AppError> {
    let app_config = setup_configuration(cli.config.clone())?;
    let actuator = FastuatorBuilder::from_config(&app_config.actuator)
        .enable_metrics(false)
        .build()?;

    let body = match probe {
        ProbeKind::Health => serde_json::to_string_pretty(&actuator.probes().health(details).await)?,
        ProbeKind::Liveness => serde_json::to_string_pretty(&actuator.probes().liveness().await?)?,
        ProbeKind::Readiness => serde_json::to_string_pretty(&actuator.probes().readiness().await?)?,
    };
    println!("{body}");
    Ok(())
}

async fn serve_app(cli: Cli) -> Result<(), AppError> {
    let (app, mut config) = fastuator::run(cli.config.clone()).await.map_err(|e| {
        eprintln!("Application setup error: {e:?}");
        e
    })?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let ip = config.server.host.parse::<std::net::IpAddr>().map_err(|e| {
        AppError::config_validation(format!("Invalid server host '{}': {e}", config.server.host), Some("server.host"))
    })?;
    let addr = SocketAddr::new(ip, config.server.port);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!(server.address = %addr, error = ?e, "Failed to bind to address. Exiting.");
        AppError::from(e)
    })?;
    info!(server.address = %addr, prefix = %config.actuator.prefix, "Server listening");

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = ?e, "Server run loop encountered an error. Exiting.");
            AppError::from(e)
        })?;

    info!("Server shut down gracefully.");
    Ok(())
}
