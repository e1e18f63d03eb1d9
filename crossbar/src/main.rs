mod args;

use args::Args;
use clap::Parser;
use crossbar_config::Config;
use crossbar_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;

    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    crossbar_telemetry::init(config.telemetry.as_ref())?;

    tracing::info!(
        config_path = %args.config.display(),
        routers = config.routers.language.len(),
        "starting crossbar"
    );

    let server = Server::new(&config)?;

    // Graceful shutdown on SIGINT/SIGTERM
    let shutdown = CancellationToken::new();
    let shutdown_trigger = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_trigger.cancel();
    });

    server.serve(shutdown).await?;

    tracing::info!("crossbar stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
