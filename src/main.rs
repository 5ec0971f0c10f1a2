use wordquiz::config::Config;
use wordquiz::logging;
use wordquiz::state::AppState;
use wordquiz::supply::SupplyOutcome;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    let state = AppState::from_config(&config);
    let supply = state.supply();
    tracing::info!(
        provider = supply.provider_name(),
        difficulty = %supply.difficulty(),
        lookahead = config.lookahead,
        "word supply ready"
    );

    if supply.load_initial().await != SupplyOutcome::Updated {
        tracing::warn!("no initial word loaded, the quiz starts empty");
    }

    let app = wordquiz::create_app(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "wordquiz listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
