use std::{env, io, sync::Arc};

use spotbook_core::SystemClock;
use spotbook_server::{build_router, cli, seed, shutdown_signal, AppState, DEFAULT_LOG_FILTER};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let state = AppState::new(args.state_config(), Arc::new(SystemClock));

    if args.seed {
        seed::load(&state)
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
    }

    let router = build_router(state);

    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
