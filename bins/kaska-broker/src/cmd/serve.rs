use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use kaska_api::KaskaSrv;
use kaska_broker::LogStore;

use crate::config::Cli;
use crate::error::ServerError;

pub async fn run(cli: Cli) -> Result<(), ServerError> {
    tracing::info!("kaska-broker starting");

    // --- Config ---
    let config = cli.effective()?;
    tracing::info!(
        config = ?cli.config,
        bind = %config.bind_addr(),
        service = %config.service_name,
        "loaded config"
    );

    // --- Log store ---
    let store = LogStore::new();
    if !config.topics.is_empty() {
        let created = store.create_topics(config.topics.iter().cloned());
        tracing::info!(created, topics = ?config.topics, "created configured topics");
    }

    // --- Bind ---
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    // --- Serve until Ctrl+C ---
    let token = CancellationToken::new();
    let srv: Arc<dyn KaskaSrv> = Arc::new(store);
    let service_name = config.service_name.clone();
    let api_token = token.clone();
    let api = tokio::spawn(async move {
        kaska_api_server::serve(listener, srv, &service_name, api_token).await
    });

    tracing::info!("broker ready");

    serve_until(api, token, tokio::signal::ctrl_c()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for `signal` or for the server task to exit on its own. The server
/// is cancelled and joined before any signal error is returned.
async fn serve_until<F>(
    mut api: JoinHandle<std::io::Result<()>>,
    token: CancellationToken,
    signal: F,
) -> Result<(), ServerError>
where
    F: Future<Output = std::io::Result<()>>,
{
    let signal = tokio::select! {
        res = signal => res,
        res = &mut api => {
            // server stopped on its own (accept error)
            return join_api(res);
        }
    };
    match &signal {
        Ok(()) => tracing::info!("shutting down..."),
        Err(e) => tracing::warn!(error = %e, "ctrl-c listener failed, shutting down"),
    }

    token.cancel();
    join_api(api.await)?;
    signal.map_err(ServerError::Signal)
}

fn join_api(res: Result<std::io::Result<()>, JoinError>) -> Result<(), ServerError> {
    match res {
        Ok(res) => res.map_err(ServerError::Serve),
        Err(e) => Err(ServerError::Serve(std::io::Error::other(e))),
    }
}
