mod http;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use kaska_api::KaskaSrv;

#[derive(Clone)]
pub(crate) struct AppState {
    srv: Arc<dyn KaskaSrv>,
    service_name: Arc<str>,
}

/// Router exposing `srv` under `/{service_name}/...`, plus
/// `GET /registry/{name}` so clients can check the name is bound.
pub fn router(srv: Arc<dyn KaskaSrv>, service_name: &str) -> Router {
    let state = AppState {
        srv,
        service_name: Arc::from(service_name),
    };

    let contract = Router::new()
        .route("/create_topics", post(http::handle_create_topics))
        .route("/topics", get(http::handle_topic_list))
        .route("/send", post(http::handle_send))
        .route("/get", post(http::handle_get))
        .route("/end_offsets", post(http::handle_end_offsets))
        .route("/poll", post(http::handle_poll))
        // payload size is unbounded; axum would cap bodies at 2 MiB
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/registry/{name}", get(http::handle_lookup))
        .nest(&format!("/{service_name}"), contract)
        .with_state(state)
}

/// Serve `srv` on an already bound listener until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    srv: Arc<dyn KaskaSrv>,
    service_name: &str,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let app = router(srv, service_name);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, service = %service_name, "kaska api listening");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
}
