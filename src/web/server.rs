//! Router construction and server lifecycle.

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers;
use crate::config::ServerConfig;
use crate::db::Database;

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://fonts.gstatic.com";

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Add the fixed security headers to every response.
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let index = config.static_dir.join("index.html");

    Router::new()
        .route("/api/board", get(handlers::get_board))
        .route("/api/tasks", post(handlers::create_task))
        .route("/api/tasks/{task_id}/move", post(handlers::move_task))
        .route("/api/health", get(handlers::health))
        .route_service("/", ServeFile::new(index))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind `config.host:config.port` and serve the board until shut down.
pub async fn start_server(
    db: Arc<Database>,
    config: &ServerConfig,
) -> anyhow::Result<ServerHandle> {
    let app = build_router(AppState::new(db), config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Board server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Board server shutting down");
            })
            .await
        {
            tracing::error!("Board server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = handlers::HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[test]
    fn invalid_origins_are_skipped() {
        // Must not panic on a header value with a newline.
        let _ = cors_layer(&["http://ok.example".to_string(), "bad\norigin".to_string()]);
    }
}
