//! HTTP server for the Prometheus metrics endpoint.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use pbx_common::source::PbxSource;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::collector::SharedCollector;
use crate::exposition::{self, CONTENT_TYPE};

/// Create the HTTP router.
pub fn create_router<S: PbxSource>(collector: SharedCollector<S>, metrics_path: &str) -> Router {
    Router::new()
        .route(metrics_path, get(metrics_handler::<S>))
        .route("/catalog", get(catalog_handler::<S>))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(collector)
}

/// Handler for the metrics endpoint. Every request is a fresh scrape.
async fn metrics_handler<S: PbxSource>(State(collector): State<SharedCollector<S>>) -> Response {
    let samples = collector.collect().await;
    let body = exposition::render(&samples);

    (StatusCode::OK, [("content-type", CONTENT_TYPE)], body).into_response()
}

/// Handler for the /catalog endpoint.
async fn catalog_handler<S: PbxSource>(State(collector): State<SharedCollector<S>>) -> Response {
    Json(collector.describe()).into_response()
}

/// Handler for the /health endpoint.
async fn health_handler() -> Response {
    (StatusCode::OK, "healthy\n").into_response()
}

/// HTTP server configuration.
pub struct HttpServer<S> {
    collector: SharedCollector<S>,
    listen_addr: SocketAddr,
    metrics_path: String,
}

impl<S: PbxSource> HttpServer<S> {
    /// Create a new HTTP server.
    pub fn new(
        collector: SharedCollector<S>,
        listen_addr: SocketAddr,
        metrics_path: String,
    ) -> Self {
        Self {
            collector,
            listen_addr,
            metrics_path,
        }
    }

    /// Run the HTTP server until the shutdown signal is received.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        info!(addr = %self.listen_addr, path = %self.metrics_path, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(self.listen_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.listen_addr, e))?;

        serve(listener, self.collector, &self.metrics_path, shutdown).await
    }
}

/// Serve on an already bound listener until the shutdown signal is received.
pub async fn serve<S: PbxSource>(
    listener: tokio::net::TcpListener,
    collector: SharedCollector<S>,
    metrics_path: &str,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let router = create_router(collector, metrics_path);
    let addr = listener.local_addr()?;

    info!(addr = %addr, path = %metrics_path, "HTTP server listening");

    // Run server with graceful shutdown
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            loop {
                if shutdown.changed().await.is_err() {
                    break;
                }
                if *shutdown.borrow() {
                    break;
                }
            }
            info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::PbxCollector;
    use axum::body::Body;
    use axum::http::Request;
    use pbx_common::snapshot::{Service, SystemStatus, Trunk};
    use pbx_common::source::FetchError;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct DownSource;

    impl PbxSource for DownSource {
        async fn system_status(&self) -> Result<SystemStatus, FetchError> {
            Err(FetchError::unavailable("down"))
        }

        async fn services(&self) -> Result<Vec<Service>, FetchError> {
            Err(FetchError::unavailable("down"))
        }

        async fn trunks(&self) -> Result<Vec<Trunk>, FetchError> {
            Ok(vec![Trunk::new("t1", true)])
        }
    }

    fn make_router(path: &str) -> Router {
        let collector = Arc::new(PbxCollector::new(DownSource, Duration::from_secs(1)));
        create_router(collector, path)
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let response = make_router("/metrics")
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("version=0.0.4"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("pbx_trunk_registered{name=\"t1\"} 1"));
        assert!(!body.contains("pbx_calls_active"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = make_router("/metrics")
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let response = make_router("/metrics")
            .oneshot(Request::get("/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let catalog: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let entries = catalog.as_array().unwrap();

        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0]["name"], "pbx_blacklist_size");
        assert_eq!(entries[5]["type"], "counter");
        assert_eq!(entries[10]["labels"][0], "name");
    }

    #[tokio::test]
    async fn test_custom_metrics_path() {
        let router = make_router("/pbx/metrics");

        let response = router
            .clone()
            .oneshot(Request::get("/pbx/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
