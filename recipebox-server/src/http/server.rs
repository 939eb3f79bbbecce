//! Axum server setup
//!
//! Server skeleton with:
//! - CORS restricted to configured origins by default
//! - Tracing and timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use recipebox_core::{ConfigError, RecipeboxConfig};

use super::routes;
use crate::db::RecipeStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8082)
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS when not permissive
    pub cors_origins: Vec<String>,

    /// Allow any origin.
    pub cors_permissive: bool,

    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8082)),
            cors_origins: vec!["http://192.168.56.101".to_string()],
            cors_permissive: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &RecipeboxConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: config.bind_addr()?,
            cors_origins: config.server.cors_origins.clone(),
            cors_permissive: config.server.cors_permissive,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecipeStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(cors_layer(config));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::recipes::router())
        .layer(middleware)
        .with_state(Arc::new(state))
}

/// Wrap the router so `/list/` and `/list` reach the same handler.
pub fn normalize(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive || config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryRecipeStore::new());
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn RecipeStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(backend = store.backend(), "Recipe store ready");
    let app = normalize(build_router(AppState::new(store), &config));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecipeStore;
    use axum::body::Body;
    use crate::db::StoreError;
    use async_trait::async_trait;
    use axum::http::{header, Method, Request};
    use recipebox_core::{Recipe, RecipeDraft};
    use tower::ServiceExt as _;

    fn app(config: &ServerConfig) -> Router {
        build_router(AppState::new(Arc::new(MemoryRecipeStore::new())), config)
    }

    /// Memory store whose `list` stalls
    struct StalledStore(MemoryRecipeStore);

    #[async_trait]
    impl RecipeStore for StalledStore {
        async fn insert(&self, draft: RecipeDraft) -> Result<String, StoreError> {
            self.0.insert(draft).await
        }

        async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
            self.0.get(id).await
        }

        async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.0.list().await
        }

        async fn replace(&self, id: &str, draft: RecipeDraft) -> Result<Option<Recipe>, StoreError> {
            self.0.replace(id, draft).await
        }

        async fn delete(&self, id: &str) -> Result<u64, StoreError> {
            self.0.delete(id).await
        }

        fn backend(&self) -> &'static str {
            "stalled"
        }
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8082);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn from_config_reads_sections() {
        let mut file = RecipeboxConfig::default();
        file.server.bind = "127.0.0.1:9090".into();
        file.server.request_timeout_secs = 5;

        let config = ServerConfig::from_config(&file).unwrap();
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let config = ServerConfig {
            request_timeout: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let store = StalledStore(MemoryRecipeStore::new());
        let app = build_router(AppState::new(Arc::new(store)), &config);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/list").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn trailing_slash_is_normalized() {
        let service = normalize(app(&ServerConfig::default()));

        let response = service
            .oneshot(Request::builder().uri("/list/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allowed_origin_is_echoed() {
        let response = app(&ServerConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/list")
                    .header(header::ORIGIN, "http://192.168.56.101")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://192.168.56.101"
        );
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_header() {
        let response = app(&ServerConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/list")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn permissive_cors_allows_any_origin() {
        let config = ServerConfig {
            cors_permissive: true,
            ..ServerConfig::default()
        };

        let response = app(&config)
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/health")
                    .header(header::ORIGIN, "http://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
