use crate::config::{QuoteConfig, StoreBackend};
use crate::handlers;
use crate::services::{Clock, MemoryQuoteStore, MongoDb, QuoteService, QuoteStore, SystemClock};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Prefix every quote route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub config: QuoteConfig,
    pub quotes: QuoteService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Connects the configured store and binds the listener.
    pub async fn build(config: QuoteConfig) -> Result<Self, AppError> {
        let store: Arc<dyn QuoteStore> = match config.store.backend {
            StoreBackend::Mongo => Arc::new(
                MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MongoDB: {}", e);
                        e
                    })?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory quote store; data is lost on restart");
                Arc::new(MemoryQuoteStore::new())
            }
        };

        Self::build_with(config, store, Arc::new(SystemClock)).await
    }

    /// Builds around an already constructed store and clock.
    pub async fn build_with(
        config: QuoteConfig,
        store: Arc<dyn QuoteStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        store.ensure_index().await.map_err(|e| {
            tracing::error!("Failed to initialize quote index record: {}", e);
            AppError::from(e)
        })?;

        let state = AppState {
            config: config.clone(),
            quotes: QuoteService::new(store, clock),
        };

        let app = router(state.clone());

        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, backend = ?config.store.backend, "Quote service listening");

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn quotes(&self) -> &QuoteService {
        &self.state.quotes
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Full HTTP surface: operational probes at the root, quote API under
/// [`API_PREFIX`].
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/hello", get(handlers::hello))
        .route(
            "/quotes",
            get(handlers::list_quotes).post(handlers::create_quote),
        )
        .route(
            "/quotes/:id",
            get(handlers::get_quote).delete(handlers::delete_quote),
        )
        .route("/daily-quote", get(handlers::daily_quote))
        .route("/index/reconcile", post(handlers::reconcile_index));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::models::{NewQuote, Quote};
    use crate::services::FixedClock;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use tower::ServiceExt;

    /// Store whose every call fails as if the database were unreachable.
    struct UnreachableStore;

    fn refused<T>() -> Result<T, QuoteError> {
        Err(QuoteError::StoreUnavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }

    #[async_trait]
    impl QuoteStore for UnreachableStore {
        async fn list_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
            refused()
        }

        async fn get_quote(&self, _id: &str) -> Result<Quote, QuoteError> {
            refused()
        }

        async fn add_quote(&self, _new: NewQuote) -> Result<Quote, QuoteError> {
            refused()
        }

        async fn delete_quote(&self, _id: &str) -> Result<(), QuoteError> {
            refused()
        }

        async fn ensure_index(&self) -> Result<(), QuoteError> {
            refused()
        }

        async fn get_index_docs(&self) -> Result<Vec<String>, QuoteError> {
            refused()
        }

        async fn add_to_index(&self, _id: &str) -> Result<(), QuoteError> {
            refused()
        }

        async fn remove_from_index(&self, _id: &str) -> Result<(), QuoteError> {
            refused()
        }

        async fn dedupe_index(&self) -> Result<(), QuoteError> {
            refused()
        }

        async fn health_check(&self) -> Result<(), QuoteError> {
            refused()
        }
    }

    fn router_over(store: Arc<dyn QuoteStore>) -> Router {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let state = AppState {
            config: QuoteConfig::in_memory(0),
            quotes: QuoteService::new(store, Arc::new(clock)),
        };
        router(state)
    }

    fn test_router() -> Router {
        router_over(Arc::new(MemoryQuoteStore::new()))
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn status_of(path: &str) -> StatusCode {
        test_router().oneshot(request(path)).await.unwrap().status()
    }

    #[tokio::test]
    async fn quote_routes_live_under_api_prefix() {
        assert_eq!(status_of("/api/v1/hello").await, StatusCode::OK);
        assert_eq!(status_of("/hello").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn probes_live_at_root() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/ready").await, StatusCode::OK);
        assert_eq!(status_of("/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_index_record_fails_daily_quote() {
        // The router alone never creates the index record.
        assert_eq!(
            status_of("/api/v1/daily-quote").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn unreachable_store_fails_health_with_503() {
        let response = router_over(Arc::new(UnreachableStore))
            .oneshot(request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Service unavailable");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn unreachable_store_is_not_ready() {
        let response = router_over(Arc::new(UnreachableStore))
            .oneshot(request("/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
