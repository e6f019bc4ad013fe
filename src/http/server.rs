//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (panic recovery, request ID, tracing, timeout,
//!   admission control)
//! - Bind server to listener and run the bucket eviction loop alongside it

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{QueryConfig, ServiceConfig};
use crate::http::handlers;
use crate::lifecycle::Shutdown;
use crate::models::{director, movie, Director, DirectorColumn, Movie, MovieColumn};
use crate::query::SortSafelist;
use crate::security::{rate_limit_middleware, RateLimiter};
use crate::store::ListStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn ListStore<Movie>>,
    pub directors: Arc<dyn ListStore<Director>>,
    pub movie_sort: Arc<SortSafelist<MovieColumn>>,
    pub director_sort: Arc<SortSafelist<DirectorColumn>>,
    pub limits: QueryConfig,
    pub store_timeout: Duration,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(
        config: &ServiceConfig,
        movies: Arc<dyn ListStore<Movie>>,
        directors: Arc<dyn ListStore<Director>>,
    ) -> Self {
        Self {
            movies,
            directors,
            movie_sort: Arc::new(movie::sort_safelist()),
            director_sort: Arc::new(director::sort_safelist()),
            limits: config.query,
            store_timeout: config.timeouts.store(),
            environment: Arc::from(config.listener.environment.as_str()),
        }
    }
}

/// HTTP server for the catalog.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    pub fn new(config: &ServiceConfig, state: AppState) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.limiter));
        let router = Self::build_router(config, state, limiter.clone());
        Self { router, limiter }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
        Router::new()
            .route("/v1/healthcheck", get(handlers::healthcheck))
            .route("/v1/movies", get(handlers::list_movies))
            .route("/v1/directors", get(handlers::list_directors))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(CatchPanicLayer::new())
    }

    /// The fully layered router, e.g. for driving with `oneshot` in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    /// Serve until `shutdown` fires, evicting idle buckets in the background.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            limiter_enabled = self.limiter.is_enabled(),
            "HTTP server starting"
        );

        tokio::spawn(self.limiter.clone().run_eviction(shutdown.subscribe()));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
