mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::routing::{get, put};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::store::Store;

/// Build the HTTP router for the `/books` resource
pub fn router(store: Arc<Store>, config: &Config) -> anyhow::Result<Router> {
    let cors_config = &config.cors;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([cors_config.origin()?]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(cors_config.max_age());

    let router = Router::new()
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        .route(
            "/books/{id}",
            put(handlers::update_book).delete(handlers::delete_book),
        )
        .with_state(store)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    store: Arc<Store>,
    router: Router,
}

impl Server {
    /// Bind the server to the configured address with a fresh, empty store
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(Store::new());
        let router = router(Arc::clone(&store), config)?;

        let listener = TcpListener::bind(&config.server_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.server_addr))?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);
        info!("CORS allowed origin: {}", config.cors.allow_origin);
        info!("Max request body: {} bytes", config.max_body_bytes);

        Ok(Self {
            listener,
            local_addr,
            store,
            router,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get a handle to the book store
    pub fn store(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    /// Serve requests until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve requests until `signal` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, signal: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server started, listening on {}", self.local_addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .context("HTTP server failed")?;

        info!("Server shut down with {} books in memory", self.store.len());
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
