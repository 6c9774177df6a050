use std::sync::Arc;

use shelf_sdk::Library;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Shelf HTTP server.
pub struct ShelfServer {
    config: ServerConfig,
    library: Arc<Library>,
}

impl ShelfServer {
    pub fn new(config: ServerConfig, library: Arc<Library>) -> Self {
        Self { config, library }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.library), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            library = %self.library.name(),
            "Shelf server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = ShelfServer::new(ServerConfig::default(), Arc::new(Library::in_memory("t")));
        assert_eq!(server.config().bind_addr.port(), 5000);
        let _router = server.router();
    }

    #[tokio::test]
    async fn serve_fails_on_taken_port() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ServerConfig {
            bind_addr: taken.local_addr().unwrap(),
            ..ServerConfig::default()
        };
        let server = ShelfServer::new(config, Arc::new(Library::in_memory("t")));
        assert!(matches!(server.serve().await, Err(ServerError::Io(_))));
    }
}
