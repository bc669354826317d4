use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;

use crate::error::GraphQLServerError;

/// Trait for standalone GraphQL server implementations
#[async_trait]
pub trait Server: Send + Sync + Clone {
    /// Bind and serve GraphQL requests until `shutdown` resolves.
    ///
    /// If `on_ready` is provided, it will be called with the actual server address
    /// once the server is ready to accept connections. Failing to bind is returned
    /// as an error instead of being reported through `on_ready`.
    async fn run<F, S>(&self, on_ready: Option<F>, shutdown: S) -> Result<(), GraphQLServerError>
    where
        F: FnOnce(SocketAddr) + Send + 'static,
        S: Future<Output = ()> + Send + 'static;
}
