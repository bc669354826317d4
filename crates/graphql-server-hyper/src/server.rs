use async_graphql::Executor;
use async_trait::async_trait;
use graphql_server_core::entities::OptionsSource;
use graphql_server_core::graphiql::GraphiQLOptions;
use graphql_server_core::use_cases::ports::Server;
use graphql_server_core::GraphQLServerError;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::service::GraphQLService;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Standalone GraphQL server built directly on hyper
pub struct HyperServer<E, C = (), R = ()> {
    addr: SocketAddr,
    service: GraphQLService<E, C, R>,
}

impl<E, C, R> HyperServer<E, C, R>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn new(options: impl Into<OptionsSource<E, C, R>>) -> Self {
        Self {
            addr: ([127, 0, 0, 1], 0).into(),
            service: GraphQLService::new(options),
        }
    }

    pub fn bind(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.service = self.service.path(path);
        self
    }

    pub fn graphiql(mut self, path: impl AsRef<str>, options: GraphiQLOptions) -> Self {
        self.service = self.service.graphiql(path, &options);
        self
    }

    /// The service each connection is served with
    pub fn service(&self) -> GraphQLService<E, C, R> {
        self.service.clone()
    }
}

impl<E, C, R> Clone for HyperServer<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            addr: self.addr,
            service: self.service.clone(),
        }
    }
}

#[async_trait]
impl<E, C, R> Server for HyperServer<E, C, R>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    async fn run<F, S>(&self, on_ready: Option<F>, shutdown: S) -> Result<(), GraphQLServerError>
    where
        F: FnOnce(SocketAddr) + Send + 'static,
        S: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| GraphQLServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, path = %self.service.graphql_path(), "GraphQL server listening");

        if let Some(callback) = on_ready {
            callback(addr);
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    if let Some((stream, peer)) = accepted(result).await {
                        let service = self.service.clone();
                        tokio::spawn(async move {
                            if let Err(e) = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await
                            {
                                tracing::debug!(%peer, error = %e, "connection closed with error");
                            }
                        });
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        tracing::info!(%addr, "GraphQL server stopped");
        Ok(())
    }
}

/// Unwrap an accept result. Failures such as running out of file descriptors
/// tend to repeat, so pause before the next attempt.
async fn accepted<T>(result: io::Result<T>) -> Option<T> {
    match result {
        Ok(connection) => Some(connection),
        Err(e) => {
            tracing::warn!(error = %e, "failed to accept connection");
            tokio::time::sleep(ACCEPT_BACKOFF).await;
            None
        }
    }
}
