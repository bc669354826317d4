use async_graphql::Executor;
use async_trait::async_trait;
use axum::Router;
use graphql_server_core::entities::OptionsSource;
use graphql_server_core::graphiql::GraphiQLOptions;
use graphql_server_core::use_cases::ports::Server;
use graphql_server_core::GraphQLServerError;
use std::future::Future;
use std::net::SocketAddr;

use crate::handler::{graphiql_handler, graphql_handler};

/// Axum-based standalone GraphQL server
pub struct AxumServer<E, C = (), R = ()> {
    addr: SocketAddr,
    path: String,
    graphiql: Option<(String, GraphiQLOptions)>,
    options: OptionsSource<E, C, R>,
}

impl<E, C, R> AxumServer<E, C, R>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn new(options: impl Into<OptionsSource<E, C, R>>) -> Self {
        Self {
            addr: ([127, 0, 0, 1], 0).into(),
            path: "/graphql".to_string(),
            graphiql: None,
            options: options.into(),
        }
    }

    pub fn bind(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn graphiql(mut self, path: impl Into<String>, options: GraphiQLOptions) -> Self {
        self.graphiql = Some((path.into(), options));
        self
    }

    /// The router this server runs, for embedding or testing
    pub fn router(&self) -> Router {
        let router = Router::new().route(&self.path, graphql_handler(self.options.clone()));
        match &self.graphiql {
            Some((path, options)) => router.route(path, graphiql_handler(options.clone())),
            None => router,
        }
    }
}

impl<E, C, R> Clone for AxumServer<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            addr: self.addr,
            path: self.path.clone(),
            graphiql: self.graphiql.clone(),
            options: self.options.clone(),
        }
    }
}

#[async_trait]
impl<E, C, R> Server for AxumServer<E, C, R>
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
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| GraphQLServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, path = %self.path, "GraphQL server listening");

        // Call on_ready callback if provided
        if let Some(callback) = on_ready {
            callback(addr);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(%addr, "GraphQL server stopped");
        Ok(())
    }
}
