//! Axum integration for GraphQL Server
//!
//! Mount [`graphql_handler`] on any route of an existing [`axum::Router`], or run
//! a standalone [`AxumServer`].
//!
//! # Example
//!
//! ```rust,no_run
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use axum::Router;
//! use graphql_server_axum::prelude::*;
//!
//! struct Query;
//!
//! #[Object]
//! impl Query {
//!     async fn hello(&self) -> &str {
//!         "world"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
//!     let options: GraphQLOptions<_> = GraphQLOptions::new(schema);
//!
//!     let app = Router::new()
//!         .route("/graphql", graphql_handler(options))
//!         .route("/graphiql", graphiql_handler(GraphiQLOptions::new("/graphql")));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod handler;
mod server;

pub use handler::{graphiql_handler, graphql_handler, to_http_request};
pub use server::AxumServer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{graphiql_handler, graphql_handler, AxumServer};
    pub use graphql_server_core::prelude::*;
}
