//! Hyper integration for GraphQL Server
//!
//! [`GraphQLService`] is a plain [`hyper::service::Service`] that can be handed to
//! any hyper connection builder. [`HyperServer`] wraps it in an accept loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use graphql_server_hyper::prelude::*;
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
//! async fn main() -> Result<(), GraphQLServerError> {
//!     let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
//!     let options: GraphQLOptions<_> = GraphQLOptions::new(schema);
//!
//!     HyperServer::new(options)
//!         .bind(([127, 0, 0, 1], 3000))
//!         .run(None::<fn(std::net::SocketAddr)>, async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await
//! }
//! ```

mod server;
mod service;

pub use server::HyperServer;
pub use service::{to_http_request, GraphQLService};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GraphQLService, HyperServer};
    pub use graphql_server_core::prelude::*;
}
