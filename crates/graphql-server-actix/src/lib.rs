//! Actix Web integration for GraphQL Server
//!
//! Register the endpoint on an [`actix_web::App`] with [`configure`], and the
//! GraphiQL IDE with [`graphiql_configure`].
//!
//! # Example
//!
//! ```rust,no_run
//! use actix_web::{App, HttpServer};
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use graphql_server_actix::prelude::*;
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
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
//!     let options: GraphQLOptions<_> = GraphQLOptions::new(schema);
//!
//!     HttpServer::new(move || {
//!         App::new()
//!             .configure(configure("/graphql", options.clone()))
//!             .configure(graphiql_configure("/graphiql", GraphiQLOptions::new("/graphql")))
//!     })
//!     .bind(("127.0.0.1", 3000))?
//!     .run()
//!     .await
//! }
//! ```

mod handler;

pub use handler::{configure, graphiql_configure, to_http_request};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{configure, graphiql_configure};
    pub use graphql_server_core::prelude::*;
}
