//! GraphQL Server Core
//!
//! Framework-agnostic handling of GraphQL over HTTP. The framework adapters
//! (`graphql-server-axum`, `graphql-server-actix`, `graphql-server-hyper`)
//! turn their requests into an [`HttpRequest`](entities::HttpRequest) and hand
//! it to [`run_http_query`](use_cases::run_http_query) together with the
//! configured [`OptionsSource`](entities::OptionsSource).
//!
//! # Example
//!
//! ```rust,no_run
//! use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
//! use graphql_server_core::prelude::*;
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
//! async fn main() {
//!     let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
//!     let options: OptionsSource<_> = GraphQLOptions::new(schema)
//!         .with_validation_rule(DepthLimit::new(10))
//!         .into();
//!
//!     let request = HttpRequest::post("/graphql").with_json(&json!({"query": "{ hello }"}));
//!     let body = run_http_query(&options, &request).await.unwrap();
//!     assert_eq!(body, r#"{"data":{"hello":"world"}}"#);
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod graphiql;
pub mod use_cases;

pub use adapters::validation;
pub use error::{GraphQLServerError, HttpQueryError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        BoxError, GraphQLError, GraphQLOptions, GraphQLResponse, HttpRequest, LogAction,
        LogMessage, LogStep, Method, OptionsSource, QueryParams, RootValue,
    };
    pub use crate::error::{GraphQLServerError, HttpQueryError};
    pub use crate::graphiql::{render_graphiql, GraphiQLOptions};
    pub use crate::use_cases::ports::{Server, ValidationRule};
    pub use crate::use_cases::{run_http_query, run_query};
    pub use crate::validation::{DepthLimit, NoIntrospection};
    pub use serde_json::json;
}
