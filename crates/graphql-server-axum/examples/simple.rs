//! Simple example demonstrating basic usage of graphql-server-axum
//!
//! This example shows how to:
//! - Build per-request options that read a header into the resolver context
//! - Add a depth limit and mask internal error messages
//! - Serve GraphQL and GraphiQL with the standalone server until Ctrl-C
//!
//! Run with `RUST_LOG=debug cargo run --example simple` and open
//! http://127.0.0.1:4000/graphiql

use async_graphql::{Context, EmptySubscription, Object, Schema};
use graphql_server_axum::prelude::*;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct RequestUser(Option<String>);

struct Query;

#[Object]
impl Query {
    async fn hello(&self, ctx: &Context<'_>) -> String {
        match ctx.data_opt::<RequestUser>().and_then(|u| u.0.clone()) {
            Some(name) => format!("Hello, {}!", name),
            None => "Hello, stranger!".to_string(),
        }
    }
}

struct Mutation;

#[Object]
impl Mutation {
    async fn shout(&self, message: String) -> String {
        message.to_uppercase()
    }
}

type AppSchema = Schema<Query, Mutation, EmptySubscription>;

#[tokio::main]
async fn main() -> Result<(), GraphQLServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema: AppSchema = Schema::new(Query, Mutation, EmptySubscription);

    let options: OptionsSource<AppSchema, RequestUser> = OptionsSource::dynamic(move |request| {
        let user = request.header("x-user").map(str::to_string);
        Ok(GraphQLOptions::new(schema.clone())
            .with_context(RequestUser(user))
            .with_validation_rule(DepthLimit::new(8))
            .with_format_error(|error| {
                if error.path.is_empty() {
                    error
                } else {
                    GraphQLError::new("Internal server error").with_path(error.path)
                }
            }))
    });

    let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
    AxumServer::new(options)
        .bind(addr)
        .graphiql("/graphiql", GraphiQLOptions::new("/graphql"))
        .run(
            Some(|addr| println!("GraphQL server ready at http://{}/graphql", addr)),
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
        )
        .await
}
