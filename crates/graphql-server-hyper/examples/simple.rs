//! Serve a schema with the hyper server, logging every request phase.
//!
//! ```sh
//! RUST_LOG=info cargo run -p graphql-server-hyper --example simple
//! ```

use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
use graphql_server_hyper::prelude::*;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

struct Query;

#[Object]
impl Query {
    async fn uptime(&self) -> u64 {
        42
    }
}

#[tokio::main]
async fn main() -> Result<(), GraphQLServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
    let options: GraphQLOptions<_> = GraphQLOptions::new(schema).with_log_function(|message| {
        tracing::info!(
            action = ?message.action,
            step = ?message.step,
            key = message.key.unwrap_or(""),
            data = ?message.data,
            "graphql"
        );
    });

    HyperServer::new(options)
        .bind(([127, 0, 0, 1], 4000))
        .graphiql("/", GraphiQLOptions::new("/graphql"))
        .run(
            Some(|addr: SocketAddr| println!("GraphiQL on http://{}/", addr)),
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
        )
        .await
}
