//! Serve a small schema with Actix Web.
//!
//! ```sh
//! RUST_LOG=graphql_server_core=trace cargo run -p graphql-server-actix --example simple
//! ```

use actix_web::{App, HttpServer};
use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
use graphql_server_actix::prelude::*;
use tracing_subscriber::EnvFilter;

struct Query;

#[Object]
impl Query {
    async fn hello(&self, name: Option<String>) -> String {
        format!("Hello, {}!", name.as_deref().unwrap_or("world"))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = Schema::new(Query, EmptyMutation, EmptySubscription);
    let options: GraphQLOptions<_> = GraphQLOptions::new(schema)
        .with_validation_rule(NoIntrospection)
        .with_validation_rule(DepthLimit::new(5));

    println!("GraphQL endpoint on http://127.0.0.1:4000/graphql");

    HttpServer::new(move || {
        App::new()
            .configure(configure("/graphql", options.clone()))
            .configure(graphiql_configure("/", GraphiQLOptions::new("/graphql")))
    })
    .bind(("127.0.0.1", 4000))?
    .run()
    .await
}
