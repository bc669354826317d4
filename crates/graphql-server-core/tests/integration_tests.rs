//! Integration tests for graphql-server-core

use async_graphql::{Context, EmptySubscription, Object, Schema};
use graphql_server_core::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct AuthContext {
    user: Option<String>,
}

struct Query;

#[Object]
impl Query {
    async fn hello(&self) -> &str {
        "world"
    }

    async fn me(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<AuthContext>().and_then(|auth| auth.user.clone())
    }

    async fn version(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<RootValue<String>>().map(|root| root.0.clone())
    }

    async fn double(&self, n: i32) -> i32 {
        n * 2
    }

    async fn broken(&self) -> async_graphql::Result<Option<String>> {
        Err("database unavailable".into())
    }
}

struct Mutation;

#[Object]
impl Mutation {
    async fn add(&self, a: i32, b: i32) -> i32 {
        a + b
    }
}

type TestSchema = Schema<Query, Mutation, EmptySubscription>;

fn schema() -> TestSchema {
    Schema::new(Query, Mutation, EmptySubscription)
}

fn post(body: serde_json::Value) -> HttpRequest {
    HttpRequest::post("/graphql").with_json(&body)
}

fn get(query_string: &str) -> HttpRequest {
    HttpRequest::get("/graphql").with_query_string(query_string)
}

async fn run(
    options: impl Into<OptionsSource<TestSchema, AuthContext, String>>,
    request: HttpRequest,
) -> Result<serde_json::Value, HttpQueryError> {
    run_http_query(&options.into(), &request)
        .await
        .map(|body| serde_json::from_str(&body).unwrap())
}

fn options() -> GraphQLOptions<TestSchema, AuthContext, String> {
    GraphQLOptions::new(schema()).with_debug(false)
}

#[tokio::test]
async fn test_post_single_query() {
    let body = run(options(), post(json!({"query": "{ hello }"}))).await.unwrap();
    assert_eq!(body, json!({"data": {"hello": "world"}}));
}

#[tokio::test]
async fn test_get_single_query() {
    let body = run(options(), get("query=%7B%20hello%20%7D")).await.unwrap();
    assert_eq!(body["data"]["hello"], "world");
}

#[tokio::test]
async fn test_get_with_variables_string() {
    let body = run(
        options(),
        get("query=query%20Q(%24n%3A%20Int!)%20%7B%20double(n%3A%20%24n)%20%7D&variables=%7B%22n%22%3A21%7D&operationName=Q"),
    )
    .await
    .unwrap();
    assert_eq!(body["data"]["double"], 42);
}

#[tokio::test]
async fn test_get_mutation_rejected() {
    let err = run(options(), get("query=mutation%20%7B%20add(a%3A1%2Cb%3A2)%20%7D"))
        .await
        .unwrap_err();
    assert_eq!(err.status, 405);
    assert_eq!(err.message, "GET supports only query operation");
    assert_eq!(err.headers, vec![("Allow".to_string(), "POST".to_string())]);
}

#[tokio::test]
async fn test_post_mutation_allowed() {
    let body = run(options(), post(json!({"query": "mutation { add(a: 1, b: 2) }"})))
        .await
        .unwrap();
    assert_eq!(body["data"]["add"], 3);
}

#[tokio::test]
async fn test_unsupported_method() {
    let request = HttpRequest::new(Method::Delete, "/graphql");
    let err = run(options(), request).await.unwrap_err();
    assert_eq!(err.status, 405);
    assert_eq!(err.headers, vec![("Allow".to_string(), "GET, POST".to_string())]);
}

#[tokio::test]
async fn test_single_query_with_syntax_error_is_400_json() {
    let err = run(options(), post(json!({"query": "{ hello "}))).await.unwrap_err();
    assert_eq!(err.status, 400);
    assert!(err.is_graphql_error);
    let body: serde_json::Value = serde_json::from_str(&err.message).unwrap();
    assert!(body.get("data").is_none());
    assert!(body["errors"][0]["message"].is_string());
}

#[tokio::test]
async fn test_execution_error_keeps_200() {
    let body = run(options(), post(json!({"query": "{ hello broken }"})))
        .await
        .unwrap();
    assert_eq!(body["data"]["hello"], "world");
    assert!(body["data"]["broken"].is_null());
    assert_eq!(body["errors"][0]["message"], "database unavailable");
    assert_eq!(body["errors"][0]["path"], json!(["broken"]));
}

#[tokio::test]
async fn test_batch_returns_array_in_order() {
    let body = run(
        options(),
        post(json!([
            {"query": "{ hello }"},
            {"query": "mutation { add(a: 2, b: 3) }"},
            {"query": "{ nope }"}
        ])),
    )
    .await
    .unwrap();
    let responses = body.as_array().unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["data"]["hello"], "world");
    assert_eq!(responses[1]["data"]["add"], 5);
    assert!(responses[2]["errors"].is_array());
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let err = run(options(), post(json!([]))).await.unwrap_err();
    assert_eq!(err.status, 400);
    assert_eq!(err.message, "No operations found in request.");
}

#[tokio::test]
async fn test_format_params_runs_per_operation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let options = options().with_format_params(move |params| {
        counter.fetch_add(1, Ordering::SeqCst);
        params.with_context(AuthContext {
            user: Some("formatted".to_string()),
        })
    });

    let body = run(
        options,
        post(json!([{"query": "{ me }"}, {"query": "{ me }"}])),
    )
    .await
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(body[0]["data"]["me"], "formatted");
    assert_eq!(body[1]["data"]["me"], "formatted");
}

#[tokio::test]
async fn test_static_context_and_root_value() {
    let options = options()
        .with_context(AuthContext {
            user: Some("static".to_string()),
        })
        .with_root_value("1.0.0".to_string());
    let body = run(options, post(json!({"query": "{ me version }"})))
        .await
        .unwrap();
    assert_eq!(body["data"], json!({"me": "static", "version": "1.0.0"}));
}

#[tokio::test]
async fn test_dynamic_options_from_headers() {
    let source: OptionsSource<TestSchema, AuthContext, String> =
        OptionsSource::dynamic(|request| {
            let user = request
                .header("authorization")
                .map(|value| value.trim_start_matches("Bearer ").to_string());
            Ok(options().with_context(AuthContext { user }))
        });

    let request = post(json!({"query": "{ me }"})).with_header("Authorization", "Bearer alice");
    let body = run(source, request).await.unwrap();
    assert_eq!(body["data"]["me"], "alice");
}

#[tokio::test]
async fn test_dynamic_async_options() {
    let source: OptionsSource<TestSchema, AuthContext, String> =
        OptionsSource::dynamic_async(|_| async {
            tokio::task::yield_now().await;
            Ok(options().with_root_value("async".to_string()))
        });
    let body = run(source, post(json!({"query": "{ version }"})))
        .await
        .unwrap();
    assert_eq!(body["data"]["version"], "async");
}

#[tokio::test]
async fn test_failing_options_function_is_500() {
    let source: OptionsSource<TestSchema, AuthContext, String> =
        OptionsSource::dynamic(|_| Err("tenant lookup failed".into()));
    let err = run(source, post(json!({"query": "{ hello }"}))).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(
        err.message,
        "Invalid options provided to GraphQL server: tenant lookup failed"
    );
}

#[tokio::test]
async fn test_format_error_applies_to_all_errors() {
    let options = options()
        .with_format_error(|error| GraphQLError::new(format!("[masked] {}", error.message)));

    let body = run(options.clone(), post(json!({"query": "{ broken }"})))
        .await
        .unwrap();
    assert_eq!(body["errors"][0]["message"], "[masked] database unavailable");

    let err = run(options, post(json!({"query": "{ nope }"}))).await.unwrap_err();
    let body: serde_json::Value = serde_json::from_str(&err.message).unwrap();
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("[masked]"));
}

#[tokio::test]
async fn test_format_response_adds_extensions() {
    let options = options().with_format_response(|response, params| {
        response.with_extension("operationName", json!(params.operation_name))
    });
    let body = run(
        options,
        post(json!({"query": "query Greeting { hello }", "operationName": "Greeting"})),
    )
    .await
    .unwrap();
    assert_eq!(body["extensions"]["operationName"], "Greeting");
}

#[tokio::test]
async fn test_validation_rules_block_execution() {
    let options = options()
        .with_validation_rule(DepthLimit::new(1))
        .with_validation_rule(NoIntrospection);

    let err = run(
        options.clone(),
        post(json!({"query": "{ __schema { queryType { name } } }"})),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, 400);
    let body: serde_json::Value = serde_json::from_str(&err.message).unwrap();
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["message"].as_str())
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().any(|m| m.contains("exceeds maximum operation depth")));
    assert!(messages.iter().any(|m| m.contains("introspection has been disabled")));

    let body = run(options, post(json!({"query": "{ hello }"}))).await.unwrap();
    assert_eq!(body["data"]["hello"], "world");
}

#[tokio::test]
async fn test_application_graphql_body() {
    let request = HttpRequest::post("/graphql")
        .with_header("Content-Type", "application/graphql")
        .with_body("{ hello }");
    let body = run(options(), request).await.unwrap();
    assert_eq!(body["data"]["hello"], "world");
}
