use async_graphql::parser::parse_query;
use async_graphql::{Executor, ServerError, Variables};
use serde_json::json;

use crate::entities::{
    GraphQLError, GraphQLOptions, GraphQLResponse, LogAction, LogMessage, LogStep, QueryParams,
    RootValue,
};

/// Run a single GraphQL operation against the configured schema.
///
/// Parse errors, failures of the extra validation rules and a missing query are
/// reported as a response without `data`. Errors from the executor keep whatever
/// data it produced.
pub async fn run_query<E, C, R>(
    options: &GraphQLOptions<E, C, R>,
    params: QueryParams<C, R>,
) -> GraphQLResponse
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    options.log(LogMessage::new(LogAction::Request, LogStep::Start));
    if let Some(query) = &params.query {
        options.log(
            LogMessage::new(LogAction::Request, LogStep::Status).with_data("query", json!(query)),
        );
    }
    if let Some(variables) = &params.variables {
        options.log(
            LogMessage::new(LogAction::Request, LogStep::Status)
                .with_data("variables", variables.clone()),
        );
    }
    if let Some(operation_name) = &params.operation_name {
        options.log(
            LogMessage::new(LogAction::Request, LogStep::Status)
                .with_data("operationName", json!(operation_name)),
        );
    }

    let mut response = execute(options, &params).await;

    if options.debug {
        for error in &response.errors {
            tracing::error!(
                message = %error.message,
                locations = ?error.locations,
                path = ?error.path,
                "GraphQL error"
            );
        }
    }

    response.errors = response
        .errors
        .into_iter()
        .map(|error| options.format_error(error))
        .collect();
    if let Some(format_response) = &options.format_response {
        response = format_response(response, &params);
    }

    options.log(
        LogMessage::new(LogAction::Request, LogStep::End)
            .with_data("response", serde_json::to_value(&response).unwrap_or_default()),
    );
    response
}

async fn execute<E, C, R>(
    options: &GraphQLOptions<E, C, R>,
    params: &QueryParams<C, R>,
) -> GraphQLResponse
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let query = match params.query.as_deref() {
        Some(query) if !query.trim().is_empty() => query,
        _ => {
            return GraphQLResponse::from_errors(vec![GraphQLError::new(
                "Must provide query string.",
            )])
        }
    };

    options.log(LogMessage::new(LogAction::Parse, LogStep::Start));
    let parsed = parse_query(query);
    options.log(LogMessage::new(LogAction::Parse, LogStep::End));

    let document = match parsed {
        Ok(document) => document,
        Err(err) => {
            tracing::debug!(error = %err, "failed to parse GraphQL query");
            let error: ServerError = err.into();
            return GraphQLResponse::from_errors(vec![convert_error(&error)]);
        }
    };

    if !options.validation_rules.is_empty() {
        options.log(LogMessage::new(LogAction::Validation, LogStep::Start));
        let errors: Vec<GraphQLError> = options
            .validation_rules
            .iter()
            .flat_map(|rule| rule.validate(&document))
            .collect();
        options.log(LogMessage::new(LogAction::Validation, LogStep::End));

        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "GraphQL query failed validation");
            return GraphQLResponse::from_errors(errors);
        }
    }
    drop(document);

    let mut request = async_graphql::Request::new(query);
    if let Some(operation_name) = &params.operation_name {
        request = request.operation_name(operation_name.as_str());
    }
    if let Some(variables) = &params.variables {
        request = request.variables(Variables::from_json(variables.clone()));
    }
    if let Some(context) = &params.context {
        request = request.data(context.clone());
    }
    if let Some(root_value) = &params.root_value {
        request = request.data(RootValue(root_value.clone()));
    }

    options.log(LogMessage::new(LogAction::Execute, LogStep::Start));
    let response = options.schema.execute(request).await;
    options.log(LogMessage::new(LogAction::Execute, LogStep::End));

    convert_response(response)
}

fn convert_error(error: &ServerError) -> GraphQLError {
    serde_json::to_value(error)
        .and_then(serde_json::from_value)
        .unwrap_or_else(|_| GraphQLError::new(error.message.clone()))
}

fn convert_response(response: async_graphql::Response) -> GraphQLResponse {
    let errors: Vec<GraphQLError> = response.errors.iter().map(convert_error).collect();

    // Errors without a path were raised before execution started (for
    // example by the schema's own validation), so no data was produced.
    let request_error = !errors.is_empty() && errors.iter().all(|e| e.path.is_empty());
    let data = response
        .data
        .into_json()
        .ok()
        .filter(|data| !(request_error && data.is_null()));

    let extensions = response
        .extensions
        .into_iter()
        .filter_map(|(key, value)| value.into_json().ok().map(|value| (key, value)))
        .collect();

    GraphQLResponse {
        data,
        errors,
        extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LogMessage;
    use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts events logged at `ERROR`
    struct ErrorEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    async fn count_logged_errors(options: &GraphQLOptions<TestSchema>, params: QueryParams) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorEvents(count.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);
        run_query(options, params).await;
        count.load(Ordering::SeqCst)
    }

    #[derive(Clone)]
    struct Viewer(String);

    struct Query;

    #[Object]
    impl Query {
        async fn hello(&self) -> &str {
            "world"
        }

        async fn viewer(&self, ctx: &Context<'_>) -> Option<String> {
            ctx.data_opt::<Viewer>().map(|v| v.0.clone())
        }

        async fn root(&self, ctx: &Context<'_>) -> Option<i32> {
            ctx.data_opt::<RootValue<i32>>().map(|r| r.0)
        }

        async fn echo(&self, value: String) -> String {
            value
        }

        async fn fail(&self) -> async_graphql::Result<Option<i32>> {
            Err("resolver failed".into())
        }
    }

    type TestSchema = Schema<Query, EmptyMutation, EmptySubscription>;

    fn schema() -> TestSchema {
        Schema::new(Query, EmptyMutation, EmptySubscription)
    }

    #[tokio::test]
    async fn test_run_query_success() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema());
        let response = run_query(&options, QueryParams::new("{ hello }")).await;
        assert!(response.is_ok());
        assert_eq!(response.data, Some(json!({"hello": "world"})));
    }

    #[tokio::test]
    async fn test_run_query_missing_query() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema());
        let params = QueryParams {
            query: None,
            operation_name: None,
            variables: None,
            context: None,
            root_value: None,
        };
        let response = run_query(&options, params).await;
        assert!(response.is_request_error());
        assert_eq!(response.errors[0].message, "Must provide query string.");
    }

    #[tokio::test]
    async fn test_run_query_syntax_error_has_location() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema());
        let response = run_query(&options, QueryParams::new("{ hello ")).await;
        assert!(response.is_request_error());
        assert!(!response.errors[0].locations.is_empty());
    }

    #[tokio::test]
    async fn test_run_query_unknown_field_has_no_data() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema());
        let response = run_query(&options, QueryParams::new("{ nope }")).await;
        assert!(response.is_request_error());
    }

    #[tokio::test]
    async fn test_run_query_resolver_error_keeps_data() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema()).with_debug(true);
        let response = run_query(&options, QueryParams::new("{ hello fail }")).await;
        assert_eq!(response.data, Some(json!({"hello": "world", "fail": null})));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].path, vec![json!("fail")]);
    }

    #[tokio::test]
    async fn test_run_query_passes_context_and_root_value() {
        let options: GraphQLOptions<TestSchema, Viewer, i32> = GraphQLOptions::new(schema());
        let params = QueryParams::new("{ viewer root }")
            .with_context(Viewer("alice".to_string()))
            .with_root_value(42);
        let response = run_query(&options, params).await;
        assert_eq!(response.data, Some(json!({"viewer": "alice", "root": 42})));
    }

    #[tokio::test]
    async fn test_run_query_variables_and_operation_name() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema());
        let params = QueryParams::new(
            "query A { hello } query B($v: String!) { echo(value: $v) }",
        )
        .with_operation_name("B")
        .with_variables(json!({"v": "hi"}));
        let response = run_query(&options, params).await;
        assert_eq!(response.data, Some(json!({"echo": "hi"})));
    }

    #[tokio::test]
    async fn test_run_query_applies_validation_rules() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema())
            .with_validation_rule(|_: &async_graphql::parser::types::ExecutableDocument| {
                vec![GraphQLError::new("rejected")]
            });
        let response = run_query(&options, QueryParams::new("{ hello }")).await;
        assert!(response.is_request_error());
        assert_eq!(response.errors[0].message, "rejected");
    }

    #[tokio::test]
    async fn test_run_query_format_hooks() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema())
            .with_format_error(|e| GraphQLError::new(format!("formatted: {}", e.message)))
            .with_format_response(|response, params| {
                response.with_extension("query", json!(params.query))
            });
        let response = run_query(&options, QueryParams::new("{ fail }")).await;
        assert_eq!(response.errors[0].message, "formatted: resolver failed");
        assert_eq!(response.extensions["query"], json!("{ fail }"));
    }

    #[tokio::test]
    async fn test_run_query_logs_each_phase() {
        let seen: Arc<Mutex<Vec<LogMessage>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema())
            .with_log_function(move |m| sink.lock().unwrap().push(m.clone()));
        run_query(&options, QueryParams::new("{ hello }")).await;

        let phases: Vec<(LogAction, LogStep)> = seen
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.step != LogStep::Status)
            .map(|m| (m.action, m.step))
            .collect();
        assert_eq!(
            phases,
            vec![
                (LogAction::Request, LogStep::Start),
                (LogAction::Parse, LogStep::Start),
                (LogAction::Parse, LogStep::End),
                (LogAction::Execute, LogStep::Start),
                (LogAction::Execute, LogStep::End),
                (LogAction::Request, LogStep::End),
            ]
        );
    }

    #[tokio::test]
    async fn test_debug_logs_errors_from_every_phase() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema())
            .with_debug(true)
            .with_validation_rule(|document: &async_graphql::parser::types::ExecutableDocument| {
                if document.fragments.is_empty() {
                    Vec::new()
                } else {
                    vec![GraphQLError::new("fragments are not allowed")]
                }
            });

        let missing = QueryParams {
            query: None,
            operation_name: None,
            variables: None,
            context: None,
            root_value: None,
        };
        assert_eq!(count_logged_errors(&options, missing).await, 1);
        assert_eq!(count_logged_errors(&options, QueryParams::new("{ hello ")).await, 1);
        assert_eq!(
            count_logged_errors(
                &options,
                QueryParams::new("{ ...F } fragment F on Query { hello }")
            )
            .await,
            1
        );
        assert_eq!(count_logged_errors(&options, QueryParams::new("{ fail }")).await, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_logged_without_debug() {
        let options: GraphQLOptions<TestSchema> = GraphQLOptions::new(schema()).with_debug(false);
        assert_eq!(count_logged_errors(&options, QueryParams::new("{ hello ")).await, 0);
        assert_eq!(count_logged_errors(&options, QueryParams::new("{ fail }")).await, 0);
    }
}
