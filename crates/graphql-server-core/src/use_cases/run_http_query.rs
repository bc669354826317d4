use async_graphql::parser::parse_query;
use async_graphql::parser::types::{DocumentOperations, OperationType};
use async_graphql::Executor;
use serde_json::{Map, Value};

use super::run_query;
use crate::entities::{GraphQLOptions, HttpRequest, Method, OptionsSource, QueryParams};
use crate::error::HttpQueryError;

const GET_PARAMS: [&str; 4] = ["query", "operationName", "variables", "extensions"];

/// Handle one GraphQL HTTP request.
///
/// Resolves the options for the request, decodes the GET or POST payload
/// (single operation or batch), runs every operation and serializes the
/// result. A single operation that fails before producing any data is
/// returned as a 400 carrying the JSON response.
pub async fn run_http_query<E, C, R>(
    source: &OptionsSource<E, C, R>,
    request: &HttpRequest,
) -> Result<String, HttpQueryError>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let options = source.resolve(request).await.map_err(|e| {
        tracing::error!(error = %e, "failed to resolve GraphQL options");
        HttpQueryError::internal(format!("Invalid options provided to GraphQL server: {}", e))
    })?;

    let payload = read_payload(request)?;
    let is_get = request.method == Method::Get;
    let (operations, is_batch) = match payload {
        Value::Array(operations) => (operations, true),
        operation => (vec![operation], false),
    };
    if operations.is_empty() {
        return Err(HttpQueryError::bad_request("No operations found in request."));
    }

    tracing::debug!(
        method = %request.method,
        path = %request.path,
        operations = operations.len(),
        batch = is_batch,
        "handling GraphQL request"
    );

    let mut responses = Vec::with_capacity(operations.len());
    for operation in operations {
        let params = build_params(&options, operation, is_get, is_batch)?;
        let params = match &options.format_params {
            Some(format_params) => format_params(params),
            None => params,
        };
        responses.push(run_query(&options, params).await);
    }

    if is_batch {
        return serde_json::to_string(&responses)
            .map_err(|e| HttpQueryError::internal(e.to_string()));
    }

    let response = responses
        .pop()
        .ok_or_else(|| HttpQueryError::internal("No response produced."))?;
    let body =
        serde_json::to_string(&response).map_err(|e| HttpQueryError::internal(e.to_string()))?;
    if response.is_request_error() {
        return Err(HttpQueryError::graphql(body));
    }
    Ok(body)
}

fn read_payload(request: &HttpRequest) -> Result<Value, HttpQueryError> {
    match request.method {
        Method::Post => {
            if request.body.iter().all(u8::is_ascii_whitespace) {
                return Err(HttpQueryError::bad_request("POST body missing."));
            }
            if request.content_type() == Some("application/graphql") {
                let query = request
                    .body_as_str()
                    .ok_or_else(|| HttpQueryError::bad_request("POST body is not valid UTF-8."))?;
                let mut payload = Map::new();
                payload.insert("query".to_string(), Value::String(query.to_string()));
                return Ok(Value::Object(payload));
            }
            serde_json::from_slice(&request.body).map_err(|e| {
                HttpQueryError::bad_request(format!("POST body sent invalid JSON: {}", e))
            })
        }
        Method::Get => {
            let payload: Map<String, Value> = request
                .query_pairs()
                .into_iter()
                .filter(|(key, _)| GET_PARAMS.contains(&key.as_str()))
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            if payload.is_empty() {
                return Err(HttpQueryError::bad_request("GET query missing."));
            }
            Ok(Value::Object(payload))
        }
        _ => Err(HttpQueryError::method_not_allowed(
            "GraphQL server supports only GET/POST requests.",
            "GET, POST",
        )),
    }
}

fn build_params<E, C: Clone, R: Clone>(
    options: &GraphQLOptions<E, C, R>,
    operation: Value,
    is_get: bool,
    is_batch: bool,
) -> Result<QueryParams<C, R>, HttpQueryError> {
    let Value::Object(mut fields) = operation else {
        return Err(HttpQueryError::bad_request(if is_batch {
            "Each operation in a batch must be a JSON object."
        } else {
            "POST body must be a JSON object or array."
        }));
    };

    let query = match fields.remove("query") {
        Some(Value::String(query)) => Some(query),
        None | Some(Value::Null) => None,
        Some(_) => return Err(HttpQueryError::bad_request("The query must be a string.")),
    };

    let operation_name = match fields.remove("operationName") {
        Some(Value::String(name)) if !name.is_empty() => Some(name),
        _ => None,
    };

    let variables = match fields.remove("variables") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map_err(|_| HttpQueryError::bad_request("Variables are invalid JSON."))?,
        Some(Value::String(_)) | None => Value::Null,
        Some(variables) => variables,
    };
    let variables = match variables {
        Value::Null => None,
        Value::Object(_) => Some(variables),
        _ => return Err(HttpQueryError::bad_request("Variables must be a JSON object.")),
    };

    if is_get {
        if let Some(query) = &query {
            ensure_query_operation(query, operation_name.as_deref())?;
        }
    }

    Ok(QueryParams {
        query,
        operation_name,
        variables,
        context: options.context.clone(),
        root_value: options.root_value.clone(),
    })
}

/// GET requests may only run queries. Documents that fail to parse are left
/// for the query runner to report.
fn ensure_query_operation(query: &str, operation_name: Option<&str>) -> Result<(), HttpQueryError> {
    let Ok(document) = parse_query(query) else {
        return Ok(());
    };

    let operation_type = match (&document.operations, operation_name) {
        (operations, Some(wanted)) => operations
            .iter()
            .find(|(name, _)| name.map(|n| n.as_str()) == Some(wanted))
            .map(|(_, operation)| operation.node.ty),
        (DocumentOperations::Single(operation), None) => Some(operation.node.ty),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => {
            operations.values().next().map(|operation| operation.node.ty)
        }
        _ => None,
    };

    match operation_type {
        Some(OperationType::Mutation) | Some(OperationType::Subscription) => Err(
            HttpQueryError::method_not_allowed("GET supports only query operation", "POST"),
        ),
        _ => Ok(()),
    }
}
