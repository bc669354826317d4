use async_graphql::Executor;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get, MethodRouter},
};
use graphql_server_core::entities::{HttpRequest, Method, OptionsSource};
use graphql_server_core::graphiql::{render_graphiql, GraphiQLOptions};
use graphql_server_core::use_cases::run_http_query;
use graphql_server_core::HttpQueryError;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Build a route that serves GraphQL over GET and POST.
///
/// Other methods are answered with 405.
pub fn graphql_handler<E, C, R, S>(options: impl Into<OptionsSource<E, C, R>>) -> MethodRouter<S>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    any(handle_graphql::<E, C, R>).with_state(options.into())
}

/// Build a route that serves the GraphiQL IDE
pub fn graphiql_handler<S>(options: GraphiQLOptions) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let html = render_graphiql(&options);
    get(move || async move { Html(html) })
}

/// Convert an axum request into the core request, buffering the body
pub async fn to_http_request(request: Request) -> Result<HttpRequest, axum::Error> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, BODY_LIMIT).await?;

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    Ok(HttpRequest {
        method: Method::parse(parts.method.as_str()),
        path: parts.uri.path().to_string(),
        query_string: parts.uri.query().map(str::to_string),
        headers,
        body: body.to_vec(),
    })
}

async fn handle_graphql<E, C, R>(
    State(options): State<OptionsSource<E, C, R>>,
    request: Request,
) -> Response
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let request = match to_http_request(request).await {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read GraphQL request body");
            return into_response(Err(HttpQueryError::bad_request(format!(
                "Failed to read request body: {}",
                e
            ))));
        }
    };

    into_response(run_http_query(&options, &request).await)
}

fn into_response(result: Result<String, HttpQueryError>) -> Response {
    match result {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut response = (status, err.message.clone()).into_response();
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(err.content_type()),
            );
            for (name, value) in &err.headers {
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    headers.insert(name, value);
                }
            }
            response
        }
    }
}
