use async_graphql::Executor;
use futures::future::BoxFuture;
use graphql_server_core::entities::{HttpRequest, Method, OptionsSource};
use graphql_server_core::graphiql::{render_graphiql, GraphiQLOptions};
use graphql_server_core::use_cases::run_http_query;
use graphql_server_core::HttpQueryError;
use graphql_server_core::entities::BoxError;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Hyper service answering GraphQL requests on a single path.
///
/// Requests to any other path get a 404, except the optional GraphiQL path.
pub struct GraphQLService<E, C = (), R = ()> {
    path: Arc<str>,
    graphiql: Option<(Arc<str>, Arc<str>)>,
    body_limit: usize,
    options: OptionsSource<E, C, R>,
}

impl<E, C, R> GraphQLService<E, C, R>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn new(options: impl Into<OptionsSource<E, C, R>>) -> Self {
        Self {
            path: Arc::from("/graphql"),
            graphiql: None,
            body_limit: BODY_LIMIT,
            options: options.into(),
        }
    }

    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.path = Arc::from(path.as_ref());
        self
    }

    /// Serve the GraphiQL IDE on `path`
    pub fn graphiql(mut self, path: impl AsRef<str>, options: &GraphiQLOptions) -> Self {
        let html = render_graphiql(options);
        self.graphiql = Some((Arc::from(path.as_ref()), Arc::from(html)));
        self
    }

    /// Largest request body read, in bytes. Defaults to 16 MiB.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn graphql_path(&self) -> &str {
        &self.path
    }

    async fn handle<B>(self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let path = request.uri().path();

        if let Some((ide_path, html)) = &self.graphiql {
            if path == &**ide_path {
                return match *request.method() {
                    hyper::Method::GET => html_response(html),
                    _ => plain_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
                };
            }
        }

        if path != &*self.path {
            return plain_response(StatusCode::NOT_FOUND, "Not Found");
        }

        let request = match to_http_request(request, self.body_limit).await {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read GraphQL request body");
                return into_response(Err(HttpQueryError::bad_request(format!(
                    "Failed to read request body: {}",
                    e
                ))));
            }
        };

        into_response(run_http_query(&self.options, &request).await)
    }
}

impl<E, C, R> Clone for GraphQLService<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            graphiql: self.graphiql.clone(),
            body_limit: self.body_limit,
            options: self.options.clone(),
        }
    }
}

impl<E, C, R, B> Service<Request<B>> for GraphQLService<E, C, R>
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(request).await) })
    }
}

/// Convert a hyper request into the core request, collecting at most `limit`
/// bytes of body
pub async fn to_http_request<B>(request: Request<B>, limit: usize) -> Result<HttpRequest, BoxError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let (parts, body) = request.into_parts();
    let body = Limited::new(body, limit).collect().await?.to_bytes();

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

fn into_response(result: Result<String, HttpQueryError>) -> Response<Full<Bytes>> {
    match result {
        Ok(body) => {
            let mut response = Response::new(Full::new(Bytes::from(body)));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut response = plain_response(status, err.message.clone());
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

fn plain_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn html_response(html: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(html.to_string())));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}
