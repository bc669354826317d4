use actix_web::{
    http::StatusCode,
    web::{self, ServiceConfig},
    HttpRequest as ActixRequest, HttpResponse,
};
use async_graphql::Executor;
use graphql_server_core::entities::{HttpRequest, Method, OptionsSource};
use graphql_server_core::graphiql::{render_graphiql, GraphiQLOptions};
use graphql_server_core::use_cases::run_http_query;
use graphql_server_core::HttpQueryError;

/// Register a GraphQL endpoint at `path`.
///
/// The returned closure is meant for [`actix_web::App::configure`]. GET and POST
/// are served; every other method gets a 405.
pub fn configure<E, C, R>(
    path: impl Into<String>,
    options: impl Into<OptionsSource<E, C, R>>,
) -> impl FnOnce(&mut ServiceConfig)
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let path = path.into();
    let options: web::Data<OptionsSource<E, C, R>> = web::Data::new(options.into());

    move |cfg| {
        cfg.service(
            web::resource(path)
                .app_data(options)
                .route(web::route().to(handle_graphql::<E, C, R>)),
        );
    }
}

/// Register the GraphiQL IDE at `path`
pub fn graphiql_configure(
    path: impl Into<String>,
    options: GraphiQLOptions,
) -> impl FnOnce(&mut ServiceConfig) {
    let path = path.into();
    let html = render_graphiql(&options);

    move |cfg| {
        cfg.service(web::resource(path).route(web::get().to(move || {
            let html = html.clone();
            async move {
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }
        })));
    }
}

/// Convert an actix request and its buffered body into the core request
pub fn to_http_request(request: &ActixRequest, body: &[u8]) -> HttpRequest {
    let headers = request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    HttpRequest {
        method: Method::parse(request.method().as_str()),
        path: request.path().to_string(),
        query_string: Some(request.query_string())
            .filter(|qs| !qs.is_empty())
            .map(str::to_string),
        headers,
        body: body.to_vec(),
    }
}

async fn handle_graphql<E, C, R>(
    request: ActixRequest,
    body: web::Bytes,
    options: web::Data<OptionsSource<E, C, R>>,
) -> HttpResponse
where
    E: Executor,
    C: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let request = to_http_request(&request, &body);
    let result = run_http_query(options.get_ref(), &request).await;
    if let Err(err) = &result {
        tracing::debug!(status = err.status, "GraphQL request rejected");
    }
    into_response(result)
}

fn into_response(result: Result<String, HttpQueryError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut builder = HttpResponse::build(status);
            builder.content_type(err.content_type());
            for (name, value) in &err.headers {
                if !name.eq_ignore_ascii_case("content-type") {
                    builder.insert_header((name.as_str(), value.as_str()));
                }
            }
            builder.body(err.message)
        }
    }
}
