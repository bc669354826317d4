pub mod ports;
mod run_http_query;
mod run_query;

pub use run_http_query::run_http_query;
pub use run_query::run_query;
