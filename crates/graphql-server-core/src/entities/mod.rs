mod http_request;
mod log;
mod method;
mod options;
mod options_source;
mod query_params;
mod response;

pub use http_request::HttpRequest;
pub use log::{LogAction, LogFn, LogMessage, LogStep};
pub use method::Method;
pub use options::{FormatErrorFn, FormatParamsFn, FormatResponseFn, GraphQLOptions};
pub use options_source::{BoxError, OptionsFn, OptionsSource};
pub use query_params::{QueryParams, RootValue};
pub use response::{GraphQLError, GraphQLResponse, Location};
