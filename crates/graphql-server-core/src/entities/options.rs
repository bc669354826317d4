use std::sync::Arc;

use super::{GraphQLError, GraphQLResponse, LogFn, LogMessage, QueryParams};
use crate::use_cases::ports::ValidationRule;

/// Hook applied to every error before it is returned to the client
pub type FormatErrorFn = Arc<dyn Fn(GraphQLError) -> GraphQLError + Send + Sync>;

/// Hook applied to the parameters of each operation before execution
pub type FormatParamsFn<C, R> = Arc<dyn Fn(QueryParams<C, R>) -> QueryParams<C, R> + Send + Sync>;

/// Hook applied to each response before it is returned to the client
pub type FormatResponseFn<C, R> =
    Arc<dyn Fn(GraphQLResponse, &QueryParams<C, R>) -> GraphQLResponse + Send + Sync>;

/// Options controlling how GraphQL requests are executed.
///
/// `E` is the executor (usually an `async_graphql::Schema`), `C` the context
/// handed to resolvers and `R` the root value.
pub struct GraphQLOptions<E, C = (), R = ()> {
    pub schema: E,
    pub context: Option<C>,
    pub root_value: Option<R>,
    pub format_error: Option<FormatErrorFn>,
    pub validation_rules: Vec<Arc<dyn ValidationRule>>,
    pub format_params: Option<FormatParamsFn<C, R>>,
    pub format_response: Option<FormatResponseFn<C, R>>,
    pub debug: bool,
    pub log_function: Option<LogFn>,
}

impl<E, C, R> GraphQLOptions<E, C, R> {
    pub fn new(schema: E) -> Self {
        Self {
            schema,
            context: None,
            root_value: None,
            format_error: None,
            validation_rules: Vec::new(),
            format_params: None,
            format_response: None,
            debug: cfg!(debug_assertions),
            log_function: None,
        }
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_root_value(mut self, root_value: R) -> Self {
        self.root_value = Some(root_value);
        self
    }

    pub fn with_format_error<F>(mut self, f: F) -> Self
    where
        F: Fn(GraphQLError) -> GraphQLError + Send + Sync + 'static,
    {
        self.format_error = Some(Arc::new(f));
        self
    }

    pub fn with_validation_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.validation_rules.push(Arc::new(rule));
        self
    }

    pub fn with_validation_rules(
        mut self,
        rules: impl IntoIterator<Item = Arc<dyn ValidationRule>>,
    ) -> Self {
        self.validation_rules.extend(rules);
        self
    }

    pub fn with_format_params<F>(mut self, f: F) -> Self
    where
        F: Fn(QueryParams<C, R>) -> QueryParams<C, R> + Send + Sync + 'static,
    {
        self.format_params = Some(Arc::new(f));
        self
    }

    pub fn with_format_response<F>(mut self, f: F) -> Self
    where
        F: Fn(GraphQLResponse, &QueryParams<C, R>) -> GraphQLResponse + Send + Sync + 'static,
    {
        self.format_response = Some(Arc::new(f));
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_log_function<F>(mut self, f: F) -> Self
    where
        F: Fn(&LogMessage) + Send + Sync + 'static,
    {
        self.log_function = Some(Arc::new(f));
        self
    }

    pub fn format_error(&self, error: GraphQLError) -> GraphQLError {
        match &self.format_error {
            Some(f) => f(error),
            None => error,
        }
    }

    pub(crate) fn log(&self, message: LogMessage) {
        tracing::trace!(
            action = %message.action,
            step = %message.step,
            key = message.key.unwrap_or_default(),
            "graphql query log"
        );
        if let Some(f) = &self.log_function {
            f(&message);
        }
    }
}

impl<E: Clone, C: Clone, R: Clone> Clone for GraphQLOptions<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            context: self.context.clone(),
            root_value: self.root_value.clone(),
            format_error: self.format_error.clone(),
            validation_rules: self.validation_rules.clone(),
            format_params: self.format_params.clone(),
            format_response: self.format_response.clone(),
            debug: self.debug,
            log_function: self.log_function.clone(),
        }
    }
}

impl<E, C, R> std::fmt::Debug for GraphQLOptions<E, C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLOptions")
            .field("context", &self.context.is_some())
            .field("root_value", &self.root_value.is_some())
            .field("format_error", &self.format_error.is_some())
            .field("validation_rules", &self.validation_rules.len())
            .field("format_params", &self.format_params.is_some())
            .field("format_response", &self.format_response.is_some())
            .field("debug", &self.debug)
            .field("log_function", &self.log_function.is_some())
            .finish_non_exhaustive()
    }
}
