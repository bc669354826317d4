use serde_json::Value;

/// Parameters of a single operation, as handed to `format_params` and the executor
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams<C = (), R = ()> {
    pub query: Option<String>,
    pub operation_name: Option<String>,
    pub variables: Option<Value>,
    pub context: Option<C>,
    pub root_value: Option<R>,
}

impl<C, R> QueryParams<C, R> {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            operation_name: None,
            variables: None,
            context: None,
            root_value: None,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_root_value(mut self, root_value: R) -> Self {
        self.root_value = Some(root_value);
        self
    }

    /// Get a variable by name
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.as_ref().and_then(|v| v.get(name))
    }
}

/// Wrapper under which the configured root value is exposed to resolvers.
///
/// ```rust,ignore
/// let root = ctx.data::<RootValue<MyRoot>>()?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RootValue<R>(pub R);

impl<R> std::ops::Deref for RootValue<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}
