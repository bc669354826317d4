use async_graphql::http::GraphiQLSource;

/// Settings for the GraphiQL IDE page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphiQLOptions {
    pub endpoint_url: String,
    pub subscription_endpoint: Option<String>,
    pub title: Option<String>,
}

impl GraphiQLOptions {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            subscription_endpoint: None,
            title: None,
        }
    }

    pub fn with_subscription_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.subscription_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Default for GraphiQLOptions {
    fn default() -> Self {
        Self::new("/graphql")
    }
}

/// Render the GraphiQL HTML page pointing at the configured endpoint
pub fn render_graphiql(options: &GraphiQLOptions) -> String {
    let mut source = GraphiQLSource::build().endpoint(&options.endpoint_url);
    if let Some(endpoint) = &options.subscription_endpoint {
        source = source.subscription_endpoint(endpoint);
    }
    if let Some(title) = &options.title {
        source = source.title(title);
    }
    source.finish()
}
