use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;

use super::{GraphQLOptions, HttpRequest};

/// Boxed error returned by a per-request options function
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for per-request options functions
pub type OptionsFn<E, C, R> = Arc<
    dyn Fn(&HttpRequest) -> BoxFuture<'static, Result<GraphQLOptions<E, C, R>, BoxError>>
        + Send
        + Sync,
>;

/// Where the options for a request come from
pub enum OptionsSource<E, C = (), R = ()> {
    /// The same options for every request
    Static(Arc<GraphQLOptions<E, C, R>>),
    /// Options computed from the incoming request
    Dynamic(OptionsFn<E, C, R>),
}

impl<E, C, R> OptionsSource<E, C, R> {
    pub fn new(options: GraphQLOptions<E, C, R>) -> Self {
        OptionsSource::Static(Arc::new(options))
    }

    /// Build options synchronously from each request
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<GraphQLOptions<E, C, R>, BoxError> + Send + Sync + 'static,
        E: Send + 'static,
        C: Send + 'static,
        R: Send + 'static,
    {
        OptionsSource::Dynamic(Arc::new(move |request| {
            futures::future::ready(f(request)).boxed()
        }))
    }

    /// Build options asynchronously from each request.
    ///
    /// The returned future must not borrow the request; clone what it needs.
    pub fn dynamic_async<F, Fut>(f: F) -> Self
    where
        F: Fn(&HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GraphQLOptions<E, C, R>, BoxError>> + Send + 'static,
    {
        OptionsSource::Dynamic(Arc::new(move |request| f(request).boxed()))
    }

    /// Get the options for a given request
    pub async fn resolve(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<GraphQLOptions<E, C, R>>, BoxError> {
        match self {
            OptionsSource::Static(options) => Ok(options.clone()),
            OptionsSource::Dynamic(f) => f(request).await.map(Arc::new),
        }
    }
}

impl<E, C, R> Clone for OptionsSource<E, C, R> {
    fn clone(&self) -> Self {
        match self {
            OptionsSource::Static(options) => OptionsSource::Static(options.clone()),
            OptionsSource::Dynamic(f) => OptionsSource::Dynamic(f.clone()),
        }
    }
}

impl<E, C, R> std::fmt::Debug for OptionsSource<E, C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionsSource::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<fn>").finish(),
        }
    }
}

impl<E, C, R> From<GraphQLOptions<E, C, R>> for OptionsSource<E, C, R> {
    fn from(options: GraphQLOptions<E, C, R>) -> Self {
        OptionsSource::new(options)
    }
}
