//! Validation rules that can be added to [`GraphQLOptions`](crate::entities::GraphQLOptions)

mod depth_limit;
mod no_introspection;

pub use depth_limit::DepthLimit;
pub use no_introspection::NoIntrospection;
