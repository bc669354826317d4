use async_graphql::parser::types::ExecutableDocument;

use crate::entities::GraphQLError;

/// An additional validation rule run against the parsed document before execution.
///
/// Any error returned prevents the operation from executing.
pub trait ValidationRule: Send + Sync {
    fn validate(&self, document: &ExecutableDocument) -> Vec<GraphQLError>;
}

impl<F> ValidationRule for F
where
    F: Fn(&ExecutableDocument) -> Vec<GraphQLError> + Send + Sync,
{
    fn validate(&self, document: &ExecutableDocument) -> Vec<GraphQLError> {
        self(document)
    }
}
