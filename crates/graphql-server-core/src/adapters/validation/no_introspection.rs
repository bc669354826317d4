use async_graphql::parser::types::{ExecutableDocument, Selection, SelectionSet};

use crate::entities::GraphQLError;
use crate::use_cases::ports::ValidationRule;

const INTROSPECTION_FIELDS: [&str; 2] = ["__schema", "__type"];

/// Rejects documents that select `__schema` or `__type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoIntrospection;

impl ValidationRule for NoIntrospection {
    fn validate(&self, document: &ExecutableDocument) -> Vec<GraphQLError> {
        let mut errors = Vec::new();
        for (_, operation) in document.operations.iter() {
            collect(&operation.node.selection_set.node, &mut errors);
        }
        for fragment in document.fragments.values() {
            collect(&fragment.node.selection_set.node, &mut errors);
        }
        errors
    }
}

fn collect(selection_set: &SelectionSet, errors: &mut Vec<GraphQLError>) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                let name = field.node.name.node.as_str();
                if INTROSPECTION_FIELDS.contains(&name) {
                    errors.push(
                        GraphQLError::new(format!(
                            "GraphQL introspection has been disabled, but the requested query contained the field \"{}\".",
                            name
                        ))
                        .with_location(field.pos.line, field.pos.column),
                    );
                }
                collect(&field.node.selection_set.node, errors);
            }
            Selection::InlineFragment(fragment) => {
                collect(&fragment.node.selection_set.node, errors)
            }
            Selection::FragmentSpread(_) => {}
        }
    }
}
