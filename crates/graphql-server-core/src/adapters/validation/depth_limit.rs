use async_graphql::parser::types::{ExecutableDocument, Selection, SelectionSet};
use async_graphql::Name;
use std::collections::HashMap;

use crate::entities::GraphQLError;
use crate::use_cases::ports::ValidationRule;

/// Rejects operations nested deeper than a fixed number of fields.
///
/// Fragment spreads and inline fragments do not add a level; the fields they
/// contain do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit {
    max_depth: usize,
}

impl DepthLimit {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl ValidationRule for DepthLimit {
    fn validate(&self, document: &ExecutableDocument) -> Vec<GraphQLError> {
        let mut walker = DepthWalker::new(document);
        document
            .operations
            .iter()
            .filter_map(|(name, operation)| {
                let depth = walker.selection_set_depth(&operation.node.selection_set.node);
                if depth <= self.max_depth {
                    return None;
                }
                let name = name.map(|n| n.as_str()).unwrap_or("anonymous");
                Some(
                    GraphQLError::new(format!(
                        "'{}' exceeds maximum operation depth of {}",
                        name, self.max_depth
                    ))
                    .with_location(operation.pos.line, operation.pos.column),
                )
            })
            .collect()
    }
}

/// Walks selection sets, measuring each named fragment at most once.
struct DepthWalker<'a> {
    document: &'a ExecutableDocument,
    fragment_depths: HashMap<&'a Name, usize>,
    visiting: Vec<&'a Name>,
}

impl<'a> DepthWalker<'a> {
    fn new(document: &'a ExecutableDocument) -> Self {
        Self {
            document,
            fragment_depths: HashMap::new(),
            visiting: Vec::new(),
        }
    }

    fn selection_set_depth(&mut self, selection_set: &'a SelectionSet) -> usize {
        let mut max = 0;
        for selection in &selection_set.items {
            let depth = match &selection.node {
                Selection::Field(field) => {
                    1 + self.selection_set_depth(&field.node.selection_set.node)
                }
                Selection::InlineFragment(fragment) => {
                    self.selection_set_depth(&fragment.node.selection_set.node)
                }
                Selection::FragmentSpread(spread) => {
                    self.fragment_depth(&spread.node.fragment_name.node)
                }
            };
            max = max.max(depth);
        }
        max
    }

    fn fragment_depth(&mut self, name: &'a Name) -> usize {
        if let Some(depth) = self.fragment_depths.get(name) {
            return *depth;
        }
        // cyclic spreads are reported by the schema's own validation
        if self.visiting.contains(&name) {
            return 0;
        }
        let document = self.document;
        let Some(fragment) = document.fragments.get(name) else {
            return 0;
        };

        self.visiting.push(name);
        let depth = self.selection_set_depth(&fragment.node.selection_set.node);
        self.visiting.pop();
        self.fragment_depths.insert(name, depth);
        depth
    }
}
