//! Component Store & Tree Resolver
//!
//! Each surface keeps its components in a flat id-keyed map. The tree is
//! never stored; it is resolved on demand from the reserved `root` id.
//!
//! # Malformed References
//!
//! The wire format does not forbid cycles or references to ids that were
//! never sent, so the resolver degrades instead of failing:
//!
//! - A child id missing from the store is omitted, keeping sibling order
//! - A child already being expanded on the current path is omitted, which
//!   breaks the cycle at its second occurrence
//!
//! The same id may still appear in several branches; sharing is not a cycle.
//!
//! Visibility is applied afterwards by the consumer via
//! [`ResolvedNode::filter_visible`], because it depends on the data model
//! rather than on the component definitions.

use std::collections::{HashMap, HashSet};

use crate::component::{Component, ROOT_ID};
use crate::condition;
use crate::data_model::DataModel;

/// Flat mapping of component id to definition for one surface
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentStore {
    components: HashMap<String, Component>,
}

impl ComponentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace components, in iteration order
    ///
    /// A later component with an id already seen (in the store or earlier in
    /// the same call) replaces the earlier definition.
    pub fn upsert<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = Component>,
    {
        for component in components {
            self.components.insert(component.id.clone(), component);
        }
    }

    /// Look up a component by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Whether a component with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Number of stored components
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All component ids, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.components.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve the tree rooted at the `root` component
    ///
    /// Returns `None` when no component has the reserved root id.
    #[must_use]
    pub fn resolve_tree(&self) -> Option<ResolvedNode<'_>> {
        let root = self.get(ROOT_ID)?;
        let mut on_path = HashSet::new();
        Some(self.expand(root, &mut on_path))
    }

    fn expand<'a>(
        &'a self,
        component: &'a Component,
        on_path: &mut HashSet<&'a str>,
    ) -> ResolvedNode<'a> {
        on_path.insert(component.id.as_str());

        let mut children = Vec::with_capacity(component.children.len());
        for child_id in &component.children {
            let Some(child) = self.get(child_id) else {
                tracing::debug!(
                    parent = %component.id,
                    child = %child_id,
                    "Omitting dangling child reference"
                );
                continue;
            };
            if on_path.contains(child.id.as_str()) {
                tracing::warn!(
                    parent = %component.id,
                    child = %child_id,
                    "Component cycle detected, omitting child"
                );
                continue;
            }
            children.push(self.expand(child, on_path));
        }

        on_path.remove(component.id.as_str());
        ResolvedNode {
            component,
            children,
        }
    }
}

/// A component with its children expanded
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedNode<'a> {
    /// The component definition
    pub component: &'a Component,
    /// Expanded children in render order
    pub children: Vec<ResolvedNode<'a>>,
}

impl<'a> ResolvedNode<'a> {
    /// Component id of this node
    #[must_use]
    pub fn id(&self) -> &'a str {
        &self.component.id
    }

    /// Drop every node whose `visible` condition is false, with its subtree
    ///
    /// Returns `None` when this node itself is hidden.
    #[must_use]
    pub fn filter_visible(&self, model: &DataModel) -> Option<ResolvedNode<'a>> {
        if let Some(expression) = &self.component.visible {
            if !condition::evaluate(expression, model) {
                return None;
            }
        }
        Some(ResolvedNode {
            component: self.component,
            children: self
                .children
                .iter()
                .filter_map(|child| child.filter_visible(model))
                .collect(),
        })
    }

    /// Nodes in pre-order
    #[must_use]
    pub fn depth_first(&self) -> Vec<&ResolvedNode<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First node with this id in pre-order
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ResolvedNode<'a>> {
        self.depth_first().into_iter().find(|node| node.id() == id)
    }

    /// Total number of nodes in this subtree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ResolvedNode::node_count).sum::<usize>()
    }
}
