//! Action Dispatch
//!
//! Classifies an action raised by the presentation layer:
//!
//! - Names found in the [`ActionTable`] are resolved locally against the
//!   surface's data model, with no round trip
//! - Every other name is forwarded to the producer as a `userAction`
//!
//! Local actions read and write through the same path resolver that server
//! operations use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_model::DataModel;
use crate::protocol::{ClientMessage, UserAction};
use crate::registry::{SurfaceId, SurfaceRegistry};

/// Name of the built-in route swap action
pub const SWAP_ROUTE: &str = "swap-route";

/// An action handled without contacting the producer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LocalAction {
    /// Exchange the values at two paths
    Swap {
        /// First path
        first: String,
        /// Second path
        second: String,
    },
}

impl LocalAction {
    /// Apply to a data model
    pub fn apply(&self, model: &mut DataModel) {
        match self {
            Self::Swap { first, second } => {
                let first_value = model.get(first).cloned();
                let second_value = model.get(second).cloned();
                write_or_remove(model, first, second_value);
                write_or_remove(model, second, first_value);
            }
        }
    }
}

fn write_or_remove(model: &mut DataModel, path: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            model.set(path, value);
        }
        None => {
            model.remove(path);
        }
    }
}

/// Mapping of action name to local resolution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    actions: BTreeMap<String, LocalAction>,
}

impl Default for ActionTable {
    /// The built-in table: `swap-route` exchanges departure and arrival
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(
            SWAP_ROUTE,
            LocalAction::Swap {
                first: "/flight/departure".to_string(),
                second: "/flight/arrival".to_string(),
            },
        );
        table
    }
}

impl ActionTable {
    /// A table that forwards everything
    #[must_use]
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Register (or replace) a local action
    pub fn insert(&mut self, name: impl Into<String>, action: LocalAction) {
        self.actions.insert(name.into(), action);
    }

    /// Local action for a name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LocalAction> {
        self.actions.get(name)
    }

    /// Whether a name is handled locally
    #[must_use]
    pub fn is_local(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of local actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is local
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Local action names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Layer `other` on top, replacing same-named entries
    pub fn merge(&mut self, other: ActionTable) {
        self.actions.extend(other.actions);
    }
}

/// An interaction raised by the presentation layer
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    /// Surface the interaction happened on
    pub surface_id: SurfaceId,
    /// Component that raised it
    pub component_id: String,
    /// Action name
    pub action: String,
    /// Optional payload
    pub data: Option<Value>,
}

impl ActionRequest {
    /// Create a request without payload
    pub fn new(
        surface_id: impl Into<SurfaceId>,
        component_id: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            surface_id: surface_id.into(),
            component_id: component_id.into(),
            action: action.into(),
            data: None,
        }
    }

    /// Attach a payload
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result of dispatching an action
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// Resolved locally; the data model has already changed
    Local(LocalAction),
    /// Must be sent to the producer
    Forward(ClientMessage),
    /// The surface no longer exists
    Dropped,
}

/// Resolve or forward an action
///
/// A forwarded action carries the request's payload when it has one,
/// otherwise the surface's data-model snapshot if `attach_data_model` is set.
pub fn dispatch(
    registry: &mut SurfaceRegistry,
    table: &ActionTable,
    request: ActionRequest,
    attach_data_model: bool,
) -> Dispatch {
    let Some(surface) = registry.get_mut(request.surface_id.as_str()) else {
        tracing::warn!(
            surface_id = %request.surface_id,
            action = %request.action,
            "Action for unknown surface dropped"
        );
        return Dispatch::Dropped;
    };

    if let Some(local) = table.get(&request.action) {
        local.apply(surface.data_model_mut());
        tracing::debug!(
            surface_id = %request.surface_id,
            action = %request.action,
            "Resolved action locally"
        );
        return Dispatch::Local(local.clone());
    }

    let data = match request.data {
        Some(data) => Some(data),
        None if attach_data_model => Some(surface.data_model().to_value()),
        None => None,
    };

    tracing::debug!(
        surface_id = %request.surface_id,
        component_id = %request.component_id,
        action = %request.action,
        "Forwarding action"
    );

    Dispatch::Forward(ClientMessage::UserAction(UserAction {
        surface_id: request.surface_id,
        component_id: request.component_id,
        action: request.action,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::Operation;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry_with_model(model: Value) -> SurfaceRegistry {
        let mut registry = SurfaceRegistry::new();
        registry.create_surface("s1".into(), None);
        let Value::Object(map) = model else {
            panic!("model must be an object")
        };
        let operations: Vec<Operation> = map
            .into_iter()
            .map(|(key, value)| Operation::Add {
                path: format!("/{key}"),
                value,
            })
            .collect();
        registry.get_mut("s1").unwrap().apply_operations(&operations);
        registry
    }

    fn model(registry: &SurfaceRegistry) -> Value {
        registry.get("s1").unwrap().data_model().to_value()
    }

    #[test]
    fn test_swap_route_default() {
        let mut registry = registry_with_model(json!({
            "flight": {"departure": "ICN", "arrival": "NRT"}
        }));
        let outcome = dispatch(
            &mut registry,
            &ActionTable::default(),
            ActionRequest::new("s1", "swap", SWAP_ROUTE),
            true,
        );
        assert!(matches!(outcome, Dispatch::Local(LocalAction::Swap { .. })));
        assert_eq!(
            model(&registry),
            json!({"flight": {"departure": "NRT", "arrival": "ICN"}})
        );
    }

    #[test]
    fn test_swap_with_absent_side() {
        let mut registry = registry_with_model(json!({"flight": {"from": "ICN"}}));
        let mut table = ActionTable::empty();
        table.insert(
            "swap",
            LocalAction::Swap {
                first: "/flight/from".into(),
                second: "/flight/to".into(),
            },
        );
        dispatch(
            &mut registry,
            &table,
            ActionRequest::new("s1", "btn", "swap"),
            false,
        );
        assert_eq!(model(&registry), json!({"flight": {"to": "ICN"}}));
    }

    #[test]
    fn test_forward_attaches_snapshot() {
        let mut registry = registry_with_model(json!({"flight": {"from": "ICN"}}));
        let outcome = dispatch(
            &mut registry,
            &ActionTable::default(),
            ActionRequest::new("s1", "search", "search-flights"),
            true,
        );
        assert_eq!(
            outcome,
            Dispatch::Forward(ClientMessage::UserAction(UserAction {
                surface_id: "s1".into(),
                component_id: "search".into(),
                action: "search-flights".into(),
                data: Some(json!({"flight": {"from": "ICN"}})),
            }))
        );
    }

    #[test]
    fn test_forward_prefers_explicit_payload() {
        let mut registry = registry_with_model(json!({"flight": {"from": "ICN"}}));
        let outcome = dispatch(
            &mut registry,
            &ActionTable::default(),
            ActionRequest::new("s1", "card-7", "select-item-7").with_data(json!({"id": 7})),
            true,
        );
        let Dispatch::Forward(ClientMessage::UserAction(action)) = outcome else {
            panic!("expected forward, got {outcome:?}")
        };
        assert_eq!(action.data, Some(json!({"id": 7})));
    }

    #[test]
    fn test_forward_without_attachment() {
        let mut registry = registry_with_model(json!({"a": 1}));
        let outcome = dispatch(
            &mut registry,
            &ActionTable::empty(),
            ActionRequest::new("s1", "b", SWAP_ROUTE),
            false,
        );
        let Dispatch::Forward(ClientMessage::UserAction(action)) = outcome else {
            panic!("expected forward, got {outcome:?}")
        };
        assert_eq!(action.data, None);
        assert_eq!(model(&registry), json!({"a": 1}));
    }

    #[test]
    fn test_unknown_surface_dropped() {
        let mut registry = SurfaceRegistry::new();
        let outcome = dispatch(
            &mut registry,
            &ActionTable::default(),
            ActionRequest::new("ghost", "b", "anything"),
            true,
        );
        assert_eq!(outcome, Dispatch::Dropped);
    }

    #[test]
    fn test_table_merge_and_wire_shape() {
        let mut table = ActionTable::default();
        let extra: ActionTable = serde_json::from_value(json!({
            "swap-dates": {"kind": "swap", "first": "/d/out", "second": "/d/back"}
        }))
        .unwrap();
        table.merge(extra);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["swap-dates", "swap-route"]);
        assert!(table.is_local("swap-dates"));
        assert_eq!(table.len(), 2);
    }
}
