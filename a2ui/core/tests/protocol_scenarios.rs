//! End-to-end protocol scenarios
//!
//! Each test feeds JSON message sequences through the public API, the way a
//! transport would deliver them, and checks the resulting registry state.
//! Tests cover:
//! - Upsert idempotence and last-writer-wins inside a batch
//! - Tree resolution with cycles and dangling references
//! - Visibility conditions, including malformed ones
//! - Active-surface fallback
//! - Local actions against a patched data model
//! - TOML configuration driving the engine

use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use a2ui_core::config::load_config_from_path;
use a2ui_core::{
    decode_batch, reduce, ActionRequest, ClientMessage, ComponentKind, DataModel, DataPath,
    Dispatch, Engine, ResolvedNode, ServerMessage, SurfaceId, SurfaceRegistry,
};

fn messages(value: Value) -> Vec<ServerMessage> {
    decode_batch(&value.to_string()).unwrap()
}

fn shape(node: &ResolvedNode<'_>) -> String {
    if node.children.is_empty() {
        node.id().to_string()
    } else {
        let children: Vec<String> = node.children.iter().map(shape).collect();
        format!("{}[{}]", node.id(), children.join(","))
    }
}

fn tree_shape(registry: &SurfaceRegistry, surface: &str) -> Option<String> {
    registry
        .get(surface)
        .and_then(|s| s.visible_tree())
        .map(|tree| shape(&tree))
}

fn surface_with(components: Value) -> SurfaceRegistry {
    reduce(
        &SurfaceRegistry::new(),
        &messages(json!([
            {"createSurface": {"surfaceId": "s1"}},
            {"updateComponents": {"surfaceId": "s1", "components": components}}
        ])),
    )
}

// =============================================================================
// Component store
// =============================================================================

#[test]
fn test_upsert_is_idempotent() {
    let update = json!({"updateComponents": {"surfaceId": "s1", "components": [
        {"id": "root", "component": "Column", "children": ["a"]},
        {"id": "a", "component": "Text", "text": "A"}
    ]}});
    let create = json!({"createSurface": {"surfaceId": "s1"}});

    let once = reduce(&SurfaceRegistry::new(), &messages(json!([create, update])));
    let twice = reduce(&once, &messages(json!([update])));

    assert_eq!(
        once.get("s1").unwrap().components(),
        twice.get("s1").unwrap().components()
    );
}

#[test]
fn test_later_duplicate_wins() {
    let registry = surface_with(json!([
        {"id": "root", "component": "Text", "text": "first"},
        {"id": "root", "component": "Text", "text": "second"}
    ]));
    let store = registry.get("s1").unwrap().components();
    assert_eq!(store.len(), 1);
    let ComponentKind::Text { text, .. } = &store.get("root").unwrap().kind else {
        panic!("root should be Text")
    };
    assert_eq!(text.as_deref(), Some("second"));
}

#[test]
fn test_hello_tree() {
    let registry = reduce(
        &SurfaceRegistry::new(),
        &messages(json!([
            {"createSurface": {"surfaceId": "s1"}},
            {"updateComponents": {"surfaceId": "s1", "components": [
                {"id": "root", "componentType": "Column", "children": ["t1"]},
                {"id": "t1", "componentType": "Text", "text": "Hello"}
            ]}}
        ])),
    );

    let surface = registry.get("s1").unwrap();
    let tree = surface.tree().unwrap();
    assert_eq!(tree.component.type_name(), "Column");
    assert_eq!(tree.children.len(), 1);
    assert_eq!(
        tree.children[0].component.kind,
        ComponentKind::Text {
            text: Some("Hello".into()),
            binding: None,
            style: None,
        }
    );
}

#[test]
fn test_cycle_terminates() {
    let registry = surface_with(json!([
        {"id": "root", "component": "Column", "children": ["a"]},
        {"id": "a", "component": "Column", "children": ["b"]},
        {"id": "b", "component": "Column", "children": ["a"]}
    ]));
    assert_eq!(tree_shape(&registry, "s1").as_deref(), Some("root[a[b]]"));
}

#[test]
fn test_dangling_child_omitted() {
    let registry = surface_with(json!([
        {"id": "root", "component": "Column", "children": ["x", "missing"]},
        {"id": "x", "component": "Text", "text": "x"}
    ]));
    assert_eq!(tree_shape(&registry, "s1").as_deref(), Some("root[x]"));
}

#[test]
fn test_children_can_arrive_later() {
    let first = surface_with(json!([
        {"id": "root", "component": "Column", "children": ["late"]}
    ]));
    assert_eq!(tree_shape(&first, "s1").as_deref(), Some("root"));

    let second = reduce(
        &first,
        &messages(json!([{"updateComponents": {"surfaceId": "s1", "components": [
            {"id": "late", "component": "Text", "text": "here now"}
        ]}}])),
    );
    assert_eq!(tree_shape(&second, "s1").as_deref(), Some("root[late]"));
}

// =============================================================================
// Visibility
// =============================================================================

#[test]
fn test_visibility_follows_data_model() {
    let components = json!([
        {"id": "root", "component": "Column", "children": ["oneway", "return", "weird"]},
        {"id": "oneway", "component": "Text", "text": "One way", "visible": "/trip/type == 'oneway'"},
        {"id": "return", "component": "Text", "text": "Return", "visible": "/trip/type != 'oneway'"},
        {"id": "weird", "component": "Text", "text": "Always", "visible": "banana"}
    ]);
    let registry = reduce(
        &surface_with(components),
        &messages(json!([{"updateDataModel": {"surfaceId": "s1", "operations": [
            {"op": "add", "path": "/trip/type", "value": "oneway"}
        ]}}])),
    );
    assert_eq!(
        tree_shape(&registry, "s1").as_deref(),
        Some("root[oneway,weird]")
    );

    let flipped = reduce(
        &registry,
        &messages(json!([{"updateDataModel": {"surfaceId": "s1", "operations": [
            {"op": "replace", "path": "/trip/type", "value": "round"}
        ]}}])),
    );
    assert_eq!(
        tree_shape(&flipped, "s1").as_deref(),
        Some("root[return,weird]")
    );
}

#[test]
fn test_hidden_root_renders_nothing() {
    let registry = surface_with(json!([
        {"id": "root", "component": "Column", "visible": "/ready == 'true'", "children": []}
    ]));
    assert_eq!(tree_shape(&registry, "s1"), None);
    assert!(registry.get("s1").unwrap().tree().is_some());
}

// =============================================================================
// Registry lifecycle
// =============================================================================

#[test]
fn test_active_surface_fallback() {
    let mut registry = reduce(
        &SurfaceRegistry::new(),
        &messages(json!([
            {"createSurface": {"surfaceId": "A"}},
            {"createSurface": {"surfaceId": "B"}}
        ])),
    );
    assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("B"));

    registry = reduce(&registry, &messages(json!([{"deleteSurface": {"surfaceId": "B"}}])));
    assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("A"));

    registry = reduce(&registry, &messages(json!([{"deleteSurface": {"surfaceId": "A"}}])));
    assert_eq!(registry.active_id(), None);
    assert!(registry.is_empty());
}

#[test]
fn test_recreate_resets_surface() {
    let registry = reduce(
        &surface_with(json!([{"id": "root", "component": "Column"}])),
        &messages(json!([
            {"updateDataModel": {"surfaceId": "s1", "operations": [{"op": "add", "path": "/a", "value": 1}]}},
            {"createSurface": {"surfaceId": "s1", "catalogId": "v2"}}
        ])),
    );
    let surface = registry.get("s1").unwrap();
    assert!(surface.components().is_empty());
    assert!(surface.data_model().is_empty());
    assert_eq!(surface.metadata.catalog_id.as_deref(), Some("v2"));
}

// =============================================================================
// Data model and actions
// =============================================================================

#[test]
fn test_root_path_write_is_noop() {
    let mut model = DataModel::from_value(json!({"a": 1}));
    model.set("", json!({"replaced": true}));
    model.set_path(&DataPath::root(), json!(5));
    assert_eq!(model.to_value(), json!({"a": 1}));
}

#[test]
fn test_path_write_then_read() {
    let mut model = DataModel::new();
    for (path, value) in [
        ("/a", json!(1)),
        ("/b/c/d", json!("deep")),
        ("/list", json!([1, 2])),
        ("/list/1", json!("two")),
        ("/b/c", json!({"replaced": null})),
    ] {
        model.set(path, value.clone());
        assert_eq!(model.get(path), Some(&value), "path {path}");
    }
}

#[test]
fn test_icn_swap_scenario() {
    let mut engine = Engine::default();
    engine.handle_batch(&messages(json!([
        {"createSurface": {"surfaceId": "s1"}},
        {"updateDataModel": {"surfaceId": "s1", "operations": [
            {"op": "add", "path": "/flight/from", "value": "ICN"}
        ]}}
    ])));
    let model = engine.registry().get("s1").unwrap().data_model();
    assert_eq!(model.get("/flight/from"), Some(&json!("ICN")));

    let mut table = a2ui_core::ActionTable::empty();
    table.insert(
        "swap",
        a2ui_core::LocalAction::Swap {
            first: "/flight/from".into(),
            second: "/flight/to".into(),
        },
    );
    let mut registry = engine.snapshot();
    let outcome = a2ui_core::dispatch(
        &mut registry,
        &table,
        ActionRequest::new("s1", "swap-btn", "swap"),
        true,
    );
    assert!(matches!(outcome, Dispatch::Local(_)));

    let model = registry.get("s1").unwrap().data_model();
    assert_eq!(model.get("/flight/from"), None);
    assert_eq!(model.get("/flight/to"), Some(&json!("ICN")));
}

#[test]
fn test_forwarded_action_wire_shape() {
    let mut engine = Engine::default();
    engine.handle_batch(&messages(json!([
        {"createSurface": {"surfaceId": "s1"}},
        {"updateDataModel": {"surfaceId": "s1", "operations": [
            {"op": "add", "path": "/passengers", "value": 2}
        ]}}
    ])));

    let Dispatch::Forward(message) =
        engine.handle_action(ActionRequest::new("s1", "search", "search-flights"))
    else {
        panic!("search should be forwarded")
    };
    let wire: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
    assert_eq!(
        wire,
        json!({"userAction": {
            "surfaceId": "s1",
            "componentId": "search",
            "action": "search-flights",
            "data": {"passengers": 2}
        }})
    );
    assert!(matches!(message, ClientMessage::UserAction(_)));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_drives_engine() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
attach_data_model = false

[local_actions.swap-dates]
kind = "swap"
first = "/dates/out"
second = "/dates/back"
"#
    )
    .unwrap();

    let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
    assert!(!config.attach_data_model);
    assert!(config.local_actions.is_local("swap-route"));
    assert!(config.local_actions.is_local("swap-dates"));

    let mut engine = Engine::new(config);
    engine.handle_batch(&messages(json!([
        {"createSurface": {"surfaceId": "s1"}},
        {"updateDataModel": {"surfaceId": "s1", "operations": [
            {"op": "add", "path": "/dates", "value": {"out": "2026-05-01", "back": "2026-05-09"}}
        ]}}
    ])));

    engine.handle_action(ActionRequest::new("s1", "swap", "swap-dates"));
    let model = engine.registry().get("s1").unwrap().data_model();
    assert_eq!(model.get("/dates/out"), Some(&json!("2026-05-09")));

    let Dispatch::Forward(ClientMessage::UserAction(action)) =
        engine.handle_action(ActionRequest::new("s1", "go", "search"))
    else {
        panic!("search should be forwarded")
    };
    assert_eq!(action.data, None);
}
