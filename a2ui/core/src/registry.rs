//! Surface Registry
//!
//! Owns every live surface, keyed by the producer-assigned [`SurfaceId`], and
//! tracks which one is active.
//!
//! # Activation
//!
//! ```text
//!   create A ──► active = A
//!   create B ──► active = B
//!   delete B ──► active = A      (most recent creation still present)
//!   delete A ──► active = none
//! ```
//!
//! Deleting a surface that is not active leaves activation alone.
//! Re-creating an existing id replaces it with a fresh surface and counts as
//! the most recent creation.
//!
//! # Snapshots
//!
//! A surface holds its component store and data model behind `Arc`s and
//! mutates them through `Arc::make_mut`. Cloning the registry is therefore
//! cheap, and a clone handed to a renderer never observes later mutations.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::data_model::{DataModel, Operation};
use crate::now_ms;
use crate::store::{ComponentStore, ResolvedNode};

/// Producer-assigned surface identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Create a surface ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SurfaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Bookkeeping about a surface, not interpreted by the engine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceMetadata {
    /// Catalog the producer declared for this surface
    pub catalog_id: Option<String>,
    /// Monotonic creation order within the registry
    pub created_seq: u64,
    /// Number of mutations applied since creation
    pub revision: u64,
    /// Creation time (ms since epoch)
    pub created_at_ms: u64,
    /// Time of the last mutation (ms since epoch)
    pub updated_at_ms: u64,
}

/// One independent UI instance
#[derive(Clone, Debug)]
pub struct Surface {
    /// Surface identifier
    pub id: SurfaceId,
    /// Bookkeeping
    pub metadata: SurfaceMetadata,
    components: Arc<ComponentStore>,
    data_model: Arc<DataModel>,
}

impl Surface {
    fn new(id: SurfaceId, catalog_id: Option<String>, created_seq: u64) -> Self {
        let now = now_ms();
        Self {
            id,
            metadata: SurfaceMetadata {
                catalog_id,
                created_seq,
                revision: 0,
                created_at_ms: now,
                updated_at_ms: now,
            },
            components: Arc::new(ComponentStore::new()),
            data_model: Arc::new(DataModel::new()),
        }
    }

    /// The component store
    #[must_use]
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// The data model
    #[must_use]
    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    /// Shared snapshot of the component store
    #[must_use]
    pub fn components_snapshot(&self) -> Arc<ComponentStore> {
        Arc::clone(&self.components)
    }

    /// Shared snapshot of the data model
    #[must_use]
    pub fn data_model_snapshot(&self) -> Arc<DataModel> {
        Arc::clone(&self.data_model)
    }

    /// Upsert component definitions
    pub fn update_components<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = Component>,
    {
        Arc::make_mut(&mut self.components).upsert(components);
        self.touch();
    }

    /// Apply data-model operations in order
    ///
    /// Returns how many were applied; unknown kinds are skipped.
    pub fn apply_operations(&mut self, operations: &[Operation]) -> usize {
        let model = Arc::make_mut(&mut self.data_model);
        let applied = operations.iter().filter(|op| model.apply(op)).count();
        self.touch();
        applied
    }

    /// Mutable data model for local edits
    pub(crate) fn data_model_mut(&mut self) -> &mut DataModel {
        self.touch();
        Arc::make_mut(&mut self.data_model)
    }

    /// Component tree, before visibility filtering
    #[must_use]
    pub fn tree(&self) -> Option<ResolvedNode<'_>> {
        self.components.resolve_tree()
    }

    /// Component tree with hidden subtrees removed
    #[must_use]
    pub fn visible_tree(&self) -> Option<ResolvedNode<'_>> {
        self.tree()?.filter_visible(&self.data_model)
    }

    fn touch(&mut self) {
        self.metadata.revision += 1;
        self.metadata.updated_at_ms = now_ms();
    }
}

/// All live surfaces plus the active pointer
#[derive(Clone, Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Surface>,
    active: Option<SurfaceId>,
    next_seq: u64,
}

impl SurfaceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a surface and make it active
    pub fn create_surface(&mut self, id: SurfaceId, catalog_id: Option<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let replaced = self
            .surfaces
            .insert(id.clone(), Surface::new(id.clone(), catalog_id, seq))
            .is_some();

        if replaced {
            tracing::info!(surface_id = %id, "Surface re-created");
        } else {
            tracing::info!(surface_id = %id, "Surface created");
        }
        self.active = Some(id);
    }

    /// Delete a surface
    ///
    /// Unknown ids are a no-op. If the deleted surface was active, the most
    /// recently created remaining surface becomes active.
    pub fn delete_surface(&mut self, id: &str) -> Option<Surface> {
        let Some(removed) = self.surfaces.remove(id) else {
            tracing::debug!(surface_id = %id, "Delete for unknown surface ignored");
            return None;
        };

        if self.active.as_ref().is_some_and(|active| active.as_str() == id) {
            self.active = self.most_recent();
            tracing::info!(
                surface_id = %id,
                active = ?self.active.as_ref().map(SurfaceId::as_str),
                "Active surface deleted"
            );
        } else {
            tracing::info!(surface_id = %id, "Surface deleted");
        }
        Some(removed)
    }

    /// Delete whichever surface is active (local dismissal)
    pub fn close_active_surface(&mut self) -> Option<Surface> {
        let active = self.active.clone()?;
        self.delete_surface(active.as_str())
    }

    fn most_recent(&self) -> Option<SurfaceId> {
        self.surfaces
            .values()
            .max_by_key(|surface| surface.metadata.created_seq)
            .map(|surface| surface.id.clone())
    }

    /// Look up a surface
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Surface> {
        self.surfaces.get_mut(id)
    }

    /// Whether a surface exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    /// The active surface's id
    #[must_use]
    pub fn active_id(&self) -> Option<&SurfaceId> {
        self.active.as_ref()
    }

    /// The active surface
    #[must_use]
    pub fn active(&self) -> Option<&Surface> {
        self.active.as_ref().and_then(|id| self.surfaces.get(id))
    }

    /// Number of live surfaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surfaces exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Surface ids in creation order
    #[must_use]
    pub fn ids(&self) -> Vec<&SurfaceId> {
        let mut surfaces: Vec<&Surface> = self.surfaces.values().collect();
        surfaces.sort_by_key(|surface| surface.metadata.created_seq);
        surfaces.into_iter().map(|surface| &surface.id).collect()
    }

    /// Drop every surface
    pub fn clear(&mut self) {
        let count = self.surfaces.len();
        self.surfaces.clear();
        self.active = None;
        tracing::info!(count = count, "Registry cleared");
    }

    /// Get a summary of the registry
    #[must_use]
    pub fn summary(&self) -> RegistrySummary {
        let mut by_catalog: HashMap<String, usize> = HashMap::new();
        let mut total_components = 0;

        for surface in self.surfaces.values() {
            total_components += surface.components().len();
            if let Some(catalog) = &surface.metadata.catalog_id {
                *by_catalog.entry(catalog.clone()).or_insert(0) += 1;
            }
        }

        RegistrySummary {
            total_surfaces: self.surfaces.len(),
            active: self.active.clone(),
            total_components,
            by_catalog,
        }
    }
}

/// Summary of registry state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Number of live surfaces
    pub total_surfaces: usize,
    /// Active surface, if any
    pub active: Option<SurfaceId>,
    /// Components across all surfaces
    pub total_components: usize,
    /// Surface count per declared catalog
    pub by_catalog: HashMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;
    use serde_json::json;

    fn registry_with(ids: &[&str]) -> SurfaceRegistry {
        let mut registry = SurfaceRegistry::new();
        for id in ids {
            registry.create_surface(SurfaceId::from(*id), None);
        }
        registry
    }

    #[test]
    fn test_surface_id_display() {
        let id = SurfaceId::new("booking");
        assert_eq!(id.to_string(), "booking");
        assert_eq!(id.as_str(), "booking");
    }

    #[test]
    fn test_create_makes_active() {
        let registry = registry_with(&["a", "b"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("b"));
        let surface = registry.active().unwrap();
        assert!(surface.components().is_empty());
        assert!(surface.data_model().is_empty());
    }

    #[test]
    fn test_active_fallback_on_delete() {
        let mut registry = registry_with(&["A", "B"]);
        assert!(registry.delete_surface("B").is_some());
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("A"));
        assert!(registry.delete_surface("A").is_some());
        assert!(registry.active_id().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fallback_uses_creation_order() {
        let mut registry = registry_with(&["A", "B", "C"]);
        registry.delete_surface("B");
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("C"));
        registry.delete_surface("C");
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("A"));
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let mut registry = registry_with(&["A", "B"]);
        registry.delete_surface("A");
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("B"));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut registry = registry_with(&["A"]);
        assert!(registry.delete_surface("nope").is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("A"));
    }

    #[test]
    fn test_close_active_surface() {
        let mut registry = registry_with(&["A", "B"]);
        let closed = registry.close_active_surface().unwrap();
        assert_eq!(closed.id.as_str(), "B");
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("A"));
        registry.close_active_surface();
        assert!(registry.close_active_surface().is_none());
    }

    #[test]
    fn test_recreate_replaces_and_becomes_most_recent() {
        let mut registry = registry_with(&["A", "B"]);
        registry
            .get_mut("A")
            .unwrap()
            .update_components([Component::new("root", ComponentKind::Column)]);

        registry.create_surface(SurfaceId::from("A"), Some("catalog-2".into()));
        let recreated = registry.get("A").unwrap();
        assert!(recreated.components().is_empty());
        assert_eq!(recreated.metadata.catalog_id.as_deref(), Some("catalog-2"));
        assert_eq!(registry.len(), 2);

        registry.delete_surface("A");
        assert_eq!(registry.active_id().map(SurfaceId::as_str), Some("B"));

        let ids: Vec<&str> = registry.ids().into_iter().map(SurfaceId::as_str).collect();
        assert_eq!(ids, vec!["B"]);
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let mut registry = registry_with(&["s1"]);
        registry.get_mut("s1").unwrap().apply_operations(&[Operation::Add {
            path: "/n".into(),
            value: json!(1),
        }]);

        let snapshot = registry.clone();
        let held = registry.get("s1").unwrap().data_model_snapshot();

        registry
            .get_mut("s1")
            .unwrap()
            .data_model_mut()
            .set("/n", json!(2));

        assert_eq!(snapshot.get("s1").unwrap().data_model().get("/n"), Some(&json!(1)));
        assert_eq!(held.get("/n"), Some(&json!(1)));
        assert_eq!(registry.get("s1").unwrap().data_model().get("/n"), Some(&json!(2)));
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut registry = registry_with(&["s1"]);
        let surface = registry.get_mut("s1").unwrap();
        assert_eq!(surface.metadata.revision, 0);
        surface.update_components([Component::new("root", ComponentKind::Row)]);
        surface.apply_operations(&[Operation::Unknown]);
        assert_eq!(surface.metadata.revision, 2);
    }

    #[test]
    fn test_registry_summary() {
        let mut registry = SurfaceRegistry::new();
        registry.create_surface("a".into(), Some("basic".into()));
        registry.create_surface("b".into(), Some("basic".into()));
        registry.create_surface("c".into(), None);
        registry
            .get_mut("c")
            .unwrap()
            .update_components([Component::new("root", ComponentKind::Column)]);

        let summary = registry.summary();
        assert_eq!(summary.total_surfaces, 3);
        assert_eq!(summary.total_components, 1);
        assert_eq!(summary.by_catalog.get("basic"), Some(&2));
        assert_eq!(summary.active, Some(SurfaceId::from("c")));
    }

    #[test]
    fn test_clear() {
        let mut registry = registry_with(&["a", "b"]);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.active().is_none());
    }
}
