//! Message Reducer
//!
//! Folds server messages into a [`SurfaceRegistry`], strictly in order.
//!
//! | message            | effect                                   |
//! |--------------------|------------------------------------------|
//! | `createSurface`    | create (or replace) and activate         |
//! | `updateComponents` | upsert into the target component store   |
//! | `updateDataModel`  | apply operations to the target model     |
//! | `deleteSurface`    | delete, with activation fallback         |
//! | `assistantMessage` | no registry change; returned for chat    |
//!
//! Messages aimed at a surface that does not exist are no-ops. Applying a
//! batch is exactly applying its messages one by one.

use crate::protocol::{AssistantMessage, ServerMessage};
use crate::registry::{SurfaceId, SurfaceRegistry};

/// Why a message left the registry unchanged
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The target surface does not exist
    UnknownSurface(SurfaceId),
    /// The message kind is not understood
    UnknownKind(String),
}

/// Outcome of applying one message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// The registry changed
    Mutated,
    /// Nothing changed
    Ignored(IgnoreReason),
    /// Chat text for the history collaborator
    Chat(AssistantMessage),
}

/// Apply a single message
pub fn apply_message(registry: &mut SurfaceRegistry, message: &ServerMessage) -> Reduction {
    match message {
        ServerMessage::CreateSurface(m) => {
            registry.create_surface(m.surface_id.clone(), m.catalog_id.clone());
            Reduction::Mutated
        }
        ServerMessage::UpdateComponents(m) => match registry.get_mut(m.surface_id.as_str()) {
            Some(surface) => {
                surface.update_components(m.components.iter().cloned());
                tracing::debug!(
                    surface_id = %m.surface_id,
                    count = m.components.len(),
                    "Components updated"
                );
                Reduction::Mutated
            }
            None => unknown_surface(&m.surface_id, message.kind()),
        },
        ServerMessage::UpdateDataModel(m) => match registry.get_mut(m.surface_id.as_str()) {
            Some(surface) => {
                let applied = surface.apply_operations(&m.operations);
                tracing::debug!(
                    surface_id = %m.surface_id,
                    applied = applied,
                    skipped = m.operations.len() - applied,
                    "Data model updated"
                );
                Reduction::Mutated
            }
            None => unknown_surface(&m.surface_id, message.kind()),
        },
        ServerMessage::DeleteSurface(m) => match registry.delete_surface(m.surface_id.as_str()) {
            Some(_) => Reduction::Mutated,
            None => unknown_surface(&m.surface_id, message.kind()),
        },
        ServerMessage::AssistantMessage(m) => Reduction::Chat(m.clone()),
        ServerMessage::Unknown { kind } => {
            tracing::debug!(kind = %kind, "Ignoring unknown message kind");
            Reduction::Ignored(IgnoreReason::UnknownKind(kind.clone()))
        }
    }
}

fn unknown_surface(id: &SurfaceId, kind: &str) -> Reduction {
    tracing::warn!(surface_id = %id, kind = %kind, "Message targets unknown surface");
    Reduction::Ignored(IgnoreReason::UnknownSurface(id.clone()))
}

/// Summary of applying a batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Messages that changed the registry
    pub mutated: usize,
    /// Messages that changed nothing
    pub ignored: usize,
    /// Chat messages, in arrival order
    pub chat: Vec<AssistantMessage>,
}

impl BatchReport {
    /// Fold one reduction into the report
    pub fn record(&mut self, reduction: Reduction) {
        match reduction {
            Reduction::Mutated => self.mutated += 1,
            Reduction::Ignored(_) => self.ignored += 1,
            Reduction::Chat(message) => self.chat.push(message),
        }
    }

    /// Total messages seen
    #[must_use]
    pub fn total(&self) -> usize {
        self.mutated + self.ignored + self.chat.len()
    }
}

/// Apply messages in list order
pub fn apply_batch(registry: &mut SurfaceRegistry, messages: &[ServerMessage]) -> BatchReport {
    let mut report = BatchReport::default();
    for message in messages {
        report.record(apply_message(registry, message));
    }
    report
}

/// Fold messages into a copy of `registry`, leaving the input untouched
#[must_use]
pub fn reduce(registry: &SurfaceRegistry, messages: &[ServerMessage]) -> SurfaceRegistry {
    let mut next = registry.clone();
    apply_batch(&mut next, messages);
    next
}
