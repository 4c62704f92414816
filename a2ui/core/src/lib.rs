//! A2UI Core - Headless State Reconciliation for Agent-Driven UIs
//!
//! An agent drives user interfaces by streaming declarative messages: create
//! a surface, upsert its flat list of components, patch its JSON data model,
//! delete it. This crate folds those messages into client-side state and
//! resolves what should be displayed, with no dependency on any UI framework
//! or network stack.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Producer (agent server)                      │
//! └───────────────┬──────────────────────────────────▲───────────────┘
//!                 │ ServerMessage batches            │ ClientMessage
//!                 │ (via Transport)                  │ (userAction, text)
//! ┌───────────────▼──────────────────────────────────┴───────────────┐
//! │                           A2UI CORE                              │
//! │  ┌──────────┐   ┌──────────────────────────────────────────────┐ │
//! │  │ protocol │──►│ Engine (single writer)                       │ │
//! │  └──────────┘   │  ┌──────────┐  ┌──────────┐  ┌────────────┐  │ │
//! │                 │  │ reducer  │─►│ registry │  │  action    │  │ │
//! │                 │  └──────────┘  │ surfaces │◄─│  dispatch  │  │ │
//! │                 │                └────┬─────┘  └────────────┘  │ │
//! │                 └─────────────────────┼────────────────────────┘ │
//! │        ┌──────────────┬───────────────┼──────────────┐           │
//! │   ┌────▼────┐   ┌─────▼─────┐   ┌─────▼──────┐  ┌────▼──────┐    │
//! │   │  store  │   │data_model │   │ condition  │  │   path    │    │
//! │   │ (tree)  │   │ (patches) │   │(visibility)│  │ resolver  │    │
//! │   └─────────┘   └───────────┘   └────────────┘  └───────────┘    │
//! └───────────────────────────────┬──────────────────────────────────┘
//!                                 │ SurfaceView (filtered tree + model)
//! ┌───────────────────────────────▼──────────────────────────────────┐
//! │                    Presenter (TUI, web, replay)                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`path`]: Slash-separated paths into JSON documents
//! - [`condition`]: `visible` expressions (`/path == 'literal'`)
//! - [`data_model`]: Per-surface JSON document and patch operations
//! - [`component`]: Component definitions and their typed properties
//! - [`store`]: Flat component store and tree resolution from `root`
//! - [`registry`]: Surfaces, their lifecycle and the active surface
//! - [`protocol`]: Wire messages in both directions
//! - [`reducer`]: Folding server messages into the registry
//! - [`action`]: Local resolution or forwarding of user actions
//! - [`chat`]: Chat history collaborator
//! - [`transport`]: Transport collaborator and cancellation
//! - [`config`]: Engine configuration (defaults, file, environment)
//! - [`engine`]: Single-owner state container and reducer task
//! - [`view`]: Values a presenter derives from the data model
//!
//! # Degradation
//!
//! Malformed or out-of-order input never fails a batch. Unknown surfaces,
//! unknown message kinds, dangling children, cycles and malformed conditions
//! all degrade to a no-op (or a visible component) with a `tracing` event.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod chat;
pub mod component;
pub mod condition;
pub mod config;
pub mod data_model;
pub mod engine;
pub mod path;
pub mod protocol;
pub mod reducer;
pub mod registry;
pub mod store;
pub mod transport;
pub mod view;

// Re-exports for convenience
pub use action::{dispatch, ActionRequest, ActionTable, Dispatch, LocalAction};
pub use chat::{ChatEntry, ChatHistory, ChatLog, ChatRole};
pub use component::{ChoiceOption, Component, ComponentKind, DateBound, OptionsSource, ROOT_ID};
pub use condition::Condition;
pub use config::{load_config, ConfigError, ConfigOverrides, ConfigSource, EngineConfig};
pub use data_model::{DataModel, Operation};
pub use engine::{spawn_reducer, Engine, EngineHandle, Inbound, StreamProgress};
pub use path::DataPath;
pub use protocol::{
    decode_batch, decode_values, ClientMessage, ProtocolError, ServerMessage, StreamEvent,
    UserAction,
};
pub use reducer::{apply_batch, apply_message, reduce, BatchReport, Reduction};
pub use registry::{RegistrySummary, Surface, SurfaceId, SurfaceRegistry};
pub use store::{ComponentStore, ResolvedNode};
pub use transport::{InProcessTransport, RequestOutcome, Transport, TransportError};
pub use view::{Presenter, SurfaceView};

/// Current Unix time in milliseconds
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
