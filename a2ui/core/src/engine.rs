//! Engine - Single-Owner State Container
//!
//! The [`Engine`] owns the surface registry, the action table and the chat
//! history. Every mutation goes through one of its entry points, so state
//! changes happen in one place and in one order.
//!
//! # Architecture
//!
//! ```text
//!   transport batches ─┐
//!   user actions ──────┼──► Inbound queue ──► reducer task ──► Engine
//!   value changes ─────┤      (mpsc)          (one writer)       │
//!   stream events ─────┘                                         │
//!                                               ClientMessage ◄──┘
//!                                              (forwarded actions,
//!                                               user text)
//! ```
//!
//! Readers take a [`SurfaceRegistry`] snapshot through [`EngineHandle`]; a
//! snapshot shares unchanged surfaces with the live registry and is never
//! affected by later writes.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::{dispatch, ActionRequest, Dispatch};
use crate::chat::{ChatEntry, ChatHistory, ChatLog};
use crate::config::EngineConfig;
use crate::protocol::{decode_values, ClientMessage, ServerMessage, StreamEvent};
use crate::reducer::{apply_batch, apply_message, BatchReport, Reduction};
use crate::registry::{SurfaceId, SurfaceRegistry};
use crate::transport::{RequestOutcome, TransportError};

/// Inbound queue depth for [`spawn_reducer`]
const QUEUE_CAPACITY: usize = 256;

/// Progress of the current streaming request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamProgress {
    /// Latest status line
    pub status: Option<String>,
    /// Reasoning steps so far
    pub thoughts: Vec<String>,
    /// Answer text accumulated from chunks
    pub answer: String,
}

impl StreamProgress {
    /// Whether nothing has arrived yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.thoughts.is_empty() && self.answer.is_empty()
    }
}

/// Owns all client-side A2UI state
pub struct Engine {
    registry: SurfaceRegistry,
    config: EngineConfig,
    chat: Box<dyn ChatHistory>,
    progress: StreamProgress,
    last_outcome: Option<RequestOutcome>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("chat_entries", &self.chat.entries().len())
            .field("progress", &self.progress)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with an in-memory chat log
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_chat(config, Box::new(ChatLog::new()))
    }

    /// Create an engine with a custom chat history
    #[must_use]
    pub fn with_chat(config: EngineConfig, chat: Box<dyn ChatHistory>) -> Self {
        tracing::debug!(
            attach_data_model = config.attach_data_model,
            local_actions = config.local_actions.len(),
            source = %config.source(),
            "Engine created"
        );
        Self {
            registry: SurfaceRegistry::new(),
            config,
            chat,
            progress: StreamProgress::default(),
            last_outcome: None,
        }
    }

    // =========================================================================
    // Server messages
    // =========================================================================

    /// Apply a batch of server messages in order
    ///
    /// Assistant messages in the batch are recorded as agent chat entries.
    pub fn handle_batch(&mut self, messages: &[ServerMessage]) -> BatchReport {
        let report = apply_batch(&mut self.registry, messages);
        for message in &report.chat {
            self.chat
                .record(ChatEntry::agent(message.text.clone(), message.reasoning.clone()));
        }
        tracing::debug!(
            mutated = report.mutated,
            ignored = report.ignored,
            chat = report.chat.len(),
            "Batch applied"
        );
        report
    }

    /// Apply one server message
    pub fn handle_message(&mut self, message: &ServerMessage) -> Reduction {
        let reduction = apply_message(&mut self.registry, message);
        if let Reduction::Chat(chat) = &reduction {
            self.chat
                .record(ChatEntry::agent(chat.text.clone(), chat.reasoning.clone()));
        }
        reduction
    }

    // =========================================================================
    // Presentation callbacks
    // =========================================================================

    /// Resolve or forward an action raised on a surface
    pub fn handle_action(&mut self, request: ActionRequest) -> Dispatch {
        dispatch(
            &mut self.registry,
            &self.config.local_actions,
            request,
            self.config.attach_data_model,
        )
    }

    /// Write an edited input value into a surface's data model
    ///
    /// Purely local; nothing is sent to the producer. Returns false if the
    /// surface does not exist.
    pub fn update_value(&mut self, surface_id: &str, path: &str, value: Value) -> bool {
        match self.registry.get_mut(surface_id) {
            Some(surface) => {
                surface.data_model_mut().set(path, value);
                tracing::trace!(surface_id = %surface_id, path = %path, "Value updated");
                true
            }
            None => {
                tracing::warn!(surface_id = %surface_id, path = %path, "Value change for unknown surface");
                false
            }
        }
    }

    /// Record a user prompt and build the message to send
    ///
    /// Blank prompts produce nothing.
    pub fn send_text(&mut self, text: &str) -> Option<ClientMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.chat.record(ChatEntry::user(text));
        self.progress = StreamProgress::default();
        Some(ClientMessage::Text(text.to_string()))
    }

    /// Fold a streaming event into the engine
    ///
    /// Returns the request outcome once a terminal event arrives. The server
    /// messages carried by `done` are applied as one batch. A cancelled
    /// request ends silently; other failures are recorded in chat.
    pub fn handle_stream_event(&mut self, event: StreamEvent) -> Option<RequestOutcome> {
        match event {
            StreamEvent::Status { text } => {
                self.progress.status = Some(text);
                None
            }
            StreamEvent::Thought { text } => {
                self.progress.thoughts.push(text);
                None
            }
            StreamEvent::Answer { text } => {
                self.progress.answer.push_str(&text);
                None
            }
            StreamEvent::Done {
                messages,
                reasoning,
            } => {
                let progress = std::mem::take(&mut self.progress);
                let batch = decode_values(Value::Array(messages)).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Undecodable messages in stream result");
                    Vec::new()
                });
                if !progress.answer.is_empty() {
                    let reasoning = reasoning.or_else(|| {
                        (!progress.thoughts.is_empty()).then(|| progress.thoughts.join("\n"))
                    });
                    self.chat.record(ChatEntry::agent(progress.answer, reasoning));
                }
                self.handle_batch(&batch);
                Some(RequestOutcome::Completed)
            }
            StreamEvent::Error { error } => {
                self.progress = StreamProgress::default();
                let outcome =
                    RequestOutcome::from_result::<()>(&Err(TransportError::from_event(&error)));
                match &outcome {
                    RequestOutcome::Failed(reason) => {
                        tracing::warn!(error = %reason, "Request failed");
                        self.chat.record(ChatEntry::agent(format!("Error: {reason}"), None));
                    }
                    _ => tracing::info!("Request aborted"),
                }
                Some(outcome)
            }
        }
    }

    /// Close the active surface, falling back to the newest remaining one
    pub fn close_active_surface(&mut self) -> Option<SurfaceId> {
        self.registry
            .close_active_surface()
            .map(|surface| surface.id)
    }

    /// Drop all surfaces, chat history and stream progress
    pub fn reset(&mut self) {
        self.registry.clear();
        self.chat.clear();
        self.progress = StreamProgress::default();
        self.last_outcome = None;
        tracing::info!("Engine reset");
    }

    /// Apply one queued input
    ///
    /// Returns the message to send to the producer, if any.
    pub fn apply(&mut self, inbound: Inbound) -> Option<ClientMessage> {
        match inbound {
            Inbound::Batch(messages) => {
                self.handle_batch(&messages);
                None
            }
            Inbound::Action(request) => match self.handle_action(request) {
                Dispatch::Forward(message) => Some(message),
                Dispatch::Local(_) | Dispatch::Dropped => None,
            },
            Inbound::ValueChange {
                surface_id,
                path,
                value,
            } => {
                self.update_value(surface_id.as_str(), &path, value);
                None
            }
            Inbound::Text(text) => self.send_text(&text),
            Inbound::Stream(event) => {
                if let Some(outcome) = self.handle_stream_event(event) {
                    tracing::debug!(outcome = ?outcome, "Streaming request finished");
                    self.last_outcome = Some(outcome);
                }
                None
            }
            Inbound::CloseActiveSurface => {
                self.close_active_surface();
                None
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Copy-on-write snapshot of the registry
    #[must_use]
    pub fn snapshot(&self) -> SurfaceRegistry {
        self.registry.clone()
    }

    /// The live registry
    #[must_use]
    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Chat history
    #[must_use]
    pub fn chat(&self) -> &dyn ChatHistory {
        self.chat.as_ref()
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Progress of the current streaming request
    #[must_use]
    pub fn progress(&self) -> &StreamProgress {
        &self.progress
    }

    /// How the last queued streaming request ended
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RequestOutcome> {
        self.last_outcome.as_ref()
    }
}

/// Input to the single-writer queue
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// A batch of server messages
    Batch(Vec<ServerMessage>),
    /// An action raised on a surface
    Action(ActionRequest),
    /// An input value edited by the user
    ValueChange {
        /// Surface holding the input
        surface_id: SurfaceId,
        /// Bound path
        path: String,
        /// New value
        value: Value,
    },
    /// A user prompt
    Text(String),
    /// A streaming progress event
    Stream(StreamEvent),
    /// Close the active surface
    CloseActiveSurface,
}

/// Shared handle to an [`Engine`]
///
/// Cheap to clone. Never hold a guard across an `.await`.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    inner: Arc<RwLock<Engine>>,
}

impl EngineHandle {
    /// Wrap an engine
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Read access to the engine
    pub fn read(&self) -> RwLockReadGuard<'_, Engine> {
        self.inner.read()
    }

    /// Registry snapshot
    #[must_use]
    pub fn snapshot(&self) -> SurfaceRegistry {
        self.inner.read().snapshot()
    }

    /// Apply one input immediately
    pub fn submit(&self, inbound: Inbound) -> Option<ClientMessage> {
        self.inner.write().apply(inbound)
    }
}

/// Start the single-writer reducer task
///
/// Returns:
/// - `mpsc::Sender<Inbound>`: producers of every kind enqueue input here
/// - `mpsc::Receiver<ClientMessage>`: messages for the producer come out here
/// - `JoinHandle<()>`: ends once every `Sender` is dropped
#[must_use]
pub fn spawn_reducer(
    handle: EngineHandle,
) -> (
    mpsc::Sender<Inbound>,
    mpsc::Receiver<ClientMessage>,
    JoinHandle<()>,
) {
    let (in_tx, mut in_rx) = mpsc::channel::<Inbound>(QUEUE_CAPACITY);
    let (out_tx, out_rx) = mpsc::channel::<ClientMessage>(QUEUE_CAPACITY);

    let task = tokio::spawn(async move {
        while let Some(inbound) = in_rx.recv().await {
            let outbound = handle.submit(inbound);
            if let Some(message) = outbound {
                if out_tx.send(message).await.is_err() {
                    tracing::debug!("Outbound receiver dropped; message discarded");
                }
            }
        }
        tracing::debug!("Reducer queue closed");
    });

    (in_tx, out_rx, task)
}
