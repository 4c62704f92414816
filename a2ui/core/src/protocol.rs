//! Wire Protocol
//!
//! JSON messages exchanged with the agent that produces surfaces.
//!
//! # Inbound
//!
//! Each server message is an object tagged by which singleton key it carries:
//!
//! ```text
//! { "createSurface":    { "surfaceId": "...", "catalogId": "..." } }
//! { "updateComponents": { "surfaceId": "...", "components": [...] } }
//! { "updateDataModel":  { "surfaceId": "...", "operations": [...] } }
//! { "deleteSurface":    { "surfaceId": "..." } }
//! { "assistantMessage": "...", "reasoning": "..." }
//! ```
//!
//! Any other key decodes to [`ServerMessage::Unknown`] so that newer producers
//! do not break older clients.
//!
//! # Outbound
//!
//! [`ClientMessage`] is either a `userAction` event or plain chat text.
//!
//! # Streaming
//!
//! A streaming transport reports progress as [`StreamEvent`]s tagged by
//! `type`, ending in `done` (carrying the message batch) or `error`.

use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::component::Component;
use crate::data_model::Operation;
use crate::registry::SurfaceId;

const CREATE_SURFACE: &str = "createSurface";
const UPDATE_COMPONENTS: &str = "updateComponents";
const UPDATE_DATA_MODEL: &str = "updateDataModel";
const DELETE_SURFACE: &str = "deleteSurface";
const ASSISTANT_MESSAGE: &str = "assistantMessage";
const REASONING: &str = "reasoning";

/// Error string a transport reports when the user cancelled the request
pub const ABORTED: &str = "aborted";

/// Errors decoding protocol input
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The document is not JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document is JSON but neither a message nor a list of messages
    #[error("expected a message object or array, got {0}")]
    NotAMessage(&'static str),

    /// A recognised message whose payload has the wrong shape
    #[error("malformed {kind} message: {source}")]
    InvalidMessage {
        /// Message kind
        kind: &'static str,
        /// Decoding failure
        source: serde_json::Error,
    },

    /// `assistantMessage` whose value is not a string
    #[error("assistantMessage must be a string")]
    InvalidAssistantText,
}

/// Payload of `createSurface`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurface {
    /// New surface id
    pub surface_id: SurfaceId,
    /// Catalog the surface's components come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<String>,
}

/// Payload of `updateComponents`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponents {
    /// Target surface
    pub surface_id: SurfaceId,
    /// Definitions to upsert, in order
    #[serde(default, deserialize_with = "lenient_components")]
    pub components: Vec<Component>,
}

/// Payload of `updateDataModel`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDataModel {
    /// Target surface
    pub surface_id: SurfaceId,
    /// Operations to apply, in order
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Payload of `deleteSurface`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    /// Surface to delete
    pub surface_id: SurfaceId,
}

/// Chat text from the agent, routed to chat history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantMessage {
    /// Answer text
    pub text: String,
    /// Optional reasoning shown alongside
    pub reasoning: Option<String>,
}

/// A message from the producer
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Create (or replace) a surface
    CreateSurface(CreateSurface),
    /// Upsert component definitions
    UpdateComponents(UpdateComponents),
    /// Patch the data model
    UpdateDataModel(UpdateDataModel),
    /// Remove a surface
    DeleteSurface(DeleteSurface),
    /// Chat text, not a registry mutation
    AssistantMessage(AssistantMessage),
    /// A message kind this client does not know
    Unknown {
        /// First key of the object, if any
        kind: String,
    },
}

impl ServerMessage {
    /// Decode one message from a JSON value
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or if a recognised
    /// message kind has a malformed payload.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Err(ProtocolError::NotAMessage(json_type(&other))),
        };

        if let Some(text) = map.remove(ASSISTANT_MESSAGE) {
            let Value::String(text) = text else {
                return Err(ProtocolError::InvalidAssistantText);
            };
            let reasoning = match map.remove(REASONING) {
                Some(Value::String(reasoning)) => Some(reasoning),
                _ => None,
            };
            return Ok(Self::AssistantMessage(AssistantMessage { text, reasoning }));
        }

        if map.contains_key(CREATE_SURFACE) {
            payload(&mut map, CREATE_SURFACE).map(Self::CreateSurface)
        } else if map.contains_key(UPDATE_COMPONENTS) {
            payload(&mut map, UPDATE_COMPONENTS).map(Self::UpdateComponents)
        } else if map.contains_key(UPDATE_DATA_MODEL) {
            payload(&mut map, UPDATE_DATA_MODEL).map(Self::UpdateDataModel)
        } else if map.contains_key(DELETE_SURFACE) {
            payload(&mut map, DELETE_SURFACE).map(Self::DeleteSurface)
        } else {
            Ok(Self::Unknown {
                kind: map.keys().next().cloned().unwrap_or_default(),
            })
        }
    }

    /// Wire name of this message kind
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::CreateSurface(_) => CREATE_SURFACE,
            Self::UpdateComponents(_) => UPDATE_COMPONENTS,
            Self::UpdateDataModel(_) => UPDATE_DATA_MODEL,
            Self::DeleteSurface(_) => DELETE_SURFACE,
            Self::AssistantMessage(_) => ASSISTANT_MESSAGE,
            Self::Unknown { kind } => kind,
        }
    }

    /// Surface this message targets, if any
    #[must_use]
    pub fn surface_id(&self) -> Option<&SurfaceId> {
        match self {
            Self::CreateSurface(m) => Some(&m.surface_id),
            Self::UpdateComponents(m) => Some(&m.surface_id),
            Self::UpdateDataModel(m) => Some(&m.surface_id),
            Self::DeleteSurface(m) => Some(&m.surface_id),
            Self::AssistantMessage(_) | Self::Unknown { .. } => None,
        }
    }
}

fn payload<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    kind: &'static str,
) -> Result<T, ProtocolError> {
    let value = map.remove(kind).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidMessage { kind, source })
}

/// Decode component definitions one entry at a time
///
/// An entry that does not decode (missing `id`, not an object) is logged and
/// skipped; its siblings are kept. A `components` value that is not an array
/// still fails the message.
fn lenient_components<'de, D>(deserializer: D) -> Result<Vec<Component>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(de::Error::custom(format!(
                "components must be an array, got {}",
                json_type(&other)
            )))
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(component) => Some(component),
            Err(e) => {
                tracing::warn!(index = index, error = %e, "Skipping malformed component");
                None
            }
        })
        .collect())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'de> Deserialize<'de> for ServerMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for ServerMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::CreateSurface(m) => map.serialize_entry(CREATE_SURFACE, m)?,
            Self::UpdateComponents(m) => map.serialize_entry(UPDATE_COMPONENTS, m)?,
            Self::UpdateDataModel(m) => map.serialize_entry(UPDATE_DATA_MODEL, m)?,
            Self::DeleteSurface(m) => map.serialize_entry(DELETE_SURFACE, m)?,
            Self::AssistantMessage(m) => {
                map.serialize_entry(ASSISTANT_MESSAGE, &m.text)?;
                if let Some(reasoning) = &m.reasoning {
                    map.serialize_entry(REASONING, reasoning)?;
                }
            }
            Self::Unknown { kind } => map.serialize_entry(kind, &Value::Null)?,
        }
        map.end()
    }
}

/// Decode a batch of server messages
///
/// Accepts a JSON array of messages or a single message object. Entries
/// that fail to decode are logged and skipped, so one bad message never
/// loses the rest of the batch.
///
/// # Errors
///
/// Returns an error if the text is not JSON, or is JSON of the wrong shape
/// (neither an object nor an array).
pub fn decode_batch(text: &str) -> Result<Vec<ServerMessage>, ProtocolError> {
    let document: Value = serde_json::from_str(text)?;
    decode_values(document)
}

/// Decode a batch from an already-parsed JSON value
///
/// # Errors
///
/// Returns an error if the value is neither an object nor an array.
pub fn decode_values(document: Value) -> Result<Vec<ServerMessage>, ProtocolError> {
    let items = match document {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => return Err(ProtocolError::NotAMessage(json_type(&other))),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match ServerMessage::from_value(item) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(index = index, error = %e, "Skipping malformed message");
                None
            }
        })
        .collect())
}

/// A user interaction forwarded to the producer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    /// Surface the interaction happened on
    pub surface_id: SurfaceId,
    /// Component that raised the action
    pub component_id: String,
    /// Action name
    pub action: String,
    /// Payload or data-model snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A message to the producer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    /// `{ "userAction": { ... } }`
    UserAction(UserAction),
    /// `{ "text": "..." }`
    Text(String),
}

impl ClientMessage {
    /// Encode as a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Progress event from a streaming request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Status line (e.g. "Searching flights...")
    Status {
        /// Status text
        text: String,
    },
    /// A reasoning step
    Thought {
        /// Thought text
        text: String,
    },
    /// A chunk of the answer
    Answer {
        /// Answer text chunk
        text: String,
    },
    /// The request completed
    Done {
        /// Server messages to apply
        #[serde(default)]
        messages: Vec<Value>,
        /// Final reasoning summary
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reasoning: Option<String>,
    },
    /// The request failed or was cancelled
    Error {
        /// Error text; [`ABORTED`] for cancellation
        error: String,
    },
}

impl StreamEvent {
    /// Whether this event ends the request
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}
