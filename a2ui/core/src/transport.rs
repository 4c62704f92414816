//! Transport Boundary
//!
//! The engine never performs I/O. A transport delivers ordered batches of
//! server messages and accepts one outbound [`ClientMessage`] at a time; the
//! host loop moves data between the two.
//!
//! # Cancellation
//!
//! A request may be cancelled while in flight. Cancellation is reported as
//! [`TransportError::Aborted`], which callers must treat as a normal outcome
//! rather than a fault: no error text is shown for it. A forwarded action
//! may therefore never receive a response.
//!
//! Responses arrive in request order. Cancelling marks every outstanding
//! response as stale, and `recv` drops stale responses before returning a
//! live one, so a late answer to a cancelled request is never applied even
//! after a new request has been sent.

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ServerMessage, ABORTED};

/// Transport failures
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request was cancelled by the user
    #[error("request aborted")]
    Aborted,

    /// The request failed
    #[error("transport failed: {0}")]
    Failed(String),

    /// The peer went away
    #[error("connection closed")]
    ConnectionClosed,
}

impl TransportError {
    /// Map an error string from a streaming `error` event
    #[must_use]
    pub fn from_event(error: &str) -> Self {
        if error == ABORTED {
            Self::Aborted
        } else {
            Self::Failed(error.to_string())
        }
    }
}

/// How a request ended, as seen by the user-facing layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A response arrived
    Completed,
    /// The user cancelled; nothing to report
    Aborted,
    /// The request failed with a message worth showing
    Failed(String),
}

impl RequestOutcome {
    /// Classify a transport result
    #[must_use]
    pub fn from_result<T>(result: &Result<T, TransportError>) -> Self {
        match result {
            Ok(_) => Self::Completed,
            Err(TransportError::Aborted) => Self::Aborted,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Whether the user should see an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Message transport to and from the producer
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one outbound message
    async fn send(&self, message: ClientMessage) -> Result<(), TransportError>;

    /// Wait for the next batch of server messages
    async fn recv(&mut self) -> Result<Vec<ServerMessage>, TransportError>;

    /// Cancel the in-flight request, if any
    ///
    /// Returns true if something was cancelled.
    fn cancel(&self) -> bool;
}

/// Responses still owed by the producer
#[derive(Debug, Default)]
struct RequestLedger {
    /// Requests sent whose batch has not arrived
    outstanding: usize,
    /// How many of the oldest outstanding requests were cancelled
    stale: usize,
}

impl RequestLedger {
    fn live(&self) -> usize {
        self.outstanding - self.stale
    }
}

/// In-process transport using tokio channels
///
/// Used when the producer runs in the same process, and in tests.
pub struct InProcessTransport {
    /// Outbound messages to the producer
    out_tx: mpsc::Sender<ClientMessage>,
    /// Inbound batches from the producer
    in_rx: mpsc::Receiver<Vec<ServerMessage>>,
    /// Outstanding and cancelled requests
    ledger: Mutex<RequestLedger>,
}

impl InProcessTransport {
    /// Create a transport pair
    ///
    /// Returns:
    /// - `InProcessTransport`: use this on the client side
    /// - `mpsc::Receiver<ClientMessage>`: the producer reads requests here
    /// - `mpsc::Sender<Vec<ServerMessage>>`: the producer sends batches here
    #[must_use]
    pub fn new_pair() -> (
        Self,
        mpsc::Receiver<ClientMessage>,
        mpsc::Sender<Vec<ServerMessage>>,
    ) {
        Self::new_pair_with_capacity(100)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(
        capacity: usize,
    ) -> (
        Self,
        mpsc::Receiver<ClientMessage>,
        mpsc::Sender<Vec<ServerMessage>>,
    ) {
        let (out_tx, out_rx) = mpsc::channel(capacity);
        let (in_tx, in_rx) = mpsc::channel(capacity);

        let transport = Self {
            out_tx,
            in_rx,
            ledger: Mutex::new(RequestLedger::default()),
        };

        (transport, out_rx, in_tx)
    }

    /// Whether a request is awaiting its response
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.ledger.lock().live() > 0
    }
}

#[async_trait]
impl Transport for InProcessTransport {
    async fn send(&self, message: ClientMessage) -> Result<(), TransportError> {
        self.out_tx
            .send(message)
            .await
            .map_err(|_| TransportError::ConnectionClosed)?;
        self.ledger.lock().outstanding += 1;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<ServerMessage>, TransportError> {
        let batch = self.in_rx.recv().await.ok_or(TransportError::ConnectionClosed)?;
        let mut ledger = self.ledger.lock();
        if ledger.outstanding == 0 {
            // Unsolicited batch
            return Ok(batch);
        }
        ledger.outstanding -= 1;
        if ledger.stale > 0 {
            ledger.stale -= 1;
            tracing::debug!(
                count = batch.len(),
                stale_remaining = ledger.stale,
                "Discarding batch for cancelled request"
            );
            return Err(TransportError::Aborted);
        }
        Ok(batch)
    }

    fn cancel(&self) -> bool {
        let mut ledger = self.ledger.lock();
        let live = ledger.live();
        if live == 0 {
            return false;
        }
        ledger.stale = ledger.outstanding;
        tracing::info!(cancelled = live, "In-flight request cancelled");
        true
    }
}
