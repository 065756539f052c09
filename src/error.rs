//! Error types used by the admission client.
//!
//! This module defines two error enums:
//!
//! - [`TransportError`] — failures reported by the transport adapter for a
//!   single channel operation.
//! - [`StartError`] — misuse of the client's public API.
//!
//! Transport errors never reach the caller directly: the state machine
//! absorbs them, logs one diagnostic, and surfaces the outcome as a single
//! "denied" callback. `as_label` provides short stable names for logs and
//! metrics.

use thiserror::Error;

/// # Failure of one asynchronous transport operation.
///
/// Produced by [`DuplexChannel`](crate::DuplexChannel) implementations. The
/// `reason` carries the adapter's native diagnostic text; it is only ever
/// logged, never interpreted.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The duplex call could not be established.
    #[error("duplex call failed to open: {reason}")]
    Open {
        /// Adapter-supplied diagnostic text.
        reason: String,
    },

    /// A message write on the channel failed.
    #[error("channel write failed: {reason}")]
    Write {
        /// Adapter-supplied diagnostic text.
        reason: String,
    },

    /// A message read on the channel failed.
    #[error("channel read failed: {reason}")]
    Read {
        /// Adapter-supplied diagnostic text.
        reason: String,
    },

    /// The finish handshake itself failed, so no final status was retrieved.
    #[error("finish handshake failed: {reason}")]
    Finish {
        /// Adapter-supplied diagnostic text.
        reason: String,
    },
}

impl TransportError {
    /// Creates a [`TransportError::Open`] error.
    pub fn open(reason: impl Into<String>) -> Self {
        TransportError::Open {
            reason: reason.into(),
        }
    }

    /// Creates a [`TransportError::Write`] error.
    pub fn write(reason: impl Into<String>) -> Self {
        TransportError::Write {
            reason: reason.into(),
        }
    }

    /// Creates a [`TransportError::Read`] error.
    pub fn read(reason: impl Into<String>) -> Self {
        TransportError::Read {
            reason: reason.into(),
        }
    }

    /// Creates a [`TransportError::Finish`] error.
    pub fn finish(reason: impl Into<String>) -> Self {
        TransportError::Finish {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use gatelink::TransportError;
    ///
    /// let err = TransportError::read("connection reset");
    /// assert_eq!(err.as_label(), "transport_read_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Open { .. } => "transport_open_failed",
            TransportError::Write { .. } => "transport_write_failed",
            TransportError::Read { .. } => "transport_read_failed",
            TransportError::Finish { .. } => "transport_finish_failed",
        }
    }
}

/// Error returned by [`AdmissionClient::start`](crate::AdmissionClient::start).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// `start` was already called on this client; a client drives exactly
    /// one session.
    #[error("session already started")]
    AlreadyStarted,
}
