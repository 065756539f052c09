//! # Transport seam: the duplex channel the protocol runs over.
//!
//! The admission protocol is transport-agnostic. A concrete adapter (a
//! streaming-RPC stub, a framed socket, an in-process pipe) supplies a
//! [`DuplexChannel`] and the client drives it strictly sequentially:
//!
//! ```text
//! ready() ──► write(request) ──► read() ──► [ write(completion) ] ──► finish()
//! ```
//!
//! ## Rules
//! - **One operation in flight**: the client never issues a second operation
//!   on a channel before the previous one completes. Adapters may rely on this.
//! - **Channel exists before its open outcome is known**: constructing the
//!   channel is infallible; the open handshake's success or failure is
//!   delivered by [`DuplexChannel::ready`]. This keeps the finish handshake
//!   available for diagnostics even when the open itself failed.
//! - **`finish` is always called exactly once** per channel, on every path,
//!   so the authority sees an explicit hangup and can settle its bookkeeping.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::status::FinalStatus;

/// # One duplex message channel to the authority.
///
/// Each method performs exactly one asynchronous transfer; completion of the
/// returned future is the transport's completion notification. Methods run on
/// whichever runtime worker polls them — implementations must not assume a
/// particular thread.
#[async_trait]
pub trait DuplexChannel: Send + 'static {
    /// Message type sent to the authority (request and completion payload).
    type Request: Send + 'static;

    /// Message type received from the authority (carries the decision).
    type Response: Send + 'static;

    /// Resolves once the duplex call is established, or fails if it never was.
    async fn ready(&mut self) -> Result<(), TransportError>;

    /// Sends one message to the authority.
    async fn write(&mut self, message: Self::Request) -> Result<(), TransportError>;

    /// Receives one message from the authority.
    async fn read(&mut self) -> Result<Self::Response, TransportError>;

    /// Closes the call and retrieves the authority's final status.
    ///
    /// Returns `Err` only when the handshake itself could not run; an
    /// unhappy final status is still `Ok(status)`.
    async fn finish(&mut self) -> Result<FinalStatus, TransportError>;
}

/// Decision flag carried by the authority's first response message.
///
/// The response is consumed by value when the decision is extracted, so a
/// stale decision can never be re-read.
pub trait Decision {
    /// Whether the authority admitted the request.
    fn admitted(&self) -> bool;
}

/// # Per-call metadata owned by the session.
///
/// Handed to [`Protocol::open`](crate::Protocol::open) so the adapter can
/// apply it to the underlying call, and kept alive by the session for the
/// call's full duration.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use gatelink::CallContext;
///
/// let ctx = CallContext::new().with_deadline(Duration::from_secs(5));
/// assert_eq!(ctx.deadline(), Some(Duration::from_secs(5)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    deadline: Option<Duration>,
}

impl CallContext {
    /// Creates an empty context (no deadline).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an overall deadline for the session's remote call.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the configured deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
