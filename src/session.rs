//! # Session handle: one duplex channel, closed exactly once.
//!
//! A [`Session`] owns the channel and the [`CallContext`] for one complete
//! exchange with the authority. Its only job after the application messages
//! are done is an orderly shutdown: run the finish handshake, classify the
//! final status, and log per the [`StatusClass`] policy.
//!
//! ```text
//! cleanup() ───────────────► finish() ──► classify ──► { silent | warn | fatal }
//! cleanup_after_error() ──►──┘  (same handshake; session never reached a decision)
//! ```
//!
//! ## Rules
//! - Both disposal paths consume the session by value. The client moves the
//!   session out of its shared slot before invoking either one, so two
//!   disposals of the same channel cannot race.
//! - `ok` and `cancelled` final statuses are not logged. `aborted` means the
//!   authority's state machine and this client disagree about session state:
//!   fatal in debug builds, one warning in release builds. Any other status
//!   produces one warning.
//! - Even a session that never completed its handshake still runs `finish`
//!   rather than dropping the channel silently: the authority needs the
//!   hangup to be explicit to keep its bookkeeping accurate.

use tracing::warn;

use crate::status::{FinalStatus, StatusClass};
use crate::transport::{CallContext, DuplexChannel};

/// One in-flight exchange with the authority: the duplex channel plus the
/// call context that must outlive it.
pub(crate) struct Session<C> {
    channel: C,
    context: CallContext,
}

impl<C: DuplexChannel> Session<C> {
    pub(crate) fn new(channel: C, context: CallContext) -> Self {
        Self { channel, context }
    }

    pub(crate) fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Returns the call context this session was opened with.
    pub(crate) fn context(&self) -> &CallContext {
        &self.context
    }

    /// Runs the finish handshake and logs the outcome.
    ///
    /// Dropping `self` at the end of this call is the disposal; there is no
    /// separate release step.
    pub(crate) async fn cleanup(mut self) {
        match self.channel.finish().await {
            Ok(status) => log_final_status(&status),
            Err(err) => warn!("finish handshake with authority failed: {err}"),
        }
    }

    /// Disposal path for sessions that never reached a decision.
    ///
    /// The finish handshake still runs so the final status gets retrieved
    /// and logged, and so the authority sees an explicit hangup.
    pub(crate) async fn cleanup_after_error(self) {
        self.cleanup().await;
    }
}

/// Applies the logging policy for a session's final status.
///
/// In debug builds an `aborted` status is fatal: it indicates the authority
/// and the client disagree about session state, which is a programming error
/// between the two state machines, not a runtime fault.
fn log_final_status(status: &FinalStatus) {
    match status.class() {
        StatusClass::Expected => {}
        StatusClass::Mismatch => {
            // Cleanup runs on a detached task, where a panic would be caught
            // and discarded by the runtime; the debug build has to take the
            // process down itself.
            if cfg!(debug_assertions) {
                eprintln!("authority and client disagree on session state: {status}");
                std::process::abort();
            }
            warn!("authority reported a session state mismatch: {status}");
        }
        StatusClass::Fault => {
            warn!("received error status from authority: {status}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::TransportError;
    use crate::status::StatusCode;

    /// Channel stub whose finish handshake reports a scripted status.
    struct StubChannel(FinalStatus);

    #[async_trait]
    impl DuplexChannel for StubChannel {
        type Request = ();
        type Response = ();

        async fn ready(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn write(&mut self, _message: ()) -> Result<(), TransportError> {
            Ok(())
        }

        async fn read(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn finish(&mut self) -> Result<FinalStatus, TransportError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_session_owns_context_for_call_lifetime() {
        let context = CallContext::new().with_deadline(Duration::from_secs(3));
        let session = Session::new(StubChannel(FinalStatus::ok()), context);
        assert_eq!(session.context().deadline(), Some(Duration::from_secs(3)));
        session.cleanup().await;
    }

    #[tokio::test]
    async fn test_cleanup_survives_fault_status() {
        let status = FinalStatus::new(StatusCode::Unavailable, "authority restarting");
        let session = Session::new(StubChannel(status), CallContext::new());
        // A fault is one warning, never fatal; cleanup must return normally.
        session.cleanup_after_error().await;
    }
}
