//! # Admission client: the protocol state machine.
//!
//! [`AdmissionClient`] drives one admission session against the authority:
//! open the duplex call, send the request, read the decision, surface it
//! through the [`AdmissionCallback`], and — if granted — send at most one
//! completion report. The concrete protocol plugs in through [`Protocol`]
//! (which remote method to invoke, how to fill the request).
//!
//! ## State machine
//! ```text
//!  Idle ──start()──► Opening ──ready──► RequestSent ──write──► AwaitingDecision
//!                       │                   │                       │ read
//!                       │ error             │ error         ┌───────┴────────┐
//!                       ▼                   ▼               ▼                ▼
//!                     Failed ◄──────────────┘            Granted           Denied
//!                       │                                   │ report_completion
//!                       │ on_denied                         ▼        │ on_denied
//!                       ▼                               Completed    ▼
//! ```
//!
//! ## Rules
//! - The internal lock guards phase, session slot, and callback slot. It is
//!   held only for inspection/mutation: never across an `.await`, never
//!   around a hook or callback invocation.
//! - `Option::take` under the lock is the exactly-once gate. The callback
//!   slot empties when the decision (or failure) is delivered; the session
//!   slot empties when disposal begins. An empty slot makes any later path a
//!   no-op, so neither terminal action can happen twice.
//! - The driver task awaits each transport operation before issuing the
//!   next, so at most one operation is in flight per session.
//! - Transport failures never reach the caller as errors: they are logged
//!   once and delivered as `on_denied`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tracing::warn;

use crate::callback::AdmissionCallback;
use crate::error::{StartError, TransportError};
use crate::session::Session;
use crate::transport::{CallContext, Decision, DuplexChannel};

/// # Protocol specialization hooks.
///
/// A concrete admission protocol supplies the two pieces the generic state
/// machine cannot know: which duplex remote method to invoke on the stub,
/// and how to populate the outgoing request.
pub trait Protocol: Send + Sync + 'static {
    /// Client stub for the authority's service.
    type Stub: Send + 'static;

    /// Duplex channel produced by [`open`](Protocol::open).
    type Channel: DuplexChannel<Request = Self::Request, Response = Self::Response>;

    /// Outgoing message type; also the completion payload type.
    type Request: Default + Send + 'static;

    /// Incoming message type carrying the decision.
    type Response: Decision + Send + 'static;

    /// Selects and invokes the duplex remote method for this protocol.
    ///
    /// Channel construction is infallible; the open outcome is reported by
    /// the channel's [`ready`](DuplexChannel::ready) completion.
    fn open(&self, stub: &Self::Stub, context: &CallContext) -> Self::Channel;

    /// Fills protocol-specific fields of the outgoing admission request.
    fn fill_request(&self, request: &mut Self::Request);
}

/// Protocol phase of one admission session.
///
/// Mutated only under the client's lock; exposed for callers and tests via
/// [`AdmissionClient::phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; `start` not yet called.
    Idle,
    /// Waiting for the duplex call to be established.
    Opening,
    /// Admission request write in flight.
    RequestSent,
    /// Waiting for the authority's decision message.
    AwaitingDecision,
    /// Admitted; the session is held open awaiting the completion report.
    Granted,
    /// The authority denied the request. Terminal.
    Denied,
    /// A transport operation failed before a decision was read. Terminal.
    Failed,
    /// Completion report sent after a grant. Terminal.
    Completed,
}

/// Shared mutable state; every field is guarded by the client's lock.
struct Inner<C> {
    phase: Phase,
    /// Present from grant until disposal begins, paired with the handle of
    /// the runtime that drove the session so the completion report can be
    /// issued from any thread. Taking it is the exactly-once gate for
    /// closing the channel.
    session: Option<(Session<C>, Handle)>,
    /// Present until the decision (or failure) is delivered. Taking it is
    /// the exactly-once gate for the callback.
    callback: Option<Arc<dyn AdmissionCallback>>,
}

/// # Client state machine for one admission session.
///
/// Construct with [`new`](AdmissionClient::new), call
/// [`start`](AdmissionClient::start) once, and the authority's decision
/// arrives through the [`AdmissionCallback`]: exactly one of `on_granted` /
/// `on_denied`, exactly once. After a grant, call
/// [`report_completion`](AdmissionClient::report_completion) when the gated
/// work is done — it is safe to call unconditionally from teardown, since
/// every call after the first effective one is a no-op.
pub struct AdmissionClient<P: Protocol> {
    protocol: P,
    context: CallContext,
    inner: Mutex<Inner<P::Channel>>,
}

impl<P: Protocol> AdmissionClient<P> {
    /// Creates a client with an empty [`CallContext`].
    pub fn new(protocol: P, callback: Arc<dyn AdmissionCallback>) -> Arc<Self> {
        Self::with_context(protocol, callback, CallContext::new())
    }

    /// Creates a client with an explicit per-call context.
    pub fn with_context(
        protocol: P,
        callback: Arc<dyn AdmissionCallback>,
        context: CallContext,
    ) -> Arc<Self> {
        Arc::new(Self {
            protocol,
            context,
            inner: Mutex::new(Inner {
                phase: Phase::Idle,
                session: None,
                callback: Some(callback),
            }),
        })
    }

    /// Begins the asynchronous admission handshake.
    ///
    /// Spawns the driver task and returns immediately; the outcome arrives
    /// through the callback. Must be called from within a tokio runtime.
    /// A client drives exactly one session, so a second call returns
    /// [`StartError::AlreadyStarted`].
    pub fn start(self: &Arc<Self>, stub: P::Stub) -> Result<(), StartError> {
        {
            let mut inner = self.lock_inner();
            if inner.phase != Phase::Idle {
                return Err(StartError::AlreadyStarted);
            }
            inner.phase = Phase::Opening;
        }

        let client = Arc::clone(self);
        tokio::spawn(async move {
            client.drive(stub).await;
        });
        Ok(())
    }

    /// Reports that the granted work is done.
    ///
    /// Takes the session out of the shared slot and hands the payload write
    /// plus the finish handshake to a detached task, so the caller is never
    /// blocked on the network round-trip. If the slot is empty — the
    /// decision was a denial, an earlier error tore the session down, no
    /// grant has happened, or this method already ran once — the call is a
    /// silent no-op. Callers commonly invoke it unconditionally from
    /// scoped-teardown logic as well as from normal completion.
    ///
    /// Callable from any thread, inside or outside a runtime: the detached
    /// work is spawned on the runtime that drove the session.
    pub fn report_completion(&self, payload: P::Request) {
        let (session, handle) = {
            let mut inner = self.lock_inner();
            let Some(slot) = inner.session.take() else {
                return;
            };
            inner.phase = Phase::Completed;
            slot
        };

        handle.spawn(async move {
            let mut session = session;
            if let Err(err) = session.channel_mut().write(payload).await {
                warn!("completion report to authority failed: {err}");
            }
            session.cleanup().await;
        });
    }

    /// Returns the current protocol phase.
    pub fn phase(&self) -> Phase {
        self.lock_inner().phase
    }

    /// Driver task: runs the open → write → read sequence, then delivers
    /// the decision. Each `.await` here is one transport completion; the
    /// sequence guarantees a single operation in flight.
    async fn drive(self: Arc<Self>, stub: P::Stub) {
        let channel = self.protocol.open(&stub, &self.context);
        let mut session = Session::new(channel, self.context.clone());

        if let Err(err) = session.channel_mut().ready().await {
            self.deny_after_error(session, err).await;
            return;
        }
        self.set_phase(Phase::RequestSent);

        let mut request = P::Request::default();
        self.protocol.fill_request(&mut request);
        if let Err(err) = session.channel_mut().write(request).await {
            self.deny_after_error(session, err).await;
            return;
        }
        self.set_phase(Phase::AwaitingDecision);

        let response = match session.channel_mut().read().await {
            Ok(response) => response,
            Err(err) => {
                self.deny_after_error(session, err).await;
                return;
            }
        };
        // Extracting the flag consumes the response, so a stale decision
        // cannot be re-read later.
        let admitted = response.admitted();
        drop(response);

        if admitted {
            // Deposit the session before invoking the callback: on_granted
            // may call report_completion synchronously.
            let callback = {
                let mut inner = self.lock_inner();
                inner.session = Some((session, Handle::current()));
                inner.phase = Phase::Granted;
                inner.callback.take()
            };
            if let Some(callback) = callback {
                callback.on_granted().await;
            }
        } else {
            let callback = {
                let mut inner = self.lock_inner();
                inner.phase = Phase::Denied;
                inner.callback.take()
            };
            tokio::spawn(session.cleanup());
            if let Some(callback) = callback {
                callback.on_denied().await;
            }
        }
    }

    /// Failure funnel for every step before the decision is read: logs one
    /// warning, closes the session in the background, and delivers the
    /// outcome as a denial.
    async fn deny_after_error(&self, session: Session<P::Channel>, err: TransportError) {
        warn!("no decision from authority: {err}");

        let callback = {
            let mut inner = self.lock_inner();
            inner.phase = Phase::Failed;
            inner.callback.take()
        };
        tokio::spawn(session.cleanup_after_error());
        if let Some(callback) = callback {
            callback.on_denied().await;
        }
    }

    fn set_phase(&self, phase: Phase) {
        self.lock_inner().phase = phase;
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<P::Channel>> {
        // Recover from poisoning: the Option slots stay valid exactly-once
        // gates regardless of a panic elsewhere.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
