//! # gatelink
//!
//! **Gatelink** is the client side of an admission-control protocol: a worker
//! that wants to perform an expensive or rate-limited operation opens a
//! session with a central scheduling authority, asks for permission, performs
//! the work only if granted, and reports completion so the authority can
//! release its bookkeeping (e.g. a concurrency slot).
//!
//! The crate is transport-agnostic: the streaming mechanism is consumed only
//! through the [`DuplexChannel`] trait, and a concrete protocol plugs in
//! through the two [`Protocol`] hooks (which remote method to invoke, how to
//! fill the request).
//!
//! ## Architecture
//! ```text
//!  ┌────────────┐ on_granted / on_denied  ┌───────────────────────────────┐
//!  │   Worker   │◄────────────────────────┤  AdmissionClient<P: Protocol> │
//!  │ (callback) │   report_completion ───►│  - Phase (under one lock)     │
//!  └────────────┘                         │  - Option<Session>   (gate)   │
//!                                         │  - Option<Arc<dyn Callback>>  │
//!                                         └──────────────┬────────────────┘
//!                                                        │ ready/write/read/finish
//!                                                        ▼
//!                                         ┌───────────────────────────────┐
//!                                         │ Session ──► DuplexChannel     │
//!                                         │ (owned, closed exactly once)  │
//!                                         └──────────────┬────────────────┘
//!                                                        ▼
//!                                                    Authority
//! ```
//!
//! ## Session lifecycle
//! ```text
//! start()
//!   ├─► ready()                        (open handshake)
//!   ├─► write(request)                 (hook fills the request)
//!   ├─► read() ──► decision
//!   │     ├─ granted ─► on_granted() ─► report_completion(payload)
//!   │     │                               ├─► write(payload)   (detached)
//!   │     │                               └─► finish() + log
//!   │     └─ denied ──► finish() + log, then on_denied()
//!   └─ any error ─► warn, finish() + log, then on_denied()
//! ```
//!
//! ## Guarantees
//! - Exactly one of `on_granted` / `on_denied` fires per session, across
//!   every interleaving and failure branch.
//! - At most one transport operation is in flight per session.
//! - The internal lock is released before any call into user code, so
//!   callbacks may re-enter the client (the common case: `on_granted` does
//!   its work and calls `report_completion` before returning).
//! - `report_completion` is a silent no-op once the session is gone, so
//!   callers may invoke it unconditionally from teardown.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use gatelink::{AdmissionCallback, AdmissionClient, Protocol};
//!
//! # struct RewriteProtocol;
//! # struct Stub;
//! # #[derive(Default)]
//! # struct RewriteRequest { done: bool }
//! # struct RewriteResponse;
//! # impl gatelink::Decision for RewriteResponse {
//! #     fn admitted(&self) -> bool { true }
//! # }
//! # struct Chan;
//! # #[async_trait]
//! # impl gatelink::DuplexChannel for Chan {
//! #     type Request = RewriteRequest;
//! #     type Response = RewriteResponse;
//! #     async fn ready(&mut self) -> Result<(), gatelink::TransportError> { Ok(()) }
//! #     async fn write(&mut self, _m: RewriteRequest) -> Result<(), gatelink::TransportError> { Ok(()) }
//! #     async fn read(&mut self) -> Result<RewriteResponse, gatelink::TransportError> { Ok(RewriteResponse) }
//! #     async fn finish(&mut self) -> Result<gatelink::FinalStatus, gatelink::TransportError> { Ok(gatelink::FinalStatus::ok()) }
//! # }
//! # impl Protocol for RewriteProtocol {
//! #     type Stub = Stub;
//! #     type Channel = Chan;
//! #     type Request = RewriteRequest;
//! #     type Response = RewriteResponse;
//! #     fn open(&self, _stub: &Stub, _ctx: &gatelink::CallContext) -> Chan { Chan }
//! #     fn fill_request(&self, _req: &mut RewriteRequest) {}
//! # }
//! struct Worker;
//!
//! #[async_trait]
//! impl AdmissionCallback for Worker {
//!     async fn on_granted(&self) {
//!         // perform the gated work, then report completion
//!     }
//!     async fn on_denied(&self) {
//!         // skip the gated work
//!     }
//! }
//!
//! # fn demo(stub: Stub) -> Result<(), gatelink::StartError> {
//! let client = AdmissionClient::new(RewriteProtocol, Arc::new(Worker));
//! client.start(stub)?;
//! // ... later, after on_granted:
//! client.report_completion(RewriteRequest { done: true });
//! # Ok(())
//! # }
//! ```

mod callback;
mod client;
mod error;
mod session;
mod status;
mod transport;

// ---- Public re-exports ----

pub use callback::AdmissionCallback;
pub use client::{AdmissionClient, Phase, Protocol};
pub use error::{StartError, TransportError};
pub use status::{FinalStatus, StatusClass, StatusCode};
pub use transport::{CallContext, Decision, DuplexChannel};
