//! # Decision callback trait.
//!
//! [`AdmissionCallback`] is the extension point through which the worker
//! learns the authority's decision. The client holds it as
//! `Arc<dyn AdmissionCallback>` and invokes **exactly one** of the two
//! methods, exactly once per session, covering every success and failure
//! branch.
//!
//! ## Rules
//! - Invocations happen strictly outside the client's internal lock, so the
//!   callback may re-enter the client; calling
//!   [`report_completion`](crate::AdmissionClient::report_completion) from
//!   inside [`on_granted`](AdmissionCallback::on_granted) is the common case.
//! - Invocations run on an arbitrary runtime worker thread.
//! - After the single invocation the client drops its reference.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use gatelink::AdmissionCallback;
//!
//! struct Worker;
//!
//! #[async_trait]
//! impl AdmissionCallback for Worker {
//!     async fn on_granted(&self) {
//!         // do the gated work, then report_completion(...)
//!     }
//!
//!     async fn on_denied(&self) {
//!         // skip the gated work
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Receives the authority's admission decision.
///
/// Exactly one of the two methods fires per session.
#[async_trait]
pub trait AdmissionCallback: Send + Sync + 'static {
    /// The authority approved the request.
    ///
    /// Perform the gated work and eventually call
    /// [`report_completion`](crate::AdmissionClient::report_completion) so
    /// the authority can release its bookkeeping.
    async fn on_granted(&self);

    /// The authority denied the request, or the session failed before a
    /// decision was read. Do not perform the gated work.
    async fn on_denied(&self);
}
