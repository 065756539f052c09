//! # Final status reported by the authority when a session closes.
//!
//! Every session ends with a finish handshake that retrieves a [`FinalStatus`]
//! from the authority. The status is classified into a [`StatusClass`] which
//! drives the logging policy:
//!
//! - [`StatusClass::Expected`] — `ok` and `cancelled`; normal outcomes, never logged.
//! - [`StatusClass::Mismatch`] — `aborted`; the authority's session state machine
//!   and this client disagree, which is a programming error rather than a
//!   runtime fault. Fatal in debug builds, a warning in release builds.
//! - [`StatusClass::Fault`] — anything else; logged once at warning severity.
//!
//! Classification is kept pure (no logging here) so the policy itself is unit
//! testable.
//!
//! # Example
//! ```
//! use gatelink::{FinalStatus, StatusClass, StatusCode};
//!
//! assert_eq!(FinalStatus::ok().class(), StatusClass::Expected);
//! assert_eq!(
//!     FinalStatus::new(StatusCode::Unavailable, "authority restarting").class(),
//!     StatusClass::Fault,
//! );
//! ```

use std::fmt;

/// Status code attached to the finish handshake of a session.
///
/// Mirrors the usual streaming-RPC vocabulary; transports map their native
/// codes onto this set.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    /// Session completed normally.
    Ok,
    /// Session was cancelled; expected during teardown.
    Cancelled,
    /// The authority rejected an operation its state machine did not expect.
    Aborted,
    /// The call deadline elapsed before the session finished.
    DeadlineExceeded,
    /// The authority was unreachable or shedding load.
    Unavailable,
    /// The authority hit an internal error.
    Internal,
    /// Any code without a dedicated variant.
    Unknown,
}

impl StatusCode {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StatusCode::Ok => "ok",
            StatusCode::Cancelled => "cancelled",
            StatusCode::Aborted => "aborted",
            StatusCode::DeadlineExceeded => "deadline_exceeded",
            StatusCode::Unavailable => "unavailable",
            StatusCode::Internal => "internal",
            StatusCode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Severity class of a [`FinalStatus`], as seen by the logging policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    /// Normal outcome; not logged.
    Expected,
    /// Client/authority state disagreement; fatal in debug builds.
    Mismatch,
    /// Runtime fault; logged once at warning severity.
    Fault,
}

/// Terminal status of one session: a [`StatusCode`] plus an optional
/// human-readable message from the authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalStatus {
    /// Status code reported on the finish handshake.
    pub code: StatusCode,
    /// Optional detail message supplied by the authority.
    pub message: Option<String>,
}

impl FinalStatus {
    /// Creates a status with a detail message.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    /// Creates a bare status without a message.
    pub fn from_code(code: StatusCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// Creates the `ok` status.
    pub fn ok() -> Self {
        Self::from_code(StatusCode::Ok)
    }

    /// Classifies this status for the logging policy.
    ///
    /// `ok` and `cancelled` are expected outcomes. `aborted` indicates the
    /// authority's state machine and the client disagree about session state.
    /// Everything else is a runtime fault worth one warning.
    pub fn class(&self) -> StatusClass {
        match self.code {
            StatusCode::Ok | StatusCode::Cancelled => StatusClass::Expected,
            StatusCode::Aborted => StatusClass::Mismatch,
            _ => StatusClass::Fault,
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{} ({msg})", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_statuses_are_silent() {
        assert_eq!(FinalStatus::ok().class(), StatusClass::Expected);
        assert_eq!(
            FinalStatus::from_code(StatusCode::Cancelled).class(),
            StatusClass::Expected
        );
    }

    #[test]
    fn test_aborted_is_a_mismatch() {
        let status = FinalStatus::new(StatusCode::Aborted, "unexpected completion");
        assert_eq!(status.class(), StatusClass::Mismatch);
    }

    #[test]
    fn test_everything_else_is_a_fault() {
        for code in [
            StatusCode::DeadlineExceeded,
            StatusCode::Unavailable,
            StatusCode::Internal,
            StatusCode::Unknown,
        ] {
            assert_eq!(
                FinalStatus::from_code(code).class(),
                StatusClass::Fault,
                "{code} should classify as a fault"
            );
        }
    }

    #[test]
    fn test_display_includes_message() {
        let status = FinalStatus::new(StatusCode::Unavailable, "authority restarting");
        assert_eq!(status.to_string(), "unavailable (authority restarting)");
        assert_eq!(FinalStatus::ok().to_string(), "ok");
    }
}
