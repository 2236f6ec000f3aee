//! Error taxonomy for inspection commands.

use thiserror::Error;

/// Errors reported to the operator by the inspection engine.
///
/// The first four abort or skip command processing as documented on each
/// variant; target-access faults are wrapped transparently. A registry miss
/// is not an error at all (`Scope::dispatch` returns `Ok(None)` for it).
#[derive(Debug, Error)]
pub enum InspectError {
    /// The argument is not a parseable number. Aborts the remaining batch.
    #[error("error: \"{0}\" is not a number")]
    MalformedArgument(String),

    /// The identifier decodes but names no live object. Aborts the batch.
    /// This is the operator-facing form of the information table's by-id
    /// lookup failure.
    #[error("error: invalid object id 0x{0:08X}")]
    InvalidIdentifier(u32),

    /// A (kind, index) lookup fell outside the live 1-based slot range.
    /// Aborts the remaining batch.
    #[error("error: index {index} is not a live {class} slot")]
    IndexOutOfRange {
        /// Object class name, e.g. `semaphores`.
        class: &'static str,
        /// The offending index as given.
        index: u32,
    },

    /// The decoded (api, class) pair has no display adapter. Reported; only
    /// the current argument stops, the batch continues.
    #[error("error: no display adapter for {api}/{class} objects")]
    UnknownObjectKind {
        /// API namespace name, e.g. `posix`.
        api: &'static str,
        /// Object class name within the API.
        class: &'static str,
    },

    /// Fault from the target memory or symbol layer.
    #[error(transparent)]
    Target(#[from] anyhow::Error),
}

impl InspectError {
    /// Whether this error aborts the remaining arguments of a batch.
    pub fn aborts_batch(&self) -> bool {
        !matches!(self, InspectError::UnknownObjectKind { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_classification_and_messages() {
        let err = InspectError::MalformedArgument("abc".to_string());
        assert!(err.aborts_batch());
        assert_eq!(err.to_string(), "error: \"abc\" is not a number");

        let err = InspectError::InvalidIdentifier(0x1A01_0001);
        assert!(err.aborts_batch());
        assert_eq!(err.to_string(), "error: invalid object id 0x1A010001");

        let err = InspectError::IndexOutOfRange { class: "semaphores", index: 9 };
        assert!(err.aborts_batch());
        assert_eq!(err.to_string(), "error: index 9 is not a live semaphores slot");

        let err = InspectError::UnknownObjectKind { api: "classic", class: "ports" };
        assert!(!err.aborts_batch());
        assert_eq!(err.to_string(), "error: no display adapter for classic/ports objects");
    }
}
