//! Crate-level error types.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::CropRect;
use crate::session::Phase;

/// Errors surfaced by the crop pipeline and session.
#[derive(Debug, Error)]
pub enum CropError {
    /// The uploaded bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The result could not be encoded for download.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A render was requested before the crop widget reported any geometry.
    #[error("No crop area has been selected yet")]
    MissingGeometry,

    /// The reported crop rectangle has a non-positive or non-finite size.
    #[error("Invalid crop area: {0:?}")]
    InvalidGeometry(CropRect),

    /// The operation is not available in the current session phase.
    #[error("Cannot {operation} while the session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
}

/// A size or format policy string that does not name a known policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} policy: {value:?}")]
pub struct ParsePolicyError {
    kind: &'static str,
    value: String,
}

impl ParsePolicyError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CropError::MissingGeometry.to_string(),
            "No crop area has been selected yet"
        );

        let err = CropError::InvalidPhase {
            operation: "export",
            phase: Phase::Cropping,
        };
        assert_eq!(err.to_string(), "Cannot export while the session is cropping");

        let err = CropError::from(DecodeError::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }

    #[test]
    fn test_parse_policy_error_display() {
        let err = ParsePolicyError::new("format", "gif");
        assert_eq!(err.to_string(), "Unknown format policy: \"gif\"");
    }
}
