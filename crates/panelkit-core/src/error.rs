//! Error handling for PanelKit
//!
//! Provides error types for every layer of the token pipeline:
//! - Fillet errors (corner geometry that cannot be rounded)
//! - Sequence errors (adjacency and connectivity violations in a token stream)
//! - Record errors (malformed records from the upstream producer)
//!
//! All error types use `thiserror`. None of them are retryable: each one
//! describes a data problem in the source drawing.

use crate::geometry::Point;
use std::fmt;
use thiserror::Error;

/// Why a corner could not be rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilletDegeneracy {
    /// Radius is zero, negative or not a number
    InvalidRadius,
    /// One of the two segments has no length
    ZeroLengthSegment,
    /// The segments are parallel (straight on, or a full reversal)
    Collinear,
    /// The tangent points fall outside the segments
    RadiusTooLarge,
    /// The solver produced NaN or an infinite coordinate
    NonFinite,
}

impl fmt::Display for FilletDegeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius => write!(f, "radius must be a positive number"),
            Self::ZeroLengthSegment => write!(f, "segment has zero length"),
            Self::Collinear => write!(f, "segments are collinear"),
            Self::RadiusTooLarge => write!(f, "radius is too large for the corner"),
            Self::NonFinite => write!(f, "fillet geometry is not finite"),
        }
    }
}

/// Fillet geometry error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilletError {
    /// The corner formed by the three points cannot take the requested fillet
    #[error("Invalid fillet between points {start}, {corner} and {end}: {reason}")]
    InvalidFillet {
        /// Start of the incoming segment.
        start: Point,
        /// Shared corner point.
        corner: Point,
        /// End of the outgoing segment.
        end: Point,
        /// Which degeneracy was detected.
        reason: FilletDegeneracy,
    },
}

impl FilletError {
    pub fn reason(&self) -> FilletDegeneracy {
        match self {
            Self::InvalidFillet { reason, .. } => *reason,
        }
    }
}

/// Token sequencing error type
///
/// Raised by the accumulator when the token stream breaks an adjacency rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// A fillet does not follow a route or outline segment
    #[error("Fillets must exist between routes or outline segments")]
    FilletWithoutSegment,

    /// The segments on either side of a fillet are of different kinds
    #[error("Fillets must exist between two entities of the same type: {previous} followed by {next}")]
    FilletKindMismatch {
        /// Kind of the segment before the fillet.
        previous: &'static str,
        /// Kind of the token after the fillet.
        next: &'static str,
    },

    /// The segments on either side of a fillet do not meet
    #[error("Fillets must exist between two entities which are connected: {previous_end} is not {next_start}")]
    FilletDisconnected {
        /// End point of the segment before the fillet.
        previous_end: Point,
        /// Start point of the segment after the fillet.
        next_start: Point,
    },

    /// The segments meet but differ in tool, offset, sequence, passes or depth
    #[error("Fillets must exist between two entities which are connected: {attribute} differs")]
    FilletAttributeMismatch {
        /// Name of the mismatched attribute.
        attribute: &'static str,
    },

    /// The stream ended on a fillet
    #[error("Fillet is not followed by a route or outline segment")]
    DanglingFillet,

    /// The token kind cannot be turned into an operation
    #[error("Unexpected token {kind}")]
    UnexpectedToken {
        /// Kind of the offending token.
        kind: &'static str,
    },

    /// Fillet geometry could not be solved
    #[error(transparent)]
    Fillet(#[from] FilletError),
}

impl SequenceError {
    /// Whether the fault is a connectivity or attribute mismatch across a fillet.
    pub fn is_connectivity_error(&self) -> bool {
        matches!(
            self,
            Self::FilletDisconnected { .. } | Self::FilletAttributeMismatch { .. }
        )
    }

    /// Whether the fault is a kind mismatch or misplaced fillet.
    pub fn is_placement_error(&self) -> bool {
        matches!(
            self,
            Self::FilletWithoutSegment
                | Self::FilletKindMismatch { .. }
                | Self::DanglingFillet
        )
    }

    /// Whether the fault is geometric.
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Self::Fillet(_))
    }
}

/// Record mapping error type
///
/// Raised while converting upstream records into tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The record name does not map to any token
    #[error("Token not supported '{name}'")]
    UnknownToken {
        /// The record name.
        name: String,
    },

    /// A mapper was handed a record of another kind
    #[error("Can not map token '{name}' to {expected}")]
    NameMismatch {
        /// The record name.
        name: String,
        /// The token kind the mapper produces.
        expected: &'static str,
    },

    /// A required field is blank
    #[error("{field} value not specified for {token} operation")]
    MissingField {
        /// Token kind being mapped.
        token: &'static str,
        /// Field name.
        field: &'static str,
    },

    /// A field holds text that is not a valid number
    #[error("{field} value '{value}' is invalid for {token} operation")]
    InvalidField {
        /// Token kind being mapped.
        token: &'static str,
        /// Field name.
        field: &'static str,
        /// Raw field text.
        value: String,
    },

    /// Offset side code is not recognised
    #[error("Invalid offset side '{code}'")]
    InvalidOffset {
        /// Raw offset code.
        code: String,
    },

    /// Neither the record name nor the direction field gives a direction
    #[error("Arc direction must be specified for {token} operation")]
    MissingArcDirection {
        /// Token kind being mapped.
        token: &'static str,
    },
}

/// Main error type for PanelKit
///
/// A unified error that can represent a failure from any layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Fillet geometry error
    #[error(transparent)]
    Fillet(#[from] FilletError),

    /// Token sequencing error
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Record mapping error
    #[error(transparent)]
    Record(#[from] RecordError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a sequencing error
    pub fn is_sequence_error(&self) -> bool {
        matches!(self, Error::Sequence(_))
    }

    /// Check if this is a geometry error, either direct or raised during sequencing
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Fillet(_) | Error::Sequence(SequenceError::Fillet(_)))
    }

    /// Check if this is a record mapping error
    pub fn is_record_error(&self) -> bool {
        matches!(self, Error::Record(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for fillet geometry.
pub type FilletResult<T> = std::result::Result<T, FilletError>;

/// Result type alias for token sequencing.
pub type SequenceResult<T> = std::result::Result<T, SequenceError>;

/// Result type alias for record mapping.
pub type RecordResult<T> = std::result::Result<T, RecordError>;
