//! # PanelKit Core
//!
//! Core types for PanelKit.
//! Provides the 2D geometry primitives, the machining token model, the
//! finalised operation list, record mapping from the upstream part file
//! producer, and the error types shared by every crate in the workspace.

pub mod error;
pub mod geometry;
pub mod operations;
pub mod records;
pub mod tokens;
pub mod tolerance;

pub use error::{
    Error, FilletDegeneracy, FilletError, FilletResult, RecordError, RecordResult, Result,
    SequenceError, SequenceResult,
};

pub use geometry::{Line, Point, Vector2};

pub use operations::{ArcOutlineSegment, MachiningOperation, SequenceSegment, SetMill};

pub use records::{map_record_to_token, map_records, TokenRecord};

pub use tokens::{
    Arc, ArcDirection, Bore, CircularPocket, Fillet, FreePocketArcSegment, FreePocketSegment,
    MultiBore, Offset, OutlineSegment, Pocket, Rectangle, Route, Token, ToolSpec,
};

pub use tolerance::Tolerances;
