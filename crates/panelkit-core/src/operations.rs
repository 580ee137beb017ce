//! Finalised machining operations handed to a G-code backend.

use crate::error::SequenceError;
use crate::geometry::Point;
use crate::tokens::{
    Arc, ArcDirection, Bore, CircularPocket, FreePocketArcSegment, FreePocketSegment, MultiBore,
    Offset, OutlineSegment, Pocket, Route, Token,
};
use serde::{Deserialize, Serialize};

/// Marker placed before a closed same-tool chain so the backend re-establishes
/// tool and offset state at the contour start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetMill {
    pub tool_name: String,
    pub start: Point,
    pub start_depth: f64,
    pub offset: Offset,
    pub sequence_number: u32,
    pub number_of_passes: u32,
    pub feed_speed: f64,
    pub spindle_speed: f64,
}

impl SetMill {
    /// Copy the entry state of a chain's first segment.
    pub fn from_segment(segment: &dyn SequenceSegment) -> Self {
        Self {
            tool_name: segment.tool_name().to_string(),
            start: segment.start(),
            start_depth: segment.start_depth(),
            offset: segment.offset(),
            sequence_number: segment.sequence_number(),
            number_of_passes: segment.number_of_passes(),
            feed_speed: segment.feed_speed(),
            spindle_speed: segment.spindle_speed(),
        }
    }
}

/// Arc joining two filleted outline segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcOutlineSegment {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub center: Point,
    pub direction: ArcDirection,
    pub start_depth: f64,
    pub end_depth: f64,
    pub sequence_number: u32,
    pub number_of_passes: u32,
    pub feed_speed: f64,
    pub spindle_speed: f64,
}

/// The attribute set shared by every segment that can take part in a
/// connected tool path.
pub trait SequenceSegment {
    fn tool_name(&self) -> &str;
    fn start(&self) -> Point;
    fn end(&self) -> Point;
    fn start_depth(&self) -> f64;
    fn end_depth(&self) -> f64;
    /// Outline geometry has no compensation and reports [`Offset::None`].
    fn offset(&self) -> Offset;
    fn sequence_number(&self) -> u32;
    fn number_of_passes(&self) -> u32;
    fn feed_speed(&self) -> f64;
    fn spindle_speed(&self) -> f64;
}

macro_rules! impl_sequence_segment {
    ($ty:ty, |$s:ident| $offset:expr) => {
        impl SequenceSegment for $ty {
            fn tool_name(&self) -> &str {
                &self.tool_name
            }
            fn start(&self) -> Point {
                self.start
            }
            fn end(&self) -> Point {
                self.end
            }
            fn start_depth(&self) -> f64 {
                self.start_depth
            }
            fn end_depth(&self) -> f64 {
                self.end_depth
            }
            fn offset(&self) -> Offset {
                let $s = self;
                $offset
            }
            fn sequence_number(&self) -> u32 {
                self.sequence_number
            }
            fn number_of_passes(&self) -> u32 {
                self.number_of_passes
            }
            fn feed_speed(&self) -> f64 {
                self.feed_speed
            }
            fn spindle_speed(&self) -> f64 {
                self.spindle_speed
            }
        }
    };
}

impl_sequence_segment!(Route, |s| s.offset);
impl_sequence_segment!(Arc, |s| s.offset);
impl_sequence_segment!(OutlineSegment, |_s| Offset::None);
impl_sequence_segment!(ArcOutlineSegment, |_s| Offset::None);

/// One entry of the finalised operation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MachiningOperation {
    SetMill(SetMill),
    Route(Route),
    Arc(Arc),
    OutlineSegment(OutlineSegment),
    ArcOutlineSegment(ArcOutlineSegment),
    Bore(Bore),
    MultiBore(MultiBore),
    Pocket(Pocket),
    CircularPocket(CircularPocket),
    FreePocketSegment(FreePocketSegment),
    FreePocketArcSegment(FreePocketArcSegment),
}

impl MachiningOperation {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetMill(_) => "SetMill",
            Self::Route(_) => "Route",
            Self::Arc(_) => "Arc",
            Self::OutlineSegment(_) => "OutlineSegment",
            Self::ArcOutlineSegment(_) => "ArcOutlineSegment",
            Self::Bore(_) => "Bore",
            Self::MultiBore(_) => "MultiBore",
            Self::Pocket(_) => "Pocket",
            Self::CircularPocket(_) => "CircularPocket",
            Self::FreePocketSegment(_) => "FreePocketSegment",
            Self::FreePocketArcSegment(_) => "FreePocketArcSegment",
        }
    }

    /// The connected-path view of this operation, if it has one.
    pub fn as_segment(&self) -> Option<&dyn SequenceSegment> {
        match self {
            Self::Route(route) => Some(route),
            Self::Arc(arc) => Some(arc),
            Self::OutlineSegment(segment) => Some(segment),
            Self::ArcOutlineSegment(arc) => Some(arc),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            Self::Route(route) => Some(route),
            _ => None,
        }
    }

    pub fn is_set_mill(&self) -> bool {
        matches!(self, Self::SetMill(_))
    }
}

impl TryFrom<Token> for MachiningOperation {
    type Error = SequenceError;

    /// Modifiers and composite shapes are not operations in their own right.
    fn try_from(token: Token) -> Result<Self, Self::Error> {
        match token {
            Token::Route(route) => Ok(Self::Route(route)),
            Token::OutlineSegment(segment) => Ok(Self::OutlineSegment(segment)),
            Token::Arc(arc) => Ok(Self::Arc(arc)),
            Token::Bore(bore) => Ok(Self::Bore(bore)),
            Token::MultiBore(bore) => Ok(Self::MultiBore(bore)),
            Token::Pocket(pocket) => Ok(Self::Pocket(pocket)),
            Token::CircularPocket(pocket) => Ok(Self::CircularPocket(pocket)),
            Token::FreePocketSegment(segment) => Ok(Self::FreePocketSegment(segment)),
            Token::FreePocketArcSegment(segment) => Ok(Self::FreePocketArcSegment(segment)),
            other @ (Token::Fillet(_) | Token::Rectangle(_)) => {
                Err(SequenceError::UnexpectedToken { kind: other.kind() })
            }
        }
    }
}
