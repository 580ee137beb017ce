//! Machining tokens as read from a part's token stream.
//!
//! A token is one entry of the flat, ordered input describing a part face:
//! straight cuts (`Route`, `OutlineSegment`), modifiers (`Fillet`), composite
//! shapes (`Rectangle`) and self-contained operations that pass straight
//! through sequencing (bores, pockets, free pocket segments, standalone arcs).
//!
//! All token structs are plain values. "Changing" a segment, for example moving
//! its end onto a fillet tangent point, produces a new value with
//! [`Route::with_end`] and friends.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tool compensation side for routed cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Offset {
    /// No compensation requested
    #[default]
    None,
    /// Tool centre on the path
    Center,
    /// Tool to the left of the direction of travel
    Left,
    /// Tool to the right of the direction of travel
    Right,
    /// Tool inside a closed contour
    Inside,
    /// Tool outside a closed contour
    Outside,
}

impl Offset {
    /// Short code used in token records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Center => "C",
            Self::Left => "L",
            Self::Right => "R",
            Self::Inside => "I",
            Self::Outside => "O",
        }
    }

    /// Parse a record code. Returns `None` for anything unrecognised.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "" => Some(Self::None),
            "C" | "c" => Some(Self::Center),
            "L" | "l" => Some(Self::Left),
            "R" | "r" => Some(Self::Right),
            "I" | "i" => Some(Self::Inside),
            "O" | "o" => Some(Self::Outside),
            _ => None,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Center => write!(f, "Center"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Inside => write!(f, "Inside"),
            Self::Outside => write!(f, "Outside"),
        }
    }
}

/// Rotation sense of an arc, viewed from above the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    ClockWise,
    CounterClockWise,
}

impl ArcDirection {
    pub fn from_counter_clockwise(counter_clockwise: bool) -> Self {
        if counter_clockwise {
            Self::CounterClockWise
        } else {
            Self::ClockWise
        }
    }

    pub fn is_counter_clockwise(&self) -> bool {
        matches!(self, Self::CounterClockWise)
    }

    /// Short code used in token records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ClockWise => "CW",
            Self::CounterClockWise => "CCW",
        }
    }
}

impl fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockWise => write!(f, "ClockWise"),
            Self::CounterClockWise => write!(f, "CounterClockWise"),
        }
    }
}

/// How a drilling token selects its tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSpec {
    /// A tool from the machine's tool file
    Named(String),
    /// Any tool of the given diameter
    Diameter(f64),
}

/// A routed straight cut with tool-offset semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

impl Route {
    pub fn new(
        tool_name: impl Into<String>,
        start: Point,
        end: Point,
        start_depth: f64,
        end_depth: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            start,
            end,
            start_depth,
            end_depth,
            offset: Offset::None,
            sequence_number: 0,
            number_of_passes: 0,
            feed_speed: 0.0,
            spindle_speed: 0.0,
        }
    }

    pub fn with_start(mut self, start: Point) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Point) -> Self {
        self.end = end;
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn with_number_of_passes(mut self, number_of_passes: u32) -> Self {
        self.number_of_passes = number_of_passes;
        self
    }

    pub fn with_feed_speed(mut self, feed_speed: f64) -> Self {
        self.feed_speed = feed_speed;
        self
    }

    pub fn with_spindle_speed(mut self, spindle_speed: f64) -> Self {
        self.spindle_speed = spindle_speed;
        self
    }
}

/// A straight segment of the panel's outer shape. No offset semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSegment {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

impl OutlineSegment {
    pub fn new(
        tool_name: impl Into<String>,
        start: Point,
        end: Point,
        start_depth: f64,
        end_depth: f64,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            start,
            end,
            start_depth,
            end_depth,
            sequence_number: 0,
            number_of_passes: 0,
            feed_speed: 0.0,
            spindle_speed: 0.0,
        }
    }

    pub fn with_start(mut self, start: Point) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: Point) -> Self {
        self.end = end;
        self
    }

    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn with_number_of_passes(mut self, number_of_passes: u32) -> Self {
        self.number_of_passes = number_of_passes;
        self
    }

    pub fn with_feed_speed(mut self, feed_speed: f64) -> Self {
        self.feed_speed = feed_speed;
        self
    }

    pub fn with_spindle_speed(mut self, spindle_speed: f64) -> Self {
        self.spindle_speed = spindle_speed;
        self
    }
}

/// Corner-rounding marker placed between two connected segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fillet {
    pub radius: f64,
}

impl Fillet {
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

/// A closed four-corner routed contour, optionally corner-rounded.
///
/// The path runs `A -> B -> C -> D -> A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub tool_name: String,
    pub corner_a: Point,
    pub corner_b: Point,
    pub corner_c: Point,
    pub corner_d: Point,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

impl Rectangle {
    pub fn new(
        tool_name: impl Into<String>,
        corners: [Point; 4],
        start_depth: f64,
        end_depth: f64,
    ) -> Self {
        let [corner_a, corner_b, corner_c, corner_d] = corners;
        Self {
            tool_name: tool_name.into(),
            corner_a,
            corner_b,
            corner_c,
            corner_d,
            start_depth,
            end_depth,
            offset: Offset::None,
            radius: 0.0,
            sequence_number: 0,
            number_of_passes: 0,
            feed_speed: 0.0,
            spindle_speed: 0.0,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn with_number_of_passes(mut self, number_of_passes: u32) -> Self {
        self.number_of_passes = number_of_passes;
        self
    }

    pub fn with_feed_speed(mut self, feed_speed: f64) -> Self {
        self.feed_speed = feed_speed;
        self
    }

    pub fn with_spindle_speed(mut self, spindle_speed: f64) -> Self {
        self.spindle_speed = spindle_speed;
        self
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.corner_a, self.corner_b, self.corner_c, self.corner_d]
    }
}

/// A routed circular arc.
///
/// Arcs read from a token stream usually carry no centre; arcs synthesised
/// for a fillet always do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    pub direction: ArcDirection,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

/// A single hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bore {
    pub tool: ToolSpec,
    pub position: Point,
    pub depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
}

/// A row of equally spaced holes between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBore {
    pub tool: ToolSpec,
    pub start: Point,
    pub end: Point,
    /// Zero lets the backend derive the count from `spacing`
    #[serde(default)]
    pub hole_count: u32,
    pub spacing: f64,
    pub depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
}

/// A four-corner pocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub tool_name: String,
    pub corner_a: Point,
    pub corner_b: Point,
    pub corner_c: Point,
    pub corner_d: Point,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

/// A round pocket of the given radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularPocket {
    pub tool_name: String,
    pub center: Point,
    pub depth: f64,
    pub radius: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

/// One straight edge of a free-form pocket boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreePocketSegment {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

/// One arc edge of a free-form pocket boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreePocketArcSegment {
    pub tool_name: String,
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub direction: ArcDirection,
    pub start_depth: f64,
    pub end_depth: f64,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub number_of_passes: u32,
    #[serde(default)]
    pub feed_speed: f64,
    #[serde(default)]
    pub spindle_speed: f64,
}

/// One entry of a part face's token stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    Route(Route),
    OutlineSegment(OutlineSegment),
    Fillet(Fillet),
    Rectangle(Rectangle),
    Arc(Arc),
    Bore(Bore),
    MultiBore(MultiBore),
    Pocket(Pocket),
    CircularPocket(CircularPocket),
    FreePocketSegment(FreePocketSegment),
    FreePocketArcSegment(FreePocketArcSegment),
}

impl Token {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Route(_) => "Route",
            Self::OutlineSegment(_) => "OutlineSegment",
            Self::Fillet(_) => "Fillet",
            Self::Rectangle(_) => "Rectangle",
            Self::Arc(_) => "Arc",
            Self::Bore(_) => "Bore",
            Self::MultiBore(_) => "MultiBore",
            Self::Pocket(_) => "Pocket",
            Self::CircularPocket(_) => "CircularPocket",
            Self::FreePocketSegment(_) => "FreePocketSegment",
            Self::FreePocketArcSegment(_) => "FreePocketArcSegment",
        }
    }

    /// Route and outline segments take part in fillet resolution.
    pub fn is_sequenceable(&self) -> bool {
        matches!(self, Self::Route(_) | Self::OutlineSegment(_))
    }
}

macro_rules! impl_from_for_token {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Token {
                fn from(value: $variant) -> Self {
                    Token::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_token!(
    Route,
    OutlineSegment,
    Fillet,
    Rectangle,
    Arc,
    Bore,
    MultiBore,
    Pocket,
    CircularPocket,
    FreePocketSegment,
    FreePocketArcSegment,
);
