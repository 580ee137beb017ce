//! Token records from the upstream part file producer.
//!
//! A [`TokenRecord`] is the raw, all-text form of one token row. Mapping a
//! record to a [`Token`] dispatches on the record name (case-insensitive, with
//! any `*`-suffixed variant marker dropped) and validates every numeric field
//! up front, so malformed input never reaches the accumulator.

use crate::error::{RecordError, RecordResult};
use crate::geometry::Point;
use crate::tokens::{
    Arc, ArcDirection, Bore, CircularPocket, Fillet, FreePocketArcSegment, FreePocketSegment,
    MultiBore, Offset, OutlineSegment, Pocket, Rectangle, Route, Token, ToolSpec,
};
use serde::{Deserialize, Serialize};

/// One token row, every field kept as text.
///
/// Rectangles and rectangular pockets reuse the point columns for their
/// corners: `start` is corner A, `center` is B, `end` is C and `pocket` is D.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenRecord {
    pub name: String,
    pub start_x: String,
    pub start_y: String,
    pub start_z: String,
    pub end_x: String,
    pub end_y: String,
    pub end_z: String,
    pub center_x: String,
    pub center_y: String,
    pub pocket_x: String,
    pub pocket_y: String,
    pub radius: String,
    pub pitch: String,
    pub number_of_passes: String,
    pub offset_side: String,
    pub tool_name: String,
    pub tool_diameter: String,
    pub sequence_num: String,
    pub arc_direction: String,
    pub start_angle: String,
    pub end_angle: String,
    pub feed_speed: String,
    pub spindle_speed: String,
}

impl TokenRecord {
    /// Lower-cased record name without its `*` variant marker.
    pub fn base_name(&self) -> String {
        self.name
            .split('*')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

/// Convert one record into a token.
pub fn map_record_to_token(record: &TokenRecord) -> RecordResult<Token> {
    let token = match record.base_name().as_str() {
        "route" => Token::Route(map_route(record)?),
        "shape" | "outline" => Token::OutlineSegment(map_outline_segment(record)?),
        "fillet" => Token::Fillet(map_fillet(record)?),
        "rectangle" => Token::Rectangle(map_rectangle(record)?),
        "arc" | "cwarc" | "ccwarc" => Token::Arc(map_arc(record)?),
        "bore" => Token::Bore(map_bore(record)?),
        "multibore" => Token::MultiBore(map_multi_bore(record)?),
        "pocket" => map_pocket(record)?,
        "freepocket" => map_free_pocket(record)?,
        _ => {
            return Err(RecordError::UnknownToken {
                name: record.name.clone(),
            })
        }
    };
    tracing::trace!("Mapped record '{}' to {}", record.name, token.kind());
    Ok(token)
}

/// Convert a whole face's records, stopping at the first bad one.
pub fn map_records(records: &[TokenRecord]) -> RecordResult<Vec<Token>> {
    records.iter().map(map_record_to_token).collect()
}

/// Typed field access for one record being mapped to `token`.
struct FieldReader<'a> {
    record: &'a TokenRecord,
    token: &'static str,
}

impl<'a> FieldReader<'a> {
    fn new(record: &'a TokenRecord, token: &'static str) -> Self {
        Self { record, token }
    }

    fn expect_name(&self, accepted: &[&str]) -> RecordResult<()> {
        let name = self.record.base_name();
        if accepted.iter().any(|a| *a == name) {
            Ok(())
        } else {
            Err(RecordError::NameMismatch {
                name: self.record.name.clone(),
                expected: self.token,
            })
        }
    }

    fn required_f64(&self, field: &'static str, raw: &str) -> RecordResult<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RecordError::MissingField {
                token: self.token,
                field,
            });
        }
        self.parse_f64(field, raw)
    }

    fn optional_f64(&self, field: &'static str, raw: &str) -> RecordResult<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0.0);
        }
        self.parse_f64(field, raw)
    }

    fn optional_u32(&self, field: &'static str, raw: &str) -> RecordResult<u32> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse::<u32>().map_err(|_| RecordError::InvalidField {
            token: self.token,
            field,
            value: raw.to_string(),
        })
    }

    fn parse_f64(&self, field: &'static str, raw: &str) -> RecordResult<f64> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(RecordError::InvalidField {
                token: self.token,
                field,
                value: raw.to_string(),
            }),
        }
    }

    fn start(&self) -> RecordResult<Point> {
        Ok(Point::new(
            self.required_f64("Start X", &self.record.start_x)?,
            self.required_f64("Start Y", &self.record.start_y)?,
        ))
    }

    fn end(&self) -> RecordResult<Point> {
        Ok(Point::new(
            self.required_f64("End X", &self.record.end_x)?,
            self.required_f64("End Y", &self.record.end_y)?,
        ))
    }

    fn center(&self) -> RecordResult<Point> {
        Ok(Point::new(
            self.required_f64("Center X", &self.record.center_x)?,
            self.required_f64("Center Y", &self.record.center_y)?,
        ))
    }

    fn pocket(&self) -> RecordResult<Point> {
        Ok(Point::new(
            self.required_f64("Pocket X", &self.record.pocket_x)?,
            self.required_f64("Pocket Y", &self.record.pocket_y)?,
        ))
    }

    fn start_depth(&self) -> RecordResult<f64> {
        self.required_f64("Start Z", &self.record.start_z)
    }

    fn end_depth(&self) -> RecordResult<f64> {
        self.required_f64("End Z", &self.record.end_z)
    }

    fn sequence_number(&self) -> RecordResult<u32> {
        self.optional_u32("Sequence Number", &self.record.sequence_num)
    }

    fn number_of_passes(&self) -> RecordResult<u32> {
        self.optional_u32("Number Of Passes", &self.record.number_of_passes)
    }

    fn feed_speed(&self) -> RecordResult<f64> {
        self.optional_f64("Feed Speed", &self.record.feed_speed)
    }

    fn spindle_speed(&self) -> RecordResult<f64> {
        self.optional_f64("Spindle Speed", &self.record.spindle_speed)
    }

    fn offset(&self) -> RecordResult<Offset> {
        Offset::from_code(&self.record.offset_side).ok_or_else(|| RecordError::InvalidOffset {
            code: self.record.offset_side.clone(),
        })
    }

    fn tool(&self) -> RecordResult<ToolSpec> {
        if self.record.tool_name.trim().is_empty() {
            let diameter = self.required_f64("Tool Diameter", &self.record.tool_diameter)?;
            Ok(ToolSpec::Diameter(diameter))
        } else {
            Ok(ToolSpec::Named(self.record.tool_name.clone()))
        }
    }

    fn direction_field(&self) -> Option<ArcDirection> {
        match self.record.arc_direction.trim().to_ascii_lowercase().as_str() {
            "cw" => Some(ArcDirection::ClockWise),
            "ccw" => Some(ArcDirection::CounterClockWise),
            _ => None,
        }
    }
}

fn map_route(record: &TokenRecord) -> RecordResult<Route> {
    let r = FieldReader::new(record, "Route");
    r.expect_name(&["route"])?;
    Ok(Route {
        tool_name: record.tool_name.clone(),
        start: r.start()?,
        end: r.end()?,
        start_depth: r.start_depth()?,
        end_depth: r.end_depth()?,
        offset: r.offset()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    })
}

fn map_outline_segment(record: &TokenRecord) -> RecordResult<OutlineSegment> {
    let r = FieldReader::new(record, "Outline Segment");
    r.expect_name(&["shape", "outline"])?;
    Ok(OutlineSegment {
        tool_name: record.tool_name.clone(),
        start: r.start()?,
        end: r.end()?,
        start_depth: r.start_depth()?,
        end_depth: r.end_depth()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    })
}

fn map_fillet(record: &TokenRecord) -> RecordResult<Fillet> {
    let r = FieldReader::new(record, "Fillet");
    r.expect_name(&["fillet"])?;
    Ok(Fillet::new(r.required_f64("Radius", &record.radius)?))
}

fn map_rectangle(record: &TokenRecord) -> RecordResult<Rectangle> {
    let r = FieldReader::new(record, "Rectangle");
    r.expect_name(&["rectangle"])?;
    Ok(Rectangle {
        tool_name: record.tool_name.clone(),
        corner_a: r.start()?,
        corner_b: r.center()?,
        corner_c: r.end()?,
        corner_d: r.pocket()?,
        start_depth: r.start_depth()?,
        end_depth: r.end_depth()?,
        offset: r.offset()?,
        radius: r.optional_f64("Radius", &record.radius)?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    })
}

fn map_arc(record: &TokenRecord) -> RecordResult<Arc> {
    let r = FieldReader::new(record, "Arc");
    let direction = match record.base_name().as_str() {
        "cwarc" => ArcDirection::ClockWise,
        "ccwarc" => ArcDirection::CounterClockWise,
        "arc" => r
            .direction_field()
            .ok_or(RecordError::MissingArcDirection { token: "Arc" })?,
        _ => {
            return Err(RecordError::NameMismatch {
                name: record.name.clone(),
                expected: "Arc",
            })
        }
    };

    let center = if record.center_x.trim().is_empty() && record.center_y.trim().is_empty() {
        None
    } else {
        Some(r.center()?)
    };

    Ok(Arc {
        tool_name: record.tool_name.clone(),
        start: r.start()?,
        end: r.end()?,
        radius: r.required_f64("Radius", &record.radius)?,
        center,
        direction,
        start_depth: r.start_depth()?,
        end_depth: r.end_depth()?,
        offset: r.offset()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    })
}

fn map_bore(record: &TokenRecord) -> RecordResult<Bore> {
    let r = FieldReader::new(record, "Bore");
    r.expect_name(&["bore"])?;
    Ok(Bore {
        tool: r.tool()?,
        position: r.start()?,
        depth: r.start_depth()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
    })
}

fn map_multi_bore(record: &TokenRecord) -> RecordResult<MultiBore> {
    let r = FieldReader::new(record, "MultiBore");
    r.expect_name(&["multibore"])?;
    Ok(MultiBore {
        tool: r.tool()?,
        start: r.start()?,
        end: r.end()?,
        hole_count: 0,
        spacing: r.required_f64("Pitch", &record.pitch)?,
        depth: r.start_depth()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
    })
}

/// Rectangular when the record carries a numeric start point, circular otherwise.
fn map_pocket(record: &TokenRecord) -> RecordResult<Token> {
    if record.start_x.trim().parse::<f64>().is_ok() {
        let r = FieldReader::new(record, "Pocket");
        r.expect_name(&["pocket"])?;
        return Ok(Token::Pocket(Pocket {
            tool_name: record.tool_name.clone(),
            corner_a: r.start()?,
            corner_b: r.center()?,
            corner_c: r.end()?,
            corner_d: r.pocket()?,
            start_depth: r.start_depth()?,
            end_depth: r.end_depth()?,
            sequence_number: r.sequence_number()?,
            number_of_passes: r.number_of_passes()?,
            feed_speed: r.feed_speed()?,
            spindle_speed: r.spindle_speed()?,
        }));
    }

    let r = FieldReader::new(record, "Circular Pocket");
    r.expect_name(&["pocket"])?;
    Ok(Token::CircularPocket(CircularPocket {
        tool_name: record.tool_name.clone(),
        center: r.center()?,
        depth: r.start_depth()?,
        radius: r.required_f64("Radius", &record.radius)?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    }))
}

/// Arc segment when the record carries a radius or a direction, straight otherwise.
fn map_free_pocket(record: &TokenRecord) -> RecordResult<Token> {
    let is_arc =
        !record.radius.trim().is_empty() || !record.arc_direction.trim().is_empty();

    if is_arc {
        let r = FieldReader::new(record, "Free Pocket Arc Segment");
        r.expect_name(&["freepocket"])?;
        let direction = r.direction_field().ok_or(RecordError::MissingArcDirection {
            token: "Free Pocket Arc Segment",
        })?;
        return Ok(Token::FreePocketArcSegment(FreePocketArcSegment {
            tool_name: record.tool_name.clone(),
            start: r.start()?,
            end: r.end()?,
            radius: r.required_f64("Radius", &record.radius)?,
            direction,
            start_depth: r.start_depth()?,
            end_depth: r.end_depth()?,
            sequence_number: r.sequence_number()?,
            number_of_passes: r.number_of_passes()?,
            feed_speed: r.feed_speed()?,
            spindle_speed: r.spindle_speed()?,
        }));
    }

    let r = FieldReader::new(record, "Free Pocket Segment");
    r.expect_name(&["freepocket"])?;
    Ok(Token::FreePocketSegment(FreePocketSegment {
        tool_name: record.tool_name.clone(),
        start: r.start()?,
        end: r.end()?,
        start_depth: r.start_depth()?,
        end_depth: r.end_depth()?,
        sequence_number: r.sequence_number()?,
        number_of_passes: r.number_of_passes()?,
        feed_speed: r.feed_speed()?,
        spindle_speed: r.spindle_speed()?,
    }))
}

fn count_field(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

fn speed_field(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        match token {
            Token::Route(route) => TokenRecord {
                name: "Route".to_string(),
                start_x: route.start.x.to_string(),
                start_y: route.start.y.to_string(),
                start_z: route.start_depth.to_string(),
                end_x: route.end.x.to_string(),
                end_y: route.end.y.to_string(),
                end_z: route.end_depth.to_string(),
                offset_side: route.offset.code().to_string(),
                tool_name: route.tool_name.clone(),
                sequence_num: count_field(route.sequence_number),
                number_of_passes: count_field(route.number_of_passes),
                feed_speed: speed_field(route.feed_speed),
                spindle_speed: speed_field(route.spindle_speed),
                ..Default::default()
            },
            Token::OutlineSegment(segment) => TokenRecord {
                name: "Outline".to_string(),
                start_x: segment.start.x.to_string(),
                start_y: segment.start.y.to_string(),
                start_z: segment.start_depth.to_string(),
                end_x: segment.end.x.to_string(),
                end_y: segment.end.y.to_string(),
                end_z: segment.end_depth.to_string(),
                tool_name: segment.tool_name.clone(),
                sequence_num: count_field(segment.sequence_number),
                number_of_passes: count_field(segment.number_of_passes),
                feed_speed: speed_field(segment.feed_speed),
                spindle_speed: speed_field(segment.spindle_speed),
                ..Default::default()
            },
            Token::Fillet(fillet) => TokenRecord {
                name: "Fillet".to_string(),
                radius: fillet.radius.to_string(),
                ..Default::default()
            },
            Token::Rectangle(rectangle) => TokenRecord {
                name: "Rectangle".to_string(),
                start_x: rectangle.corner_a.x.to_string(),
                start_y: rectangle.corner_a.y.to_string(),
                center_x: rectangle.corner_b.x.to_string(),
                center_y: rectangle.corner_b.y.to_string(),
                end_x: rectangle.corner_c.x.to_string(),
                end_y: rectangle.corner_c.y.to_string(),
                pocket_x: rectangle.corner_d.x.to_string(),
                pocket_y: rectangle.corner_d.y.to_string(),
                start_z: rectangle.start_depth.to_string(),
                end_z: rectangle.end_depth.to_string(),
                offset_side: rectangle.offset.code().to_string(),
                radius: rectangle.radius.to_string(),
                tool_name: rectangle.tool_name.clone(),
                sequence_num: count_field(rectangle.sequence_number),
                number_of_passes: count_field(rectangle.number_of_passes),
                feed_speed: speed_field(rectangle.feed_speed),
                spindle_speed: speed_field(rectangle.spindle_speed),
                ..Default::default()
            },
            Token::Arc(arc) => TokenRecord {
                name: match arc.direction {
                    ArcDirection::ClockWise => "CWArc".to_string(),
                    ArcDirection::CounterClockWise => "CCWArc".to_string(),
                },
                start_x: arc.start.x.to_string(),
                start_y: arc.start.y.to_string(),
                start_z: arc.start_depth.to_string(),
                end_x: arc.end.x.to_string(),
                end_y: arc.end.y.to_string(),
                end_z: arc.end_depth.to_string(),
                center_x: arc.center.map(|c| c.x.to_string()).unwrap_or_default(),
                center_y: arc.center.map(|c| c.y.to_string()).unwrap_or_default(),
                radius: arc.radius.to_string(),
                offset_side: arc.offset.code().to_string(),
                tool_name: arc.tool_name.clone(),
                sequence_num: count_field(arc.sequence_number),
                number_of_passes: count_field(arc.number_of_passes),
                feed_speed: speed_field(arc.feed_speed),
                spindle_speed: speed_field(arc.spindle_speed),
                ..Default::default()
            },
            Token::Bore(bore) => {
                let (tool_name, tool_diameter) = tool_fields(&bore.tool);
                TokenRecord {
                    name: "Bore".to_string(),
                    start_x: bore.position.x.to_string(),
                    start_y: bore.position.y.to_string(),
                    start_z: bore.depth.to_string(),
                    tool_name,
                    tool_diameter,
                    sequence_num: count_field(bore.sequence_number),
                    number_of_passes: count_field(bore.number_of_passes),
                    ..Default::default()
                }
            }
            Token::MultiBore(bore) => {
                let (tool_name, tool_diameter) = tool_fields(&bore.tool);
                TokenRecord {
                    name: "MultiBore".to_string(),
                    start_x: bore.start.x.to_string(),
                    start_y: bore.start.y.to_string(),
                    start_z: bore.depth.to_string(),
                    end_x: bore.end.x.to_string(),
                    end_y: bore.end.y.to_string(),
                    pitch: bore.spacing.to_string(),
                    tool_name,
                    tool_diameter,
                    sequence_num: count_field(bore.sequence_number),
                    number_of_passes: count_field(bore.number_of_passes),
                    ..Default::default()
                }
            }
            Token::Pocket(pocket) => TokenRecord {
                name: "Pocket".to_string(),
                start_x: pocket.corner_a.x.to_string(),
                start_y: pocket.corner_a.y.to_string(),
                center_x: pocket.corner_b.x.to_string(),
                center_y: pocket.corner_b.y.to_string(),
                end_x: pocket.corner_c.x.to_string(),
                end_y: pocket.corner_c.y.to_string(),
                pocket_x: pocket.corner_d.x.to_string(),
                pocket_y: pocket.corner_d.y.to_string(),
                start_z: pocket.start_depth.to_string(),
                end_z: pocket.end_depth.to_string(),
                tool_name: pocket.tool_name.clone(),
                sequence_num: count_field(pocket.sequence_number),
                number_of_passes: count_field(pocket.number_of_passes),
                feed_speed: speed_field(pocket.feed_speed),
                spindle_speed: speed_field(pocket.spindle_speed),
                ..Default::default()
            },
            Token::CircularPocket(pocket) => TokenRecord {
                name: "Pocket".to_string(),
                center_x: pocket.center.x.to_string(),
                center_y: pocket.center.y.to_string(),
                start_z: pocket.depth.to_string(),
                radius: pocket.radius.to_string(),
                tool_name: pocket.tool_name.clone(),
                sequence_num: count_field(pocket.sequence_number),
                number_of_passes: count_field(pocket.number_of_passes),
                feed_speed: speed_field(pocket.feed_speed),
                spindle_speed: speed_field(pocket.spindle_speed),
                ..Default::default()
            },
            Token::FreePocketSegment(segment) => TokenRecord {
                name: "FreePocket".to_string(),
                start_x: segment.start.x.to_string(),
                start_y: segment.start.y.to_string(),
                start_z: segment.start_depth.to_string(),
                end_x: segment.end.x.to_string(),
                end_y: segment.end.y.to_string(),
                end_z: segment.end_depth.to_string(),
                tool_name: segment.tool_name.clone(),
                sequence_num: count_field(segment.sequence_number),
                number_of_passes: count_field(segment.number_of_passes),
                feed_speed: speed_field(segment.feed_speed),
                spindle_speed: speed_field(segment.spindle_speed),
                ..Default::default()
            },
            Token::FreePocketArcSegment(segment) => TokenRecord {
                name: "FreePocket".to_string(),
                start_x: segment.start.x.to_string(),
                start_y: segment.start.y.to_string(),
                start_z: segment.start_depth.to_string(),
                end_x: segment.end.x.to_string(),
                end_y: segment.end.y.to_string(),
                end_z: segment.end_depth.to_string(),
                radius: segment.radius.to_string(),
                arc_direction: segment.direction.code().to_string(),
                tool_name: segment.tool_name.clone(),
                sequence_num: count_field(segment.sequence_number),
                number_of_passes: count_field(segment.number_of_passes),
                feed_speed: speed_field(segment.feed_speed),
                spindle_speed: speed_field(segment.spindle_speed),
                ..Default::default()
            },
        }
    }
}

fn tool_fields(tool: &ToolSpec) -> (String, String) {
    match tool {
        ToolSpec::Named(name) => (name.clone(), String::new()),
        ToolSpec::Diameter(diameter) => (String::new(), diameter.to_string()),
    }
}
