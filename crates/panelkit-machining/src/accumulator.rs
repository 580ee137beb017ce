//! Token Accumulator
//!
//! Turns a part face's ordered token stream into the finalised list of
//! machining operations.
//!
//! The accumulator keeps three pieces of state:
//! - `operations`: the finalised output, append-only apart from fillet splicing
//! - `pending`: an open chain of contiguous same-tool routes
//! - `pending_fillet`: a fillet waiting for the segment that follows it
//!
//! Fillets are resolved as soon as the following segment arrives. The segment
//! before the fillet is shortened to the first tangent point, a tangent arc is
//! inserted, and the incoming segment starts at the second tangent point.
//!
//! When a route chain is flushed and its first start equals its last end, a
//! [`SetMill`] marker is emitted ahead of it so the backend re-establishes
//! tool and offset state at the contour start. Outline segments are never
//! buffered and never receive a marker.

use crate::fillet::{FilletCalculator, FilletPoints};
use crate::rectangle::decompose_rectangle;
use panelkit_core::{
    Arc, ArcDirection, ArcOutlineSegment, Fillet, MachiningOperation, OutlineSegment, Route,
    SequenceError, SequenceResult, SequenceSegment, SetMill, Token, Tolerances,
};

/// Which list the most recently seen entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buffer {
    Pending,
    Operations,
}

/// Single-owner state machine that sequences tokens into operations.
///
/// Not meant for concurrent use; process each part face with its own
/// instance. After any error the instance should be discarded.
#[derive(Debug, Clone, Default)]
pub struct TokenAccumulator {
    operations: Vec<MachiningOperation>,
    pending: Vec<MachiningOperation>,
    pending_fillet: Option<Fillet>,
    calculator: FilletCalculator,
}

impl TokenAccumulator {
    /// Create an accumulator with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with the given tolerances
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            calculator: FilletCalculator::new(tolerances),
            ..Self::default()
        }
    }

    pub fn tolerances(&self) -> &Tolerances {
        self.calculator.tolerances()
    }

    /// Whether a fillet is waiting for its following segment.
    pub fn has_pending_fillet(&self) -> bool {
        self.pending_fillet.is_some()
    }

    /// Add one token.
    pub fn add_token(&mut self, token: Token) -> SequenceResult<()> {
        match token {
            Token::Fillet(fillet) => self.add_fillet(fillet),
            Token::Rectangle(rectangle) => {
                for token in decompose_rectangle(&rectangle) {
                    self.add_token(token)?;
                }
                Ok(())
            }
            token => {
                if let Some(fillet) = self.pending_fillet {
                    self.resolve_fillet(fillet, token)?;
                    self.pending_fillet = None;
                    return Ok(());
                }

                match token {
                    Token::Route(route) => self.add_route(route),
                    Token::OutlineSegment(segment) => {
                        self.flush();
                        self.operations
                            .push(MachiningOperation::OutlineSegment(segment));
                    }
                    other => {
                        let operation = MachiningOperation::try_from(other)?;
                        self.flush();
                        self.operations.push(operation);
                    }
                }
                Ok(())
            }
        }
    }

    /// Add every token in order, stopping at the first error.
    pub fn extend<I>(&mut self, tokens: I) -> SequenceResult<()>
    where
        I: IntoIterator<Item = Token>,
    {
        for token in tokens {
            self.add_token(token)?;
        }
        Ok(())
    }

    /// Flush the open chain and return a snapshot of every operation so far.
    ///
    /// A chain flushed here is not reopened by tokens added afterwards. A
    /// pending fillet stays pending and still resolves against the last
    /// returned segment.
    pub fn get_machining_operations(&mut self) -> SequenceResult<Vec<MachiningOperation>> {
        self.flush();
        Ok(self.operations.clone())
    }

    /// Flush and hand over the operation list. Fails when the stream ends on
    /// a fillet.
    pub fn finish(mut self) -> SequenceResult<Vec<MachiningOperation>> {
        if self.pending_fillet.is_some() {
            return Err(SequenceError::DanglingFillet);
        }
        self.flush();
        Ok(self.operations)
    }

    /// A second fillet before the next segment replaces the first.
    fn add_fillet(&mut self, fillet: Fillet) -> SequenceResult<()> {
        let follows_segment = matches!(
            self.last_entity(),
            Some((
                _,
                MachiningOperation::Route(_) | MachiningOperation::OutlineSegment(_)
            ))
        );
        if !follows_segment {
            return Err(SequenceError::FilletWithoutSegment);
        }
        self.pending_fillet = Some(fillet);
        Ok(())
    }

    fn add_route(&mut self, route: Route) {
        let tolerance = self.tolerances().point_tolerance;
        let continues_chain = match self.pending.last().and_then(|op| op.as_segment()) {
            None => true,
            Some(tail) => {
                tail.tool_name() == route.tool_name && tail.end().approx_eq(&route.start, tolerance)
            }
        };

        if !continues_chain {
            self.flush();
        }
        self.pending.push(MachiningOperation::Route(route));
    }

    /// The most recently seen entity. Anything that reaches `operations`
    /// flushes `pending` first, so a non-empty `pending` always holds it.
    fn last_entity(&self) -> Option<(Buffer, &MachiningOperation)> {
        match self.pending.last() {
            Some(op) => Some((Buffer::Pending, op)),
            None => self.operations.last().map(|op| (Buffer::Operations, op)),
        }
    }

    fn buffer_mut(&mut self, buffer: Buffer) -> &mut Vec<MachiningOperation> {
        match buffer {
            Buffer::Pending => &mut self.pending,
            Buffer::Operations => &mut self.operations,
        }
    }

    fn resolve_fillet(&mut self, fillet: Fillet, token: Token) -> SequenceResult<()> {
        let (buffer, replacement) = {
            let (buffer, previous) = self
                .last_entity()
                .ok_or(SequenceError::FilletWithoutSegment)?;

            let replacement = match (previous, token) {
                (MachiningOperation::Route(previous), Token::Route(next)) => {
                    self.fillet_routes(previous, next, fillet.radius)?
                }
                (MachiningOperation::OutlineSegment(previous), Token::OutlineSegment(next)) => {
                    self.fillet_outline_segments(previous, next, fillet.radius)?
                }
                (previous, next) => {
                    return Err(SequenceError::FilletKindMismatch {
                        previous: previous.kind(),
                        next: next.kind(),
                    })
                }
            };
            (buffer, replacement)
        };

        let target = self.buffer_mut(buffer);
        target.pop();
        target.extend(replacement);
        Ok(())
    }

    fn fillet_routes(
        &self,
        previous: &Route,
        next: Route,
        radius: f64,
    ) -> SequenceResult<[MachiningOperation; 3]> {
        self.check_connected(previous, &next, true)?;
        let points = self.solve(previous, &next, radius)?;

        let arc = Arc {
            tool_name: previous.tool_name.clone(),
            start: points.first_tangent,
            end: points.second_tangent,
            radius,
            center: Some(points.center),
            direction: ArcDirection::from_counter_clockwise(points.counter_clockwise),
            start_depth: previous.end_depth,
            end_depth: next.start_depth,
            offset: previous.offset,
            sequence_number: previous.sequence_number,
            number_of_passes: previous.number_of_passes,
            feed_speed: previous.feed_speed,
            spindle_speed: previous.spindle_speed,
        };

        Ok([
            MachiningOperation::Route(previous.clone().with_end(points.first_tangent)),
            MachiningOperation::Arc(arc),
            MachiningOperation::Route(next.with_start(points.second_tangent)),
        ])
    }

    fn fillet_outline_segments(
        &self,
        previous: &OutlineSegment,
        next: OutlineSegment,
        radius: f64,
    ) -> SequenceResult<[MachiningOperation; 3]> {
        self.check_connected(previous, &next, false)?;
        let points = self.solve(previous, &next, radius)?;

        let arc = ArcOutlineSegment {
            tool_name: previous.tool_name.clone(),
            start: points.first_tangent,
            end: points.second_tangent,
            radius,
            center: points.center,
            direction: ArcDirection::from_counter_clockwise(points.counter_clockwise),
            start_depth: previous.end_depth,
            end_depth: next.start_depth,
            sequence_number: previous.sequence_number,
            number_of_passes: previous.number_of_passes,
            feed_speed: previous.feed_speed,
            spindle_speed: previous.spindle_speed,
        };

        Ok([
            MachiningOperation::OutlineSegment(previous.clone().with_end(points.first_tangent)),
            MachiningOperation::ArcOutlineSegment(arc),
            MachiningOperation::OutlineSegment(next.with_start(points.second_tangent)),
        ])
    }

    fn solve(
        &self,
        previous: &dyn SequenceSegment,
        next: &dyn SequenceSegment,
        radius: f64,
    ) -> SequenceResult<FilletPoints> {
        let points =
            self.calculator
                .fillet_points(previous.start(), previous.end(), next.end(), radius)?;
        tracing::debug!(
            "Resolved fillet r={} at {} for tool '{}'",
            radius,
            previous.end(),
            previous.tool_name()
        );
        Ok(points)
    }

    /// Both sides of a fillet must meet and agree on their cutting attributes.
    fn check_connected(
        &self,
        previous: &dyn SequenceSegment,
        next: &dyn SequenceSegment,
        compare_offset: bool,
    ) -> SequenceResult<()> {
        let tolerance = self.tolerances().point_tolerance;

        if !previous.end().approx_eq(&next.start(), tolerance) {
            return Err(SequenceError::FilletDisconnected {
                previous_end: previous.end(),
                next_start: next.start(),
            });
        }

        let mismatch = if previous.tool_name() != next.tool_name() {
            Some("tool name")
        } else if compare_offset && previous.offset() != next.offset() {
            Some("offset")
        } else if previous.sequence_number() != next.sequence_number() {
            Some("sequence number")
        } else if previous.number_of_passes() != next.number_of_passes() {
            Some("number of passes")
        } else if (previous.end_depth() - next.start_depth()).abs() > tolerance {
            Some("depth")
        } else {
            None
        };

        match mismatch {
            Some(attribute) => Err(SequenceError::FilletAttributeMismatch { attribute }),
            None => Ok(()),
        }
    }

    /// Move the open chain to `operations`, marking it when it is closed.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let chain = std::mem::take(&mut self.pending);
        let tolerance = self.tolerances().point_tolerance;

        let set_mill = match (
            chain.first().and_then(|op| op.as_segment()),
            chain.last().and_then(|op| op.as_segment()),
        ) {
            (Some(first), Some(last)) if first.start().approx_eq(&last.end(), tolerance) => {
                Some(SetMill::from_segment(first))
            }
            _ => None,
        };

        match &set_mill {
            Some(marker) => tracing::debug!(
                "Closed chain of {} operations for tool '{}' at {}",
                chain.len(),
                marker.tool_name,
                marker.start
            ),
            None => tracing::trace!("Flushed open chain of {} operations", chain.len()),
        }

        if let Some(marker) = set_mill {
            self.operations.push(MachiningOperation::SetMill(marker));
        }
        self.operations.extend(chain);
    }
}

/// Run a whole token stream through a fresh accumulator.
pub fn accumulate<I>(tokens: I) -> SequenceResult<Vec<MachiningOperation>>
where
    I: IntoIterator<Item = Token>,
{
    let mut accumulator = TokenAccumulator::new();
    accumulator.extend(tokens)?;
    accumulator.finish()
}
