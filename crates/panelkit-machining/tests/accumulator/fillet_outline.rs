use crate::common::{assert_continuous, kinds, outline_token, p, route_token};
use panelkit_core::{
    ArcDirection, Fillet, MachiningOperation, OutlineSegment, SequenceError, Token,
};
use panelkit_machining::{accumulate, TokenAccumulator};

#[test]
fn test_filleted_outline_has_arc_outline_segments_and_no_marker() {
    let tokens = vec![
        outline_token(p(300.0, 0.0), p(600.0, 0.0)),
        Token::Fillet(Fillet::new(10.0)),
        outline_token(p(600.0, 0.0), p(600.0, 400.0)),
        Token::Fillet(Fillet::new(10.0)),
        outline_token(p(600.0, 400.0), p(0.0, 400.0)),
        Token::Fillet(Fillet::new(10.0)),
        outline_token(p(0.0, 400.0), p(0.0, 0.0)),
        Token::Fillet(Fillet::new(10.0)),
        outline_token(p(0.0, 0.0), p(300.0, 0.0)),
    ];
    let ops = accumulate(tokens).unwrap();

    assert_eq!(
        kinds(&ops),
        [
            "OutlineSegment",
            "ArcOutlineSegment",
            "OutlineSegment",
            "ArcOutlineSegment",
            "OutlineSegment",
            "ArcOutlineSegment",
            "OutlineSegment",
            "ArcOutlineSegment",
            "OutlineSegment",
        ]
    );
    assert_continuous(&ops);

    for op in &ops {
        if let MachiningOperation::ArcOutlineSegment(arc) = op {
            assert_eq!(arc.direction, ArcDirection::CounterClockWise);
            assert!((arc.center.distance_to(&arc.start) - 10.0).abs() < 1e-9);
            assert!((arc.center.distance_to(&arc.end) - 10.0).abs() < 1e-9);
            assert_eq!(arc.start_depth, -18.0);
            assert_eq!(arc.sequence_number, 9);
        }
    }
}

#[test]
fn test_outline_flushes_open_route_chain() {
    let ops = accumulate([
        route_token(p(0.0, 0.0), p(10.0, 0.0)),
        outline_token(p(0.0, 0.0), p(10.0, 0.0)),
        route_token(p(10.0, 0.0), p(20.0, 0.0)),
    ])
    .unwrap();
    assert_eq!(kinds(&ops), ["Route", "OutlineSegment", "Route"]);
}

#[test]
fn test_outline_then_route_after_fillet_is_rejected() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(outline_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(Token::Fillet(Fillet::new(2.0))).unwrap();
    assert_eq!(
        accumulator.add_token(route_token(p(10.0, 0.0), p(10.0, 10.0))),
        Err(SequenceError::FilletKindMismatch {
            previous: "OutlineSegment",
            next: "Route",
        })
    );
}

#[test]
fn test_outline_attribute_mismatch_is_rejected() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(outline_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(Token::Fillet(Fillet::new(2.0))).unwrap();

    let other_tool = OutlineSegment::new("E009", p(10.0, 0.0), p(10.0, 10.0), -18.0, -18.0)
        .with_sequence_number(9);
    assert_eq!(
        accumulator.add_token(Token::OutlineSegment(other_tool)),
        Err(SequenceError::FilletAttributeMismatch {
            attribute: "tool name"
        })
    );
}

#[test]
fn test_disconnected_outline_is_rejected() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(outline_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(Token::Fillet(Fillet::new(2.0))).unwrap();
    let err = accumulator
        .add_token(outline_token(p(10.0, 1.0), p(10.0, 10.0)))
        .unwrap_err();
    assert!(err.is_connectivity_error());
}
