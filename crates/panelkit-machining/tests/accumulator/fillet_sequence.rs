use crate::common::{assert_continuous, kinds, outline_token, p, route, route_token, TOOL};
use panelkit_core::{ArcDirection, Fillet, MachiningOperation, Offset, Route, SequenceError, Token};
use panelkit_machining::{accumulate, TokenAccumulator};

fn fillet(radius: f64) -> Token {
    Token::Fillet(Fillet::new(radius))
}

fn square_with_fillets(size: f64, radius: f64) -> Vec<Token> {
    let half = size / 2.0;
    vec![
        route_token(p(half, 0.0), p(size, 0.0)),
        fillet(radius),
        route_token(p(size, 0.0), p(size, size)),
        fillet(radius),
        route_token(p(size, size), p(0.0, size)),
        fillet(radius),
        route_token(p(0.0, size), p(0.0, 0.0)),
        fillet(radius),
        route_token(p(0.0, 0.0), p(half, 0.0)),
    ]
}

#[test]
fn test_filleted_square_is_closed_and_continuous() {
    let ops = accumulate(square_with_fillets(50.0, 5.0)).unwrap();

    assert_eq!(
        kinds(&ops),
        [
            "SetMill", "Route", "Arc", "Route", "Arc", "Route", "Arc", "Route", "Arc", "Route"
        ]
    );
    assert_continuous(&ops);

    let MachiningOperation::SetMill(set_mill) = &ops[0] else {
        panic!("expected a SetMill marker");
    };
    assert_eq!(set_mill.start, p(25.0, 0.0));
    assert_eq!(set_mill.tool_name, TOOL);

    for op in &ops {
        if let MachiningOperation::Arc(arc) = op {
            let center = arc.center.expect("synthesised arcs carry a center");
            assert!((center.distance_to(&arc.start) - 5.0).abs() < 1e-9);
            assert!((center.distance_to(&arc.end) - 5.0).abs() < 1e-9);
            assert_eq!(arc.direction, ArcDirection::CounterClockWise);
            assert_eq!(arc.tool_name, TOOL);
            assert_eq!(arc.sequence_number, 1);
        }
    }

    let first = ops[1].as_route().unwrap();
    assert_eq!(first.start, p(25.0, 0.0));
    assert!(first.end.approx_eq(&p(45.0, 0.0), 1e-9));
}

#[test]
fn test_clockwise_square_gives_clockwise_arcs() {
    let tokens = vec![
        route_token(p(0.0, 25.0), p(0.0, 50.0)),
        fillet(2.0),
        route_token(p(0.0, 50.0), p(50.0, 50.0)),
        fillet(2.0),
        route_token(p(50.0, 50.0), p(50.0, 0.0)),
    ];
    let ops = accumulate(tokens).unwrap();
    assert_eq!(kinds(&ops), ["Route", "Arc", "Route", "Arc", "Route"]);
    for op in &ops {
        if let MachiningOperation::Arc(arc) = op {
            assert_eq!(arc.direction, ArcDirection::ClockWise);
        }
    }
}

#[test]
fn test_accumulation_is_deterministic() {
    let width = 302.125;
    let height = 1521.325;
    let tokens = vec![
        route_token(p(width / 2.0, 0.0), p(width, 0.0)),
        fillet(12.5),
        route_token(p(width, 0.0), p(width, height)),
        fillet(12.5),
        route_token(p(width, height), p(0.0, height)),
        fillet(12.5),
        route_token(p(0.0, height), p(0.0, 0.0)),
        fillet(12.5),
        route_token(p(0.0, 0.0), p(width / 2.0, 0.0)),
    ];

    let first = accumulate(tokens.clone()).unwrap();
    let second = accumulate(tokens).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);
    assert_continuous(&first);
}

#[test]
fn test_disconnected_routes_are_rejected() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(route_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(fillet(5.0)).unwrap();
    let err = accumulator
        .add_token(route_token(p(15.0, 0.0), p(20.0, 20.0)))
        .unwrap_err();

    assert_eq!(
        err,
        SequenceError::FilletDisconnected {
            previous_end: p(10.0, 0.0),
            next_start: p(15.0, 0.0),
        }
    );
    assert!(err.is_connectivity_error());
}

fn attribute_error(next: Token) -> SequenceError {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(route_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(fillet(2.0)).unwrap();
    accumulator.add_token(next).unwrap_err()
}

#[test]
fn test_attribute_mismatches_are_rejected() {
    let base = route(TOOL, p(10.0, 0.0), p(10.0, 10.0));

    let cases = [
        (
            Route {
                tool_name: "E002".to_string(),
                ..base.clone()
            },
            "tool name",
        ),
        (base.clone().with_offset(Offset::Left), "offset"),
        (base.clone().with_sequence_number(2), "sequence number"),
        (base.clone().with_number_of_passes(3), "number of passes"),
        (
            Route {
                start_depth: -4.0,
                ..base.clone()
            },
            "depth",
        ),
    ];

    for (next, attribute) in cases {
        let err = attribute_error(Token::Route(next));
        assert_eq!(err, SequenceError::FilletAttributeMismatch { attribute });
        assert!(err.is_connectivity_error());
    }
}

#[test]
fn test_fillet_between_route_and_outline_is_rejected() {
    let err = attribute_error(outline_token(p(10.0, 0.0), p(10.0, 10.0)));
    assert_eq!(
        err,
        SequenceError::FilletKindMismatch {
            previous: "Route",
            next: "OutlineSegment",
        }
    );
    assert!(err.is_placement_error());
}

#[test]
fn test_straight_through_fillet_is_geometry_error() {
    let err = attribute_error(route_token(p(10.0, 0.0), p(20.0, 0.0)));
    assert!(err.is_geometry_error());
    assert!(err.to_string().starts_with("Invalid fillet between points"));
}

#[test]
fn test_oversized_radius_is_geometry_error() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .add_token(route_token(p(0.0, 0.0), p(10.0, 0.0)))
        .unwrap();
    accumulator.add_token(fillet(50.0)).unwrap();
    let err = accumulator
        .add_token(route_token(p(10.0, 0.0), p(10.0, 10.0)))
        .unwrap_err();
    assert!(err.is_geometry_error());
}

#[test]
fn test_ramped_depth_carries_through_arc() {
    let first = route(TOOL, p(0.0, 0.0), p(10.0, 0.0));
    let first = Route {
        start_depth: -1.0,
        end_depth: -2.0,
        ..first
    };
    let second = Route {
        start_depth: -2.0,
        end_depth: -3.0,
        ..route(TOOL, p(10.0, 0.0), p(10.0, 10.0))
    };

    let ops = accumulate([Token::Route(first), fillet(1.0), Token::Route(second)]).unwrap();
    let arc = ops[1].as_segment().unwrap();
    assert_eq!(arc.start_depth(), -2.0);
    assert_eq!(arc.end_depth(), -2.0);
    assert_eq!(ops[2].as_route().unwrap().end_depth, -3.0);
}
