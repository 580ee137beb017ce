use crate::common::{p, route, TOOL};
use panelkit_core::{ArcDirection, Fillet, MachiningOperation, Point, Token};
use panelkit_machining::{accumulate, get_fillet_points};
use proptest::prelude::*;

fn heading(degrees: f64, length: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (radians.cos() * length, radians.sin() * length)
}

fn corner_path(start: Point, bearing: f64, turn: f64, len1: f64, len2: f64) -> (Point, Point) {
    let (dx1, dy1) = heading(bearing, len1);
    let corner = p(start.x + dx1, start.y + dy1);
    let (dx2, dy2) = heading(bearing + turn, len2);
    (corner, p(corner.x + dx2, corner.y + dy2))
}

proptest! {
    #[test]
    fn filleted_corner_stays_connected(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        bearing in 0.0f64..360.0,
        turn in 20.0f64..160.0,
        left in any::<bool>(),
        len1 in 50.0f64..200.0,
        len2 in 50.0f64..200.0,
        radius in 0.5f64..5.0,
    ) {
        let turn = if left { turn } else { -turn };
        let start = p(x, y);
        let (corner, end) = corner_path(start, bearing, turn, len1, len2);

        let ops = accumulate([
            Token::Route(route(TOOL, start, corner)),
            Token::Fillet(Fillet::new(radius)),
            Token::Route(route(TOOL, corner, end)),
        ])
        .unwrap();
        prop_assert_eq!(ops.len(), 3);

        let first = ops[0].as_route().unwrap();
        let third = ops[2].as_route().unwrap();
        let MachiningOperation::Arc(arc) = &ops[1] else {
            panic!("expected an arc between the routes");
        };
        let center = arc.center.unwrap();

        prop_assert_eq!(first.end, arc.start);
        prop_assert_eq!(arc.end, third.start);
        prop_assert_eq!(first.start, start);
        prop_assert_eq!(third.end, end);
        prop_assert!((center.distance_to(&arc.start) - radius).abs() < 1e-6);
        prop_assert!((center.distance_to(&arc.end) - radius).abs() < 1e-6);
        prop_assert_eq!(arc.direction, ArcDirection::from_counter_clockwise(left));
    }

    #[test]
    fn fillet_solution_is_deterministic(
        bearing in 0.0f64..360.0,
        turn in -160.0f64..160.0,
        radius in 0.5f64..5.0,
    ) {
        prop_assume!(turn.abs() > 20.0);
        let (corner, end) = corner_path(p(0.0, 0.0), bearing, turn, 100.0, 100.0);
        let first = get_fillet_points(p(0.0, 0.0), corner, end, radius).unwrap();
        let second = get_fillet_points(p(0.0, 0.0), corner, end, radius).unwrap();
        prop_assert_eq!(first, second);
    }
}
