use crate::common::p;
use panelkit_core::{FilletDegeneracy, Point, Tolerances};
use panelkit_machining::{get_fillet_points, FilletCalculator};

const CORNER: Point = Point::new(10.0, 10.0);

#[test]
fn test_direction_table_around_fixed_corner() {
    let cases = [
        (p(5.0, 5.0), p(20.0, 5.0), false),
        (p(5.0, 5.0), p(5.0, 20.0), true),
        (p(20.0, 5.0), p(20.0, 20.0), false),
        (p(20.0, 5.0), p(5.0, 5.0), true),
        (p(20.0, 20.0), p(5.0, 20.0), false),
        (p(20.0, 20.0), p(20.0, 5.0), true),
        (p(5.0, 20.0), p(5.0, 5.0), false),
        (p(5.0, 20.0), p(20.0, 20.0), true),
    ];

    for (start, end, counter_clockwise) in cases {
        let fillet = get_fillet_points(start, CORNER, end, 5.0)
            .unwrap_or_else(|e| panic!("{start} -> {end}: {e}"));
        assert_eq!(
            fillet.counter_clockwise, counter_clockwise,
            "{start} -> {CORNER} -> {end}"
        );
    }
}

#[test]
fn test_center_is_radius_from_both_tangents() {
    let radius = 5.0;
    for (start, end) in [
        (p(5.0, 5.0), p(20.0, 5.0)),
        (p(5.0, 5.0), p(5.0, 20.0)),
        (p(20.0, 20.0), p(5.0, 20.0)),
        (p(5.0, 20.0), p(20.0, 20.0)),
    ] {
        let fillet = get_fillet_points(start, CORNER, end, radius).unwrap();
        assert!((fillet.center.distance_to(&fillet.first_tangent) - radius).abs() < 1e-9);
        assert!((fillet.center.distance_to(&fillet.second_tangent) - radius).abs() < 1e-9);
    }
}

#[test]
fn test_tangent_points_lie_on_segments() {
    let start = p(0.0, 0.0);
    let end = p(20.0, 20.0);
    let corner = p(10.0, 0.0);
    let fillet = get_fillet_points(start, corner, end, 5.0).unwrap();

    assert!(fillet.first_tangent.y.abs() < 1e-12);
    assert!(fillet.first_tangent.x > 0.0 && fillet.first_tangent.x < 10.0);

    let along = fillet.second_tangent - corner;
    let direction = end - corner;
    assert!(along.cross(&direction).abs() < 1e-9);
    assert!(along.dot(&direction) > 0.0);
    assert!(fillet.counter_clockwise);
}

#[test]
fn test_straight_through_corner_is_rejected() {
    let err = get_fillet_points(p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0), 10.0).unwrap_err();
    assert_eq!(err.reason(), FilletDegeneracy::Collinear);
    assert!(err.to_string().starts_with("Invalid fillet between points"));
}

#[test]
fn test_reversing_corner_is_rejected() {
    let err = get_fillet_points(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 0.0), 10.0).unwrap_err();
    assert_eq!(err.reason(), FilletDegeneracy::Collinear);
}

#[test]
fn test_nearly_straight_corner_never_returns_non_finite_points() {
    let calculator = FilletCalculator::new(Tolerances::default());
    let result = calculator.fillet_points(p(0.0, 0.0), p(10.0, 0.0), p(20.0, 1e-12), 1.0);
    match result {
        Ok(fillet) => {
            assert!(fillet.first_tangent.is_finite());
            assert!(fillet.second_tangent.is_finite());
            assert!(fillet.center.is_finite());
        }
        Err(err) => assert!(matches!(
            err.reason(),
            FilletDegeneracy::Collinear | FilletDegeneracy::RadiusTooLarge
        )),
    }
}
