use crate::common::{assert_continuous, kinds, p, TOOL};
use panelkit_core::{MachiningOperation, Offset, Rectangle, SequenceSegment, Token};
use panelkit_machining::accumulate;

fn rectangle() -> Rectangle {
    Rectangle::new(
        TOOL,
        [p(0.0, 0.0), p(200.0, 0.0), p(200.0, 100.0), p(0.0, 100.0)],
        -5.0,
        -5.0,
    )
    .with_offset(Offset::Inside)
    .with_sequence_number(4)
}

#[test]
fn test_square_cornered_rectangle() {
    let ops = accumulate([Token::Rectangle(rectangle())]).unwrap();
    assert_eq!(
        kinds(&ops),
        ["SetMill", "Route", "Route", "Route", "Route", "Route"]
    );
    assert_continuous(&ops);
}

#[test]
fn test_radiused_rectangle_is_closed_with_four_arcs() {
    let ops = accumulate([Token::Rectangle(rectangle().with_radius(10.0))]).unwrap();

    assert_eq!(ops.len(), 10);
    assert!(ops[0].is_set_mill());
    assert_eq!(
        ops.iter()
            .filter(|op| matches!(op, MachiningOperation::Arc(_)))
            .count(),
        4
    );
    assert_continuous(&ops);

    let first = ops[1].as_segment().unwrap();
    let last = ops[ops.len() - 1].as_segment().unwrap();
    assert_eq!(first.start(), last.end());
    assert_eq!(first.start(), p(100.0, 0.0));

    for op in &ops[1..] {
        let segment = op.as_segment().unwrap();
        assert_eq!(segment.offset(), Offset::Inside);
        assert_eq!(segment.sequence_number(), 4);
    }
}

#[test]
fn test_radius_too_large_for_rectangle() {
    let err = accumulate([Token::Rectangle(rectangle().with_radius(150.0))]).unwrap_err();
    assert!(err.is_geometry_error());
}
