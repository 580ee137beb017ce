use crate::common::{kinds, p, route, route_token};
use panelkit_core::{Bore, MachiningOperation, Point, Token, ToolSpec};
use panelkit_machining::{accumulate, TokenAccumulator};

fn triangle(tool: &str, origin: Point) -> Vec<Token> {
    let a = origin;
    let b = p(origin.x + 100.0, origin.y);
    let c = p(origin.x + 50.0, origin.y + 80.0);
    vec![
        Token::Route(route(tool, a, b)),
        Token::Route(route(tool, b, c)),
        Token::Route(route(tool, c, a)),
    ]
}

#[test]
fn test_closed_triangle_gets_set_mill() {
    let ops = accumulate(triangle("A", p(0.0, 0.0))).unwrap();
    assert_eq!(kinds(&ops), ["SetMill", "Route", "Route", "Route"]);

    let MachiningOperation::SetMill(set_mill) = &ops[0] else {
        panic!("expected a SetMill marker");
    };
    let first = ops[1].as_route().unwrap();
    assert_eq!(set_mill.start, first.start);
    assert_eq!(set_mill.tool_name, first.tool_name);
    assert_eq!(set_mill.start_depth, first.start_depth);
    assert_eq!(set_mill.offset, first.offset);
    assert_eq!(set_mill.sequence_number, first.sequence_number);
    assert_eq!(set_mill.number_of_passes, first.number_of_passes);
}

#[test]
fn test_two_closed_triangles_with_different_tools() {
    let mut tokens = triangle("A", p(0.0, 0.0));
    tokens.extend(triangle("B", p(0.0, 0.0)));
    let ops = accumulate(tokens).unwrap();

    assert_eq!(
        kinds(&ops),
        ["SetMill", "Route", "Route", "Route", "SetMill", "Route", "Route", "Route"]
    );
    let MachiningOperation::SetMill(second) = &ops[4] else {
        panic!("expected a SetMill marker");
    };
    assert_eq!(second.tool_name, "B");
}

#[test]
fn test_open_chain_has_no_marker() {
    let ops = accumulate([
        route_token(p(0.0, 0.0), p(10.0, 0.0)),
        route_token(p(10.0, 0.0), p(10.0, 10.0)),
    ])
    .unwrap();
    assert_eq!(kinds(&ops), ["Route", "Route"]);
}

#[test]
fn test_gap_starts_new_chain() {
    let ops = accumulate([
        route_token(p(0.0, 0.0), p(10.0, 0.0)),
        route_token(p(20.0, 0.0), p(30.0, 0.0)),
        route_token(p(30.0, 0.0), p(20.0, 0.0)),
    ])
    .unwrap();
    assert_eq!(kinds(&ops), ["Route", "SetMill", "Route", "Route"]);
}

#[test]
fn test_pass_through_operations_keep_order() {
    let bore = |x: f64| {
        Token::Bore(Bore {
            tool: ToolSpec::Diameter(8.0),
            position: p(x, 10.0),
            depth: -12.0,
            sequence_number: 0,
            number_of_passes: 0,
        })
    };
    let ops = accumulate([bore(1.0), route_token(p(0.0, 0.0), p(5.0, 0.0)), bore(2.0)]).unwrap();
    assert_eq!(kinds(&ops), ["Bore", "Route", "Bore"]);
}

#[test]
fn test_mid_stream_retrieval_does_not_reopen_chain() {
    let mut accumulator = TokenAccumulator::new();
    accumulator
        .extend([
            route_token(p(0.0, 0.0), p(10.0, 0.0)),
            route_token(p(10.0, 0.0), p(10.0, 10.0)),
        ])
        .unwrap();
    let snapshot = accumulator.get_machining_operations().unwrap();
    assert_eq!(snapshot.len(), 2);

    accumulator
        .add_token(route_token(p(10.0, 10.0), p(0.0, 0.0)))
        .unwrap();
    let ops = accumulator.finish().unwrap();
    assert_eq!(kinds(&ops), ["Route", "Route", "Route"]);
}
