//! Rectangle decomposition
//!
//! A rectangle is routed as a closed loop that starts and ends at the middle of
//! side `A -> B`, so every corner (including `A`) sits between two routes and
//! can take a fillet.

use panelkit_core::{Fillet, Point, Rectangle, Route, Token};

/// Expand a rectangle into its route and fillet tokens, in cutting order.
///
/// Yields five routes `mid(A,B) -> B -> C -> D -> A -> mid(A,B)`, with a
/// fillet token between each pair when the rectangle has a non-zero radius.
pub fn decompose_rectangle(rectangle: &Rectangle) -> Vec<Token> {
    let mid = rectangle.corner_a.midpoint(&rectangle.corner_b);
    let path = [
        mid,
        rectangle.corner_b,
        rectangle.corner_c,
        rectangle.corner_d,
        rectangle.corner_a,
        mid,
    ];
    let filleted = rectangle.radius != 0.0;

    let mut tokens = Vec::with_capacity(if filleted { 9 } else { 5 });
    for (i, pair) in path.windows(2).enumerate() {
        if filleted && i > 0 {
            tokens.push(Token::Fillet(Fillet::new(rectangle.radius)));
        }
        tokens.push(Token::Route(side(rectangle, pair[0], pair[1])));
    }

    tracing::debug!(
        "Decomposed rectangle {} -> {} -> {} -> {} (radius {}) into {} tokens",
        rectangle.corner_a,
        rectangle.corner_b,
        rectangle.corner_c,
        rectangle.corner_d,
        rectangle.radius,
        tokens.len()
    );

    tokens
}

fn side(rectangle: &Rectangle, start: Point, end: Point) -> Route {
    Route::new(
        rectangle.tool_name.clone(),
        start,
        end,
        rectangle.start_depth,
        rectangle.end_depth,
    )
    .with_offset(rectangle.offset)
    .with_sequence_number(rectangle.sequence_number)
    .with_number_of_passes(rectangle.number_of_passes)
    .with_feed_speed(rectangle.feed_speed)
    .with_spindle_speed(rectangle.spindle_speed)
}
