//! # PanelKit Machining
//!
//! Sequencing of part-face token streams into machining operations.
//!
//! - **Fillet Calculator**: tangent points, arc center and turn direction for a rounded corner
//! - **Rectangle decomposition**: closed four-sided routes with optional corner fillets
//! - **Token Accumulator**: fillet resolution, open-chain buffering and closed-loop `SetMill` markers

pub mod accumulator;
pub mod fillet;
pub mod rectangle;

pub use accumulator::{accumulate, TokenAccumulator};
pub use fillet::{get_fillet_points, FilletCalculator, FilletPoints};
pub use rectangle::decompose_rectangle;
