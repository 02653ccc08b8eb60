pub mod model;
pub mod view;

pub use model::{KnobState, PointerEvent, PointerKind, PointerResponse, Tick};
pub use view::draw;

pub const INDICATOR_RADIUS: f64 = 10.0;
pub const INDICATOR_INSET: f64 = 14.0; // distance from the dial edge to the indicator center
pub const GATE_OFFSET: f64 = 3.0; // widens the accepted range on the counter-clockwise side of the dead zone
