//! Value types shared across the engine: caret-carrying strings, custom
//! notations, and the compiled state chain itself.

pub mod caret_string;
pub mod notation;
pub mod state;

pub use caret_string::{CaretGravity, CaretString};
pub use notation::Notation;
