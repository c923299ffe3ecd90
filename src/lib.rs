extern crate self as maskline;

#[macro_use]
mod macros;
mod api;
mod engine;
mod mask;
mod model;
mod rtl;

pub use api::{apply, apply_with, placeholder, shared_registry};
pub use engine::{AffinityStrategy, CompileError, MaskRegistry, MaskSelector};
pub use mask::{Mask, MaskAttrs, MaskMetrics, MaskResult};
pub use model::{CaretGravity, CaretString, Notation};
pub use rtl::RtlMask;
