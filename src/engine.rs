//! Mask compilation and application engine.
//!
//! This module is the *internal entry point* for the masking engine; the
//! public API re-exports live at the crate root. The engine is split into
//! focused submodules under `src/engine/` while keeping crate paths stable
//! (for example `crate::engine::compiler::compile`).
//!
//! ## How the parts work together
//!
//! At a high level, formatting an input string is a pipeline:
//!
//! ```text
//! format string ──┐
//!                 │  compiler::compile            (compiler.rs)
//!                 │    - scan into per-position specifiers
//!                 │    - fold tail-first into the state arena
//!                 └───────────────┬──────────────
//!                                 │
//! input + caret ──────────────────┼─ StateChain (model/state.rs)
//!                                 v
//!                       applier::apply (applier.rs)
//!                         - drive characters through states
//!                         - relocate the caret as it goes
//!                         - autocomplete / autoskip per gravity
//!                                 │
//!                                 v
//!                            MaskResult
//! ```
//!
//! Compilation is the expensive half and its output is immutable, which is
//! what makes the [`registry`] cache and the multi-format [`affinity`]
//! scoring cheap: both hand the same compiled chain to any number of apply
//! passes.
//!
//! ## Responsibilities by module
//!
//! - `classifier.rs`: character class membership for value positions.
//! - `compiler.rs`: format grammar, scan + fold, typed compile errors.
//! - `applier.rs`: the single-pass apply loop and caret arithmetic.
//! - `affinity.rs`: scoring strategies and the primary-vs-affine selector.
//! - `registry.rs`: thread-safe memoization of compiled masks.
//!
//! ## Debugging
//!
//! Set `MASKLINE_DEBUG=1` to print compile and apply traces.

#[path = "engine/affinity.rs"]
pub(crate) mod affinity;
#[path = "engine/applier.rs"]
pub(crate) mod applier;
#[path = "engine/classifier.rs"]
pub(crate) mod classifier;
#[path = "engine/compiler.rs"]
pub(crate) mod compiler;
#[path = "engine/registry.rs"]
pub(crate) mod registry;


pub use affinity::{AffinityStrategy, MaskSelector};
pub use compiler::CompileError;
pub use registry::MaskRegistry;
