//! Compiled masks and application results.

use std::fmt;

use crate::engine::applier;
use crate::engine::compiler::{self, CompileError};
use crate::model::caret_string::{CaretGravity, CaretString};
use crate::model::notation::Notation;
use crate::model::state::{StateChain, StateKind};

bitflags::bitflags! {
    /// Coarse summary of a compiled chain, derived once at compile time.
    ///
    /// `OPEN_ENDED` marks masks with an ellipsis tail; those can hold inputs
    /// of any length, which the capacity affinity strategy needs to know.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaskAttrs: u8 {
        const HAS_MANDATORY = 1 << 0;
        const HAS_OPTIONAL  = 1 << 1;
        const HAS_FIXED     = 1 << 2;
        const OPEN_ENDED    = 1 << 3;
    }
}

/// Length metrics of a compiled mask, counted in characters.
///
/// "Acceptable" lengths are the minimum needed to satisfy every mandatory
/// position; "total" lengths include optional positions too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskMetrics {
    /// Characters the fully filled mask renders (placeholder length).
    pub total_text_length: usize,
    /// Characters needed to satisfy all mandatory positions.
    pub acceptable_text_length: usize,
    /// Extracted-value characters the mask can capture.
    pub total_value_length: usize,
    /// Extracted-value characters required for a complete mask.
    pub acceptable_value_length: usize,
}

/// A compiled representation of a format string as a chain of
/// character-matching states.
///
/// Compiling is the expensive half; applying is a single pure pass. Masks are
/// immutable after compilation and safe to share across threads (see
/// [`MaskRegistry`](crate::MaskRegistry) for memoized sharing).
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    format: String,
    chain: StateChain,
    metrics: MaskMetrics,
    placeholder: String,
    attrs: MaskAttrs,
}

impl Mask {
    /// Compile `format` with no custom notations.
    pub fn new(format: &str) -> Result<Mask, CompileError> {
        Mask::with_notations(format, &[])
    }

    /// Compile `format`, resolving custom notation tags inside value blocks.
    pub fn with_notations(format: &str, notations: &[Notation]) -> Result<Mask, CompileError> {
        let chain = compiler::compile(format, notations)?;
        let (metrics, placeholder, attrs) = survey(&chain);
        Ok(Mask { format: format.to_string(), chain, metrics, placeholder, attrs })
    }

    /// Drive `text` through the state chain.
    ///
    /// Autocompletion and autoskipping ride on the caret gravity: see
    /// [`CaretGravity`]. The result is fully determined and the traversal
    /// never blocks or fails; malformed caret indexes are clamped.
    pub fn apply(&self, text: &CaretString) -> MaskResult {
        applier::apply(self, text)
    }

    /// Apply with the caret at the end of `text` and `Forward` gravity.
    /// This is the "reformat a whole field" entry point.
    pub fn apply_to_string(&self, text: &str, autocomplete: bool) -> MaskResult {
        self.apply(&CaretString::at_end(text, CaretGravity::Forward { autocomplete }))
    }

    /// The source format string.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// What the mask looks like with no input: every literal/fixed character
    /// plus a representative glyph per value position.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn metrics(&self) -> &MaskMetrics {
        &self.metrics
    }

    pub fn attrs(&self) -> MaskAttrs {
        self.attrs
    }

    /// Shorthand for `metrics().total_text_length`.
    pub fn total_text_length(&self) -> usize {
        self.metrics.total_text_length
    }

    pub(crate) fn chain(&self) -> &StateChain {
        &self.chain
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({:?}: {})", self.format, self.chain.describe())
    }
}

/// Output of [`Mask::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskResult {
    /// Formatted display text with the relocated caret.
    pub formatted_text: CaretString,
    /// The characters captured by value states, in order, without
    /// literal/fixed decoration.
    pub extracted_value: String,
    /// `true` iff every mandatory value position was satisfied by real input.
    pub complete: bool,
    /// Placeholder rendering of the still-unfilled suffix of the mask.
    pub tail_placeholder: String,
    /// How well the input fit the mask: one point per accepted character,
    /// minus one per character the mask had to insert or skip on its own.
    pub affinity: i64,
}

/// Single compile-time walk deriving metrics, placeholder and attrs.
fn survey(chain: &StateChain) -> (MaskMetrics, String, MaskAttrs) {
    let mut metrics = MaskMetrics::default();
    let mut placeholder = String::new();
    let mut attrs = MaskAttrs::empty();

    for id in chain.walk() {
        let elliptical = chain.is_elliptical(id);
        if elliptical {
            attrs |= MaskAttrs::OPEN_ENDED;
        }
        match chain.kind(id) {
            StateKind::Literal { .. } => {
                metrics.total_text_length += 1;
                metrics.acceptable_text_length += 1;
            }
            StateKind::Fixed { .. } => {
                metrics.total_text_length += 1;
                metrics.acceptable_text_length += 1;
                attrs |= MaskAttrs::HAS_FIXED;
            }
            StateKind::Free => {
                metrics.total_text_length += 1;
                metrics.total_value_length += 1;
            }
            StateKind::Value { optional, .. } => {
                metrics.total_text_length += 1;
                metrics.total_value_length += 1;
                if *optional {
                    attrs |= MaskAttrs::HAS_OPTIONAL;
                } else {
                    metrics.acceptable_text_length += 1;
                    metrics.acceptable_value_length += 1;
                    // An open-ended mandatory tail accepts zero extra
                    // characters, so it never blocks completeness.
                    if !elliptical {
                        attrs |= MaskAttrs::HAS_MANDATORY;
                    }
                }
            }
            StateKind::EndOfLine => {}
        }
        if let Some(c) = chain.placeholder_char(id) {
            placeholder.push(c);
        }
    }

    (metrics, placeholder, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_length_matches_total_text_length() {
        for format in ["[00]:[00]", "+7 ([000]) [000]-[00]-[00]", "[90].[90].[0000]", "{+7} [000]", "[0…]"] {
            let mask = Mask::new(format).unwrap();
            assert_eq!(
                mask.placeholder().chars().count(),
                mask.total_text_length(),
                "placeholder/total mismatch for {format:?}"
            );
        }
    }

    #[test]
    fn phone_mask_metrics() {
        let mask = Mask::new("+7 ([000]) [000]-[00]-[00]").unwrap();
        assert_eq!(mask.placeholder(), "+7 (000) 000-00-00");
        let m = mask.metrics();
        assert_eq!(m.total_text_length, 18);
        assert_eq!(m.acceptable_text_length, 18);
        assert_eq!(m.total_value_length, 10);
        assert_eq!(m.acceptable_value_length, 10);
        assert!(mask.attrs().contains(MaskAttrs::HAS_MANDATORY));
        assert!(!mask.attrs().contains(MaskAttrs::OPEN_ENDED));
    }

    #[test]
    fn optional_positions_count_toward_totals_only() {
        let mask = Mask::new("[90]").unwrap();
        let m = mask.metrics();
        assert_eq!(m.total_text_length, 2);
        assert_eq!(m.acceptable_text_length, 1);
        assert_eq!(m.total_value_length, 2);
        assert_eq!(m.acceptable_value_length, 1);
        assert!(mask.attrs().contains(MaskAttrs::HAS_OPTIONAL));
    }

    #[test]
    fn fixed_blocks_set_attrs_and_render_in_placeholder() {
        let mask = Mask::new("{+7} [000]").unwrap();
        assert_eq!(mask.placeholder(), "+7 000");
        assert!(mask.attrs().contains(MaskAttrs::HAS_FIXED));
    }

    #[test]
    fn elliptical_mask_is_open_ended() {
        let mask = Mask::new("[0…]").unwrap();
        assert!(mask.attrs().contains(MaskAttrs::OPEN_ENDED));
        assert_eq!(mask.placeholder(), "00");
    }

    #[test]
    fn debug_rendering_shows_the_chain() {
        let mask = Mask::new("[00]:[00]").unwrap();
        let rendered = format!("{mask:?}");
        assert!(rendered.contains("[0] -> [0] -> ':'"), "unexpected debug: {rendered}");
    }
}
