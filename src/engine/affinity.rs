//! Affinity scoring and mask selection.
//!
//! When a field accepts several formats at once (local vs international phone
//! numbers, card PANs of different lengths), every candidate mask is scored
//! against the current input and the best-scoring one formats it. The primary
//! mask wins all ties, so a field never flickers between formats on ambiguous
//! prefixes.

use crate::engine::compiler::CompileError;
use crate::mask::{Mask, MaskAttrs};
use crate::model::caret_string::CaretString;
use crate::model::notation::Notation;

/// How a mask's fitness for a given input is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AffinityStrategy {
    /// Score the whole application pass: +1 per accepted input character,
    /// -1 per character the mask auto-inserted or skipped on its own.
    #[default]
    WholeString,
    /// Length of the common prefix between the formatted result and the raw
    /// input. Favors masks whose decoration the user has already typed.
    Prefix,
    /// Negated distance between the input length and the mask's capacity;
    /// inputs that overflow a closed mask disqualify it outright.
    Capacity,
    /// Like `Capacity`, but measured on the extracted value rather than the
    /// raw input, so decoration characters don't skew the distance.
    ExtractedValueCapacity,
}

impl AffinityStrategy {
    /// Score `mask` against `text`. Higher is better; `i64::MIN` means the
    /// mask cannot hold the input at all.
    pub fn affinity(self, mask: &Mask, text: &CaretString) -> i64 {
        match self {
            AffinityStrategy::WholeString => mask.apply(text).affinity,
            AffinityStrategy::Prefix => {
                common_prefix_len(&mask.apply(text).formatted_text.text, &text.text) as i64
            }
            AffinityStrategy::Capacity => {
                capacity_distance(text.char_len(), mask.total_text_length(), mask.attrs())
            }
            AffinityStrategy::ExtractedValueCapacity => {
                let extracted = mask.apply(text).extracted_value.chars().count();
                capacity_distance(extracted, mask.metrics().total_value_length, mask.attrs())
            }
        }
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn capacity_distance(len: usize, capacity: usize, attrs: MaskAttrs) -> i64 {
    if len > capacity {
        // Open-ended masks have no real capacity ceiling.
        if attrs.contains(MaskAttrs::OPEN_ENDED) { 0 } else { i64::MIN }
    } else {
        len as i64 - capacity as i64
    }
}

/// A primary mask plus the affine alternates it competes against.
///
/// [`MaskSelector::pick`] scores every candidate with the configured
/// [`AffinityStrategy`] and returns the winner; the primary mask is preferred
/// whenever its score ties or beats an alternate's.
#[derive(Debug, Clone)]
pub struct MaskSelector {
    primary: Mask,
    affine: Vec<Mask>,
    strategy: AffinityStrategy,
}

impl MaskSelector {
    pub fn new(
        primary_format: &str,
        affine_formats: &[&str],
        strategy: AffinityStrategy,
    ) -> Result<MaskSelector, CompileError> {
        MaskSelector::with_notations(primary_format, affine_formats, strategy, &[])
    }

    /// All formats, primary and affine alike, share the same notation table.
    pub fn with_notations(
        primary_format: &str,
        affine_formats: &[&str],
        strategy: AffinityStrategy,
        notations: &[Notation],
    ) -> Result<MaskSelector, CompileError> {
        let primary = Mask::with_notations(primary_format, notations)?;
        let affine = affine_formats
            .iter()
            .map(|format| Mask::with_notations(format, notations))
            .collect::<Result<Vec<Mask>, CompileError>>()?;
        Ok(MaskSelector { primary, affine, strategy })
    }

    pub fn primary(&self) -> &Mask {
        &self.primary
    }

    pub fn strategy(&self) -> AffinityStrategy {
        self.strategy
    }

    /// Pick the best-fitting mask for `text`.
    ///
    /// Alternates are ranked by affinity (stable, so earlier-declared
    /// alternates win their ties) and the primary mask is slotted in ahead of
    /// the first alternate it matches or beats.
    pub fn pick(&self, text: &CaretString) -> &Mask {
        if self.affine.is_empty() {
            return &self.primary;
        }

        let primary_affinity = self.strategy.affinity(&self.primary, text);
        let mut ranked: Vec<(&Mask, i64)> =
            self.affine.iter().map(|mask| (mask, self.strategy.affinity(mask, text))).collect();
        // Stable sort: among equally scored alternates, the one declared
        // first stays in front.
        ranked.sort_by_key(|(_, affinity)| std::cmp::Reverse(*affinity));

        let (best, best_affinity) = ranked[0];
        if primary_affinity >= best_affinity { &self.primary } else { best }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::caret_string::CaretGravity;

    fn at_end(text: &str) -> CaretString {
        CaretString::at_end(text, CaretGravity::Forward { autocomplete: false })
    }

    #[test]
    fn whole_string_prefers_the_better_fitting_format() {
        let selector = MaskSelector::new(
            "+7 ([000]) [000]-[00]-[00]",
            &["8 ([000]) [000]-[00]-[00]"],
            AffinityStrategy::WholeString,
        )
        .unwrap();

        assert_eq!(selector.pick(&at_end("+7 999")).format(), "+7 ([000]) [000]-[00]-[00]");
        assert_eq!(selector.pick(&at_end("8 999")).format(), "8 ([000]) [000]-[00]-[00]");
    }

    #[test]
    fn primary_wins_ties() {
        let selector =
            MaskSelector::new("[0000]", &["[0000]"], AffinityStrategy::WholeString).unwrap();
        let picked = selector.pick(&at_end("1234"));
        assert!(std::ptr::eq(picked, selector.primary()));
    }

    #[test]
    fn prefix_counts_typed_decoration() {
        let primary = Mask::new("+7 [000]").unwrap();
        let affine = Mask::new("8 [000]").unwrap();
        let text = at_end("8 999");
        assert_eq!(AffinityStrategy::Prefix.affinity(&affine, &text), 5);
        assert_eq!(AffinityStrategy::Prefix.affinity(&primary, &text), 0);
    }

    #[test]
    fn capacity_distance_table() {
        let short = Mask::new("[00]").unwrap();
        let long = Mask::new("[0000]").unwrap();
        let open = Mask::new("[0…]").unwrap();

        let text = at_end("123");
        assert_eq!(AffinityStrategy::Capacity.affinity(&short, &text), i64::MIN);
        assert_eq!(AffinityStrategy::Capacity.affinity(&long, &text), -1);
        assert_eq!(AffinityStrategy::Capacity.affinity(&open, &text), 0);

        let text = at_end("12");
        assert_eq!(AffinityStrategy::Capacity.affinity(&short, &text), 0);
        assert_eq!(AffinityStrategy::Capacity.affinity(&long, &text), -2);
    }

    #[test]
    fn capacity_picks_the_closest_fit() {
        let selector = MaskSelector::new("[0000]", &["[00]", "[0…]"], AffinityStrategy::Capacity).unwrap();
        assert_eq!(selector.pick(&at_end("12")).format(), "[00]");
        assert_eq!(selector.pick(&at_end("1234")).format(), "[0000]");
        assert_eq!(selector.pick(&at_end("123456")).format(), "[0…]");
    }

    #[test]
    fn extracted_value_capacity_ignores_decoration() {
        let dashed = Mask::new("[00]-[00]").unwrap();
        let plain = Mask::new("[000000]").unwrap();
        let text = at_end("12-34");
        assert_eq!(AffinityStrategy::ExtractedValueCapacity.affinity(&dashed, &text), 0);
        assert_eq!(AffinityStrategy::ExtractedValueCapacity.affinity(&plain, &text), -2);
    }
}
