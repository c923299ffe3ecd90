//! Mask application: a single pass driving input characters through the
//! compiled state chain.
//!
//! ```text
//!           ┌─────────── accept loop ───────────┐
//! input ──> │ state.accept(ch)?                 │ ──> formatted + extracted
//!           │   pass:   consume ch, advance     │
//!           │   insert: emit mask character     │
//!           │   reject: drop ch, stay put       │
//!           └───────────────────────────────────┘
//!                then: autocomplete drain (Forward) or
//!                      autoskip unwind   (Backward)
//! ```
//!
//! Caret relocation is interleaved with the pass: every mask-inserted
//! character in front of the caret pushes it right, every dropped input
//! character in front of it pulls it left. Whether "at the caret" counts as
//! in front depends on the gravity, so that typing at position N and
//! backspacing to position N behave differently around literals.

use crate::mask::{Mask, MaskAttrs, MaskResult};
use crate::model::caret_string::{CaretGravity, CaretString};
use crate::model::state::{Next, StateChain, StateId, StateKind};

pub(crate) fn apply(mask: &Mask, text: &CaretString) -> MaskResult {
    let chain = mask.chain();
    let chars: Vec<char> = text.text.chars().collect();
    let caret = text.caret_index.min(chars.len());
    let gravity = text.gravity;

    let insertion_affects = |p: usize| match gravity {
        CaretGravity::Forward { .. } => p <= caret,
        CaretGravity::Backward { .. } => p < caret,
    };
    let deletion_affects = |p: usize| p < caret;

    let mut formatted = String::new();
    let mut formatted_len = 0usize;
    let mut extracted = String::new();
    let mut caret_out = caret;
    let mut affinity: i64 = 0;
    let mut state = chain.root();
    let mut pos = 0usize;

    // Autocomplete records for the states traversed in front of the caret;
    // unwound by the autoskip pass. A state that cannot autocomplete resets
    // the run, so only the contiguous trailing run survives.
    let mut skip_stack: Vec<Next> = Vec::new();

    while pos < chars.len() {
        let ch = chars[pos];
        match chain.accept(state, ch) {
            Some(next) => {
                if deletion_affects(pos) {
                    match chain.autocomplete(state) {
                        Some(auto) => skip_stack.push(auto),
                        None => skip_stack.clear(),
                    }
                }
                if let Some(c) = next.insert {
                    formatted.push(c);
                    formatted_len += 1;
                }
                if let Some(c) = next.value {
                    extracted.push(c);
                }
                if next.pass {
                    pos += 1;
                    affinity += 1;
                } else {
                    // The mask produced this step on its own (auto-inserted a
                    // literal or skipped an optional); the input character is
                    // retried against the following state.
                    if next.insert.is_some() && insertion_affects(pos) {
                        caret_out += 1;
                    }
                    affinity -= 1;
                }
                state = next.state;
            }
            None => {
                // Unacceptable character: dropped from the output entirely.
                if deletion_affects(pos) {
                    caret_out = caret_out.saturating_sub(1);
                }
                pos += 1;
            }
        }
    }

    if gravity.autocomplete() {
        // Input ran out; fill in the trailing literal/fixed characters the
        // user would otherwise have to type, stepping over optionals.
        while let Some(next) = chain.autocomplete(state) {
            if let Some(c) = next.insert {
                formatted.push(c);
                formatted_len += 1;
                if insertion_affects(pos) {
                    caret_out += 1;
                }
            }
            state = next.state;
        }
    }

    if gravity.autoskip() {
        // After a deletion that left the caret at the very end, peel off the
        // run of mask-inserted characters sitting in front of it so the next
        // backspace reaches an actual value character.
        while caret_out == formatted_len {
            let Some(next) = skip_stack.pop() else { break };
            let Some(c) = next.insert else { continue };
            if formatted.ends_with(c) {
                formatted.pop();
                formatted_len -= 1;
                caret_out = caret_out.saturating_sub(1);
            } else {
                break;
            }
        }
    }

    caret_out = caret_out.min(formatted_len);

    let complete = mandatory_satisfied(chain, mask.attrs(), state);
    let tail_placeholder = chain.placeholder_from(state);

    if std::env::var_os("MASKLINE_DEBUG").is_some() {
        eprintln!(
            "[apply] {:?} -> {:?} @ {} value={:?} complete={} affinity={}",
            text.text, formatted, caret_out, extracted, complete, affinity
        );
    }

    MaskResult {
        formatted_text: CaretString { text: formatted, caret_index: caret_out, gravity },
        extracted_value: extracted,
        complete,
        tail_placeholder,
        affinity,
    }
}

/// No unfilled non-elliptical mandatory position remains between `from` and
/// the end of the chain. Open-ended tails accept any number of further
/// characters, including zero, so they never count.
fn mandatory_satisfied(chain: &StateChain, attrs: MaskAttrs, from: StateId) -> bool {
    if !attrs.contains(MaskAttrs::HAS_MANDATORY) {
        return true;
    }
    chain.walk_from(from).all(|id| {
        chain.is_elliptical(id)
            || !matches!(chain.kind(id), StateKind::Value { optional: false, .. })
    })
}

#[cfg(test)]
mod tests {
    use crate::mask::Mask;
    use crate::model::caret_string::{CaretGravity, CaretString};

    const FWD: CaretGravity = CaretGravity::Forward { autocomplete: false };

    #[test]
    fn formats_a_phone_number() {
        let mask = Mask::new("+7 ([000]) [000]-[00]-[00]").unwrap();
        let result = mask.apply_to_string("9991234567", false);
        assert_eq!(result.formatted_text.text, "+7 (999) 123-45-67");
        assert_eq!(result.formatted_text.caret_index, 18);
        assert_eq!(result.extracted_value, "9991234567");
        assert!(result.complete);
    }

    #[test]
    fn affinity_rewards_matching_input() {
        let mask = Mask::new("[00].[00]").unwrap();
        assert_eq!(mask.apply_to_string("1234", false).affinity, 3);
        assert_eq!(mask.apply_to_string("12.34", false).affinity, 5);
        assert_eq!(mask.apply_to_string("1.234", false).affinity, 3);
    }

    #[test]
    fn rejected_characters_are_dropped_and_pull_the_caret_left() {
        let mask = Mask::new("[00]").unwrap();
        let result = mask.apply(&CaretString::new("1a2", 3, FWD));
        assert_eq!(result.formatted_text.text, "12");
        assert_eq!(result.formatted_text.caret_index, 2);
        assert_eq!(result.affinity, 2);
    }

    #[test]
    fn forward_insertion_in_the_middle_pushes_the_caret_over_literals() {
        let mask = Mask::new("[00]-[00]").unwrap();
        // "9" was just typed at index 2 of "12-34".
        let result = mask.apply(&CaretString::new("129-34", 3, FWD));
        assert_eq!(result.formatted_text.text, "12-93");
        assert_eq!(result.formatted_text.caret_index, 4);
        assert_eq!(result.extracted_value, "1293");
        assert!(result.complete);
    }

    #[test]
    fn autocomplete_fills_trailing_decoration() {
        let mask = Mask::new("{+7} [000]").unwrap();
        let result = mask.apply_to_string("", true);
        assert_eq!(result.formatted_text.text, "+7 ");
        assert_eq!(result.formatted_text.caret_index, 3);
        assert!(!result.complete);
        assert_eq!(result.tail_placeholder, "000");
    }

    #[test]
    fn autocomplete_is_inert_without_the_flag() {
        let mask = Mask::new("{+7} [000]").unwrap();
        let result = mask.apply_to_string("", false);
        assert_eq!(result.formatted_text.text, "");
        assert_eq!(result.tail_placeholder, "+7 000");
    }

    #[test]
    fn autoskip_peels_trailing_decoration_after_a_deletion() {
        let mask = Mask::new("[00]-[00]").unwrap();
        // "12-3" minus its last digit, backspace gravity.
        let result = mask.apply(&CaretString::at_end("12-", CaretGravity::Backward { autoskip: true }));
        assert_eq!(result.formatted_text.text, "12");
        assert_eq!(result.formatted_text.caret_index, 2);
        assert_eq!(result.extracted_value, "12");
        assert!(!result.complete);
    }

    #[test]
    fn autoskip_wipes_a_pure_decoration_prefix() {
        let mask = Mask::new("+7 ([000]) [000]-[00]-[00]").unwrap();
        // The lone digit was deleted; only mask-inserted characters remain.
        let result = mask.apply(&CaretString::at_end("+7 (", CaretGravity::Backward { autoskip: true }));
        assert_eq!(result.formatted_text.text, "");
        assert_eq!(result.formatted_text.caret_index, 0);
    }

    #[test]
    fn autoskip_leaves_mid_string_deletions_alone() {
        let mask = Mask::new("[00]-[00]").unwrap();
        // "12-34" minus the '2' at index 1.
        let result = mask.apply(&CaretString::new("1-34", 1, CaretGravity::Backward { autoskip: true }));
        assert_eq!(result.formatted_text.text, "13-4");
        assert_eq!(result.formatted_text.caret_index, 1);
    }

    #[test]
    fn backward_gravity_keeps_the_caret_before_inserted_literals() {
        let mask = Mask::new("[00]-[00]").unwrap();
        let result = mask.apply(&CaretString::new("12", 2, CaretGravity::Backward { autoskip: false }));
        assert_eq!(result.formatted_text.text, "12");
        assert_eq!(result.formatted_text.caret_index, 2);
    }

    #[test]
    fn elliptical_tail_accepts_unbounded_input() {
        let mask = Mask::new("[0…]").unwrap();
        let result = mask.apply_to_string("12345", false);
        assert_eq!(result.formatted_text.text, "12345");
        assert_eq!(result.extracted_value, "12345");
        assert!(result.complete);
        // Nothing entered: the first mandatory digit is still unfilled.
        assert!(!mask.apply_to_string("", false).complete);
    }

    #[test]
    fn free_tail_accepts_anything() {
        let mask = Mask::new("[…]").unwrap();
        let result = mask.apply_to_string("a1-ü", false);
        assert_eq!(result.formatted_text.text, "a1-ü");
        assert_eq!(result.extracted_value, "a1-ü");
        assert!(result.complete);
    }

    #[test]
    fn optional_positions_do_not_block_completeness() {
        let mask = Mask::new("[90].[90].[0000]").unwrap();
        let result = mask.apply_to_string("1.2.2001", false);
        assert_eq!(result.formatted_text.text, "1.2.2001");
        assert_eq!(result.extracted_value, "122001");
        assert!(result.complete);
        let result = mask.apply_to_string("14.09.2001", false);
        assert_eq!(result.formatted_text.text, "14.09.2001");
        assert!(result.complete);
    }

    #[test]
    fn out_of_range_caret_is_clamped() {
        let mask = Mask::new("[00]").unwrap();
        let result = mask.apply(&CaretString { text: "1".into(), caret_index: 99, gravity: FWD });
        assert_eq!(result.formatted_text.text, "1");
        assert_eq!(result.formatted_text.caret_index, 1);
    }

    #[test]
    fn tail_placeholder_tracks_the_unfilled_suffix() {
        let mask = Mask::new("+7 ([000]) [000]-[00]-[00]").unwrap();
        assert_eq!(mask.apply_to_string("999", false).tail_placeholder, ") 000-00-00");
        assert_eq!(mask.apply_to_string("9991234567", false).tail_placeholder, "");
    }
}
