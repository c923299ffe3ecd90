//! Right-to-left masks.
//!
//! An RTL mask fills from the end of the field backwards, the way amount
//! entry works on payment terminals: typing "1234" into `[990].[00]` shows
//! "12.34", and the next digit shifts everything left. Implemented as a
//! mirror: the format and the input are both reversed, the regular engine
//! runs left-to-right, and every output is reversed back.
//!
//! Open-ended (`…`) formats have no RTL counterpart; reversing one puts the
//! ellipsis in front of its value class and compilation reports it.

use crate::engine::compiler::CompileError;
use crate::mask::{Mask, MaskResult};
use crate::model::caret_string::{CaretGravity, CaretString};
use crate::model::notation::Notation;

/// A mask applied right-to-left. Same compile-once semantics as [`Mask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtlMask {
    mask: Mask,
    format: String,
}

impl RtlMask {
    pub fn new(format: &str) -> Result<RtlMask, CompileError> {
        RtlMask::with_notations(format, &[])
    }

    pub fn with_notations(format: &str, notations: &[Notation]) -> Result<RtlMask, CompileError> {
        let mask = Mask::with_notations(&reversed_format(format), notations)?;
        Ok(RtlMask { mask, format: format.to_string() })
    }

    /// The source format string, as written (not reversed).
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn placeholder(&self) -> String {
        self.mask.placeholder().chars().rev().collect()
    }

    pub fn apply(&self, text: &CaretString) -> MaskResult {
        let MaskResult { formatted_text, extracted_value, complete, tail_placeholder, affinity } =
            self.mask.apply(&text.reversed());
        MaskResult {
            formatted_text: formatted_text.reversed(),
            extracted_value: extracted_value.chars().rev().collect(),
            complete,
            tail_placeholder: tail_placeholder.chars().rev().collect(),
            affinity,
        }
    }

    pub fn apply_to_string(&self, text: &str, autocomplete: bool) -> MaskResult {
        self.apply(&CaretString::at_end(text, CaretGravity::Forward { autocomplete }))
    }
}

/// Mirror a format string: reverse the character sequence, swap the block
/// brackets so they still open before they close, and keep escape pairs
/// glued to their characters.
fn reversed_format(format: &str) -> String {
    let mut tokens: Vec<(bool, char)> = Vec::new();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) => tokens.push((true, escaped)),
                None => tokens.push((false, ch)),
            },
            other => tokens.push((false, other)),
        }
    }

    let mut out = String::new();
    for (escaped, ch) in tokens.into_iter().rev() {
        if escaped {
            out.push('\\');
            out.push(ch);
        } else {
            out.push(match ch {
                '[' => ']',
                ']' => '[',
                '{' => '}',
                '}' => '{',
                other => other,
            });
        }
    }
    out
}
