use std::fmt;

/// A string paired with the cursor position inside it.
///
/// `caret_index` counts *characters*, not bytes; a character index can never
/// land in the middle of a multi-byte codepoint, which keeps the caret on a
/// valid boundary by construction. `0..=char_len()` are the legal positions.
#[derive(Clone, PartialEq, Eq)]
pub struct CaretString {
    /// Text from the user (or a previously formatted result).
    pub text: String,
    /// Cursor position, in characters, `0..=text.chars().count()`.
    pub caret_index: usize,
    /// Which side of mask-inserted characters the caret lands on.
    pub gravity: CaretGravity,
}

impl CaretString {
    /// Create a caret string. Out-of-range caret indexes are a caller bug and
    /// trip an assertion in debug builds; release paths clamp during `apply`.
    pub fn new(text: impl Into<String>, caret_index: usize, gravity: CaretGravity) -> Self {
        let text = text.into();
        debug_assert!(
            caret_index <= text.chars().count(),
            "caret index {} out of range for {} character(s)",
            caret_index,
            text.chars().count()
        );
        CaretString { text, caret_index, gravity }
    }

    /// Create a caret string with the caret at the end of the line.
    pub fn at_end(text: impl Into<String>, gravity: CaretGravity) -> Self {
        let text = text.into();
        let caret_index = text.chars().count();
        CaretString { text, caret_index, gravity }
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Mirror image of this caret string: reversed text with the caret
    /// measured from the opposite end. Used by right-to-left masks.
    pub fn reversed(&self) -> CaretString {
        let len = self.char_len();
        CaretString {
            text: self.text.chars().rev().collect(),
            caret_index: len - self.caret_index.min(len),
            gravity: self.gravity,
        }
    }
}

impl fmt::Debug for CaretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {} ({:?})", self.text, self.caret_index, self.gravity)
    }
}

/// When the mask puts additional characters at the caret position, the caret
/// moves in this direction.
///
/// The caret usually has `Forward` gravity; `Backward` is the result of
/// deletion/backspacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretGravity {
    /// Put mask-inserted characters before the caret, moving it forward.
    /// `autocomplete` additionally fills trailing literal/fixed positions
    /// once the input runs out.
    Forward { autocomplete: bool },
    /// Put mask-inserted characters after the caret, leaving it in place.
    /// `autoskip` additionally trims the run of skippable (literal/fixed)
    /// characters immediately preceding the caret after a deletion.
    Backward { autoskip: bool },
}

impl CaretGravity {
    pub(crate) fn autocomplete(self) -> bool {
        matches!(self, CaretGravity::Forward { autocomplete: true })
    }

    pub(crate) fn autoskip(self) -> bool {
        matches!(self, CaretGravity::Backward { autoskip: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_end_counts_characters_not_bytes() {
        let cs = CaretString::at_end("héllo", CaretGravity::Forward { autocomplete: false });
        assert_eq!(cs.caret_index, 5);
        assert_eq!(cs.char_len(), 5);
    }

    #[test]
    fn reversed_mirrors_text_and_caret() {
        let cs = CaretString::new("12:34", 2, CaretGravity::Forward { autocomplete: false });
        let rev = cs.reversed();
        assert_eq!(rev.text, "43:21");
        assert_eq!(rev.caret_index, 3);
        assert_eq!(rev.reversed(), cs);
    }

    #[test]
    fn gravity_flags() {
        assert!(CaretGravity::Forward { autocomplete: true }.autocomplete());
        assert!(!CaretGravity::Forward { autocomplete: false }.autocomplete());
        assert!(CaretGravity::Backward { autoskip: true }.autoskip());
        assert!(!CaretGravity::Forward { autocomplete: true }.autoskip());
    }
}
