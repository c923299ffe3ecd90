/// A user-defined character class usable inside `[...]` blocks of a mask
/// format, alongside the built-in digit/letter/alphanumeric classes.
///
/// The `character` is the tag that appears in the format string; `characters`
/// is the exact set of acceptable input characters (no case folding). Built-in
/// class characters (`0 9 A a _ -`) and `…` cannot be overridden; notation
/// tags are consulted only after them.
///
/// ```
/// use maskline::{Mask, Notation};
///
/// let hex = Notation::new('H', "0123456789ABCDEF", false);
/// let mask = Mask::with_notations("0x[HHHH]", &[hex]).unwrap();
/// assert_eq!(mask.apply_to_string("1F2C", false).formatted_text.text, "0x1F2C");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notation {
    /// Tag character used inside `[...]` blocks.
    pub character: char,
    /// Acceptable input characters; membership is exact.
    pub characters: String,
    /// Whether the position may be skipped when the input doesn't match.
    pub is_optional: bool,
}

impl Notation {
    pub fn new(character: char, characters: impl Into<String>, is_optional: bool) -> Self {
        Notation { character, characters: characters.into(), is_optional }
    }
}
