//! Character classification for value states.
//!
//! Built-in classes use the standard library's Unicode predicates; custom
//! classes come from a [`Notation`](crate::Notation) and match by exact set
//! membership. No locale-sensitive case folding is performed anywhere.

/// A named set of acceptable characters for a value state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Unicode digit (`[0]` / `[9]`).
    Digit,
    /// Unicode letter (`[A]` / `[a]`).
    Letter,
    /// Unicode letter or digit (`[_]` / `[-]`).
    AlphaNumeric,
    /// Explicit character set from a custom notation.
    Custom { characters: String },
}

impl CharClass {
    /// Exact membership test: does `ch` belong to this class?
    pub fn contains(&self, ch: char) -> bool {
        match self {
            CharClass::Digit => ch.is_numeric(),
            CharClass::Letter => ch.is_alphabetic(),
            CharClass::AlphaNumeric => ch.is_alphanumeric(),
            CharClass::Custom { characters } => characters.contains(ch),
        }
    }

    /// Representative glyph used when rendering placeholders.
    pub fn placeholder(&self) -> char {
        match self {
            CharClass::Digit => '0',
            CharClass::Letter => 'a',
            CharClass::AlphaNumeric => '-',
            CharClass::Custom { characters } => characters.chars().next().unwrap_or('*'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CharClass;

    #[test]
    fn builtin_classes_use_unicode_predicates() {
        assert!(CharClass::Digit.contains('7'));
        assert!(!CharClass::Digit.contains('x'));
        assert!(CharClass::Letter.contains('ü'));
        assert!(!CharClass::Letter.contains('3'));
        assert!(CharClass::AlphaNumeric.contains('3'));
        assert!(CharClass::AlphaNumeric.contains('ü'));
        assert!(!CharClass::AlphaNumeric.contains('-'));
    }

    #[test]
    fn custom_class_is_exact_membership() {
        let hex = CharClass::Custom { characters: "0123456789ABCDEF".into() };
        assert!(hex.contains('F'));
        // No case folding: lowercase hex digits are not members.
        assert!(!hex.contains('f'));
        assert_eq!(hex.placeholder(), '0');
    }

    #[test]
    fn placeholders() {
        assert_eq!(CharClass::Digit.placeholder(), '0');
        assert_eq!(CharClass::Letter.placeholder(), 'a');
        assert_eq!(CharClass::AlphaNumeric.placeholder(), '-');
    }
}
