use once_cell::sync::Lazy;

use crate::engine::compiler::CompileError;
use crate::engine::registry::MaskRegistry;
use crate::mask::MaskResult;
use crate::model::caret_string::CaretString;

static SHARED_REGISTRY: Lazy<MaskRegistry> = Lazy::new(MaskRegistry::new);

/// The process-wide mask cache used by [`apply`] and [`apply_with`].
///
/// Fields that manage their own mask lifetimes can ignore this and hold a
/// [`Mask`](crate::Mask) or their own [`MaskRegistry`] directly.
pub fn shared_registry() -> &'static MaskRegistry {
    &SHARED_REGISTRY
}

/// Format `text` with `format`, caret at the end, no autocompletion.
///
/// Compiled masks are cached in the [`shared_registry`], so calling this in a
/// keystroke handler only pays for compilation once per format.
///
/// # Example
/// ```
/// use maskline::apply;
///
/// let result = apply("[00]:[00]", "1234").unwrap();
/// assert_eq!(result.formatted_text.text, "12:34");
/// assert_eq!(result.extracted_value, "1234");
/// assert!(result.complete);
/// ```
pub fn apply(format: &str, text: &str) -> Result<MaskResult, CompileError> {
    let mask = SHARED_REGISTRY.get_or_compile(format, &[])?;
    Ok(mask.apply_to_string(text, false))
}

/// Format a caret-carrying `text` with `format`, honoring its gravity flags.
///
/// Use this from input handlers that track the cursor: the result carries the
/// relocated caret.
pub fn apply_with(format: &str, text: &CaretString) -> Result<MaskResult, CompileError> {
    let mask = SHARED_REGISTRY.get_or_compile(format, &[])?;
    Ok(mask.apply(text))
}

/// The placeholder rendering of `format` (for example `"+7 (000) 000-00-00"`).
pub fn placeholder(format: &str) -> Result<String, CompileError> {
    let mask = SHARED_REGISTRY.get_or_compile(format, &[])?;
    Ok(mask.placeholder().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::caret_string::CaretGravity;

    #[test]
    fn apply_formats_and_extracts() {
        let result = apply("+7 ([000]) [000]-[00]-[00]", "9991234567").unwrap();
        assert_eq!(result.formatted_text.text, "+7 (999) 123-45-67");
        assert_eq!(result.extracted_value, "9991234567");
    }

    #[test]
    fn apply_with_honors_gravity() {
        let text = CaretString::at_end("12-", CaretGravity::Backward { autoskip: true });
        let result = apply_with("[00]-[00]", &text).unwrap();
        assert_eq!(result.formatted_text.text, "12");
    }

    #[test]
    fn placeholder_renders_the_empty_mask() {
        assert_eq!(placeholder("+7 ([000]) [000]-[00]-[00]").unwrap(), "+7 (000) 000-00-00");
    }

    #[test]
    fn malformed_formats_surface_the_compile_error() {
        assert!(matches!(apply("[00", ""), Err(CompileError::UnterminatedValueBlock { position: 0 })));
    }

    #[test]
    fn repeated_formats_hit_the_cache() {
        let before = shared_registry().len();
        apply("[0000] [0000] [0000] [0000]", "1").unwrap();
        apply("[0000] [0000] [0000] [0000]", "12").unwrap();
        let after = shared_registry().len();
        assert!(after <= before + 1);
    }

    #[test]
    fn mask_macro_compiles_once() {
        let a = mask!("[00]:[00]");
        let b = mask!("[AA]-[00]", crate::Notation::new('H', "0123456789ABCDEF", false));
        assert_eq!(a.apply_to_string("1234", false).formatted_text.text, "12:34");
        assert_eq!(b.placeholder(), "aa-00");
    }
}
