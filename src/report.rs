use maskline::{CaretString, Mask, MaskResult};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(mask: &Mask, input: &CaretString, result: &MaskResult, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Mask: \"{}\"", mask.format()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Compiled ━━━", ansi::GRAY));
    println!("  {}", palette.dim(format!("{mask:?}")));
    println!("  Placeholder: {}", palette.paint(mask.placeholder(), ansi::BLUE));
    let metrics = mask.metrics();
    println!(
        "  Capacity: {}  {}  Required: {}",
        palette.paint(
            format!("{} text / {} value", metrics.total_text_length, metrics.total_value_length),
            ansi::YELLOW
        ),
        palette.dim("│"),
        palette.paint(
            format!("{} text / {} value", metrics.acceptable_text_length, metrics.acceptable_value_length),
            ansi::YELLOW
        ),
    );

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    println!("  Input:     {}", palette.dim(with_caret_marker(input)));
    println!(
        "  Formatted: {}",
        palette.bold(palette.paint(with_caret_marker(&result.formatted_text), ansi::GREEN))
    );
    println!("  Extracted: {}", palette.paint(&result.extracted_value, ansi::BLUE));
    println!(
        "  Complete: {}  {}  Affinity: {}",
        if result.complete {
            palette.paint("yes", ansi::GREEN)
        } else {
            palette.paint("no", ansi::YELLOW)
        },
        palette.dim("│"),
        palette.paint(result.affinity.to_string(), ansi::CYAN),
    );
    if !result.tail_placeholder.is_empty() {
        println!("  Remaining: {}", palette.dim(&result.tail_placeholder));
    }
    println!();
}

/// Render the text with a `▏` marker at the caret position.
fn with_caret_marker(text: &CaretString) -> String {
    let mut out = String::new();
    for (idx, ch) in text.text.chars().enumerate() {
        if idx == text.caret_index {
            out.push('▏');
        }
        out.push(ch);
    }
    if text.caret_index >= text.text.chars().count() {
        out.push('▏');
    }
    out
}
