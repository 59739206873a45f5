//! Terminal styling for fieldom output.

use colored::{Color, ColoredString, Colorize};
use comfy_table::Color as CellColor;

/// What a status line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Done,
    Failed,
    Caution,
    Note,
    Trace,
}

impl Tone {
    pub fn mark(self) -> &'static str {
        match self {
            Tone::Done => "✓",
            Tone::Failed => "✗",
            Tone::Caution => "⚠",
            Tone::Note => "ℹ",
            Tone::Trace => "→",
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Done => Color::Green,
            Tone::Failed => Color::Red,
            Tone::Caution => Color::Yellow,
            Tone::Note => Color::Blue,
            Tone::Trace => Color::BrightBlack,
        }
    }

    pub fn paint(self, text: &str) -> ColoredString {
        text.color(self.color())
    }

    /// Failures and traces go to stderr so piped mappings stay clean.
    pub fn to_stderr(self) -> bool {
        matches!(self, Tone::Failed | Tone::Trace)
    }
}

/// Cell color of a field type in listings. Composite kinds stand apart from leaves.
pub fn type_color(type_name: &str) -> Option<CellColor> {
    let color = match type_name {
        "object" | "nested" => CellColor::Cyan,
        "text" | "keyword" | "string" => CellColor::Green,
        "byte" | "short" | "integer" | "long" | "float" | "half_float" | "double" | "scaled_float" => {
            CellColor::Yellow
        }
        "date" | "date_range" => CellColor::Magenta,
        _ => return None,
    };
    Some(color)
}

pub fn label(text: &str) -> ColoredString {
    text.bright_cyan().bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_and_traces_use_stderr() {
        assert!(Tone::Failed.to_stderr());
        assert!(Tone::Trace.to_stderr());
        assert!(!Tone::Done.to_stderr());
        assert_eq!(Tone::Caution.mark(), "⚠");
    }

    #[test]
    fn composite_types_are_highlighted() {
        assert_eq!(type_color("nested"), Some(CellColor::Cyan));
        assert_eq!(type_color("scaled_float"), Some(CellColor::Yellow));
        assert_eq!(type_color("geo_point"), None);
    }
}
