//! Typed errors for the assembler, with both a plain [`std::fmt::Display`]
//! for logs/tests and a colorized multi-line rendering for terminal use,
//! following the two-tier message style of the teacher's `ParseError`.

use colored::Colorize;
use std::fmt;

/// A 1-based line number within the source text an error is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblerError {
    MalformedOffsetDirective { reason: String, line: Line },
    UnknownMnemonic { mnemonic: String, line: Line },
    ArityMismatch { mnemonic: String, expected: usize, actual: usize, line: Line },
    EmptyLabel { line: Line },
    InvalidLabelOperand { mnemonic: String, line: Line },
    MalformedHexLiteral { text: String, line: Line },
    UnresolvedLabel { label: String, line: Option<Line> },
}

impl AssemblerError {
    fn line(&self) -> Option<Line> {
        match self {
            AssemblerError::MalformedOffsetDirective { line, .. }
            | AssemblerError::UnknownMnemonic { line, .. }
            | AssemblerError::ArityMismatch { line, .. }
            | AssemblerError::EmptyLabel { line }
            | AssemblerError::InvalidLabelOperand { line, .. }
            | AssemblerError::MalformedHexLiteral { line, .. } => Some(*line),
            AssemblerError::UnresolvedLabel { line, .. } => *line,
        }
    }

    /// A colorized, multi-line rendering of the error with the offending
    /// source line highlighted underneath it. Intended for terminal output;
    /// `Display` stays a single plain line for logs and tests.
    pub fn render(&self, source: &str) -> String {
        let Some(Line(number)) = self.line() else {
            return format!("{}", self);
        };

        let mut out = String::new();
        if let Some(text) = source.lines().nth(number - 1) {
            out.push_str(&format!("{:>4} {} {}\n", number, "|".cyan(), text.bright_white()));
            out.push_str(&format!("     {} {}\n", "|".cyan(), format!("{}", self).bright_red()));
        } else {
            out.push_str(&format!("{}", self).bright_red().to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblerError::MalformedOffsetDirective { reason, line } => {
                write!(f, "line {}: malformed offset directive: {}", line.0, reason)
            }
            AssemblerError::UnknownMnemonic { mnemonic, line } => {
                write!(f, "line {}: unknown mnemonic \"{}\"", line.0, mnemonic)
            }
            AssemblerError::ArityMismatch { mnemonic, expected, actual, line } => write!(
                f,
                "line {}: \"{}\" requires {} argument(s), found {}",
                line.0, mnemonic, expected, actual
            ),
            AssemblerError::EmptyLabel { line } => {
                write!(f, "line {}: label has length 0", line.0)
            }
            AssemblerError::InvalidLabelOperand { mnemonic, line } => write!(
                f,
                "line {}: \"{}\" does not take a label operand",
                line.0, mnemonic
            ),
            AssemblerError::MalformedHexLiteral { text, line } => {
                write!(f, "line {}: \"{}\" is not a valid hexadecimal literal", line.0, text)
            }
            AssemblerError::UnresolvedLabel { label, line } => match line {
                Some(Line(n)) => write!(f, "line {}: used unresolved label \":{}\"", n, label),
                None => write!(f, "used unresolved label \":{}\"", label),
            },
        }
    }
}

impl std::error::Error for AssemblerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_single_line() {
        let err = AssemblerError::UnknownMnemonic {
            mnemonic: "frobnicate".to_string(),
            line: Line(3),
        };
        let text = format!("{}", err);
        assert!(!text.contains('\n'));
        assert!(text.contains("frobnicate"));
        assert!(text.contains('3'));
    }

    #[test]
    fn render_includes_offending_line() {
        let source = ":0\n frobnicate\n halt\n";
        let err = AssemblerError::UnknownMnemonic {
            mnemonic: "frobnicate".to_string(),
            line: Line(2),
        };
        let rendered = err.render(source);
        assert!(rendered.contains("frobnicate"));
    }
}
