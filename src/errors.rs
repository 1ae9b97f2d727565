//! Error types with rich diagnostics using miette
//!
//! Input errors carry the JSON source and a span so a malformed chart file
//! points at the offending value instead of just a line number.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::NumericError;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based line/column pair, as reported by serde_json.
    ///
    /// Out-of-range positions clamp to the end of the source.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let mut offset = 0;
        for (idx, text) in self.source.split_inclusive('\n').enumerate() {
            if idx + 1 == line {
                let col = column.saturating_sub(1).min(text.len());
                return offset + col;
            }
            offset += text.len();
        }
        self.source.len()
    }

    /// One-character span at a serde_json position, widened to the
    /// remainder of the token when possible.
    pub fn span_at(&self, line: usize, column: usize) -> SourceSpan {
        let start = self.offset_of(line, column);
        let rest = &self.source[start.min(self.source.len())..];
        let len = rest
            .find(|c: char| c == ',' || c == '}' || c == ']' || c.is_whitespace())
            .unwrap_or(rest.len())
            .max(1)
            .min(rest.len());
        SourceSpan::from((start, len))
    }
}

// ============================================================================
// Input Errors
// ============================================================================

/// Errors that occur while reading chart data
#[derive(Error, Diagnostic, Debug)]
pub enum InputError {
    #[error("malformed chart data: {message}")]
    #[diagnostic(
        code(natal_chart::input::malformed),
        help("chart data is a JSON object with `planetPositions`, `houses`, `aspects` and `aspectsDetails`")
    )]
    Malformed {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("chart data ends unexpectedly")]
    #[diagnostic(code(natal_chart::input::truncated))]
    Truncated {
        #[source_code]
        src: NamedSource<String>,
        #[label("input ends here")]
        span: SourceSpan,
    },
}

impl InputError {
    /// Attach a serde_json failure to the source it came from.
    pub fn from_json(ctx: &SourceContext, err: serde_json::Error) -> Self {
        let span = ctx.span_at(err.line(), err.column());
        if err.is_eof() {
            return InputError::Truncated {
                src: ctx.named_source(),
                span: SourceSpan::from((ctx.source.len(), 0)),
            };
        }
        // serde_json appends " at line N column M"; the span already says that
        let full = err.to_string();
        let message = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };
        InputError::Malformed {
            message,
            src: ctx.named_source(),
            span,
        }
    }
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur before any drawing happens.
///
/// Once options validate, rendering itself cannot fail: bad entries in the
/// chart data are skipped one at a time.
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("invalid canvas size {value}: {reason}")]
    #[diagnostic(code(natal_chart::render::invalid_canvas))]
    InvalidCanvas { value: f64, reason: NumericError },

    #[error("margin {margin} leaves no room on a {size}px canvas")]
    #[diagnostic(
        code(natal_chart::render::invalid_margin),
        help("the margin must be smaller than half the canvas size")
    )]
    InvalidMargin { margin: f64, size: f64 },

    #[error("segment opacity {value} is outside 0..=1")]
    #[diagnostic(code(natal_chart::render::invalid_opacity))]
    InvalidOpacity { value: f64 },
}
