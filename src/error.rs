//! Structured error types for the renderer.
//!
//! Input, layout and sink failures are the three ways a render can go wrong.
//! Font and config errors come from the optional setup around a render.

use std::io;
use thiserror::Error;

/// Result type alias for mdpdf operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// The unified error type returned by all public mdpdf functions.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The markdown source was empty or could not be read. No output is produced.
    #[error("Input error: {0}")]
    Input(String),

    /// The page geometry leaves no room for content. Fatal, aborts the render.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Writing or flushing the output failed. Whatever was written is partial.
    #[error("Output error: {0}")]
    Sink(#[from] io::Error),

    /// A configured TrueType font could not be read or parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// The render config could not be parsed.
    #[error("Config error: {source}. {hint}")]
    Config {
        source: serde_json::Error,
        hint: String,
    },
}

/// Geometry problems found before or during pagination.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Margins consume the whole page in at least one direction.
    #[error("page {width}x{height}pt with {margin}pt margins has no content area")]
    DegeneratePage { width: f64, height: f64, margin: f64 },

    /// Even a fresh page cannot hold a single code line plus its padding.
    #[error("a code line of {line_height}pt with {padding}pt padding does not fit on a fresh page")]
    CodeLineDoesNotFit { line_height: f64, padding: f64 },
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the config schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        RenderError::Config { source: e, hint }
    }
}
