//! # Font Management
//!
//! The renderer asks for fonts by role (title, body, code), never by name.
//! Each role resolves to one of the standard PDF fonts unless a TrueType file
//! has been registered for it, so every role always has a usable font.
//!
//! Standard fonts need no embedding. Custom fonts are parsed with ttf-parser
//! for metrics here and embedded whole by the PDF writer.

pub mod metrics;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
pub use metrics::StandardFontMetrics;

/// What a piece of text is used for. Decides the typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontRole {
    /// Headings. Bold.
    Title,
    /// Paragraphs, quotes, list items.
    Body,
    /// Code listings. Monospace.
    Code,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::Title, FontRole::Body, FontRole::Code];

    /// The standard font used when no custom font is registered for this role.
    pub fn standard_font(&self) -> StandardFont {
        match self {
            FontRole::Title => StandardFont::HelveticaBold,
            FontRole::Body => StandardFont::Helvetica,
            FontRole::Code => StandardFont::Courier,
        }
    }
}

/// A font request: role plus size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub role: FontRole,
    pub size: f64,
}

impl FontSpec {
    pub fn new(role: FontRole, size: f64) -> Self {
        Self { role, size }
    }

    pub fn title(size: f64) -> Self {
        Self::new(FontRole::Title, size)
    }

    pub fn body(size: f64) -> Self {
        Self::new(FontRole::Body, size)
    }

    pub fn code(size: f64) -> Self {
        Self::new(FontRole::Code, size)
    }
}

/// The standard PDF fonts the renderer falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
            Self::Courier => &metrics::COURIER,
        }
    }
}

/// A TrueType/OpenType font registered for a role. Embedded whole.
#[derive(Debug, Clone)]
struct CustomFont {
    family: String,
    data: Vec<u8>,
    metrics: CustomFontMetrics,
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Maps characters to their glyph IDs in the font.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data. `None` if the data is not a font.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        // The basic multilingual plane covers everything the standard
        // fonts could have rendered and then some.
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                glyph_ids.insert(ch, glyph_id.0);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            glyph_ids,
        })
    }
}

/// Shared font context used by text measurement and PDF serialization.
#[derive(Debug, Clone, Default)]
pub struct FontContext {
    custom: HashMap<FontRole, CustomFont>,
}

impl FontContext {
    /// A context with only the standard fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register TrueType data for a role. Fails if the data does not parse.
    pub fn register(&mut self, role: FontRole, family: &str, data: Vec<u8>) -> Result<()> {
        let metrics = CustomFontMetrics::from_font_data(&data).ok_or_else(|| {
            RenderError::Font(format!("'{family}' is not a TrueType/OpenType font"))
        })?;
        log::debug!(
            "registered {} glyphs from '{}' for {:?}",
            metrics.glyph_ids.len(),
            family,
            role
        );
        self.custom.insert(
            role,
            CustomFont {
                family: family.to_string(),
                data,
                metrics,
            },
        );
        Ok(())
    }

    /// Read a font file from disk and register it for a role.
    pub fn load_file(&mut self, role: FontRole, path: &Path) -> Result<()> {
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("cannot read {}: {e}", path.display())))?;
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "CustomFont".to_string());
        self.register(role, &family, data)
    }

    /// Resolve a role to its font, falling back to the standard font.
    pub fn resolve(&self, role: FontRole) -> ResolvedFont<'_> {
        match self.custom.get(&role) {
            Some(font) => ResolvedFont::Custom {
                family: &font.family,
                data: &font.data,
                metrics: &font.metrics,
            },
            None => ResolvedFont::Standard(role.standard_font()),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, role: FontRole, font_size: f64) -> f64 {
        match self.resolve(role) {
            ResolvedFont::Standard(std_font) => std_font.metrics().char_width(ch, font_size),
            ResolvedFont::Custom { metrics, .. } => metrics.char_width(ch, font_size),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, role: FontRole, font_size: f64) -> f64 {
        match self.resolve(role) {
            ResolvedFont::Standard(std_font) => std_font.metrics().measure_string(text, font_size),
            ResolvedFont::Custom { metrics, .. } => {
                text.chars().map(|ch| metrics.char_width(ch, font_size)).sum()
            }
        }
    }

    /// Is a custom font registered for this role?
    pub fn has_custom(&self, role: FontRole) -> bool {
        self.custom.contains_key(&role)
    }
}

/// A borrowed view of a role's font.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedFont<'a> {
    Standard(StandardFont),
    Custom {
        family: &'a str,
        data: &'a [u8],
        metrics: &'a CustomFontMetrics,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_fall_back_to_standard_fonts() {
        let ctx = FontContext::new();
        for role in FontRole::ALL {
            assert!(!ctx.has_custom(role));
            assert!(matches!(ctx.resolve(role), ResolvedFont::Standard(f) if f == role.standard_font()));
        }
        assert_eq!(FontRole::Title.standard_font().pdf_name(), "Helvetica-Bold");
        assert_eq!(FontRole::Code.standard_font().pdf_name(), "Courier");
    }

    #[test]
    fn title_wider_than_body() {
        let ctx = FontContext::new();
        let body = ctx.measure_string("Heading", FontRole::Body, 12.0);
        let title = ctx.measure_string("Heading", FontRole::Title, 12.0);
        assert!(title > body);
    }

    #[test]
    fn code_is_monospace() {
        let ctx = FontContext::new();
        assert_eq!(ctx.char_width('i', FontRole::Code, 10.0), 6.0);
        assert_eq!(ctx.char_width('W', FontRole::Code, 10.0), 6.0);
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        let mut ctx = FontContext::new();
        let err = ctx
            .register(FontRole::Body, "Broken", vec![0, 1, 2, 3])
            .unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
        assert!(!ctx.has_custom(FontRole::Body));
    }

    #[test]
    fn missing_font_file_is_a_font_error() {
        let mut ctx = FontContext::new();
        let err = ctx
            .load_file(FontRole::Code, Path::new("/nonexistent/mono.ttf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Font(msg) if msg.contains("cannot read")));
    }
}
