//! Render configuration: page selection, document metadata, font files.
//!
//! Loaded from JSON. Every field is optional; an empty object `{}` is the
//! default config (A4, normal margins, portrait, standard fonts).
//!
//! ```json
//! {
//!   "page": { "pageSize": "Letter", "margin": "Wide", "orientation": "Landscape" },
//!   "metadata": { "title": "Release Notes" },
//!   "fonts": { "code": "fonts/FiraMono-Regular.ttf" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::font::{FontContext, FontRole};
use crate::model::{Metadata, PageSpec};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default)]
    pub page: PageSpec,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub fonts: FontPaths,
}

/// TrueType files to use instead of the standard fonts, per role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPaths {
    pub title: Option<PathBuf>,
    pub body: Option<PathBuf>,
    pub code: Option<PathBuf>,
}

impl FontPaths {
    pub fn get(&self, role: FontRole) -> Option<&Path> {
        match role {
            FontRole::Title => self.title.as_deref(),
            FontRole::Body => self.body.as_deref(),
            FontRole::Code => self.code.as_deref(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Input(format!("cannot read config {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Build the font context: configured TrueType files for the roles that
    /// name one, standard fonts for the rest. A configured file that cannot
    /// be loaded is an error.
    pub fn font_context(&self) -> Result<FontContext> {
        let mut fonts = FontContext::new();
        for role in FontRole::ALL {
            match self.fonts.get(role) {
                Some(path) => fonts.load_file(role, path)?,
                None => log::debug!("{role:?} text uses {}", role.standard_font().pdf_name()),
            }
        }
        Ok(fonts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarginSize, Orientation, PageSize};

    #[test]
    fn empty_object_is_default() {
        let config = RenderConfig::from_json("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.page.page_size, PageSize::A4);
    }

    #[test]
    fn full_config() {
        let config = RenderConfig::from_json(
            r#"{
                "page": { "pageSize": "Letter", "margin": "Wide", "orientation": "Landscape" },
                "metadata": { "title": "Notes", "author": "Ops" },
                "fonts": { "code": "mono.ttf" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.page,
            PageSpec::new(PageSize::Letter, MarginSize::Wide, Orientation::Landscape)
        );
        assert_eq!(config.metadata.title.as_deref(), Some("Notes"));
        assert_eq!(config.fonts.get(FontRole::Code), Some(Path::new("mono.ttf")));
        assert_eq!(config.fonts.get(FontRole::Body), None);
    }

    #[test]
    fn custom_sizes() {
        let config = RenderConfig::from_json(
            r#"{ "page": { "pageSize": { "Custom": { "width": 300, "height": 400 } }, "margin": { "Custom": 20 } } }"#,
        )
        .unwrap();
        let geometry = config.page.geometry();
        assert_eq!(geometry.content_width, 260.0);
        assert_eq!(geometry.content_height, 360.0);
    }

    #[test]
    fn malformed_config_has_hint() {
        let err = RenderConfig::from_json(r#"{ "page": { "pageSize": "B5" } }"#).unwrap_err();
        assert!(matches!(err, RenderError::Config { .. }));
        assert!(err.to_string().contains("config schema"));
    }

    #[test]
    fn standard_fonts_without_paths() {
        let fonts = RenderConfig::default().font_context().unwrap();
        assert!(FontRole::ALL.iter().all(|r| !fonts.has_custom(*r)));
    }

    #[test]
    fn missing_font_file_fails() {
        let mut config = RenderConfig::default();
        config.fonts.body = Some(PathBuf::from("/nonexistent/body.ttf"));
        assert!(matches!(config.font_context(), Err(RenderError::Font(_))));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdpdf.json");
        std::fs::write(&path, r#"{ "metadata": { "subject": "Docs" } }"#).unwrap();
        let config = RenderConfig::from_file(&path).unwrap();
        assert_eq!(config.metadata.subject.as_deref(), Some("Docs"));
    }
}
