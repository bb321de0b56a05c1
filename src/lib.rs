//! # mdpdf
//!
//! Markdown to paginated PDF.
//!
//! Content is measured and drawn top to bottom directly onto fixed-size
//! pages. A block that does not fit below the cursor starts a new page;
//! nothing is laid out on an endless canvas and cut up afterwards. Code
//! listings are the one block allowed to cross a page boundary. They split
//! line by line, and every page they touch gets its own background box.
//!
//! ## Architecture
//!
//! ```text
//! Markdown text
//!       ↓
//!   [markdown]: comrak → DocumentNode tree
//!       ↓
//!   [model]   : node tree, page spec, metadata
//!       ↓
//!   [layout]  : page flow, block renderer, code block paginator
//!       ↓         (measures and wraps through [text] and [font])
//!   [pdf]     : serialize pages to PDF bytes
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use config::RenderConfig;
use error::{RenderError, Result};
use font::FontContext;
use layout::{LayoutEngine, LayoutPage};
use model::{DocumentNode, Metadata, PageSpec};
use pdf::PdfWriter;

/// Everything one render needs: page selection, metadata and fonts.
///
/// A renderer holds no per-render state. Each call lays out from scratch,
/// so one renderer can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    spec: PageSpec,
    metadata: Metadata,
    fonts: FontContext,
}

impl Renderer {
    pub fn new(spec: PageSpec) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }

    /// Build a renderer from a config, loading any configured font files.
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            spec: config.page,
            metadata: config.metadata.clone(),
            fonts: config.font_context()?,
        })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn fonts_mut(&mut self) -> &mut FontContext {
        &mut self.fonts
    }

    /// Lay out a document tree into pages without serializing.
    pub fn layout(&self, document: &DocumentNode) -> Result<Vec<LayoutPage>> {
        LayoutEngine::new(&self.fonts, &self.spec)?.layout(document)
    }

    /// Lay out a document tree and write it as PDF to `out`.
    ///
    /// Layout completes before the first byte is written, so a layout error
    /// leaves `out` untouched.
    pub fn render_document<W: Write>(&self, document: &DocumentNode, out: W) -> Result<()> {
        let pages = self.layout(document)?;
        self.write_pages(&pages, out)
    }

    /// Serialize already laid-out pages as PDF to `out`.
    pub fn write_pages<W: Write>(&self, pages: &[LayoutPage], mut out: W) -> Result<()> {
        PdfWriter::new().write_to(pages, &self.metadata, &self.fonts, &mut out)
    }

    /// Serialize already laid-out pages as PDF into the file at `path`.
    ///
    /// A failed write removes the file, so no partial PDF is left behind.
    pub fn write_file(&self, pages: &[LayoutPage], path: &Path) -> Result<()> {
        write_or_discard(path, |out| self.write_pages(pages, out))
    }

    /// Parse markdown and write it as PDF to `out`.
    ///
    /// Blank input is rejected: there is nothing to render.
    pub fn render_markdown<W: Write>(&self, markdown: &str, out: W) -> Result<()> {
        let document = parse_markdown(markdown)?;
        self.render_document(&document, out)
    }

    /// Parse markdown and return the PDF bytes.
    pub fn render_markdown_to_vec(&self, markdown: &str) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.render_markdown(markdown, &mut out)?;
        Ok(out)
    }
}

fn write_or_discard<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    let result = write(&mut out);
    if result.is_err() {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            log::warn!("could not remove partial output {}: {}", path.display(), e);
        }
    }
    result
}

/// Parse markdown, rejecting blank input.
pub fn parse_markdown(markdown: &str) -> Result<DocumentNode> {
    if markdown.trim().is_empty() {
        return Err(RenderError::Input("markdown source is empty".to_string()));
    }
    Ok(markdown::parse(markdown))
}

/// Render markdown to PDF bytes with the default page spec and fonts.
///
/// This is the primary entry point.
pub fn render(markdown: &str) -> Result<Vec<u8>> {
    Renderer::default().render_markdown_to_vec(markdown)
}

/// Render markdown to PDF bytes with a JSON config.
pub fn render_with_config_json(markdown: &str, config_json: &str) -> Result<Vec<u8>> {
    let config = RenderConfig::from_json(config_json)?;
    Renderer::from_config(&config)?.render_markdown_to_vec(markdown)
}
