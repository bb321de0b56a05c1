//! Serializable summary of a layout, for inspecting pagination from outside
//! (the CLI's `--layout-json`).

use serde::Serialize;

use crate::font::FontRole;
use crate::model::PageGeometry;

use super::{DrawOp, LayoutPage};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub page_count: usize,
    pub pages: Vec<PageInfo>,
}

/// Layout metadata for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub content_x: f64,
    pub content_y: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub text_runs: usize,
    pub lines: usize,
    pub code_boxes: usize,
    /// Code lines drawn on this page, in order.
    pub code_lines: Vec<String>,
    /// Lowest point reached by any drawn element, from the page top.
    pub content_bottom: f64,
}

impl LayoutInfo {
    /// Extract serializable layout metadata from laid-out pages.
    pub fn from_pages(pages: &[LayoutPage], geometry: &PageGeometry) -> Self {
        LayoutInfo {
            page_count: pages.len(),
            pages: pages.iter().map(|page| PageInfo::from_page(page, geometry)).collect(),
        }
    }

    /// Total code lines across all pages.
    pub fn code_line_count(&self) -> usize {
        self.pages.iter().map(|p| p.code_lines.len()).sum()
    }
}

impl PageInfo {
    fn from_page(page: &LayoutPage, geometry: &PageGeometry) -> Self {
        let mut text_runs = 0;
        let mut lines = 0;
        let mut code_boxes = 0;
        let mut code_lines = Vec::new();
        let mut content_bottom: f64 = 0.0;

        for op in &page.ops {
            match op {
                DrawOp::Text(run) => {
                    text_runs += 1;
                    if run.font.role == FontRole::Code {
                        code_lines.push(run.text.clone());
                    }
                    content_bottom = content_bottom.max(run.baseline);
                }
                DrawOp::Line { from, to, .. } => {
                    lines += 1;
                    content_bottom = content_bottom.max(from.y).max(to.y);
                }
                DrawOp::RoundedRect { rect, .. } => {
                    code_boxes += 1;
                    content_bottom = content_bottom.max(rect.y + rect.height);
                }
            }
        }

        PageInfo {
            index: page.index,
            width: page.width,
            height: page.height,
            content_x: geometry.margin,
            content_y: geometry.margin,
            content_width: geometry.content_width,
            content_height: geometry.content_height,
            text_runs,
            lines,
            code_boxes,
            code_lines,
            content_bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::LayoutEngine;
    use crate::model::{DocumentNode, PageSpec};

    #[test]
    fn summarizes_pages() {
        let fonts = FontContext::new();
        let spec = PageSpec::default();
        let engine = LayoutEngine::new(&fonts, &spec).unwrap();
        let doc = DocumentNode::Document {
            children: vec![
                DocumentNode::paragraph("intro"),
                DocumentNode::ThematicBreak,
                DocumentNode::code_block("let x = 1;\nlet y = 2;"),
            ],
        };
        let pages = engine.layout(&doc).unwrap();
        let info = LayoutInfo::from_pages(&pages, &engine.geometry());

        assert_eq!(info.page_count, 1);
        let page = &info.pages[0];
        assert_eq!(page.text_runs, 3);
        assert_eq!(page.lines, 1);
        assert_eq!(page.code_boxes, 1);
        assert_eq!(page.code_lines, vec!["let x = 1;", "let y = 2;"]);
        assert_eq!(page.content_width, 487.0);
        assert_eq!(info.code_line_count(), 2);
    }

    #[test]
    fn serializes_camel_case() {
        let page = LayoutPage::new(595.0, 842.0, 1);
        let geometry = PageSpec::default().geometry();
        let json = serde_json::to_value(LayoutInfo::from_pages(&[page], &geometry)).unwrap();
        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["pages"][0]["contentX"], 54.0);
        assert_eq!(json["pages"][0]["codeLines"], serde_json::json!([]));
    }
}
