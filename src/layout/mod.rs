//! # Page-Aware Layout
//!
//! Blocks are measured and drawn top to bottom straight onto fixed-size
//! pages. There is no tall intermediate canvas that gets sliced afterwards:
//!
//! 1. Open a page. The cursor sits at the top margin.
//! 2. For each block, measure the height it needs at the content width.
//! 3. If it does not fit below the cursor, finalize the page and open a new one.
//! 4. Draw the block, move the cursor down past it.
//! 5. Code blocks are the exception: they are split line by line, each page
//!    getting its own background box (see [`code_block`]).
//!
//! The renderer never owns a page type of its own. It draws through the
//! [`Surface`] trait and gets pages from a [`PageSink`]. [`PageCollector`]
//! is the default sink: it keeps finalized [`LayoutPage`]s in memory for the
//! PDF writer.

pub mod code_block;
pub mod flow;
pub mod info;
pub mod page_break;

use crate::error::Result;
use crate::font::{FontRole, FontSpec};
use crate::model::{DocumentNode, PageGeometry, PageSpec};
use crate::style::*;
use crate::text::TextService;

pub use flow::PageFlow;
pub use info::LayoutInfo;

/// A point on a page, in points from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle; `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One line of text in a single font, positioned by its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub baseline: f64,
    pub text: String,
    pub font: FontSpec,
    pub color: Color,
}

/// A drawing primitive recorded on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Line {
        from: Point,
        to: Point,
        color: Color,
        stroke_width: f64,
    },
    RoundedRect {
        rect: Rect,
        radius: f64,
        fill: Color,
    },
}

/// Something the renderer can draw on.
pub trait Surface {
    fn draw_text_run(&mut self, run: TextRun);
    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f64);
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color);
}

/// Where pages come from and where they go when they are done.
///
/// A page is handed back by value in [`PageSink::finalize_page`], so it
/// cannot be drawn on again once finalized.
pub trait PageSink {
    type Page: Surface;

    /// Open a page of the given size. `index` counts from 1.
    fn new_page(&mut self, width: f64, height: f64, index: usize) -> Self::Page;

    /// Seal a page.
    fn finalize_page(&mut self, page: Self::Page) -> Result<()>;
}

/// A laid-out page: its size and the draw operations recorded on it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    /// 1-based page number.
    pub index: usize,
    pub ops: Vec<DrawOp>,
}

impl LayoutPage {
    pub fn new(width: f64, height: f64, index: usize) -> Self {
        Self {
            width,
            height,
            index,
            ops: Vec::new(),
        }
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Text of the code lines drawn on this page, in drawing order.
    pub fn code_lines(&self) -> impl Iterator<Item = &str> {
        self.text_runs()
            .filter(|run| run.font.role == FontRole::Code)
            .map(|run| run.text.as_str())
    }

    pub fn rounded_rects(&self) -> impl Iterator<Item = &Rect> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::RoundedRect { rect, .. } => Some(rect),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }
}

impl Surface for LayoutPage {
    fn draw_text_run(&mut self, run: TextRun) {
        self.ops.push(DrawOp::Text(run));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, stroke_width: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            stroke_width,
        });
    }

    fn draw_rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color) {
        self.ops.push(DrawOp::RoundedRect { rect, radius, fill });
    }
}

/// The default sink: keeps finalized pages in order.
#[derive(Debug, Default)]
pub struct PageCollector {
    pages: Vec<LayoutPage>,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_pages(self) -> Vec<LayoutPage> {
        self.pages
    }
}

impl PageSink for PageCollector {
    type Page = LayoutPage;

    fn new_page(&mut self, width: f64, height: f64, index: usize) -> LayoutPage {
        LayoutPage::new(width, height, index)
    }

    fn finalize_page(&mut self, page: LayoutPage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }
}

/// List marker style. Ordered lists carry their first number.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ListMarker {
    Bullet,
    Ordered(u64),
}

impl ListMarker {
    fn first_number(&self) -> u64 {
        match self {
            ListMarker::Bullet => 0,
            ListMarker::Ordered(start) => *start,
        }
    }

    fn label(&self, number: u64) -> String {
        match self {
            ListMarker::Bullet => BULLET_MARKER.to_string(),
            ListMarker::Ordered(_) => format!("{number}."),
        }
    }
}

/// The block renderer: one routine per node kind.
pub struct LayoutEngine<'t, T: TextService + ?Sized> {
    text: &'t T,
    geometry: PageGeometry,
}

impl<'t, T: TextService + ?Sized> LayoutEngine<'t, T> {
    /// Create an engine for one page spec. Fails if the page has no content area.
    pub fn new(text: &'t T, spec: &PageSpec) -> Result<Self> {
        let geometry = spec.geometry();
        geometry.validate()?;
        Ok(Self { text, geometry })
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Lay out a document into in-memory pages.
    pub fn layout(&self, document: &DocumentNode) -> Result<Vec<LayoutPage>> {
        let mut collector = PageCollector::new();
        self.layout_into(document, &mut collector)?;
        Ok(collector.into_pages())
    }

    /// Lay out a document into any sink. Returns the number of pages produced.
    ///
    /// The active page is finalized on every path, including errors.
    pub fn layout_into<S: PageSink>(&self, document: &DocumentNode, sink: &mut S) -> Result<usize> {
        let mut flow = PageFlow::new(sink, self.geometry);
        let result = flow
            .start_page()
            .and_then(|()| self.render_node(document, &mut flow));
        let finished = flow.finish();
        result.and(finished)?;
        log::debug!("laid out {} page(s)", flow.page_count());
        Ok(flow.page_count())
    }

    fn render_node<S: PageSink>(&self, node: &DocumentNode, flow: &mut PageFlow<'_, S>) -> Result<()> {
        match node {
            DocumentNode::Document { children } => {
                for child in children {
                    self.render_node(child, flow)?;
                }
                Ok(())
            }
            DocumentNode::Heading { level, .. } => self.render_heading(*level, &node.plain_text(), flow),
            DocumentNode::BlockQuote { .. } => self.render_block_quote(&node.plain_text(), flow),
            DocumentNode::BulletList { items } => self.render_list(items, ListMarker::Bullet, flow),
            DocumentNode::OrderedList { start, items } => {
                self.render_list(items, ListMarker::Ordered(*start), flow)
            }
            DocumentNode::CodeBlock { literal } => code_block::render_code_block(literal, flow),
            DocumentNode::ThematicBreak => self.render_thematic_break(flow),
            // Paragraphs, plus anything that shows up at block level without
            // a block routine of its own: a stray list item or inline node.
            DocumentNode::Paragraph { .. }
            | DocumentNode::ListItem { .. }
            | DocumentNode::Text { .. }
            | DocumentNode::Code { .. }
            | DocumentNode::SoftBreak
            | DocumentNode::LineBreak
            | DocumentNode::Emphasis { .. }
            | DocumentNode::Strong { .. }
            | DocumentNode::Link { .. }
            | DocumentNode::Image { .. } => self.render_paragraph(&node.plain_text(), flow),
        }
    }

    fn render_heading<S: PageSink>(&self, level: u8, text: &str, flow: &mut PageFlow<'_, S>) -> Result<()> {
        let (size, top_spacing) = heading_metrics(level);
        let font = FontSpec::title(size);
        let width = self.geometry.content_width;
        let height = self.text.measure_height(text, width, font);

        flow.ensure_space(top_spacing + height + HEADING_BOTTOM_SPACING_PT)?;
        flow.advance(top_spacing);
        self.draw_text(text, width, font, self.geometry.margin, flow)?;
        flow.advance(HEADING_BOTTOM_SPACING_PT);
        Ok(())
    }

    fn render_paragraph<S: PageSink>(&self, text: &str, flow: &mut PageFlow<'_, S>) -> Result<()> {
        let font = FontSpec::body(BODY_SIZE_PT);
        let width = self.geometry.content_width;
        let height = self.text.measure_height(text, width, font);

        flow.ensure_space(height + PARAGRAPH_SPACING_PT)?;
        self.draw_text(text, width, font, self.geometry.margin, flow)?;
        flow.advance(PARAGRAPH_SPACING_PT);
        Ok(())
    }

    fn render_block_quote<S: PageSink>(&self, text: &str, flow: &mut PageFlow<'_, S>) -> Result<()> {
        let font = FontSpec::body(BODY_SIZE_PT);
        let width = self.geometry.content_width - QUOTE_INDENT_PT;
        let height = self.text.measure_height(text, width, font);

        flow.ensure_space(height + PARAGRAPH_SPACING_PT)?;
        let rule_x = self.geometry.margin + QUOTE_RULE_OFFSET_PT;
        let top = flow.cursor_y();
        flow.surface()?.draw_line(
            Point::new(rule_x, top),
            Point::new(rule_x, top + height),
            Color::GRAY,
            QUOTE_RULE_WIDTH_PT,
        );
        self.draw_text(text, width, font, self.geometry.margin + QUOTE_INDENT_PT, flow)?;
        flow.advance(PARAGRAPH_SPACING_PT);
        Ok(())
    }

    /// Render list items in order. The item number is an accumulator folded
    /// across the items, so ordered lists count up from their start number.
    fn render_list<S: PageSink>(
        &self,
        items: &[DocumentNode],
        marker: ListMarker,
        flow: &mut PageFlow<'_, S>,
    ) -> Result<()> {
        items.iter().try_fold(marker.first_number(), |number, item| {
            self.render_list_item(&item.plain_text(), &marker.label(number), flow)?;
            Ok::<u64, crate::error::RenderError>(number.saturating_add(1))
        })?;
        flow.advance(LIST_ITEM_SPACING_PT);
        Ok(())
    }

    fn render_list_item<S: PageSink>(&self, text: &str, marker: &str, flow: &mut PageFlow<'_, S>) -> Result<()> {
        let font = FontSpec::body(BODY_SIZE_PT);
        let marker_width = self.text.measure_width(&format!("{marker} "), font);
        let offset = LIST_INDENT_PT + marker_width;
        let width = self.geometry.content_width - offset;
        let height = self.text.measure_height(text, width, font);

        flow.ensure_space(height + LIST_ITEM_SPACING_PT)?;
        let baseline = flow.cursor_y() + font.size;
        flow.surface()?.draw_text_run(TextRun {
            x: self.geometry.margin + LIST_INDENT_PT,
            baseline,
            text: marker.to_string(),
            font,
            color: Color::BLACK,
        });
        self.draw_text(text, width, font, self.geometry.margin + offset, flow)?;
        flow.advance(LIST_ITEM_SPACING_PT);
        Ok(())
    }

    fn render_thematic_break<S: PageSink>(&self, flow: &mut PageFlow<'_, S>) -> Result<()> {
        flow.ensure_space(RULE_HEIGHT_PT)?;
        flow.advance(RULE_PADDING_PT);
        let y = flow.cursor_y();
        let left = self.geometry.margin;
        let right = self.geometry.effective_width - self.geometry.margin;
        flow.surface()?
            .draw_line(Point::new(left, y), Point::new(right, y), Color::LIGHT_GRAY, 1.0);
        flow.advance(RULE_PADDING_PT);
        Ok(())
    }

    /// Draw wrapped text at the cursor and move the cursor past it.
    fn draw_text<S: PageSink>(
        &self,
        text: &str,
        width: f64,
        font: FontSpec,
        x: f64,
        flow: &mut PageFlow<'_, S>,
    ) -> Result<()> {
        let y = flow.cursor_y();
        let drawn = self
            .text
            .draw_text(text, width, font, Color::BLACK, x, y, flow.surface()?);
        flow.advance(drawn);
        Ok(())
    }
}
