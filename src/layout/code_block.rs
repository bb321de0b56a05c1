//! # Code Block Pagination
//!
//! A code block is the one block that may span pages. Its text is split into
//! lines and placed in segments. Each segment gets its own rounded background
//! box sized to the lines it holds, so a listing that continues on the next
//! page starts a fresh box there instead of dragging one box across the break.
//!
//! Capacity of a segment is `floor((space - 2 * padding) / line_height)`. On
//! the first page the space is whatever is left below the cursor. On later
//! pages, and whenever the cursor is within [`CODE_NEAR_TOP_PT`] of the top
//! margin, a segment gets the full content height. That keeps a block which
//! starts just below a heading from being cut into a sliver.

use crate::error::{LayoutError, Result};
use crate::font::FontSpec;
use crate::style::*;

use super::flow::PageFlow;
use super::page_break::{decide_break, line_capacity, BreakDecision};
use super::{PageSink, Rect, Surface, TextRun};

/// Lay out a code listing line by line, across as many pages as it needs.
///
/// Every line is drawn exactly once, in order. A trailing newline does not
/// add an empty last line.
pub fn render_code_block<S: PageSink>(literal: &str, flow: &mut PageFlow<'_, S>) -> Result<()> {
    let lines: Vec<&str> = literal.lines().collect();
    let line_height = CODE_SIZE_PT * CODE_LINE_SPACING;
    let padding = CODE_BLOCK_PADDING_PT;

    let here = line_capacity(flow.remaining_height(), line_height, padding);
    if decide_break(here, lines.len()) == BreakDecision::Place {
        draw_segment(&lines, flow)?;
        flow.advance(PARAGRAPH_SPACING_PT);
        return Ok(());
    }

    let mut remaining: &[&str] = &lines;
    let mut segments = 0usize;
    // Set after a page break that placed nothing. A second one in a row
    // means not even a fresh page can hold one line.
    let mut starved = false;

    while !remaining.is_empty() {
        let near_top = flow.cursor_y() <= flow.geometry().margin + CODE_NEAR_TOP_PT;
        let space = if near_top {
            flow.geometry().content_height
        } else {
            flow.remaining_height()
        };

        match decide_break(line_capacity(space, line_height, padding), remaining.len()) {
            BreakDecision::MoveToNextPage => {
                if starved {
                    return Err(LayoutError::CodeLineDoesNotFit {
                        line_height,
                        padding,
                    }
                    .into());
                }
                starved = true;
                flow.start_page()?;
            }
            BreakDecision::Place => {
                draw_segment(remaining, flow)?;
                segments += 1;
                remaining = &[];
            }
            BreakDecision::Split {
                items_on_current_page,
            } => {
                let (segment, rest) = remaining.split_at(items_on_current_page);
                draw_segment(segment, flow)?;
                segments += 1;
                starved = false;
                remaining = rest;
                flow.start_page()?;
            }
        }
    }

    log::debug!("code block of {} lines split into {} segments", lines.len(), segments);
    flow.advance(PARAGRAPH_SPACING_PT);
    Ok(())
}

/// Draw one background box and the lines inside it, starting at the cursor.
fn draw_segment<S: PageSink>(lines: &[&str], flow: &mut PageFlow<'_, S>) -> Result<()> {
    let line_height = CODE_SIZE_PT * CODE_LINE_SPACING;
    let padding = CODE_BLOCK_PADDING_PT;
    let geometry = *flow.geometry();
    let font = FontSpec::code(CODE_SIZE_PT);

    let rect = Rect {
        x: geometry.margin,
        y: flow.cursor_y(),
        width: geometry.effective_width - 2.0 * geometry.margin,
        height: lines.len() as f64 * line_height + 2.0 * padding,
    };
    flow.surface()?
        .draw_rounded_rect(rect, CODE_BLOCK_RADIUS_PT, Color::CODE_BACKGROUND);
    flow.advance(padding);

    for line in lines {
        let baseline = flow.cursor_y() + font.size;
        flow.surface()?.draw_text_run(TextRun {
            x: geometry.margin + padding,
            baseline,
            text: (*line).to_string(),
            font,
            color: Color::BLACK,
        });
        flow.advance(line_height);
    }

    flow.advance(padding);
    Ok(())
}
