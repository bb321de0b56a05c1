//! # Text Layout
//!
//! Line breaking, text measurement, and drawing of wrapped text.
//!
//! The renderer talks to text through the [`TextService`] trait: measure how
//! tall a string is when wrapped to a width, measure a single-line width, and
//! draw wrapped text at an origin. [`FontContext`] implements it with the font
//! metrics it holds and UAX#14 line breaking.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontContext, FontSpec};
use crate::layout::{Surface, TextRun};
use crate::style::{Color, TEXT_LINE_SPACING};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width of the line without trailing whitespace.
    pub width: f64,
}

/// Measurement and drawing of wrapped text. Implemented by [`FontContext`].
pub trait TextService {
    /// Height of `text` wrapped to `width` at the given font.
    fn measure_height(&self, text: &str, width: f64, font: FontSpec) -> f64;

    /// Width of `text` on a single line.
    fn measure_width(&self, text: &str, font: FontSpec) -> f64;

    /// Wrap `text` to `width` and draw it with its top-left corner at (x, y).
    /// Returns the height drawn, which equals [`TextService::measure_height`].
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        text: &str,
        width: f64,
        font: FontSpec,
        color: Color,
        x: f64,
        y: f64,
        surface: &mut dyn Surface,
    ) -> f64;
}

impl TextService for FontContext {
    fn measure_height(&self, text: &str, width: f64, font: FontSpec) -> f64 {
        let lines = TextLayout::new().break_into_lines(self, text, width, font);
        lines.len() as f64 * line_pitch(font)
    }

    fn measure_width(&self, text: &str, font: FontSpec) -> f64 {
        self.measure_string(text, font.role, font.size)
    }

    fn draw_text(
        &self,
        text: &str,
        width: f64,
        font: FontSpec,
        color: Color,
        x: f64,
        y: f64,
        surface: &mut dyn Surface,
    ) -> f64 {
        let lines = TextLayout::new().break_into_lines(self, text, width, font);
        let pitch = line_pitch(font);
        for (i, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            surface.draw_text_run(TextRun {
                x,
                baseline: y + i as f64 * pitch + font.size,
                text: line.text.clone(),
                font,
                color,
            });
        }
        lines.len() as f64 * pitch
    }
}

/// Distance between consecutive baselines of wrapped prose.
pub fn line_pitch(font: FontSpec) -> f64 {
    font.size * TEXT_LINE_SPACING
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Each entry is the break opportunity *before* that character. Index 0 is
/// always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields byte offsets of the position after each break.
    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, _) in text.char_indices() {
            map[byte_idx] = char_idx;
            char_idx += 1;
        }
        map[text.len()] = char_idx;
        map
    };

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Default)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Greedy: each line takes as many characters as fit, ending at the last
    /// UAX#14 break opportunity. A word wider than the line is split where it
    /// overflows. Newlines always break. Empty input yields one empty line.
    pub fn break_into_lines(
        &self,
        fonts: &FontContext,
        text: &str,
        max_width: f64,
        font: FontSpec,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    fonts.char_width(ch, font.role, font.size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    // The break is *after* char i-1.
                    Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            if line_width + widths[i] > max_width && line_start < i {
                let break_at = match last_break_point {
                    Some(bp) if bp >= line_start => bp + 1,
                    _ => i,
                };
                lines.push(self.make_line(&chars[line_start..break_at], &widths[line_start..break_at]));
                line_start = break_at;
                line_width = widths[line_start..=i].iter().sum();
                last_break_point = None;
                continue;
            }

            line_width += widths[i];
        }

        if line_start < chars.len() {
            lines.push(self.make_line(&chars[line_start..], &widths[line_start..]));
        }

        lines
    }

    /// Build a line, dropping newline characters and trailing whitespace.
    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && chars[end - 1].is_whitespace() {
            end -= 1;
        }
        let mut text = String::with_capacity(end);
        let mut width = 0.0;
        for (&ch, &w) in chars[..end].iter().zip(&widths[..end]) {
            if !is_newline(ch) {
                text.push(ch);
                width += w;
            }
        }
        BrokenLine { text, width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutPage;

    fn body() -> FontSpec {
        FontSpec::body(10.0)
    }

    fn texts(lines: &[BrokenLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn single_line() {
        let ctx = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&ctx, "Hello World", 500.0, body());
        assert_eq!(texts(&lines), vec!["Hello World"]);
        assert!(lines[0].width > 0.0 && lines[0].width < 500.0);
    }

    #[test]
    fn breaks_at_space() {
        let ctx = FontContext::new();
        // "Hello" is 22.78pt at 10pt Helvetica; 40pt fits one word per line.
        let lines = TextLayout::new().break_into_lines(&ctx, "Hello World again", 40.0, body());
        assert_eq!(texts(&lines), vec!["Hello", "World", "again"]);
        for line in &lines {
            assert!(line.width <= 40.0);
        }
    }

    #[test]
    fn explicit_newlines() {
        let ctx = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&ctx, "one\ntwo\n\nfour", 500.0, body());
        assert_eq!(texts(&lines), vec!["one", "two", "", "four"]);
    }

    #[test]
    fn overlong_word_is_split() {
        let ctx = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&ctx, "abcdefghijklmnop", 30.0, body());
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(|l| l.text.as_str()).collect::<String>(), "abcdefghijklmnop");
    }

    #[test]
    fn empty_string_is_one_line() {
        let ctx = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&ctx, "", 100.0, body());
        assert_eq!(lines.len(), 1);
        assert_eq!(ctx.measure_height("", 100.0, body()), 12.0);
    }

    #[test]
    fn height_is_lines_times_pitch() {
        let ctx = FontContext::new();
        assert_eq!(ctx.measure_height("Hello World again", 40.0, body()), 36.0);
        assert_eq!(ctx.measure_height("short", 400.0, FontSpec::title(14.0)), 14.0 * 1.2);
    }

    #[test]
    fn draw_text_emits_one_run_per_line() {
        let ctx = FontContext::new();
        let mut page = LayoutPage::new(595.0, 842.0, 1);
        let h = ctx.draw_text("Hello World again", 40.0, body(), Color::BLACK, 54.0, 100.0, &mut page);
        assert_eq!(h, 36.0);
        let runs: Vec<&TextRun> = page.text_runs().collect();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].baseline, 110.0);
        assert_eq!(runs[1].baseline, 122.0);
        assert!(runs.iter().all(|r| r.x == 54.0));
    }
}
