//! # Text Layout
//!
//! Line breaking and text measurement.
//!
//! Widths come from the standard font tables in points and are converted to
//! page units (millimetres) here, so the layout engine only ever deals in
//! millimetres. The layout engine treats [`TextLayout::wrap`] as opaque: it
//! trusts the returned line count to compute block heights.

use crate::font::FontContext;
use crate::style::TextStyle;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Millimetres per PDF point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text on this line, trailing whitespace removed.
    pub text: String,
    /// Width of the line in millimetres.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields byte offsets of the start of the next segment
    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

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

#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Width of a single-line string in millimetres.
    pub fn measure_width(&self, font_context: &FontContext, text: &str, style: &TextStyle) -> f64 {
        font_context.measure_string(text, style) * MM_PER_PT
    }

    /// Break `text` into lines no wider than `max_width` millimetres.
    ///
    /// Greedy: fill each line until the next character would overflow, then
    /// break at the last UAX#14 opportunity on the line. A word longer than
    /// the whole line is split at the overflowing character. Whitespace may
    /// hang past the edge and is trimmed from the line. An empty string
    /// yields one empty line, which still costs one line of height.
    pub fn wrap(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        style: &TextStyle,
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
                    font_context.char_width(ch, style) * MM_PER_PT
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            let char_width = widths[i];

            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                        lines.push(self.make_line(&chars[line_start..end], &widths[line_start..end]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        // the char before this position may end a line
                        last_break_point = Some(i - 1);
                    }
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            if !ch.is_whitespace() && line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|bp| *bp >= line_start) {
                    let break_at = bp + 1;
                    lines.push(self.make_line(&chars[line_start..break_at], &widths[line_start..break_at]));
                    line_start = break_at;
                    line_width = widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                // No break point on this line: force break at current position
                lines.push(self.make_line(&chars[line_start..i], &widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            let rest = &chars[line_start..];
            let end = line_start
                + rest
                    .iter()
                    .rposition(|c| !is_newline(*c))
                    .map(|p| p + 1)
                    .unwrap_or(0);
            lines.push(self.make_line(&chars[line_start..end], &widths[line_start..end]));
        }

        lines
    }

    /// Create a BrokenLine, trimming trailing whitespace from text and width.
    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && chars[end - 1].is_whitespace() {
            end -= 1;
        }
        BrokenLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FontContext {
        FontContext::default()
    }

    #[test]
    fn test_single_line() {
        let lines = TextLayout::new().wrap(&ctx(), "Hello", 170.0, &TextStyle::plain(10.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello");
        assert!(lines[0].width > 0.0);
    }

    #[test]
    fn test_line_break_at_space() {
        // "Hello" at 10pt Times is about 7.8mm wide
        let lines = TextLayout::new().wrap(&ctx(), "Hello World", 10.0, &TextStyle::plain(10.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_explicit_newline() {
        let lines = TextLayout::new().wrap(&ctx(), "Hello\nWorld", 170.0, &TextStyle::plain(10.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_empty_string_is_one_line() {
        let lines = TextLayout::new().wrap(&ctx(), "", 170.0, &TextStyle::plain(10.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "");
        assert_eq!(lines[0].width, 0.0);
    }

    #[test]
    fn test_long_word_is_split() {
        let word = "x".repeat(200);
        let lines = TextLayout::new().wrap(&ctx(), &word, 20.0, &TextStyle::plain(10.0));
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 20.0 + 1e-9);
        }
        let joined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined, word);
    }

    #[test]
    fn test_lines_fit_width() {
        let text = "The intended marks for questions or parts of questions are given in brackets [ ]. \
                    Answers to this Paper must be written on the paper provided separately.";
        let lines = TextLayout::new().wrap(&ctx(), text, 60.0, &TextStyle::plain(10.0));
        assert!(lines.len() >= 3);
        for line in &lines {
            assert!(line.width <= 60.0 + 1e-9, "line too wide: {:?}", line);
            assert!(!line.text.ends_with(' '));
        }
    }

    #[test]
    fn test_measure_width_converts_to_mm() {
        let tl = TextLayout::new();
        // a Times space at 72pt is 18pt = 6.35mm
        let w = tl.measure_width(&ctx(), " ", &TextStyle::plain(72.0));
        assert!((w - 6.35).abs() < 1e-9);
    }
}
