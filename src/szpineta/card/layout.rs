use crate::error::{Result, SiteError};
use crate::markup::share::SIGNATURE;
use serde::{Deserialize, Serialize};

/// Largest accepted canvas edge, in pixels.
pub const MAX_CANVAS: u32 = 8192;
const MAX_FONT_SIZES: usize = 256;

/// Geometry and typography of a story card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardStyle {
    pub width: u32,
    pub height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
    /// First candidate font size, in pixels.
    pub max_font: f32,
    /// Smallest size tried; text that still overflows is clipped.
    pub min_font: f32,
    pub font_step: f32,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    /// Advance of an empty line as a multiple of the font size.
    pub gap: f32,
    pub footer: String,
    pub footer_size: f32,
    /// Footer baseline distance from the bottom edge.
    pub footer_offset: u32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            pad_x: 120,
            pad_y: 200,
            max_font: 44.0,
            min_font: 28.0,
            font_step: 2.0,
            line_height: 1.4,
            gap: 0.9,
            footer: SIGNATURE.to_string(),
            footer_size: 22.0,
            footer_offset: 100,
        }
    }
}

impl CardStyle {
    /// Rejects geometry that cannot produce a card.
    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str| Err(SiteError::Configuration(format!("Invalid card {what}")));

        if self.width == 0 || self.height == 0 || self.width > MAX_CANVAS || self.height > MAX_CANVAS {
            return invalid("size");
        }
        if self.pad_x.saturating_mul(2) >= self.width || self.pad_y.saturating_mul(2) >= self.height {
            return invalid("padding");
        }
        if self.footer_offset > self.height {
            return invalid("footer_offset");
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.min_font) || !positive(self.max_font) || self.min_font > self.max_font {
            return invalid("font range");
        }
        if !positive(self.font_step) {
            return invalid("font_step");
        }
        if !positive(self.line_height) || !positive(self.gap) || !positive(self.footer_size) {
            return invalid("line metrics");
        }
        Ok(())
    }

    pub fn content_width(&self) -> f32 {
        self.width.saturating_sub(self.pad_x.saturating_mul(2)) as f32
    }

    pub fn content_height(&self) -> f32 {
        self.height.saturating_sub(self.pad_y.saturating_mul(2)) as f32
    }

    /// Candidate font sizes, largest first, ending at `min_font`.
    pub fn font_sizes(&self) -> Vec<f32> {
        let step = if self.font_step > 0.0 { self.font_step } else { 1.0 };
        let mut sizes = Vec::new();
        let mut size = self.max_font;
        while size >= self.min_font && sizes.len() < MAX_FONT_SIZES {
            sizes.push(size);
            size -= step;
        }
        if sizes.is_empty() {
            sizes.push(self.min_font);
        }
        sizes
    }
}

/// Advance width of text set at a given size.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;
}

/// A wrapped card line; `None` is a paragraph gap.
pub type CardLine = Option<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub font_size: f32,
    pub lines: Vec<CardLine>,
    /// Top of the first line.
    pub top: f32,
}

impl CardLayout {
    pub fn line_advance(&self, style: &CardStyle) -> f32 {
        self.font_size * style.line_height
    }

    pub fn gap_advance(&self, style: &CardStyle) -> f32 {
        self.font_size * style.gap
    }
}

/// Greedy word wrap. Words wider than `max_width` are broken between characters.
pub fn wrap_line<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    size: f32,
    measure: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if measure.width(&candidate, size) <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if measure.width(word, size) <= max_width {
            line = word.to_string();
            continue;
        }

        let mut chunk = String::new();
        for ch in word.chars() {
            chunk.push(ch);
            if measure.width(&chunk, size) > max_width && chunk.chars().count() > 1 {
                chunk.pop();
                lines.push(std::mem::take(&mut chunk));
                chunk.push(ch);
            }
        }
        line = chunk;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn wrap_all<M: TextMeasure + ?Sized>(
    poem: &[String],
    style: &CardStyle,
    size: f32,
    measure: &M,
) -> Vec<CardLine> {
    let width = style.content_width();
    let mut lines = Vec::new();
    for raw in poem {
        if raw.trim().is_empty() {
            lines.push(None);
        } else {
            lines.extend(wrap_line(raw, width, size, measure).into_iter().map(Some));
        }
    }
    lines
}

fn total_height(lines: &[CardLine], style: &CardStyle, size: f32) -> f32 {
    lines
        .iter()
        .map(|l| match l {
            Some(_) => size * style.line_height,
            None => size * style.gap,
        })
        .sum()
}

/// Picks the largest font size whose wrapped text fits the content area and
/// centres the block vertically. Falls back to `min_font` when nothing fits.
pub fn layout<M: TextMeasure + ?Sized>(
    poem: &[String],
    style: &CardStyle,
    measure: &M,
) -> CardLayout {
    let content_height = style.content_height();
    let sizes = style.font_sizes();

    let mut chosen = None;
    for &size in &sizes {
        let lines = wrap_all(poem, style, size, measure);
        if total_height(&lines, style, size) <= content_height {
            chosen = Some((size, lines));
            break;
        }
    }
    let (font_size, lines) = chosen.unwrap_or_else(|| {
        let floor = style.min_font;
        (floor, wrap_all(poem, style, floor, measure))
    });

    let height = total_height(&lines, style, font_size);
    let top = style.pad_y as f32 + ((content_height - height) / 2.0).max(0.0);
    CardLayout {
        font_size,
        lines,
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is half the font size wide.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn width(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }
    }

    fn poem(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // 10 chars per line at size 10
        let lines = wrap_line("ala ma kota a kot ma ale", 50.0, 10.0, &Monospace);
        assert_eq!(lines, vec!["ala ma", "kota a kot", "ma ale"]);
    }

    #[test]
    fn breaks_long_words_by_character() {
        let lines = wrap_line("ab abcdefghijkl", 25.0, 10.0, &Monospace);
        assert_eq!(lines, vec!["ab", "abcde", "fghij", "kl"]);
    }

    #[test]
    fn short_poem_uses_largest_size() {
        let style = CardStyle::default();
        let result = layout(&poem(&["wers jeden", "", "wers dwa"]), &style, &Monospace);
        assert_eq!(result.font_size, 44.0);
        assert_eq!(
            result.lines,
            vec![Some("wers jeden".to_string()), None, Some("wers dwa".to_string())]
        );

        let height = 2.0 * 44.0 * 1.4 + 44.0 * 0.9;
        let expected_top = 200.0 + (1520.0 - height) / 2.0;
        assert!((result.top - expected_top).abs() < 0.01);
    }

    #[test]
    fn long_poem_shrinks_font() {
        let style = CardStyle::default();
        // 1520 / (44 * 1.4) = 24.6 lines fit at the largest size
        let lines: Vec<String> = (0..26).map(|i| format!("wers {i}")).collect();
        let result = layout(&lines, &style, &Monospace);
        assert!(result.font_size < 44.0);
        assert!(result.font_size >= 28.0);
        let height = 26.0 * result.font_size * 1.4;
        assert!(height <= style.content_height());
    }

    #[test]
    fn overflow_stops_at_floor_size() {
        let style = CardStyle::default();
        let lines: Vec<String> = (0..200).map(|i| format!("wers {i}")).collect();
        let result = layout(&lines, &style, &Monospace);
        assert_eq!(result.font_size, 28.0);
        assert_eq!(result.top, 200.0);
        assert_eq!(result.lines.len(), 200);
    }

    #[test]
    fn font_sizes_descend_to_floor() {
        let sizes = CardStyle::default().font_sizes();
        assert_eq!(sizes.first(), Some(&44.0));
        assert_eq!(sizes.last(), Some(&28.0));
        assert_eq!(sizes.len(), 9);
    }

    #[test]
    fn oversized_padding_does_not_overflow() {
        let style = CardStyle {
            pad_x: u32::MAX,
            pad_y: u32::MAX / 2 + 1,
            ..CardStyle::default()
        };
        assert_eq!(style.content_width(), 0.0);
        assert_eq!(style.content_height(), 0.0);
        assert!(matches!(style.validate(), Err(SiteError::Configuration(_))));
    }

    #[test]
    fn font_sizes_are_bounded() {
        let style = CardStyle {
            min_font: -1.0e30,
            ..CardStyle::default()
        };
        assert_eq!(style.font_sizes().len(), MAX_FONT_SIZES);
        assert!(style.validate().is_err());

        let style = CardStyle {
            min_font: f32::NAN,
            ..CardStyle::default()
        };
        assert_eq!(style.font_sizes().len(), 1);
        assert!(style.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults_and_rejects_bad_geometry() {
        assert!(CardStyle::default().validate().is_ok());

        let bad = [
            CardStyle { width: 0, ..CardStyle::default() },
            CardStyle { height: MAX_CANVAS + 1, ..CardStyle::default() },
            CardStyle { pad_x: 540, ..CardStyle::default() },
            CardStyle { min_font: 50.0, ..CardStyle::default() },
            CardStyle { font_step: 0.0, ..CardStyle::default() },
            CardStyle { line_height: f32::INFINITY, ..CardStyle::default() },
            CardStyle { footer_offset: 5000, ..CardStyle::default() },
        ];
        for style in bad {
            assert!(style.validate().is_err(), "{style:?}");
        }
    }
}
