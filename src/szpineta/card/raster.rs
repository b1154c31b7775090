use super::layout::{layout, CardLayout, CardStyle, TextMeasure};
use crate::error::{Result, SiteError};
use fontdue::{Font, FontSettings};
use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const BACKGROUND_TOP: [u8; 3] = [0xff, 0xfd, 0xfa];
const BACKGROUND_BOTTOM: [u8; 3] = [0xf9, 0xf6, 0xef];
const TEXT: [u8; 3] = [0x00, 0x00, 0x00];
const FOOTER: [u8; 3] = [0x66, 0x66, 0x66];
const PLACEHOLDER: char = '?';

/// Draws story cards with a single TrueType/OpenType font.
pub struct CardRenderer {
    font: Font,
    style: CardStyle,
}

impl CardRenderer {
    pub fn from_bytes(bytes: &[u8], style: CardStyle) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| SiteError::Render(format!("Invalid font: {e}")))?;
        Ok(Self { font, style })
    }

    pub fn from_file(path: &Path, style: CardStyle) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| SiteError::Render(format!("Cannot read font {}: {e}", path.display())))?;
        debug!(font = %path.display(), "loaded card font");
        Self::from_bytes(&bytes, style)
    }

    /// Characters without a glyph in the font become a placeholder.
    fn renderable(&self, ch: char) -> char {
        if ch.is_whitespace() || self.font.lookup_glyph_index(ch) != 0 {
            ch
        } else {
            PLACEHOLDER
        }
    }

    pub fn layout(&self, lines: &[String]) -> CardLayout {
        layout(lines, &self.style, self)
    }

    /// Renders the poem lines to PNG bytes.
    pub fn render_png(&self, lines: &[String]) -> Result<Vec<u8>> {
        let image = self.render(lines);
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| SiteError::Render(e.to_string()))?;
        Ok(bytes)
    }

    pub fn render(&self, lines: &[String]) -> RgbImage {
        let style = &self.style;
        let mut image = gradient(style.width, style.height);
        let card = self.layout(lines);
        debug!(
            font_size = card.font_size,
            lines = card.lines.len(),
            "laid out card"
        );

        let limit = style.height.saturating_sub(style.pad_y) as f32;
        let mut y = card.top;
        for line in &card.lines {
            match line {
                None => y += card.gap_advance(style),
                Some(text) => {
                    self.draw_centered(&mut image, text, card.font_size, y, TEXT);
                    y += card.line_advance(style);
                    if y > limit {
                        break;
                    }
                }
            }
        }

        let footer_top = style.height.saturating_sub(style.footer_offset) as f32;
        self.draw_centered(&mut image, &style.footer, style.footer_size, footer_top, FOOTER);
        image
    }

    /// Draws `text` horizontally centred with the top of its line box at `top`.
    fn draw_centered(&self, image: &mut RgbImage, text: &str, size: f32, top: f32, color: [u8; 3]) {
        let ascent = self
            .font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size);
        let baseline = top + ascent;
        let mut pen = (image.width() as f32 - self.width(text, size)) / 2.0;

        for ch in text.chars().map(|c| self.renderable(c)) {
            let (metrics, coverage) = self.font.rasterize(ch, size);
            let left = pen.round() as i32 + metrics.xmin;
            let glyph_top = baseline.round() as i32 - metrics.ymin - metrics.height as i32;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let x = left + col as i32;
                    let y = glyph_top + row as i32;
                    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
                        continue;
                    }
                    let pixel = image.get_pixel_mut(x as u32, y as u32);
                    *pixel = blend(*pixel, color, alpha);
                }
            }
            pen += metrics.advance_width;
        }
    }
}

impl TextMeasure for CardRenderer {
    fn width(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(self.renderable(c), size).advance_width)
            .sum()
    }
}

fn gradient(width: u32, height: u32) -> RgbImage {
    let span = height.saturating_sub(1).max(1) as f32;
    RgbImage::from_fn(width, height, |_, y| {
        let t = y as f32 / span;
        let mix = |i: usize| {
            let a = BACKGROUND_TOP[i] as f32;
            let b = BACKGROUND_BOTTOM[i] as f32;
            (a + (b - a) * t).round() as u8
        };
        Rgb([mix(0), mix(1), mix(2)])
    })
}

fn blend(under: Rgb<u8>, over: [u8; 3], alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |i: usize| ((over[i] as u32 * a + under.0[i] as u32 * (255 - a)) / 255) as u8;
    Rgb([mix(0), mix(1), mix(2)])
}
