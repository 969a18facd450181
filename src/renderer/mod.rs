//! Drawing surface contract and the SVG implementation.
//!
//! Layout code never draws pixels itself; it talks to a [`RenderContext`]
//! with canvas-like primitives. [`SvgContext`] records those calls as SVG
//! elements.

mod recording;
mod svg_context;

use serde::{Deserialize, Serialize};

use crate::constants::*;

pub use recording::{DrawCall, RecordingContext};
pub use svg_context::SvgContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    pub family: String,
    pub size: f64,
    pub weight: String,
    pub style: String,
}

impl FontInfo {
    pub fn new(family: &str, size: f64, weight: &str) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight: weight.to_string(),
            style: "normal".to_string(),
        }
    }

    pub fn sans_serif(size: f64) -> Self {
        Self::new("Arial, sans-serif", size, "normal")
    }

    pub fn bold(mut self) -> Self {
        self.weight = "bold".to_string();
        self
    }
}

impl Default for FontInfo {
    fn default() -> Self {
        Self::sans_serif(10.0)
    }
}

/// Measured extent of a text run. `descent` is the depth below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub descent: f64,
}

pub trait TextMeasure {
    fn measure_text(&self, text: &str, font: &FontInfo) -> TextMetrics;
}

/// Canvas-style drawing primitives.
pub trait RenderContext: TextMeasure {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_font(&mut self, font: &FontInfo);
    fn set_line_width(&mut self, width: f64);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Width estimate from character counts, for surfaces without font metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasure;

fn is_music_glyph(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

impl TextMeasure for EstimatedTextMeasure {
    fn measure_text(&self, text: &str, font: &FontInfo) -> TextMetrics {
        let width = text
            .chars()
            .map(|c| {
                let factor = if is_music_glyph(c) {
                    GLYPH_CHAR_WIDTH_FACTOR
                } else {
                    TEXT_CHAR_WIDTH_FACTOR
                };
                factor * font.size
            })
            .sum::<f64>();
        TextMetrics {
            width,
            height: font.size,
            descent: font.size * TEXT_DESCENT_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_font_size() {
        let m = EstimatedTextMeasure;
        let small = m.measure_text("Fine", &FontInfo::sans_serif(10.0));
        let large = m.measure_text("Fine", &FontInfo::sans_serif(20.0));
        assert!((small.width - 4.0 * 5.5).abs() < 1e-9, "got {}", small.width);
        assert!((large.width - 2.0 * small.width).abs() < 1e-9);
        assert_eq!(m.measure_text("", &FontInfo::default()).width, 0.0);
    }

    #[test]
    fn music_glyphs_are_wider_than_letters() {
        let m = EstimatedTextMeasure;
        let font = FontInfo::default();
        assert!(m.measure_text("\u{ECA5}", &font).width > m.measure_text("a", &font).width);
    }
}
