//! A context that keeps every call instead of drawing, for geometry checks.

use super::{EstimatedTextMeasure, FontInfo, RenderContext, TextMeasure, TextMetrics};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    SetFont(FontInfo),
    SetLineWidth(f64),
    SetFillStyle(String),
    SetStrokeStyle(String),
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Stroke,
    Fill,
    FillText { text: String, x: f64, y: f64 },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    pub calls: Vec<DrawCall>,
    measure: EstimatedTextMeasure,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// `(x, y, w, h)` of every `fill_rect`.
    pub fn fill_rects(&self) -> Vec<(f64, f64, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { x, y, w, h } => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(&str, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillText { text, x, y } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for RecordingContext {
    fn measure_text(&self, text: &str, font: &FontInfo) -> TextMetrics {
        self.measure.measure_text(text, font)
    }
}

impl RenderContext for RecordingContext {
    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn set_font(&mut self, font: &FontInfo) {
        self.calls.push(DrawCall::SetFont(font.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.calls.push(DrawCall::SetLineWidth(width));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.calls.push(DrawCall::SetFillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.calls.push(DrawCall::SetStrokeStyle(color.to_string()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::FillRect { x, y, w, h });
    }

    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::LineTo(x, y));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::Rect { x, y, w, h });
    }

    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }

    fn fill(&mut self) {
        self.calls.push(DrawCall::Fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.calls.push(DrawCall::FillText { text: text.to_string(), x, y });
    }
}
