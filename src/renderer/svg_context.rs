//! SVG context — accumulates SVG elements from canvas-style calls and
//! produces the final string.

use super::{EstimatedTextMeasure, FontInfo, RenderContext, TextMeasure, TextMetrics};
use crate::constants::*;

#[derive(Debug, Clone)]
struct DrawState {
    font: FontInfo,
    fill: String,
    stroke: String,
    line_width: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            font: FontInfo::default(),
            fill: NOTE_COLOR.to_string(),
            stroke: NOTE_COLOR.to_string(),
            line_width: 1.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SvgContext
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgContext {
    pub elements: Vec<String>,
    width: f64,
    height: f64,
    state: DrawState,
    saved: Vec<DrawState>,
    path: String,
    measure: EstimatedTextMeasure,
}

impl SvgContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            state: DrawState::default(),
            saved: Vec::new(),
            path: String::new(),
            measure: EstimatedTextMeasure,
        }
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl TextMeasure for SvgContext {
    fn measure_text(&self, text: &str, font: &FontInfo) -> TextMetrics {
        self.measure.measure_text(text, font)
    }
}

impl RenderContext for SvgContext {
    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_font(&mut self, font: &FontInfo) {
        self.state.font = font.clone();
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = color.to_string();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = color.to_string();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, self.state.fill
        ));
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push_str(&format!("M{:.1},{:.1} ", x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push_str(&format!("L{:.1},{:.1} ", x, y));
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.path.push_str(&format!(
            "M{:.1},{:.1} h{:.1} v{:.1} h{:.1} Z ",
            x, y, w, h, -w
        ));
    }

    fn stroke(&mut self) {
        let d = self.path.trim_end();
        if d.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
            d, self.state.stroke, self.state.line_width
        ));
    }

    fn fill(&mut self) {
        let d = self.path.trim_end();
        if d.is_empty() {
            return;
        }
        self.elements.push(format!(r#"<path d="{}" fill="{}"/>"#, d, self.state.fill));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let font = &self.state.font;
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.0}" font-weight="{}" font-style="{}" fill="{}">{}</text>"#,
            x, y, font.family, font.size, font.weight, font.style, self.state.fill, escape(text)
        ));
    }
}
