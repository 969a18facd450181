//! Stave geometry and begin/end decoration layout.

use log::debug;

use crate::config::StaveConfig;
use crate::constants::*;
use crate::error::LayoutResult;
use crate::position::Position;
use crate::renderer::{EstimatedTextMeasure, RenderContext, TextMeasure};
use crate::stave_modifier::{SignatureKind, StaveModifier, StaveModifierKind};

/// Read-only geometry a stave exposes to whatever is placed on it.
pub trait StaveGeometry {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn width(&self) -> f64;
    fn num_lines(&self) -> u32;
    fn spacing_between_lines(&self) -> f64;
    fn y_for_line(&self, line: f64) -> f64;
    /// Text lines count upward from the stave's top text position.
    fn y_for_top_text(&self, line: f64) -> f64;
    fn y_for_bottom_text(&self, line: f64) -> f64;
    fn bottom_line_y(&self) -> f64;
    /// First x available to notes, after begin decorations.
    fn note_start_x(&self) -> f64;
    /// Last x available to notes, before end decorations.
    fn note_end_x(&self) -> f64;
    /// Horizontal offset applied to a decoration drawn at `position`.
    fn modifier_x_shift(&self, position: Position) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaveFrame {
    x: f64,
    y: f64,
    width: f64,
    config: StaveConfig,
    start_x: f64,
    end_x: f64,
}

impl StaveFrame {
    pub fn new(x: f64, y: f64, width: f64, config: StaveConfig) -> Self {
        Self { x, y, width, config, start_x: x, end_x: x + width }
    }

    pub fn config(&self) -> &StaveConfig {
        &self.config
    }

    pub fn set_note_start_x(&mut self, x: f64) -> &mut Self {
        self.start_x = x;
        self
    }

    pub fn set_note_end_x(&mut self, x: f64) -> &mut Self {
        self.end_x = x;
        self
    }
}

impl StaveGeometry for StaveFrame {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn num_lines(&self) -> u32 {
        self.config.num_lines
    }

    fn spacing_between_lines(&self) -> f64 {
        self.config.spacing_between_lines
    }

    fn y_for_line(&self, line: f64) -> f64 {
        let spacing = self.config.spacing_between_lines;
        self.y + line * spacing + self.config.space_above_staff_ln * spacing
    }

    fn y_for_top_text(&self, line: f64) -> f64 {
        self.y_for_line(-(line + self.config.top_text_position))
    }

    fn y_for_bottom_text(&self, line: f64) -> f64 {
        self.y_for_line(self.config.bottom_text_position + line)
    }

    fn bottom_line_y(&self) -> f64 {
        self.y_for_line(self.config.num_lines as f64)
    }

    fn note_start_x(&self) -> f64 {
        self.start_x
    }

    fn note_end_x(&self) -> f64 {
        self.end_x
    }

    fn modifier_x_shift(&self, position: Position) -> f64 {
        match position {
            Position::Left | Position::Right => 0.0,
            _ => self.start_x - self.x,
        }
    }
}

/// A stave frame plus the decorations placed on it.
#[derive(Debug, Clone)]
pub struct Stave {
    frame: StaveFrame,
    modifiers: Vec<StaveModifier>,
    formatted: bool,
}

impl Stave {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self::with_config(x, y, width, StaveConfig::default())
    }

    pub fn with_config(x: f64, y: f64, width: f64, config: StaveConfig) -> Self {
        Self {
            frame: StaveFrame::new(x, y, width, config),
            modifiers: Vec::new(),
            formatted: false,
        }
    }

    pub fn frame(&self) -> &StaveFrame {
        &self.frame
    }

    /// Decorations take the stave's configured padding.
    pub fn add_modifier(&mut self, mut modifier: StaveModifier) -> &mut Self {
        let config = &self.frame.config;
        let padding = match modifier.kind() {
            StaveModifierKind::Signature { kind: SignatureKind::TimeSignature, .. } => {
                config.time_signature_padding
            }
            _ => config.modifier_padding,
        };
        modifier.set_padding(padding);
        self.modifiers.push(modifier);
        self.formatted = false;
        self
    }

    pub fn modifiers(&self) -> &[StaveModifier] {
        &self.modifiers
    }

    pub fn modifiers_at(&self, position: Position) -> impl Iterator<Item = &StaveModifier> {
        self.modifiers.iter().filter(move |m| m.position() == position)
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    /// Lay out begin and end decorations and narrow the note area to what
    /// is left between them.
    pub fn format(&mut self) -> LayoutResult<()> {
        self.format_with(&EstimatedTextMeasure)
    }

    pub fn format_with<M: TextMeasure + ?Sized>(&mut self, measure: &M) -> LayoutResult<()> {
        for m in &mut self.modifiers {
            m.pre_format(measure)?;
        }

        // Slot 0 on either side is the barline drawn with the stave lines.
        let mut begin: Vec<usize> = self.indices_at(Position::Begin);
        begin.sort_by_key(|&i| self.modifiers[i].layout_order());
        let mut cursor = self.frame.x;
        let mut slot = 1;
        for i in begin {
            let m = &mut self.modifiers[i];
            if m.width() <= 0.0 {
                m.set_x(cursor);
                continue;
            }
            let x = cursor + m.get_padding(slot);
            m.set_x(x);
            cursor = x + m.width();
            slot += 1;
        }
        self.frame.start_x = cursor;

        let mut end: Vec<usize> = self.indices_at(Position::End);
        end.sort_by_key(|&i| self.modifiers[i].layout_order());
        let mut cursor = self.frame.x + self.frame.width;
        let mut slot = 1;
        for i in end {
            let m = &mut self.modifiers[i];
            let (width, pad_left, pad_right) = match m.layout_metrics() {
                Some(lm) => (lm.x_max - lm.x_min, lm.padding_left, lm.padding_right),
                None => (m.width(), m.get_padding(slot), 0.0),
            };
            if width <= 0.0 {
                m.set_x(cursor);
                continue;
            }
            let x = cursor - pad_right - width;
            m.set_x(x);
            cursor = x - pad_left;
            slot += 1;
        }
        self.frame.end_x = cursor;

        debug!(
            "stave at ({:.1}, {:.1}): notes from {:.1} to {:.1}",
            self.frame.x, self.frame.y, self.frame.start_x, self.frame.end_x
        );
        self.formatted = true;
        Ok(())
    }

    fn indices_at(&self, position: Position) -> Vec<usize> {
        (0..self.modifiers.len())
            .filter(|&i| self.modifiers[i].position() == position)
            .collect()
    }

    /// Draw stave lines and every decoration. Formats first if needed.
    pub fn draw(&mut self, ctx: &mut dyn RenderContext) -> LayoutResult<()> {
        if !self.formatted {
            self.format_with(&*ctx)?;
        }
        self.draw_lines(ctx);
        for m in &mut self.modifiers {
            let shift = self.frame.modifier_x_shift(m.position());
            m.draw(ctx, &self.frame, shift)?;
        }
        Ok(())
    }

    fn draw_lines(&self, ctx: &mut dyn RenderContext) {
        let f = &self.frame;
        ctx.save();
        ctx.set_stroke_style(STAFF_COLOR);
        ctx.set_line_width(STAFF_LINE_WIDTH);
        ctx.begin_path();
        for line in 0..f.num_lines() {
            let y = f.y_for_line(line as f64);
            ctx.move_to(f.x, y);
            ctx.line_to(f.x + f.width, y);
        }
        ctx.stroke();

        let top = f.y_for_line(0.0);
        let bottom = f.y_for_line(f.num_lines().saturating_sub(1) as f64);
        ctx.set_fill_style(STAFF_COLOR);
        ctx.fill_rect(f.x, top, BARLINE_WIDTH, bottom - top);
        ctx.fill_rect(f.x + f.width - BARLINE_WIDTH, top, BARLINE_WIDTH, bottom - top);
        ctx.restore();
    }
}

impl StaveGeometry for Stave {
    fn x(&self) -> f64 {
        self.frame.x()
    }

    fn y(&self) -> f64 {
        self.frame.y()
    }

    fn width(&self) -> f64 {
        self.frame.width()
    }

    fn num_lines(&self) -> u32 {
        self.frame.num_lines()
    }

    fn spacing_between_lines(&self) -> f64 {
        self.frame.spacing_between_lines()
    }

    fn y_for_line(&self, line: f64) -> f64 {
        self.frame.y_for_line(line)
    }

    fn y_for_top_text(&self, line: f64) -> f64 {
        self.frame.y_for_top_text(line)
    }

    fn y_for_bottom_text(&self, line: f64) -> f64 {
        self.frame.y_for_bottom_text(line)
    }

    fn bottom_line_y(&self) -> f64 {
        self.frame.bottom_line_y()
    }

    fn note_start_x(&self) -> f64 {
        self.frame.note_start_x()
    }

    fn note_end_x(&self) -> f64 {
        self.frame.note_end_x()
    }

    fn modifier_x_shift(&self, position: Position) -> f64 {
        self.frame.modifier_x_shift(position)
    }
}
