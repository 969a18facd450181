//! Stave decorations: clefs, key and time signatures, tempo marks, section
//! labels, voltas and free text.
//!
//! Every decoration is one [`StaveModifier`] record carrying the placement
//! state all of them share (position, shifts, padding, layout metrics). What
//! differs between them is only how they are measured and drawn, selected by
//! the [`StaveModifierKind`] tag.

mod section;
mod signature;
mod tempo;
mod text;
mod volta;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{LayoutError, LayoutResult};
use crate::position::Position;
use crate::renderer::{FontInfo, RenderContext, TextMeasure};
use crate::stave::StaveGeometry;
use crate::tables::GlyphTable;

pub use signature::SignatureKind;
pub use tempo::StaveTempoOptions;
pub use text::TextJustification;
pub use volta::VoltaType;

/// Horizontal extent reported by an upstream layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub x_min: f64,
    pub x_max: f64,
    pub padding_left: f64,
    pub padding_right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Unplaced,
    PreFormatted,
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaveModifierCategory {
    Clef,
    KeySignature,
    TimeSignature,
    Tempo,
    Section,
    Volta,
    Text,
}

impl fmt::Display for StaveModifierCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StaveModifierKind {
    Signature {
        kind: SignatureKind,
        glyph: String,
        /// Stave line the glyph baseline sits on.
        line: f64,
    },
    Tempo {
        options: StaveTempoOptions,
        glyphs: GlyphTable,
    },
    Section {
        label: String,
        draw_rect: bool,
    },
    Volta {
        volta: VoltaType,
        label: String,
    },
    Text {
        text: String,
        justification: TextJustification,
    },
}

impl StaveModifierKind {
    pub fn category(&self) -> StaveModifierCategory {
        match self {
            StaveModifierKind::Signature { kind, .. } => kind.category(),
            StaveModifierKind::Tempo { .. } => StaveModifierCategory::Tempo,
            StaveModifierKind::Section { .. } => StaveModifierCategory::Section,
            StaveModifierKind::Volta { .. } => StaveModifierCategory::Volta,
            StaveModifierKind::Text { .. } => StaveModifierCategory::Text,
        }
    }

    fn accepts(&self, position: Position) -> bool {
        match self {
            StaveModifierKind::Signature { .. } => {
                matches!(position, Position::Begin | Position::End)
            }
            StaveModifierKind::Tempo { .. }
            | StaveModifierKind::Section { .. }
            | StaveModifierKind::Volta { .. } => position == Position::Above,
            StaveModifierKind::Text { .. } => matches!(
                position,
                Position::Left | Position::Right | Position::Above | Position::Below
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaveModifier {
    kind: StaveModifierKind,
    position: Position,
    /// Absolute for begin/end decorations (set by stave layout); an offset
    /// from the stave's left edge for everything else.
    x: f64,
    x_shift: f64,
    y_shift: f64,
    padding: f64,
    width: f64,
    layout_metrics: Option<LayoutMetrics>,
    font: FontInfo,
    state: PlacementState,
}

impl StaveModifier {
    pub fn new(kind: StaveModifierKind, position: Position) -> Self {
        Self {
            kind,
            position,
            x: 0.0,
            x_shift: 0.0,
            y_shift: 0.0,
            padding: DEFAULT_MODIFIER_PADDING,
            width: 0.0,
            layout_metrics: None,
            font: FontInfo::default(),
            state: PlacementState::Unplaced,
        }
    }

    /// Clef, key or time signature drawn as a glyph run on `line`.
    pub fn signature(kind: SignatureKind, glyph: &str, width: f64, line: f64) -> Self {
        let mut m = Self::new(
            StaveModifierKind::Signature { kind, glyph: glyph.to_string(), line },
            Position::Begin,
        );
        if kind == SignatureKind::TimeSignature {
            m.padding = TIME_SIGNATURE_PADDING;
        }
        m.width = width;
        m.font = FontInfo::new(MUSIC_FONT_FAMILY, SIGNATURE_FONT_SIZE, "normal");
        m
    }

    pub fn tempo(options: StaveTempoOptions, y_shift: f64) -> Self {
        Self::tempo_with_glyphs(options, GlyphTable::metronome(), y_shift)
    }

    pub fn tempo_with_glyphs(options: StaveTempoOptions, glyphs: GlyphTable, y_shift: f64) -> Self {
        let mut m = Self::new(StaveModifierKind::Tempo { options, glyphs }, Position::Above);
        m.x_shift = TEMPO_X_SHIFT;
        m.y_shift = y_shift;
        m.font = FontInfo::sans_serif(TEMPO_TEXT_SIZE);
        m
    }

    pub fn section(label: &str, y_shift: f64, draw_rect: bool) -> Self {
        let mut m = Self::new(
            StaveModifierKind::Section { label: label.to_string(), draw_rect },
            Position::Above,
        );
        m.width = SECTION_MIN_WIDTH;
        m.y_shift = y_shift;
        m.font = FontInfo::sans_serif(SECTION_FONT_SIZE).bold();
        m
    }

    pub fn volta(volta: VoltaType, label: &str, y_shift: f64) -> Self {
        let mut m = Self::new(
            StaveModifierKind::Volta { volta, label: label.to_string() },
            Position::Above,
        );
        m.y_shift = y_shift;
        m.font = FontInfo::sans_serif(VOLTA_FONT_SIZE).bold();
        m
    }

    pub fn text(text: &str, position: Position, justification: TextJustification) -> Self {
        let mut m = Self::new(
            StaveModifierKind::Text { text: text.to_string(), justification },
            position,
        );
        m.width = TEXT_DEFAULT_WIDTH;
        m.font = FontInfo::sans_serif(TEXT_FONT_SIZE);
        m
    }

    pub fn kind(&self) -> &StaveModifierKind {
        &self.kind
    }

    pub fn category(&self) -> StaveModifierCategory {
        self.kind.category()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Not validated here; drawing at a position the kind does not support
    /// fails with `InvalidPosition`.
    pub fn set_position(&mut self, position: Position) -> &mut Self {
        self.position = position;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    pub fn x_shift(&self) -> f64 {
        self.x_shift
    }

    pub fn set_x_shift(&mut self, x: f64) -> &mut Self {
        self.x_shift = x;
        self
    }

    pub fn y_shift(&self) -> f64 {
        self.y_shift
    }

    pub fn set_y_shift(&mut self, y: f64) -> &mut Self {
        self.y_shift = y;
        self
    }

    /// Padding before the decoration in layout slot `index`. The first two
    /// slots are never padded.
    pub fn get_padding(&self, index: usize) -> f64 {
        if index < UNPADDED_SLOTS {
            0.0
        } else {
            self.padding
        }
    }

    pub fn set_padding(&mut self, padding: f64) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }

    pub fn layout_metrics(&self) -> Option<&LayoutMetrics> {
        self.layout_metrics.as_ref()
    }

    pub fn set_layout_metrics(&mut self, metrics: LayoutMetrics) -> &mut Self {
        self.layout_metrics = Some(metrics);
        self
    }

    pub fn font(&self) -> &FontInfo {
        &self.font
    }

    pub fn set_font(&mut self, font: FontInfo) -> &mut Self {
        self.font = font;
        self.state = PlacementState::Unplaced;
        self
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    /// Begin/end layout order: clef, key, time, then anything else.
    pub(crate) fn layout_order(&self) -> u8 {
        match self.category() {
            StaveModifierCategory::Clef => 0,
            StaveModifierCategory::KeySignature => 1,
            StaveModifierCategory::TimeSignature => 2,
            _ => 3,
        }
    }

    /// Measure the decoration's footprint.
    pub fn pre_format<M: TextMeasure + ?Sized>(&mut self, measure: &M) -> LayoutResult<()> {
        match &self.kind {
            StaveModifierKind::Signature { .. } | StaveModifierKind::Volta { .. } => {}
            StaveModifierKind::Tempo { options, glyphs } => {
                self.width = tempo::measure(options, glyphs, &self.font, measure)?;
            }
            StaveModifierKind::Section { label, .. } => {
                self.width = section::measure(label, &self.font, measure);
            }
            StaveModifierKind::Text { text, .. } => {
                self.width = measure.measure_text(text, &self.font).width;
            }
        }
        if self.state == PlacementState::Unplaced {
            self.state = PlacementState::PreFormatted;
        }
        Ok(())
    }

    fn check_position(&self) -> LayoutResult<()> {
        if self.kind.accepts(self.position) {
            Ok(())
        } else {
            Err(LayoutError::InvalidPosition(format!(
                "{} cannot be drawn at {}",
                self.category(),
                self.position
            )))
        }
    }

    /// Draw against `stave`, offset by `shift_x`. Safe to repeat.
    pub fn draw<S>(&mut self, ctx: &mut dyn RenderContext, stave: &S, shift_x: f64) -> LayoutResult<()>
    where
        S: StaveGeometry + ?Sized,
    {
        self.check_position()?;
        if self.state == PlacementState::Unplaced {
            self.pre_format(&*ctx)?;
        }

        match &self.kind {
            StaveModifierKind::Signature { glyph, line, .. } => {
                signature::draw(self, glyph, *line, ctx, stave);
            }
            StaveModifierKind::Tempo { options, glyphs } => {
                tempo::draw(self, options, glyphs, ctx, stave, shift_x)?;
            }
            StaveModifierKind::Section { label, draw_rect } => {
                section::draw(self, label, *draw_rect, ctx, stave, shift_x);
            }
            StaveModifierKind::Volta { volta, label } => {
                volta::draw(self, *volta, label, ctx, stave, shift_x);
            }
            StaveModifierKind::Text { text, justification } => {
                text::draw(self, text, *justification, ctx, stave);
            }
        }
        self.state = PlacementState::Drawn;
        Ok(())
    }
}
