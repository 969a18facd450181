//! Note modifiers: symbols attached to a tickable that need room beside or
//! around its glyph (accidentals, dots, strokes, articulations, embedded
//! note groups, ...).

use serde::{Deserialize, Serialize};

use crate::config::FormatterConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::formatter::{FormatOptions, Formatter};
use crate::position::Position;
use crate::tickable::Tickable;
use crate::voice::{Voice, VoiceTime};

/// Closed set of modifier categories. Declaration order is the order a
/// `ModifierContext` formats them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModifierCategory {
    Dot,
    Accidental,
    Stroke,
    GraceNoteGroup,
    NoteSubGroup,
    Articulation,
    Ornament,
    Annotation,
}

/// Which accumulator a category's width goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSide {
    Left,
    Right,
    /// Stacks above/below the note on text lines; takes no lateral room.
    Vertical,
}

impl ModifierCategory {
    pub const FORMAT_ORDER: [ModifierCategory; 8] = [
        ModifierCategory::Dot,
        ModifierCategory::Accidental,
        ModifierCategory::Stroke,
        ModifierCategory::GraceNoteGroup,
        ModifierCategory::NoteSubGroup,
        ModifierCategory::Articulation,
        ModifierCategory::Ornament,
        ModifierCategory::Annotation,
    ];

    pub fn shift_side(&self) -> ShiftSide {
        match self {
            ModifierCategory::Dot => ShiftSide::Right,
            ModifierCategory::Accidental
            | ModifierCategory::Stroke
            | ModifierCategory::GraceNoteGroup
            | ModifierCategory::NoteSubGroup => ShiftSide::Left,
            ModifierCategory::Articulation
            | ModifierCategory::Ornament
            | ModifierCategory::Annotation => ShiftSide::Vertical,
        }
    }

    fn default_position(&self) -> Position {
        match self.shift_side() {
            ShiftSide::Left => Position::Left,
            ShiftSide::Right => Position::Right,
            ShiftSide::Vertical => Position::Above,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Embedded note groups
// ═══════════════════════════════════════════════════════════════════════

/// A run of notes formatted on its own timeline and carried by a parent
/// note as one fixed-width modifier (clef changes, grace notes, ...).
#[derive(Debug, Clone)]
pub struct SubGroup {
    voice: Voice,
    formatter: Formatter,
}

impl SubGroup {
    fn new(tickables: Vec<Tickable>) -> Self {
        let tickables = tickables
            .into_iter()
            .map(|mut t| {
                t.set_ignore_ticks(false);
                t
            })
            .collect();
        Self {
            voice: Voice::soft(VoiceTime::default(), tickables),
            formatter: Formatter::new(),
        }
    }

    /// Runs an inner formatter built from the outer one's config and reports
    /// its unjustified width.
    fn measure(&mut self, config: &FormatterConfig) -> LayoutResult<f64> {
        self.formatter = Formatter::with_config(config.clone());
        self.formatter.format(
            std::slice::from_mut(&mut self.voice),
            None,
            &FormatOptions::default(),
        )?;
        Ok(self.formatter.min_total_width())
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }
}

#[derive(Debug, Clone)]
pub enum ModifierKind {
    Dot,
    Accidental,
    Stroke,
    Articulation,
    Ornament,
    Annotation(String),
    NoteSubGroup(Box<SubGroup>),
    GraceNoteGroup(Box<SubGroup>),
}

impl ModifierKind {
    pub fn category(&self) -> ModifierCategory {
        match self {
            ModifierKind::Dot => ModifierCategory::Dot,
            ModifierKind::Accidental => ModifierCategory::Accidental,
            ModifierKind::Stroke => ModifierCategory::Stroke,
            ModifierKind::Articulation => ModifierCategory::Articulation,
            ModifierKind::Ornament => ModifierCategory::Ornament,
            ModifierKind::Annotation(_) => ModifierCategory::Annotation,
            ModifierKind::NoteSubGroup(_) => ModifierCategory::NoteSubGroup,
            ModifierKind::GraceNoteGroup(_) => ModifierCategory::GraceNoteGroup,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Modifier
// ═══════════════════════════════════════════════════════════════════════

const DOT_WIDTH: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Modifier {
    kind: ModifierKind,
    position: Position,
    width: f64,
    x_shift: f64,
    text_line: f64,
    measured: bool,
    /// Key index within the owning note's chord; `None` until attached.
    index: Option<usize>,
    glyph: Option<String>,
}

impl Modifier {
    pub fn new(kind: ModifierKind, width: f64) -> Self {
        let position = kind.category().default_position();
        Self {
            kind,
            position,
            width,
            x_shift: 0.0,
            text_line: 0.0,
            measured: false,
            index: None,
            glyph: None,
        }
    }

    pub fn dot() -> Self {
        Self::new(ModifierKind::Dot, DOT_WIDTH)
    }

    pub fn accidental(glyph: &str, width: f64) -> Self {
        Self::new(ModifierKind::Accidental, width).with_glyph(glyph)
    }

    pub fn stroke(width: f64) -> Self {
        Self::new(ModifierKind::Stroke, width)
    }

    pub fn articulation(glyph: &str, width: f64, position: Position) -> Self {
        Self::new(ModifierKind::Articulation, width)
            .with_glyph(glyph)
            .with_position(position)
    }

    pub fn ornament(glyph: &str, width: f64) -> Self {
        Self::new(ModifierKind::Ornament, width).with_glyph(glyph)
    }

    pub fn annotation(text: &str, width: f64) -> Self {
        Self::new(ModifierKind::Annotation(text.to_string()), width)
    }

    /// Notes drawn as a unit before the parent note, e.g. a mid-measure clef.
    pub fn note_sub_group(tickables: Vec<Tickable>) -> Self {
        Self::new(ModifierKind::NoteSubGroup(Box::new(SubGroup::new(tickables))), 0.0)
    }

    /// Grace notes keep `grace_group_spacing` from their principal note.
    pub fn grace_note_group(tickables: Vec<Tickable>) -> Self {
        Self::new(ModifierKind::GraceNoteGroup(Box::new(SubGroup::new(tickables))), 0.0)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_glyph(mut self, glyph: &str) -> Self {
        self.glyph = Some(glyph.to_string());
        self
    }

    pub fn kind(&self) -> &ModifierKind {
        &self.kind
    }

    pub fn category(&self) -> ModifierCategory {
        self.kind.category()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn glyph(&self) -> Option<&str> {
        self.glyph.as_deref()
    }

    pub fn x_shift(&self) -> f64 {
        self.x_shift
    }

    pub fn set_x_shift(&mut self, x: f64) -> &mut Self {
        self.x_shift = x;
        self
    }

    pub fn text_line(&self) -> f64 {
        self.text_line
    }

    pub fn set_text_line(&mut self, line: f64) -> &mut Self {
        self.text_line = line;
        self
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn attach(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    pub fn check_attached(&self) -> LayoutResult<usize> {
        self.index.ok_or(LayoutError::MissingAttachment { category: self.category() })
    }

    /// Width of this modifier, measuring it the first time only.
    pub fn measure(&mut self, config: &FormatterConfig) -> LayoutResult<f64> {
        if self.measured {
            return Ok(self.width);
        }
        match &mut self.kind {
            ModifierKind::NoteSubGroup(group) => {
                self.width = group.measure(config)?;
            }
            ModifierKind::GraceNoteGroup(group) => {
                self.width = group.measure(config)? + config.grace_group_spacing;
            }
            _ => {}
        }
        self.measured = true;
        Ok(self.width)
    }

    /// The embedded group, for sub-group categories.
    pub fn sub_group(&self) -> Option<&SubGroup> {
        match &self.kind {
            ModifierKind::NoteSubGroup(group) | ModifierKind::GraceNoteGroup(group) => Some(group),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_have_fixed_sides() {
        assert_eq!(ModifierCategory::Dot.shift_side(), ShiftSide::Right);
        assert_eq!(ModifierCategory::Accidental.shift_side(), ShiftSide::Left);
        assert_eq!(ModifierCategory::Annotation.shift_side(), ShiftSide::Vertical);
        assert_eq!(Modifier::dot().position(), Position::Right);
    }

    #[test]
    fn unattached_modifier_reports_its_category() {
        let m = Modifier::accidental("#", 8.0);
        assert_eq!(
            m.check_attached(),
            Err(LayoutError::MissingAttachment { category: ModifierCategory::Accidental })
        );
    }

    #[test]
    fn measure_runs_once() {
        let config = FormatterConfig::default();
        let mut m = Modifier::stroke(6.0);
        assert_eq!(m.measure(&config).unwrap(), 6.0);
        assert!(m.is_measured());
        m.width = 100.0;
        assert_eq!(m.measure(&config).unwrap(), 100.0, "measured modifier keeps its stored width");
    }

    #[test]
    fn grace_group_spacing_and_padding_follow_config() {
        let grace = || Tickable::note("8", 10.0).unwrap();
        let config = FormatterConfig { tick_padding: 3.0, grace_group_spacing: 12.0 };

        let mut group = Modifier::grace_note_group(vec![grace(), grace()]);
        assert_eq!(group.measure(&config).unwrap(), 10.0 + 3.0 + 10.0 + 12.0);
        let inner = group.sub_group().unwrap().formatter();
        assert_eq!(inner.config(), &config);

        let mut sub = Modifier::note_sub_group(vec![grace(), grace()]);
        assert_eq!(sub.measure(&config).unwrap(), 23.0, "sub-groups add no spacing");
    }
}
