//! Tickables: elements that occupy time on a voice and receive an x offset
//! from the formatter.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::modifier::Modifier;
use crate::tables::{parse_note_duration, ticks, Ticks};

/// Explicit kind tag; layout code switches on this instead of downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickableKind {
    Note,
    Rest,
    /// Occupies time but draws nothing.
    GhostNote,
    BarNote,
    ClefNote,
    KeySigNote,
    TimeSigNote,
    TextNote,
    GlyphNote,
}

impl TickableKind {
    /// Kinds that sit between notes without consuming time.
    pub fn ignores_ticks_by_default(&self) -> bool {
        matches!(
            self,
            TickableKind::BarNote | TickableKind::KeySigNote | TickableKind::TimeSigNote
        )
    }
}

#[derive(Debug, Clone)]
pub struct Tickable {
    id: Option<String>,
    kind: TickableKind,
    ticks: Ticks,
    intrinsic_ticks: Ticks,
    tick_multiplier: Ticks,
    width: f64,
    glyph: Option<String>,
    modifiers: Vec<Modifier>,
    ignore_ticks: bool,
    x: f64,
    x_shift: f64,
    modifier_left_px: f64,
    modifier_right_px: f64,
    pre_formatted: bool,
}

impl Tickable {
    pub fn new(kind: TickableKind, ticks: Ticks, width: f64) -> Self {
        Self {
            id: None,
            kind,
            ticks,
            intrinsic_ticks: ticks,
            tick_multiplier: Ticks::from_integer(1),
            width,
            glyph: None,
            modifiers: Vec::new(),
            ignore_ticks: kind.ignores_ticks_by_default(),
            x: 0.0,
            x_shift: 0.0,
            modifier_left_px: 0.0,
            modifier_right_px: 0.0,
            pre_formatted: false,
        }
    }

    /// A note or rest from a duration string such as `"q"`, `"8d"` or `"hr"`.
    pub fn from_duration(duration: &str, width: f64) -> LayoutResult<Self> {
        let parsed = parse_note_duration(duration)?;
        let kind = if parsed.is_rest() { TickableKind::Rest } else { TickableKind::Note };
        Ok(Self::new(kind, parsed.ticks, width))
    }

    pub fn note(duration: &str, width: f64) -> LayoutResult<Self> {
        let mut t = Self::from_duration(duration, width)?;
        t.kind = TickableKind::Note;
        Ok(t)
    }

    pub fn rest(duration: &str, width: f64) -> LayoutResult<Self> {
        let mut t = Self::from_duration(duration, width)?;
        t.kind = TickableKind::Rest;
        Ok(t)
    }

    pub fn ghost(duration: &str) -> LayoutResult<Self> {
        let mut t = Self::from_duration(duration, 0.0)?;
        t.kind = TickableKind::GhostNote;
        Ok(t)
    }

    /// Zero-duration placeholders: bar lines and mid-measure clef, key or
    /// time changes.
    pub fn placeholder(kind: TickableKind, width: f64) -> Self {
        let mut t = Self::new(kind, ticks(0), width);
        t.ignore_ticks = true;
        t
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_glyph(mut self, glyph: &str) -> Self {
        self.glyph = Some(glyph.to_string());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier, index: usize) -> Self {
        self.add_modifier(modifier, index);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> TickableKind {
        self.kind
    }

    pub fn glyph(&self) -> Option<&str> {
        self.glyph.as_deref()
    }

    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    pub fn intrinsic_ticks(&self) -> Ticks {
        self.intrinsic_ticks
    }

    pub fn tick_multiplier(&self) -> Ticks {
        self.tick_multiplier
    }

    /// Scale the duration, e.g. `(2, 3)` for a triplet.
    pub fn apply_tick_multiplier(&mut self, numerator: i64, denominator: i64) -> &mut Self {
        self.tick_multiplier *= Ticks::new(numerator, denominator);
        self.ticks = self.intrinsic_ticks * self.tick_multiplier;
        self
    }

    /// Place this tickable in an `n`-in-the-time-of-`occupied` tuplet.
    pub fn set_tuplet(&mut self, num_notes: i64, notes_occupied: i64) -> &mut Self {
        self.tick_multiplier = Ticks::from_integer(1);
        self.apply_tick_multiplier(notes_occupied, num_notes)
    }

    pub fn should_ignore_ticks(&self) -> bool {
        self.ignore_ticks
    }

    pub fn set_ignore_ticks(&mut self, flag: bool) -> &mut Self {
        self.ignore_ticks = flag;
        self
    }

    /// Glyph width, excluding modifiers.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self.pre_formatted = false;
        self
    }

    /// Glyph width plus the modifier room of its tick position. Only known
    /// after formatting.
    pub fn total_width(&self) -> LayoutResult<f64> {
        if !self.pre_formatted {
            return Err(LayoutError::Unformatted(self.describe()));
        }
        Ok(self.width + self.modifier_left_px + self.modifier_right_px)
    }

    pub fn add_modifier(&mut self, mut modifier: Modifier, index: usize) -> &mut Self {
        modifier.attach(index);
        self.modifiers.push(modifier);
        self.pre_formatted = false;
        self
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut [Modifier] {
        &mut self.modifiers
    }

    /// Formatted x of the tick position this tickable sits on.
    pub fn x(&self) -> f64 {
        self.x + self.x_shift
    }

    pub fn absolute_x(&self) -> f64 {
        self.x
    }

    pub fn x_shift(&self) -> f64 {
        self.x_shift
    }

    pub fn set_x_shift(&mut self, x: f64) -> &mut Self {
        self.x_shift = x;
        self
    }

    pub fn modifier_left_px(&self) -> f64 {
        self.modifier_left_px
    }

    pub fn modifier_right_px(&self) -> f64 {
        self.modifier_right_px
    }

    pub fn is_pre_formatted(&self) -> bool {
        self.pre_formatted
    }

    /// Written by the formatter once the tick position is placed.
    pub(crate) fn place(&mut self, x: f64, left_px: f64, right_px: f64) {
        self.x = x;
        self.modifier_left_px = left_px;
        self.modifier_right_px = right_px;
        self.pre_formatted = true;
    }

    pub(crate) fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("{:?} '{}'", self.kind, id),
            None => format!("{:?}", self.kind),
        }
    }
}
