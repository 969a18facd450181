//! Voices: one musical line's tickables, bound to a meter.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::tables::{meter_ticks, ticks, Ticks, RESOLUTION};
use crate::tickable::Tickable;

/// A validated meter. Construction fails on a zero beat value or a
/// non-positive resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceTime {
    num_beats: u32,
    beat_value: u32,
    resolution: i64,
    #[serde(skip)]
    total: Ticks,
}

impl VoiceTime {
    pub fn new(num_beats: u32, beat_value: u32) -> LayoutResult<Self> {
        Self::with_resolution(num_beats, beat_value, RESOLUTION)
    }

    pub fn with_resolution(num_beats: u32, beat_value: u32, resolution: i64) -> LayoutResult<Self> {
        let total = meter_ticks(num_beats, beat_value, resolution)?;
        Ok(Self { num_beats, beat_value, resolution, total })
    }

    pub fn num_beats(&self) -> u32 {
        self.num_beats
    }

    pub fn beat_value(&self) -> u32 {
        self.beat_value
    }

    pub fn resolution(&self) -> i64 {
        self.resolution
    }

    pub fn total_ticks(&self) -> Ticks {
        self.total
    }
}

impl Default for VoiceTime {
    fn default() -> Self {
        Self { num_beats: 4, beat_value: 4, resolution: RESOLUTION, total: ticks(RESOLUTION) }
    }
}

/// How strictly a voice's tick total is checked against its meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceMode {
    /// Must fill the meter exactly.
    Strict,
    /// Any total.
    Soft,
    /// May fall short but never exceed the meter.
    Full,
}

#[derive(Debug, Clone)]
pub struct Voice {
    id: Option<String>,
    time: VoiceTime,
    mode: VoiceMode,
    tickables: Vec<Tickable>,
    ticks_used: Ticks,
}

impl Voice {
    pub fn new(time: VoiceTime) -> Self {
        Self {
            id: None,
            time,
            mode: VoiceMode::Strict,
            tickables: Vec::new(),
            ticks_used: ticks(0),
        }
    }

    /// A non-strict voice built in one go; cannot fail.
    pub fn soft(time: VoiceTime, tickables: Vec<Tickable>) -> Self {
        let mut voice = Self::new(time);
        voice.mode = VoiceMode::Soft;
        for t in tickables {
            voice.push(t);
        }
        voice
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_mode(mut self, mode: VoiceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn time(&self) -> VoiceTime {
        self.time
    }

    pub fn mode(&self) -> VoiceMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: VoiceMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// `false` switches to `Soft`, bypassing the meter check.
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.mode = if strict { VoiceMode::Strict } else { VoiceMode::Soft };
        self
    }

    pub fn is_strict(&self) -> bool {
        self.mode == VoiceMode::Strict
    }

    pub fn total_ticks(&self) -> Ticks {
        self.time.total_ticks()
    }

    pub fn ticks_used(&self) -> Ticks {
        self.ticks_used
    }

    pub fn is_complete(&self) -> bool {
        match self.mode {
            VoiceMode::Strict | VoiceMode::Full => self.ticks_used == self.total_ticks(),
            VoiceMode::Soft => true,
        }
    }

    /// Append a tickable. Strict and full voices refuse to overflow the meter.
    pub fn add_tickable(&mut self, tickable: Tickable) -> LayoutResult<&mut Self> {
        if !tickable.should_ignore_ticks() && self.mode != VoiceMode::Soft {
            let attempted = self.ticks_used + tickable.ticks();
            if attempted > self.total_ticks() {
                return Err(LayoutError::TooManyTicks {
                    limit: self.total_ticks(),
                    attempted,
                });
            }
        }
        self.push(tickable);
        Ok(self)
    }

    pub fn add_tickables<I>(&mut self, tickables: I) -> LayoutResult<&mut Self>
    where
        I: IntoIterator<Item = Tickable>,
    {
        for t in tickables {
            self.add_tickable(t)?;
        }
        Ok(self)
    }

    fn push(&mut self, tickable: Tickable) {
        if !tickable.should_ignore_ticks() {
            self.ticks_used += tickable.ticks();
        }
        self.tickables.push(tickable);
    }

    pub fn tickables(&self) -> &[Tickable] {
        &self.tickables
    }

    pub fn tickables_mut(&mut self) -> &mut [Tickable] {
        &mut self.tickables
    }

    /// Widest tickable glyph, for callers sizing a voice before formatting.
    pub fn largest_tickable_width(&self) -> f64 {
        self.tickables.iter().map(Tickable::width).fold(0.0, f64::max)
    }

    pub(crate) fn describe(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("'{id}'"),
            None => format!("#{index}"),
        }
    }
}
