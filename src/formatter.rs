//! Cross-voice justification.
//!
//! The formatter joins simultaneous voices onto one timeline of tick
//! positions, resolves the modifier room at each position, finds the
//! narrowest layout where nothing collides, and then spreads any extra width
//! across the positions in proportion to how long each one lasts.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::config::FormatterConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::modifier_context::{ModifierContext, ModifierContextState};
use crate::stave::StaveGeometry;
use crate::tables::{ticks, ticks_to_f64, Ticks};
use crate::voice::{Voice, VoiceMode};

#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Added to every x written onto tickables.
    pub x_offset: f64,
    /// Give the last position its share of slack for the time remaining to
    /// the end of the measure. When off, the last position sits at the far
    /// end of the justified width.
    pub justify_trailing: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { x_offset: 0.0, justify_trailing: true }
    }
}

/// One tickable's address: voice index, then index within the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickMember {
    pub voice: usize,
    pub index: usize,
}

/// One shared position on the joined timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickContext {
    pub ticks: Ticks,
    /// Time until the next position, or to the end of the measure for the last.
    pub duration: Ticks,
    pub members: Vec<TickMember>,
    /// Widest member glyph.
    pub glyph_px: f64,
    pub left_px: f64,
    pub right_px: f64,
    /// Left edge of the glyph column, relative to the formatted origin.
    pub x: f64,
    pub modifiers: ModifierContextState,
}

impl TickContext {
    fn new(at: Ticks) -> Self {
        Self {
            ticks: at,
            duration: ticks(0),
            members: Vec::new(),
            glyph_px: 0.0,
            left_px: 0.0,
            right_px: 0.0,
            x: 0.0,
            modifiers: ModifierContextState::default(),
        }
    }
}

/// Serializable result of the last formatting pass, for debugging and
/// regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatSnapshot {
    pub total_ticks: Ticks,
    pub min_total_width: f64,
    pub justified_width: f64,
    pub contexts: Vec<TickContext>,
}

pub fn snapshot_to_json(snapshot: &FormatSnapshot) -> LayoutResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

#[derive(Debug, Clone)]
pub struct Formatter {
    config: FormatterConfig,
    contexts: Vec<TickContext>,
    /// Per voice, per tickable: index into `contexts`.
    placements: Vec<Vec<usize>>,
    total_ticks: Ticks,
    min_total_width: f64,
    justified_width: f64,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            contexts: Vec::new(),
            placements: Vec::new(),
            total_ticks: ticks(0),
            min_total_width: 0.0,
            justified_width: 0.0,
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Validate meters and build the ordered tick positions.
    ///
    /// Strict voices must be complete and agree on one total. Modifiers of
    /// every member at a position are formatted together.
    pub fn join_voices(&mut self, voices: &mut [Voice]) -> LayoutResult<&mut Self> {
        self.contexts.clear();
        self.placements.clear();
        self.total_ticks = ticks(0);
        self.min_total_width = 0.0;
        self.justified_width = 0.0;

        check_meters(voices)?;

        // Positions keyed by cumulative tick; values index `created`.
        let mut by_tick: BTreeMap<Ticks, usize> = BTreeMap::new();
        let mut created: Vec<TickContext> = Vec::new();
        let mut slots: Vec<Vec<usize>> = Vec::with_capacity(voices.len());

        for (vi, voice) in voices.iter().enumerate() {
            let mut used = ticks(0);
            let mut voice_slots = Vec::with_capacity(voice.tickables().len());
            for (ti, tickable) in voice.tickables().iter().enumerate() {
                let slot = *by_tick.entry(used).or_insert_with(|| {
                    created.push(TickContext::new(used));
                    created.len() - 1
                });
                let ctx = &mut created[slot];
                ctx.members.push(TickMember { voice: vi, index: ti });
                ctx.glyph_px = ctx.glyph_px.max(tickable.width());
                voice_slots.push(slot);
                if !tickable.should_ignore_ticks() {
                    used += tickable.ticks();
                }
            }
            let voice_end = match voice.mode() {
                VoiceMode::Soft => used,
                VoiceMode::Strict | VoiceMode::Full => voice.total_ticks().max(used),
            };
            self.total_ticks = self.total_ticks.max(voice_end);
            slots.push(voice_slots);
        }

        // Reorder by tick value.
        let mut rank = vec![0; created.len()];
        for (ordered, slot) in by_tick.values().enumerate() {
            rank[*slot] = ordered;
        }
        let mut ordered: Vec<Option<TickContext>> = vec![None; created.len()];
        for (slot, ctx) in created.into_iter().enumerate() {
            ordered[rank[slot]] = Some(ctx);
        }
        self.contexts = ordered.into_iter().flatten().collect();
        self.placements = slots
            .into_iter()
            .map(|voice_slots| voice_slots.into_iter().map(|s| rank[s]).collect())
            .collect();

        let count = self.contexts.len();
        for i in 0..count {
            let next = match self.contexts.get(i + 1) {
                Some(next) => next.ticks,
                None => self.total_ticks,
            };
            let ctx = &mut self.contexts[i];
            ctx.duration = (next - ctx.ticks).max(ticks(0));
        }

        self.format_modifiers(voices)?;

        debug!(
            "joined {} voice(s) into {} tick position(s) over {} ticks",
            voices.len(),
            self.contexts.len(),
            self.total_ticks
        );
        Ok(self)
    }

    fn format_modifiers(&mut self, voices: &mut [Voice]) -> LayoutResult<()> {
        let mut groups: Vec<ModifierContext> =
            (0..self.contexts.len()).map(|_| ModifierContext::new()).collect();

        for (voice, voice_slots) in voices.iter_mut().zip(&self.placements) {
            for (tickable, &pos) in voice.tickables_mut().iter_mut().zip(voice_slots) {
                for modifier in tickable.modifiers_mut().iter_mut() {
                    groups[pos].add_member(modifier);
                }
            }
        }

        for (ctx, mut group) in self.contexts.iter_mut().zip(groups) {
            group.pre_format(&self.config)?;
            let state = group.into_state();
            ctx.left_px = state.left_shift;
            ctx.right_px = state.right_shift;
            ctx.modifiers = state;
        }
        Ok(())
    }

    /// Minimum left-edge distance from each position to the next.
    fn minimal_gaps(&self) -> Vec<f64> {
        self.contexts
            .windows(2)
            .map(|pair| pair[0].glyph_px + pair[0].right_px + pair[1].left_px + self.config.tick_padding)
            .collect()
    }

    fn minimal_width(&self, gaps: &[f64]) -> f64 {
        match (self.contexts.first(), self.contexts.last()) {
            (Some(first), Some(last)) => {
                first.left_px + gaps.iter().sum::<f64>() + last.glyph_px + last.right_px
            }
            _ => 0.0,
        }
    }

    /// Join `voices` and return the narrowest collision-free width without
    /// placing anything.
    pub fn pre_calculate_min_total_width(&mut self, voices: &mut [Voice]) -> LayoutResult<f64> {
        self.join_voices(voices)?;
        let gaps = self.minimal_gaps();
        self.min_total_width = self.minimal_width(&gaps);
        Ok(self.min_total_width)
    }

    /// Join, compute the minimal width, justify to `justify_width` if it is
    /// wider, and write x onto every tickable. Returns the final width.
    pub fn format(
        &mut self,
        voices: &mut [Voice],
        justify_width: Option<f64>,
        options: &FormatOptions,
    ) -> LayoutResult<f64> {
        self.join_voices(voices)?;
        if self.contexts.is_empty() {
            return Ok(0.0);
        }

        let gaps = self.minimal_gaps();
        let min_width = self.minimal_width(&gaps);
        self.min_total_width = min_width;

        let target = match justify_width {
            Some(w) if w < min_width => {
                warn!("justify width {w:.1} is below the minimum {min_width:.1}; layout overflows");
                min_width
            }
            Some(w) => w,
            None => min_width,
        };
        let extra = self.distribute_slack(target - min_width, options);

        let mut x = self.contexts[0].left_px;
        let last = self.contexts.len() - 1;
        for i in 0..=last {
            self.contexts[i].x = x;
            if i < last {
                x += gaps[i] + extra[i];
            }
        }
        let tail = &self.contexts[last];
        self.justified_width = x + tail.glyph_px + tail.right_px + extra[last];

        for (voice, voice_slots) in voices.iter_mut().zip(&self.placements) {
            for (tickable, &pos) in voice.tickables_mut().iter_mut().zip(voice_slots) {
                let ctx = &self.contexts[pos];
                tickable.place(options.x_offset + ctx.x, ctx.left_px, ctx.right_px);
            }
        }

        debug!(
            "formatted {} position(s): min width {:.1}, justified {:.1}",
            self.contexts.len(),
            self.min_total_width,
            self.justified_width
        );
        Ok(self.justified_width)
    }

    /// Share of `slack` after each position, weighted by duration.
    fn distribute_slack(&self, slack: f64, options: &FormatOptions) -> Vec<f64> {
        let count = self.contexts.len();
        if slack <= 0.0 {
            return vec![0.0; count];
        }

        let mut weights: Vec<f64> = self.contexts.iter().map(|c| ticks_to_f64(c.duration)).collect();
        if !options.justify_trailing && count > 1 {
            weights[count - 1] = 0.0;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Nothing has duration; spread evenly.
            let slots = if options.justify_trailing || count == 1 { count } else { count - 1 };
            return (0..count)
                .map(|i| if i < slots { slack / slots as f64 } else { 0.0 })
                .collect();
        }
        weights.iter().map(|w| slack * w / total).collect()
    }

    /// Justify to the stave's note area and offset x by its start.
    pub fn format_to_stave<S>(
        &mut self,
        voices: &mut [Voice],
        stave: &S,
        options: &FormatOptions,
    ) -> LayoutResult<f64>
    where
        S: StaveGeometry + ?Sized,
    {
        let width = stave.note_end_x() - stave.note_start_x();
        let options = FormatOptions { x_offset: stave.note_start_x(), ..options.clone() };
        self.format(voices, Some(width), &options)
    }

    pub fn min_total_width(&self) -> f64 {
        self.min_total_width
    }

    pub fn justified_width(&self) -> f64 {
        self.justified_width
    }

    pub fn total_ticks(&self) -> Ticks {
        self.total_ticks
    }

    pub fn tick_contexts(&self) -> &[TickContext] {
        &self.contexts
    }

    pub fn snapshot(&self) -> FormatSnapshot {
        FormatSnapshot {
            total_ticks: self.total_ticks,
            min_total_width: self.min_total_width,
            justified_width: self.justified_width,
            contexts: self.contexts.clone(),
        }
    }
}

fn check_meters(voices: &[Voice]) -> LayoutResult<()> {
    let mut expected: Option<Ticks> = None;
    for (i, voice) in voices.iter().enumerate() {
        match voice.mode() {
            VoiceMode::Soft => continue,
            VoiceMode::Full => {
                if voice.ticks_used() > voice.total_ticks() {
                    return Err(LayoutError::TooManyTicks {
                        limit: voice.total_ticks(),
                        attempted: voice.ticks_used(),
                    });
                }
                continue;
            }
            VoiceMode::Strict => {}
        }
        if !voice.is_complete() {
            return Err(LayoutError::MeterMismatch {
                voice: voice.describe(i),
                expected: voice.total_ticks(),
                actual: voice.ticks_used(),
            });
        }
        match expected {
            None => expected = Some(voice.total_ticks()),
            Some(total) if total != voice.total_ticks() => {
                return Err(LayoutError::MeterMismatch {
                    voice: voice.describe(i),
                    expected: total,
                    actual: voice.total_ticks(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::Modifier;
    use crate::tables::RESOLUTION;
    use crate::tickable::Tickable;
    use crate::voice::VoiceTime;

    fn quarters(n: usize, width: f64) -> Vec<Tickable> {
        (0..n).map(|_| Tickable::note("q", width).unwrap()).collect()
    }

    fn strict(tickables: Vec<Tickable>) -> Voice {
        let mut voice = Voice::new(VoiceTime::default());
        voice.add_tickables(tickables).unwrap();
        voice
    }

    #[test]
    fn empty_voice_list_formats_to_zero() {
        let mut f = Formatter::new();
        assert_eq!(f.format(&mut [], Some(100.0), &FormatOptions::default()), Ok(0.0));
        assert!(f.tick_contexts().is_empty());
    }

    #[test]
    fn minimal_width_sums_glyphs_and_padding() {
        let mut voices = [strict(quarters(4, 10.0))];
        let mut f = Formatter::new();
        let width = f.format(&mut voices, None, &FormatOptions::default()).unwrap();
        // Four 10px glyphs and three 1px paddings.
        assert_eq!(width, 43.0);
        assert_eq!(f.min_total_width(), 43.0);
        let xs: Vec<f64> = voices[0].tickables().iter().map(Tickable::x).collect();
        assert_eq!(xs, vec![0.0, 11.0, 22.0, 33.0]);
    }

    #[test]
    fn slack_follows_duration() {
        let mut tickables = vec![Tickable::note("h", 10.0).unwrap()];
        tickables.extend(quarters(2, 10.0));
        let mut voices = [strict(tickables)];
        let mut f = Formatter::new();
        let width = f.format(&mut voices, Some(122.0), &FormatOptions::default()).unwrap();
        assert_eq!(width, 122.0);
        // 90px of slack over durations 2:1:1.
        let xs: Vec<f64> = voices[0].tickables().iter().map(Tickable::x).collect();
        assert_eq!(xs, vec![0.0, 56.0, 89.5]);
    }

    #[test]
    fn trailing_slack_can_be_withheld() {
        let mut voices = [strict(quarters(4, 10.0))];
        let mut f = Formatter::new();
        let options = FormatOptions { justify_trailing: false, ..Default::default() };
        f.format(&mut voices, Some(103.0), &options).unwrap();
        let last = voices[0].tickables()[3].x();
        assert_eq!(last, 93.0, "last glyph ends flush with the target width");
    }

    #[test]
    fn narrow_target_keeps_minimum() {
        let mut voices = [strict(quarters(4, 10.0))];
        let mut f = Formatter::new();
        let width = f.format(&mut voices, Some(5.0), &FormatOptions::default()).unwrap();
        assert_eq!(width, 43.0);
    }

    #[test]
    fn modifiers_widen_their_position() {
        let mut tickables = quarters(4, 10.0);
        tickables[1].add_modifier(Modifier::accidental("#", 8.0), 0);
        tickables[1].add_modifier(Modifier::dot(), 0);
        let mut voices = [strict(tickables)];
        let mut f = Formatter::new();
        f.format(&mut voices, None, &FormatOptions::default()).unwrap();

        let ctx = &f.tick_contexts()[1];
        assert_eq!((ctx.left_px, ctx.right_px), (8.0, 5.0));
        let second = &voices[0].tickables()[1];
        assert_eq!(second.x(), 19.0);
        assert_eq!(second.total_width().unwrap(), 23.0);
        assert_eq!(f.min_total_width(), 56.0);
    }

    #[test]
    fn incomplete_strict_voice_is_rejected() {
        let mut voices = [Voice::soft(VoiceTime::default(), quarters(3, 10.0))];
        voices[0].set_strict(true);
        let err = Formatter::new().join_voices(&mut voices).map(|_| ()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MeterMismatch {
                voice: "#0".into(),
                expected: ticks(RESOLUTION),
                actual: ticks(3 * RESOLUTION / 4),
            }
        );
    }

    #[test]
    fn snapshot_serializes_contexts() {
        let mut voices = [strict(quarters(4, 10.0))];
        let mut f = Formatter::new();
        f.format(&mut voices, None, &FormatOptions::default()).unwrap();
        let json = snapshot_to_json(&f.snapshot()).unwrap();
        assert!(json.contains("\"min_total_width\": 43.0"), "got {json}");
        assert!(json.contains("\"members\""));
    }
}
