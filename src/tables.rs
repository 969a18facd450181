//! Tick resolution, duration codes, and duration → glyph lookup.

use std::collections::BTreeMap;

use num_rational::Rational64;

use crate::error::{LayoutError, LayoutResult};

/// Exact tick count. Tuplets scale durations by rational factors, so ticks
/// are kept as fractions and compared exactly.
pub type Ticks = Rational64;

/// Ticks per whole note. A quarter note is `RESOLUTION / 4`.
pub const RESOLUTION: i64 = 16384;

/// Duration codes in their canonical (numeric) spelling.
const DURATIONS: &[(&str, i64)] = &[
    ("1/2", RESOLUTION * 2),
    ("1", RESOLUTION),
    ("2", RESOLUTION / 2),
    ("4", RESOLUTION / 4),
    ("8", RESOLUTION / 8),
    ("16", RESOLUTION / 16),
    ("32", RESOLUTION / 32),
    ("64", RESOLUTION / 64),
    ("128", RESOLUTION / 128),
    ("256", RESOLUTION / 256),
];

/// `b` is the duration bar-like tickables are created with; they ignore ticks.
const DURATION_ALIASES: &[(&str, &str)] = &[("w", "1"), ("h", "2"), ("q", "4"), ("b", "256")];

pub fn ticks(n: i64) -> Ticks {
    Ticks::from_integer(n)
}

/// Lossy conversion for proportional spacing.
pub fn ticks_to_f64(t: Ticks) -> f64 {
    *t.numer() as f64 / *t.denom() as f64
}

/// Resolve aliases (`q` → `4`) and reject unknown codes.
pub fn sanitize_duration(code: &str) -> LayoutResult<&'static str> {
    let code = DURATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == code)
        .map_or(code, |(_, canonical)| *canonical);

    DURATIONS
        .iter()
        .find(|(name, _)| *name == code)
        .map(|(name, _)| *name)
        .ok_or_else(|| LayoutError::InvalidDuration(code.to_string()))
}

/// Undotted tick count of a duration code.
pub fn duration_to_ticks(code: &str) -> LayoutResult<Ticks> {
    let canonical = sanitize_duration(code)?;
    DURATIONS
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, t)| ticks(*t))
        .ok_or_else(|| LayoutError::InvalidDuration(code.to_string()))
}

/// Ticks of `ticks_per_beat`-style meter: `num_beats` beats of `1/beat_value`.
/// A zero beat value or non-positive resolution is rejected.
pub fn meter_ticks(num_beats: u32, beat_value: u32, resolution: i64) -> LayoutResult<Ticks> {
    if beat_value == 0 || resolution <= 0 {
        return Err(LayoutError::InvalidMeter { num_beats, beat_value, resolution });
    }
    Ok(Ticks::new(num_beats as i64 * resolution, beat_value as i64))
}

/// A parsed note duration string such as `"8dr"` (dotted eighth rest).
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDuration {
    pub duration: &'static str,
    pub dots: u32,
    /// Note type suffix: `n`, `r`, `h`, `m` or `s`.
    pub note_type: char,
    pub ticks: Ticks,
}

impl NoteDuration {
    pub fn is_rest(&self) -> bool {
        self.note_type == 'r'
    }
}

pub fn parse_note_duration(text: &str) -> LayoutResult<NoteDuration> {
    let invalid = || LayoutError::InvalidDuration(text.to_string());
    let mut chars = text.char_indices().peekable();

    let base_end = match chars.peek() {
        Some((_, c)) if c.is_ascii_digit() || *c == '/' => {
            let mut end = 0;
            while let Some((i, c)) = chars.peek() {
                if c.is_ascii_digit() || *c == '/' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            end
        }
        Some((_, c)) if c.is_ascii_lowercase() => {
            let (i, c) = chars.next().ok_or_else(invalid)?;
            i + c.len_utf8()
        }
        _ => return Err(invalid()),
    };

    let mut dots = 0;
    while let Some((_, 'd')) = chars.peek() {
        dots += 1;
        chars.next();
    }

    let note_type = match chars.next() {
        None => 'n',
        Some((_, c)) if "nrhms".contains(c) => c,
        Some(_) => return Err(invalid()),
    };
    if chars.next().is_some() {
        return Err(invalid());
    }

    let duration = sanitize_duration(&text[..base_end])?;
    let base = duration_to_ticks(duration)?;
    let mut total = base;
    let mut part = base;
    for _ in 0..dots {
        part /= 2;
        total += part;
    }

    Ok(NoteDuration { duration, dots, note_type, ticks: total })
}

// ═══════════════════════════════════════════════════════════════════════
// Glyph lookup
// ═══════════════════════════════════════════════════════════════════════

/// Immutable duration-code → glyph mapping. Passed to whatever draws
/// duration glyphs, so callers can substitute their own font's codes.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTable {
    glyphs: BTreeMap<String, String>,
    augmentation_dot: String,
}

impl GlyphTable {
    pub fn new(augmentation_dot: impl Into<String>) -> Self {
        Self { glyphs: BTreeMap::new(), augmentation_dot: augmentation_dot.into() }
    }

    /// SMuFL metronome-mark note glyphs.
    pub fn metronome() -> Self {
        let entries: &[(&[&str], char)] = &[
            (&["1/4", "long"], '\u{ECA1}'),
            (&["1/2", "breve"], '\u{ECA0}'),
            (&["1", "whole", "w"], '\u{ECA2}'),
            (&["2", "half", "h"], '\u{ECA3}'),
            (&["4", "quarter", "q"], '\u{ECA5}'),
            (&["8", "eighth"], '\u{ECA7}'),
            (&["16", "16th"], '\u{ECA9}'),
            (&["32", "32nd"], '\u{ECAB}'),
            (&["64", "64th"], '\u{ECAD}'),
            (&["128", "128th"], '\u{ECAF}'),
            (&["256", "256th"], '\u{ECB1}'),
            (&["512", "512th"], '\u{ECB3}'),
            (&["1024", "1024th"], '\u{ECB5}'),
        ];

        let mut table = GlyphTable::new('\u{ECB7}');
        for (codes, glyph) in entries {
            for code in *codes {
                table.glyphs.insert((*code).to_string(), glyph.to_string());
            }
        }
        table
    }

    pub fn with_glyph(mut self, code: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.glyphs.insert(code.into(), glyph.into());
        self
    }

    pub fn glyph(&self, code: &str) -> LayoutResult<&str> {
        self.glyphs
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| LayoutError::InvalidDuration(code.to_string()))
    }

    pub fn augmentation_dot(&self) -> &str {
        &self.augmentation_dot
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::metronome()
    }
}
