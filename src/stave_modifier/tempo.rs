use serde::{Deserialize, Serialize};

use super::StaveModifier;
use crate::constants::*;
use crate::error::LayoutResult;
use crate::renderer::{FontInfo, RenderContext, TextMeasure};
use crate::stave::StaveGeometry;
use crate::tables::GlyphTable;

/// A tempo mark such as `Allegro (♩. = 120)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaveTempoOptions {
    pub name: Option<String>,
    pub parenthesis: bool,
    /// Duration code of the metronome note, e.g. `"q"` or `"8"`.
    pub duration: Option<String>,
    pub dots: u32,
    /// Beats per minute; free text so ranges like `"132-144"` work.
    pub bpm: Option<String>,
    /// Note on the right of `=`, replacing `bpm`.
    pub duration2: Option<String>,
    pub dots2: u32,
}

impl StaveTempoOptions {
    pub fn named(name: &str) -> Self {
        Self { name: Some(name.to_string()), ..Default::default() }
    }

    pub fn metronome(duration: &str, bpm: impl ToString) -> Self {
        Self {
            duration: Some(duration.to_string()),
            bpm: Some(bpm.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Face {
    Name,
    Text,
    Glyph,
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    face: Face,
    dy: f64,
}

impl Run {
    fn new(text: &str, face: Face) -> Self {
        Self { text: text.to_string(), face, dy: 0.0 }
    }
}

/// Components left to right: name, `(`, note glyph, dots, `=`, bpm or a
/// second note, `)`.
fn runs(options: &StaveTempoOptions, glyphs: &GlyphTable) -> LayoutResult<Vec<Run>> {
    let mut runs = Vec::new();
    if let Some(name) = options.name.as_deref().filter(|n| !n.is_empty()) {
        runs.push(Run::new(name, Face::Name));
    }

    let Some(duration) = options.duration.as_deref() else {
        return Ok(runs);
    };
    let bracketed = options.name.is_some() || options.parenthesis;
    if bracketed {
        runs.push(Run::new("(", Face::Text));
    }

    push_note(&mut runs, glyphs, duration, options.dots)?;
    runs.push(Run::new("=", Face::Text));
    if let Some(duration2) = options.duration2.as_deref() {
        push_note(&mut runs, glyphs, duration2, options.dots2)?;
    } else if let Some(bpm) = options.bpm.as_deref() {
        runs.push(Run::new(bpm, Face::Text));
    }

    if bracketed {
        runs.push(Run::new(")", Face::Text));
    }
    Ok(runs)
}

fn push_note(runs: &mut Vec<Run>, glyphs: &GlyphTable, duration: &str, dots: u32) -> LayoutResult<()> {
    runs.push(Run::new(glyphs.glyph(duration)?, Face::Glyph));
    for _ in 0..dots {
        let mut dot = Run::new(glyphs.augmentation_dot(), Face::Glyph);
        dot.dy = TEMPO_DOT_DROP;
        runs.push(dot);
    }
    Ok(())
}

fn font_for(face: Face, text_font: &FontInfo) -> FontInfo {
    match face {
        Face::Name => text_font.clone().bold(),
        Face::Text => text_font.clone(),
        Face::Glyph => FontInfo::new(MUSIC_FONT_FAMILY, TEMPO_GLYPH_SIZE, "normal"),
    }
}

/// Advance of the whole mark, spacing included.
pub(super) fn measure<M: TextMeasure + ?Sized>(
    options: &StaveTempoOptions,
    glyphs: &GlyphTable,
    font: &FontInfo,
    measure: &M,
) -> LayoutResult<f64> {
    let runs = runs(options, glyphs)?;
    let total = runs
        .iter()
        .map(|r| measure.measure_text(&r.text, &font_for(r.face, font)).width)
        .sum::<f64>();
    Ok(total + TEMPO_SPACING * runs.len().saturating_sub(1) as f64)
}

pub(super) fn draw<S>(
    m: &StaveModifier,
    options: &StaveTempoOptions,
    glyphs: &GlyphTable,
    ctx: &mut dyn RenderContext,
    stave: &S,
    shift_x: f64,
) -> LayoutResult<()>
where
    S: StaveGeometry + ?Sized,
{
    let runs = runs(options, glyphs)?;
    let y = stave.y_for_top_text(1.0) + m.y_shift();
    let mut x = stave.x() + m.x() + m.x_shift() + shift_x;

    ctx.save();
    for run in &runs {
        let font = font_for(run.face, m.font());
        ctx.set_font(&font);
        ctx.fill_text(&run.text, x, y + run.dy);
        x += ctx.measure_text(&run.text, &font).width + TEMPO_SPACING;
    }
    ctx.restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    fn texts(options: &StaveTempoOptions) -> Vec<String> {
        runs(options, &GlyphTable::metronome())
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect()
    }

    #[test]
    fn named_mark_with_metronome_is_bracketed() {
        let options = StaveTempoOptions {
            name: Some("Allegro".into()),
            dots: 1,
            ..StaveTempoOptions::metronome("q", 120)
        };
        assert_eq!(
            texts(&options),
            vec!["Allegro", "(", "\u{ECA5}", "\u{ECB7}", "=", "120", ")"]
        );
    }

    #[test]
    fn bare_metronome_and_note_equation() {
        assert_eq!(texts(&StaveTempoOptions::metronome("8", 96)), vec!["\u{ECA7}", "=", "96"]);
        let options = StaveTempoOptions {
            duration: Some("q".into()),
            duration2: Some("h".into()),
            bpm: Some("60".into()),
            ..Default::default()
        };
        assert_eq!(texts(&options), vec!["\u{ECA5}", "=", "\u{ECA3}"], "second note wins over bpm");
        assert_eq!(texts(&StaveTempoOptions::named("Largo")), vec!["Largo"]);
    }

    #[test]
    fn unknown_duration_fails() {
        let options = StaveTempoOptions::metronome("3", 60);
        let err = runs(&options, &GlyphTable::metronome()).unwrap_err();
        assert_eq!(err, LayoutError::InvalidDuration("3".into()));
    }
}
