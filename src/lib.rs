//! stavelayout — horizontal layout and justification for music notation.
//!
//! Voices of tickables are joined onto one shared timeline by the
//! [`Formatter`], which resolves modifier room at every tick position and
//! justifies the result to a target width. A [`Stave`] lays out its begin and
//! end decorations and draws them, together with tempo marks, section labels,
//! voltas and free text, through a [`RenderContext`].
//!
//! # Example
//! ```
//! use stavelayout::{Formatter, FormatOptions, Tickable, Voice, VoiceTime};
//!
//! let mut voice = Voice::new(VoiceTime::new(4, 4).unwrap());
//! for _ in 0..4 {
//!     voice.add_tickable(Tickable::note("q", 10.0).unwrap()).unwrap();
//! }
//! let mut voices = [voice];
//! let width = Formatter::new()
//!     .format(&mut voices, Some(200.0), &FormatOptions::default())
//!     .unwrap();
//! assert_eq!(width, 200.0);
//! ```

pub mod bounding_box;
pub mod config;
mod constants;
pub mod error;
pub mod formatter;
pub mod modifier;
pub mod modifier_context;
pub mod position;
pub mod renderer;
pub mod stave;
pub mod stave_modifier;
pub mod tables;
pub mod tickable;
pub mod voice;

pub use bounding_box::BoundingBox;
pub use config::{FormatterConfig, LayoutConfig, StaveConfig};
pub use error::{LayoutError, LayoutResult};
pub use formatter::{snapshot_to_json, FormatOptions, FormatSnapshot, Formatter, TickContext};
pub use modifier::{Modifier, ModifierCategory, ModifierKind};
pub use modifier_context::{ModifierContext, ModifierContextState};
pub use position::Position;
pub use renderer::{FontInfo, RenderContext, SvgContext, TextMeasure, TextMetrics};
pub use stave::{Stave, StaveFrame, StaveGeometry};
pub use stave_modifier::{
    LayoutMetrics, SignatureKind, StaveModifier, StaveModifierKind, StaveTempoOptions,
    TextJustification, VoltaType,
};
pub use tables::{GlyphTable, Ticks, RESOLUTION};
pub use tickable::{Tickable, TickableKind};
pub use voice::{Voice, VoiceMode, VoiceTime};

use constants::{MUSIC_FONT_FAMILY, SIGNATURE_FONT_SIZE};

/// Stave line note glyphs are drawn on when rendering a whole measure.
const NOTE_GLYPH_LINE: f64 = 2.0;

/// Format `voices` into `stave` and draw the measure to an SVG document.
///
/// The stave's begin/end decorations are laid out first so the notes are
/// justified into whatever room is left between them.
pub fn render_measure_to_svg(
    stave: &mut Stave,
    voices: &mut [Voice],
    config: &FormatterConfig,
) -> LayoutResult<String> {
    stave.format()?;
    let mut formatter = Formatter::with_config(config.clone());
    formatter.format_to_stave(voices, &*stave, &FormatOptions::default())?;

    let width = stave.x() + stave.width() + stave.x().max(0.0);
    let height = stave.bottom_line_y() + stave.y_for_line(0.0) - stave.y();
    let mut svg = SvgContext::new(width, height);
    stave.draw(&mut svg)?;

    let y = stave.y_for_line(NOTE_GLYPH_LINE);
    svg.save();
    svg.set_font(&FontInfo::new(MUSIC_FONT_FAMILY, SIGNATURE_FONT_SIZE, "normal"));
    for tickable in voices.iter().flat_map(|v| v.tickables()) {
        if let Some(glyph) = tickable.glyph() {
            svg.fill_text(glyph, tickable.x(), y);
        }
    }
    svg.restore();
    Ok(svg.build())
}

/// Format `voices` unjustified and return the layout as JSON.
pub fn layout_to_json(voices: &mut [Voice], config: &LayoutConfig) -> LayoutResult<String> {
    let mut formatter = Formatter::with_config(config.formatter.clone());
    formatter.format(voices, None, &FormatOptions::default())?;
    snapshot_to_json(&formatter.snapshot())
}
