use serde::{Deserialize, Serialize};

use super::{StaveModifier, StaveModifierCategory};
use crate::renderer::RenderContext;
use crate::stave::StaveGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureKind {
    Clef,
    KeySignature,
    TimeSignature,
}

impl SignatureKind {
    pub fn category(&self) -> StaveModifierCategory {
        match self {
            SignatureKind::Clef => StaveModifierCategory::Clef,
            SignatureKind::KeySignature => StaveModifierCategory::KeySignature,
            SignatureKind::TimeSignature => StaveModifierCategory::TimeSignature,
        }
    }
}

/// Glyphs sit at the x stave layout assigned, on the given line.
pub(super) fn draw<S>(m: &StaveModifier, glyph: &str, line: f64, ctx: &mut dyn RenderContext, stave: &S)
where
    S: StaveGeometry + ?Sized,
{
    ctx.save();
    ctx.set_font(m.font());
    ctx.fill_text(glyph, m.x() + m.x_shift(), stave.y_for_line(line) + m.y_shift());
    ctx.restore();
}
