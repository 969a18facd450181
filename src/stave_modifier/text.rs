use serde::{Deserialize, Serialize};

use super::StaveModifier;
use crate::constants::*;
use crate::position::Position;
use crate::renderer::RenderContext;
use crate::stave::StaveGeometry;

/// Horizontal alignment of ABOVE/BELOW text over the stave width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextJustification {
    Left,
    #[default]
    Center,
    Right,
}

/// Caller has already checked the position is one of LEFT, RIGHT, ABOVE
/// or BELOW.
pub(super) fn draw<S>(
    m: &StaveModifier,
    text: &str,
    justification: TextJustification,
    ctx: &mut dyn RenderContext,
    stave: &S,
) where
    S: StaveGeometry + ?Sized,
{
    ctx.save();
    ctx.set_line_width(TEXT_LINE_WIDTH);
    ctx.set_font(m.font());
    let text_width = ctx.measure_text(text, m.font()).width;
    let origin = stave.x() + m.x() + m.x_shift();

    let (x, y) = match m.position() {
        Position::Left | Position::Right => {
            let y = (stave.y_for_line(0.0) + stave.bottom_line_y()) / 2.0;
            let x = if m.position() == Position::Left {
                origin - text_width - TEXT_LATERAL_GAP
            } else {
                origin + stave.width() + TEXT_LATERAL_GAP
            };
            (x, y)
        }
        _ => {
            let x = match justification {
                TextJustification::Left => origin,
                TextJustification::Center => origin + stave.width() / 2.0 - text_width / 2.0,
                TextJustification::Right => origin + stave.width() - text_width,
            };
            let y = if m.position() == Position::Above {
                stave.y_for_top_text(TEXT_ABOVE_LINE)
            } else {
                stave.y_for_bottom_text(TEXT_BELOW_LINE)
            };
            (x, y)
        }
    };

    ctx.fill_text(text, x, y + m.y_shift() + TEXT_BASELINE_SHIFT);
    ctx.restore();
}
