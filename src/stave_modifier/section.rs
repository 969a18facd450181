use super::StaveModifier;
use crate::constants::*;
use crate::renderer::{FontInfo, RenderContext, TextMeasure};
use crate::stave::StaveGeometry;

pub(super) fn measure<M: TextMeasure + ?Sized>(label: &str, font: &FontInfo, measure: &M) -> f64 {
    let text_width = measure.measure_text(label, font).width;
    (text_width + 2.0 * SECTION_PADDING).max(SECTION_MIN_WIDTH)
}

/// Label with an optional box around it, baseline on top-text line 1.5.
pub(super) fn draw<S>(
    m: &StaveModifier,
    label: &str,
    draw_rect: bool,
    ctx: &mut dyn RenderContext,
    stave: &S,
    shift_x: f64,
) where
    S: StaveGeometry + ?Sized,
{
    ctx.save();
    ctx.set_line_width(SECTION_BORDER_WIDTH);
    ctx.set_font(m.font());

    let metrics = ctx.measure_text(label, m.font());
    let width = metrics.width + 2.0 * SECTION_PADDING;
    let height = metrics.height + 2.0 * SECTION_PADDING;
    let headroom = metrics.descent;

    let y = stave.y_for_top_text(SECTION_TEXT_LINE) + m.y_shift();
    let x = stave.x() + m.x() + m.x_shift() + shift_x;
    if draw_rect {
        ctx.begin_path();
        ctx.rect(x, y - height + headroom, width, height);
        ctx.stroke();
    }
    ctx.fill_text(label, x + SECTION_PADDING, y - SECTION_PADDING);
    ctx.restore();
}
