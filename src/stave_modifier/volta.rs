use serde::{Deserialize, Serialize};

use super::StaveModifier;
use crate::constants::*;
use crate::error::LayoutError;
use crate::renderer::RenderContext;
use crate::stave::StaveGeometry;

/// Repeat-ending bracket shapes. `None` draws the bar alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoltaType {
    None = 1,
    Begin = 2,
    Mid = 3,
    End = 4,
    BeginEnd = 5,
}

impl VoltaType {
    fn has_label(&self) -> bool {
        matches!(self, VoltaType::Begin | VoltaType::BeginEnd)
    }
}

impl TryFrom<i32> for VoltaType {
    type Error = LayoutError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoltaType::None),
            2 => Ok(VoltaType::Begin),
            3 => Ok(VoltaType::Mid),
            4 => Ok(VoltaType::End),
            5 => Ok(VoltaType::BeginEnd),
            other => Err(LayoutError::InvalidVoltaType(other)),
        }
    }
}

pub(super) fn draw<S>(
    m: &StaveModifier,
    volta: VoltaType,
    label: &str,
    ctx: &mut dyn RenderContext,
    stave: &S,
    shift_x: f64,
) where
    S: StaveGeometry + ?Sized,
{
    let x = stave.x() + m.x() + shift_x;
    let top_y = stave.y_for_top_text(stave.num_lines() as f64) + m.y_shift();
    let hook = VOLTA_HOOK_SPACES * stave.spacing_between_lines();
    let mut width = stave.width() - shift_x;

    match volta {
        VoltaType::Begin => ctx.fill_rect(x, top_y, VOLTA_MARK_WIDTH, hook),
        VoltaType::End => {
            width -= VOLTA_END_INSET;
            ctx.fill_rect(x + width, top_y, VOLTA_MARK_WIDTH, hook);
        }
        VoltaType::BeginEnd => {
            width -= VOLTA_BEGIN_END_INSET;
            ctx.fill_rect(x, top_y, VOLTA_MARK_WIDTH, hook);
            ctx.fill_rect(x + width, top_y, VOLTA_MARK_WIDTH, hook);
        }
        VoltaType::None | VoltaType::Mid => {}
    }

    if volta.has_label() {
        ctx.save();
        ctx.set_font(m.font());
        ctx.fill_text(label, x + VOLTA_LABEL_X, top_y + VOLTA_LABEL_Y);
        ctx.restore();
    }

    ctx.fill_rect(x, top_y, width, VOLTA_BAR_HEIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_map_to_types() {
        assert_eq!(VoltaType::try_from(5), Ok(VoltaType::BeginEnd));
        assert_eq!(VoltaType::try_from(1), Ok(VoltaType::None));
        assert_eq!(VoltaType::try_from(0), Err(LayoutError::InvalidVoltaType(0)));
        assert_eq!(VoltaType::try_from(6), Err(LayoutError::InvalidVoltaType(6)));
    }
}
