//! Per-instant modifier space resolution.
//!
//! Every modifier attached to any tickable sharing one tick position, across
//! all joined voices, goes through one `ModifierContext`. Each category is
//! formatted as a group and its summed width added to the left or right
//! shift, so nothing at that instant overlaps.

use std::collections::BTreeMap;

use log::trace;
use serde::Serialize;

use crate::config::FormatterConfig;
use crate::error::LayoutResult;
use crate::modifier::{Modifier, ModifierCategory, ShiftSide};

/// Accumulated room needed at one tick position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModifierContextState {
    pub left_shift: f64,
    pub right_shift: f64,
    pub text_line: f64,
    pub per_category_width: BTreeMap<ModifierCategory, f64>,
}

/// Format one category's group into `state`.
///
/// Returns `Ok(false)` for an empty group and leaves `state` untouched.
/// Formatting the same category again replaces its earlier contribution.
/// Embedded note groups are measured with `config`.
pub fn format(
    category: ModifierCategory,
    group: &mut [&mut Modifier],
    state: &mut ModifierContextState,
    config: &FormatterConfig,
) -> LayoutResult<bool> {
    if group.is_empty() {
        return Ok(false);
    }

    let side = category.shift_side();
    let previous = state.per_category_width.get(&category).copied().unwrap_or(0.0);
    let base = match side {
        ShiftSide::Left => state.left_shift - previous,
        ShiftSide::Right => state.right_shift - previous,
        ShiftSide::Vertical => state.text_line - previous,
    };

    let mut total = 0.0;
    for modifier in group.iter_mut() {
        modifier.check_attached()?;
        let width = modifier.measure(config)?;
        match side {
            ShiftSide::Left | ShiftSide::Right => {
                modifier.set_x_shift(base + total);
                total += width;
            }
            ShiftSide::Vertical => {
                modifier.set_text_line(base + total);
                total += 1.0;
            }
        }
    }

    match side {
        ShiftSide::Left => state.left_shift = base + total,
        ShiftSide::Right => state.right_shift = base + total,
        ShiftSide::Vertical => state.text_line = base + total,
    }
    state.per_category_width.insert(category, total);
    trace!("{:?}: {} modifier(s), {:.1} on {:?}", category, group.len(), total, side);
    Ok(true)
}

pub struct ModifierContext<'a> {
    members: BTreeMap<ModifierCategory, Vec<&'a mut Modifier>>,
    state: ModifierContextState,
    pre_formatted: bool,
}

impl<'a> ModifierContext<'a> {
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            state: ModifierContextState::default(),
            pre_formatted: false,
        }
    }

    pub fn add_member(&mut self, modifier: &'a mut Modifier) -> &mut Self {
        self.members.entry(modifier.category()).or_default().push(modifier);
        self.pre_formatted = false;
        self
    }

    pub fn members(&self, category: ModifierCategory) -> usize {
        self.members.get(&category).map_or(0, Vec::len)
    }

    /// Format every category in order. Runs once; later calls are no-ops.
    pub fn pre_format(&mut self, config: &FormatterConfig) -> LayoutResult<()> {
        if self.pre_formatted {
            return Ok(());
        }
        for category in ModifierCategory::FORMAT_ORDER {
            if let Some(group) = self.members.get_mut(&category) {
                format(category, group, &mut self.state, config)?;
            }
        }
        self.pre_formatted = true;
        Ok(())
    }

    pub fn state(&self) -> &ModifierContextState {
        &self.state
    }

    pub fn width(&self) -> f64 {
        self.state.left_shift + self.state.right_shift
    }

    pub fn into_state(self) -> ModifierContextState {
        self.state
    }
}

impl Default for ModifierContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::position::Position;

    fn config() -> FormatterConfig {
        FormatterConfig::default()
    }

    fn attached(mut m: Modifier) -> Modifier {
        m.attach(0);
        m
    }

    #[test]
    fn empty_group_is_a_no_op() {
        let mut state = ModifierContextState { left_shift: 3.0, ..Default::default() };
        let before = state.clone();
        assert_eq!(format(ModifierCategory::Accidental, &mut [], &mut state, &config()), Ok(false));
        assert_eq!(state, before);
    }

    #[test]
    fn accidentals_stack_to_the_left() {
        let mut sharp = attached(Modifier::accidental("#", 8.0));
        let mut flat = attached(Modifier::accidental("b", 7.0));
        let mut state = ModifierContextState::default();
        let mut group = [&mut sharp, &mut flat];
        assert_eq!(format(ModifierCategory::Accidental, &mut group, &mut state, &config()), Ok(true));
        assert_eq!(state.left_shift, 15.0);
        assert_eq!(state.right_shift, 0.0);
        assert_eq!(sharp.x_shift(), 0.0);
        assert_eq!(flat.x_shift(), 8.0);
    }

    #[test]
    fn reformatting_a_group_does_not_double_count() {
        let mut dot = attached(Modifier::dot());
        let mut state = ModifierContextState::default();
        format(ModifierCategory::Dot, &mut [&mut dot], &mut state, &config()).unwrap();
        format(ModifierCategory::Dot, &mut [&mut dot], &mut state, &config()).unwrap();
        assert_eq!(state.right_shift, 5.0);
        assert_eq!(state.per_category_width[&ModifierCategory::Dot], 5.0);
    }

    #[test]
    fn unattached_member_fails() {
        let mut loose = Modifier::stroke(4.0);
        let mut state = ModifierContextState::default();
        let err = format(ModifierCategory::Stroke, &mut [&mut loose], &mut state, &config()).unwrap_err();
        assert_eq!(err, LayoutError::MissingAttachment { category: ModifierCategory::Stroke });
    }

    #[test]
    fn context_combines_categories() {
        let mut dot = attached(Modifier::dot());
        let mut acc = attached(Modifier::accidental("#", 9.0));
        let mut art = attached(Modifier::articulation("a>", 6.0, Position::Above));
        let mut mc = ModifierContext::new();
        mc.add_member(&mut dot).add_member(&mut acc).add_member(&mut art);
        mc.pre_format(&config()).unwrap();
        mc.pre_format(&config()).unwrap();
        assert_eq!(mc.width(), 14.0);
        assert_eq!(mc.state().text_line, 1.0);
        assert_eq!(mc.members(ModifierCategory::Dot), 1);
    }
}
