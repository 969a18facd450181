//! Tunable layout settings. Every field has a default, so a partial JSON
//! document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::LayoutResult;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub formatter: FormatterConfig,
    pub stave: StaveConfig,
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Extra space between consecutive tick positions.
    pub tick_padding: f64,
    /// Space a grace-note group keeps from its principal note.
    pub grace_group_spacing: f64,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { tick_padding: 1.0, grace_group_spacing: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaveConfig {
    pub num_lines: u32,
    pub spacing_between_lines: f64,
    pub space_above_staff_ln: f64,
    pub space_below_staff_ln: f64,
    pub top_text_position: f64,
    pub bottom_text_position: f64,
    /// Padding between consecutive stave decorations.
    pub modifier_padding: f64,
    /// Padding before a time signature.
    pub time_signature_padding: f64,
}

impl Default for StaveConfig {
    fn default() -> Self {
        Self {
            num_lines: 5,
            spacing_between_lines: 10.0,
            space_above_staff_ln: 4.0,
            space_below_staff_ln: 4.0,
            top_text_position: 1.0,
            bottom_text_position: 4.0,
            modifier_padding: 10.0,
            time_signature_padding: 15.0,
        }
    }
}
