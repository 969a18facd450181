//! Error kinds raised by formatting and drawing.
//!
//! Every failure here is a configuration or protocol error: formatting is
//! deterministic, so retrying reproduces the same error.

use thiserror::Error;

use crate::modifier::ModifierCategory;
use crate::tables::Ticks;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A raw position value or name outside the placement enumeration, or a
    /// position the element cannot be drawn at.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Duration code not in the duration vocabulary.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// A meter with a zero beat value or a non-positive resolution.
    #[error("invalid meter {num_beats}/{beat_value} at resolution {resolution}")]
    InvalidMeter {
        num_beats: u32,
        beat_value: u32,
        resolution: i64,
    },

    #[error("invalid volta type: {0}")]
    InvalidVoltaType(i32),

    /// A strict voice whose tick total disagrees with the declared meter.
    #[error("voice {voice} does not match the meter: expected {expected} ticks, found {actual}")]
    MeterMismatch {
        voice: String,
        expected: Ticks,
        actual: Ticks,
    },

    #[error("too many ticks in voice: limit {limit}, would reach {attempted}")]
    TooManyTicks { limit: Ticks, attempted: Ticks },

    /// A modifier reached formatting without the note it belongs to.
    #[error("{category:?} modifier has no attached note")]
    MissingAttachment { category: ModifierCategory },

    #[error("{0} queried before it was formatted")]
    Unformatted(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Config(err.to_string())
    }
}
