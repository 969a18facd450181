//! Placement enumeration shared by note modifiers and stave modifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Center,
    Left,
    Right,
    Above,
    Below,
    Begin,
    End,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Center => "center",
            Position::Left => "left",
            Position::Right => "right",
            Position::Above => "above",
            Position::Below => "below",
            Position::Begin => "begin",
            Position::End => "end",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw numbering: CENTER=0, LEFT=1, RIGHT=2, ABOVE=3, BELOW=4, BEGIN=5, END=6.
impl TryFrom<i32> for Position {
    type Error = LayoutError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Position::Center),
            1 => Ok(Position::Left),
            2 => Ok(Position::Right),
            3 => Ok(Position::Above),
            4 => Ok(Position::Below),
            5 => Ok(Position::Begin),
            6 => Ok(Position::End),
            other => Err(LayoutError::InvalidPosition(other.to_string())),
        }
    }
}

impl FromStr for Position {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Position::Center),
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            "above" => Ok(Position::Above),
            "below" => Ok(Position::Below),
            "begin" => Ok(Position::Begin),
            "end" => Ok(Position::End),
            _ => Err(LayoutError::InvalidPosition(s.to_string())),
        }
    }
}
