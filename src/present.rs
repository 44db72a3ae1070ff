//! Result presentation
//!
//! Maps a class index to its label, advisory message, color, and emoji
//! through an exhaustive match over the closed three-class enumeration.
//! An out-of-range index fails loudly with `UnknownClass` instead of
//! defaulting.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Predicted stress class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Ringan,
    Sedang,
    Berat,
}

/// Framing color keyed by class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelColor {
    Green,
    Amber,
    Red,
}

impl LevelColor {
    /// ANSI foreground escape for terminal rendering
    pub fn ansi(&self) -> &'static str {
        match self {
            LevelColor::Green => "\x1b[32m",
            LevelColor::Amber => "\x1b[33m",
            LevelColor::Red => "\x1b[31m",
        }
    }
}

/// Everything the result surface needs for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub label: &'static str,
    pub advisory: &'static str,
    pub color: LevelColor,
    pub emoji: &'static str,
}

impl StressLevel {
    /// Map a classifier output index to a class.
    ///
    /// Fails with [`PredictError::UnknownClass`] outside {0, 1, 2}.
    pub fn from_index(index: usize) -> Result<Self, PredictError> {
        match index {
            0 => Ok(StressLevel::Ringan),
            1 => Ok(StressLevel::Sedang),
            2 => Ok(StressLevel::Berat),
            other => Err(PredictError::UnknownClass(other)),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            StressLevel::Ringan => 0,
            StressLevel::Sedang => 1,
            StressLevel::Berat => 2,
        }
    }

    /// Label as appended to the outcome log
    pub fn label(&self) -> &'static str {
        self.presentation().label
    }

    /// Full presentation block for the result surface
    pub fn presentation(&self) -> Presentation {
        match self {
            StressLevel::Ringan => Presentation {
                label: "Ringan",
                advisory: "Tingkat stres kamu masih ringan. Jaga pola tidur dan terus lakukan hal-hal yang bikin kamu nyaman.",
                color: LevelColor::Green,
                emoji: "😌",
            },
            StressLevel::Sedang => Presentation {
                label: "Sedang",
                advisory: "Tingkat stres kamu sedang. Coba luangkan waktu buat istirahat dan cerita ke orang yang kamu percaya.",
                color: LevelColor::Amber,
                emoji: "😟",
            },
            StressLevel::Berat => Presentation {
                label: "Berat",
                advisory: "Tingkat stres kamu berat. Jangan dipendam sendiri, pertimbangkan buat ngobrol sama konselor atau profesional.",
                color: LevelColor::Red,
                emoji: "😫",
            },
        }
    }
}
