//! Children's Healthcare of Atlanta (CHOA) plagiocephaly severity scale.
//!
//! Five levels over CVAI. Levels 1-3 line up with the plagiocephaly bands
//! in [`classify_plagiocephaly`](super::classify_plagiocephaly); levels 4
//! and 5 both grade as severe and differ only in treatment urgency.

use serde::{Deserialize, Serialize};

use super::SeverityLevel;

/// CVAI above which a severe presentation is level 5.
const LEVEL_5_CVAI: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoaLevel {
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
}

impl ChoaLevel {
    /// Map a CVAI (%) to its CHOA level. NaN maps to level 1.
    #[must_use]
    pub fn from_cvai(cvai: f64) -> Self {
        if cvai < 3.5 {
            Self::Level1
        } else if cvai <= 6.25 {
            Self::Level2
        } else if cvai <= 8.75 {
            Self::Level3
        } else if cvai <= LEVEL_5_CVAI {
            Self::Level4
        } else if cvai > LEVEL_5_CVAI {
            Self::Level5
        } else {
            Self::Level1
        }
    }

    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Level1 => 1,
            Self::Level2 => 2,
            Self::Level3 => 3,
            Self::Level4 => 4,
            Self::Level5 => 5,
        }
    }

    #[must_use]
    pub fn severity(self) -> SeverityLevel {
        match self {
            Self::Level1 => SeverityLevel::Normal,
            Self::Level2 => SeverityLevel::Mild,
            Self::Level3 => SeverityLevel::Moderate,
            Self::Level4 | Self::Level5 => SeverityLevel::Severe,
        }
    }

    /// Suggested clinical conduct for this level.
    #[must_use]
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Level1 => "Sem necessidade de tratamento",
            Self::Level2 => "Reposicionamento",
            Self::Level3 => "Reposicionamento e fisioterapia; considerar órtese craniana",
            Self::Level4 | Self::Level5 => "Órtese craniana (capacete) recomendada",
        }
    }
}

impl std::fmt::Display for ChoaLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nível {}", self.number())
    }
}
