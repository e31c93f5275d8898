//! Severity levels and per-condition classifiers.
//!
//! Each classifier is total over `f64`: every input maps to exactly one
//! [`SeverityLevel`]. Rejecting NaN or negative inputs is the job of
//! [`Measurement::validate`](super::Measurement::validate), not of these
//! functions.

use serde::{Deserialize, Serialize};

/// Ordered severity scale used by every condition.
///
/// The derived `Ord` follows declaration order, so `max()` over a set of
/// levels yields the most severe one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Normal,
    /// Leve
    Mild,
    /// Moderada
    Moderate,
    /// Severa (rendered as "Grave")
    Severe,
}

impl SeverityLevel {
    /// Numeric rank, `Normal = 0` through `Severe = 3`.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Severe => 3,
        }
    }

    #[must_use]
    pub fn is_abnormal(self) -> bool {
        self != Self::Normal
    }

    /// Label agreeing with a feminine noun ("Braquicefalia Moderada").
    #[must_use]
    pub fn label_feminine(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Mild => "Leve",
            Self::Moderate => "Moderada",
            Self::Severe => "Grave",
        }
    }

    /// Label agreeing with a masculine noun ("Misto Moderado").
    #[must_use]
    pub fn label_masculine(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Mild => "Leve",
            Self::Moderate => "Moderado",
            Self::Severe => "Grave",
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Mild => write!(f, "leve"),
            Self::Moderate => write!(f, "moderada"),
            Self::Severe => write!(f, "severa"),
        }
    }
}

/// The three skull-shape conditions graded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Plagiocephaly,
    Brachycephaly,
    Dolichocephaly,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::Plagiocephaly,
        Condition::Brachycephaly,
        Condition::Dolichocephaly,
    ];

    /// Localized condition name used in diagnosis text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Plagiocephaly => "Plagiocefalia",
            Self::Brachycephaly => "Braquicefalia",
            Self::Dolichocephaly => "Dolicocefalia",
        }
    }
}

/// One condition together with the severity it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionClassification {
    pub condition: Condition,
    pub severity: SeverityLevel,
}

/// Grade plagiocephaly from CVAI (%).
///
/// `[3.5, 6.25]` is mild and `(6.25, 8.75]` moderate: the 6.25 boundary
/// belongs to the milder band.
#[must_use]
pub fn classify_plagiocephaly(cvai: f64) -> SeverityLevel {
    if cvai < 3.5 {
        SeverityLevel::Normal
    } else if cvai <= 6.25 {
        SeverityLevel::Mild
    } else if cvai <= 8.75 {
        SeverityLevel::Moderate
    } else if cvai > 8.75 {
        SeverityLevel::Severe
    } else {
        // NaN
        SeverityLevel::Normal
    }
}

/// Grade brachycephaly from the cranial index (%).
///
/// Only an elevated index is brachycephalic. Values between the published
/// bands (85 < ci < 86, 90 < ci < 91) fall through to normal.
#[must_use]
pub fn classify_brachycephaly(cranial_index: f64) -> SeverityLevel {
    let ci = cranial_index;
    if (75.0..=85.0).contains(&ci) {
        SeverityLevel::Normal
    } else if (86.0..=90.0).contains(&ci) {
        SeverityLevel::Mild
    } else if (91.0..=95.0).contains(&ci) {
        SeverityLevel::Moderate
    } else if ci > 95.0 {
        SeverityLevel::Severe
    } else {
        SeverityLevel::Normal
    }
}

/// Grade dolichocephaly from the cranial index (%).
///
/// Only a low index is dolichocephalic. Values between the published
/// bands (69 < ci < 70, 74 < ci < 75) fall through to normal.
#[must_use]
pub fn classify_dolichocephaly(cranial_index: f64) -> SeverityLevel {
    let ci = cranial_index;
    if (75.0..=85.0).contains(&ci) {
        SeverityLevel::Normal
    } else if (70.0..=74.0).contains(&ci) {
        SeverityLevel::Mild
    } else if (65.0..=69.0).contains(&ci) {
        SeverityLevel::Moderate
    } else if ci < 65.0 {
        SeverityLevel::Severe
    } else {
        SeverityLevel::Normal
    }
}

/// Classify all three conditions, in [`Condition::ALL`] order.
#[must_use]
pub fn classify_all(cranial_index: f64, cvai: f64) -> [ConditionClassification; 3] {
    Condition::ALL.map(|condition| {
        let severity = match condition {
            Condition::Plagiocephaly => classify_plagiocephaly(cvai),
            Condition::Brachycephaly => classify_brachycephaly(cranial_index),
            Condition::Dolichocephaly => classify_dolichocephaly(cranial_index),
        };
        ConditionClassification { condition, severity }
    })
}
