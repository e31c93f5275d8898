//! Diagnosis resolution.
//!
//! Combines the three independent condition grades into a single
//! diagnosis. A diagnosis is a projection of the indices: it is recomputed
//! on demand and never stored.

use serde::{Deserialize, Serialize};

use super::severity::{classify_all, Condition, ConditionClassification, SeverityLevel};

/// Kind of diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisType {
    Normal,
    Plagiocephaly,
    Brachycephaly,
    Dolichocephaly,
    /// More than one condition is abnormal
    Mixed,
}

impl From<Condition> for DiagnosisType {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Plagiocephaly => Self::Plagiocephaly,
            Condition::Brachycephaly => Self::Brachycephaly,
            Condition::Dolichocephaly => Self::Dolichocephaly,
        }
    }
}

impl std::fmt::Display for DiagnosisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Plagiocephaly => write!(f, "Plagiocefalia"),
            Self::Brachycephaly => write!(f, "Braquicefalia"),
            Self::Dolichocephaly => write!(f, "Dolicocefalia"),
            Self::Mixed => write!(f, "Misto"),
        }
    }
}

/// Resolved diagnosis for one set of indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CranialDiagnosis {
    #[serde(rename = "type")]
    pub diagnosis_type: DiagnosisType,

    /// Overall severity; for mixed presentations, the worst component
    pub severity: SeverityLevel,

    /// Localized text, e.g. "Braquicefalia Moderada" or "Misto Grave"
    pub diagnosis_text: String,

    /// Per-condition grades the diagnosis was resolved from
    pub conditions: [ConditionClassification; 3],
}

impl CranialDiagnosis {
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.diagnosis_type == DiagnosisType::Normal
    }

    /// Conditions graded as abnormal.
    pub fn abnormal_conditions(&self) -> impl Iterator<Item = &ConditionClassification> {
        self.conditions.iter().filter(|c| c.severity.is_abnormal())
    }
}

/// Resolve a diagnosis from a cranial index and a CVAI.
///
/// - no abnormal condition: `Normal`
/// - exactly one: that condition, at its own severity
/// - more than one: `Mixed`, at the maximum severity among all three
#[must_use]
pub fn generate_diagnosis(cranial_index: f64, cvai: f64) -> CranialDiagnosis {
    let conditions = classify_all(cranial_index, cvai);
    let abnormal: Vec<&ConditionClassification> = conditions
        .iter()
        .filter(|c| c.severity.is_abnormal())
        .collect();

    let (diagnosis_type, severity, diagnosis_text) = match abnormal.as_slice() {
        [] => (
            DiagnosisType::Normal,
            SeverityLevel::Normal,
            "Normal".to_string(),
        ),
        [single] => (
            DiagnosisType::from(single.condition),
            single.severity,
            format!(
                "{} {}",
                single.condition.label(),
                single.severity.label_feminine()
            ),
        ),
        _ => {
            let worst = conditions
                .iter()
                .map(|c| c.severity)
                .max()
                .unwrap_or(SeverityLevel::Normal);
            (
                DiagnosisType::Mixed,
                worst,
                format!("{} {}", DiagnosisType::Mixed, worst.label_masculine()),
            )
        }
    };

    CranialDiagnosis {
        diagnosis_type,
        severity,
        diagnosis_text,
        conditions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compute_indices;

    #[test]
    fn test_reference_scenario_is_mixed_moderate() {
        let indices = compute_indices(Some(143.0), Some(135.0), Some(145.0), Some(138.0));
        let (ci, cvai) = indices.diagnosable().expect("Both indices present");

        let diagnosis = generate_diagnosis(ci, cvai);
        assert_eq!(diagnosis.diagnosis_type, DiagnosisType::Mixed);
        assert_eq!(diagnosis.severity, SeverityLevel::Moderate);
        assert_eq!(diagnosis.diagnosis_text, "Misto Moderado");
    }

    #[test]
    fn test_normal_round_trip() {
        let indices = compute_indices(Some(100.0), Some(80.0), Some(100.0), Some(100.0));
        let (ci, cvai) = indices.diagnosable().expect("Both indices present");
        assert_eq!(ci, 80.0);
        assert_eq!(cvai, 0.0);

        let diagnosis = generate_diagnosis(ci, cvai);
        assert!(diagnosis.is_normal());
        assert_eq!(diagnosis.severity, SeverityLevel::Normal);
        assert_eq!(diagnosis.diagnosis_text, "Normal");
        assert_eq!(diagnosis.abnormal_conditions().count(), 0);
    }

    #[test]
    fn test_single_condition_is_not_mixed() {
        let diagnosis = generate_diagnosis(92.0, 1.0);
        assert_eq!(diagnosis.diagnosis_type, DiagnosisType::Brachycephaly);
        assert_eq!(diagnosis.severity, SeverityLevel::Moderate);
        assert_eq!(diagnosis.diagnosis_text, "Braquicefalia Moderada");
    }

    #[test]
    fn test_single_severe_uses_grave_label() {
        let diagnosis = generate_diagnosis(80.0, 12.0);
        assert_eq!(diagnosis.diagnosis_type, DiagnosisType::Plagiocephaly);
        assert_eq!(diagnosis.diagnosis_text, "Plagiocefalia Grave");

        let diagnosis = generate_diagnosis(60.0, 0.0);
        assert_eq!(diagnosis.diagnosis_type, DiagnosisType::Dolichocephaly);
        assert_eq!(diagnosis.diagnosis_text, "Dolicocefalia Grave");
    }

    #[test]
    fn test_mixed_takes_most_severe() {
        // brachycephaly mild, plagiocephaly severe
        let diagnosis = generate_diagnosis(88.0, 10.0);
        assert_eq!(diagnosis.diagnosis_type, DiagnosisType::Mixed);
        assert_eq!(diagnosis.severity, SeverityLevel::Severe);
        assert_eq!(diagnosis.diagnosis_text, "Misto Grave");

        // dolichocephaly moderate, plagiocephaly mild
        let diagnosis = generate_diagnosis(67.0, 4.0);
        assert_eq!(diagnosis.severity, SeverityLevel::Moderate);
        assert_eq!(diagnosis.abnormal_conditions().count(), 2);
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_diagnosis(94.4, 4.8), generate_diagnosis(94.4, 4.8));
    }

    #[test]
    fn test_serialized_shape() {
        let diagnosis = generate_diagnosis(92.0, 1.0);
        let json = serde_json::to_value(&diagnosis).expect("Should serialize");
        assert_eq!(json["type"], "Brachycephaly");
        assert_eq!(json["severity"], "moderate");
        assert_eq!(json["diagnosisText"], "Braquicefalia Moderada");
    }
}
