//! Ordered condition labels.

use std::collections::BTreeSet;

use rl_core::errors::{codes, ErrorInfo, RlError};
use serde::{Deserialize, Serialize};

/// Label reserved for the control condition.
pub const CONTROL_LABEL: &str = "C";

/// Ordered, duplicate-free list of condition labels.
///
/// Order matters: the sampler builds its pool by cycling through the labels
/// in this order, so two vocabularies with the same labels in a different
/// order produce different assignments for the same seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ConditionVocabulary {
    labels: Vec<String>,
}

impl ConditionVocabulary {
    /// Control plus `arms` treatment labels.
    ///
    /// Zero or one arm yields `["C", "T"]`; two or more arms are numbered
    /// `T1..Tn`.
    pub fn for_arms(arms: i64) -> Result<Self, RlError> {
        if arms < 0 {
            return Err(RlError::Design(
                ErrorInfo::new(
                    codes::INVALID_ARM_COUNT,
                    "treatment arm count must not be negative",
                )
                .with_context("arms", arms.to_string()),
            ));
        }
        let mut labels = vec![CONTROL_LABEL.to_string()];
        if arms <= 1 {
            labels.push("T".to_string());
        } else {
            labels.extend((1..=arms).map(|idx| format!("T{idx}")));
        }
        Ok(Self { labels })
    }

    /// Vocabulary from explicit labels, kept in the given order.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, RlError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(RlError::Design(ErrorInfo::new(
                codes::INVALID_VOCABULARY,
                "vocabulary needs at least one label",
            )));
        }
        let mut seen = BTreeSet::new();
        for label in &labels {
            if label.trim().is_empty() {
                return Err(RlError::Design(ErrorInfo::new(
                    codes::INVALID_VOCABULARY,
                    "condition labels must not be blank",
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(RlError::Design(
                    ErrorInfo::new(codes::INVALID_VOCABULARY, "duplicate condition label")
                        .with_context("label", label.clone()),
                ));
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }
}

impl TryFrom<Vec<String>> for ConditionVocabulary {
    type Error = RlError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_labels(labels)
    }
}

impl From<ConditionVocabulary> for Vec<String> {
    fn from(vocabulary: ConditionVocabulary) -> Self {
        vocabulary.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rl_core::ErrorKind;

    #[test]
    fn arm_counts_map_to_labels() {
        assert_eq!(ConditionVocabulary::for_arms(0).unwrap().labels(), ["C", "T"]);
        assert_eq!(ConditionVocabulary::for_arms(1).unwrap().labels(), ["C", "T"]);
        assert_eq!(
            ConditionVocabulary::for_arms(2).unwrap().labels(),
            ["C", "T1", "T2"]
        );
        assert_eq!(ConditionVocabulary::for_arms(5).unwrap().len(), 6);
    }

    #[test]
    fn negative_arms_rejected() {
        let err = ConditionVocabulary::for_arms(-1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArmCount);
    }

    #[test]
    fn explicit_labels_validated() {
        assert!(ConditionVocabulary::from_labels(["A", "B"]).is_ok());
        for bad in [vec![], vec!["A", "A"], vec!["A", " "]] {
            let err = ConditionVocabulary::from_labels(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidVocabulary);
        }
    }

    #[test]
    fn serde_goes_through_validation() {
        let vocab: ConditionVocabulary = serde_json::from_str(r#"["C","T1","T2"]"#).unwrap();
        assert_eq!(vocab.position("T2"), Some(2));
        assert!(serde_json::from_str::<ConditionVocabulary>(r#"["C","C"]"#).is_err());
    }
}
