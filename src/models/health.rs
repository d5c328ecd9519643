//! Health verdict

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sole recommendation of a run with no findings
pub const ALL_CHECKS_PASSED: &str = "All checks passed - no action needed";

/// Overall verdict, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCategory {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthCategory {
    /// Map a 0-100 score onto its category
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            40..=59 => Self::Poor,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score with the findings that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub overall: HealthCategory,
    /// 0-100
    pub score: u8,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl HealthStatus {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_score_boundaries() {
        assert_eq!(HealthCategory::from_score(100), HealthCategory::Excellent);
        assert_eq!(HealthCategory::from_score(90), HealthCategory::Excellent);
        assert_eq!(HealthCategory::from_score(89), HealthCategory::Good);
        assert_eq!(HealthCategory::from_score(75), HealthCategory::Good);
        assert_eq!(HealthCategory::from_score(74), HealthCategory::Fair);
        assert_eq!(HealthCategory::from_score(60), HealthCategory::Fair);
        assert_eq!(HealthCategory::from_score(59), HealthCategory::Poor);
        assert_eq!(HealthCategory::from_score(40), HealthCategory::Poor);
        assert_eq!(HealthCategory::from_score(39), HealthCategory::Critical);
        assert_eq!(HealthCategory::from_score(0), HealthCategory::Critical);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&HealthCategory::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        assert_eq!(HealthCategory::Poor.to_string(), "poor");
    }
}
