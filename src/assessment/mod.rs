pub mod types;

pub use types::{
    Analysis, AnalysisResult, FileInfo, OverallRisk, Recommendation, RiskLevel, RiskPrediction,
    Risks, SectionAnalysis, StatusLabel,
};

use crate::scoring;
use thiserror::Error;

/// The ten sections every DPR is expected to address, in report order.
pub const CANONICAL_SECTIONS: [&str; 10] = [
    "Context/Background",
    "Problems Addressed",
    "Project Objectives",
    "Technology Issues",
    "Management Arrangements",
    "Means of Finance",
    "Time Frame",
    "Target Beneficiaries",
    "Legal Framework",
    "Risk Analysis",
];

/// The five risk dimensions evaluated per analysis, in report order.
pub const RISK_CATEGORIES: [&str; 5] = [
    "Budget Overrun Risk",
    "Timeline Delay Risk",
    "Technical Implementation Risk",
    "Compliance Risk",
    "Resource Availability Risk",
];

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is {value}, expected a value in [0, 100]")]
    OutOfRange { field: String, value: f64 },

    #[error("sections_found ({found}) exceeds total_sections ({total})")]
    SectionCount { found: u32, total: u32 },

    #[error("section '{section}' has status {found} but score {score} classifies as {expected}")]
    StatusMismatch {
        section: String,
        score: u8,
        expected: StatusLabel,
        found: StatusLabel,
    },
}

fn check_percent(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.into(),
            value,
        })
    }
}

impl AnalysisResult {
    /// Check every documented bound plus the section status invariant.
    ///
    /// Results coming from an external backend must pass this before they
    /// are displayed; the synthetic generator always satisfies it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let analysis = &self.analysis;
        check_percent("overall_score", f64::from(analysis.overall_score))?;
        check_percent(
            "completeness_percentage",
            f64::from(analysis.completeness_percentage),
        )?;
        if analysis.sections_found > analysis.total_sections {
            return Err(ValidationError::SectionCount {
                found: analysis.sections_found,
                total: analysis.total_sections,
            });
        }

        for (name, section) in &analysis.section_analyses {
            check_percent(format!("{name}.score"), f64::from(section.score))?;
            check_percent(format!("{name}.completeness"), f64::from(section.completeness))?;
            check_percent(format!("{name}.quality"), f64::from(section.quality))?;

            let expected = scoring::classify(i32::from(section.score));
            if section.status != expected {
                return Err(ValidationError::StatusMismatch {
                    section: name.clone(),
                    score: section.score,
                    expected,
                    found: section.status,
                });
            }
        }

        for (metric, score) in &analysis.quality_scores {
            check_percent(format!("quality_scores.{metric}"), f64::from(*score))?;
        }

        check_percent("overall_risk.score", self.risks.overall_risk.score)?;
        for (category, prediction) in &self.risks.risk_predictions {
            check_percent(
                format!("{category}.probability"),
                f64::from(prediction.probability),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_result() -> AnalysisResult {
        let mut rng = StdRng::seed_from_u64(7);
        synthetic::generate(&mut rng, "sample.pdf", synthetic::fixed_instant())
    }

    #[test]
    fn test_canonical_lists() {
        assert_eq!(CANONICAL_SECTIONS.len(), 10);
        assert_eq!(RISK_CATEGORIES.len(), 5);
        assert_eq!(CANONICAL_SECTIONS[9], "Risk Analysis");
    }

    #[test]
    fn test_validate_accepts_synthetic_result() {
        assert_eq!(sample_result().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_status_mismatch() {
        let mut result = sample_result();
        let section = result
            .analysis
            .section_analyses
            .get_mut("Risk Analysis")
            .unwrap();
        section.score = 90;
        section.status = StatusLabel::Poor;

        let err = result.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::StatusMismatch { ref section, expected: StatusLabel::Excellent, .. }
                if section == "Risk Analysis"
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        let mut result = sample_result();
        result.analysis.overall_score = 120;
        assert!(matches!(
            result.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "overall_score"
        ));
    }

    #[test]
    fn test_validate_rejects_section_count() {
        let mut result = sample_result();
        result.analysis.sections_found = 11;
        result.analysis.total_sections = 10;
        assert_eq!(
            result.validate(),
            Err(ValidationError::SectionCount { found: 11, total: 10 })
        );
    }

    #[test]
    fn test_validate_rejects_nan_risk_score() {
        let mut result = sample_result();
        result.risks.overall_risk.score = f64::NAN;
        assert!(result.validate().is_err());
    }
}
