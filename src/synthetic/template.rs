use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::assessment::{
    Analysis, AnalysisResult, FileInfo, Recommendation, RiskLevel, RiskPrediction, Risks,
    RISK_CATEGORIES,
};
use crate::scoring::risk;

/// Filename shown when the demo is run without a document.
pub const DEMO_FILENAME: &str = "Demo_DPR_Infrastructure_Project.pdf";

const TEMPLATE_FILE_SIZE: u64 = 1_024_000;

const QUALITY_SCORES: [(&str, u8); 5] = [
    ("data_accuracy", 82),
    ("completeness", 78),
    ("technical_viability", 74),
    ("compliance", 85),
    ("budget_realism", 70),
];

// (probability, level, severity), one row per entry of RISK_CATEGORIES
const RISK_PREDICTIONS: [(u8, RiskLevel, RiskLevel); 5] = [
    (70, RiskLevel::High, RiskLevel::Medium),
    (55, RiskLevel::Medium, RiskLevel::Low),
    (65, RiskLevel::High, RiskLevel::High),
    (25, RiskLevel::Low, RiskLevel::Low),
    (45, RiskLevel::Medium, RiskLevel::Medium),
];

const RECOMMENDATIONS: [(RiskLevel, &str, &str); 4] = [
    (
        RiskLevel::High,
        "Risk Analysis",
        "Enhance risk analysis section with detailed mitigation strategies",
    ),
    (
        RiskLevel::Medium,
        "Timeline",
        "Provide more realistic timeline with buffer periods",
    ),
    (
        RiskLevel::Medium,
        "Budget",
        "Include detailed cost breakdown with market analysis",
    ),
    (
        RiskLevel::Low,
        "Technical",
        "Add technical feasibility validation studies",
    ),
];

/// The fixed result the generator overlays its random sections onto.
pub(super) fn canonical() -> AnalysisResult {
    let risk_predictions: IndexMap<String, RiskPrediction> = RISK_CATEGORIES
        .iter()
        .zip(RISK_PREDICTIONS)
        .map(|(category, (probability, level, severity))| {
            (
                category.to_string(),
                RiskPrediction {
                    probability,
                    level,
                    severity,
                    primary_factors: risk::primary_factors(category),
                    mitigation_suggestions: risk::mitigation_suggestions(category),
                },
            )
        })
        .collect();
    let overall_risk = risk::tally(&risk_predictions);

    AnalysisResult {
        analysis_id: String::new(),
        file_info: FileInfo {
            filename: DEMO_FILENAME.to_string(),
            uploaded_at: DateTime::<Utc>::default(),
            file_size_bytes: TEMPLATE_FILE_SIZE,
        },
        analysis: Analysis {
            overall_score: 78,
            completeness_percentage: 80,
            sections_found: 8,
            total_sections: 10,
            section_analyses: IndexMap::new(),
            quality_scores: QUALITY_SCORES
                .iter()
                .map(|(metric, score)| (metric.to_string(), *score))
                .collect(),
        },
        risks: Risks {
            overall_risk,
            risk_predictions,
        },
        recommendations: RECOMMENDATIONS
            .iter()
            .map(|(priority, category, text)| Recommendation::new(*priority, category, text))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_covers_every_risk_category() {
        let template = canonical();
        let categories: Vec<&str> = template
            .risks
            .risk_predictions
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(categories, RISK_CATEGORIES.to_vec());
    }

    #[test]
    fn test_template_overall_risk_matches_predictions() {
        let template = canonical();
        let overall = &template.risks.overall_risk;
        assert_eq!(overall.level, RiskLevel::Medium);
        assert_eq!(overall.high_risk_count, 2);
        assert_eq!(overall.medium_risk_count, 2);
        assert_eq!(overall.low_risk_count, 1);
    }

    #[test]
    fn test_template_recommendations_keep_priority_order() {
        let priorities: Vec<RiskLevel> = canonical()
            .recommendations
            .iter()
            .map(|r| r.priority)
            .collect();
        assert_eq!(
            priorities,
            vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Medium, RiskLevel::Low]
        );
    }
}
