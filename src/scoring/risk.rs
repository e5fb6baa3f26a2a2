use indexmap::IndexMap;

use crate::assessment::{OverallRisk, RiskLevel, RiskPrediction};

/// One-line description for an overall risk level.
pub fn describe(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Well managed risks",
        RiskLevel::Medium => "Moderate attention needed",
        RiskLevel::High => "Immediate action required",
    }
}

/// Aggregate per-category levels into an overall risk.
///
/// Levels are weighted High=3, Medium=2, Low=1 and averaged; the mean maps
/// to High at 2.5 and Medium at 1.5. An empty map yields Medium / 50.0.
pub fn tally(predictions: &IndexMap<String, RiskPrediction>) -> OverallRisk {
    let count = |level: RiskLevel| {
        predictions
            .values()
            .filter(|prediction| prediction.level == level)
            .count() as u32
    };
    let high = count(RiskLevel::High);
    let medium = count(RiskLevel::Medium);
    let low = count(RiskLevel::Low);

    if predictions.is_empty() {
        return OverallRisk {
            level: RiskLevel::Medium,
            score: 50.0,
            high_risk_count: 0,
            medium_risk_count: 0,
            low_risk_count: 0,
        };
    }

    let weighted = f64::from(high * 3 + medium * 2 + low) / predictions.len() as f64;
    let level = if weighted >= 2.5 {
        RiskLevel::High
    } else if weighted >= 1.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    OverallRisk {
        level,
        score: (weighted / 3.0 * 1000.0).round() / 10.0,
        high_risk_count: high,
        medium_risk_count: medium,
        low_risk_count: low,
    }
}

/// Short narrative summarising the risk picture.
pub fn risk_summary(
    predictions: &IndexMap<String, RiskPrediction>,
    overall: &OverallRisk,
) -> String {
    let high: Vec<&str> = predictions
        .iter()
        .filter(|(_, prediction)| prediction.level == RiskLevel::High)
        .map(|(name, _)| name.as_str())
        .collect();

    if !high.is_empty() {
        format!(
            "High priority risks identified in {}. Immediate attention and mitigation planning required.",
            high.join(", ")
        )
    } else if overall.level == RiskLevel::Medium {
        "Medium priority risks identified. Enhanced monitoring and mitigation planning recommended."
            .to_string()
    } else {
        "Low risk project profile. Standard risk management practices sufficient.".to_string()
    }
}

/// Typical drivers for a risk category.
pub fn primary_factors(category: &str) -> Vec<String> {
    let factors: &[&str] = match category {
        "Budget Overrun Risk" => &[
            "Inadequate cost estimation methodology",
            "Missing market rate analysis",
            "No contingency planning",
        ],
        "Timeline Delay Risk" => &[
            "Aggressive project timeline",
            "Insufficient buffer time allocation",
            "Complex dependency management",
        ],
        "Technical Implementation Risk" => &[
            "Unproven technology selection",
            "High technical complexity",
            "Integration challenges",
        ],
        "Compliance Risk" => &[
            "Missing regulatory approvals",
            "Incomplete compliance framework",
            "Environmental clearance gaps",
        ],
        "Resource Availability Risk" => &[
            "Skilled manpower shortage",
            "Equipment procurement delays",
            "Vendor reliability issues",
        ],
        _ => &["General project risks"],
    };
    factors.iter().map(|f| f.to_string()).collect()
}

/// Standard mitigations for a risk category.
pub fn mitigation_suggestions(category: &str) -> Vec<String> {
    let suggestions: &[&str] = match category {
        "Budget Overrun Risk" => &[
            "Conduct detailed market survey for cost estimation",
            "Include 10-15% contingency in budget",
            "Implement regular cost monitoring and control",
        ],
        "Timeline Delay Risk" => &[
            "Develop realistic project schedule with buffers",
            "Implement critical path method (CPM)",
            "Establish fast-track approval processes",
        ],
        "Technical Implementation Risk" => &[
            "Conduct proof of concept studies",
            "Engage technical experts and consultants",
            "Implement phased rollout approach",
        ],
        "Compliance Risk" => &[
            "Engage early with regulatory authorities",
            "Conduct comprehensive legal review",
            "Establish compliance monitoring framework",
        ],
        "Resource Availability Risk" => &[
            "Develop comprehensive resource plan",
            "Establish vendor partnerships and agreements",
            "Implement skill development programs",
        ],
        _ => &["Develop risk-specific mitigation plan"],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::RISK_CATEGORIES;

    fn prediction(level: RiskLevel) -> RiskPrediction {
        RiskPrediction {
            probability: 50,
            level,
            severity: level,
            primary_factors: vec![],
            mitigation_suggestions: vec![],
        }
    }

    fn predictions(levels: &[(&str, RiskLevel)]) -> IndexMap<String, RiskPrediction> {
        levels
            .iter()
            .map(|(name, level)| (name.to_string(), prediction(*level)))
            .collect()
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(RiskLevel::Low), "Well managed risks");
        assert_eq!(describe(RiskLevel::Medium), "Moderate attention needed");
        assert_eq!(describe(RiskLevel::High), "Immediate action required");
    }

    #[test]
    fn test_unrecognised_level_never_reaches_describe() {
        assert!(serde_json::from_str::<RiskLevel>("\"Critical\"").is_err());
        assert!(serde_json::from_str::<RiskLevel>("\"high\"").is_err());
        assert_eq!(
            describe(serde_json::from_str("\"High\"").unwrap()),
            "Immediate action required"
        );
    }

    #[test]
    fn test_tally_mixed_levels() {
        let preds = predictions(&[
            ("Budget Overrun Risk", RiskLevel::High),
            ("Timeline Delay Risk", RiskLevel::Medium),
            ("Technical Implementation Risk", RiskLevel::High),
            ("Compliance Risk", RiskLevel::Low),
            ("Resource Availability Risk", RiskLevel::Medium),
        ]);
        let overall = tally(&preds);
        assert_eq!(overall.high_risk_count, 2);
        assert_eq!(overall.medium_risk_count, 2);
        assert_eq!(overall.low_risk_count, 1);
        // (6 + 4 + 1) / 5 = 2.2
        assert_eq!(overall.level, RiskLevel::Medium);
        assert!((overall.score - 73.3).abs() < 1e-9);
    }

    #[test]
    fn test_tally_thresholds() {
        let all_high = predictions(&[("a", RiskLevel::High), ("b", RiskLevel::High)]);
        assert_eq!(tally(&all_high).level, RiskLevel::High);
        assert!((tally(&all_high).score - 100.0).abs() < 1e-9);

        let mostly_low = predictions(&[("a", RiskLevel::Low), ("b", RiskLevel::Medium), ("c", RiskLevel::Low)]);
        assert_eq!(tally(&mostly_low).level, RiskLevel::Low);
    }

    #[test]
    fn test_tally_empty() {
        let overall = tally(&IndexMap::new());
        assert_eq!(overall.level, RiskLevel::Medium);
        assert_eq!(overall.score, 50.0);
        assert_eq!(overall.high_risk_count, 0);
    }

    #[test]
    fn test_risk_summary_names_high_risks() {
        let preds = predictions(&[
            ("Budget Overrun Risk", RiskLevel::High),
            ("Compliance Risk", RiskLevel::Low),
            ("Timeline Delay Risk", RiskLevel::High),
        ]);
        let summary = risk_summary(&preds, &tally(&preds));
        assert!(summary.starts_with(
            "High priority risks identified in Budget Overrun Risk, Timeline Delay Risk."
        ));
    }

    #[test]
    fn test_risk_summary_without_high_risks() {
        let medium = predictions(&[("a", RiskLevel::Medium), ("b", RiskLevel::Medium)]);
        assert!(risk_summary(&medium, &tally(&medium)).starts_with("Medium priority"));

        let low = predictions(&[("a", RiskLevel::Low)]);
        assert!(risk_summary(&low, &tally(&low)).starts_with("Low risk project profile"));
    }

    #[test]
    fn test_category_texts() {
        for category in RISK_CATEGORIES {
            assert_eq!(primary_factors(category).len(), 3, "{category}");
            assert_eq!(mitigation_suggestions(category).len(), 3, "{category}");
        }
        assert_eq!(primary_factors("Other"), vec!["General project risks"]);
    }
}
