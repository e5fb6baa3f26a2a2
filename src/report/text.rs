use std::fmt::Write;

use crate::assessment::AnalysisResult;

pub const REPORT_TITLE: &str = "DPR QUALITY ASSESSMENT REPORT";
pub const GENERATOR_NAME: &str = "MDoNER DPR Assessment System";

const UPLOAD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Turn a metric key into a label.
///
/// A space goes before every uppercase letter that is not leading and not
/// already preceded by a space, then the first character is uppercased:
/// `DataAccuracy` -> `Data Accuracy`, `Budget Realism` is left alone.
/// Underscores separate words too, so `data_accuracy` -> `Data Accuracy`.
pub fn display_name(metric: &str) -> String {
    let mut out = String::with_capacity(metric.len() + 4);
    let mut previous: Option<char> = None;
    let mut capitalize_next = false;

    for ch in metric.chars() {
        if ch == '_' {
            out.push(' ');
            previous = Some(' ');
            capitalize_next = true;
            continue;
        }
        if ch.is_uppercase() && previous.is_some_and(|p| p != ' ') {
            out.push(' ');
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
        previous = Some(ch);
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => out,
    }
}

/// Render the fixed-layout plain-text report, with `notice` printed under
/// the header when given.
pub fn to_text(result: &AnalysisResult, notice: Option<&str>) -> String {
    let analysis = &result.analysis;
    let overall_risk = &result.risks.overall_risk;
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
    let _ = writeln!(out, "Generated by: {GENERATOR_NAME}");
    if let Some(notice) = notice {
        let _ = writeln!(out, "NOTE: {notice}");
    }
    out.push('\n');

    heading(&mut out, "PROJECT INFORMATION");
    let _ = writeln!(out, "File Name: {}", result.file_info.filename);
    let _ = writeln!(
        out,
        "Upload Date: {}",
        result.file_info.uploaded_at.format(UPLOAD_DATE_FORMAT)
    );
    let _ = writeln!(out, "Analysis ID: {}", result.analysis_id);
    out.push('\n');

    heading(&mut out, "EXECUTIVE SUMMARY");
    let _ = writeln!(out, "Overall Quality Score: {}/100", analysis.overall_score);
    let _ = writeln!(out, "Risk Level: {}", overall_risk.level);
    let _ = writeln!(out, "Completeness: {}%", analysis.completeness_percentage);
    let _ = writeln!(
        out,
        "Sections Found: {}/{}",
        analysis.sections_found, analysis.total_sections
    );
    out.push('\n');

    heading(&mut out, "SECTION ANALYSIS");
    for (name, section) in &analysis.section_analyses {
        let _ = writeln!(out, "{name}: {}/100 ({})", section.score, section.status);
    }
    out.push('\n');

    heading(&mut out, "QUALITY METRICS");
    for (metric, score) in &analysis.quality_scores {
        let _ = writeln!(out, "{}: {score}/100", display_name(metric));
    }
    out.push('\n');

    heading(&mut out, "RISK ASSESSMENT");
    let _ = writeln!(out, "Overall Risk: {}", overall_risk.level);
    let _ = writeln!(out, "High Risk Factors: {}", overall_risk.high_risk_count);
    let _ = writeln!(out, "Medium Risk Factors: {}", overall_risk.medium_risk_count);
    let _ = writeln!(out, "Low Risk Factors: {}", overall_risk.low_risk_count);
    out.push('\n');
    for (category, prediction) in &result.risks.risk_predictions {
        let _ = writeln!(
            out,
            "{category}: {}% ({} Risk)",
            prediction.probability, prediction.level
        );
    }
    out.push('\n');

    heading(&mut out, "RECOMMENDATIONS");
    if result.recommendations.is_empty() {
        out.push_str("No recommendations.\n");
    }
    for (i, rec) in result.recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] {}: {}",
            i + 1,
            rec.priority,
            rec.category,
            rec.recommendation
        );
    }
    out.push('\n');

    out.push_str("---\n");
    let _ = writeln!(
        out,
        "This report was generated automatically by the {GENERATOR_NAME}."
    );
    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{Recommendation, RiskLevel};
    use crate::synthetic;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> AnalysisResult {
        synthetic::generate(
            &mut StdRng::seed_from_u64(17),
            "Highway_DPR.pdf",
            synthetic::fixed_instant(),
        )
    }

    #[test]
    fn test_display_name_camel_case() {
        assert_eq!(display_name("DataAccuracy"), "Data Accuracy");
        assert_eq!(display_name("technicalViability"), "Technical Viability");
    }

    #[test]
    fn test_display_name_existing_spaces() {
        assert_eq!(display_name("Budget Realism"), "Budget Realism");
        assert_eq!(display_name("budget Realism"), "Budget Realism");
    }

    #[test]
    fn test_display_name_snake_case() {
        assert_eq!(display_name("data_accuracy"), "Data Accuracy");
        assert_eq!(display_name("compliance"), "Compliance");
    }

    #[test]
    fn test_display_name_empty() {
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_text_sections_in_order() {
        let text = to_text(&sample(), None);
        let headings = [
            REPORT_TITLE,
            "PROJECT INFORMATION",
            "EXECUTIVE SUMMARY",
            "SECTION ANALYSIS",
            "QUALITY METRICS",
            "RISK ASSESSMENT",
            "RECOMMENDATIONS",
            "This report was generated automatically",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| text.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_text_summary_lines_appear_once() {
        let result = sample();
        let text = to_text(&result, None);
        let score_line = format!("Overall Quality Score: {}/100", result.analysis.overall_score);
        assert_eq!(text.matches(&score_line).count(), 1);
        assert_eq!(text.matches("Risk Level: Medium").count(), 1);
        assert!(text.contains("Upload Date: 2024-06-15 09:30:00 UTC"));
        assert!(text.contains("File Name: Highway_DPR.pdf"));
        assert!(text.contains("Sections Found: 8/10"));
    }

    #[test]
    fn test_text_recommendations_once_and_ordered() {
        let result = sample();
        let text = to_text(&result, None);
        let mut last = 0;
        for (i, rec) in result.recommendations.iter().enumerate() {
            let line = format!(
                "{}. [{}] {}: {}",
                i + 1,
                rec.priority,
                rec.category,
                rec.recommendation
            );
            assert_eq!(text.matches(&line).count(), 1, "{line}");
            let at = text.find(&line).unwrap();
            assert!(at > last);
            last = at;
        }
        assert!(text.contains(
            "1. [High] Risk Analysis: Enhance risk analysis section with detailed mitigation strategies"
        ));
    }

    #[test]
    fn test_text_section_and_risk_lines() {
        let result = sample();
        let text = to_text(&result, None);
        for (name, section) in &result.analysis.section_analyses {
            assert!(text.contains(&format!("{name}: {}/100 ({})", section.score, section.status)));
        }
        assert!(text.contains("Data Accuracy: 82/100"));
        assert!(text.contains("Budget Overrun Risk: 70% (High Risk)"));
        assert!(text.contains("Compliance Risk: 25% (Low Risk)"));
        assert!(text.contains("High Risk Factors: 2"));
    }

    #[test]
    fn test_text_without_recommendations() {
        let mut result = sample();
        result.recommendations.clear();
        assert!(to_text(&result, None).contains("No recommendations."));

        result.recommendations.push(Recommendation::new(
            RiskLevel::Low,
            "Legal Framework",
            "Attach clearance letters",
        ));
        let text = to_text(&result, None);
        assert!(!text.contains("No recommendations."));
        assert!(text.contains("1. [Low] Legal Framework: Attach clearance letters"));
    }
}
