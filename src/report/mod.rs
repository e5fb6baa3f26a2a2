pub mod text;

pub use text::{display_name, to_text};

use crate::assessment::{AnalysisResult, RiskLevel, StatusLabel};
use crate::scoring::{recommendations, risk};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to (de)serialize analysis data: {0}")]
    Json(#[from] serde_json::Error),
}

const FILENAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Pretty-printed JSON of the whole result, two-space indented.
///
/// Key order is fixed by the struct layout and map insertion order, so
/// parsing the output and exporting again yields identical bytes.
pub fn to_structured(result: &AnalysisResult) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Parse a structured export (or a backend payload) back into a result.
pub fn from_structured(json: &str) -> Result<AnalysisResult, ReportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn structured_filename(at: DateTime<Utc>) -> String {
    format!("DPR_Analysis_Data_{}.json", at.format(FILENAME_TIMESTAMP))
}

pub fn text_filename(at: DateTime<Utc>) -> String {
    format!("DPR_Analysis_Report_{}.txt", at.format(FILENAME_TIMESTAMP))
}

/// Paths of the files written by [`write_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub structured: PathBuf,
    pub text: PathBuf,
}

/// Write both the JSON export and the text report into `dir`.
#[instrument(skip(result, notice), fields(analysis_id = %result.analysis_id, dir = %dir.display()))]
///
/// `notice` is carried into the text report; the JSON export stays a
/// plain result.
pub fn write_exports(
    result: &AnalysisResult,
    notice: Option<&str>,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<ExportPaths, ReportError> {
    std::fs::create_dir_all(dir)?;

    let structured = dir.join(structured_filename(at));
    std::fs::write(&structured, to_structured(result)?)?;
    debug!(path = %structured.display(), "wrote structured export");

    let text = dir.join(text_filename(at));
    std::fs::write(&text, to_text(result, notice))?;
    debug!(path = %text.display(), "wrote text report");

    Ok(ExportPaths { structured, text })
}

/// Print a colored summary of the result to the terminal.
///
/// With `detailed`, every section also gets its recommendation, narrative
/// and detected issues.
pub fn print_summary(result: &AnalysisResult, detailed: bool) {
    let analysis = &result.analysis;
    let overall_risk = &result.risks.overall_risk;

    println!();
    println!(
        "{} ({})",
        result.file_info.filename.bold(),
        result.analysis_id
    );
    println!(
        "Overall score: {} | Completeness: {}% | Sections: {}/{}",
        colorize_status(
            &format!("{}/100", analysis.overall_score),
            crate::scoring::classify(i32::from(analysis.overall_score))
        ),
        analysis.completeness_percentage,
        analysis.sections_found,
        analysis.total_sections
    );
    println!();

    println!("═══ Section Analysis ═══");
    for (name, section) in &analysis.section_analyses {
        println!(
            "  {:<26} {:>3}/100  {}",
            name,
            section.score,
            colorize_status(section.status.as_str(), section.status)
        );
        if detailed {
            let score = i32::from(section.score);
            println!("      {}", recommendations::recommend(name, score).dimmed());
            println!("      {}", recommendations::detailed_analysis(name, score).dimmed());
            for issue in recommendations::section_issues(name, score, i32::from(section.completeness)) {
                println!("      {} {}", "!".yellow(), issue);
            }
        }
    }
    println!();

    println!("═══ Quality Metrics ═══");
    for (metric, score) in &analysis.quality_scores {
        println!("  {:<26} {:>3}/100", display_name(metric), score);
    }
    println!();

    println!(
        "═══ Risk Assessment: {} ═══",
        colorize_risk(overall_risk.level)
    );
    println!("  {}", risk::describe(overall_risk.level));
    println!(
        "  {}",
        risk::risk_summary(&result.risks.risk_predictions, overall_risk)
    );
    for (category, prediction) in &result.risks.risk_predictions {
        println!(
            "  • {:<30} {:>3}%  {}",
            category,
            prediction.probability,
            colorize_risk(prediction.level)
        );
    }
    println!();

    println!("═══ Recommendations ═══");
    if result.recommendations.is_empty() {
        println!("  No recommendations.");
    }
    for (i, rec) in result.recommendations.iter().enumerate() {
        println!(
            "  {}. [{}] {}: {}",
            i + 1,
            colorize_risk(rec.priority),
            rec.category,
            rec.recommendation
        );
    }
    println!();
}

/// Helper to colorize a risk level string for terminal output.
fn colorize_risk(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::High => "HIGH".red().bold(),
        RiskLevel::Medium => "MEDIUM".yellow().bold(),
        RiskLevel::Low => "LOW".green().bold(),
    }
}

fn colorize_status(text: &str, status: StatusLabel) -> colored::ColoredString {
    match status {
        StatusLabel::Excellent | StatusLabel::Good => text.green(),
        StatusLabel::Satisfactory => text.normal(),
        StatusLabel::NeedsImprovement => text.yellow(),
        StatusLabel::Poor => text.red(),
    }
}
