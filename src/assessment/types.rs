use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring;

/// Qualitative tier derived from a numeric section score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    Excellent,
    Good,
    Satisfactory,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Poor,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Excellent => "Excellent",
            StatusLabel::Good => "Good",
            StatusLabel::Satisfactory => "Satisfactory",
            StatusLabel::NeedsImprovement => "Needs Improvement",
            StatusLabel::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level for a risk category, a recommendation priority, or the overall assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root entity of one analysis run. Replaced wholesale when a new run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Opaque identifier (e.g. "demo_20240101_120000")
    pub analysis_id: String,
    pub file_info: FileInfo,
    pub analysis: Analysis,
    pub risks: Risks,
    /// Display order; never re-sorted
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    /// Offset-less timestamps are read as UTC
    #[serde(deserialize_with = "lenient_timestamp")]
    pub uploaded_at: DateTime<Utc>,
    /// Size of the uploaded document in bytes
    #[serde(rename = "file_size")]
    pub file_size_bytes: u64,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Round a wire percentage to a whole number in `[0, 100]`.
fn round_percent(value: f64) -> Result<u8, String> {
    let rounded = value.round();
    if (0.0..=100.0).contains(&rounded) {
        Ok(rounded as u8)
    } else {
        Err(format!("{value} is not a percentage in [0, 100]"))
    }
}

/// The analysis service sends one-decimal floats (`63.5`) where exports
/// carry integers; both are accepted.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    round_percent(f64::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

fn percent_map<'de, D>(deserializer: D) -> Result<IndexMap<String, u8>, D::Error>
where
    D: Deserializer<'de>,
{
    IndexMap::<String, f64>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| round_percent(value).map(|percent| (key, percent)))
        .collect::<Result<_, _>>()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(deserialize_with = "percent")]
    pub overall_score: u8,
    #[serde(deserialize_with = "percent")]
    pub completeness_percentage: u8,
    pub sections_found: u32,
    pub total_sections: u32,
    /// Canonical section name -> analysis, in canonical order
    pub section_analyses: IndexMap<String, SectionAnalysis>,
    /// Metric key (e.g. "data_accuracy") -> score
    #[serde(deserialize_with = "percent_map")]
    pub quality_scores: IndexMap<String, u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SectionWire")]
pub struct SectionAnalysis {
    pub score: u8,
    pub completeness: u8,
    pub quality: u8,
    /// Always `scoring::classify(score)`
    pub status: StatusLabel,
}

/// Section as sent by the analysis service, which leaves out `status`.
#[derive(Deserialize)]
struct SectionWire {
    #[serde(deserialize_with = "percent")]
    score: u8,
    #[serde(deserialize_with = "percent")]
    completeness: u8,
    #[serde(deserialize_with = "percent")]
    quality: u8,
    #[serde(default)]
    status: Option<StatusLabel>,
}

impl From<SectionWire> for SectionAnalysis {
    fn from(wire: SectionWire) -> Self {
        Self {
            score: wire.score,
            completeness: wire.completeness,
            quality: wire.quality,
            status: wire
                .status
                .unwrap_or_else(|| scoring::classify(i32::from(wire.score))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risks {
    pub overall_risk: OverallRisk,
    /// Risk category name -> prediction, in category order
    pub risk_predictions: IndexMap<String, RiskPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRisk {
    pub level: RiskLevel,
    pub score: f64,
    /// Absent when the service had no predictions to count
    #[serde(default)]
    pub high_risk_count: u32,
    #[serde(default)]
    pub medium_risk_count: u32,
    #[serde(default)]
    pub low_risk_count: u32,
}

/// Per-category prediction. `level` and `probability` are independent inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    #[serde(deserialize_with = "percent")]
    pub probability: u8,
    pub level: RiskLevel,
    pub severity: RiskLevel,
    #[serde(default)]
    pub primary_factors: Vec<String>,
    #[serde(default)]
    pub mitigation_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: RiskLevel,
    pub category: String,
    pub recommendation: String,
}

impl Recommendation {
    pub fn new(priority: RiskLevel, category: &str, recommendation: &str) -> Self {
        Self {
            priority,
            category: category.to_string(),
            recommendation: recommendation.to_string(),
        }
    }
}
