//! Synthetic analysis results for demo mode and backend fallback.
//!
//! Output is a template plus random section variance. The random source is
//! always injected so a fixed seed reproduces the exact same result.

mod template;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::Rng;
use tracing::debug;

use crate::assessment::{AnalysisResult, FileInfo, SectionAnalysis, CANONICAL_SECTIONS};
use crate::scoring;

pub use template::DEMO_FILENAME;

/// Ranges driving the synthetic scores.
///
/// Inclusive ranges are written `min..=max`, half-open ones `min..max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceProfile {
    /// Overall score, drawn from `base_min..=base_max`
    pub base_min: i32,
    pub base_max: i32,
    /// Per-section offset, drawn from `-section_variance..=section_variance`
    pub section_variance: i32,
    /// Clamp applied to each section score
    pub score_floor: i32,
    pub score_ceiling: i32,
    /// Added to the score for completeness, drawn from `lift.0..lift.1`
    pub completeness_lift: (i32, i32),
    /// Subtracted from the score for quality, drawn from `drop.0..drop.1`
    pub quality_drop: (i32, i32),
    pub quality_floor: i32,
}

impl VarianceProfile {
    pub const DEFAULT: VarianceProfile = VarianceProfile {
        base_min: 65,
        base_max: 90,
        section_variance: 15,
        score_floor: 40,
        score_ceiling: 95,
        completeness_lift: (-5, 15),
        quality_drop: (0, 15),
        quality_floor: 30,
    };
}

impl Default for VarianceProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Generate a complete result using the default variance profile.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    filename: &str,
    at: DateTime<Utc>,
) -> AnalysisResult {
    generate_with(rng, filename, at, &VarianceProfile::DEFAULT)
}

pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    filename: &str,
    at: DateTime<Utc>,
    profile: &VarianceProfile,
) -> AnalysisResult {
    let base = rng.gen_range(profile.base_min..=profile.base_max);

    let mut sections = IndexMap::with_capacity(CANONICAL_SECTIONS.len());
    for name in CANONICAL_SECTIONS {
        let section = draw_section(rng, base, profile);
        debug!(section = name, score = section.score, status = %section.status, "synthetic section");
        sections.insert(name.to_string(), section);
    }

    let mut result = template::canonical();
    result.analysis_id = format!("demo_{}", at.format("%Y%m%d_%H%M%S"));
    result.file_info = FileInfo {
        filename: filename.to_string(),
        uploaded_at: at,
        file_size_bytes: result.file_info.file_size_bytes,
    };
    result.analysis.overall_score = to_percent(base);
    result.analysis.section_analyses = sections;
    result
}

fn draw_section<R: Rng + ?Sized>(rng: &mut R, base: i32, profile: &VarianceProfile) -> SectionAnalysis {
    let variance = rng.gen_range(-profile.section_variance..=profile.section_variance);
    let score = (base + variance).clamp(profile.score_floor, profile.score_ceiling);

    let (lift_min, lift_max) = profile.completeness_lift;
    let completeness = (score + rng.gen_range(lift_min..lift_max)).clamp(0, 100);

    let (drop_min, drop_max) = profile.quality_drop;
    let quality = (score - rng.gen_range(drop_min..drop_max)).clamp(profile.quality_floor, 100);

    SectionAnalysis {
        score: to_percent(score),
        completeness: to_percent(completeness),
        quality: to_percent(quality),
        status: scoring::classify(score),
    }
}

fn to_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Deterministic instant for tests that need a generation time.
#[cfg(test)]
pub fn fixed_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-15T09:30:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap()
}
