use crate::assessment::{Analysis, Recommendation, RiskLevel, StatusLabel};

use super::classify;

/// Advice for a section name outside the canonical list.
pub const GENERIC_RECOMMENDATION: &str = "Enhance section quality and completeness";

pub const PRIORITY_PREFIX: &str = "Priority action needed: ";
pub const SUGGESTION_PREFIX: &str = "Improvement suggested: ";
pub const STANDARDS_MET_PREFIX: &str = "Section meets standards. Consider: ";

/// Base recommendation for a section, before any severity prefix.
pub fn base_recommendation(section: &str) -> &'static str {
    match section {
        "Context/Background" => "Include sectoral policy references and strategic importance",
        "Problems Addressed" => "Provide comprehensive baseline data with statistical evidence",
        "Project Objectives" => "Define clear, measurable, and time-bound objectives",
        "Technology Issues" => "Add technical feasibility analysis and technology justification",
        "Management Arrangements" => "Detail organizational structure and monitoring framework",
        "Means of Finance" => "Include detailed budget breakdown with market-based estimates",
        "Time Frame" => "Provide realistic timeline with PERT/CPM analysis",
        "Target Beneficiaries" => "Conduct comprehensive stakeholder analysis",
        "Legal Framework" => "Ensure all regulatory requirements are addressed",
        "Risk Analysis" => "Develop comprehensive risk register with mitigation plans",
        _ => GENERIC_RECOMMENDATION,
    }
}

/// Severity phrase for a score. Bands: <60, 60..75, >=75.
pub fn severity_prefix(score: i32) -> &'static str {
    if score < 60 {
        PRIORITY_PREFIX
    } else if score < 75 {
        SUGGESTION_PREFIX
    } else {
        STANDARDS_MET_PREFIX
    }
}

/// Final recommendation text for a section at a given score.
pub fn recommend(section: &str, score: i32) -> String {
    format!("{}{}", severity_prefix(score), base_recommendation(section))
}

/// Longer narrative for a section, keyed by the status band of `score`.
///
/// Independent of [`recommend`]; the two are shown side by side.
pub fn detailed_analysis(section: &str, score: i32) -> &'static str {
    use StatusLabel::*;

    let band = classify(score);
    match (section, band) {
        ("Context/Background", Excellent) => "The background is well anchored in sectoral policy and clearly argues the strategic importance of the project.",
        ("Context/Background", Good) => "The background covers the policy context adequately, though links to regional development priorities could be sharper.",
        ("Context/Background", Satisfactory) => "The background describes the setting but only loosely connects the project to sector policy and strategy.",
        ("Context/Background", NeedsImprovement) => "The background is thin on policy references and does not establish why the project matters now.",
        ("Context/Background", Poor) => "The background is largely missing; the report gives no policy or strategic context for the project.",

        ("Problems Addressed", Excellent) => "Problems are stated precisely and backed by baseline data and statistical evidence.",
        ("Problems Addressed", Good) => "Problems are clearly identified with some supporting data; a few claims lack quantified baselines.",
        ("Problems Addressed", Satisfactory) => "Problems are listed but the baseline evidence is partial and mostly qualitative.",
        ("Problems Addressed", NeedsImprovement) => "Problem statements are generic and not supported by baseline figures or surveys.",
        ("Problems Addressed", Poor) => "The report does not identify the problems the project is meant to address.",

        ("Project Objectives", Excellent) => "Objectives are specific, measurable, and time-bound, with clear deliverables and outcomes.",
        ("Project Objectives", Good) => "Objectives are well defined; some targets would benefit from explicit indicators.",
        ("Project Objectives", Satisfactory) => "Objectives are stated but several are not measurable or lack target dates.",
        ("Project Objectives", NeedsImprovement) => "Objectives are vague and cannot be used to track project outcomes.",
        ("Project Objectives", Poor) => "No usable project objectives are defined.",

        ("Technology Issues", Excellent) => "Technology choices are justified with feasibility analysis, specifications, and architecture.",
        ("Technology Issues", Good) => "The technical approach is sound; alternatives and integration risks are only briefly discussed.",
        ("Technology Issues", Satisfactory) => "Technology is described but feasibility and justification are incomplete.",
        ("Technology Issues", NeedsImprovement) => "Technical details are sparse and the choice of technology is not justified.",
        ("Technology Issues", Poor) => "The report does not address technology or technical feasibility.",

        ("Management Arrangements", Excellent) => "Organizational structure, roles, and monitoring arrangements are fully specified.",
        ("Management Arrangements", Good) => "Management arrangements are clear; the monitoring framework could be more detailed.",
        ("Management Arrangements", Satisfactory) => "The implementing agency is named but roles and responsibilities are loosely defined.",
        ("Management Arrangements", NeedsImprovement) => "Governance and monitoring arrangements are largely unspecified.",
        ("Management Arrangements", Poor) => "No management or governance arrangements are described.",

        ("Means of Finance", Excellent) => "The budget is broken down in detail with market-based estimates and identified funding sources.",
        ("Means of Finance", Good) => "Costs and funding are well covered; contingency provisions are light.",
        ("Means of Finance", Satisfactory) => "A budget is present but estimates are aggregated and not tied to market rates.",
        ("Means of Finance", NeedsImprovement) => "Financial information is incomplete and cost estimates are not substantiated.",
        ("Means of Finance", Poor) => "The report gives no usable budget or financing plan.",

        ("Time Frame", Excellent) => "The schedule is realistic, phased, and supported by milestones and critical path analysis.",
        ("Time Frame", Good) => "Timelines and milestones are defined; buffers for approvals are limited.",
        ("Time Frame", Satisfactory) => "A schedule exists but milestones are coarse and dependencies are not analysed.",
        ("Time Frame", NeedsImprovement) => "The timeline is optimistic and lacks milestones or phase boundaries.",
        ("Time Frame", Poor) => "No implementation timeline is provided.",

        ("Target Beneficiaries", Excellent) => "Beneficiaries and stakeholders are identified and the expected impact on each is quantified.",
        ("Target Beneficiaries", Good) => "Target groups are clearly described; impact estimates are partly qualitative.",
        ("Target Beneficiaries", Satisfactory) => "Beneficiaries are named but stakeholder analysis is limited.",
        ("Target Beneficiaries", NeedsImprovement) => "Beneficiary groups are vague and the expected impact is not assessed.",
        ("Target Beneficiaries", Poor) => "The report does not say who benefits from the project.",

        ("Legal Framework", Excellent) => "All regulatory requirements, clearances, and approvals are identified with their status.",
        ("Legal Framework", Good) => "The legal framework is covered; a few clearances lack timelines.",
        ("Legal Framework", Satisfactory) => "Key regulations are mentioned but required approvals are not tracked.",
        ("Legal Framework", NeedsImprovement) => "Compliance requirements are only partially identified.",
        ("Legal Framework", Poor) => "The legal and regulatory framework is not addressed.",

        ("Risk Analysis", Excellent) => "A complete risk register with likelihood, impact, owners, and mitigation plans is included.",
        ("Risk Analysis", Good) => "Major risks are identified with mitigation; contingency planning is brief.",
        ("Risk Analysis", Satisfactory) => "Risks are listed but mitigation strategies are generic.",
        ("Risk Analysis", NeedsImprovement) => "Risk identification is incomplete and mitigation is largely missing.",
        ("Risk Analysis", Poor) => "The report contains no meaningful risk analysis.",

        (_, Excellent) => "This section is thorough and meets assessment standards.",
        (_, Good) => "This section is well developed with minor gaps.",
        (_, Satisfactory) => "This section is adequate but several elements are underdeveloped.",
        (_, NeedsImprovement) => "This section has significant gaps in coverage and quality.",
        (_, Poor) => "This section is missing or falls well short of requirements.",
    }
}

/// Issues detected for a section from its score and completeness.
pub fn section_issues(section: &str, score: i32, completeness: i32) -> Vec<String> {
    let mut issues = Vec::new();

    if score < 50 {
        issues.push(format!("Low content quality in {section}"));
    }
    if completeness < 60 {
        issues.push(format!("Incomplete coverage of {section} requirements"));
    }
    if section == "Risk Analysis" && score < 70 {
        issues.push("Insufficient risk identification and mitigation strategies".to_string());
    }
    if section == "Means of Finance" && score < 70 {
        issues.push("Budget details and cost estimates need improvement".to_string());
    }

    issues
}

const MAX_DERIVED: usize = 5;
const MAX_SECTION_PRIORITIES: usize = 3;

/// Build a priority-ordered recommendation list from section scores.
///
/// Used when a backend result arrives without recommendations.
pub fn derive_recommendations(analysis: &Analysis) -> Vec<Recommendation> {
    let mut weak: Vec<(&String, u8)> = analysis
        .section_analyses
        .iter()
        .filter(|(_, section)| section.score < 65)
        .map(|(name, section)| (name, section.score))
        .collect();
    // stable: equal scores keep section order
    weak.sort_by_key(|(_, score)| *score);

    let mut recommendations: Vec<Recommendation> = weak
        .into_iter()
        .take(MAX_SECTION_PRIORITIES)
        .map(|(name, score)| {
            let priority = if score < 50 {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            };
            Recommendation {
                priority,
                category: name.clone(),
                recommendation: format!("Improve {name} section to meet MDoNER standards"),
            }
        })
        .collect();

    if analysis.overall_score < 70 {
        recommendations.push(Recommendation::new(
            RiskLevel::High,
            "Overall Quality",
            "Comprehensive review and enhancement required across multiple sections",
        ));
    }

    let tech_score = analysis
        .section_analyses
        .get("Technology Issues")
        .map(|s| s.score)
        .unwrap_or(0);
    if tech_score < 70 {
        recommendations.push(Recommendation::new(
            RiskLevel::Medium,
            "Technical Feasibility",
            "Include detailed technical feasibility study and technology validation",
        ));
    }

    recommendations.truncate(MAX_DERIVED);
    recommendations
}
