//! Structured verdicts returned by the inference service.
//!
//! These types are the contract with the model: payloads are deserialized
//! into them and then range-checked with `validate()`. Anything that does not
//! fit is rejected as a schema failure, never patched up.

use serde::{Deserialize, Serialize};

/// Hiring verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    Hire,
    Maybe,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillType {
    Technical,
    Soft,
}

/// Whether a claimed skill is backed by the work history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    Verified,
    #[serde(rename = "Inflation Risk")]
    InflationRisk,
    #[serde(rename = "Missing Evidence")]
    MissingEvidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    pub score: f64, // 0 – 100
    pub evidence: String,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureFit {
    pub score: f64, // 0 – 100
    pub analysis: String,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveModeling {
    pub performance_prediction: String,
    pub retention_risk: RetentionRisk,
    pub ramp_up_time: String,
    pub trajectory_analysis: String,
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub topic: String,
    pub question: String,
    /// What a strong answer looks like.
    pub rubric: String,
}

/// Full verdict for one résumé against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub extracted_name: String,
    pub recommendation: Recommendation,
    pub confidence_score: f64, // 0 – 100
    pub summary: String,
    pub skills_analysis: Vec<SkillAssessment>,
    pub culture_fit: CultureFit,
    pub predictive_modeling: PredictiveModeling,
    pub interview_guide: Vec<InterviewQuestion>,
}

impl CandidateAnalysis {
    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        check_score("confidence_score", self.confidence_score)?;
        check_score("culture_fit.score", self.culture_fit.score)?;
        for skill in &self.skills_analysis {
            check_score(&format!("skills_analysis[{}].score", skill.name), skill.score)?;
        }
        Ok(())
    }

    /// Extracted name when the model found one.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.extracted_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

fn check_score(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be within 0..=100, got {value}"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Duel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerId {
    #[serde(rename = "candidateA")]
    CandidateA,
    #[serde(rename = "candidateB")]
    CandidateB,
    #[serde(rename = "tie")]
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillWinner {
    A,
    B,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeSkill {
    pub skill: String,
    pub candidate_a_strength: String,
    pub candidate_b_strength: String,
    pub winner: SkillWinner,
}

/// Head-to-head judgment between exactly two candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub winner_id: WinnerId,
    pub winner_name: String,
    pub reasoning: String,
    pub key_differentiators: Vec<String>,
    pub comparative_skills: Vec<ComparativeSkill>,
}

impl ComparisonResult {
    pub fn validate(&self) -> Result<(), String> {
        if self.winner_name.trim().is_empty() {
            return Err("winner_name must not be blank".to_string());
        }
        if self.reasoning.trim().is_empty() {
            return Err("reasoning must not be blank".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A well-formed analysis with the given name and confidence.
    pub fn analysis(name: &str, confidence: f64) -> CandidateAnalysis {
        CandidateAnalysis {
            extracted_name: name.to_string(),
            recommendation: Recommendation::Hire,
            confidence_score: confidence,
            summary: format!("{name} is a solid frontend engineer."),
            skills_analysis: vec![SkillAssessment {
                name: "React".to_string(),
                skill_type: SkillType::Technical,
                score: 80.0,
                evidence: "Scaled React apps at Tech Giant Corp.".to_string(),
                status: SkillStatus::Verified,
            }],
            culture_fit: CultureFit {
                score: 70.0,
                analysis: "Collaborative tone.".to_string(),
                flags: vec![],
            },
            predictive_modeling: PredictiveModeling {
                performance_prediction: "Above average".to_string(),
                retention_risk: RetentionRisk::Low,
                ramp_up_time: "1-2 months".to_string(),
                trajectory_analysis: "Moving toward staff level.".to_string(),
                red_flags: vec![],
            },
            interview_guide: vec![InterviewQuestion {
                topic: "Performance".to_string(),
                question: "How did you improve LCP?".to_string(),
                rubric: "Mentions measurement before optimization.".to_string(),
            }],
        }
    }

    pub fn comparison(winner: WinnerId, winner_name: &str) -> ComparisonResult {
        ComparisonResult {
            winner_id: winner,
            winner_name: winner_name.to_string(),
            reasoning: "Deeper React performance work.".to_string(),
            key_differentiators: vec!["Core Web Vitals experience".to_string()],
            comparative_skills: vec![ComparativeSkill {
                skill: "React".to_string(),
                candidate_a_strength: "Expert".to_string(),
                candidate_b_strength: "Proficient".to_string(),
                winner: SkillWinner::A,
            }],
        }
    }
}
