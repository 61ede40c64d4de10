use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{
    AggregatedFeedback, Axis, AxisScores, ComfortFeedback, EmpathyFeedback, HumorFeedback,
    Thresholds,
};

const NEAR_MISS_MARGIN: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Approved,
    NeedsRevision,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::NeedsRevision => "NEEDS_REVISION",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display band for one axis score relative to its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Pass,
    Near,
    Fail,
}

impl ScoreBand {
    pub fn classify(score: u8, threshold: u8) -> Self {
        if score >= threshold {
            ScoreBand::Pass
        } else if score.saturating_add(NEAR_MISS_MARGIN) >= threshold {
            ScoreBand::Near
        } else {
            ScoreBand::Fail
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ScoreBand::Pass => "✓",
            ScoreBand::Near => "◐",
            ScoreBand::Fail => "✗",
        }
    }
}

/// Per-axis detail as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisEvaluations {
    pub comfort: ComfortFeedback,
    pub empathy: EmpathyFeedback,
    pub humor: HumorFeedback,
}

/// Final output of one review. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub status: ReviewStatus,
    pub scores: AxisScores,
    pub thresholds: Thresholds,
    pub evaluations: AxisEvaluations,
    pub refined_script: String,
    pub summary: String,
}

impl EvaluationReport {
    pub(crate) fn assemble(
        feedback: AggregatedFeedback,
        thresholds: Thresholds,
        refined_script: String,
    ) -> Self {
        let scores = feedback.scores();
        let status = if feedback.approved {
            ReviewStatus::Approved
        } else {
            ReviewStatus::NeedsRevision
        };

        Self {
            status,
            scores,
            thresholds,
            summary: summarize(&scores, &thresholds),
            evaluations: AxisEvaluations {
                comfort: feedback.comfort,
                empathy: feedback.empathy,
                humor: feedback.humor,
            },
            refined_script,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    pub fn band(&self, axis: Axis) -> ScoreBand {
        ScoreBand::classify(self.scores.get(axis), self.thresholds.get(axis))
    }

    /// `"<axis>: <score>/<threshold>"` for every axis below its threshold.
    pub fn issues(&self) -> Vec<String> {
        Axis::ordered()
            .into_iter()
            .filter(|axis| self.scores.get(*axis) < self.thresholds.get(*axis))
            .map(|axis| {
                format!(
                    "{axis}: {}/{}",
                    self.scores.get(axis),
                    self.thresholds.get(axis)
                )
            })
            .collect()
    }

    /// Compact pass/fail digest of the report.
    pub fn score_card(&self) -> ScoreCard {
        ScoreCard {
            headline: format!("Evaluation complete: {}", self.status),
            lines: Axis::ordered()
                .into_iter()
                .map(|axis| ScoreLine {
                    axis,
                    score: self.scores.get(axis),
                    threshold: self.thresholds.get(axis),
                    band: self.band(axis),
                })
                .collect(),
            passed: self.is_approved(),
            issues: self.issues(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub headline: String,
    pub lines: Vec<ScoreLine>,
    pub passed: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub axis: Axis,
    pub score: u8,
    pub threshold: u8,
    pub band: ScoreBand,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}/10 (threshold: {}/10)",
            self.band.symbol(),
            self.axis.title(),
            self.score,
            self.threshold
        )
    }
}

/// One sentence per failing axis, or a single affirmative sentence.
pub fn summarize(scores: &AxisScores, thresholds: &Thresholds) -> String {
    let sentences: Vec<String> = Axis::ordered()
        .into_iter()
        .filter(|axis| scores.get(*axis) < thresholds.get(*axis))
        .map(|axis| {
            format!(
                "{} score ({}/10) below threshold ({}/10). {}",
                axis.title(),
                scores.get(axis),
                thresholds.get(axis),
                remediation_hint(axis)
            )
        })
        .collect();

    if sentences.is_empty() {
        "✓ All scores meet or exceed thresholds. Script is ready for use.".to_string()
    } else {
        sentences.join(" ")
    }
}

fn remediation_hint(axis: Axis) -> &'static str {
    match axis {
        Axis::Comfort => "Consider replacing embarrassing language.",
        Axis::Empathy => "Add more supportive, understanding language.",
        Axis::Humor => "Adjust humor to be more appropriate for pharmaceutical context.",
    }
}
