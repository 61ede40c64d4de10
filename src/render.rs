use std::fmt::Write;

use script_review::review::{EvaluationReport, ReviewStatus};

const RULE_WIDTH: usize = 70;

pub fn render_banner(mode_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "PHARMACEUTICAL INFLUENCER SCRIPT FEEDBACK SYSTEM");
    let _ = writeln!(out, "Comfort, empathy and humor review ({mode_label} mode)");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}

/// Console layout of a finished review: scores first, then the refined
/// script, then the per-axis feedback.
pub fn render_report(report: &EvaluationReport, source: Option<&str>) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    if let Some(source) = source {
        let _ = writeln!(out, "Loaded script: {source}\n");
    }

    let _ = writeln!(out, "EVALUATION RESULTS");
    let _ = writeln!(out, "{rule}");
    let status = match report.status {
        ReviewStatus::Approved => "APPROVED",
        ReviewStatus::NeedsRevision => "NEEDS REVISION",
    };
    let _ = writeln!(out, "\nStatus: {status}");

    let card = report.score_card();
    let _ = writeln!(out, "\nScores vs thresholds");
    for line in &card.lines {
        let _ = writeln!(out, "- {line}");
    }

    let _ = writeln!(out, "\nSummary\n{}", report.summary);

    if !report.refined_script.is_empty() {
        let _ = writeln!(out, "\nREFINED SCRIPT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", report.refined_script);
        let _ = writeln!(out, "{rule}");
    }

    let _ = writeln!(out, "\nDETAILED FEEDBACK");
    let _ = writeln!(out, "{rule}");

    let comfort = &report.evaluations.comfort;
    let _ = writeln!(out, "\nComfort evaluation");
    let _ = writeln!(out, "- score: {}/10", comfort.score);
    let _ = writeln!(out, "- issue: \"{}\"", comfort.flagged_line);
    let _ = writeln!(out, "- fix: \"{}\"", comfort.replacement);
    let _ = writeln!(out, "- why: {}", comfort.reasoning);

    let empathy = &report.evaluations.empathy;
    let _ = writeln!(out, "\nEmpathy evaluation");
    let _ = writeln!(out, "- score: {}/10", empathy.score);
    let _ = writeln!(out, "- edit 1: {}", empathy.edit1);
    let _ = writeln!(out, "- edit 2: {}", empathy.edit2);
    let _ = writeln!(out, "- why: {}", empathy.reasoning);

    let humor = &report.evaluations.humor;
    let _ = writeln!(out, "\nHumor evaluation");
    let _ = writeln!(out, "- score: {}/10", humor.score);
    let _ = writeln!(out, "- issue: {}", humor.flagged_humor);
    let _ = writeln!(out, "- fix: {}", humor.alternative);
    let _ = writeln!(out, "- why: {}", humor.reasoning);

    out
}
