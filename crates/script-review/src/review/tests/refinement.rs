use std::sync::Arc;

use super::common::*;
use crate::review::domain::{
    AggregatedFeedback, ComfortFeedback, EmpathyFeedback, HumorFeedback, ThresholdOverrides,
    Thresholds, NO_CHANGES_NEEDED, NO_FLAGGED_HUMOR,
};
use crate::review::error::{ReviewError, ReviewStage};
use crate::review::generation::{GenerationError, GenerationMode, TextGenerator};
use crate::review::heuristics::empathy::{
    ACKNOWLEDGE_STRUGGLE_EDIT, COMMUNITY_EDIT, REFRAME_STATEMENT_EDIT, VALIDATION_EDIT,
};
use crate::review::prompts::{REFINEMENT_MAX_TOKENS, REFINER_SYSTEM_INSTRUCTION};
use crate::review::refinement::{patch_script, RefinementEngine};

fn feedback(
    flagged_line: &str,
    replacement: &str,
    edits: (&str, &str),
    flagged_humor: &str,
    alternative: &str,
) -> AggregatedFeedback {
    AggregatedFeedback::new(
        ComfortFeedback {
            score: 5,
            flagged_line: flagged_line.to_string(),
            replacement: replacement.to_string(),
            reasoning: "comfort".to_string(),
        },
        EmpathyFeedback {
            score: 6,
            edit1: edits.0.to_string(),
            edit2: edits.1.to_string(),
            reasoning: "empathy".to_string(),
        },
        HumorFeedback {
            score: 5,
            flagged_humor: flagged_humor.to_string(),
            alternative: alternative.to_string(),
            reasoning: "humor".to_string(),
        },
        &Thresholds::standard(),
    )
}

#[test]
fn verbatim_comfort_line_is_replaced() {
    let script = "Tired of that gross rash? We have answers.";
    let patched = patch_script(
        script,
        &feedback(
            "that gross rash",
            "that challenging rash",
            (ACKNOWLEDGE_STRUGGLE_EDIT, "Mention friends."),
            NO_FLAGGED_HUMOR,
            NO_CHANGES_NEEDED,
        ),
    );

    assert_eq!(patched, "Tired of that challenging rash? We have answers.");
}

#[test]
fn only_first_occurrence_is_replaced() {
    let script = "loser talk. loser talk.";
    let patched = patch_script(
        script,
        &feedback(
            "",
            "",
            ("Keep it.", "Keep it."),
            "loser",
            "friend",
        ),
    );
    assert_eq!(patched, "friend talk. loser talk.");
}

#[test]
fn missing_flagged_phrase_is_a_no_op() {
    let script = "Nothing to see here.";
    let patched = patch_script(
        script,
        &feedback(
            "not in the script",
            "whatever",
            ("Keep it.", "Keep it."),
            "also absent",
            "anything",
        ),
    );
    assert_eq!(patched, script);
}

#[test]
fn reframe_edit_rewrites_treatment_claim() {
    let script = "This product treats eczema fast.";
    let patched = patch_script(
        script,
        &feedback(
            "",
            "",
            (REFRAME_STATEMENT_EDIT, VALIDATION_EDIT),
            NO_FLAGGED_HUMOR,
            NO_CHANGES_NEEDED,
        ),
    );
    assert_eq!(
        patched,
        "This product helps you manage your condition with confidence eczema fast."
    );
}

#[test]
fn community_edit_inserts_journey_line() {
    let script = "Line one.\nLine two.\nLine three.";
    let patched = patch_script(
        script,
        &feedback(
            "",
            "",
            (ACKNOWLEDGE_STRUGGLE_EDIT, COMMUNITY_EDIT),
            NO_FLAGGED_HUMOR,
            NO_CHANGES_NEEDED,
        ),
    );
    assert_eq!(
        patched,
        "Line one.\nLine two.\n\nYou're not alone in this journey—thousands of people have found relief using our product.\nLine three."
    );
}

#[test]
fn validation_reports_merged_thresholds() {
    let engine = RefinementEngine::new(GenerationMode::Heuristic);
    let validation = engine.validate_refined_script(
        "refined",
        Some(&ThresholdOverrides {
            empathy: Some(9),
            ..ThresholdOverrides::default()
        }),
    );

    assert!(validation.is_valid);
    assert_eq!(
        validation.thresholds,
        Thresholds {
            comfort: 7,
            empathy: 9,
            humor: 7
        }
    );
    assert!(validation.notes.contains("run the refined script"));

    let defaults = engine.validate_refined_script("refined", None);
    assert_eq!(defaults.thresholds, Thresholds::standard());
}

#[tokio::test]
async fn remote_refinement_trims_generator_output() {
    let generator = ScriptedGenerator::new(ScriptedResponses::default());
    let shared: Arc<dyn TextGenerator> = generator.clone();
    let engine = RefinementEngine::new(GenerationMode::Remote(shared));

    let refined = engine
        .refine(
            HARSH_SCRIPT,
            &feedback("gross", "challenging", ("a", "b"), "loser", "friend"),
        )
        .await
        .expect("refinement succeeds");

    assert_eq!(refined, "A kinder script.");
    let requests = generator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system, REFINER_SYSTEM_INSTRUCTION);
    assert_eq!(requests[0].max_tokens, REFINEMENT_MAX_TOKENS);
    assert!(requests[0].prompt.contains("--- QUALITY FEEDBACK ---"));
    assert!(requests[0].prompt.contains("- Problematic humor: loser"));
}

#[tokio::test]
async fn remote_refinement_failure_names_stage() {
    let generator = ScriptedGenerator::new(ScriptedResponses {
        refined: Err(GenerationError::Transport("connection reset".to_string())),
        ..ScriptedResponses::default()
    });
    let shared: Arc<dyn TextGenerator> = generator;
    let engine = RefinementEngine::new(GenerationMode::Remote(shared));

    let err = engine
        .refine(
            HARSH_SCRIPT,
            &feedback("gross", "challenging", ("a", "b"), "loser", "friend"),
        )
        .await
        .expect_err("transport failure surfaces");
    assert_eq!(err.stage(), Some(ReviewStage::Refinement));
    assert!(matches!(err, ReviewError::RemoteCall { .. }));
}
