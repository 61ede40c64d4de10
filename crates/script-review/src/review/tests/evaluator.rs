use serde_json::json;

use super::common::*;
use crate::review::domain::Axis;
use crate::review::error::{ReviewError, ReviewStage};
use crate::review::evaluator::{ComfortEvaluator, EmpathyEvaluator, HumorEvaluator};
use crate::review::generation::{GenerationError, GenerationMode, TextGenerator};
use crate::review::prompts::{REVIEWER_SYSTEM_INSTRUCTION, TEMPERATURE};

fn remote_mode(responses: ScriptedResponses) -> (GenerationMode, std::sync::Arc<ScriptedGenerator>) {
    let generator = ScriptedGenerator::new(responses);
    let shared: std::sync::Arc<dyn TextGenerator> = generator.clone();
    (GenerationMode::Remote(shared), generator)
}

#[tokio::test]
async fn remote_scores_above_range_are_clamped() {
    let (mode, _) = remote_mode(ScriptedResponses {
        comfort: Ok(json!({
            "comfort_score": 14,
            "most_uncomfortable_line": "x",
            "replacement_line": "y",
            "reasoning": "z"
        })
        .to_string()),
        ..ScriptedResponses::default()
    });

    let feedback = ComfortEvaluator::comfort(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect("comfort evaluation succeeds");
    assert_eq!(feedback.score, 10);
}

#[tokio::test]
async fn remote_scores_below_range_are_clamped() {
    let (mode, _) = remote_mode(ScriptedResponses {
        humor: Ok(json!({
            "humor_score": -3.2,
            "problematic_humor": "loser",
            "alternative_punchline": "friend",
            "reasoning": "harsh"
        })
        .to_string()),
        ..ScriptedResponses::default()
    });

    let feedback = HumorEvaluator::humor(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect("humor evaluation succeeds");
    assert_eq!(feedback.score, 1);
}

#[tokio::test]
async fn remote_request_uses_axis_settings() {
    let (mode, generator) = remote_mode(ScriptedResponses::default());

    EmpathyEvaluator::empathy(mode.clone())
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect("empathy evaluation succeeds");
    ComfortEvaluator::comfort(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect("comfort evaluation succeeds");

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].system, REVIEWER_SYSTEM_INSTRUCTION);
    assert_eq!(requests[0].max_tokens, 600);
    assert!((requests[0].temperature - TEMPERATURE).abs() < f32::EPSILON);
    assert!(requests[0].prompt.contains(HARSH_SCRIPT));
    assert!(requests[0].prompt.contains("Must score at least 8/10 for empathy."));
    assert_eq!(requests[1].max_tokens, 500);
}

#[tokio::test]
async fn fenced_payload_is_accepted() {
    let payload = format!(
        "```json\n{}\n```",
        json!({
            "empathy_score": 7,
            "edit_1": "one",
            "edit_2": "two",
            "reasoning": "fenced"
        })
    );
    let (mode, _) = remote_mode(ScriptedResponses {
        empathy: Ok(payload),
        ..ScriptedResponses::default()
    });

    let feedback = EmpathyEvaluator::empathy(mode)
        .evaluate(PRODUCT, GENTLE_SCRIPT, &default_rules())
        .await
        .expect("fenced payload parses");
    assert_eq!(feedback.score, 7);
    assert_eq!(feedback.edit2, "two");
}

#[tokio::test]
async fn unparseable_payload_is_malformed() {
    let (mode, _) = remote_mode(ScriptedResponses {
        comfort: Ok("Sure! The comfort score is 8.".to_string()),
        ..ScriptedResponses::default()
    });

    let err = ComfortEvaluator::comfort(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect_err("prose is not a payload");
    match err {
        ReviewError::MalformedPayload { stage, .. } => {
            assert_eq!(stage, ReviewStage::Evaluation(Axis::Comfort));
        }
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_fields_are_malformed() {
    let (mode, _) = remote_mode(ScriptedResponses {
        humor: Ok(json!({ "humor_score": 9 }).to_string()),
        ..ScriptedResponses::default()
    });

    let err = HumorEvaluator::humor(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect_err("incomplete payload");
    assert!(matches!(err, ReviewError::MalformedPayload { .. }));
}

#[tokio::test]
async fn non_success_status_is_a_remote_call_error() {
    let (mode, _) = remote_mode(ScriptedResponses {
        empathy: Err(GenerationError::Status {
            status: 429,
            body: "rate limited".to_string(),
        }),
        ..ScriptedResponses::default()
    });

    let err = EmpathyEvaluator::empathy(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect_err("status error surfaces");
    match err {
        ReviewError::RemoteCall { stage, source } => {
            assert_eq!(stage, ReviewStage::Evaluation(Axis::Empathy));
            assert_eq!(
                source,
                GenerationError::Status {
                    status: 429,
                    body: "rate limited".to_string()
                }
            );
        }
        other => panic!("expected remote call error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_completion_is_malformed() {
    let (mode, _) = remote_mode(ScriptedResponses {
        comfort: Err(GenerationError::MissingContent),
        ..ScriptedResponses::default()
    });

    let err = ComfortEvaluator::comfort(mode)
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect_err("missing content");
    assert!(matches!(err, ReviewError::MalformedPayload { .. }));
}

#[tokio::test]
async fn heuristic_mode_never_touches_a_generator() {
    let evaluator = HumorEvaluator::humor(GenerationMode::Heuristic);
    assert!(!evaluator.mode().is_remote());
    assert_eq!(evaluator.reviewer(), "Agent_HumorCritic");
    assert_eq!(evaluator.axis(), Axis::Humor);

    let feedback = evaluator
        .evaluate(PRODUCT, HARSH_SCRIPT, &default_rules())
        .await
        .expect("heuristic evaluation succeeds");
    assert!((1..=10).contains(&feedback.score));
}
