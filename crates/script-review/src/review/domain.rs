use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ReviewDefaults;

/// Sentinel reported when no problematic humor was found.
pub const NO_FLAGGED_HUMOR: &str = "none";
/// Alternative reported alongside [`NO_FLAGGED_HUMOR`].
pub const NO_CHANGES_NEEDED: &str = "no changes needed";

/// One of the three independent review dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Comfort,
    Empathy,
    Humor,
}

impl Axis {
    pub fn ordered() -> [Axis; 3] {
        [Axis::Comfort, Axis::Empathy, Axis::Humor]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::Comfort => "comfort",
            Axis::Empathy => "empathy",
            Axis::Humor => "humor",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Axis::Comfort => "Comfort",
            Axis::Empathy => "Empathy",
            Axis::Humor => "Humor",
        }
    }

    /// Documented minimum passing score used when a request leaves the axis unset.
    pub fn default_threshold(&self) -> u8 {
        match self {
            Axis::Comfort => 7,
            Axis::Empathy => 8,
            Axis::Humor => 7,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved minimum passing score per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub comfort: u8,
    pub empathy: u8,
    pub humor: u8,
}

impl Thresholds {
    pub fn standard() -> Self {
        Self {
            comfort: Axis::Comfort.default_threshold(),
            empathy: Axis::Empathy.default_threshold(),
            humor: Axis::Humor.default_threshold(),
        }
    }

    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Comfort => self.comfort,
            Axis::Empathy => self.empathy,
            Axis::Humor => self.humor,
        }
    }

    /// Overlays the fields a caller supplied; absent fields keep `self`.
    pub fn with_overrides(&self, overrides: &ThresholdOverrides) -> Self {
        Self {
            comfort: overrides.comfort.unwrap_or(self.comfort),
            empathy: overrides.empathy.unwrap_or(self.empathy),
            humor: overrides.humor.unwrap_or(self.humor),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Partially specified thresholds as they arrive on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub comfort: Option<u8>,
    #[serde(default)]
    pub empathy: Option<u8>,
    #[serde(default)]
    pub humor: Option<u8>,
}

impl ThresholdOverrides {
    pub(crate) fn supplied(&self) -> impl Iterator<Item = (Axis, u8)> + '_ {
        Axis::ordered().into_iter().filter_map(|axis| {
            let value = match axis {
                Axis::Comfort => self.comfort,
                Axis::Empathy => self.empathy,
                Axis::Humor => self.humor,
            };
            value.map(|value| (axis, value))
        })
    }
}

/// The `rules` object of a submission before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverrides {
    #[serde(default)]
    pub threshold: Option<ThresholdOverrides>,
    #[serde(default)]
    pub forbidden_tones: Option<Vec<String>>,
}

/// Thresholds and forbidden tones every evaluator reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    pub thresholds: Thresholds,
    pub forbidden_tones: Vec<String>,
}

impl RulesConfig {
    /// Missing thresholds fall back per axis; a missing or empty tone list
    /// falls back to the default list.
    pub fn resolve(overrides: &RuleOverrides, defaults: &ReviewDefaults) -> Self {
        let thresholds = match &overrides.threshold {
            Some(threshold) => defaults.thresholds.with_overrides(threshold),
            None => defaults.thresholds,
        };

        let forbidden_tones = match &overrides.forbidden_tones {
            Some(tones) if tones.iter().any(|tone| !tone.trim().is_empty()) => tones
                .iter()
                .filter(|tone| !tone.trim().is_empty())
                .cloned()
                .collect(),
            _ => defaults.forbidden_tones.clone(),
        };

        Self {
            thresholds,
            forbidden_tones,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::resolve(&RuleOverrides::default(), &ReviewDefaults::standard())
    }
}

/// Loosely typed wire input; the request guard turns it into an
/// [`EvaluationRequest`] or a validation error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSubmission {
    #[serde(default)]
    pub product: Option<Value>,
    #[serde(default)]
    pub raw_script: Option<Value>,
    #[serde(default)]
    pub rules: Option<Value>,
    /// Caller-side settings carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ScriptSubmission {
    pub fn new(product: &str, raw_script: &str, rules: &RuleOverrides) -> Self {
        let rules =
            serde_json::to_value(rules).unwrap_or_else(|_| Value::Object(Default::default()));

        Self {
            product: Some(Value::String(product.to_string())),
            raw_script: Some(Value::String(raw_script.to_string())),
            rules: Some(rules),
            config: None,
        }
    }
}

/// Validated, immutable input shared by all three evaluators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub product: String,
    pub raw_script: String,
    pub rules: RulesConfig,
}

/// Behavior shared by the per-axis feedback records.
pub trait AxisFeedback:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    fn score(&self) -> u8;

    /// Forces the score back into `[1, 10]`.
    fn clamped(self) -> Self;
}

/// Rounds and bounds any numeric score to the 1-10 scale.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 1;
    }
    raw.round().clamp(1.0, 10.0) as u8
}

mod score_field {
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(super::clamp_score(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfortFeedback {
    #[serde(rename = "comfort_score", deserialize_with = "score_field::deserialize")]
    pub score: u8,
    #[serde(rename = "most_uncomfortable_line")]
    pub flagged_line: String,
    #[serde(rename = "replacement_line")]
    pub replacement: String,
    pub reasoning: String,
}

impl AxisFeedback for ComfortFeedback {
    fn score(&self) -> u8 {
        self.score
    }

    fn clamped(self) -> Self {
        Self {
            score: clamp_score(f64::from(self.score)),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpathyFeedback {
    #[serde(rename = "empathy_score", deserialize_with = "score_field::deserialize")]
    pub score: u8,
    #[serde(rename = "edit_1")]
    pub edit1: String,
    #[serde(rename = "edit_2")]
    pub edit2: String,
    pub reasoning: String,
}

impl AxisFeedback for EmpathyFeedback {
    fn score(&self) -> u8 {
        self.score
    }

    fn clamped(self) -> Self {
        Self {
            score: clamp_score(f64::from(self.score)),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumorFeedback {
    #[serde(rename = "humor_score", deserialize_with = "score_field::deserialize")]
    pub score: u8,
    #[serde(rename = "problematic_humor")]
    pub flagged_humor: String,
    #[serde(rename = "alternative_punchline")]
    pub alternative: String,
    pub reasoning: String,
}

impl HumorFeedback {
    /// False for the `"none"` sentinel and for blank values.
    pub fn has_flag(&self) -> bool {
        let flagged = self.flagged_humor.trim();
        !flagged.is_empty() && !flagged.eq_ignore_ascii_case(NO_FLAGGED_HUMOR)
    }
}

impl AxisFeedback for HumorFeedback {
    fn score(&self) -> u8 {
        self.score
    }

    fn clamped(self) -> Self {
        Self {
            score: clamp_score(f64::from(self.score)),
            ..self
        }
    }
}

/// Per-axis scores in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScores {
    pub comfort: u8,
    pub empathy: u8,
    pub humor: u8,
}

impl AxisScores {
    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Comfort => self.comfort,
            Axis::Empathy => self.empathy,
            Axis::Humor => self.humor,
        }
    }

    pub fn meets(&self, thresholds: &Thresholds) -> bool {
        Axis::ordered()
            .into_iter()
            .all(|axis| self.get(axis) >= thresholds.get(axis))
    }
}

/// The three feedback records plus the derived approval flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedFeedback {
    pub comfort: ComfortFeedback,
    pub empathy: EmpathyFeedback,
    pub humor: HumorFeedback,
    pub approved: bool,
}

impl AggregatedFeedback {
    pub fn new(
        comfort: ComfortFeedback,
        empathy: EmpathyFeedback,
        humor: HumorFeedback,
        thresholds: &Thresholds,
    ) -> Self {
        let scores = AxisScores {
            comfort: comfort.score,
            empathy: empathy.score,
            humor: humor.score,
        };

        Self {
            comfort,
            empathy,
            humor,
            approved: scores.meets(thresholds),
        }
    }

    pub fn scores(&self) -> AxisScores {
        AxisScores {
            comfort: self.comfort.score,
            empathy: self.empathy.score,
            humor: self.humor.score,
        }
    }
}
