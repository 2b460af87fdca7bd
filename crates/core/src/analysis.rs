//! Boundary with the skin analysis provider.
//!
//! Providers return a flat record whose score fields may be numbers, numeric
//! strings or coarse bands. [`RawAnalysis::scores`] turns that record into
//! [`AnalysisScores`]; anything it cannot read becomes "no data".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::scores::{AnalysisScores, MAX_SCORE, MIN_SCORE};
use crate::errors::ApplicationError;

pub const HIGH_BAND_SCORE: f64 = 85.0;
pub const MEDIUM_BAND_SCORE: f64 = 55.0;
pub const LOW_BAND_SCORE: f64 = 20.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub hydration: Option<Value>,
    #[serde(default, alias = "acne_score")]
    pub acne: Option<Value>,
    #[serde(default, alias = "spots_score")]
    pub spots: Option<Value>,
    #[serde(default, alias = "pigmentation_score")]
    pub pigmentation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawAnalysis {
    pub fn from_json(value: Value) -> Result<Self, ApplicationError> {
        serde_json::from_value(value).map_err(|error| {
            ApplicationError::Integration(format!(
                "analysis response has unexpected shape: {error}"
            ))
        })
    }

    pub fn scores(&self) -> AnalysisScores {
        AnalysisScores {
            hydration: self.hydration.as_ref().and_then(score_value),
            acne: self.acne.as_ref().and_then(score_value),
            spots: self.spots.as_ref().and_then(score_value),
            pigmentation: self.pigmentation.as_ref().and_then(score_value),
        }
    }
}

/// Reads one provider score. Numbers and numeric strings are clamped to
/// `0..=100`; `high`/`medium`/`low` map to fixed bands; everything else,
/// including `null`, is treated as missing.
pub fn score_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().and_then(clamp_score),
        Value::String(text) => parse_score_text(text),
        _ => None,
    }
}

fn parse_score_text(text: &str) -> Option<f64> {
    let normalized = text.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "high" => Some(HIGH_BAND_SCORE),
        "medium" | "moderate" => Some(MEDIUM_BAND_SCORE),
        "low" => Some(LOW_BAND_SCORE),
        other => other.trim_end_matches('%').trim().parse::<f64>().ok().and_then(clamp_score),
    }
}

fn clamp_score(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(MIN_SCORE, MAX_SCORE))
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Name reported in logs and CLI output.
    fn mode(&self) -> &'static str;

    async fn analyze(&self, image: &[u8]) -> Result<RawAnalysis, ApplicationError>;
}

/// Offline provider returning a fixed result.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockAnalysisProvider;

impl MockAnalysisProvider {
    pub fn fixed_response() -> RawAnalysis {
        RawAnalysis {
            hydration: Some(Value::from(78)),
            acne: Some(Value::from(22)),
            spots: Some(Value::from(14)),
            pigmentation: Some(Value::from(35)),
            notes: Some("Mock mode active (no real API).".to_owned()),
            error: None,
        }
    }
}

#[async_trait]
impl AnalysisProvider for MockAnalysisProvider {
    fn mode(&self) -> &'static str {
        "mock"
    }

    async fn analyze(&self, _image: &[u8]) -> Result<RawAnalysis, ApplicationError> {
        Ok(Self::fixed_response())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::catalog::Catalog;
    use crate::domain::product::SkinType;
    use crate::recommend::route_from_scores;
    use crate::recommend::router::BRIGHTENING_SERUM_STEP;

    use super::{score_value, AnalysisProvider, MockAnalysisProvider, RawAnalysis};

    #[test]
    fn score_values_accept_numbers_strings_and_bands() {
        assert_eq!(score_value(&json!(42)), Some(42.0));
        assert_eq!(score_value(&json!(12.5)), Some(12.5));
        assert_eq!(score_value(&json!(" 64 ")), Some(64.0));
        assert_eq!(score_value(&json!("70%")), Some(70.0));
        assert_eq!(score_value(&json!("HIGH")), Some(85.0));
        assert_eq!(score_value(&json!("medium")), Some(55.0));
        assert_eq!(score_value(&json!("low")), Some(20.0));
        assert_eq!(score_value(&json!(250)), Some(100.0));
        assert_eq!(score_value(&json!(-4)), Some(0.0));
    }

    #[test]
    fn unreadable_values_are_missing() {
        assert_eq!(score_value(&json!("very oily")), None);
        assert_eq!(score_value(&json!(null)), None);
        assert_eq!(score_value(&json!(true)), None);
        assert_eq!(score_value(&json!({"value": 3})), None);
    }

    #[test]
    fn provider_field_aliases_are_read() {
        let raw = RawAnalysis::from_json(json!({
            "hydration": "low",
            "acne_score": 45,
            "spots_score": "n/a",
            "pigmentation": "12",
            "notes": "T-zone congestion"
        }))
        .expect("flat record");

        let scores = raw.scores();
        assert_eq!(scores.hydration, Some(20.0));
        assert_eq!(scores.acne, Some(45.0));
        assert_eq!(scores.spots, None);
        assert_eq!(scores.pigmentation, Some(12.0));
        assert_eq!(raw.notes.as_deref(), Some("T-zone congestion"));
    }

    #[test]
    fn empty_record_has_no_scores() {
        let raw = RawAnalysis::from_json(json!({})).expect("empty record");
        let scores = raw.scores();
        assert!(scores.hydration.is_none() && scores.acne.is_none());
        assert!(scores.spots.is_none() && scores.pigmentation.is_none());
    }

    #[test]
    fn non_object_response_is_an_integration_error() {
        assert!(RawAnalysis::from_json(json!("service overloaded")).is_err());
    }

    #[tokio::test]
    async fn mock_provider_returns_fixed_scores_that_route_pigmentation() {
        let raw = MockAnalysisProvider.analyze(b"jpeg").await.expect("mock never fails");
        let scores = raw.scores();

        assert_eq!(scores.hydration, Some(78.0));
        assert_eq!(scores.acne, Some(22.0));
        assert_eq!(scores.spots, Some(14.0));
        assert_eq!(scores.pigmentation, Some(35.0));

        let plan = route_from_scores(&scores, SkinType::Normal, &Catalog::seeded());
        assert_eq!(plan.am_steps[2], BRIGHTENING_SERUM_STEP);
        assert_eq!(plan.pm_steps.len(), 5);
    }
}
