use serde::{Deserialize, Serialize};

/// Substituted for a missing or unreadable score when routing.
pub const NEUTRAL_SCORE: f64 = 50.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Scores reported by the analysis provider. `None` means the provider gave
/// no usable value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisScores {
    pub hydration: Option<f64>,
    pub acne: Option<f64>,
    pub spots: Option<f64>,
    pub pigmentation: Option<f64>,
}

/// One score after substitution. `reported` is false when the provider gave
/// no usable value and `value` holds [`NEUTRAL_SCORE`]; such a score never
/// crosses a routing threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScore {
    pub value: f64,
    pub reported: bool,
}

impl ResolvedScore {
    pub fn above(&self, threshold: f64) -> bool {
        self.reported && self.value > threshold
    }

    pub fn below(&self, threshold: f64) -> bool {
        self.reported && self.value < threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScores {
    pub hydration: ResolvedScore,
    pub acne: ResolvedScore,
    pub spots: ResolvedScore,
    pub pigmentation: ResolvedScore,
}

impl AnalysisScores {
    pub fn resolved(&self) -> ResolvedScores {
        ResolvedScores {
            hydration: resolve(self.hydration),
            acne: resolve(self.acne),
            spots: resolve(self.spots),
            pigmentation: resolve(self.pigmentation),
        }
    }
}

fn resolve(value: Option<f64>) -> ResolvedScore {
    match value {
        Some(score) if score.is_finite() => {
            ResolvedScore { value: score.clamp(MIN_SCORE, MAX_SCORE), reported: true }
        }
        _ => ResolvedScore { value: NEUTRAL_SCORE, reported: false },
    }
}
