//! Blending strategies for the combined similarity score.

use serde::{Deserialize, Serialize};

/// Combines a lexical and a semantic score into one value in [0, 1].
pub trait BlendStrategy: Send + Sync {
    fn blend(&self, lexical: f64, semantic: f64) -> f64;

    fn label(&self) -> String;
}

/// Arithmetic mean of the two scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeight;

impl BlendStrategy for EqualWeight {
    fn blend(&self, lexical: f64, semantic: f64) -> f64 {
        (lexical + semantic) / 2.0
    }

    fn label(&self) -> String {
        "equal".to_string()
    }
}

/// `lexical * w + semantic * (1 - w)` with `w` clamped into [0, 1]. A
/// non-finite weight falls back to an even split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weighted {
    pub lexical: f64,
}

impl Weighted {
    pub fn new(lexical: f64) -> Self {
        Self {
            lexical: if lexical.is_finite() {
                lexical.clamp(0.0, 1.0)
            } else {
                0.5
            },
        }
    }
}

impl BlendStrategy for Weighted {
    fn blend(&self, lexical: f64, semantic: f64) -> f64 {
        lexical * self.lexical + semantic * (1.0 - self.lexical)
    }

    fn label(&self) -> String {
        format!("weighted(lexical={})", self.lexical)
    }
}

/// Rounds to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
