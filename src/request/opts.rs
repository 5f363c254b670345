use crate::{
    foundation::core::DURATION_EPSILON,
    foundation::error::{SplicerError, SplicerResult},
};

/// Tunable constants of the composition pipeline.
///
/// Every field has a default, so a request may override any subset of them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposeOpts {
    /// Tolerance for duration equality, seconds.
    pub epsilon: f64,
    /// Normalized segments never drop below this, seconds. Must be positive.
    pub min_segment_duration: f64,
    /// Decimal places kept when scaling durations.
    pub round_decimals: u32,
    /// Shorter cutaway proposals are dropped.
    pub min_cutaway_duration: f64,
    /// Required distance between the end of one cutaway and the start of the next.
    pub min_cutaway_gap: f64,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        Self {
            epsilon: DURATION_EPSILON,
            min_segment_duration: 2.0,
            round_decimals: 1,
            min_cutaway_duration: 3.0,
            min_cutaway_gap: 3.0,
        }
    }
}

impl ComposeOpts {
    /// Check ranges of every knob.
    pub fn validate(&self) -> SplicerResult<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SplicerError::validation("opts.epsilon must be > 0"));
        }
        let min_seg = self.min_segment_duration;
        if !min_seg.is_finite() || min_seg <= 0.0 {
            return Err(SplicerError::validation(
                "opts.min_segment_duration must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("min_cutaway_duration", self.min_cutaway_duration),
            ("min_cutaway_gap", self.min_cutaway_gap),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SplicerError::validation(format!(
                    "opts.{name} must be finite and >= 0"
                )));
            }
        }
        if self.round_decimals > 6 {
            return Err(SplicerError::validation("opts.round_decimals must be <= 6"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/opts.rs"]
mod tests;
