use crate::foundation::error::{SplicerError, SplicerResult};

/// Default tolerance, in seconds, for every duration comparison.
pub const DURATION_EPSILON: f64 = 0.05;

/// Round `v` to `decimals` decimal places (half away from zero).
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Return `true` when `a` and `b` differ by at most `eps`.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Half-open span `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeSpan {
    /// Create a validated span with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> SplicerResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SplicerError::validation("TimeSpan bounds must be finite"));
        }
        if start > end {
            return Err(SplicerError::validation("TimeSpan start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Span starting at `start` lasting `len` seconds.
    pub fn at(start: f64, len: f64) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Length in seconds.
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when the span covers no time.
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SplicerResult<Self> {
        let fps = Self { num, den };
        fps.validate()?;
        Ok(fps)
    }

    /// Check `num > 0` and `den > 0`.
    pub fn validate(self) -> SplicerResult<()> {
        if self.den == 0 {
            return Err(SplicerError::validation("Fps den must be > 0"));
        }
        if self.num == 0 {
            return Err(SplicerError::validation("Fps num must be > 0"));
        }
        Ok(())
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to the nearest frame count.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Aspect::Landscape.canvas()
    }
}

/// Named output aspect, resolved to a default canvas when no explicit size is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    /// 16:9.
    Landscape,
    /// 9:16.
    Portrait,
    /// 1:1.
    Square,
}

impl Aspect {
    /// Default full-HD canvas for this aspect.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Landscape => Canvas {
                width: 1920,
                height: 1080,
            },
            Self::Portrait => Canvas {
                width: 1080,
                height: 1920,
            },
            Self::Square => Canvas {
                width: 1080,
                height: 1080,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
