//! Nonlinear distance-to-intensity curves.
//!
//! Both curves normalise the distance over `[low, high]` and square it, so
//! intensity changes slowly near the ends of the range and quickly in the
//! middle. Outputs are integers in `[0, max]`; non-finite input maps to 0.

use serde::{Deserialize, Serialize};

use crate::error::HapticError;

pub const LOW: f32 = 0.07;
pub const HIGH: f32 = 0.3;
pub const MAX_INTENSITY: u8 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// Grows with the distance: silent when matched, full when far off.
    Error,
    /// Shrinks with the distance: full when matched, silent when far off.
    Guidance,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseCurve {
    pub low: f32,
    pub high: f32,
    pub max: u8,
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self {
            low: LOW,
            high: HIGH,
            max: MAX_INTENSITY,
        }
    }
}

impl ResponseCurve {
    pub fn validate(&self) -> Result<(), HapticError> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low >= self.high {
            return Err(HapticError::InvalidCurve {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    pub fn eval(&self, kind: CurveKind, distance: f32) -> u8 {
        match kind {
            CurveKind::Error => self.error(distance),
            CurveKind::Guidance => self.guidance(distance),
        }
    }

    pub fn error(&self, d: f32) -> u8 {
        if !d.is_finite() {
            return 0;
        }
        if d >= self.high {
            return self.max;
        }
        if d <= self.low {
            return 0;
        }
        self.scale(self.ratio(d).powi(2))
    }

    pub fn guidance(&self, d: f32) -> u8 {
        if !d.is_finite() {
            return 0;
        }
        if d <= self.low {
            return self.max;
        }
        if d >= self.high {
            return 0;
        }
        self.scale((1.0 - self.ratio(d)).powi(2))
    }

    #[inline]
    fn ratio(&self, d: f32) -> f32 {
        (d - self.low) / (self.high - self.low)
    }

    #[inline]
    fn scale(&self, unit: f32) -> u8 {
        let max = f32::from(self.max);
        (unit * max).round().clamp(0.0, max) as u8
    }
}

/// [`ResponseCurve::error`] with the default constants.
pub fn error_intensity(d: f32) -> u8 {
    ResponseCurve::default().error(d)
}

/// [`ResponseCurve::guidance`] with the default constants.
pub fn guidance_intensity(d: f32) -> u8 {
    ResponseCurve::default().guidance(d)
}
