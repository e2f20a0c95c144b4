//! Lantern oil: a single depleting scalar kept inside [0, 100].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::MAX_OIL;

/// Coarse oil band shown next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OilWarning {
    Good,
    Medium,
    Low,
    Critical,
}

impl OilWarning {
    pub fn label(self) -> &'static str {
        match self {
            OilWarning::Good => "good",
            OilWarning::Medium => "medium",
            OilWarning::Low => "low",
            OilWarning::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct OilGauge(f64);

impl Default for OilGauge {
    fn default() -> Self {
        Self::full()
    }
}

impl OilGauge {
    pub fn full() -> Self {
        Self(MAX_OIL)
    }

    /// Clamps into [0, 100]; NaN reads as empty.
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            return Self(0.0);
        }
        Self(level.clamp(0.0, MAX_OIL))
    }

    pub fn level(self) -> f64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 <= 0.0
    }

    /// Subtract `amount`, never going below zero. Returns true when the lantern is now dry.
    pub fn drain(&mut self, amount: f64) -> bool {
        *self = Self::new(self.0 - amount.max(0.0));
        self.is_empty()
    }

    pub fn refill(&mut self) {
        self.0 = MAX_OIL;
    }

    pub fn warning(self) -> OilWarning {
        match self.0 {
            l if l <= 10.0 => OilWarning::Critical,
            l if l <= 25.0 => OilWarning::Low,
            l if l <= 50.0 => OilWarning::Medium,
            _ => OilWarning::Good,
        }
    }
}

impl fmt::Display for OilGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}
