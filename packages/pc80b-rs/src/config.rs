use crate::error::{Pc80bError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable policy of the artifact scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Lower band edge as a fraction of the baseline minimum (default: 0.7).
    /// Also scales the flat replacement value.
    pub low_ratio: f64,

    /// Upper band edge as a multiple of the baseline maximum (default: 1.3)
    pub high_ratio: f64,

    /// Length of the baseline window in seconds (default: 20)
    pub baseline_seconds: u32,

    /// Raise `InsufficientData` instead of returning an empty or unmasked
    /// result when the recording is too short (default: false)
    pub strict: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            low_ratio: 0.7,
            high_ratio: 1.3,
            baseline_seconds: 20,
            strict: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.low_ratio.is_finite() || self.low_ratio < 0.0 {
            return Err(Pc80bError::Configuration(format!(
                "low ratio must be a finite non-negative number, got {}",
                self.low_ratio
            )));
        }
        if !self.high_ratio.is_finite() || self.high_ratio < 0.0 {
            return Err(Pc80bError::Configuration(format!(
                "high ratio must be a finite non-negative number, got {}",
                self.high_ratio
            )));
        }
        if self.low_ratio > self.high_ratio {
            return Err(Pc80bError::Configuration(format!(
                "low ratio {} must not exceed high ratio {}",
                self.low_ratio, self.high_ratio
            )));
        }
        if self.baseline_seconds == 0 {
            return Err(Pc80bError::Configuration(
                "baseline window must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Baseline window length in samples at `sample_rate`.
    pub fn window_len(&self, sample_rate: u32) -> Result<usize> {
        (sample_rate as usize)
            .checked_mul(self.baseline_seconds as usize)
            .ok_or_else(|| {
                Pc80bError::Configuration(format!(
                    "baseline window of {}s at {} Hz overflows",
                    self.baseline_seconds, sample_rate
                ))
            })
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Pc80bError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ScanConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
