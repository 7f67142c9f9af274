// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.
//
// Every threshold below was chosen empirically against real label scans and
// is expected to be retuned, so none of them are hard-coded in the pipeline.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaltError};

/// Tunable heuristics for the OCR composition pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaltConfig {
    /// A line is a candidate when its trimmed char count exceeds this.
    pub min_line_length: usize,
    /// Below this many candidate lines every candidate is parsed,
    /// keyword or not (small-label heuristic).
    pub small_label_line_count: usize,
    /// Transcript confidence below which every component is forced to LOW.
    pub ocr_confidence_floor: f64,
    /// Components whose name has this many chars or fewer are discarded.
    pub min_name_length: usize,
    /// Upper bound on a single recognition call, in milliseconds.
    pub recognize_timeout_ms: u64,
    /// Re-score kept components with the three-tier scorer.
    /// When false, parse-time tiers (MEDIUM/LOW) are reported as-is.
    pub rescore_components: bool,
}

impl Default for SaltConfig {
    fn default() -> Self {
        Self {
            min_line_length: 5,
            small_label_line_count: 10,
            ocr_confidence_floor: 60.0,
            min_name_length: 3,
            recognize_timeout_ms: 30_000,
            rescore_components: true,
        }
    }
}

impl SaltConfig {
    /// Recognition timeout as a `Duration`.
    pub fn recognize_timeout(&self) -> Duration {
        Duration::from_millis(self.recognize_timeout_ms)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.recognize_timeout_ms == 0 {
            return Err(SaltError::Config(
                "recognize_timeout_ms must be greater than zero".into(),
            ));
        }
        if !self.ocr_confidence_floor.is_finite() || self.ocr_confidence_floor < 0.0 {
            return Err(SaltError::Config(format!(
                "ocr_confidence_floor must be a non-negative number, got {}",
                self.ocr_confidence_floor
            )));
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but is malformed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Persist the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
