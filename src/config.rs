// src/config.rs

//! Generation parameters, fixed once at process start.

use crate::error::{AutocompleteError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_NAME: &str = "EleutherAI/gpt-neo-125M";
pub const DEFAULT_TOP_K: usize = 50;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_NEW_TOKENS: usize = 30;
pub const DEFAULT_NUM_OUTPUTS: usize = 3;

/// Checkpoint directory used when `AUTOCOMPLETE_MODEL_DIR` is unset.
pub const DEFAULT_MODEL_DIR: &str = "models/gpt-neo-125M";
pub const MODEL_DIR_ENV: &str = "AUTOCOMPLETE_MODEL_DIR";

/// Audit log location, relative to the working directory.
pub const LOG_FILE: &str = "autocomplete.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_identifier: String,
    pub top_k: usize,
    pub temperature: f64,
    pub max_new_tokens: usize,
    pub num_outputs: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_identifier: DEFAULT_MODEL_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
            temperature: DEFAULT_TEMPERATURE,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            num_outputs: DEFAULT_NUM_OUTPUTS,
        }
    }
}

impl GenerationConfig {
    /// Rejects configs the generation service cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.model_identifier.trim().is_empty() {
            return Err(AutocompleteError::Configuration("model identifier is empty".into()));
        }
        if self.top_k == 0 {
            return Err(AutocompleteError::Configuration("top_k must be positive".into()));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(AutocompleteError::Configuration(format!(
                "temperature must be a finite positive number, got {}",
                self.temperature
            )));
        }
        if self.max_new_tokens == 0 {
            return Err(AutocompleteError::Configuration("max_new_tokens must be positive".into()));
        }
        if self.num_outputs == 0 {
            return Err(AutocompleteError::Configuration("num_outputs must be positive".into()));
        }
        Ok(())
    }

    /// The `GEN_PARAMS` summary written to the request log.
    pub fn params_summary(&self) -> String {
        format!(
            "top_k={}, temperature={}, max_new_tokens={}, num_outputs={}",
            self.top_k, self.temperature, self.max_new_tokens, self.num_outputs
        )
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_identifier, "EleutherAI/gpt-neo-125M");
        assert_eq!(config.num_outputs, 3);
    }

    #[test]
    fn zero_counts_are_rejected() {
        for config in [
            GenerationConfig { top_k: 0, ..Default::default() },
            GenerationConfig { max_new_tokens: 0, ..Default::default() },
            GenerationConfig { num_outputs: 0, ..Default::default() },
        ] {
            assert!(matches!(config.validate(), Err(AutocompleteError::Configuration(_))));
        }
    }

    #[test]
    fn bad_temperatures_are_rejected() {
        for temperature in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = GenerationConfig { temperature, ..Default::default() };
            assert!(config.validate().is_err(), "accepted temperature {}", temperature);
        }
    }

    #[test]
    fn params_summary_matches_log_layout() {
        let config = GenerationConfig::default();
        assert_eq!(
            config.params_summary(),
            "top_k=50, temperature=0.7, max_new_tokens=30, num_outputs=3"
        );
    }
}
