// src/autocomplete.rs

//! Ties generation, sentence truncation and the request log together.

use crate::config::GenerationConfig;
use crate::error::{AutocompleteError, Result};
use crate::generation::GenerationService;
use crate::request_log::RequestLogger;
use crate::sentence::truncate_at_sentence;
use std::io::Write;
use tracing::{debug, instrument};

/// Completes `prompt` into `config.num_outputs` suggestions, in generation order.
///
/// The request block is logged before the service is called, so a failed
/// generation still leaves its start marker. Suggestions are only logged
/// once the service has returned every candidate.
#[instrument(skip_all, fields(prompt_len = prompt.len()))]
pub fn autocomplete<S, W>(
    prompt: &str,
    config: &GenerationConfig,
    service: &S,
    logger: &mut RequestLogger<W>,
) -> Result<Vec<String>>
where
    S: GenerationService + ?Sized,
    W: Write,
{
    logger.log_request_start(config, prompt)?;

    let candidates = service.generate(prompt, config)?;
    if candidates.len() != config.num_outputs {
        return Err(AutocompleteError::Generation(format!(
            "expected {} candidates, service returned {}",
            config.num_outputs,
            candidates.len()
        )));
    }

    let mut suggestions = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let text = truncate_at_sentence(candidate);
        logger.log_suggestion(idx + 1, text)?;
        suggestions.push(text.to_string());
    }
    debug!(count = suggestions.len(), "suggestions ready");
    Ok(suggestions)
}

/// Holds the resources loaded once at startup and serves requests against them.
pub struct Autocompleter<S, W: Write> {
    config: GenerationConfig,
    service: S,
    logger: RequestLogger<W>,
}

impl<S: GenerationService, W: Write> Autocompleter<S, W> {
    /// Validates `config` before taking ownership of the service and logger.
    pub fn new(config: GenerationConfig, service: S, logger: RequestLogger<W>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, service, logger })
    }

    pub fn complete(&mut self, prompt: &str) -> Result<Vec<String>> {
        autocomplete(prompt, &self.config, &self.service, &mut self.logger)
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn into_logger(self) -> RequestLogger<W> {
        self.logger
    }
}
