// src/text_processing.rs

//! Thin wrapper over the HuggingFace tokenizer that ships with a checkpoint.

use crate::error::{AutocompleteError, Result};
use std::path::Path;
use tokenizers::{tokenizer::Tokenizer, Encoding};

/// `TextProcessor` converts prompts to token ids and sampled ids back to text.
pub struct TextProcessor {
    pub tokenizer: Tokenizer,
}

impl TextProcessor {
    /// Creates a new processor from a local `tokenizer.json`.
    pub fn new<P: AsRef<Path>>(tokenizer_path: P) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(tokenizer_path.as_ref()).map_err(|e| {
            AutocompleteError::Generation(format!(
                "Failed to load tokenizer from {:?}: {}",
                tokenizer_path.as_ref(),
                e
            ))
        })?;
        Ok(Self { tokenizer })
    }

    /// Encodes a prompt without adding special tokens.
    pub fn encode(&self, text: &str) -> Result<Encoding> {
        self.tokenizer
            .encode(text, false)
            .map_err(|e| AutocompleteError::Generation(format!("Tokenizer failed to encode text: {}", e)))
    }

    /// Prompt token ids in the form the model consumes.
    pub fn encode_ids(&self, text: &str) -> Result<Vec<i64>> {
        Ok(self.encode(text)?.get_ids().iter().map(|&id| id as i64).collect())
    }

    /// Decodes token ids back into text, skipping special tokens.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| AutocompleteError::Generation(format!("Tokenizer failed to decode IDs: {}", e)))
    }

    pub fn get_vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}
