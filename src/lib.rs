// src/lib.rs

//! Sentence autocompletion backed by a pretrained causal language model.
//!
//! A prompt is sent to a [`GenerationService`], every sampled candidate is
//! cut at its first period, and the request together with its suggestions is
//! appended to the [`RequestLogger`] audit trail.

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod generation;
pub mod request_log;
pub mod sentence;
pub mod text_processing;

pub use autocomplete::{autocomplete, Autocompleter};
pub use config::GenerationConfig;
pub use error::{AutocompleteError, Result};
pub use generation::{GenerationService, TorchGenerator};
pub use request_log::RequestLogger;
pub use sentence::truncate_at_sentence;
