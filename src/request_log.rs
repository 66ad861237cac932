// src/request_log.rs

//! Append-only audit trail of every autocomplete request.
//!
//! Each line is self-contained: `<timestamp> | <LEVEL> | <message>`.
//! A request opens with a separator line followed by its metadata, and
//! ends where the next separator begins.

use crate::config::GenerationConfig;
use crate::error::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::Level;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

pub fn separator() -> String {
    "=".repeat(60)
}

/// Single-sink request logger. Construct it once at startup and hand it to
/// the [`Autocompleter`](crate::autocomplete::Autocompleter).
#[derive(Debug)]
pub struct RequestLogger<W: Write = File> {
    sink: W,
}

impl RequestLogger<File> {
    /// Opens (or creates) `path` for appending and records the initialization.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut logger = Self { sink: file };
        logger.info(&format!("Logger initialized. Writing logs to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "request log opened");
        Ok(logger)
    }
}

impl<W: Write> RequestLogger<W> {
    /// Wraps an already-open sink without writing anything to it.
    pub fn from_writer(sink: W) -> Self {
        Self { sink }
    }

    /// Writes one record and flushes it before returning.
    pub fn record(&mut self, level: Level, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(self.sink, "{} | {} | {}", timestamp, level, message)?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.record(Level::INFO, message)
    }

    /// Opens a request block: separator, model, prompt and sampling parameters.
    pub fn log_request_start(&mut self, config: &GenerationConfig, prompt: &str) -> Result<()> {
        self.info(&separator())?;
        self.info(&format!("MODEL_NAME: {}", config.model_identifier))?;
        self.info(&format!("PROMPT: {}", prompt))?;
        self.info(&format!("GEN_PARAMS | {}", config.params_summary()))
    }

    /// Records a suggestion under its 1-based position.
    pub fn log_suggestion(&mut self, index: usize, text: &str) -> Result<()> {
        self.info(&format!("OUTPUT_{}: {}", index, text))
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
