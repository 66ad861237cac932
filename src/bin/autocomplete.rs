// src/bin/autocomplete.rs

use anyhow::{anyhow, Context, Result};
use sentence_autocomplete::{
    config::{DEFAULT_MODEL_DIR, LOG_FILE, MODEL_DIR_ENV},
    Autocompleter, GenerationConfig, RequestLogger, TorchGenerator,
};
use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tch::Device;
use tracing_subscriber::EnvFilter;

/// Prompts until a non-blank line arrives; end of input is an error.
fn read_prompt() -> Result<String> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Enter a partial sentence: ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(anyhow!("No input received"));
        }
        let prompt = line.trim();
        if !prompt.is_empty() {
            return Ok(prompt.to_string());
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    // --- 1. Setup ---
    let config = GenerationConfig::default();
    config.validate()?;

    let logger = RequestLogger::open(LOG_FILE).with_context(|| format!("Cannot open {}", LOG_FILE))?;

    // --- 2. Load the Model ---
    let model_dir = env::var_os(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));
    let generator = TorchGenerator::load(&model_dir, Device::cuda_if_available())
        .with_context(|| format!("Cannot load {} from {}", config.model_identifier, model_dir.display()))?;

    let mut completer = Autocompleter::new(config, generator, logger)?;

    // --- 3. Serve one request ---
    let prompt = read_prompt()?;
    let suggestions = completer.complete(&prompt)?;

    println!("\nAutocomplete Suggestions:");
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, suggestion);
    }
    Ok(())
}
