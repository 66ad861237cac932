// src/generation.rs

//! The text-generation service behind autocomplete.
//!
//! [`GenerationService`] is the narrow contract the rest of the crate relies
//! on. [`TorchGenerator`] implements it on top of a TorchScript causal LM and
//! its HuggingFace tokenizer, sampling with top-k and temperature.

use crate::config::GenerationConfig;
use crate::error::{AutocompleteError, Result};
use crate::text_processing::TextProcessor;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tch::{CModule, Device, IValue, Kind, Tensor};
use tracing::{debug, info, instrument};

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.pt";
pub const MODEL_CONFIG_FILE: &str = "config.json";

/// Produces sampled continuations of a prompt.
///
/// Implementations return exactly `config.num_outputs` decoded sequences,
/// in generation order, each extending the prompt by at most
/// `config.max_new_tokens` tokens.
pub trait GenerationService {
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<String>>;
}

fn torch_err(e: tch::TchError) -> AutocompleteError {
    AutocompleteError::Generation(e.to_string())
}

/// The subset of a HuggingFace `config.json` the sampler needs.
#[derive(Debug, Deserialize)]
struct ModelMetadata {
    eos_token_id: i64,
}

/// Causal LM loaded once from a checkpoint directory holding
/// `tokenizer.json`, `model.pt` (TorchScript) and `config.json`.
pub struct TorchGenerator {
    module: CModule,
    processor: TextProcessor,
    eos_token_id: i64,
    device: Device,
}

impl TorchGenerator {
    #[instrument(skip_all)]
    pub fn load<P: AsRef<Path>>(model_dir: P, device: Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();

        let processor = TextProcessor::new(model_dir.join(TOKENIZER_FILE))?;

        let metadata_path = model_dir.join(MODEL_CONFIG_FILE);
        let raw = fs::read_to_string(&metadata_path).map_err(|e| {
            AutocompleteError::Generation(format!("Failed to read {:?}: {}", metadata_path, e))
        })?;
        let metadata: ModelMetadata = serde_json::from_str(&raw).map_err(|e| {
            AutocompleteError::Generation(format!("Malformed {:?}: {}", metadata_path, e))
        })?;

        let mut module = CModule::load_on_device(model_dir.join(WEIGHTS_FILE), device).map_err(torch_err)?;
        module.set_eval();

        info!(
            model_dir = %model_dir.display(),
            vocab_size = processor.get_vocab_size(),
            eos_token_id = metadata.eos_token_id,
            ?device,
            "model loaded"
        );
        Ok(Self { module, processor, eos_token_id: metadata.eos_token_id, device })
    }

    /// Next-token logits for every position: `[batch, seq, vocab]`.
    fn logits(&self, input_ids: &Tensor) -> Result<Tensor> {
        let output = self
            .module
            .forward_is(&[IValue::Tensor(input_ids.shallow_clone())])
            .map_err(torch_err)?;
        match output {
            IValue::Tensor(logits) => Ok(logits),
            // HuggingFace `torchscript=True` exports return `(logits, past_key_values, ...)`.
            IValue::Tuple(mut items) if !items.is_empty() => match items.swap_remove(0) {
                IValue::Tensor(logits) => Ok(logits),
                other => Err(AutocompleteError::Generation(format!(
                    "model returned non-tensor logits: {:?}",
                    other
                ))),
            },
            other => Err(AutocompleteError::Generation(format!(
                "unexpected model output: {:?}",
                other
            ))),
        }
    }
}

impl GenerationService for TorchGenerator {
    #[instrument(skip_all, fields(num_outputs = config.num_outputs))]
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<String>> {
        let prompt_ids = self.processor.encode_ids(prompt)?;
        let sequences = tch::no_grad(|| {
            generate_ids(|ids| self.logits(ids), &prompt_ids, config, self.eos_token_id, self.device)
        })?
        .to_device(Device::Cpu);

        let mut candidates = Vec::with_capacity(config.num_outputs);
        for row in 0..config.num_outputs as i64 {
            let ids = Vec::<i64>::try_from(&sequences.get(row)).map_err(torch_err)?;
            let ids: Vec<u32> = ids.into_iter().map(|id| id as u32).collect();
            candidates.push(self.processor.decode(&ids)?);
        }
        Ok(candidates)
    }
}

/// Draws one token per row from top-k restricted, temperature scaled logits.
///
/// `logits` is `[batch, vocab]`; the result is `[batch, 1]` token ids.
pub fn sample_next_tokens(logits: &Tensor, top_k: usize, temperature: f64) -> Result<Tensor> {
    let vocab = logits.size().last().copied().unwrap_or(0);
    let k = (top_k as i64).min(vocab);
    if k < 1 {
        return Err(AutocompleteError::Generation("model produced empty logits".into()));
    }
    let scaled = logits / temperature;
    let (top_logits, top_indices) = scaled.f_topk(k, -1, true, true).map_err(torch_err)?;
    let probabilities = top_logits.softmax(-1, Kind::Float);
    let picked = probabilities.f_multinomial(1, true).map_err(torch_err)?;
    Ok(top_indices.gather(1, &picked, false))
}

/// Autoregressive sampling loop shared by every backend.
///
/// The prompt is replicated `num_outputs` times. Rows that emit `eos_token_id`
/// keep emitting it, and the loop ends early once every row has.
pub fn generate_ids<F>(
    forward: F,
    prompt_ids: &[i64],
    config: &GenerationConfig,
    eos_token_id: i64,
    device: Device,
) -> Result<Tensor>
where
    F: Fn(&Tensor) -> Result<Tensor>,
{
    if prompt_ids.is_empty() {
        return Err(AutocompleteError::Generation("prompt encoded to zero tokens".into()));
    }
    let batch = config.num_outputs as i64;
    let mut ids = Tensor::f_from_slice(prompt_ids)
        .map_err(torch_err)?
        .to(device)
        .view((1, -1))
        .repeat([batch, 1]);
    let mut finished = Tensor::zeros([batch, 1], (Kind::Bool, device));

    for step in 0..config.max_new_tokens {
        let logits = forward(&ids)?;
        let last_logits = logits.select(1, -1);
        let next = sample_next_tokens(&last_logits, config.top_k, config.temperature)?;
        let next = next.where_self(&finished.logical_not(), &next.full_like(eos_token_id));

        finished = finished.logical_or(&next.eq(eos_token_id));
        ids = Tensor::cat(&[&ids, &next], 1);

        if finished.all().int64_value(&[]) != 0 {
            debug!(step, "every sequence reached end-of-sequence");
            break;
        }
    }
    Ok(ids)
}
