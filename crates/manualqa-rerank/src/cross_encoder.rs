use anyhow::anyhow;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::info;

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::PairScorer;

use manualqa_embed::device::select_device;
use manualqa_embed::tokenize::tokenize_on_device;

const HIDDEN_SIZE: usize = 1024;
const MAX_LEN: usize = 512;

/// XLM-RoBERTa cross-encoder (BGE reranker family): query and passage go
/// through the encoder as one sequence, the CLS state through the
/// classification head, sigmoid at the end. Loaded from a local model
/// directory with `tokenizer.json`, `config.json`, `pytorch_model.bin`.
pub struct CrossEncoder {
    model: XLMRobertaModel,
    dense: Linear,
    out_proj: Linear,
    tokenizer: Tokenizer,
    device: Device,
}

impl CrossEncoder {
    pub fn load(model_dir: &Path) -> Result<Self> {
        Self::load_inner(model_dir)
            .map_err(|e| Error::ModelUnavailable(format!("reranker model at {}: {e}", model_dir.display())))
    }

    fn load_inner(model_dir: &Path) -> anyhow::Result<Self> {
        let device = select_device();
        info!(dir = %model_dir.display(), "loading reranker model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("tokenizer at {}: {e}", tokenizer_path.display()))?;
        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        // sequence-classification checkpoints prefix the encoder with "roberta"
        let model = XLMRobertaModel::new(&config, vb.pp("roberta"))?;
        let classifier = vb.pp("classifier");
        let dense = candle_nn::linear(HIDDEN_SIZE, HIDDEN_SIZE, classifier.pp("dense"))?;
        let out_proj = candle_nn::linear(HIDDEN_SIZE, 1, classifier.pp("out_proj"))?;
        info!("reranker model ready");
        Ok(Self { model, dense, out_proj, tokenizer, device })
    }

    fn forward_score(&self, input_ids: &Tensor, attention_mask: &Tensor) -> anyhow::Result<f32> {
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(input_ids, attention_mask, &token_type_ids, None, None, None)?;
        // CLS token state -> dense -> tanh -> out_proj -> sigmoid
        let cls = hidden_states.narrow(1, 0, 1)?.squeeze(1)?;
        let pooled = self.dense.forward(&cls)?.tanh()?;
        let logit = self.out_proj.forward(&pooled)?.squeeze(1)?.squeeze(0)?.to_scalar::<f32>()?;
        Ok(sigmoid(logit))
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl PairScorer for CrossEncoder {
    fn score(&self, query: &str, text: &str) -> Result<f32> {
        let pair = format!("{} [SEP] {}", query, text);
        // tokenizer trouble is specific to this pair; encoder trouble
        // means the model as a whole is gone
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, &pair, MAX_LEN, &self.device)
            .map_err(|e| Error::InvalidArgument(format!("pair tokenization: {e}")))?;
        self.forward_score(&input_ids, &attention_mask)
            .map_err(|e| Error::ModelUnavailable(format!("pair scoring: {e}")))
    }
}
