use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, Embedding, EmbeddingConfig, RadicalDocument};

/// Multilingual sentence encoder used for both radical documents and queries.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2";
const DEFAULT_DIMENSIONS: usize = 384;
const DEFAULT_MAX_SEQ_LENGTH: usize = 128;
const BATCH_SIZE: usize = 32;

/// Sentence embeddings computed locally with ONNX Runtime.
///
/// Token vectors are mean-pooled under the attention mask. The pooled vector
/// is returned as is; this model is not trained for normalized output, and
/// the flat index ranks by raw L2 distance.
pub struct OrtEmbedding {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    config: EmbeddingConfig,
}

impl OrtEmbedding {
    pub fn new(model_id: Option<&str>) -> Result<Self, DomainError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Initializing ORT embedding service with model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| DomainError::embedding(format!("Failed to create HF API: {}", e)))?;
        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::embedding(format!("Failed to download tokenizer: {}", e)))?;
        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))
            .map_err(|e| DomainError::embedding(format!("Failed to download ONNX model: {}", e)))?;

        Self::from_paths(model_path, tokenizer_path, model_id)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
    ) -> Result<Self, DomainError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.commit_from_file(&model_path))
            .map_err(|e| DomainError::embedding(format!("Failed to load ONNX model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            config: EmbeddingConfig::new(
                model_name.to_string(),
                DEFAULT_DIMENSIONS,
                DEFAULT_MAX_SEQ_LENGTH,
            ),
        })
    }

    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| DomainError::embedding(format!("Tokenization failed: {}", e)))?;
        let batch = PaddedBatch::new(&encodings, self.config.max_sequence_length());
        let shape = [encodings.len(), batch.seq_len];

        let to_tensor = |name: &str, data: Vec<i64>| {
            Tensor::from_array((shape, data)).map_err(|e| {
                DomainError::embedding(format!("Failed to create {} tensor: {}", name, e))
            })
        };
        let input_ids = to_tensor("input_ids", batch.input_ids)?;
        let attention_mask = to_tensor("attention_mask", batch.attention_mask.clone())?;
        let token_type_ids = to_tensor("token_type_ids", batch.token_type_ids)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::embedding(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids,
            ])
            .map_err(|e| DomainError::embedding(format!("Inference failed: {}", e)))?;

        let (_, hidden) = outputs
            .iter()
            .next()
            .ok_or_else(|| DomainError::embedding("No output tensor found"))?;
        let (out_shape, data) = hidden
            .try_extract_tensor::<f32>()
            .map_err(|e| DomainError::embedding(format!("Failed to extract output: {}", e)))?;
        let out_shape: Vec<usize> = out_shape.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", out_shape);

        match out_shape.as_slice() {
            [rows, seq_len, hidden_size] if *rows == encodings.len() => Ok(mean_pool(
                data,
                &batch.attention_mask,
                *rows,
                *seq_len,
                *hidden_size,
            )),
            [rows, hidden_size] if *rows == encodings.len() => Ok(data
                .chunks(*hidden_size)
                .map(|row| row.to_vec())
                .collect()),
            _ => Err(DomainError::embedding(format!(
                "Unexpected output tensor shape: {:?}",
                out_shape
            ))),
        }
    }
}

/// Token ids, mask and type ids for one batch, padded to a common length and
/// cut at the model's maximum sequence length.
struct PaddedBatch {
    seq_len: usize,
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl PaddedBatch {
    fn new(encodings: &[Encoding], max_len: usize) -> Self {
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(max_len);
        let capacity = encodings.len() * seq_len;
        let mut batch = Self {
            seq_len,
            input_ids: Vec::with_capacity(capacity),
            attention_mask: Vec::with_capacity(capacity),
            token_type_ids: Vec::with_capacity(capacity),
        };

        for encoding in encodings {
            push_padded(&mut batch.input_ids, encoding.get_ids(), seq_len);
            push_padded(&mut batch.attention_mask, encoding.get_attention_mask(), seq_len);
            push_padded(&mut batch.token_type_ids, encoding.get_type_ids(), seq_len);
        }
        batch
    }
}

fn push_padded(out: &mut Vec<i64>, values: &[u32], seq_len: usize) {
    let len = values.len().min(seq_len);
    out.extend(values[..len].iter().map(|&x| x as i64));
    out.extend(std::iter::repeat_n(0i64, seq_len - len));
}

/// Average the token vectors of each row, counting only positions where the
/// attention mask is set. `mask` is laid out `[rows, seq_len]`, `hidden` is
/// `[rows, seq_len, hidden_size]`.
fn mean_pool(
    hidden: &[f32],
    mask: &[i64],
    rows: usize,
    seq_len: usize,
    hidden_size: usize,
) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|row| {
            let mut pooled = vec![0.0f32; hidden_size];
            let mut count = 0.0f32;
            for token in 0..seq_len {
                if mask.get(row * seq_len + token).copied().unwrap_or(0) == 0 {
                    continue;
                }
                let start = (row * seq_len + token) * hidden_size;
                for (acc, value) in pooled.iter_mut().zip(&hidden[start..start + hidden_size]) {
                    *acc += value;
                }
                count += 1.0;
            }
            if count > 0.0 {
                pooled.iter_mut().for_each(|v| *v /= count);
            }
            pooled
        })
        .collect()
}

#[async_trait]
impl EmbeddingService for OrtEmbedding {
    async fn embed_documents(
        &self,
        documents: &[RadicalDocument],
    ) -> Result<Vec<Embedding>, DomainError> {
        let mut embeddings = Vec::with_capacity(documents.len());

        for (batch_index, batch) in documents.chunks(BATCH_SIZE).enumerate() {
            let texts: Vec<&str> = batch.iter().map(|d| d.text()).collect();
            let vectors = self.embed_texts(&texts)?;

            for (offset, vector) in vectors.into_iter().enumerate() {
                embeddings.push(Embedding::new(batch_index * BATCH_SIZE + offset, vector));
            }
        }

        Ok(embeddings)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        self.embed_texts(&[query])?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("Failed to generate query embedding"))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_pool_ignores_masked_tokens() {
        // two rows, three tokens, two hidden dims
        let hidden = [
            1.0, 2.0, 3.0, 4.0, 100.0, 100.0, //
            5.0, 5.0, 0.0, 0.0, 0.0, 0.0,
        ];
        let mask = [1, 1, 0, 1, 0, 0];

        let pooled = mean_pool(&hidden, &mask, 2, 3, 2);

        assert_eq!(pooled, vec![vec![2.0, 3.0], vec![5.0, 5.0]]);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let pooled = mean_pool(&[1.0, 1.0], &[0], 1, 1, 2);
        assert_eq!(pooled, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn push_padded_truncates_and_pads() {
        let mut out = Vec::new();
        push_padded(&mut out, &[7, 8, 9], 2);
        push_padded(&mut out, &[1], 2);
        assert_eq!(out, vec![7, 8, 1, 0]);
    }

    #[tokio::test]
    #[ignore = "Requires model download"]
    async fn multilingual_model_embeds_radical_text() {
        let service = OrtEmbedding::new(None).expect("Failed to create service");

        let embedding = service
            .embed_query("Radical: Shell\nMeaning: shell, money")
            .await
            .expect("embed query");

        assert_eq!(embedding.len(), DEFAULT_DIMENSIONS);
    }
}
