//! Wire types for the scoring backend.

use serde::{Deserialize, Serialize};

use crate::tensor::AttentionTensor;

/// Request body for the scoring endpoint.
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Successful scoring response: sub-word tokens plus the attention tensor.
///
/// Tokens arrive raw from the tokenizer; display cleanup happens in
/// [`crate::clean_tokens`] before the pair is installed.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub tokens: Vec<String>,
    pub attention: AttentionTensor,
}
