//! Attention Visualization Core
//!
//! Data side of the attention visualizer: the wire contract with the scoring
//! backend, defensive tensor access, token display cleanup, and the color
//! scale shared by the heatmap cells and the legend.

mod color;
mod response;
mod tensor;
mod tokens;

pub use color::{scale_color, weight_color, Rgb, SCALE_ANCHORS, ZERO_COLOR};
pub use response::{AnalyzeRequest, AnalyzeResponse};
pub use tensor::AttentionTensor;
pub use tokens::{clean_token, clean_tokens};
