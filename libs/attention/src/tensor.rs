//! Safe access into the attention tensor.

use serde::Deserialize;

/// Per-analysis attention weights, indexed `[layer][source][target]`.
///
/// The backend collapses the head dimension before transmission, so each
/// outer entry is a single N x N matrix. All lookups are defensive: any
/// missing or misshapen level yields zeros instead of an error, which lets
/// rendering proceed through transient states such as a mid-flight swap.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AttentionTensor(Vec<Vec<Vec<f32>>>);

impl AttentionTensor {
    pub fn new(layers: Vec<Vec<Vec<f32>>>) -> Self {
        Self(layers)
    }

    /// Number of matrices available for layer navigation.
    pub fn layer_count(&self) -> usize {
        self.0.len()
    }

    /// Row count of the selected matrix. Drives the head selector options;
    /// the selection itself never enters a lookup.
    pub fn head_count(&self, layer: usize) -> usize {
        self.0.get(layer).map(|matrix| matrix.len()).unwrap_or(0)
    }

    /// Whether any matrix has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Target-attention row for `source` in `layer`, always of length `n`.
    ///
    /// An out-of-range layer, a missing row, or a short row all fall back to
    /// zeros; an over-long row is truncated to the current token count.
    pub fn row(&self, layer: usize, source: usize, n: usize) -> Vec<f32> {
        let mut out = vec![0.0; n];
        if let Some(row) = self.0.get(layer).and_then(|matrix| matrix.get(source)) {
            for (slot, value) in out.iter_mut().zip(row.iter()) {
                *slot = *value;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer_tensor() -> AttentionTensor {
        AttentionTensor::new(vec![
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![vec![0.25, 0.75], vec![0.5, 0.5]],
        ])
    }

    #[test]
    fn test_row_lookup() {
        let tensor = two_layer_tensor();
        assert_eq!(tensor.row(0, 0, 2), vec![1.0, 0.0]);
        assert_eq!(tensor.row(1, 1, 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_missing_layer_yields_zeros() {
        let tensor = two_layer_tensor();
        assert_eq!(tensor.row(9, 0, 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_source_yields_zeros() {
        let tensor = two_layer_tensor();
        assert_eq!(tensor.row(0, 7, 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_row_is_padded_and_truncated_to_token_count() {
        let ragged = AttentionTensor::new(vec![vec![vec![0.9]]]);
        // Shorter row than the current token count pads with zeros.
        assert_eq!(ragged.row(0, 0, 3), vec![0.9, 0.0, 0.0]);
        // Longer row truncates.
        let wide = AttentionTensor::new(vec![vec![vec![0.1, 0.2, 0.3]]]);
        assert_eq!(wide.row(0, 0, 2), vec![0.1, 0.2]);
    }

    #[test]
    fn test_empty_tensor() {
        let tensor = AttentionTensor::default();
        assert!(tensor.is_empty());
        assert_eq!(tensor.layer_count(), 0);
        assert_eq!(tensor.head_count(0), 0);
        assert_eq!(tensor.row(0, 0, 4), vec![0.0; 4]);
    }

    #[test]
    fn test_shape_queries() {
        let tensor = two_layer_tensor();
        assert_eq!(tensor.layer_count(), 2);
        assert_eq!(tensor.head_count(0), 2);
        assert_eq!(tensor.head_count(5), 0);
    }

    #[test]
    fn test_deserializes_from_wire_nesting() {
        let tensor: AttentionTensor =
            serde_json::from_str("[[[0.5, 0.5], [1.0, 0.0]]]").unwrap();
        assert_eq!(tensor.layer_count(), 1);
        assert_eq!(tensor.row(0, 1, 2), vec![1.0, 0.0]);
    }
}
