//! Token geometry.
//!
//! The connection diagram needs the vertical center of each rendered token,
//! measured in the overlay canvas's frame. Column height depends on live
//! text wrapping, so centers come from actual element geometry rather than
//! font-metric estimates, and are recaptured on every render pass.

use web_sys::{Document, Element};

/// Vertical center of each rendered token, relative to the connection
/// overlay's drawing surface.
pub trait LayoutProvider {
    /// Center of token `index`, or `0.0` when its element is not mounted
    /// yet (first paint before layout settles).
    fn center_of(&self, index: usize) -> f64;
}

/// Live geometry read from the source-column token elements.
///
/// `capture` builds a fresh owned snapshot sized to the current token count,
/// so a shorter sequence can never expose stale slots from a longer one.
pub struct DomLayout {
    centers: Vec<f64>,
}

impl DomLayout {
    /// Measure the current token elements against the overlay's frame.
    pub fn capture(document: &Document, overlay: &Element, count: usize) -> Self {
        let overlay_top = overlay.get_bounding_client_rect().top();
        let mut centers = Vec::with_capacity(count);
        for index in 0..count {
            let center = document
                .get_element_by_id(&format!("source-token-{}", index))
                .map(|element| {
                    let rect = element.get_bounding_client_rect();
                    rect.top() + rect.height() / 2.0 - overlay_top
                })
                .unwrap_or(0.0);
            centers.push(center);
        }
        Self { centers }
    }
}

impl LayoutProvider for DomLayout {
    fn center_of(&self, index: usize) -> f64 {
        self.centers.get(index).copied().unwrap_or(0.0)
    }
}

/// Deterministic coordinates for tests and headless scene assembly.
pub struct FixedLayout {
    centers: Vec<f64>,
}

impl FixedLayout {
    pub fn new(centers: Vec<f64>) -> Self {
        Self { centers }
    }

    /// Evenly spaced centers, a synthetic stand-in for a rendered column.
    pub fn uniform(count: usize, spacing: f64) -> Self {
        Self {
            centers: (0..count)
                .map(|index| spacing / 2.0 + index as f64 * spacing)
                .collect(),
        }
    }
}

impl LayoutProvider for FixedLayout {
    fn center_of(&self, index: usize) -> f64 {
        self.centers.get(index).copied().unwrap_or(0.0)
    }
}
