//! Attention Visualization
//!
//! Browser front end for a token-pair attention tensor: a hover-driven
//! connection diagram between two token columns, and a dense heatmap-matrix
//! view, fed by an external scoring backend.

mod fetch;
mod layout;
mod scene;
mod state;
mod viz;

#[cfg(test)]
mod tests;

use wasm_bindgen::prelude::*;

/// Initialize the visualization app
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in WASM
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    viz::init()
}
