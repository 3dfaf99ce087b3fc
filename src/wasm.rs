//! JavaScript binding. The generated module's `init` must resolve before
//! `calculate` is callable; initializing again is a no-op.

use wasm_bindgen::prelude::*;

/// Evaluate `expression`, throwing `"Error: <message>"` on failure.
#[wasm_bindgen]
pub fn calculate(expression: &str) -> Result<f64, JsValue> {
    crate::calculate(expression).map_err(|e| JsValue::from_str(&e.host_message()))
}
