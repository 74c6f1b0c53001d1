//! WASM bindings for Ohmsolve Core.
//!
//! Exposes the whole parse, solve and report pipeline to a browser front end
//! as a single call.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { solve, version } from 'ohmsolve_core';
//!
//! await init();
//!
//! const netlist = `
//!   E 0 0 0 40 9
//!   W 0 40 40 40
//!   R 40 40 40 0 10
//!   W 40 0 0 0
//! `;
//!
//! try {
//!   console.log(solve(netlist, 1));
//! } catch (err) {
//!   console.error(err);
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::Circuit;
use crate::netlist;
use crate::report::report_string;
use crate::solver::SolverConfig;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Solve a netlist and return the text report.
///
/// # Arguments
/// * `netlist` - The netlist text
/// * `reference` - Node held at 0 V (1-based)
///
/// # Returns
/// The report, one line per current or meter reading, or the error message.
#[wasm_bindgen]
pub fn solve(netlist: &str, reference: usize) -> Result<String, JsValue> {
    let records = netlist::parse(netlist).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut circuit =
        Circuit::from_netlist(&records).map_err(|e| JsValue::from_str(&e.to_string()))?;
    circuit
        .set_reference_node(reference)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let solution = circuit
        .solve(&SolverConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    report_string(solution).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
