//! # Ohmsolve Core
//!
//! A DC circuit solver for netlists drawn on a schematic grid.
//!
//! This library provides:
//! - A line-oriented netlist format where endpoints are schematic coordinates
//! - Topology reduction of wires and ideal meters into electrical nodes
//! - Modified Nodal Analysis (MNA) with a selectable reference node
//! - Ideal voltmeter, ammeter and wattmeter readings
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`netlist`] - Lexer and parser for the netlist format
//! - [`circuit`] - Topology reduction, reference folding and validation
//! - [`solver`] - MNA matrix assembly, LU solving and post-solve analysis
//! - [`report`] - Text report of a solution
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! ohmsolve circuit.net --reference 2
//! RUST_LOG=debug ohmsolve - < circuit.net
//! ```
//!
//! ### Library
//!
//! ```
//! use ohmsolve_core::{netlist, Circuit, SolverConfig};
//!
//! let records = netlist::parse("E 0 0 0 40 9\nW 0 40 40 40\nR 40 40 40 0 10\nW 40 0 0 0\n")?;
//! let mut circuit = Circuit::from_netlist(&records)?;
//! let solution = circuit.solve(&SolverConfig::default())?;
//! assert!((solution.branch_currents()[1].current - 0.9).abs() < 1e-9);
//! # Ok::<(), ohmsolve_core::OhmsolveError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import init, { solve } from 'ohmsolve_core';
//!
//! await init();
//! const report = solve(netlistText, 1);
//! ```

pub mod circuit;
pub mod error;
pub mod netlist;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{OhmsolveError, Result};
pub use solver::{Solution, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::solve;
