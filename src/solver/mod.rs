//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for DC circuit analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and voltage source currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ Bᵗ  0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B connects voltage sources to nodes
//! - v is the vector of node voltages (reference node excluded)
//! - j is the vector of voltage source currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source magnitudes
//!
//! Meters are ideal: voltmeters draw no current and ammeters have no
//! impedance, so neither adds an unknown. Their readings are derived from
//! the solved system by the [`analyzer`].

mod analyzer;
mod mna;
mod solution;

pub use analyzer::solve;
pub use mna::{MnaMatrix, MnaSystem};
pub use solution::{BranchCurrent, Solution, WattmeterReading};

/// Relative pivot threshold below which the system is treated as singular.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Pivot threshold, relative to the largest matrix entry.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative pivot tolerance.
    ///
    /// Raising it rejects nearly singular circuits (for example a huge
    /// resistor bridging an otherwise floating part) instead of returning
    /// very large voltages.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }
}
