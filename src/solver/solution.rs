//! Solved state of a circuit.

use crate::circuit::{Branch, NodeId};

/// Current through one current-carrying branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchCurrent {
    /// The branch as solved (reference node folded onto ground)
    pub branch: Branch,
    /// Current flowing from `branch.a` to `branch.b`, in amperes
    pub current: f64,
    /// Whether folding swapped the endpoints relative to the reduced circuit
    pub reversed: bool,
}

impl BranchCurrent {
    /// Current in the orientation of the reduced (unfolded) branch.
    ///
    /// Unlike [`BranchCurrent::current`], this does not depend on the
    /// reference node.
    pub fn canonical_current(&self) -> f64 {
        if self.reversed {
            -self.current
        } else {
            self.current
        }
    }
}

/// Reading of one wattmeter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WattmeterReading {
    /// Current-leg reading, in amperes
    pub current: f64,
    /// Voltage-leg reading, in volts
    pub voltage: f64,
}

impl WattmeterReading {
    /// Measured power, in watts.
    pub fn power(&self) -> f64 {
        self.current * self.voltage
    }
}

/// Everything derived from one successful solve.
///
/// A `Solution` is built in one piece by the analyzer; it never holds a
/// partial result.
#[derive(Debug, Clone)]
pub struct Solution {
    pub(crate) reference: NodeId,
    /// Indexed by canonical node id - 1
    pub(crate) node_voltages: Vec<f64>,
    /// One per voltage source, in declaration order
    pub(crate) source_currents: Vec<f64>,
    pub(crate) branch_currents: Vec<BranchCurrent>,
    pub(crate) voltmeters: Vec<f64>,
    pub(crate) ammeters: Vec<f64>,
    pub(crate) wattmeters: Vec<WattmeterReading>,
}

impl Solution {
    /// The node that was held at 0 V.
    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Voltage of a node, using either canonical or folded ids.
    ///
    /// Ground (id 0) and the reference node read 0 V.
    pub fn voltage(&self, node: NodeId) -> f64 {
        if node.is_ground() {
            0.0
        } else {
            self.node_voltages[node.0 - 1]
        }
    }

    /// All node voltages, indexed by canonical id - 1.
    pub fn node_voltages(&self) -> &[f64] {
        &self.node_voltages
    }

    /// Raw MNA currents of the voltage sources, in declaration order.
    pub fn source_currents(&self) -> &[f64] {
        &self.source_currents
    }

    /// Currents of resistors and sources, in declaration order.
    pub fn branch_currents(&self) -> &[BranchCurrent] {
        &self.branch_currents
    }

    /// Voltmeter readings, in volts.
    pub fn voltmeter_readings(&self) -> &[f64] {
        &self.voltmeters
    }

    /// Ammeter readings, in amperes.
    pub fn ammeter_readings(&self) -> &[f64] {
        &self.ammeters
    }

    /// Wattmeter readings.
    pub fn wattmeter_readings(&self) -> &[WattmeterReading] {
        &self.wattmeters
    }
}
