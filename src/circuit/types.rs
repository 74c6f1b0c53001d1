//! Core types for circuit representation.

use std::fmt;

/// A unique identifier for a node in the circuit.
///
/// Canonical nodes are numbered densely from 1. Id 0 is the reference node
/// once it has been folded to ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The ground node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a branch is, electrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Resistor; value is the resistance in ohms
    Resistor,
    /// Ideal voltage source; value is the EMF, positive when B is the + terminal
    VoltageSource,
    /// Ideal current source; value is the current flowing from A to B
    CurrentSource,
    /// Ideal voltmeter; value is the orientation sign
    Voltmeter,
    /// Ideal wire
    Wire,
    /// Ideal ammeter; value is the orientation sign
    Ammeter,
    /// Voltage-sense leg of a wattmeter; value is the orientation sign
    WattmeterVoltage,
    /// Current-sense leg of a wattmeter; value is the orientation sign
    WattmeterCurrent,
}

impl BranchKind {
    /// Branches that take part in the nodal equations.
    pub fn is_current_carrying(&self) -> bool {
        matches!(self, Self::Resistor | Self::VoltageSource | Self::CurrentSource)
    }

    /// Zero-draw meters, read off as a voltage difference.
    pub fn is_voltage_probe(&self) -> bool {
        matches!(self, Self::Voltmeter | Self::WattmeterVoltage)
    }

    /// Zero-impedance meters whose current is reconstructed after solving.
    pub fn is_current_probe(&self) -> bool {
        matches!(self, Self::Ammeter | Self::WattmeterCurrent)
    }

    /// Whether the value changes sign when the branch is reversed.
    pub fn is_polarized(&self) -> bool {
        !matches!(self, Self::Resistor | Self::Wire)
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resistor => "resistor",
            Self::VoltageSource => "voltage-source",
            Self::CurrentSource => "current-source",
            Self::Voltmeter => "voltmeter",
            Self::Wire => "wire",
            Self::Ammeter => "ammeter",
            Self::WattmeterVoltage => "wattmeter-voltage-leg",
            Self::WattmeterCurrent => "wattmeter-current-leg",
        };
        f.write_str(name)
    }
}

/// A two-terminal branch between canonical nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    /// First endpoint
    pub a: NodeId,
    /// Second endpoint
    pub b: NodeId,
    /// Disambiguation index among parallel branches on the same node pair
    pub parallel: Option<usize>,
    pub kind: BranchKind,
    pub value: f64,
}

impl Branch {
    /// Create a new branch without a parallel index.
    pub fn new(a: NodeId, b: NodeId, kind: BranchKind, value: f64) -> Self {
        Self {
            a,
            b,
            parallel: None,
            kind,
            value,
        }
    }

    /// Orientation of a meter: -1 for a negative value, +1 otherwise.
    pub fn orientation(&self) -> f64 {
        if self.value < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    /// Fold `reference` onto ground.
    ///
    /// Returns the remapped branch and whether its endpoints were swapped.
    /// A swapped polarized branch has its value negated.
    pub fn fold(&self, reference: NodeId) -> (Branch, bool) {
        let map = |n: NodeId| if n == reference { NodeId::GROUND } else { n };
        if self.b == reference {
            let value = if self.kind.is_polarized() { -self.value } else { self.value };
            let folded = Branch {
                a: NodeId::GROUND,
                b: map(self.a),
                value,
                ..*self
            };
            (folded, true)
        } else {
            let folded = Branch {
                a: map(self.a),
                b: map(self.b),
                ..*self
            };
            (folded, false)
        }
    }

    /// Check whether `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Current leaving `node` through this branch, given the branch current
    /// flowing from A to B. Self-loops contribute nothing.
    pub fn outflow(&self, node: NodeId, current: f64) -> f64 {
        match (self.a == node, self.b == node) {
            (true, false) => current,
            (false, true) => -current,
            _ => 0.0,
        }
    }

    /// Label used in reports, e.g. `I_1_0` or `I_2_3_2`.
    pub fn current_label(&self) -> String {
        match self.parallel {
            Some(k) => format!("I_{}_{}_{}", self.a, self.b, k),
            None => format!("I_{}_{}", self.a, self.b),
        }
    }
}
