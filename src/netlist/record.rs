//! Record types produced by the netlist parser.

use std::fmt;

use crate::circuit::{BranchKind, NodeId};

/// Opaque identity of a schematic point before reduction.
///
/// Two labels are equal exactly when they name the same coordinate pair.
/// Integer coordinates are normalized, so `"010"` and `"10"` coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Build a label from the two coordinate tokens of an endpoint.
    pub fn from_tokens(x: &str, y: &str) -> Self {
        match (x.parse::<i64>(), y.parse::<i64>()) {
            (Ok(x), Ok(y)) => Self::at(x, y),
            _ => Label(format!("{},{}", x, y)),
        }
    }

    /// Build a label for an integer grid point.
    pub fn at(x: i64, y: i64) -> Self {
        Label(format!("{},{}", x, y))
    }
}

impl From<NodeId> for Label {
    fn from(node: NodeId) -> Self {
        Label(format!("node{}", node.0))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// Record kinds accepted in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A record that maps directly onto one branch
    Branch(BranchKind),
    /// A four-terminal wattmeter, desugared into two legs
    RawWattmeter,
}

impl RecordKind {
    /// Parse a record kind from its keyword or alias.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let kind = match keyword.to_ascii_lowercase().as_str() {
            "resistor" | "r" => BranchKind::Resistor,
            "voltage-source" | "e" | "v" => BranchKind::VoltageSource,
            "current-source" | "j" | "i" => BranchKind::CurrentSource,
            "voltmeter" | "vm" => BranchKind::Voltmeter,
            "wire" | "w" => BranchKind::Wire,
            "ammeter" | "am" => BranchKind::Ammeter,
            "wattmeter-voltage-leg" | "wv" => BranchKind::WattmeterVoltage,
            "wattmeter-current-leg" | "wa" => BranchKind::WattmeterCurrent,
            "raw-wattmeter" | "wattmeter" | "wm" | "p" => return Some(Self::RawWattmeter),
            _ => return None,
        };
        Some(Self::Branch(kind))
    }
}

/// A branch as read from the netlist, keyed by schematic labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBranch {
    pub a: Label,
    pub b: Label,
    pub kind: BranchKind,
    pub value: f64,
    /// Source line number for diagnostics
    pub line: usize,
}

impl RawBranch {
    /// Create a raw branch.
    pub fn new(a: Label, b: Label, kind: BranchKind, value: f64, line: usize) -> Self {
        Self {
            a,
            b,
            kind,
            value,
            line,
        }
    }
}
