//! DC solve and post-solve analysis.
//!
//! Ammeters and wattmeter current legs are merged away before the matrix is
//! built, so their currents have no unknown of their own. They are recovered
//! afterwards on the probe network (the meter-preserving reduction), whose
//! current-carrying branches line up one-to-one, in declaration order, with
//! those of the solved circuit.

use crate::circuit::{Branch, BranchKind, Circuit, NodeId, ProbeNetwork};
use crate::error::{OhmsolveError, Result};

use super::mna::MnaSystem;
use super::solution::{BranchCurrent, Solution, WattmeterReading};
use super::SolverConfig;

/// Solve a circuit and derive every current and meter reading.
pub fn solve(circuit: &Circuit, config: &SolverConfig) -> Result<Solution> {
    let _span = tracing::info_span!(
        "dc_solve",
        nodes = circuit.node_count(),
        reference = %circuit.reference()
    )
    .entered();

    let system = MnaSystem::assemble(circuit);
    let mut matrix = system.augmented();
    matrix.factor(config.pivot_tolerance)?;
    matrix.solve()?;

    let mut node_voltages = vec![0.0; circuit.node_count()];
    for id in 1..=circuit.node_count() {
        if let Some(row) = circuit.node_index(NodeId(id)) {
            node_voltages[id - 1] = matrix.x[row];
        }
    }
    let source_currents = matrix.x[system.nodes..].to_vec();

    let voltage = |node: NodeId| {
        if node.is_ground() {
            0.0
        } else {
            node_voltages[node.0 - 1]
        }
    };

    let mut branch_currents = Vec::new();
    let mut voltmeters = Vec::new();
    let mut wattmeter_voltages = Vec::new();
    let mut column = 0usize;
    for (index, branch) in circuit.branches().iter().enumerate() {
        let current = match branch.kind {
            BranchKind::CurrentSource => branch.value,
            BranchKind::VoltageSource => {
                let x = source_currents[column];
                column += 1;
                // The MNA unknown runs against the source polarity
                if branch.value > 0.0 {
                    -x
                } else {
                    x
                }
            }
            BranchKind::Resistor => (voltage(branch.a) - voltage(branch.b)) / branch.value,
            BranchKind::Voltmeter => {
                voltmeters.push(branch.orientation() * (voltage(branch.a) - voltage(branch.b)));
                continue;
            }
            BranchKind::WattmeterVoltage => {
                wattmeter_voltages
                    .push(branch.orientation() * (voltage(branch.a) - voltage(branch.b)));
                continue;
            }
            _ => continue,
        };
        branch_currents.push(BranchCurrent {
            branch: *branch,
            current,
            reversed: circuit.is_reversed(index),
        });
    }

    let (ammeters, wattmeter_currents) = match circuit.probes() {
        Some(probes) => {
            let known: Vec<f64> = branch_currents.iter().map(|c| c.canonical_current()).collect();
            probe_readings(probes, &known)?
        }
        None => (Vec::new(), Vec::new()),
    };

    if wattmeter_currents.len() != wattmeter_voltages.len() {
        tracing::warn!(
            current_legs = wattmeter_currents.len(),
            voltage_legs = wattmeter_voltages.len(),
            "unpaired wattmeter legs are ignored"
        );
    }
    let wattmeters = wattmeter_currents
        .iter()
        .zip(&wattmeter_voltages)
        .map(|(&current, &voltage)| WattmeterReading { current, voltage })
        .collect();

    tracing::debug!(
        branches = branch_currents.len(),
        voltmeters = voltmeters.len(),
        ammeters = ammeters.len(),
        "derived branch quantities"
    );

    Ok(Solution {
        reference: circuit.reference(),
        node_voltages,
        source_currents,
        branch_currents,
        voltmeters,
        ammeters,
        wattmeters,
    })
}

/// Outcome of inspecting a meter leg's neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolution {
    /// Exactly one neighbour at an endpoint; the meter carries its current
    Series(f64),
    /// Kirchhoff's current law closes at an endpoint
    Junction(f64),
    /// Both endpoints meet another meter whose current is still unknown
    Unresolved,
}

/// Reconstruct current meter readings on the probe network.
///
/// `known` holds the canonical currents of the solved circuit's
/// current-carrying branches, in declaration order. Returns ammeter and
/// wattmeter current-leg readings, each in declaration order.
fn probe_readings(probes: &ProbeNetwork, known: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let branches = &probes.branches;

    let mut known = known.iter().copied();
    let mut currents: Vec<Option<f64>> = branches
        .iter()
        .map(|b| {
            if b.kind.is_current_carrying() {
                known.next()
            } else {
                None
            }
        })
        .collect();

    let mut pending: Vec<usize> = branches
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind.is_current_probe())
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(
        nodes = probes.node_count,
        meters = pending.len(),
        "resolving meter currents"
    );

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&meter| match resolve_meter(branches, &currents, meter) {
            Resolution::Series(current) | Resolution::Junction(current) => {
                currents[meter] = Some(current);
                false
            }
            Resolution::Unresolved => true,
        });

        if pending.len() == before {
            return Err(OhmsolveError::UnresolvedMeter {
                index: pending[0] + 1,
            });
        }
    }

    let mut ammeters = Vec::new();
    let mut wattmeters = Vec::new();
    for (branch, current) in branches.iter().zip(&currents) {
        let reading = branch.orientation() * current.unwrap_or(0.0);
        match branch.kind {
            BranchKind::Ammeter => ammeters.push(reading),
            BranchKind::WattmeterCurrent => wattmeters.push(reading),
            _ => {}
        }
    }
    Ok((ammeters, wattmeters))
}

/// Branches through which current can enter or leave `node`, other than `meter`.
fn neighbours(branches: &[Branch], meter: usize, node: NodeId) -> Vec<usize> {
    branches
        .iter()
        .enumerate()
        .filter(|&(i, b)| {
            i != meter && b.a != b.b && b.touches(node) && !b.kind.is_voltage_probe()
        })
        .map(|(i, _)| i)
        .collect()
}

/// Current leaving `node` through all `others`, if every one is known.
fn outflow(branches: &[Branch], currents: &[Option<f64>], others: &[usize], node: NodeId) -> Option<f64> {
    others
        .iter()
        .map(|&i| currents[i].map(|c| branches[i].outflow(node, c)))
        .sum()
}

/// Current through meter leg `meter`, from its A endpoint to its B endpoint.
fn resolve_meter(branches: &[Branch], currents: &[Option<f64>], meter: usize) -> Resolution {
    let leg = &branches[meter];
    if leg.a == leg.b {
        return Resolution::Series(0.0);
    }

    // Current leaving A through the meter balances everything else leaving A;
    // at B the balance has the opposite sign.
    let ends = [(leg.a, -1.0), (leg.b, 1.0)];
    let incident = ends.map(|(node, _)| neighbours(branches, meter, node));

    for ((node, sign), others) in ends.iter().zip(&incident) {
        if others.len() == 1 {
            if let Some(out) = outflow(branches, currents, others, *node) {
                return Resolution::Series(sign * out);
            }
        }
    }

    for ((node, sign), others) in ends.iter().zip(&incident) {
        if let Some(out) = outflow(branches, currents, others, *node) {
            return Resolution::Junction(sign * out);
        }
    }

    Resolution::Unresolved
}
