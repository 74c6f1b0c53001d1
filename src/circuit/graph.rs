//! Circuit model: canonical branches, reference folding, cached solution.

use std::collections::HashMap;

use super::reduce::{reduce, ReductionMode};
use super::types::{Branch, NodeId};
use super::validate::validate_branches;
use crate::error::{OhmsolveError, Result};
use crate::netlist::RawBranch;
use crate::solver::{self, Solution, SolverConfig};

/// Meter-preserving view of the circuit, used to reconstruct the current
/// through ammeters and wattmeter current legs after solving.
#[derive(Debug, Clone)]
pub struct ProbeNetwork {
    /// Branches in declaration order, wires merged away
    pub branches: Vec<Branch>,
    /// Number of nodes in this finer view
    pub node_count: usize,
}

/// A reduced circuit ready for solving.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Number of canonical nodes (ids 1..=node_count)
    node_count: usize,

    /// Node held at 0 V
    reference: NodeId,

    /// Branches as produced by reduction, before folding
    canonical: Vec<Branch>,

    /// Branches with the reference node folded onto ground
    branches: Vec<Branch>,

    /// Whether folding swapped the endpoints of each branch
    reversed: Vec<bool>,

    /// Meter adjacency, present when built from a netlist
    probes: Option<ProbeNetwork>,

    /// Result of the last successful solve
    solution: Option<Solution>,
}

impl Circuit {
    /// Build a circuit from already reduced branches.
    ///
    /// The reference node defaults to node 1.
    pub fn new(branches: Vec<Branch>, node_count: usize) -> Result<Self> {
        validate_branches(&branches, node_count)?;

        let canonical = assign_parallel_indices(branches);
        let reference = NodeId(1);
        let (branches, reversed) = fold_all(&canonical, reference);

        Ok(Self {
            node_count,
            reference,
            canonical,
            branches,
            reversed,
            probes: None,
            solution: None,
        })
    }

    /// Build a circuit from parsed netlist records.
    ///
    /// The records are reduced twice: once with every zero-impedance link
    /// merged (the solved circuit) and once keeping current meters (the probe
    /// network).
    pub fn from_netlist(records: &[RawBranch]) -> Result<Self> {
        let solved = reduce(records, ReductionMode::Solve);
        let preserved = reduce(records, ReductionMode::PreserveMeters);

        let mut circuit = Self::new(solved.branches, solved.node_count)?;
        if preserved.branches.iter().any(|b| b.kind.is_current_probe()) {
            circuit.probes = Some(ProbeNetwork {
                branches: preserved.branches,
                node_count: preserved.node_count,
            });
        }
        Ok(circuit)
    }

    /// Number of canonical nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The node currently held at 0 V.
    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Branches with the reference node folded onto ground (id 0).
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Branches as reduced, independent of the reference node.
    pub fn canonical_branches(&self) -> &[Branch] {
        &self.canonical
    }

    /// Whether folding swapped the endpoints of branch `index`.
    pub fn is_reversed(&self, index: usize) -> bool {
        self.reversed[index]
    }

    /// Meter-preserving view, if the circuit contains current meters.
    pub fn probes(&self) -> Option<&ProbeNetwork> {
        self.probes.as_ref()
    }

    /// Choose the reference node and fold it onto ground.
    ///
    /// Drops any previously computed solution.
    pub fn set_reference_node(&mut self, node: usize) -> Result<()> {
        if node == 0 || node > self.node_count {
            return Err(OhmsolveError::ReferenceOutOfRange {
                node,
                node_count: self.node_count,
            });
        }

        self.reference = NodeId(node);
        let (branches, reversed) = fold_all(&self.canonical, self.reference);
        self.branches = branches;
        self.reversed = reversed;
        self.solution = None;
        Ok(())
    }

    /// Number of voltage sources (extra MNA unknowns).
    pub fn num_voltage_sources(&self) -> usize {
        self.branches
            .iter()
            .filter(|b| b.kind == super::BranchKind::VoltageSource)
            .count()
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        // Nodes (excluding the reference) + voltage source currents
        (self.node_count - 1) + self.num_voltage_sources()
    }

    /// Get the matrix row for a folded node id.
    /// Returns None for ground.
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        if node.is_ground() || node == self.reference {
            None
        } else if node < self.reference {
            Some(node.0 - 1)
        } else {
            Some(node.0 - 2)
        }
    }

    /// Solve the circuit, caching and returning the solution.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<&Solution> {
        let solution = solver::solve(self, config)?;
        Ok(&*self.solution.insert(solution))
    }

    /// The solution of the last successful solve.
    pub fn solution(&self) -> Result<&Solution> {
        self.solution.as_ref().ok_or(OhmsolveError::NotSolved)
    }
}

fn fold_all(canonical: &[Branch], reference: NodeId) -> (Vec<Branch>, Vec<bool>) {
    canonical.iter().map(|b| b.fold(reference)).unzip()
}

/// Number current-carrying branches that share a node pair with another one.
fn assign_parallel_indices(mut branches: Vec<Branch>) -> Vec<Branch> {
    let pair = |b: &Branch| (b.a.min(b.b), b.a.max(b.b));

    let mut totals: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    for b in branches.iter().filter(|b| b.kind.is_current_carrying()) {
        *totals.entry(pair(b)).or_default() += 1;
    }

    let mut seen: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    for b in branches.iter_mut().filter(|b| b.kind.is_current_carrying()) {
        let key = pair(b);
        if totals[&key] > 1 {
            let k = seen.entry(key).or_default();
            *k += 1;
            b.parallel = Some(*k);
        }
    }
    branches
}
