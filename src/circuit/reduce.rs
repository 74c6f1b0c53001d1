//! Topology reduction: collapse equal-potential labels into canonical nodes.
//!
//! Wires and ideal current meters are zero-impedance links. Any number of
//! them may be chained between two physically identical points, so the
//! labels they join are merged by closure (a union-find over labels), not by
//! a single rewrite pass.

use std::collections::HashMap;

use super::types::{Branch, BranchKind, NodeId};
use crate::netlist::{Label, RawBranch};

/// Which branches count as zero-impedance links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionMode {
    /// Wires, ammeters and wattmeter current legs are merged away.
    Solve,
    /// Only wires are merged; current meters are kept as branches so their
    /// neighbourhood can be inspected after solving.
    PreserveMeters,
}

impl ReductionMode {
    fn is_link(self, kind: BranchKind) -> bool {
        match self {
            Self::Solve => kind == BranchKind::Wire || kind.is_current_probe(),
            Self::PreserveMeters => kind == BranchKind::Wire,
        }
    }
}

/// Result of reducing a raw netlist.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Surviving branches, in declaration order
    pub branches: Vec<Branch>,
    /// Number of canonical nodes; ids are 1..=node_count
    pub node_count: usize,
    /// Canonical node of every label that reached a surviving branch
    pub nodes: HashMap<Label, NodeId>,
}

/// Union-find over interned labels.
struct LabelSet {
    parent: Vec<usize>,
}

impl LabelSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i != root_j {
            self.parent[root_i] = root_j;
        }
    }
}

/// Reduce raw branches to canonical nodes.
///
/// Node ids are assigned from 1 in first-encounter order while walking the
/// surviving branches (endpoint A before endpoint B).
pub fn reduce(raw: &[RawBranch], mode: ReductionMode) -> Reduction {
    let _span = tracing::debug_span!("reduce", ?mode, records = raw.len()).entered();

    // Intern labels
    let mut index: HashMap<&Label, usize> = HashMap::new();
    let mut labels: Vec<&Label> = Vec::new();
    let mut endpoints: Vec<(usize, usize)> = Vec::with_capacity(raw.len());
    for branch in raw {
        let mut ends = [0usize; 2];
        for (slot, label) in ends.iter_mut().zip([&branch.a, &branch.b]) {
            *slot = *index.entry(label).or_insert_with(|| {
                labels.push(label);
                labels.len() - 1
            });
        }
        endpoints.push((ends[0], ends[1]));
    }

    let mut set = LabelSet::new(labels.len());
    let mut links = 0usize;
    for (branch, &(a, b)) in raw.iter().zip(&endpoints) {
        if mode.is_link(branch.kind) {
            set.union(a, b);
            links += 1;
        }
    }

    let mut ids: HashMap<usize, NodeId> = HashMap::new();
    let mut branches = Vec::with_capacity(raw.len() - links);
    for (branch, &(a, b)) in raw.iter().zip(&endpoints) {
        if mode.is_link(branch.kind) {
            continue;
        }
        let mut canonical = |label: usize| -> NodeId {
            let root = set.find(label);
            let next = NodeId(ids.len() + 1);
            *ids.entry(root).or_insert(next)
        };
        let node_a = canonical(a);
        let node_b = canonical(b);
        branches.push(Branch::new(node_a, node_b, branch.kind, branch.value));
    }

    let mut nodes = HashMap::new();
    for (i, label) in labels.iter().enumerate() {
        if let Some(&id) = ids.get(&set.find(i)) {
            nodes.insert((*label).clone(), id);
        }
    }

    tracing::debug!(
        links,
        branches = branches.len(),
        node_count = ids.len(),
        "reduced topology"
    );

    Reduction {
        branches,
        node_count: ids.len(),
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(a: (i64, i64), b: (i64, i64), kind: BranchKind, value: f64) -> RawBranch {
        RawBranch::new(Label::at(a.0, a.1), Label::at(b.0, b.1), kind, value, 0)
    }

    fn relabel(reduction: &Reduction) -> Vec<RawBranch> {
        reduction
            .branches
            .iter()
            .map(|b| RawBranch::new(Label::from(b.a), Label::from(b.b), b.kind, b.value, 0))
            .collect()
    }

    #[test]
    fn test_chained_wires_merge_in_any_order() {
        // Wires declared far end first: (3,0)->(4,0), then (2,0)->(3,0), ...
        let records = vec![
            raw((0, 0), (1, 0), BranchKind::Resistor, 10.0),
            raw((3, 0), (4, 0), BranchKind::Wire, 0.0),
            raw((2, 0), (3, 0), BranchKind::Wire, 0.0),
            raw((1, 0), (2, 0), BranchKind::Wire, 0.0),
            raw((4, 0), (0, 0), BranchKind::VoltageSource, 5.0),
        ];
        let reduction = reduce(&records, ReductionMode::Solve);

        assert_eq!(reduction.node_count, 2);
        assert_eq!(reduction.branches.len(), 2);
        assert_eq!(reduction.branches[0].a, NodeId(1));
        assert_eq!(reduction.branches[0].b, NodeId(2));
        assert_eq!(reduction.branches[1].a, NodeId(2));
        assert_eq!(reduction.branches[1].b, NodeId(1));
        assert_eq!(reduction.nodes[&Label::at(3, 0)], NodeId(2));
    }

    #[test]
    fn test_meters_are_links_only_when_solving() {
        let records = vec![
            raw((0, 0), (1, 0), BranchKind::VoltageSource, 9.0),
            raw((1, 0), (2, 0), BranchKind::Ammeter, 1.0),
            raw((2, 0), (0, 0), BranchKind::Resistor, 10.0),
        ];

        let solve = reduce(&records, ReductionMode::Solve);
        assert_eq!(solve.node_count, 2);
        assert_eq!(solve.branches.len(), 2);

        let preserved = reduce(&records, ReductionMode::PreserveMeters);
        assert_eq!(preserved.node_count, 3);
        assert_eq!(preserved.branches.len(), 3);
        assert_eq!(preserved.branches[1].kind, BranchKind::Ammeter);
        assert_eq!(preserved.branches[1].a, NodeId(2));
        assert_eq!(preserved.branches[1].b, NodeId(3));
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let records = vec![
            raw((0, 0), (0, 4), BranchKind::VoltageSource, 9.0),
            raw((0, 4), (4, 4), BranchKind::Wire, 0.0),
            raw((4, 4), (4, 0), BranchKind::Resistor, 10.0),
            raw((4, 4), (8, 0), BranchKind::Resistor, 20.0),
            raw((8, 0), (4, 0), BranchKind::Wire, 0.0),
            raw((4, 0), (0, 0), BranchKind::Ammeter, 1.0),
            raw((4, 4), (0, 0), BranchKind::Voltmeter, 1.0),
        ];
        let first = reduce(&records, ReductionMode::Solve);
        let second = reduce(&relabel(&first), ReductionMode::Solve);

        assert_eq!(first.node_count, second.node_count);
        assert_eq!(first.branches, second.branches);
    }

    #[test]
    fn test_dangling_wire_labels_are_not_mapped() {
        let records = vec![
            raw((0, 0), (1, 0), BranchKind::Resistor, 10.0),
            raw((5, 5), (6, 6), BranchKind::Wire, 0.0),
        ];
        let reduction = reduce(&records, ReductionMode::Solve);
        assert_eq!(reduction.node_count, 2);
        assert!(!reduction.nodes.contains_key(&Label::at(5, 5)));
    }
}
