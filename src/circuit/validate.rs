//! Circuit validation.

use crate::error::{OhmsolveError, Result};

use super::types::{Branch, BranchKind};

/// Validate reduced branches before building a circuit.
///
/// Checks:
/// - Node ids form the dense range 1..=node_count
/// - No zero-impedance links survived reduction
/// - Every value is finite and every resistance is nonzero
pub fn validate_branches(branches: &[Branch], node_count: usize) -> Result<()> {
    if branches.is_empty() || node_count == 0 {
        return Err(OhmsolveError::topology("Circuit has no branches"));
    }

    let mut used = vec![false; node_count];
    for (index, branch) in branches.iter().enumerate() {
        for node in [branch.a, branch.b] {
            if node.0 == 0 || node.0 > node_count {
                return Err(OhmsolveError::topology(format!(
                    "branch {} uses node {} outside 1..={}",
                    index + 1,
                    node,
                    node_count
                )));
            }
            used[node.0 - 1] = true;
        }

        if matches!(branch.kind, BranchKind::Wire) || branch.kind.is_current_probe() {
            return Err(OhmsolveError::topology(format!(
                "branch {} is a {} and must be reduced away before solving",
                index + 1,
                branch.kind
            )));
        }

        if !branch.value.is_finite() {
            return Err(OhmsolveError::topology(format!(
                "branch {} has a non-finite value",
                index + 1
            )));
        }

        if branch.kind == BranchKind::Resistor && branch.value == 0.0 {
            return Err(OhmsolveError::topology(format!(
                "resistor {} has zero resistance; use a wire instead",
                branch.current_label()
            )));
        }
    }

    if let Some(gap) = used.iter().position(|&u| !u) {
        return Err(OhmsolveError::topology(format!(
            "node {} is not used by any branch",
            gap + 1
        )));
    }

    Ok(())
}
