//! MNA matrix assembly and solving.

use crate::circuit::{BranchKind, Circuit};
use crate::error::{OhmsolveError, Result};

/// The blocks of a DC MNA system, before augmentation.
///
/// With n non-reference nodes and m voltage sources:
/// - `g` is the n×n conductance matrix
/// - `b` is the n×m source incidence matrix
/// - `injected` holds the n net source currents into each node
/// - `emf` holds the m source magnitudes (polarity lives in `b`)
#[derive(Debug, Clone)]
pub struct MnaSystem {
    /// n
    pub nodes: usize,
    /// m
    pub sources: usize,
    /// Row-major n×n
    pub g: Vec<f64>,
    /// Row-major n×m
    pub b: Vec<f64>,
    pub injected: Vec<f64>,
    pub emf: Vec<f64>,
}

impl MnaSystem {
    /// Assemble the system blocks from the folded branches of a circuit.
    ///
    /// Voltage source columns follow branch declaration order. Meters draw
    /// no current and contribute nothing.
    pub fn assemble(circuit: &Circuit) -> Self {
        let n = circuit.node_count() - 1;
        let m = circuit.num_voltage_sources();
        let mut system = Self {
            nodes: n,
            sources: m,
            g: vec![0.0; n * n],
            b: vec![0.0; n * m],
            injected: vec![0.0; n],
            emf: vec![0.0; m],
        };

        let mut column = 0usize;
        for branch in circuit.branches() {
            let i = circuit.node_index(branch.a);
            let j = circuit.node_index(branch.b);
            match branch.kind {
                BranchKind::Resistor => system.stamp_conductance(i, j, 1.0 / branch.value),
                BranchKind::VoltageSource => {
                    let sign = if branch.value > 0.0 { 1.0 } else { -1.0 };
                    if let Some(i) = i {
                        system.b[i * m + column] -= sign;
                    }
                    if let Some(j) = j {
                        system.b[j * m + column] += sign;
                    }
                    system.emf[column] = branch.value.abs();
                    column += 1;
                }
                BranchKind::CurrentSource => {
                    // Current leaves i and enters j
                    if let Some(i) = i {
                        system.injected[i] -= branch.value;
                    }
                    if let Some(j) = j {
                        system.injected[j] += branch.value;
                    }
                }
                _ => {}
            }
        }

        system
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   G[n1,n1] += G
    ///   G[n2,n2] += G
    ///   G[n1,n2] -= G
    ///   G[n2,n1] -= G
    fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        let n = self.nodes;
        if let Some(i) = n1 {
            self.g[i * n + i] += g;
        }
        if let Some(j) = n2 {
            self.g[j * n + j] += g;
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.g[i * n + j] -= g;
            self.g[j * n + i] -= g;
        }
    }

    /// Conductance matrix element.
    pub fn g_at(&self, row: usize, col: usize) -> f64 {
        self.g[row * self.nodes + col]
    }

    /// Incidence matrix element.
    pub fn b_at(&self, row: usize, col: usize) -> f64 {
        self.b[row * self.sources + col]
    }

    /// Build `[[G, B], [Bᵗ, 0]]` with right-hand side `[injected; emf]`.
    pub fn augmented(&self) -> MnaMatrix {
        let n = self.nodes;
        let m = self.sources;
        let mut matrix = MnaMatrix::new(n + m);

        for row in 0..n {
            for col in 0..n {
                matrix.set(row, col, self.g_at(row, col));
            }
            for col in 0..m {
                let value = self.b_at(row, col);
                matrix.set(row, n + col, value);
                matrix.set(n + col, row, value);
            }
            matrix.add_source(row, self.injected[row]);
        }
        for col in 0..m {
            matrix.add_source(n + col, self.emf[col]);
        }

        matrix
    }
}

/// MNA matrix system Ax = z.
#[derive(Debug)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A pivot smaller than `tolerance` times the largest entry of A means
    /// the system is singular.
    pub fn factor(&mut self, tolerance: f64) -> Result<()> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for i in 0..n {
            self.pivots[i] = i;
        }

        let scale = self.a.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        let threshold = tolerance * scale;
        if n > 0 && scale == 0.0 {
            return Err(OhmsolveError::SingularMatrix);
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val <= threshold {
                tracing::debug!(column = k, pivot = max_val, threshold, "singular pivot");
                return Err(OhmsolveError::SingularMatrix);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            let diag = self.lu[i * n + i];
            if diag == 0.0 {
                return Err(OhmsolveError::SingularMatrix);
            }
            self.x[i] /= diag;
        }

        Ok(())
    }
}
