//! Directed signed connectivity without self-loops.
//!
//! Entry `(i, j)` is the link from node `j` into node `i`'s signal:
//! `signal[i] = sum_j C[i, j] * state[j]`. Values are restricted to
//! `{-1, 0, 1}` and the diagonal is always zero.
//!
//! Two interchangeable representations implement [`Connectivity`]:
//! - [`DenseMatrix`]: row-major `n * n` cells, O(n) per row.
//! - [`SparseMatrix`]: per-row sorted column/link arrays, O(nnz) per row.
//!
//! Both enumerate rewiring candidates in ascending column order, so a seeded
//! simulation produces identical trajectories under either one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Signed link value: -1 (inhibitory), 0 (absent), 1 (excitatory).
pub type Link = i8;

/// Node index.
pub type NodeId = usize;

/// Binary node state (0 or 1).
pub type Activity = u8;

/// Operations the engine needs from a connectivity representation.
pub trait Connectivity: Clone + Send + Sync {
    /// Build this representation from a logical dense matrix.
    fn from_dense(dense: &DenseMatrix) -> Self;

    /// Number of nodes `n` (the matrix is `n x n`).
    fn size(&self) -> usize;

    fn get(&self, row: NodeId, col: NodeId) -> Link;

    /// Write a cell and return its previous value.
    ///
    /// Writing a non-zero value on the diagonal is a logic error; callers
    /// exclude the row index from every candidate set.
    fn set(&mut self, row: NodeId, col: NodeId, value: Link) -> Link;

    /// Visit the non-zero entries of `row` in ascending column order.
    fn for_each_nonzero<F: FnMut(NodeId, Link)>(&self, row: NodeId, f: F);

    /// Number of non-zero entries in `row`.
    fn row_nonzeros(&self, row: NodeId) -> usize;

    /// `sum_j C[row, j] * state[j]`.
    fn row_signal(&self, row: NodeId, state: &[Activity]) -> i32 {
        let mut signal = 0i32;
        self.for_each_nonzero(row, |col, link| {
            signal += link as i32 * state[col] as i32;
        });
        signal
    }

    /// Vectorized variant of [`Connectivity::row_signal`]; must return the same value.
    fn row_signal_simd(&self, row: NodeId, state: &[Activity]) -> i32 {
        self.row_signal(row, state)
    }

    /// Number of off-diagonal zero cells in `row`.
    fn row_zeros(&self, row: NodeId) -> usize {
        self.size()
            .saturating_sub(1)
            .saturating_sub(self.row_nonzeros(row))
    }

    /// The `k`-th (0-based) off-diagonal zero column of `row`, ascending.
    fn nth_zero_in_row(&self, row: NodeId, k: usize) -> Option<NodeId> {
        (0..self.size())
            .filter(|&col| col != row && self.get(row, col) == 0)
            .nth(k)
    }

    /// The `k`-th (0-based) non-zero entry of `row`, ascending by column.
    fn nth_nonzero_in_row(&self, row: NodeId, k: usize) -> Option<(NodeId, Link)> {
        let mut seen = 0usize;
        let mut found = None;
        self.for_each_nonzero(row, |col, link| {
            if found.is_none() {
                if seen == k {
                    found = Some((col, link));
                }
                seen += 1;
            }
        });
        found
    }

    /// Number of cells equal to `value` (`value` must be non-zero).
    fn count(&self, value: Link) -> usize {
        let mut total = 0usize;
        for row in 0..self.size() {
            self.for_each_nonzero(row, |_, link| {
                if link == value {
                    total += 1;
                }
            });
        }
        total
    }

    fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.size());
        for row in 0..self.size() {
            self.for_each_nonzero(row, |col, link| {
                dense.cells[row * dense.n + col] = link;
            });
        }
        dense
    }
}

/// Incrementally maintained link counters.
///
/// Invariant: `plus == count(C == 1)` and `minus == count(C == -1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkCounts {
    pub plus: usize,
    pub minus: usize,
}

impl LinkCounts {
    /// Full recount from the matrix.
    pub fn recount<M: Connectivity>(matrix: &M) -> Self {
        let mut counts = Self::default();
        for row in 0..matrix.size() {
            matrix.for_each_nonzero(row, |_, link| counts.record_added(link));
        }
        counts
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.plus + self.minus
    }

    #[inline]
    pub(crate) fn record_added(&mut self, link: Link) {
        match link {
            1 => self.plus += 1,
            -1 => self.minus += 1,
            _ => {}
        }
    }

    #[inline]
    pub(crate) fn record_removed(&mut self, link: Link) {
        match link {
            1 => self.plus = self.plus.saturating_sub(1),
            -1 => self.minus = self.minus.saturating_sub(1),
            _ => {}
        }
    }
}

/// Row-major dense `n x n` matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDense"))]
pub struct DenseMatrix {
    n: usize,
    cells: Vec<Link>,
}

// Deserialized form; goes through `from_cells` so the cell count is checked.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDense {
    n: usize,
    cells: Vec<Link>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDense> for DenseMatrix {
    type Error = ConfigError;

    fn try_from(raw: RawDense) -> Result<Self, ConfigError> {
        DenseMatrix::from_cells(raw.n, raw.cells)
    }
}

impl DenseMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    /// Wrap row-major cells. Only the cell count is checked here; entry values
    /// and the diagonal are checked by [`DenseMatrix::validate`].
    pub fn from_cells(n: usize, cells: Vec<Link>) -> Result<Self, ConfigError> {
        check_cell_count(n, cells.len())?;
        Ok(Self { n, cells })
    }

    /// Check the cell count, that every entry is in `{-1, 0, 1}` and that the
    /// diagonal is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_cell_count(self.n, self.cells.len())?;
        for row in 0..self.n {
            for (col, &value) in self.row(row).iter().enumerate() {
                if !(-1..=1).contains(&value) {
                    return Err(ConfigError::ConnectivityValue { row, col, value });
                }
                if row == col && value != 0 {
                    return Err(ConfigError::SelfLoop { index: row, value });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn row(&self, row: NodeId) -> &[Link] {
        &self.cells[row * self.n..(row + 1) * self.n]
    }

    pub fn cells(&self) -> &[Link] {
        &self.cells
    }
}

impl Connectivity for DenseMatrix {
    fn from_dense(dense: &DenseMatrix) -> Self {
        dense.clone()
    }

    #[inline]
    fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn get(&self, row: NodeId, col: NodeId) -> Link {
        self.cells[row * self.n + col]
    }

    #[inline]
    fn set(&mut self, row: NodeId, col: NodeId, value: Link) -> Link {
        debug_assert!(row != col || value == 0, "self-loop write at {row}");
        core::mem::replace(&mut self.cells[row * self.n + col], value)
    }

    fn for_each_nonzero<F: FnMut(NodeId, Link)>(&self, row: NodeId, mut f: F) {
        for (col, &link) in self.row(row).iter().enumerate() {
            if link != 0 {
                f(col, link);
            }
        }
    }

    fn row_nonzeros(&self, row: NodeId) -> usize {
        self.row(row).iter().filter(|&&link| link != 0).count()
    }

    #[inline]
    fn row_signal(&self, row: NodeId, state: &[Activity]) -> i32 {
        self.row(row)
            .iter()
            .zip(state)
            .map(|(&link, &s)| link as i32 * s as i32)
            .sum()
    }

    #[cfg(feature = "simd")]
    fn row_signal_simd(&self, row: NodeId, state: &[Activity]) -> i32 {
        use wide::f32x4;

        // Lane sums stay exact: every partial sum is an integer below 2^24.
        let links = self.row(row);
        let n = links.len();
        let simd_end = n - (n % 4);
        let mut acc = f32x4::splat(0.0);
        for i in (0..simd_end).step_by(4) {
            let c = f32x4::from([
                links[i] as f32,
                links[i + 1] as f32,
                links[i + 2] as f32,
                links[i + 3] as f32,
            ]);
            let s = f32x4::from([
                state[i] as f32,
                state[i + 1] as f32,
                state[i + 2] as f32,
                state[i + 3] as f32,
            ]);
            acc = acc + c * s;
        }
        let lanes = acc.to_array();
        let mut signal = (lanes[0] + lanes[1] + lanes[2] + lanes[3]) as i32;

        // Tail elements.
        for i in simd_end..n {
            signal += links[i] as i32 * state[i] as i32;
        }
        signal
    }

    fn nth_zero_in_row(&self, row: NodeId, k: usize) -> Option<NodeId> {
        self.row(row)
            .iter()
            .enumerate()
            .filter(|&(col, &link)| col != row && link == 0)
            .map(|(col, _)| col)
            .nth(k)
    }

    fn count(&self, value: Link) -> usize {
        self.cells.iter().filter(|&&link| link == value).count()
    }

    fn to_dense(&self) -> DenseMatrix {
        self.clone()
    }
}

fn check_cell_count(n: usize, got: usize) -> Result<(), ConfigError> {
    // An overflowing `n * n` can never match a real cell vector.
    let expected = n.checked_mul(n).unwrap_or(usize::MAX);
    if got != expected {
        return Err(ConfigError::CellCount { expected, got });
    }
    Ok(())
}

/// Non-zero entries of one row, sorted by column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct SparseRow {
    cols: Vec<NodeId>,
    links: Vec<Link>,
}

/// Row-indexed sparse matrix: each row keeps parallel sorted column/link arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSparse"))]
pub struct SparseMatrix {
    n: usize,
    rows: Vec<SparseRow>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSparse {
    n: usize,
    rows: Vec<SparseRow>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSparse> for SparseMatrix {
    type Error = ConfigError;

    fn try_from(raw: RawSparse) -> Result<Self, ConfigError> {
        let matrix = SparseMatrix {
            n: raw.n,
            rows: raw.rows,
        };
        matrix.validate()?;
        Ok(matrix)
    }
}

impl SparseMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            rows: vec![SparseRow::default(); n],
        }
    }

    /// Total number of stored (non-zero) entries.
    pub fn nonzeros(&self) -> usize {
        self.rows.iter().map(|r| r.cols.len()).sum()
    }

    /// Check the row count, that every row's columns are strictly increasing
    /// below `n`, that stored links are `-1` or `1`, and that no row stores
    /// its own diagonal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows.len() != self.n {
            return Err(ConfigError::ConnectivityShape {
                expected: self.n,
                got: self.rows.len(),
            });
        }
        for (row, r) in self.rows.iter().enumerate() {
            if r.cols.len() != r.links.len()
                || r.cols.windows(2).any(|w| w[0] >= w[1])
                || r.cols.last().is_some_and(|&col| col >= self.n)
            {
                return Err(ConfigError::SparseRow { row });
            }
            for (&col, &value) in r.cols.iter().zip(&r.links) {
                if value != 1 && value != -1 {
                    return Err(ConfigError::ConnectivityValue { row, col, value });
                }
                if col == row {
                    return Err(ConfigError::SelfLoop { index: row, value });
                }
            }
        }
        Ok(())
    }
}

impl Connectivity for SparseMatrix {
    fn from_dense(dense: &DenseMatrix) -> Self {
        let mut sparse = Self::zeros(dense.size());
        for (row, out) in sparse.rows.iter_mut().enumerate() {
            dense.for_each_nonzero(row, |col, link| {
                out.cols.push(col);
                out.links.push(link);
            });
        }
        sparse
    }

    #[inline]
    fn size(&self) -> usize {
        self.n
    }

    fn get(&self, row: NodeId, col: NodeId) -> Link {
        let r = &self.rows[row];
        match r.cols.binary_search(&col) {
            Ok(idx) => r.links[idx],
            Err(_) => 0,
        }
    }

    fn set(&mut self, row: NodeId, col: NodeId, value: Link) -> Link {
        debug_assert!(row != col || value == 0, "self-loop write at {row}");
        let r = &mut self.rows[row];
        match r.cols.binary_search(&col) {
            Ok(idx) => {
                let previous = r.links[idx];
                if value == 0 {
                    r.cols.remove(idx);
                    r.links.remove(idx);
                } else {
                    r.links[idx] = value;
                }
                previous
            }
            Err(idx) => {
                if value != 0 {
                    r.cols.insert(idx, col);
                    r.links.insert(idx, value);
                }
                0
            }
        }
    }

    fn for_each_nonzero<F: FnMut(NodeId, Link)>(&self, row: NodeId, mut f: F) {
        let r = &self.rows[row];
        for (&col, &link) in r.cols.iter().zip(&r.links) {
            f(col, link);
        }
    }

    #[inline]
    fn row_nonzeros(&self, row: NodeId) -> usize {
        self.rows[row].cols.len()
    }

    fn nth_zero_in_row(&self, row: NodeId, k: usize) -> Option<NodeId> {
        // Walk the gaps between stored columns; each gap is a run of zeros.
        let mut remaining = k;
        let mut start = 0usize;
        let stored = &self.rows[row].cols;
        for end in stored.iter().copied().chain(core::iter::once(self.n)) {
            let contains_diag = (start..end).contains(&row);
            let gap = end - start - usize::from(contains_diag);
            if remaining < gap {
                let col = start + remaining;
                return Some(if contains_diag && col >= row { col + 1 } else { col });
            }
            remaining -= gap;
            start = end + 1;
        }
        None
    }

    fn nth_nonzero_in_row(&self, row: NodeId, k: usize) -> Option<(NodeId, Link)> {
        let r = &self.rows[row];
        r.cols.get(k).map(|&col| (col, r.links[k]))
    }
}

/// Number of incoming links per node (non-zero entries per column).
pub fn in_degrees<M: Connectivity>(matrix: &M) -> Vec<usize> {
    let mut degrees = vec![0usize; matrix.size()];
    for row in 0..matrix.size() {
        matrix.for_each_nonzero(row, |col, _| degrees[col] += 1);
    }
    degrees
}

/// Number of outgoing links per node (non-zero entries per row).
pub fn out_degrees<M: Connectivity>(matrix: &M) -> Vec<usize> {
    (0..matrix.size()).map(|row| matrix.row_nonzeros(row)).collect()
}
