use crate::util;

/// A dense table of action values over a `D`-dimensional grid of cells
///
/// Values are stored row-major in a single flat buffer; each cell owns a contiguous
/// row of `num_actions` entries. The shape is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<const D: usize> {
    shape: [usize; D],
    strides: [usize; D],
    num_actions: usize,
    values: Vec<f32>,
}

impl<const D: usize> QTable<D> {
    /// Zero-initialized table with `shape` cells and `num_actions` values per cell
    pub fn zeros(shape: [usize; D], num_actions: usize) -> Self {
        let mut strides = [0; D];
        let mut stride = num_actions;
        for i in (0..D).rev() {
            strides[i] = stride;
            stride *= shape[i];
        }
        Self {
            shape,
            strides,
            num_actions,
            values: vec![0.0; stride],
        }
    }

    fn offset(&self, cell: &[usize; D]) -> usize {
        cell.iter()
            .zip(self.shape.iter())
            .zip(self.strides.iter())
            .map(|((&c, &n), &s)| {
                assert!(c < n, "cell index {} out of range for axis of length {}", c, n);
                c * s
            })
            .sum()
    }

    /// Action values of one cell
    ///
    /// **Panics** if `cell` is outside the table
    pub fn row(&self, cell: &[usize; D]) -> &[f32] {
        let start = self.offset(cell);
        &self.values[start..start + self.num_actions]
    }

    /// Mutable action values of one cell
    ///
    /// **Panics** if `cell` is outside the table
    pub fn row_mut(&mut self, cell: &[usize; D]) -> &mut [f32] {
        let start = self.offset(cell);
        &mut self.values[start..start + self.num_actions]
    }

    pub fn get(&self, cell: &[usize; D], action: usize) -> f32 {
        self.row(cell)[action]
    }

    /// Highest action value in a cell
    pub fn max(&self, cell: &[usize; D]) -> f32 {
        util::max(self.row(cell))
    }

    /// Action with the highest value in a cell, lowest index on ties
    pub fn argmax(&self, cell: &[usize; D]) -> usize {
        util::argmax(self.row(cell))
    }

    /// Greedy action of every cell, in row-major cell order
    pub fn argmax_all(&self) -> Vec<usize> {
        self.values
            .chunks_exact(self.num_actions)
            .map(util::argmax)
            .collect()
    }

    /// Cells along each state axis
    pub fn shape(&self) -> [usize; D] {
        self.shape
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Full shape including the trailing action axis
    pub fn dims(&self) -> Vec<usize> {
        let mut dims = self.shape.to_vec();
        dims.push(self.num_actions);
        dims
    }

    /// Number of cells (rows) in the table
    pub fn num_cells(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
