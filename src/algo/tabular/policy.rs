use crate::discretize::Discretizer;

/// Greedy action of every grid cell, frozen at the moment it was derived
///
/// A `Policy` owns its data: later updates to the agent's table do not show through.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy<const D: usize> {
    discretizer: Discretizer<D>,
    strides: [usize; D],
    actions: Vec<usize>,
}

impl<const D: usize> Policy<D> {
    /// Build from row-major greedy actions over the discretizer's grid
    ///
    /// **Panics** if `actions` does not hold exactly one entry per cell
    pub(crate) fn new(discretizer: Discretizer<D>, actions: Vec<usize>) -> Self {
        let shape = discretizer.shape();
        let mut strides = [0; D];
        let mut stride = 1;
        for i in (0..D).rev() {
            strides[i] = stride;
            stride *= shape[i];
        }
        assert_eq!(stride, actions.len(), "one action per cell");
        Self {
            discretizer,
            strides,
            actions,
        }
    }

    /// Action for an already discretized cell
    pub fn get(&self, cell: &[usize; D]) -> usize {
        let ix: usize = cell.iter().zip(self.strides.iter()).map(|(c, s)| c * s).sum();
        self.actions[ix]
    }

    /// Action for a raw observation
    pub fn action(&self, obs: &[f32; D]) -> usize {
        self.get(&self.discretizer.discretize(obs))
    }

    /// Cells along each dimension
    pub fn shape(&self) -> [usize; D] {
        self.discretizer.shape()
    }

    /// Greedy actions in row-major cell order
    pub fn as_slice(&self) -> &[usize] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_cell_and_observation() {
        let d = Discretizer::new([-1.0, -1.0], [1.0, 1.0], 2).unwrap();
        let policy = Policy::new(d, (0..9).map(|i| i % 3).collect());

        assert_eq!(policy.shape(), [3, 3]);
        assert_eq!(policy.get(&[0, 0]), 0);
        assert_eq!(policy.get(&[1, 2]), 2, "row-major: 1 * 3 + 2 = 5");
        assert_eq!(policy.action(&[0.0, 0.0]), 1, "cell (1, 1) is index 4");
        assert_eq!(policy.action(&[1.0, 1.0]), 2);
        assert_eq!(policy.as_slice().len(), 9);
    }

    #[test]
    #[should_panic(expected = "one action per cell")]
    fn wrong_length_panics() {
        let d = Discretizer::new([0.0], [1.0], 4).unwrap();
        Policy::new(d, vec![0; 4]);
    }
}
