use crate::{Error, Result};

/// Maps continuous observations onto a finite grid of cells
///
/// Each dimension `i` is split into `B_i` equal-width bins over `[low_i, high_i]`.
/// Observations at or beyond `high_i` land in the extra boundary bin `B_i`, so a
/// table indexed by the result needs `B_i + 1` cells along that axis (see [`shape`](Self::shape)).
/// Values below `low_i` are clamped to bin 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer<const D: usize> {
    low: [f32; D],
    high: [f32; D],
    bins: [usize; D],
    width: [f32; D],
}

impl<const D: usize> Discretizer<D> {
    /// Discretizer with the same bin count for every dimension
    pub fn new(low: [f32; D], high: [f32; D], bins: usize) -> Result<Self> {
        Self::with_bins(low, high, [bins; D])
    }

    /// Discretizer with a separate bin count per dimension
    pub fn with_bins(low: [f32; D], high: [f32; D], bins: [usize; D]) -> Result<Self> {
        for dim in 0..D {
            if bins[dim] == 0 {
                return Err(Error::InvalidBins { dim });
            }
            let (l, h) = (low[dim], high[dim]);
            if !(l.is_finite() && h.is_finite() && l < h) {
                return Err(Error::InvalidBounds {
                    dim,
                    low: l,
                    high: h,
                });
            }
        }

        let width = std::array::from_fn(|i| (high[i] - low[i]) / bins[i] as f32);
        Ok(Self {
            low,
            high,
            bins,
            width,
        })
    }

    /// Build from bounds whose length is only known at runtime
    pub fn from_slices(low: &[f32], high: &[f32], bins: usize) -> Result<Self> {
        let low = <[f32; D]>::try_from(low).map_err(|_| Error::DimensionMismatch {
            what: "low",
            expected: D,
            got: low.len(),
        })?;
        let high = <[f32; D]>::try_from(high).map_err(|_| Error::DimensionMismatch {
            what: "high",
            expected: D,
            got: high.len(),
        })?;
        Self::new(low, high, bins)
    }

    /// Grid cell containing `obs`
    pub fn discretize(&self, obs: &[f32; D]) -> [usize; D] {
        std::array::from_fn(|i| {
            // (high - low) / width can round to just under B
            if obs[i] >= self.high[i] {
                return self.bins[i];
            }
            let ix = ((obs[i] - self.low[i]) / self.width[i]).floor();
            // NaN saturates to 0 in the cast
            ix.clamp(0.0, self.bins[i] as f32) as usize
        })
    }

    /// Number of cells along each dimension, including the boundary bin
    pub fn shape(&self) -> [usize; D] {
        self.bins.map(|b| b + 1)
    }

    pub fn bins(&self) -> &[usize; D] {
        &self.bins
    }

    pub fn low(&self) -> &[f32; D] {
        &self.low
    }

    pub fn high(&self) -> &[f32; D] {
        &self.high
    }
}
