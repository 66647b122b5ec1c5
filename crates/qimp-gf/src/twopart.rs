//! Two-particle correlators: three-frequency tensors per block pair.

use ndarray::Array5;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qimp_core::{BlockStructure, ErrorInfo, FrequencyTimeGrid, QimpError};

/// Ordered pair of block names addressing one tensor of a two-particle
/// correlator, e.g. ("up", "up") or ("up", "dn").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPair {
    /// First block of the pair.
    pub left: String,
    /// Second block of the pair.
    pub right: String,
}

impl BlockPair {
    /// Creates a pair from borrowed names.
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Particle-hole channel correlator G²(ν₁, ν₂, ν₃): per block pair a
/// complex tensor shaped `[n_orb_left, n_orb_right, n_f, n_f, n_f]` over
/// three fermionic frequency arguments.
///
/// Crossing antisymmetry is not enforced; consumers relying on it should
/// validate approximately. Pairs are stored sorted so two correlators over
/// the same pair set compare and combine deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoParticleCorrelator {
    structure: BlockStructure,
    grid: FrequencyTimeGrid,
    n_freq: usize,
    data: Vec<(BlockPair, Array5<Complex64>)>,
}

impl TwoParticleCorrelator {
    /// Creates a zero-filled correlator over the given block pairs with
    /// `n_freq` points per frequency axis.
    ///
    /// Fails with `unknown-block` for undeclared pair members, with
    /// `invalid-grid` for a zero frequency count, and with
    /// `malformed-spec` for repeated pairs.
    pub fn new(
        structure: &BlockStructure,
        grid: &FrequencyTimeGrid,
        n_freq: usize,
        pairs: &[(&str, &str)],
    ) -> Result<Self, QimpError> {
        if n_freq == 0 {
            let info = ErrorInfo::new("invalid-grid", "two-particle frequency count must be positive");
            return Err(QimpError::Grid(info));
        }
        let mut data = Vec::with_capacity(pairs.len());
        for &(left, right) in pairs {
            let size_left = structure.block_size(left)?;
            let size_right = structure.block_size(right)?;
            data.push((
                BlockPair::new(left, right),
                Array5::zeros((size_left, size_right, n_freq, n_freq, n_freq)),
            ));
        }
        data.sort_by(|a, b| a.0.cmp(&b.0));
        if data.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(QimpError::malformed_spec(
                "block pair listed more than once",
            ));
        }
        Ok(Self {
            structure: structure.clone(),
            grid: *grid,
            n_freq,
            data,
        })
    }

    /// Block structure the correlator was built against.
    pub fn structure(&self) -> &BlockStructure {
        &self.structure
    }

    /// Grid shared with the one-particle containers of the problem.
    pub fn grid(&self) -> &FrequencyTimeGrid {
        &self.grid
    }

    /// Points per frequency axis.
    pub fn n_freq(&self) -> usize {
        self.n_freq
    }

    /// Declared pairs in sorted order.
    pub fn pairs(&self) -> impl Iterator<Item = &BlockPair> {
        self.data.iter().map(|(pair, _)| pair)
    }

    fn entry(&self, left: &str, right: &str) -> Result<&Array5<Complex64>, QimpError> {
        self.data
            .iter()
            .find(|(pair, _)| pair.left == left && pair.right == right)
            .map(|(_, tensor)| tensor)
            .ok_or_else(|| {
                QimpError::Block(
                    ErrorInfo::new("unknown-block", "correlator holds no such block pair")
                        .with_context("left", left)
                        .with_context("right", right),
                )
            })
    }

    /// Raw tensor for one block pair.
    pub fn pair_data(&self, left: &str, right: &str) -> Result<&Array5<Complex64>, QimpError> {
        self.entry(left, right)
    }

    /// Mutable tensor access for one block pair (measurement fill-in).
    pub fn pair_data_mut(
        &mut self,
        left: &str,
        right: &str,
    ) -> Result<&mut Array5<Complex64>, QimpError> {
        self.data
            .iter_mut()
            .find(|(pair, _)| pair.left == left && pair.right == right)
            .map(|(_, tensor)| tensor)
            .ok_or_else(|| {
                QimpError::Block(
                    ErrorInfo::new("unknown-block", "correlator holds no such block pair")
                        .with_context("left", left)
                        .with_context("right", right),
                )
            })
    }

    /// Verifies that `other` shares structure, grid, frequency count and
    /// pair set.
    pub fn check_same_layout(&self, other: &Self) -> Result<(), QimpError> {
        if self.structure != other.structure {
            return Err(QimpError::shape_mismatch(
                "correlators were built against different block structures",
            ));
        }
        if self.grid != other.grid || self.n_freq != other.n_freq {
            return Err(QimpError::shape_mismatch(
                "correlators were built against different grids",
            ));
        }
        let pairs_match = self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|((a, _), (b, _))| a == b);
        if !pairs_match {
            return Err(QimpError::shape_mismatch(
                "correlators cover different block pair sets",
            ));
        }
        Ok(())
    }

    /// Element-wise sum over every pair tensor.
    pub fn add(&self, other: &Self) -> Result<Self, QimpError> {
        self.check_same_layout(other)?;
        let mut result = self.clone();
        for ((_, tensor), (_, rhs)) in result.data.iter_mut().zip(&other.data) {
            *tensor += rhs;
        }
        Ok(result)
    }

    /// Element-wise difference over every pair tensor.
    pub fn subtract(&self, other: &Self) -> Result<Self, QimpError> {
        self.check_same_layout(other)?;
        let mut result = self.clone();
        for ((_, tensor), (_, rhs)) in result.data.iter_mut().zip(&other.data) {
            *tensor -= rhs;
        }
        Ok(result)
    }

    /// Element-wise scaling by a complex factor.
    pub fn scale(&self, factor: Complex64) -> Self {
        let mut result = self.clone();
        for (_, tensor) in &mut result.data {
            tensor.mapv_inplace(|v| v * factor);
        }
        result
    }

    /// Sum over every tensor element of every pair (all three frequency
    /// axes and both orbital indices).
    pub fn total_sum(&self) -> Complex64 {
        self.data
            .iter()
            .map(|(_, tensor)| tensor.sum())
            .fold(Complex64::new(0.0, 0.0), |acc, s| acc + s)
    }
}
