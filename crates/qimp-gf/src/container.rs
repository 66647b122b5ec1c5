//! Block-structured Green's function containers.

use std::collections::BTreeMap;

use ndarray::Array3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qimp_core::{BlockStructure, ErrorInfo, FrequencyTimeGrid, QimpError, Statistics};

/// Basis in which a one-particle container stores its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    /// G(τ) on the uniform imaginary-time grid.
    ImaginaryTime,
    /// G(iωₙ) over the fermionic Matsubara frequencies (both signs).
    MatsubaraFrequency,
    /// Legendre expansion coefficients Gₗ.
    Legendre,
}

impl Representation {
    /// Number of grid points a container of this representation stores.
    pub fn points(&self, grid: &FrequencyTimeGrid) -> usize {
        match self {
            Representation::ImaginaryTime => grid.n_tau(),
            Representation::MatsubaraFrequency => 2 * grid.n_iw(),
            Representation::Legendre => grid.n_l(),
        }
    }
}

/// One-particle block Green's function: per declared block a complex array
/// shaped `[n_orb, n_orb, n_points]`.
///
/// Containers are value types; solver outputs hand copies to consumers, so
/// completed results stay immutable from the session's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GfContainer {
    pub(crate) structure: BlockStructure,
    pub(crate) grid: FrequencyTimeGrid,
    pub(crate) representation: Representation,
    pub(crate) data: BTreeMap<String, Array3<Complex64>>,
}

impl GfContainer {
    /// Creates a zero-filled container over every declared block.
    pub fn new(
        structure: &BlockStructure,
        grid: &FrequencyTimeGrid,
        representation: Representation,
    ) -> Self {
        let points = representation.points(grid);
        let data = structure
            .iter()
            .map(|(name, indices)| {
                let size = indices.len();
                (name.to_string(), Array3::zeros((size, size, points)))
            })
            .collect();
        Self {
            structure: structure.clone(),
            grid: *grid,
            representation,
            data,
        }
    }

    /// Fills the block-diagonal entries of a Matsubara container from a
    /// closure of `(block, orbital index, iωₙ)`.
    pub fn diagonal_from_matsubara<F>(
        structure: &BlockStructure,
        grid: &FrequencyTimeGrid,
        f: F,
    ) -> Self
    where
        F: Fn(&str, usize, Complex64) -> Complex64,
    {
        let data = structure
            .iter()
            .map(|(name, indices)| {
                let size = indices.len();
                let mut array = Array3::zeros((size, size, 2 * grid.n_iw()));
                for (position, &index) in indices.iter().enumerate() {
                    for k in 0..2 * grid.n_iw() {
                        let omega = grid
                            .matsubara_frequency(Statistics::Fermionic, grid.frequency_index(k));
                        let iw = Complex64::new(0.0, omega);
                        array[[position, position, k]] = f(name, index, iw);
                    }
                }
                (name.to_string(), array)
            })
            .collect();
        Self {
            structure: structure.clone(),
            grid: *grid,
            representation: Representation::MatsubaraFrequency,
            data,
        }
    }

    /// Fills the block-diagonal entries of an imaginary-time container from
    /// a closure of `(block, orbital index, τ)`.
    pub fn diagonal_from_times<F>(structure: &BlockStructure, grid: &FrequencyTimeGrid, f: F) -> Self
    where
        F: Fn(&str, usize, f64) -> Complex64,
    {
        let data = structure
            .iter()
            .map(|(name, indices)| {
                let size = indices.len();
                let mut array = Array3::zeros((size, size, grid.n_tau()));
                for (position, &index) in indices.iter().enumerate() {
                    for k in 0..grid.n_tau() {
                        array[[position, position, k]] = f(name, index, grid.time_point(k));
                    }
                }
                (name.to_string(), array)
            })
            .collect();
        Self {
            structure: structure.clone(),
            grid: *grid,
            representation: Representation::ImaginaryTime,
            data,
        }
    }

    /// Block structure the container was built against.
    pub fn structure(&self) -> &BlockStructure {
        &self.structure
    }

    /// Grid shared by all blocks.
    pub fn grid(&self) -> &FrequencyTimeGrid {
        &self.grid
    }

    /// Representation tag.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Number of grid points per orbital pair.
    pub fn n_points(&self) -> usize {
        self.representation.points(&self.grid)
    }

    /// Raw per-block array (plotting / persistence boundary).
    pub fn block_data(&self, name: &str) -> Result<&Array3<Complex64>, QimpError> {
        self.data.get(name).ok_or_else(|| {
            QimpError::Block(
                ErrorInfo::new("unknown-block", "container holds no such block")
                    .with_context("block", name),
            )
        })
    }

    /// Reads one element addressed by declared orbital indices and a grid
    /// point.
    pub fn value(
        &self,
        block: &str,
        index1: usize,
        index2: usize,
        point: usize,
    ) -> Result<Complex64, QimpError> {
        let (i, j) = self.positions(block, index1, index2)?;
        self.check_point(point)?;
        Ok(self.data[block][[i, j, point]])
    }

    /// Writes one element addressed by declared orbital indices and a grid
    /// point.
    pub fn set_value(
        &mut self,
        block: &str,
        index1: usize,
        index2: usize,
        point: usize,
        value: Complex64,
    ) -> Result<(), QimpError> {
        let (i, j) = self.positions(block, index1, index2)?;
        self.check_point(point)?;
        let array = self.data.get_mut(block).ok_or_else(|| {
            QimpError::Block(
                ErrorInfo::new("unknown-block", "container holds no such block")
                    .with_context("block", block),
            )
        })?;
        array[[i, j, point]] = value;
        Ok(())
    }

    fn positions(
        &self,
        block: &str,
        index1: usize,
        index2: usize,
    ) -> Result<(usize, usize), QimpError> {
        let i = self.structure.position(block, index1)?;
        let j = self.structure.position(block, index2)?;
        Ok((i, j))
    }

    fn check_point(&self, point: usize) -> Result<(), QimpError> {
        if point >= self.n_points() {
            let info = ErrorInfo::new("shape-mismatch", "grid point out of range")
                .with_context("point", point.to_string())
                .with_context("n_points", self.n_points().to_string());
            return Err(QimpError::Shape(info));
        }
        Ok(())
    }

    /// Verifies that `other` shares block structure, grid and
    /// representation; containers never broadcast across mismatched
    /// layouts.
    pub fn check_same_layout(&self, other: &Self) -> Result<(), QimpError> {
        if self.structure != other.structure {
            return Err(QimpError::shape_mismatch(
                "operands were built against different block structures",
            ));
        }
        if self.grid != other.grid {
            return Err(QimpError::shape_mismatch(
                "operands were built against different grids",
            ));
        }
        if self.representation != other.representation {
            return Err(QimpError::shape_mismatch(
                "operands are stored in different representations",
            ));
        }
        Ok(())
    }

    /// Element-wise sum. Fails with `shape-mismatch` on structural mismatch.
    pub fn add(&self, other: &Self) -> Result<Self, QimpError> {
        self.check_same_layout(other)?;
        let mut result = self.clone();
        for (name, array) in &mut result.data {
            *array += &other.data[name];
        }
        Ok(result)
    }

    /// Element-wise difference. Fails with `shape-mismatch` on structural
    /// mismatch.
    pub fn subtract(&self, other: &Self) -> Result<Self, QimpError> {
        self.check_same_layout(other)?;
        let mut result = self.clone();
        for (name, array) in &mut result.data {
            *array -= &other.data[name];
        }
        Ok(result)
    }

    /// Element-wise scaling by a complex factor.
    pub fn scale(&self, factor: Complex64) -> Self {
        let mut result = self.clone();
        for array in result.data.values_mut() {
            array.mapv_inplace(|v| v * factor);
        }
        result
    }
}
