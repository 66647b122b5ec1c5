//! Analytic construction of hybridization functions and the
//! non-interacting propagator.

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qimp_core::{BlockStructure, ErrorInfo, FrequencyTimeGrid, QimpError};
use qimp_gf::GfContainer;

/// One discrete bath level coupled to an impurity orbital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BathPole {
    /// Coupling strength V.
    pub coupling: f64,
    /// Bath level energy ε.
    pub energy: f64,
}

/// Builds Δ(iω) and G₀(iω) containers from per-orbital bath pole lists.
///
/// Each orbital's hybridization is the symmetric-bath sum
/// Δ(iω) = Σᵢ Vᵢ²/(iω − εᵢ) + Vᵢ²/(iω + εᵢ), and the inverse propagator is
/// G₀(iω)⁻¹ = iω + μ − h_block − Δ(iω). Field terms are explicit per-block
/// values; callers encode any spin-dependent sign themselves.
#[derive(Debug, Clone)]
pub struct HybridizationBuilder {
    structure: BlockStructure,
    grid: FrequencyTimeGrid,
    chemical_potential: f64,
    fields: BTreeMap<String, f64>,
    baths: BTreeMap<(String, usize), Vec<BathPole>>,
}

impl HybridizationBuilder {
    /// Starts a builder over the given structure and grid with μ = 0 and no
    /// fields or baths assigned.
    pub fn new(structure: &BlockStructure, grid: &FrequencyTimeGrid) -> Self {
        Self {
            structure: structure.clone(),
            grid: *grid,
            chemical_potential: 0.0,
            fields: BTreeMap::new(),
            baths: BTreeMap::new(),
        }
    }

    /// Sets the chemical potential μ.
    pub fn chemical_potential(mut self, mu: f64) -> Self {
        self.chemical_potential = mu;
        self
    }

    /// Sets a symmetry-breaking field term for one block (e.g. ±h for a
    /// Zeeman splitting).
    pub fn field(mut self, block: &str, value: f64) -> Self {
        self.fields.insert(block.to_string(), value);
        self
    }

    /// Assigns the bath pole list of one impurity orbital.
    pub fn bath(mut self, block: &str, index: usize, poles: &[BathPole]) -> Self {
        self.baths
            .insert((block.to_string(), index), poles.to_vec());
        self
    }

    fn validate(&self) -> Result<(), QimpError> {
        for block in self.fields.keys() {
            if !self.structure.contains(block) {
                let info = ErrorInfo::new("malformed-spec", "field term names an undeclared block")
                    .with_context("block", block.clone());
                return Err(QimpError::Spec(info));
            }
        }
        for ((block, index), poles) in &self.baths {
            self.structure.position(block, *index).map_err(|_| {
                QimpError::Spec(
                    ErrorInfo::new("malformed-spec", "bath assigned to an undeclared orbital")
                        .with_context("block", block.clone())
                        .with_context("index", index.to_string()),
                )
            })?;
            if poles.is_empty() {
                let info = ErrorInfo::new("malformed-spec", "bath pole list must not be empty")
                    .with_context("block", block.clone())
                    .with_context("index", index.to_string());
                return Err(QimpError::Spec(info));
            }
        }
        for (block, indices) in self.structure.iter() {
            for &index in indices {
                if !self.baths.contains_key(&(block.to_string(), index)) {
                    let info = ErrorInfo::new("malformed-spec", "orbital has no bath assignment")
                        .with_context("block", block)
                        .with_context("index", index.to_string());
                    return Err(QimpError::Spec(info));
                }
            }
        }
        Ok(())
    }

    fn delta_at(&self, block: &str, index: usize, iw: Complex64) -> Complex64 {
        let poles = self
            .baths
            .get(&(block.to_string(), index))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        poles.iter().fold(Complex64::new(0.0, 0.0), |acc, pole| {
            let v2 = pole.coupling * pole.coupling;
            acc + v2 / (iw - pole.energy) + v2 / (iw + pole.energy)
        })
    }

    /// Assembles the hybridization function Δ(iω), diagonal in orbital
    /// space. Fails with `malformed-spec` on incomplete or inconsistent
    /// bath assignments.
    pub fn delta_iw(&self) -> Result<GfContainer, QimpError> {
        self.validate()?;
        Ok(GfContainer::diagonal_from_matsubara(
            &self.structure,
            &self.grid,
            |block, index, iw| self.delta_at(block, index, iw),
        ))
    }

    /// Assembles the non-interacting propagator
    /// G₀(iω) = 1/(iω + μ − h_block − Δ(iω)).
    pub fn g0_iw(&self) -> Result<GfContainer, QimpError> {
        self.validate()?;
        let mu = self.chemical_potential;
        Ok(GfContainer::diagonal_from_matsubara(
            &self.structure,
            &self.grid,
            |block, index, iw| {
                let field = self.fields.get(block).copied().unwrap_or(0.0);
                1.0 / (iw + mu - field - self.delta_at(block, index, iw))
            },
        ))
    }
}
