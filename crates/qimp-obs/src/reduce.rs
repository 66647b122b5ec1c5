//! Contraction of two-particle correlators into susceptibilities.

use num_complex::Complex64;

use qimp_core::QimpError;
use qimp_gf::TwoParticleCorrelator;

/// Result of a dynamic susceptibility reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Susceptibility {
    /// Magnetic correlator χₘ(ν₁,ν₂,ν₃) = up-up − up-down.
    pub chi_m: TwoParticleCorrelator,
    /// Static reduced susceptibility χ = Σ χₘ / β².
    pub chi: Complex64,
}

/// Reduces a pair of particle-hole correlators to the magnetic
/// susceptibility.
///
/// χₘ is the element-wise difference over the full three-frequency tensors;
/// χ sums every element of χₘ (all frequencies, both orbital indices, all
/// pairs) and divides by β². Inputs are left untouched; swapping them
/// negates both results.
pub fn dynamic_susceptibility(
    corr_up_up: &TwoParticleCorrelator,
    corr_up_down: &TwoParticleCorrelator,
    beta: f64,
) -> Result<Susceptibility, QimpError> {
    if beta != corr_up_up.grid().beta() {
        return Err(QimpError::shape_mismatch(
            "beta does not match the correlators' grid",
        ));
    }
    let chi_m = corr_up_up.subtract(corr_up_down)?;
    let chi = chi_m.total_sum() / (beta * beta);
    Ok(Susceptibility { chi_m, chi })
}
