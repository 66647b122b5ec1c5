//! Many-body operator expressions for local Hamiltonians and quantum
//! numbers.
//!
//! Expressions are closed polynomials: a sum of terms, each a real
//! coefficient times an ordered product of elementary creation/annihilation
//! factors. This replaces duck-typed operator hand-offs with a form the core
//! can validate against a [`BlockStructure`] before invoking the external
//! engine.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::block::BlockStructure;
use crate::errors::{ErrorInfo, QimpError};

/// Elementary fermionic creation (`dagger = true`) or annihilation factor
/// addressing one declared `(block, index)` orbital.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FermionOp {
    /// Whether this factor is a creation operator.
    pub dagger: bool,
    /// Block name of the orbital the factor acts on.
    pub block: String,
    /// Orbital index within the block.
    pub index: usize,
}

/// One summand of an [`OperatorExpr`]: coefficient times an ordered product
/// of factors. An empty factor list denotes a constant term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTerm {
    /// Real coefficient of the term.
    pub coefficient: f64,
    /// Ordered product of elementary factors.
    pub factors: Vec<FermionOp>,
}

/// A sum of coefficient-weighted operator products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OperatorExpr {
    terms: Vec<OperatorTerm>,
}

/// Annihilation operator c_{block,index}.
pub fn c(block: &str, index: usize) -> OperatorExpr {
    OperatorExpr::from_factor(FermionOp {
        dagger: false,
        block: block.to_string(),
        index,
    })
}

/// Creation operator c†_{block,index}.
pub fn c_dag(block: &str, index: usize) -> OperatorExpr {
    OperatorExpr::from_factor(FermionOp {
        dagger: true,
        block: block.to_string(),
        index,
    })
}

/// Number operator n_{block,index} = c† c.
pub fn n(block: &str, index: usize) -> OperatorExpr {
    c_dag(block, index) * c(block, index)
}

impl OperatorExpr {
    /// The zero operator (empty sum).
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    fn from_factor(factor: FermionOp) -> Self {
        Self {
            terms: vec![OperatorTerm {
                coefficient: 1.0,
                factors: vec![factor],
            }],
        }
    }

    /// Returns the summands of the expression.
    pub fn terms(&self) -> &[OperatorTerm] {
        &self.terms
    }

    /// Whether the expression has no remaining terms.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Checks that every factor addresses a declared `(block, index)` pair.
    ///
    /// Fails with `malformed-spec` carrying the offending factor in context.
    pub fn validate(&self, structure: &BlockStructure) -> Result<(), QimpError> {
        for term in &self.terms {
            for factor in &term.factors {
                if !structure.contains(&factor.block)
                    || structure.position(&factor.block, factor.index).is_err()
                {
                    let info = ErrorInfo::new(
                        "malformed-spec",
                        "operator factor addresses an undeclared orbital",
                    )
                    .with_context("block", factor.block.clone())
                    .with_context("index", factor.index.to_string());
                    return Err(QimpError::Spec(info));
                }
            }
        }
        Ok(())
    }

    /// Merges terms with identical factor sequences and drops terms whose
    /// coefficient vanished.
    fn normalized(mut self) -> Self {
        let mut merged: Vec<OperatorTerm> = Vec::new();
        self.terms.sort_by(|a, b| a.factors.cmp(&b.factors));
        for term in self.terms {
            match merged.last_mut() {
                Some(last) if last.factors == term.factors => {
                    last.coefficient += term.coefficient;
                }
                _ => merged.push(term),
            }
        }
        merged.retain(|term| term.coefficient.abs() > f64::EPSILON);
        Self { terms: merged }
    }
}

impl Add for OperatorExpr {
    type Output = OperatorExpr;

    fn add(mut self, mut rhs: OperatorExpr) -> OperatorExpr {
        self.terms.append(&mut rhs.terms);
        self.normalized()
    }
}

impl Sub for OperatorExpr {
    type Output = OperatorExpr;

    fn sub(self, rhs: OperatorExpr) -> OperatorExpr {
        self + (-1.0 * rhs)
    }
}

impl Mul for OperatorExpr {
    type Output = OperatorExpr;

    fn mul(self, rhs: OperatorExpr) -> OperatorExpr {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for left in &self.terms {
            for right in &rhs.terms {
                let mut factors = left.factors.clone();
                factors.extend(right.factors.iter().cloned());
                terms.push(OperatorTerm {
                    coefficient: left.coefficient * right.coefficient,
                    factors,
                });
            }
        }
        OperatorExpr { terms }.normalized()
    }
}

impl Mul<OperatorExpr> for f64 {
    type Output = OperatorExpr;

    fn mul(self, mut rhs: OperatorExpr) -> OperatorExpr {
        for term in &mut rhs.terms {
            term.coefficient *= self;
        }
        rhs.normalized()
    }
}

impl Mul<f64> for OperatorExpr {
    type Output = OperatorExpr;

    fn mul(self, rhs: f64) -> OperatorExpr {
        rhs * self
    }
}
