//! Named orbital/spin block registry shared by all Green's function
//! containers of an impurity problem.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QimpError};

/// Declaration-ordered mapping from block name to the orbital indices the
/// block carries.
///
/// Every container built against a structure may only address declared
/// `(block, index, index)` triples. Orbital indices are labels; the position
/// of an index within its block's list determines matrix row/column
/// placement. The structure is immutable once attached to a container or
/// session (containers clone it by value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStructure {
    blocks: IndexMap<String, Vec<usize>>,
}

impl BlockStructure {
    /// Creates an empty structure with no declared blocks.
    pub fn new() -> Self {
        Self {
            blocks: IndexMap::new(),
        }
    }

    /// Convenience constructor declaring one block per spin label, each
    /// carrying orbitals `0..n_orbitals`.
    pub fn spin_orbitals<S: AsRef<str>>(spins: &[S], n_orbitals: usize) -> Result<Self, QimpError> {
        let mut structure = Self::new();
        let indices: Vec<usize> = (0..n_orbitals).collect();
        for spin in spins {
            structure.declare(spin.as_ref(), &indices)?;
        }
        Ok(structure)
    }

    /// Registers a block with the given orbital indices.
    ///
    /// Fails with `duplicate-block` if the name is already declared and with
    /// `malformed-spec` if the index list is empty or repeats an index.
    pub fn declare(&mut self, name: &str, indices: &[usize]) -> Result<(), QimpError> {
        if self.blocks.contains_key(name) {
            let info = ErrorInfo::new("duplicate-block", "block name already declared")
                .with_context("block", name);
            return Err(QimpError::Block(info));
        }
        if indices.is_empty() {
            let info = ErrorInfo::new("malformed-spec", "block index list must not be empty")
                .with_context("block", name);
            return Err(QimpError::Spec(info));
        }
        let mut seen = indices.to_vec();
        seen.sort_unstable();
        if seen.windows(2).any(|pair| pair[0] == pair[1]) {
            let info = ErrorInfo::new("malformed-spec", "orbital index repeated within block")
                .with_context("block", name);
            return Err(QimpError::Spec(info));
        }
        self.blocks.insert(name.to_string(), indices.to_vec());
        Ok(())
    }

    /// Returns the dense offset of `(block, index)` across all declared
    /// blocks in declaration order.
    ///
    /// The mapping is injective over declared pairs. Fails with
    /// `unknown-block` / `unknown-index` if the pair is absent.
    pub fn resolve(&self, name: &str, index: usize) -> Result<usize, QimpError> {
        let mut offset = 0;
        for (block, indices) in &self.blocks {
            if block == name {
                let position = self.position(name, index)?;
                return Ok(offset + position);
            }
            offset += indices.len();
        }
        Err(QimpError::Block(
            ErrorInfo::new("unknown-block", "block is not declared").with_context("block", name),
        ))
    }

    /// Returns the position of `index` within its block's ordered list.
    pub fn position(&self, name: &str, index: usize) -> Result<usize, QimpError> {
        let indices = self.indices(name)?;
        indices.iter().position(|&i| i == index).ok_or_else(|| {
            QimpError::Block(
                ErrorInfo::new("unknown-index", "orbital index is not declared in block")
                    .with_context("block", name)
                    .with_context("index", index.to_string()),
            )
        })
    }

    /// Returns the ordered orbital indices of a block.
    pub fn indices(&self, name: &str) -> Result<&[usize], QimpError> {
        self.blocks.get(name).map(Vec::as_slice).ok_or_else(|| {
            QimpError::Block(
                ErrorInfo::new("unknown-block", "block is not declared")
                    .with_context("block", name),
            )
        })
    }

    /// Returns the number of orbitals within a block.
    pub fn block_size(&self, name: &str) -> Result<usize, QimpError> {
        Ok(self.indices(name)?.len())
    }

    /// Returns block names in declaration order.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Returns `(name, indices)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.blocks
            .iter()
            .map(|(name, indices)| (name.as_str(), indices.as_slice()))
    }

    /// Number of declared blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total orbital count summed over all blocks.
    pub fn total_orbitals(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    /// Whether `name` is a declared block.
    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }
}

impl Default for BlockStructure {
    fn default() -> Self {
        Self::new()
    }
}
