//! Linear-scan nearest-neighbor index over fixed-dimension vectors.

use thiserror::Error;

use crate::embedding::EmbeddingVector;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index is empty: search requires at least one stored vector")]
    EmptyIndex,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),
}

/// A nearest neighbor returned by [`VectorIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the matched vector, equal to its insertion order.
    pub position: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

/// In-memory vector index answering k-nearest-neighbor queries by squared
/// Euclidean distance with an exhaustive linear scan.
///
/// Positions are assigned by insertion order and never reordered, so an
/// index built from an embedded corpus maps results back to snippets
/// one-to-one. The index is built once and read thereafter; [`Self::search`]
/// takes `&self` and is safe to call from concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<EmbeddingVector>,
}

impl VectorIndex {
    pub const fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
        }
    }

    /// Build an index from vectors in their final order.
    ///
    /// Dimensionality is taken from the first vector and every subsequent
    /// vector must match it. An empty input yields an empty index on which
    /// every search fails with [`IndexError::EmptyIndex`].
    pub fn build(vectors: Vec<EmbeddingVector>) -> Result<Self, IndexError> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        let mut index = Self::new(dimensions);
        for vector in vectors {
            index.insert(vector)?;
        }
        Ok(index)
    }

    /// Append a vector, assigning it the next position.
    pub fn insert(&mut self, vector: EmbeddingVector) -> Result<(), IndexError> {
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        self.vectors.push(vector);
        Ok(())
    }

    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The `k` nearest stored vectors to `query`, ascending by squared
    /// Euclidean distance, ties broken by lower position.
    ///
    /// `k` larger than the number of stored vectors is not an error: all
    /// stored vectors are returned. `k == 0` is rejected with
    /// [`IndexError::InvalidK`], searching an empty index with
    /// [`IndexError::EmptyIndex`], and a query of the wrong length with
    /// [`IndexError::DimensionMismatch`], checked in that order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if k == 0 {
            return Err(IndexError::InvalidK(k));
        }
        if self.vectors.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| Neighbor {
                position,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
///
/// The square root is omitted: it is monotonic, so rankings are identical
/// and the scan stays cheap.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
