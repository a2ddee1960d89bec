use crate::domain::{DomainError, Neighbor};

/// Exact nearest-neighbour search over a fixed set of vectors.
///
/// Row positions are stable and are the join key back to the documents the
/// vectors were built from.
pub trait VectorIndex: Send + Sync {
    /// Up to `k` neighbours ordered by ascending distance.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, DomainError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dimensions(&self) -> usize;
}
