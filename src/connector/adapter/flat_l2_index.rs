use std::cmp::Ordering;

use tracing::debug;

use crate::application::VectorIndex;
use crate::domain::{DomainError, Neighbor};

/// Exact nearest-neighbour search by squared Euclidean distance.
///
/// Vectors are stored row-major in one contiguous buffer. Every query scans
/// all rows, which is fine for a few hundred radicals.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimensions: usize,
    rows: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            rows: 0,
            data: Vec::new(),
        }
    }

    /// Build an index whose row `i` is `vectors[i]`.
    pub fn build(dimensions: usize, vectors: Vec<Vec<f32>>) -> Result<Self, DomainError> {
        let mut index = Self::new(dimensions);
        index.data.reserve(dimensions * vectors.len());
        for vector in vectors {
            index.add(&vector)?;
        }
        debug!("Built flat L2 index: {} x {}", index.rows, dimensions);
        Ok(index)
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<(), DomainError> {
        self.check_dimensions(vector)?;
        self.data.extend_from_slice(vector);
        self.rows += 1;
        Ok(())
    }

    fn row(&self, position: usize) -> &[f32] {
        let start = position * self.dimensions;
        &self.data[start..start + self.dimensions]
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.dimensions {
            return Err(DomainError::invalid_input(format!(
                "Vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl VectorIndex for FlatL2Index {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, DomainError> {
        if self.rows == 0 || k == 0 {
            return Ok(Vec::new());
        }
        self.check_dimensions(query)?;

        let mut neighbors: Vec<Neighbor> = (0..self.rows)
            .map(|position| Neighbor::new(position, squared_l2(self.row(position), query)))
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance()
                .partial_cmp(&b.distance())
                .unwrap_or(Ordering::Equal)
                .then(a.position().cmp(&b.position()))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }

    fn len(&self) -> usize {
        self.rows
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FlatL2Index {
        FlatL2Index::build(
            2,
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0], vec![1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn results_sorted_by_ascending_distance() {
        let hits = index().search(&[0.9, 0.0], 4).unwrap();
        let positions: Vec<usize> = hits.iter().map(|n| n.position()).collect();

        assert_eq!(positions, vec![1, 3, 0, 2]);
        assert!(hits.windows(2).all(|w| w[0].distance() <= w[1].distance()));
    }

    #[test]
    fn ties_break_by_position() {
        let hits = index().search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].position(), 1);
        assert_eq!(hits[1].position(), 3);
        assert_eq!(hits[0].distance(), 0.0);
    }

    #[test]
    fn k_caps_result_count() {
        assert_eq!(index().search(&[0.0, 0.0], 2).unwrap().len(), 2);
        assert_eq!(index().search(&[0.0, 0.0], 10).unwrap().len(), 4);
        assert!(index().search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn empty_index_returns_nothing() {
        let empty = FlatL2Index::new(2);
        assert!(empty.is_empty());
        assert!(empty.search(&[0.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn wrong_dimensions_rejected() {
        assert!(index().search(&[0.0], 1).is_err());
        assert!(FlatL2Index::build(3, vec![vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn distance_is_squared() {
        let hits = index().search(&[0.0, 0.0], 4).unwrap();
        let far = hits.iter().find(|n| n.position() == 2).unwrap();
        assert_eq!(far.distance(), 9.0);
    }
}
