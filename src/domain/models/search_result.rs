use serde::{Deserialize, Serialize};

/// One nearest-neighbour hit: the row position in the index and its squared L2
/// distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    position: usize,
    distance: f32,
}

impl Neighbor {
    pub fn new(position: usize, distance: f32) -> Self {
        Self { position, distance }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn display_line(&self) -> String {
        format!("#{} (distance: {:.4})", self.position, self.distance)
    }
}
