//! Brute-force nearest neighbors: a distance to every vector, then a sort.
//!
//! Serves as the baseline the trees are timed against and as the oracle in their tests.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::top_hits::Neighbor;
use crate::vector::Vector;

pub fn k_nearest_neighbors(dataset: &Dataset, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {

    if k == 0 {
        return Err(Error::InvalidParameter("k must be at least 1".to_string()));
    }

    if dataset.is_empty() {
        return Err(Error::EmptyIndex);
    }

    let mut distances: Vec<Neighbor> = Vec::with_capacity(dataset.len());
    for (index, v) in dataset.iter().enumerate() {
        let distance = query.distance(v)?;
        distances.push(Neighbor { index, distance });
    }

    distances.sort();
    distances.truncate(k);

    return Ok(distances);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_and_truncated() {

        let ds = Dataset::from_vectors(vec![
            Vector::from_vec(vec![3.0]),
            Vector::from_vec(vec![-1.0]),
            Vector::from_vec(vec![1.0]),
            Vector::from_vec(vec![0.5]),
        ]);

        let hits = k_nearest_neighbors(&ds, &Vector::from_vec(vec![0.0]), 3).unwrap();
        assert_eq!(hits, vec![
            Neighbor { index: 3, distance: 0.5 },
            Neighbor { index: 1, distance: 1.0 },
            Neighbor { index: 2, distance: 1.0 },
        ]);

        let all = k_nearest_neighbors(&ds, &Vector::from_vec(vec![0.0]), 10).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn failures() {

        let ds = Dataset::from_vectors(vec![Vector::new(2)]);
        assert!(matches!(k_nearest_neighbors(&Dataset::new(), &Vector::new(2), 1), Err(Error::EmptyIndex)));
        assert!(matches!(k_nearest_neighbors(&ds, &Vector::new(3), 1), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(k_nearest_neighbors(&ds, &Vector::new(2), 0), Err(Error::InvalidParameter(_))));
    }
}
