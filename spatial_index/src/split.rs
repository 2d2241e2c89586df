//! Split rules and the two strategies that produce them.
//!
//! A [`SplitRule`] sends a vector left when its coordinate (axis-aligned) or its projection onto a
//! unit direction (random projection) is at most the rule's threshold. The same rule gives the
//! distance from a query to the splitting hyperplane, which search uses to prune siblings.

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::vector::{median, Vector};

///Attempts at drawing a non-zero random direction before giving up
const MAX_DIRECTION_DRAWS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    ///kd-tree: median of the widest dimension
    AxisAlignedMedian,
    ///rp-tree: jittered median of a random projection
    RandomProjectionMedian,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SplitRule {
    AxisAligned {
        dim: usize,
        median: f64,
    },
    RandomProjection {
        direction: Vector,
        median: f64,
        delta: f64,
    },
}

impl SplitRule {

    ///Coordinate along which the rule compares: the component itself, or the projection
    fn project(&self, vector: &Vector) -> Result<f64> {

        match self {
            SplitRule::AxisAligned { dim, .. } => vector.get(*dim),
            SplitRule::RandomProjection { direction, .. } => direction.dot(vector),
        }
    }

    pub fn threshold(&self) -> f64 {

        match self {
            SplitRule::AxisAligned { median, .. } => *median,
            SplitRule::RandomProjection { median, delta, .. } => median + delta,
        }
    }

    pub fn goes_left(&self, vector: &Vector) -> Result<bool> {

        return Ok(self.project(vector)? <= self.threshold());
    }

    ///Distance from `query` to the splitting hyperplane.
    ///
    ///Directions are unit length, so the projected gap is a true Euclidean distance for both
    ///variants.
    pub fn hyperplane_distance(&self, query: &Vector) -> Result<f64> {

        return Ok((self.project(query)? - self.threshold()).abs());
    }
}

impl SplitStrategy {

    ///Builds a rule for the vectors at `indices`. `indices` must be non-empty and in range.
    pub fn choose_rule<R: Rng + ?Sized>(&self, dataset: &Dataset, indices: &[usize], rng: &mut R) -> Result<SplitRule> {

        let first = match indices.first() {
            None => return Err(Error::EmptySplitSet),
            Some(x) => &dataset.as_slice()[*x],
        };

        if first.dimension() == 0 {
            return Err(Error::InvalidParameter("cannot split zero-dimension vectors".to_string()));
        }

        match self {
            SplitStrategy::AxisAlignedMedian => axis_aligned_rule(dataset, indices),
            SplitStrategy::RandomProjectionMedian => random_projection_rule(dataset, indices, rng),
        }
    }
}

fn axis_aligned_rule(dataset: &Dataset, indices: &[usize]) -> Result<SplitRule> {

    let vectors = dataset.as_slice();
    let num_dims = vectors[indices[0]].dimension();

    let mut max_vals = vec![f64::NEG_INFINITY; num_dims];
    let mut min_vals = vec![f64::INFINITY; num_dims];

    for &index in indices {
        let v = &vectors[index];
        for i in 0..num_dims {
            let val = v.get(i)?;
            if val > max_vals[i] { max_vals[i] = val; }
            if val < min_vals[i] { min_vals[i] = val; }
        }
    }

    //strict comparison keeps the first dimension on ties
    let mut split_dim = 0;
    let mut max_spread = f64::NEG_INFINITY;
    for i in 0..num_dims {
        let spread = max_vals[i] - min_vals[i];
        if spread > max_spread {
            max_spread = spread;
            split_dim = i;
        }
    }

    let median = Vector::median_of_dimension(indices.iter().map(|i| &vectors[*i]), split_dim)?;

    trace!("axis split: dim {} spread {} median {}", split_dim, max_spread, median);

    return Ok(SplitRule::AxisAligned { dim: split_dim, median });
}

fn random_direction<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Vector> {

    for _ in 0..MAX_DIRECTION_DRAWS {
        let mut direction = Vector::random(dimension, rng);
        match direction.normalize() {
            Ok(()) => return Ok(direction),
            Err(Error::ZeroNorm) => continue,
            Err(e) => return Err(e),
        }
    }

    return Err(Error::ZeroNorm);
}

fn random_projection_rule<R: Rng + ?Sized>(dataset: &Dataset, indices: &[usize], rng: &mut R) -> Result<SplitRule> {

    let vectors = dataset.as_slice();
    let x = &vectors[indices[0]];
    let num_dims = x.dimension();

    let direction = random_direction(num_dims, rng)?;

    //farthest point from an arbitrary one: a 2-approximation of the diameter
    let mut max_distance: f64 = 0.0;
    for &index in indices {
        let distance = x.distance(&vectors[index])?;
        if distance > max_distance {
            max_distance = distance;
        }
    }

    let jitter: f64 = rng.gen_range(-1.0..=1.0);
    let delta = jitter * 6.0 * max_distance.sqrt() / (num_dims as f64).sqrt();

    let mut projections: Vec<f64> = Vec::with_capacity(indices.len());
    for &index in indices {
        projections.push(direction.dot(&vectors[index])?);
    }
    let median = median(&mut projections)?;

    trace!("projection split: median {} delta {} diameter estimate {}", median, delta, max_distance);

    return Ok(SplitRule::RandomProjection { direction, median, delta });
}
