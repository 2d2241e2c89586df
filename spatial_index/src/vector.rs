//! Fixed-dimension real vectors and the small amount of algebra the trees need.
//!
//! Every binary operation checks dimensions and returns `Error::DimensionMismatch` instead of
//! truncating to the shorter operand.

use rand::Rng;
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {

    ///Zero vector of the given dimension
    pub fn new(dimension: usize) -> Self {

        return Self {
            data: vec![0.0; dimension],
        }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {

        return Self { data }
    }

    ///Independent uniform components in `[-1, 1]`
    pub fn random<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Self {

        let data: Vec<f64> = (0..dimension).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        return Self { data };
    }

    pub fn dimension(&self) -> usize {
        return self.data.len();
    }

    ///Resizes to `dimension`, clearing every component to zero
    pub fn set_dimension(&mut self, dimension: usize) {
        self.data.clear();
        self.data.resize(dimension, 0.0);
    }

    pub fn push_component(&mut self, value: f64) {
        self.data.push(value);
    }

    pub fn get(&self, index: usize) -> Result<f64> {

        match self.data.get(index) {
            Some(x) => Ok(*x),
            None => Err(Error::IndexOutOfRange { index, dimension: self.dimension() }),
        }
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {

        let dimension = self.dimension();
        match self.data.get_mut(index) {
            Some(x) => {
                *x = value;
                Ok(())
            },
            None => Err(Error::IndexOutOfRange { index, dimension }),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        return &self.data;
    }

    fn check_dimension(&self, other: &Vector) -> Result<()> {

        match self.dimension() == other.dimension() {
            true => Ok(()),
            false => Err(Error::DimensionMismatch { left: self.dimension(), right: other.dimension() }),
        }
    }

    pub fn add(&self, other: &Vector) -> Result<Vector> {

        self.check_dimension(other)?;
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a + b).collect();
        return Ok(Self { data });
    }

    pub fn subtract(&self, other: &Vector) -> Result<Vector> {

        self.check_dimension(other)?;
        let data = self.data.iter().zip(other.data.iter()).map(|(a, b)| a - b).collect();
        return Ok(Self { data });
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {

        self.check_dimension(other)?;
        let result = self.data.iter().zip(other.data.iter()).map(|(a, b)| a * b).sum();
        return Ok(result);
    }

    pub fn norm(&self) -> f64 {

        let sum: f64 = self.data.iter().map(|x| x * x).sum();
        return sum.sqrt();
    }

    ///Euclidean distance
    pub fn distance(&self, other: &Vector) -> Result<f64> {

        self.check_dimension(other)?;

        let mut sum: f64 = 0.0;
        for (a, b) in self.data.iter().zip(other.data.iter()) {
            sum += (a - b) * (a - b);
        }

        return Ok(sum.sqrt());
    }

    ///Scales to unit length in place
    pub fn normalize(&mut self) -> Result<()> {

        let norm = self.norm();
        if norm == 0.0 {
            return Err(Error::ZeroNorm);
        }

        for component in self.data.iter_mut() {
            *component /= norm;
        }

        Ok(())
    }

    pub fn normalized(&self) -> Result<Vector> {

        let mut v = self.clone();
        v.normalize()?;
        return Ok(v);
    }

    ///Median of component `dim` across `vectors`
    pub fn median_of_dimension<'a, I>(vectors: I, dim: usize) -> Result<f64>
    where
        I: IntoIterator<Item = &'a Vector>,
    {
        let mut values: Vec<f64> = Vec::new();
        for v in vectors {
            values.push(v.get(dim)?);
        }

        return median(&mut values);
    }
}

///Standard median: the middle value, or the mean of the two middle values for an even count.
///
///Sorts `values` in place.
pub fn median(values: &mut [f64]) -> Result<f64> {

    if values.is_empty() {
        return Err(Error::EmptySplitSet);
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let median = match values.len() % 2 {
        0 => {
            let idx_b: usize = values.len() / 2;
            let idx_a = idx_b - 1;

            (values[idx_a] + values[idx_b]) / 2.0
        },
        _ => values[values.len() / 2],
    };

    return Ok(median);
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

impl fmt::Display for Vector {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<")?;
        for (i, item) in self.data.iter().enumerate() {
            if i != 0 { write!(f, ", ")?; }
            write!(f, "{}", item)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {

        let mut rng = StdRng::seed_from_u64(7);

        for dim in [1, 2, 8, 33] {
            let a = Vector::random(dim, &mut rng);
            let b = Vector::random(dim, &mut rng);

            assert_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
            assert_eq!(a.distance(&a).unwrap(), 0.0);
            assert_eq!(a.dot(&b).unwrap(), b.dot(&a).unwrap());
            assert_approx_eq!(a.norm(), a.dot(&a).unwrap().sqrt());
        }
    }

    #[test]
    fn known_values() {

        let a = Vector::from_vec(vec![3.0, 4.0]);
        let b = Vector::from_vec(vec![0.0, 0.0]);

        assert_eq!(a.norm(), 5.0);
        assert_eq!(a.distance(&b).unwrap(), 5.0);
        assert_eq!(a.add(&a).unwrap(), Vector::from_vec(vec![6.0, 8.0]));
        assert_eq!(a.subtract(&a).unwrap(), Vector::new(2));
        assert_eq!(a.dot(&Vector::from_vec(vec![1.0, -1.0])).unwrap(), -1.0);
    }

    #[test]
    fn binary_ops_reject_mismatched_dimensions() {

        let a = Vector::new(3);
        let b = Vector::new(2);

        assert!(matches!(a.add(&b), Err(Error::DimensionMismatch { left: 3, right: 2 })));
        assert!(matches!(a.subtract(&b), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(a.dot(&b), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(a.distance(&b), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn normalize() {

        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let v = Vector::random(16, &mut rng);
            let n = v.normalized().unwrap();
            assert_approx_eq!(n.norm(), 1.0, 1e-12);
        }

        let mut zero = Vector::new(4);
        assert!(matches!(zero.normalize(), Err(Error::ZeroNorm)));
        assert_eq!(zero, Vector::new(4));
    }

    #[test]
    fn component_access() {

        let mut v = Vector::new(2);
        v.set(1, 2.5).unwrap();
        assert_eq!(v.get(1).unwrap(), 2.5);
        assert!(matches!(v.get(2), Err(Error::IndexOutOfRange { index: 2, dimension: 2 })));
        assert!(matches!(v.set(5, 1.0), Err(Error::IndexOutOfRange { .. })));

        v.push_component(7.0);
        assert_eq!(v.dimension(), 3);

        v.set_dimension(5);
        assert_eq!(v, Vector::new(5));
    }

    #[test]
    fn equality_is_exact() {

        let a = Vector::from_vec(vec![1.0, 2.0]);
        let b = Vector::from_vec(vec![1.0, 2.0 + 1e-15]);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a, Vector::from_vec(vec![1.0, 2.0, 0.0]));
    }

    #[test]
    fn median_odd_and_even() {

        let vs: Vec<Vector> = [5.0, 1.0, 3.0].iter().map(|x| Vector::from_vec(vec![0.0, *x])).collect();
        assert_eq!(Vector::median_of_dimension(vs.iter(), 1).unwrap(), 3.0);

        let vs: Vec<Vector> = [4.0, 1.0, 3.0, 2.0].iter().map(|x| Vector::from_vec(vec![*x])).collect();
        assert_eq!(Vector::median_of_dimension(vs.iter(), 0).unwrap(), 2.5);

        assert!(matches!(Vector::median_of_dimension(vs.iter(), 1), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(median(&mut []), Err(Error::EmptySplitSet)));
    }

    #[test]
    fn display() {
        let v = Vector::from_vec(vec![1.0, 2.5]);
        assert_eq!(v.to_string(), "<1, 2.5>");
    }
}
