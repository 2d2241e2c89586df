//! Append-ordered collection of vectors plus the text-file reader that fills it.
//!
//! A vector's position in the dataset is the index reported by every search. Positions shift
//! when an earlier vector is removed, so anything holding indices must rebuild afterwards.

use rand::Rng;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, Result};
use crate::vector::Vector;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    vectors: Vec<Vector>,
}

impl Dataset {

    pub fn new() -> Self {

        return Self {
            vectors: Vec::new(),
        }
    }

    pub fn from_vectors(vectors: Vec<Vector>) -> Self {

        return Self { vectors }
    }

    ///`n` vectors with uniform components in `[-1, 1]`
    pub fn random<R: Rng + ?Sized>(n: usize, dimension: usize, rng: &mut R) -> Self {

        let vectors = (0..n).map(|_| Vector::random(dimension, rng)).collect();
        return Self { vectors };
    }

    pub fn len(&self) -> usize {
        return self.vectors.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.vectors.is_empty();
    }

    ///Dimension of the first vector, `None` when empty
    pub fn dimension(&self) -> Option<usize> {
        return self.vectors.first().map(|v| v.dimension());
    }

    pub fn get(&self, index: usize) -> Option<&Vector> {
        return self.vectors.get(index);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        return self.vectors.iter();
    }

    pub fn as_slice(&self) -> &[Vector] {
        return &self.vectors;
    }

    pub fn push(&mut self, vector: Vector) {
        self.vectors.push(vector);
    }

    pub fn extend<I: IntoIterator<Item = Vector>>(&mut self, vectors: I) {
        self.vectors.extend(vectors);
    }

    ///Removes the first vector exactly equal to `vector`.
    ///
    ///Returns whether anything was removed. Later positions shift down by one.
    pub fn remove_first(&mut self, vector: &Vector) -> bool {

        match self.vectors.iter().position(|v| v == vector) {
            Some(i) => {
                self.vectors.remove(i);
                true
            },
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.vectors.clear();
    }

    pub fn read_from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {

        let file = File::open(filename)?;
        return Self::from_reader(io::BufReader::new(file));
    }

    ///Parses one vector per line, components separated by commas.
    ///
    ///Blank lines are skipped. Any other separator, an empty field between commas, a token that
    ///is not a finite number, or a record whose dimension differs from the first record aborts the whole
    ///read; no partial dataset is returned.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {

        let mut dataset = Self::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;

            let record = match parse_record(&line, line_number)? {
                None => continue,
                Some(x) => x,
            };

            if let Some(dim) = dataset.dimension() {
                if dim != record.dimension() {
                    return Err(Error::MalformedRecord {
                        line: line_number,
                        reason: format!("expected {} components, found {}", dim, record.dimension()),
                    });
                }
            }

            dataset.push(record);
        }

        return Ok(dataset);
    }
}

impl From<Vec<Vector>> for Dataset {
    fn from(vectors: Vec<Vector>) -> Self {
        Self::from_vectors(vectors)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

fn parse_record(line: &str, line_number: usize) -> Result<Option<Vector>> {

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    //a single trailing comma is tolerated
    let body = trimmed.strip_suffix(',').unwrap_or(trimmed);

    let mut vector = Vector::new(0);
    for field in body.split(',') {
        let token = field.trim();

        if token.is_empty() {
            return Err(Error::MalformedRecord {
                line: line_number,
                reason: "empty field".to_string(),
            });
        }

        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => vector.push_component(value),
            Ok(_) => {
                return Err(Error::MalformedRecord {
                    line: line_number,
                    reason: format!("non-finite value: {:?}", token),
                });
            },
            Err(_) => {
                let reason = match token.split_whitespace().count() > 1 {
                    true => format!("values must be separated by commas: {:?}", token),
                    false => format!("not a number: {:?}", token),
                };
                return Err(Error::MalformedRecord { line: line_number, reason });
            },
        }
    }

    return Ok(Some(vector));
}
