//! Bounded set of the closest candidates seen so far during a query.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

///One search result: a dataset position and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Eq for Neighbor {}

///Orders by distance, then by index, so ties are resolved the same way on every run
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance).then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///struct for keeping N- top closest points
///
///A max-heap keyed by distance: the root is always the worst kept candidate, and that is the one
///evicted when a closer point arrives.
#[derive(Debug)]
pub struct TopHits {
    pub max_length: usize,
    heap: BinaryHeap<Neighbor>,
    seen: HashSet<usize>,
}

impl TopHits {

    pub fn new(max_length: usize) -> Self {

        return Self {
            max_length,
            heap: BinaryHeap::with_capacity(max_length + 1),
            seen: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        return self.heap.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.heap.is_empty();
    }

    pub fn is_full(&self) -> bool {
        return self.heap.len() >= self.max_length;
    }

    ///Distance of the worst kept candidate, infinity until the set is full
    pub fn worst_distance(&self) -> f64 {

        match (self.is_full(), self.heap.peek()) {
            (true, Some(worst)) => worst.distance,
            _ => f64::INFINITY,
        }
    }

    ///Offers a candidate. Returns whether it was kept.
    ///
    ///An index already held is ignored. Once full, the candidate replaces the current worst only
    ///if it orders before it.
    pub fn try_add(&mut self, index: usize, distance: f64) -> bool {

        if self.max_length == 0 || self.seen.contains(&index) {
            return false;
        }

        let candidate = Neighbor { index, distance };

        if !self.is_full() {
            self.heap.push(candidate);
            self.seen.insert(index);
            return true;
        }

        let replace = match self.heap.peek() {
            Some(worst) => candidate < *worst,
            None => false,
        };

        if replace {
            if let Some(evicted) = self.heap.pop() {
                self.seen.remove(&evicted.index);
            }
            self.heap.push(candidate);
            self.seen.insert(index);
        }

        return replace;
    }

    ///Candidates in ascending distance order, ties by index
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        return self.heap.into_sorted_vec();
    }
}
