//! The caller-owned index: a dataset, the tree built over it, and the settings used to build it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use crate::config::IndexConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::split::SplitStrategy;
use crate::top_hits::Neighbor;
use crate::tree::Tree;
use crate::vector::Vector;

/// Nearest-neighbor index over an owned [`Dataset`].
///
/// Every mutation rebuilds the whole tree before returning. The new dataset and tree are built
/// aside and only swapped in once both are complete, so a failed call leaves the index as it was.
#[derive(Debug)]
pub struct SpatialIndex {
    dataset: Dataset,
    tree: Tree,
    config: IndexConfig,
    rng: StdRng,
}

impl SpatialIndex {

    pub fn new(leaf_size: usize, strategy: SplitStrategy) -> Result<Self> {

        let config = IndexConfig {
            leaf_size,
            strategy,
            seed: None,
        };

        return Self::with_config(config);
    }

    ///Axis-aligned median splits
    pub fn kd_tree(leaf_size: usize) -> Result<Self> {
        return Self::new(leaf_size, SplitStrategy::AxisAlignedMedian);
    }

    ///Random-projection median splits
    pub fn rp_tree(leaf_size: usize) -> Result<Self> {
        return Self::new(leaf_size, SplitStrategy::RandomProjectionMedian);
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {

        if config.leaf_size == 0 {
            return Err(Error::InvalidParameter("leaf size must be at least 1".to_string()));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        return Ok(Self {
            dataset: Dataset::new(),
            tree: Tree::empty(),
            config,
            rng,
        });
    }

    pub fn dataset(&self) -> &Dataset {
        return &self.dataset;
    }

    pub fn tree(&self) -> &Tree {
        return &self.tree;
    }

    pub fn config(&self) -> &IndexConfig {
        return &self.config;
    }

    pub fn len(&self) -> usize {
        return self.dataset.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.dataset.is_empty();
    }

    ///Appends `vectors` and rebuilds.
    ///
    ///Every vector must match the dataset's dimension (the first new vector's, for an empty
    ///index) and have at least one component; otherwise nothing is added.
    pub fn add_data<I: IntoIterator<Item = Vector>>(&mut self, vectors: I) -> Result<()> {

        let vectors: Vec<Vector> = vectors.into_iter().collect();

        let expected = match (self.dataset.dimension(), vectors.first()) {
            (Some(dim), _) => dim,
            (None, Some(first)) => first.dimension(),
            (None, None) => return Ok(()),
        };

        if expected == 0 {
            return Err(Error::InvalidParameter("vectors must have at least one component".to_string()));
        }

        for v in vectors.iter() {
            if v.dimension() != expected {
                return Err(Error::DimensionMismatch { left: v.dimension(), right: expected });
            }
        }

        let num_added = vectors.len();
        let mut dataset = self.dataset.clone();
        dataset.extend(vectors);

        self.rebuild_with(dataset)?;
        info!("added {} vectors, index now holds {}", num_added, self.dataset.len());

        Ok(())
    }

    ///Removes the first exact match of each vector, skipping absent ones, then rebuilds.
    ///
    ///Returns how many vectors were removed.
    pub fn remove_data(&mut self, vectors: &[Vector]) -> Result<usize> {

        let mut dataset = self.dataset.clone();

        let mut num_removed: usize = 0;
        for v in vectors {
            if dataset.remove_first(v) {
                num_removed += 1;
            }
        }

        self.rebuild_with(dataset)?;
        info!("removed {} of {} requested vectors, index now holds {}", num_removed, vectors.len(), self.dataset.len());

        return Ok(num_removed);
    }

    ///Discards the tree and builds a new one over the current dataset
    pub fn make_tree(&mut self) -> Result<()> {

        let dataset = self.dataset.clone();
        return self.rebuild_with(dataset);
    }

    fn rebuild_with(&mut self, dataset: Dataset) -> Result<()> {

        let start = Instant::now();
        let tree = Tree::build(&dataset, self.config.leaf_size, self.config.strategy, &mut self.rng)?;

        debug!("rebuilt tree over {} vectors in {:?}", dataset.len(), start.elapsed());

        self.dataset = dataset;
        self.tree = tree;

        Ok(())
    }

    ///The `k` nearest vectors to `query`, closest first, ties by index
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {

        if self.dataset.is_empty() {
            return Err(Error::EmptyIndex);
        }

        return self.tree.search(&self.dataset, query, k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn v(data: &[f64]) -> Vector {
        Vector::from_vec(data.to_vec())
    }

    fn seeded(strategy: SplitStrategy, leaf_size: usize) -> SpatialIndex {
        SpatialIndex::with_config(IndexConfig { leaf_size, strategy, seed: Some(17) }).unwrap()
    }

    #[test]
    fn construction() {

        assert!(matches!(SpatialIndex::kd_tree(0), Err(Error::InvalidParameter(_))));

        let index = SpatialIndex::rp_tree(4).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.config().strategy, SplitStrategy::RandomProjectionMedian);
        assert!(matches!(index.search(&v(&[0.0]), 1), Err(Error::EmptyIndex)));
    }

    #[test]
    fn scenario_for_both_variants() {

        for mut index in [SpatialIndex::kd_tree(2).unwrap(), SpatialIndex::rp_tree(2).unwrap()] {
            index.add_data(vec![v(&[0.0, 0.0]), v(&[1.0, 0.0]), v(&[0.0, 1.0]), v(&[5.0, 5.0])]).unwrap();

            let hits = index.search(&v(&[0.0, 0.0]), 2).unwrap();
            assert_eq!(hits[0], Neighbor { index: 0, distance: 0.0 });
            assert!(hits[1].index == 1 || hits[1].index == 2);
            assert_eq!(hits[1].distance, 1.0);
        }
    }

    #[test]
    fn add_rebuilds_the_tree() {

        let mut index = seeded(SplitStrategy::AxisAlignedMedian, 2);
        index.add_data(vec![v(&[0.0]), v(&[1.0])]).unwrap();
        let before = index.tree().num_nodes();

        index.add_data(vec![v(&[2.0]), v(&[3.0]), v(&[4.0])]).unwrap();
        assert_eq!(index.len(), 5);
        assert!(index.tree().num_nodes() > before);

        let hits = index.search(&v(&[3.9]), 1).unwrap();
        assert_eq!(hits[0].index, 4);
    }

    #[test]
    fn mismatched_batch_is_rejected_whole() {

        let mut index = seeded(SplitStrategy::AxisAlignedMedian, 2);
        index.add_data(vec![v(&[0.0, 0.0]), v(&[1.0, 1.0]), v(&[2.0, 2.0])]).unwrap();
        let tree = index.tree().clone();

        let result = index.add_data(vec![v(&[3.0, 3.0]), v(&[4.0])]);
        assert!(matches!(result, Err(Error::DimensionMismatch { left: 1, right: 2 })));
        assert_eq!(index.len(), 3);
        assert_eq!(index.tree(), &tree);

        let mut empty = seeded(SplitStrategy::AxisAlignedMedian, 2);
        assert!(matches!(empty.add_data(vec![Vector::new(0)]), Err(Error::InvalidParameter(_))));
        empty.add_data(Vec::new()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn remove_data() {

        for strategy in [SplitStrategy::AxisAlignedMedian, SplitStrategy::RandomProjectionMedian] {
            let mut index = seeded(strategy, 3);
            let mut rng = StdRng::seed_from_u64(6);
            let points: Vec<Vector> = (0..40).map(|_| Vector::random(3, &mut rng)).collect();
            index.add_data(points.clone()).unwrap();

            //absent vector: no change
            assert_eq!(index.remove_data(&[v(&[9.0, 9.0, 9.0])]).unwrap(), 0);
            assert_eq!(index.len(), 40);

            let target = points[10].clone();
            assert_eq!(index.remove_data(&[target.clone()]).unwrap(), 1);
            assert_eq!(index.len(), 39);

            let hits = index.search(&target, 39).unwrap();
            for hit in hits.iter() {
                assert_ne!(index.dataset().get(hit.index).unwrap(), &target);
                assert!(hit.distance > 0.0);
            }

            //positions after the removed one shifted down
            let hits = index.search(&points[11], 1).unwrap();
            assert_eq!(hits[0].index, 10);
        }
    }

    #[test]
    fn remove_first_duplicate_only() {

        let mut index = seeded(SplitStrategy::AxisAlignedMedian, 1);
        index.add_data(vec![v(&[1.0]), v(&[1.0]), v(&[2.0])]).unwrap();

        assert_eq!(index.remove_data(&[v(&[1.0])]).unwrap(), 1);
        assert_eq!(index.dataset().as_slice(), &[v(&[1.0]), v(&[2.0])]);

        assert_eq!(index.remove_data(&[v(&[1.0]), v(&[2.0])]).unwrap(), 2);
        assert!(index.is_empty());
        assert!(index.tree().is_empty());
        assert!(matches!(index.search(&v(&[1.0]), 1), Err(Error::EmptyIndex)));
    }

    #[test]
    fn every_index_is_reachable() {

        for strategy in [SplitStrategy::AxisAlignedMedian, SplitStrategy::RandomProjectionMedian] {
            let mut index = seeded(strategy, 4);
            let mut rng = StdRng::seed_from_u64(21);
            index.add_data((0..80).map(|_| Vector::random(4, &mut rng))).unwrap();

            let mut found = vec![false; index.len()];
            for i in 0..index.len() {
                let query = index.dataset().get(i).unwrap().clone();
                for hit in index.search(&query, index.len()).unwrap() {
                    found[hit.index] = true;
                }
            }
            assert!(found.iter().all(|x| *x));
        }
    }

    #[test]
    fn seeded_rp_builds_repeat() {

        let mut rng = StdRng::seed_from_u64(30);
        let points: Vec<Vector> = (0..100).map(|_| Vector::random(5, &mut rng)).collect();

        let mut a = seeded(SplitStrategy::RandomProjectionMedian, 4);
        let mut b = seeded(SplitStrategy::RandomProjectionMedian, 4);
        a.add_data(points.clone()).unwrap();
        b.add_data(points).unwrap();

        assert_eq!(a.tree(), b.tree());
    }

    #[test]
    fn make_tree_is_repeatable_for_kd() {

        let mut index = seeded(SplitStrategy::AxisAlignedMedian, 3);
        let mut rng = StdRng::seed_from_u64(2);
        index.add_data((0..50).map(|_| Vector::from_vec(vec![rng.gen(), rng.gen()]))).unwrap();

        let first = index.tree().clone();
        index.make_tree().unwrap();
        assert_eq!(index.tree(), &first);
        assert_eq!(index.len(), 50);
    }
}
