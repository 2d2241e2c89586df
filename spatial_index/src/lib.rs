//! In-memory space-partitioning trees for exact nearest neighbor search over real vectors.
//!
//! Two tree flavours share one build and one search routine and differ only in how a node picks
//! its split:
//!
//! - kd-tree: split the widest dimension at its median
//! - rp-tree: split a random unit direction at the median projection, shifted by a random amount
//!   proportional to the node's estimated diameter
//!
//! Leaves own the dataset positions they cover; internal nodes hold only their split rule. The
//! whole tree is rebuilt after every insertion or removal, there is no incremental update path.
//!
//! ```
//! use spatial_index::{SpatialIndex, Vector};
//!
//! let mut index = SpatialIndex::kd_tree(2).unwrap();
//! index.add_data(vec![
//!     Vector::from_vec(vec![0.0, 0.0]),
//!     Vector::from_vec(vec![1.0, 0.0]),
//!     Vector::from_vec(vec![5.0, 5.0]),
//! ]).unwrap();
//!
//! let hits = index.search(&Vector::from_vec(vec![0.9, 0.1]), 1).unwrap();
//! assert_eq!(hits[0].index, 1);
//! ```
//!
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod linear;
pub mod node;
pub mod split;
pub mod top_hits;
pub mod tree;
pub mod vector;

pub use config::IndexConfig;
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use index::SpatialIndex;
pub use split::{SplitRule, SplitStrategy};
pub use top_hits::Neighbor;
pub use tree::Tree;
pub use vector::Vector;
