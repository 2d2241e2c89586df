//! Index configuration, readable from and writable to YAML

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::error::Result;
use crate::split::SplitStrategy;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexConfig {
    ///nodes with fewer indices than this are not split
    pub leaf_size: usize,
    pub strategy: SplitStrategy,
    ///seed for the split rng; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for IndexConfig {

    fn default() -> Self {
        return Self {
            leaf_size: 8,
            strategy: SplitStrategy::AxisAlignedMedian,
            seed: None,
        }
    }
}

impl IndexConfig {

    pub fn from_yaml(s: &str) -> Result<Self> {

        let deserialized: Self = serde_yaml::from_str(s)?;
        return Ok(deserialized);
    }

    pub fn to_yaml(&self) -> Result<String> {
        return Ok(serde_yaml::to_string(&self)?);
    }

    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {

        let serialized = std::fs::read_to_string(filename)?;
        return Self::from_yaml(&serialized);
    }

    pub fn to_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {

        let serialized = self.to_yaml()?;
        let mut file = File::create(filename)?;

        file.write_all(serialized.as_bytes())?;
        Ok(())
    }
}
