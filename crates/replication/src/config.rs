//! Placement configuration.
//!
//! ```json
//! { "replicas": 2, "partitioner": "polynomial" }
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use crate::strategy::simple::DEFAULT_REPLICAS;
use crate::strategy::SimpleStrategy;
use corelib::{Error, PartitionerKind, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Copies kept beyond the primary; fixed for the engine's lifetime.
    pub replicas: usize,
    /// Hash family used for node and entry positions.
    pub partitioner: PartitionerKind,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            partitioner: PartitionerKind::default(),
        }
    }
}

impl PlacementConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn strategy(&self) -> SimpleStrategy {
        SimpleStrategy::new(self.replicas)
    }
}
