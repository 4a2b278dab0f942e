use serde::{Deserialize, Serialize};

use scltree_index::IndexConfig;

use crate::matcher::PRIVATE_TAG;

/// Configuration for a [`TreeDiffer`](crate::TreeDiffer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// How both trees are fingerprinted.
    pub index: IndexConfig,
    /// Local tag name of the vendor-opaque extension element.
    pub private_tag: String,
    /// Verify unambiguous fingerprint matches with the structural matcher
    /// even when the digest is collision resistant.
    pub verify_matches: bool,
    /// Index the two trees on separate threads.
    pub parallel: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            private_tag: PRIVATE_TAG.to_string(),
            verify_matches: false,
            parallel: false,
        }
    }
}

impl DiffConfig {
    /// Whether a one-to-one fingerprint match still needs a structural check.
    pub fn needs_verification(&self) -> bool {
        self.verify_matches || !self.index.digest.is_collision_resistant()
    }
}
