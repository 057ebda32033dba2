//! Configuration types for the attribute engine.

use serde::{Deserialize, Serialize};

/// Size limits applied by stores.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StoreLimits {
    /// Largest attribute value read or written, in bytes.
    pub max_value_len: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            // Linux caps a single value at 64KB; other filesystems allow less.
            max_value_len: 64 * 1024,
        }
    }
}

/// Session configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub limits: StoreLimits,
}
