use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::params::{Blob, DEFAULT_BLOBS, SEED_TINT};

/// Blob layout and color of the seed pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Seed", inline)]
#[serde(default)]
pub struct SeedOptions {
    /// Orbiting blobs that inject ink every frame.
    #[schemars(title = "Blobs")]
    pub blobs: Vec<Blob>,
    /// Constant color channels of the seed buffer.
    #[schemars(skip)]
    pub tint: [f32; 3],
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            blobs: DEFAULT_BLOBS.to_vec(),
            tint: SEED_TINT,
        }
    }
}
