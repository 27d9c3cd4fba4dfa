//! `[compress]` section configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// Produce `.gz` siblings for compressible output files.
    pub gzip: bool,

    /// Produce `.br` siblings for compressible output files.
    pub brotli: bool,

    /// Compression level shared by both codecs.
    /// Gzip clamps it to 9, brotli to 11.
    pub level: u32,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            gzip: true,
            brotli: true,
            level: 9,
        }
    }
}

impl CompressConfig {
    /// Whether any compression codec is active.
    pub fn any(&self) -> bool {
        self.gzip || self.brotli
    }

    pub fn gzip_level(&self) -> u32 {
        self.level.min(9)
    }

    pub fn brotli_quality(&self) -> u32 {
        self.level.min(11)
    }
}
