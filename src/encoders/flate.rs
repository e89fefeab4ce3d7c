//! FlateDecode (zlib/deflate) encoder.
//!
//! Uses the flate2 crate. Output carries the zlib container, which is
//! what FlateDecode readers expect.

use crate::encoders::StreamEncoder;
use crate::error::Result;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// FlateDecode encoder with a fixed compression level.
#[derive(Debug, Clone, Copy)]
pub struct FlateEncoder {
    level: Compression,
}

impl FlateEncoder {
    /// Create an encoder with the given level (0-9, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }

    /// Encoder at maximum compression effort.
    pub fn best() -> Self {
        Self {
            level: Compression::best(),
        }
    }

    /// The configured compression level.
    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

impl Default for FlateEncoder {
    fn default() -> Self {
        Self::best()
    }
}

impl StreamEncoder for FlateEncoder {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder.write_all(input)?;
        Ok(encoder.finish()?)
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}
