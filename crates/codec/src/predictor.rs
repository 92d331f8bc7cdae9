//! Encoder sink that only counts bytes.

use crate::errors::CodecError;
use crate::types::Encoder;

/// Encoder that accumulates a length and discards the data.
///
/// Used to predict serialized sizes, notably worst-case fulfillment
/// lengths, by running the same write path that real serialization uses.
#[derive(Copy, Clone, Debug, Default)]
pub struct Predictor {
    size: usize,
}

impl Predictor {
    /// Constructs a new instance with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts bytes as written without seeing them.  Used for placeholder
    /// content whose size is known but whose bytes don't exist yet.
    pub fn skip(&mut self, len: usize) {
        self.size += len;
    }

    /// Returns the number of bytes written so far.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Encoder for Predictor {
    fn write_buf(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.size += buf.len();
        Ok(())
    }
}
