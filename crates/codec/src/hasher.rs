//! Encoder sink that feeds a running SHA-256 context.

use digest::Digest;
use sha2::Sha256;

use crate::errors::CodecError;
use crate::types::Encoder;

/// Encoder that hashes everything written to it instead of storing it.
///
/// Writing a payload layout through this produces the same digest as
/// serializing to a buffer and hashing that, without the intermediate
/// allocation.
#[derive(Debug, Default)]
pub struct Sha256Hasher {
    context: Sha256,
}

impl Sha256Hasher {
    /// Constructs a new instance with a fresh context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the hasher and returns the digest of everything written.
    pub fn digest(self) -> [u8; 32] {
        self.context.finalize().into()
    }
}

impl Encoder for Sha256Hasher {
    fn write_buf(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.context.update(buf);
        Ok(())
    }
}
