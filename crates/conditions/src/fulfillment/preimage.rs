//! SHA-256 preimage hashlock (type 0).
//!
//! The condition commits to `SHA-256(preimage)`; revealing the preimage is
//! the whole proof.  Both the hash payload and the fulfillment payload are
//! the preimage bytes verbatim, so the empty preimage serializes to `cf:0:`.

use ccond_codec::{CodecError, Encoder};

use crate::errors::Result;
use crate::type_ids::{FEATURE_PREIMAGE, FEATURE_SHA_256};

/// Preimage hashlock fulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreimageSha256 {
    preimage: Vec<u8>,
}

impl PreimageSha256 {
    /// Constructs a new instance from the preimage bytes.
    pub fn new(preimage: Vec<u8>) -> Self {
        Self { preimage }
    }

    /// Gets the preimage.
    pub fn preimage(&self) -> &[u8] {
        &self.preimage
    }

    /// Replaces the preimage.
    pub fn set_preimage(&mut self, preimage: Vec<u8>) {
        self.preimage = preimage;
    }

    pub(crate) fn features(&self) -> u32 {
        FEATURE_SHA_256 | FEATURE_PREIMAGE
    }

    pub(crate) fn write_hash_payload(
        &self,
        enc: &mut impl Encoder,
    ) -> std::result::Result<(), CodecError> {
        enc.write_buf(&self.preimage)
    }

    pub(crate) fn write_payload(
        &self,
        enc: &mut impl Encoder,
    ) -> std::result::Result<(), CodecError> {
        enc.write_buf(&self.preimage)
    }

    pub(crate) fn parse_payload(payload: &[u8]) -> Self {
        Self::new(payload.to_vec())
    }

    pub(crate) fn max_fulfillment_length(&self) -> usize {
        self.preimage.len()
    }

    /// A revealed preimage is self-certifying; the message plays no part.
    pub(crate) fn validate(&self) -> Result<()> {
        Ok(())
    }
}
