//! Ed25519 signature fulfillment (type 4).
//!
//! The condition's hash field is the 32-byte public key itself rather than
//! a SHA-256 digest; the key is already a short binding commitment, so the
//! indirection would only cost bytes.  The payload is the fixed-size
//! concatenation `public_key(32) | signature(64)` with no length prefixes.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use ccond_codec::Encoder;

use crate::errors::{ConditionError, Result};
use crate::type_ids::FEATURE_ED25519;

/// Ed25519 public key size in bytes.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;
/// Ed25519 signature size in bytes.
pub const ED25519_SIGNATURE_LEN: usize = 64;
/// Fixed payload size: public key followed by signature.
const FULFILLMENT_LEN: usize = ED25519_PUBLIC_KEY_LEN + ED25519_SIGNATURE_LEN;

/// Ed25519 signature fulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ed25519 {
    public_key: Option<[u8; ED25519_PUBLIC_KEY_LEN]>,
    signature: Option<[u8; ED25519_SIGNATURE_LEN]>,
}

impl Ed25519 {
    /// Constructs a new, empty instance to be populated by
    /// [`Self::set_public_key`] and [`Self::set_signature`] or by
    /// [`Self::sign`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the public key, if set.
    pub fn public_key(&self) -> Option<&[u8; ED25519_PUBLIC_KEY_LEN]> {
        self.public_key.as_ref()
    }

    /// Gets the signature, if set.
    pub fn signature(&self) -> Option<&[u8; ED25519_SIGNATURE_LEN]> {
        self.signature.as_ref()
    }

    /// Sets the public key.
    pub fn set_public_key(&mut self, key: &[u8]) -> Result<()> {
        let key = key.try_into().map_err(|_| {
            ConditionError::InvalidArgument(format!(
                "ed25519 public key must be {ED25519_PUBLIC_KEY_LEN} bytes, got {}",
                key.len()
            ))
        })?;
        self.public_key = Some(key);
        Ok(())
    }

    /// Sets the signature.
    pub fn set_signature(&mut self, signature: &[u8]) -> Result<()> {
        let signature = signature.try_into().map_err(|_| {
            ConditionError::InvalidArgument(format!(
                "ed25519 signature must be {ED25519_SIGNATURE_LEN} bytes, got {}",
                signature.len()
            ))
        })?;
        self.signature = Some(signature);
        Ok(())
    }

    /// Signs a message with a 32-byte private seed, populating both the
    /// public key and the signature.
    pub fn sign(&mut self, message: &[u8], seed: &[u8]) -> Result<()> {
        let seed: &[u8; 32] = seed.try_into().map_err(|_| {
            ConditionError::InvalidArgument(format!(
                "ed25519 seed must be 32 bytes, got {}",
                seed.len()
            ))
        })?;

        let key = SigningKey::from_bytes(seed);
        self.public_key = Some(key.verifying_key().to_bytes());
        self.signature = Some(key.sign(message).to_bytes());
        Ok(())
    }

    fn key(&self) -> Result<&[u8; ED25519_PUBLIC_KEY_LEN]> {
        self.public_key
            .as_ref()
            .ok_or(ConditionError::MissingData("public key"))
    }

    fn sig(&self) -> Result<&[u8; ED25519_SIGNATURE_LEN]> {
        self.signature
            .as_ref()
            .ok_or(ConditionError::MissingData("signature"))
    }

    pub(crate) fn features(&self) -> u32 {
        FEATURE_ED25519
    }

    /// The condition hash field is the public key, with no digest.
    pub(crate) fn public_key_hash(&self) -> Result<Vec<u8>> {
        Ok(self.key()?.to_vec())
    }

    pub(crate) fn write_hash_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        Ok(enc.write_buf(self.key()?)?)
    }

    pub(crate) fn write_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        let key = self.key()?;
        let sig = self.sig()?;
        enc.write_buf(key)?;
        Ok(enc.write_buf(sig)?)
    }

    pub(crate) fn parse_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() != FULFILLMENT_LEN {
            return Err(ConditionError::Malformed(
                "ed25519 payload must be exactly 96 bytes",
            ));
        }

        let mut fulfillment = Self::new();
        fulfillment.set_public_key(&payload[..ED25519_PUBLIC_KEY_LEN])?;
        fulfillment.set_signature(&payload[ED25519_PUBLIC_KEY_LEN..])?;
        Ok(fulfillment)
    }

    pub(crate) fn max_fulfillment_length(&self) -> usize {
        FULFILLMENT_LEN
    }

    pub(crate) fn validate(&self, message: &[u8]) -> Result<()> {
        let key = VerifyingKey::from_bytes(self.key()?)
            .map_err(|_| ConditionError::InvalidArgument("invalid ed25519 public key".into()))?;
        let signature = Signature::from_bytes(self.sig()?);

        key.verify(message, &signature)
            .map_err(|_| ConditionError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fulfillment;

    #[test]
    fn test_zero_seed_empty_message_vector() {
        let mut fulfillment = Ed25519::new();
        fulfillment.sign(b"", &[0u8; 32]).unwrap();
        let fulfillment = Fulfillment::from(fulfillment);

        assert_eq!(
            fulfillment.condition().unwrap().to_uri(),
            "cc:4:20:O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik:96"
        );
        assert_eq!(
            fulfillment.serialize_uri().unwrap(),
            "cf:4:O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2imPiVs8r-LJUGA50OKmY4JWgARnT-jSN3hQkuQNaq9IPk_GAWhwXzHxAVlhOM4hqjV8DTKgZPQj3D7kqjq_U_gD"
        );
        fulfillment.validate(b"").unwrap();
    }

    #[test]
    fn test_all_ones_seed_vector() {
        let mut fulfillment = Ed25519::new();
        fulfillment.sign(&[0x61, 0x62, 0x63], &[0xffu8; 32]).unwrap();
        let fulfillment = Fulfillment::from(fulfillment);

        assert_eq!(
            fulfillment.condition().unwrap().to_uri(),
            "cc:4:20:dqFZIESm5PURJlvKc6YE2QsFKdHfYCvjChmpJXZg0fU:96"
        );
        fulfillment.validate(b"abc").unwrap();
    }

    #[test]
    fn test_wrong_message_fails() {
        let mut fulfillment = Ed25519::new();
        fulfillment.sign(b"abc", &[7u8; 32]).unwrap();

        assert!(fulfillment.validate(b"abc").is_ok());
        assert!(matches!(
            fulfillment.validate(b"abd"),
            Err(ConditionError::InvalidSignature)
        ));
    }

    #[test]
    fn test_flipped_signature_bit_fails() {
        let mut fulfillment = Ed25519::new();
        fulfillment.sign(b"abc", &[7u8; 32]).unwrap();

        let mut sig = *fulfillment.signature().unwrap();
        sig[0] ^= 0x01;
        fulfillment.set_signature(&sig).unwrap();

        assert!(matches!(
            fulfillment.validate(b"abc"),
            Err(ConditionError::InvalidSignature)
        ));
    }

    #[test]
    fn test_bad_seed_length() {
        let mut fulfillment = Ed25519::new();
        assert!(matches!(
            fulfillment.sign(b"", &[0u8; 31]),
            Err(ConditionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_data() {
        let fulfillment = Fulfillment::from(Ed25519::new());
        assert!(matches!(
            fulfillment.condition(),
            Err(ConditionError::MissingData("public key"))
        ));
    }
}
