//! RSA-PSS signature fulfillment (type 3).
//!
//! The condition commits to the public modulus alone; the public exponent
//! is fixed at 65537 and keys with any other exponent are rejected.
//! Signatures use RSA-PSS with SHA-256, MGF1-SHA-256 and a 32-byte salt.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pss::Pss;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use ccond_codec::{
    read_var_octet_string, write_length_determinant, write_var_octet_string, BufDecoder, Decoder,
    Encoder, Predictor,
};

use crate::errors::{ConditionError, Result};
use crate::type_ids::{FEATURE_RSA_PSS, FEATURE_SHA_256};

/// Smallest accepted modulus size (1024-bit keys).
const MIN_MODULUS_LEN: usize = 128;
/// Largest accepted modulus size (4096-bit keys).
const MAX_MODULUS_LEN: usize = 512;
/// The only accepted public exponent.
const PUBLIC_EXPONENT: u64 = 65_537;
/// PSS salt length in bytes.
const PSS_SALT_LEN: usize = 32;

fn pss() -> Pss {
    Pss::new_with_salt::<Sha256>(PSS_SALT_LEN)
}

/// RSA-PSS signature fulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RsaSha256 {
    modulus: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
}

impl RsaSha256 {
    /// Constructs a new, empty instance to be populated by
    /// [`Self::set_public_modulus`] and [`Self::set_signature`] or by
    /// [`Self::sign`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the public modulus, if set.
    pub fn modulus(&self) -> Option<&[u8]> {
        self.modulus.as_deref()
    }

    /// Gets the signature, if set.
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Sets the public modulus as minimal big-endian bytes.
    ///
    /// The length must fall in `128..=512` and the leading byte must be
    /// nonzero.  (Trailing zero bytes are a property of the key, not of the
    /// encoding, and are accepted.)
    pub fn set_public_modulus(&mut self, modulus: Vec<u8>) -> Result<()> {
        if modulus.len() < MIN_MODULUS_LEN || modulus.len() > MAX_MODULUS_LEN {
            return Err(ConditionError::InvalidArgument(format!(
                "modulus must be {MIN_MODULUS_LEN}..={MAX_MODULUS_LEN} bytes, got {}",
                modulus.len()
            )));
        }

        if modulus[0] == 0 {
            return Err(ConditionError::InvalidArgument(
                "modulus must not have a leading zero byte".into(),
            ));
        }

        self.modulus = Some(modulus);
        Ok(())
    }

    /// Sets the signature bytes.
    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.signature = Some(signature);
    }

    /// Signs a message with a PKCS#1 PEM private key, populating the
    /// modulus (if unset) and the signature.
    ///
    /// The salt is drawn from the thread RNG, so signatures are not
    /// deterministic; verification is.
    pub fn sign(&mut self, message: &[u8], private_key_pem: &str) -> Result<()> {
        let key = RsaPrivateKey::from_pkcs1_pem(private_key_pem).map_err(|e| {
            ConditionError::InvalidArgument(format!("invalid rsa private key: {e}"))
        })?;

        if key.e() != &BigUint::from(PUBLIC_EXPONENT) {
            return Err(ConditionError::InvalidArgument(
                "rsa public exponent must be 65537".into(),
            ));
        }

        let modulus = key.n().to_bytes_be();
        match &self.modulus {
            None => self.set_public_modulus(modulus)?,
            Some(current) if *current != modulus => {
                return Err(ConditionError::InvalidArgument(
                    "private key does not match the set modulus".into(),
                ));
            }
            Some(_) => {}
        }

        let digest = Sha256::digest(message);
        let signature = key
            .sign_with_rng(&mut rand::thread_rng(), pss(), &digest)
            .map_err(|e| ConditionError::InvalidArgument(format!("rsa signing failed: {e}")))?;

        self.signature = Some(signature);
        Ok(())
    }

    fn modulus_bytes(&self) -> Result<&[u8]> {
        self.modulus
            .as_deref()
            .ok_or(ConditionError::MissingData("modulus"))
    }

    fn signature_bytes(&self) -> Result<&[u8]> {
        self.signature
            .as_deref()
            .ok_or(ConditionError::MissingData("signature"))
    }

    pub(crate) fn features(&self) -> u32 {
        FEATURE_SHA_256 | FEATURE_RSA_PSS
    }

    pub(crate) fn write_hash_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        Ok(write_var_octet_string(enc, self.modulus_bytes()?)?)
    }

    pub(crate) fn write_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        write_var_octet_string(enc, self.modulus_bytes()?)?;
        Ok(write_var_octet_string(enc, self.signature_bytes()?)?)
    }

    pub(crate) fn parse_payload(payload: &[u8]) -> Result<Self> {
        let mut dec = BufDecoder::new(payload);
        let modulus = read_var_octet_string(&mut dec)?;
        let signature = read_var_octet_string(&mut dec)?;
        if dec.remaining() > 0 {
            return Err(ccond_codec::CodecError::ExtraInput.into());
        }

        if signature.len() != modulus.len() {
            return Err(ConditionError::Malformed(
                "rsa signature length must equal modulus length",
            ));
        }

        let mut fulfillment = Self::new();
        fulfillment.set_public_modulus(modulus)?;
        fulfillment.set_signature(signature);
        Ok(fulfillment)
    }

    /// Predicts the modulus and a signature of equal length, each with its
    /// own length prefix.
    pub(crate) fn max_fulfillment_length(&self) -> Result<usize> {
        let modulus = self.modulus_bytes()?;

        let mut predictor = Predictor::new();
        write_var_octet_string(&mut predictor, modulus)?;
        write_length_determinant(&mut predictor, modulus.len())?;
        predictor.skip(modulus.len());
        Ok(predictor.size())
    }

    pub(crate) fn validate(&self, message: &[u8]) -> Result<()> {
        let modulus = BigUint::from_bytes_be(self.modulus_bytes()?);
        let key = RsaPublicKey::new(modulus, BigUint::from(PUBLIC_EXPONENT))
            .map_err(|e| ConditionError::InvalidArgument(format!("invalid rsa key: {e}")))?;

        let digest = Sha256::digest(message);
        key.verify(pss(), &digest, self.signature_bytes()?)
            .map_err(|_| ConditionError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fulfillment;

    fn test_modulus() -> Vec<u8> {
        // 1024-bit pattern with a nonzero leading byte.
        (0..MIN_MODULUS_LEN).map(|i| (i as u8).wrapping_mul(3) | 1).collect()
    }

    #[test]
    fn test_modulus_bounds() {
        let mut fulfillment = RsaSha256::new();
        assert!(matches!(
            fulfillment.set_public_modulus(vec![1; 127]),
            Err(ConditionError::InvalidArgument(_))
        ));
        assert!(matches!(
            fulfillment.set_public_modulus(vec![1; 513]),
            Err(ConditionError::InvalidArgument(_))
        ));
        assert!(fulfillment.set_public_modulus(vec![1; 512]).is_ok());
    }

    #[test]
    fn test_leading_zero_modulus_rejected() {
        let mut modulus = test_modulus();
        modulus[0] = 0;

        let mut fulfillment = RsaSha256::new();
        assert!(matches!(
            fulfillment.set_public_modulus(modulus),
            Err(ConditionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_trailing_zero_modulus_accepted() {
        let mut modulus = test_modulus();
        let last = modulus.len() - 1;
        modulus[last] = 0;

        let mut fulfillment = RsaSha256::new();
        assert!(fulfillment.set_public_modulus(modulus).is_ok());
    }

    #[test]
    fn test_max_fulfillment_length() {
        let mut fulfillment = RsaSha256::new();
        fulfillment.set_public_modulus(test_modulus()).unwrap();

        // 128-byte modulus and signature each carry a two-byte length
        // prefix (0x81 0x80).
        assert_eq!(fulfillment.max_fulfillment_length().unwrap(), 260);
    }

    #[test]
    fn test_payload_roundtrip() {
        let mut rsa = RsaSha256::new();
        rsa.set_public_modulus(test_modulus()).unwrap();
        rsa.set_signature(vec![0x5a; MIN_MODULUS_LEN]);
        let fulfillment = Fulfillment::from(rsa);

        let uri = fulfillment.serialize_uri().unwrap();
        let parsed = Fulfillment::parse_uri(&uri).unwrap();
        assert_eq!(parsed, fulfillment);
        assert_eq!(parsed.serialize_uri().unwrap(), uri);
    }

    #[test]
    fn test_mismatched_signature_length_rejected() {
        let mut rsa = RsaSha256::new();
        rsa.set_public_modulus(test_modulus()).unwrap();
        rsa.set_signature(vec![0x5a; MIN_MODULUS_LEN + 1]);
        let fulfillment = Fulfillment::from(rsa);

        let uri = fulfillment.serialize_uri().unwrap();
        assert!(matches!(
            Fulfillment::parse_uri(&uri),
            Err(ConditionError::Malformed(_))
        ));
    }

    #[test]
    fn test_garbage_signature_fails_validation() {
        let mut rsa = RsaSha256::new();
        rsa.set_public_modulus(test_modulus()).unwrap();
        rsa.set_signature(vec![0; MIN_MODULUS_LEN]);

        assert!(matches!(
            rsa.validate(b"hello"),
            Err(ConditionError::InvalidSignature)
        ));
    }

    #[test]
    fn test_missing_modulus() {
        let fulfillment = Fulfillment::from(RsaSha256::new());
        assert!(matches!(
            fulfillment.condition(),
            Err(ConditionError::MissingData("modulus"))
        ));
    }

    #[test]
    fn test_condition_shape() {
        let mut rsa = RsaSha256::new();
        rsa.set_public_modulus(test_modulus()).unwrap();
        let condition = Fulfillment::from(rsa).condition().unwrap();

        assert_eq!(condition.features(), 0x11);
        assert_eq!(condition.hash().len(), 32);
        assert_eq!(condition.max_fulfillment_length(), 260);
    }
}
