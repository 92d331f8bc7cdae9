//! Helpers for the textual `cc:` / `cf:` forms.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::errors::{ConditionError, Result};

/// Scheme prefix of condition URIs.
pub(crate) const CONDITION_SCHEME: &str = "cc";

/// Scheme prefix of fulfillment URIs.
pub(crate) const FULFILLMENT_SCHEME: &str = "cf";

/// Encodes bytes as unpadded base64url.
pub(crate) fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded base64url.
pub(crate) fn base64url_decode(s: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|_| ConditionError::Malformed("invalid base64url"))
}

/// Parses a lowercase hex segment of a URI.
pub(crate) fn parse_hex_u32(s: &str) -> Result<u32> {
    if s.is_empty() {
        return Err(ConditionError::Malformed("empty hex segment"));
    }
    u32::from_str_radix(s, 16).map_err(|_| ConditionError::Malformed("invalid hex segment"))
}
