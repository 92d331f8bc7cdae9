//! Serde serialization and deserialization for [`Condition`].
//!
//! Human-readable formats (JSON, TOML, …) use the `cc:` URI string; binary
//! formats use the canonical binary form as a byte sequence.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Condition;

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_uri())
        } else {
            let bytes = self.to_bytes().map_err(S::Error::custom)?;
            serializer.serialize_bytes(&bytes)
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let uri = String::deserialize(deserializer)?;
            Condition::parse_uri(&uri).map_err(D::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Condition::from_bytes(&bytes).map_err(D::Error::custom)
        }
    }
}
