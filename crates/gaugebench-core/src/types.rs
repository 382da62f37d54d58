//! Strong type definitions for GaugeBench receipts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};

/// Text prefix of a receipt identifier.
pub const CAR_PREFIX: &str = "car:";

/// A content-addressable receipt identifier: SHA-256 of the canonical body.
///
/// Two receipt bodies with the same logical content have the same `CarId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(pub Sha256Hash);

impl CarId {
    /// Create from the body digest.
    pub const fn from_digest(digest: Sha256Hash) -> Self {
        Self(digest)
    }

    /// The underlying digest.
    pub const fn digest(&self) -> &Sha256Hash {
        &self.0
    }

    /// Convert to hex string (without the `car:` prefix).
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarId({}...)", &self.to_hex()[..16])
    }
}

/// Text form: `car:<64 lowercase hex>`.
impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CAR_PREFIX, self.to_hex())
    }
}

impl FromStr for CarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let hex_part = s
            .strip_prefix(CAR_PREFIX)
            .ok_or_else(|| CoreError::InvalidReceiptId(format!("missing '{CAR_PREFIX}' prefix")))?;
        if hex_part.len() != 64 || hex_part.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CoreError::InvalidReceiptId(
                "expected 64 lowercase hex characters".into(),
            ));
        }
        let digest =
            Sha256Hash::from_hex(hex_part).map_err(|e| CoreError::InvalidReceiptId(e.to_string()))?;
        Ok(Self(digest))
    }
}

impl Serialize for CarId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CarId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_id_text_roundtrip() {
        let id = CarId::from_digest(Sha256Hash::from_bytes([0x42; 32]));
        let text = id.to_string();
        assert_eq!(text, format!("car:{}", "42".repeat(32)));
        assert_eq!(text.parse::<CarId>().unwrap(), id);
    }

    #[test]
    fn test_car_id_rejects_bad_text() {
        assert!("42".repeat(32).parse::<CarId>().is_err());
        assert!("car:1234".parse::<CarId>().is_err());
        assert!(format!("car:{}", "AB".repeat(32)).parse::<CarId>().is_err());
        assert!(format!("car:{}", "zz".repeat(32)).parse::<CarId>().is_err());
    }

    #[test]
    fn test_car_id_debug() {
        let id = CarId::from_digest(Sha256Hash::from_bytes([0xcd; 32]));
        assert!(format!("{:?}", id).starts_with("CarId("));
    }
}
