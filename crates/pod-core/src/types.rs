//! Strong type definitions for POD identifiers.

use std::fmt;
use std::str::FromStr;

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigInt;

use crate::error::PodError;
use crate::hash::{bigint_to_fq, fq_to_bigint};
use crate::value::{field_modulus, Fq};

/// The content ID of a POD: the field element a signature commits to.
///
/// Two entry sets with equal content hash to the same ContentId regardless
/// of insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(Fq);

impl ContentId {
    /// Wrap a field element.
    pub const fn from_field(value: Fq) -> Self {
        Self(value)
    }

    /// The underlying field element.
    pub const fn as_field(&self) -> &Fq {
        &self.0
    }

    /// Big-endian 32-byte form.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.0.into_bigint().to_bytes_be();
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// Convert to a 64-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, PodError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| PodError::ValueFormat(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(PodError::ValueFormat(format!(
                "content ID must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_bigint(&BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes))
    }

    /// The integer value in `[0, P-1]`.
    pub fn to_bigint(&self) -> BigInt {
        fq_to_bigint(&self.0)
    }

    /// Build from an integer, which must be a field element.
    pub fn from_bigint(value: &BigInt) -> Result<Self, PodError> {
        if value.sign() == num_bigint::Sign::Minus || value >= field_modulus() {
            return Err(PodError::ValueRange(format!("content ID {value} is not a field element")));
        }
        Ok(Self(bigint_to_fq(value)))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bigint())
    }
}

impl FromStr for ContentId {
    type Err = PodError;

    /// Parse the decimal form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PodError::ValueFormat(format!("invalid content ID {s:?}")));
        }
        let value = BigInt::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| PodError::ValueFormat(format!("invalid content ID {s:?}")))?;
        Self::from_bigint(&value)
    }
}

impl From<Fq> for ContentId {
    fn from(value: Fq) -> Self {
        Self(value)
    }
}

impl From<ContentId> for Fq {
    fn from(id: ContentId) -> Self {
        id.0
    }
}
