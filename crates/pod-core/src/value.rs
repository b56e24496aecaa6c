//! The POD value model: a tagged union of the eight value kinds.
//!
//! Values can be built directly through the enum variants (for example by a
//! decoder), so validity is a separate predicate: [`PodValue::check`]. The
//! typed constructors run the same check and refuse to build invalid values.

use std::fmt;

use num_bigint::BigInt;
use once_cell::sync::Lazy;
use time::{OffsetDateTime, UtcOffset};

use crate::crypto::{decode_fixed_bytes, PUBLIC_KEY_LEN};
use crate::error::{PodError, Result};
use crate::hash::fq_to_bigint;

pub use babyjubjub_ark::Fq;

/// Smallest legal `int` value.
pub const POD_INT_MIN: i64 = i64::MIN;

/// Largest legal `int` value.
pub const POD_INT_MAX: i64 = i64::MAX;

/// Earliest legal `date`, in milliseconds since the Unix epoch.
pub const POD_DATE_MIN_MS: i64 = -8_640_000_000_000_000;

/// Latest legal `date`, in milliseconds since the Unix epoch.
pub const POD_DATE_MAX_MS: i64 = 8_640_000_000_000_000;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Order of the BN254 scalar field, which is the base field of BabyJubjub.
static FIELD_MODULUS: Lazy<BigInt> = Lazy::new(|| {
    BigInt::parse_bytes(
        b"21888242871839275222246405745257275088548364400416034343698204186575808495617",
        10,
    )
    .expect("field modulus literal is valid decimal")
});

/// The field prime P. Every `cryptographic` value lies in `[0, P-1]`.
pub fn field_modulus() -> &'static BigInt {
    &FIELD_MODULUS
}

/// Smallest legal `cryptographic` value.
pub fn pod_cryptographic_min() -> BigInt {
    BigInt::from(0)
}

/// Largest legal `cryptographic` value (P - 1).
pub fn pod_cryptographic_max() -> BigInt {
    field_modulus() - 1
}

/// The kind of a [`PodValue`], named by its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodValueKind {
    Null,
    String,
    Bytes,
    Cryptographic,
    Int,
    Boolean,
    EdDsaPubkey,
    Date,
}

impl PodValueKind {
    /// All kinds, in wire-tag order.
    pub const ALL: [PodValueKind; 8] = [
        PodValueKind::Null,
        PodValueKind::String,
        PodValueKind::Bytes,
        PodValueKind::Cryptographic,
        PodValueKind::Int,
        PodValueKind::Boolean,
        PodValueKind::EdDsaPubkey,
        PodValueKind::Date,
    ];

    /// The tag used for this kind in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PodValueKind::Null => "null",
            PodValueKind::String => "string",
            PodValueKind::Bytes => "bytes",
            PodValueKind::Cryptographic => "cryptographic",
            PodValueKind::Int => "int",
            PodValueKind::Boolean => "boolean",
            PodValueKind::EdDsaPubkey => "eddsa_pubkey",
            PodValueKind::Date => "date",
        }
    }

    /// Look up a kind by its JSON tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for PodValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single POD value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodValue {
    Null,
    String(String),
    Bytes(Vec<u8>),
    /// Field element in `[0, P-1]`.
    Cryptographic(BigInt),
    /// Signed 64-bit integer. Held as a big integer so that out-of-range
    /// parse results can still be represented and rejected by `check()`.
    Int(BigInt),
    Boolean(bool),
    /// Compressed BabyJubjub point, 32 bytes. Not decompressed until hashed.
    EdDsaPubkey(Vec<u8>),
    /// Millisecond-precision UTC timestamp. `check()` rejects instants with
    /// sub-millisecond digits.
    Date(OffsetDateTime),
}

impl PodValue {
    /// Build an `int` value, failing if it is outside the signed 64-bit range.
    pub fn int(value: impl Into<BigInt>) -> Result<Self> {
        let value = PodValue::Int(value.into());
        value.check()?;
        Ok(value)
    }

    /// Build a `cryptographic` value, failing if it is outside `[0, P-1]`.
    pub fn cryptographic(value: impl Into<BigInt>) -> Result<Self> {
        let value = PodValue::Cryptographic(value.into());
        value.check()?;
        Ok(value)
    }

    /// Build a `date` value.
    ///
    /// The timestamp is normalized to UTC and truncated to millisecond
    /// precision.
    pub fn date(value: OffsetDateTime) -> Result<Self> {
        check_date_range(&value)?;
        let utc = value.to_offset(UtcOffset::UTC);
        let millis_nanos = (utc.nanosecond() / 1_000_000) * 1_000_000;
        let truncated = utc
            .replace_nanosecond(millis_nanos)
            .map_err(|e| PodError::ValueRange(format!("date: {e}")))?;
        Ok(PodValue::Date(truncated))
    }

    /// Build a `date` value from milliseconds since the Unix epoch.
    pub fn date_from_millis(millis: i64) -> Result<Self> {
        if !(POD_DATE_MIN_MS..=POD_DATE_MAX_MS).contains(&millis) {
            return Err(PodError::ValueRange(format!(
                "date {millis}ms is outside [{POD_DATE_MIN_MS}, {POD_DATE_MAX_MS}]"
            )));
        }
        let timestamp = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
            .map_err(|e| PodError::ValueRange(format!("date: {e}")))?;
        Ok(PodValue::Date(timestamp))
    }

    /// Build an `eddsa_pubkey` value from its text encoding (hex, or Base64
    /// with or without padding).
    pub fn eddsa_pubkey(encoded: &str) -> Result<Self> {
        let bytes = decode_fixed_bytes(encoded, PUBLIC_KEY_LEN)?;
        Ok(PodValue::EdDsaPubkey(bytes))
    }

    /// Build an `eddsa_pubkey` value from raw compressed-point bytes.
    pub fn eddsa_pubkey_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let value = PodValue::EdDsaPubkey(bytes.into());
        value.check()?;
        Ok(value)
    }

    /// The kind of this value.
    pub fn kind(&self) -> PodValueKind {
        match self {
            PodValue::Null => PodValueKind::Null,
            PodValue::String(_) => PodValueKind::String,
            PodValue::Bytes(_) => PodValueKind::Bytes,
            PodValue::Cryptographic(_) => PodValueKind::Cryptographic,
            PodValue::Int(_) => PodValueKind::Int,
            PodValue::Boolean(_) => PodValueKind::Boolean,
            PodValue::EdDsaPubkey(_) => PodValueKind::EdDsaPubkey,
            PodValue::Date(_) => PodValueKind::Date,
        }
    }

    /// Check that the payload is within the legal range for its kind.
    pub fn check(&self) -> Result<()> {
        match self {
            PodValue::Null | PodValue::String(_) | PodValue::Bytes(_) | PodValue::Boolean(_) => {
                Ok(())
            }
            PodValue::Cryptographic(value) => {
                if value.sign() == num_bigint::Sign::Minus || value >= field_modulus() {
                    return Err(PodError::ValueRange(format!(
                        "cryptographic value {value} is outside [0, P-1]"
                    )));
                }
                Ok(())
            }
            PodValue::Int(value) => {
                if i64::try_from(value).is_err() {
                    return Err(PodError::ValueRange(format!(
                        "int value {value} is outside [{POD_INT_MIN}, {POD_INT_MAX}]"
                    )));
                }
                Ok(())
            }
            PodValue::EdDsaPubkey(bytes) => {
                if bytes.len() != PUBLIC_KEY_LEN {
                    return Err(PodError::ValueRange(format!(
                        "eddsa_pubkey must be {PUBLIC_KEY_LEN} bytes, got {}",
                        bytes.len()
                    )));
                }
                Ok(())
            }
            PodValue::Date(value) => check_date(value),
        }
    }

    /// The `int` payload, if this is an in-range `int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PodValue::Int(value) => i64::try_from(value).ok(),
            _ => None,
        }
    }

    /// The `cryptographic` payload.
    pub fn as_cryptographic(&self) -> Option<&BigInt> {
        match self {
            PodValue::Cryptographic(value) => Some(value),
            _ => None,
        }
    }

    /// The `string` payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PodValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// The `boolean` payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PodValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// The `date` payload as milliseconds since the Unix epoch.
    pub fn as_date_millis(&self) -> Option<i64> {
        match self {
            PodValue::Date(value) => i64::try_from(date_millis(value)).ok(),
            _ => None,
        }
    }
}

/// Milliseconds since the Unix epoch, rounded toward negative infinity.
pub(crate) fn date_millis(value: &OffsetDateTime) -> i128 {
    value.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI)
}

fn check_date(value: &OffsetDateTime) -> Result<()> {
    check_date_range(value)?;
    if value.unix_timestamp_nanos().rem_euclid(NANOS_PER_MILLI) != 0 {
        return Err(PodError::ValueRange(format!(
            "date {value} has sub-millisecond precision"
        )));
    }
    Ok(())
}

fn check_date_range(value: &OffsetDateTime) -> Result<()> {
    let nanos = value.unix_timestamp_nanos();
    let min = i128::from(POD_DATE_MIN_MS) * NANOS_PER_MILLI;
    let max = i128::from(POD_DATE_MAX_MS) * NANOS_PER_MILLI;
    if !(min..=max).contains(&nanos) {
        return Err(PodError::ValueRange(format!(
            "date {value} is outside [{POD_DATE_MIN_MS}ms, {POD_DATE_MAX_MS}ms]"
        )));
    }
    Ok(())
}

impl From<&str> for PodValue {
    fn from(value: &str) -> Self {
        PodValue::String(value.to_string())
    }
}

impl From<String> for PodValue {
    fn from(value: String) -> Self {
        PodValue::String(value)
    }
}

impl From<i64> for PodValue {
    fn from(value: i64) -> Self {
        PodValue::Int(value.into())
    }
}

impl From<i32> for PodValue {
    fn from(value: i32) -> Self {
        PodValue::Int(value.into())
    }
}

impl From<u32> for PodValue {
    fn from(value: u32) -> Self {
        PodValue::Int(value.into())
    }
}

impl From<bool> for PodValue {
    fn from(value: bool) -> Self {
        PodValue::Boolean(value)
    }
}

impl From<()> for PodValue {
    fn from(_: ()) -> Self {
        PodValue::Null
    }
}

impl From<&[u8]> for PodValue {
    fn from(value: &[u8]) -> Self {
        PodValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for PodValue {
    fn from(value: Vec<u8>) -> Self {
        PodValue::Bytes(value)
    }
}

impl From<Fq> for PodValue {
    fn from(value: Fq) -> Self {
        PodValue::Cryptographic(fq_to_bigint(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in PodValueKind::ALL {
            assert_eq!(PodValueKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(PodValueKind::from_tag("bigint"), None);
        assert_eq!(PodValueKind::from_tag("type"), None);
    }

    #[test]
    fn test_cryptographic_bounds() {
        assert!(PodValue::cryptographic(pod_cryptographic_min()).is_ok());
        assert!(PodValue::cryptographic(pod_cryptographic_max()).is_ok());
        assert!(PodValue::cryptographic(123).is_ok());

        assert!(matches!(
            PodValue::cryptographic(field_modulus().clone()),
            Err(PodError::ValueRange(_))
        ));
        assert!(matches!(PodValue::cryptographic(-1), Err(PodError::ValueRange(_))));

        // Directly built values are caught by check().
        assert!(PodValue::Cryptographic(BigInt::from(-1)).check().is_err());
        assert!(PodValue::Cryptographic(field_modulus().clone()).check().is_err());
    }

    #[test]
    fn test_cryptographic_max_literal() {
        let expected = BigInt::parse_bytes(
            b"21888242871839275222246405745257275088548364400416034343698204186575808495616",
            10,
        )
        .unwrap();
        assert_eq!(pod_cryptographic_max(), expected);
    }

    #[test]
    fn test_int_bounds() {
        assert!(PodValue::int(POD_INT_MIN).is_ok());
        assert!(PodValue::int(POD_INT_MAX).is_ok());
        assert!(PodValue::int(0).is_ok());

        let below: BigInt = BigInt::from(POD_INT_MIN) - 1;
        let above: BigInt = BigInt::from(POD_INT_MAX) + 1;
        assert!(matches!(PodValue::int(below.clone()), Err(PodError::ValueRange(_))));
        assert!(matches!(PodValue::int(above.clone()), Err(PodError::ValueRange(_))));
        assert!(PodValue::Int(below).check().is_err());
        assert!(PodValue::Int(above).check().is_err());
    }

    #[test]
    fn test_date_bounds() {
        assert!(PodValue::date_from_millis(0).is_ok());
        assert!(PodValue::date_from_millis(POD_DATE_MIN_MS).is_ok());
        assert!(PodValue::date_from_millis(POD_DATE_MAX_MS).is_ok());
        assert!(PodValue::date_from_millis(POD_DATE_MIN_MS - 1).is_err());
        assert!(PodValue::date_from_millis(POD_DATE_MAX_MS + 1).is_err());

        let max = OffsetDateTime::from_unix_timestamp_nanos(
            i128::from(POD_DATE_MAX_MS) * NANOS_PER_MILLI,
        )
        .unwrap();
        let past_max = max + time::Duration::nanoseconds(1);
        assert!(matches!(PodValue::date(past_max), Err(PodError::ValueRange(_))));
        assert!(PodValue::Date(past_max).check().is_err());

        let min = OffsetDateTime::from_unix_timestamp_nanos(
            i128::from(POD_DATE_MIN_MS) * NANOS_PER_MILLI,
        )
        .unwrap();
        let before_min = min - time::Duration::nanoseconds(1);
        assert!(PodValue::date(before_min).is_err());
    }

    #[test]
    fn test_date_normalized_to_utc_millis() {
        let with_offset = datetime!(2025-06-30 23:44:58.123 -8);
        let with_nanos = datetime!(2025-06-30 23:44:58.123456789 -8);

        let a = PodValue::date(with_offset).unwrap();
        let b = PodValue::date(with_nanos).unwrap();

        // Same instant after truncation.
        assert_eq!(a, b);
        match b {
            PodValue::Date(t) => {
                assert_eq!(t.offset(), UtcOffset::UTC);
                assert_eq!(t.nanosecond(), 123_000_000);
                assert_eq!(t, with_offset);
            }
            other => panic!("expected date, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_date_with_sub_millis_fails_check() {
        let raw = PodValue::Date(datetime!(2025-06-30 23:44:58.123456789 UTC));
        assert!(matches!(raw.check(), Err(PodError::ValueRange(_))));
        assert!(PodValue::Date(datetime!(2025-06-30 23:44:58.123 UTC)).check().is_ok());
        assert!(PodValue::Date(datetime!(1969-12-31 23:59:59.9995 UTC)).check().is_err());
    }

    #[test]
    fn test_date_millis_floor_before_epoch() {
        let value = PodValue::date_from_millis(-1).unwrap();
        assert_eq!(value.as_date_millis(), Some(-1));
    }

    #[test]
    fn test_eddsa_pubkey_encodings() {
        let b64 = PodValue::eddsa_pubkey("xDP3ppa3qjpSJO+zmTuvDM2eku7O4MKaP2yCCKnoHZ4").unwrap();
        let hex =
            PodValue::eddsa_pubkey("c433f7a696b7aa3a5224efb3993baf0ccd9e92eecee0c29a3f6c8208a9e81d9e")
                .unwrap();
        assert_eq!(b64, hex);

        // Truncated Base64 and a bad hex digit.
        assert!(PodValue::eddsa_pubkey("xDP3ppa3qjpSJO+zmTuvDM2eku7O4MKaP2yCCKnoHZ").is_err());
        assert!(PodValue::eddsa_pubkey(
            "z433f7a696b7aa3a5224efb3993baf0ccd9e92eecee0c29a3f6c8208a9e81d9e"
        )
        .is_err());

        assert!(PodValue::eddsa_pubkey_bytes(vec![0u8; 31]).is_err());
        assert!(PodValue::EdDsaPubkey(vec![0u8; 33]).check().is_err());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(PodValue::from("test"), PodValue::String("test".to_string()));
        assert_eq!(PodValue::from(String::from("test")), PodValue::String("test".to_string()));
        assert_eq!(PodValue::from(42i64), PodValue::Int(BigInt::from(42)));
        assert_eq!(PodValue::from(42), PodValue::Int(BigInt::from(42)));
        assert_eq!(PodValue::from(true), PodValue::Boolean(true));
        assert_eq!(PodValue::from(()), PodValue::Null);
        assert_eq!(PodValue::from([1u8, 2, 3].as_slice()), PodValue::Bytes(vec![1, 2, 3]));
        assert_eq!(PodValue::from(Fq::from(1234u64)), PodValue::Cryptographic(BigInt::from(1234)));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(PodValue::from(-7).as_int(), Some(-7));
        assert_eq!(PodValue::from("foobar").as_str(), Some("foobar"));
        assert_eq!(PodValue::from(false).as_bool(), Some(false));
        assert_eq!(PodValue::Null.as_int(), None);
        assert_eq!(PodValue::from(true).kind(), PodValueKind::Boolean);
    }
}
