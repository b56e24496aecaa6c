//! Canonical JSON encoding for POD values.
//!
//! Emission always produces one canonical form per value:
//! - `null`, booleans and strings are bare JSON
//! - `int` is a bare number inside the JS safe-integer range, else tagged text
//! - every other kind is a single-key object `{"<kind>": payload}`
//!
//! Parsing is lenient and accepts the terse tagged form, the older
//! `{"type": .., "value": ..}` form and several payload spellings per kind.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::crypto::{decode_base64, decode_key_text, PUBLIC_KEY_LEN};
use crate::error::{PodError, Result};
use crate::value::{PodValue, PodValueKind};

/// Largest integer a JSON number can carry without loss in JavaScript.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Smallest integer a JSON number can carry without loss in JavaScript.
pub const MIN_SAFE_INTEGER: i64 = -MAX_SAFE_INTEGER;

/// Wire form of an integer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalNumber {
    /// Emitted as a bare JSON number.
    Number(i64),
    /// Emitted as a string: `0x` lowercase hex if non-negative, else decimal.
    Text(String),
}

/// Pick the canonical wire form of an integer.
pub fn canonical_numeric(value: &BigInt) -> CanonicalNumber {
    match i64::try_from(value) {
        Ok(n) if (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n) => CanonicalNumber::Number(n),
        _ if value.is_negative() => CanonicalNumber::Text(value.to_str_radix(10)),
        _ => CanonicalNumber::Text(format!("0x{}", value.to_str_radix(16))),
    }
}

impl From<CanonicalNumber> for Value {
    fn from(number: CanonicalNumber) -> Self {
        match number {
            CanonicalNumber::Number(n) => Value::from(n),
            CanonicalNumber::Text(s) => Value::String(s),
        }
    }
}

/// Parse an integer from decimal (optionally negative) or `0x` hex text.
pub fn parse_bigint_text(text: &str) -> Result<BigInt> {
    let invalid = || PodError::ValueFormat(format!("invalid integer string {text:?}"));
    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        return BigInt::parse_bytes(digits.as_bytes(), 16).ok_or_else(invalid);
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    BigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(invalid)
}

fn number_to_bigint(number: &Number) -> Result<BigInt> {
    if let Some(n) = number.as_i64() {
        return Ok(BigInt::from(n));
    }
    if let Some(n) = number.as_u64() {
        return Ok(BigInt::from(n));
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => BigInt::from_f64(f)
            .ok_or_else(|| PodError::ValueFormat(format!("invalid number {number}"))),
        _ => Err(PodError::ValueFormat(format!("{number} is not an integer"))),
    }
}

fn decode_integer_payload(kind: PodValueKind, payload: &Value) -> Result<BigInt> {
    match payload {
        Value::Number(n) => number_to_bigint(n),
        Value::String(s) => parse_bigint_text(s),
        other => Err(wrong_payload(kind, other)),
    }
}

/// Format a date as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Years outside 0..=9999 use the six-digit signed form, e.g. `+275760`.
pub fn format_date(value: &OffsetDateTime) -> String {
    let utc = value.to_offset(UtcOffset::UTC);
    let year = utc.year();
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", -year)
    } else {
        format!("+{year:06}")
    };
    format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond()
    )
}

/// Parse an RFC 3339 UTC timestamp. The `Z` suffix is required.
///
/// Expanded `±YYYYYY` years are accepted. Fractional seconds of any
/// precision parse; [`PodValue::date`] truncates them to milliseconds.
pub fn parse_date(text: &str) -> Result<OffsetDateTime> {
    if !text.ends_with('Z') {
        return Err(PodError::ValueFormat(format!(
            "date must be in UTC with a Z suffix: {text:?}"
        )));
    }
    let parsed = match text.as_bytes().first() {
        Some(b'+' | b'-') => OffsetDateTime::parse(text, &Iso8601::PARSING),
        _ => OffsetDateTime::parse(text, &Rfc3339),
    };
    parsed.map_err(|e| PodError::ValueFormat(format!("invalid date {text:?}: {e}")))
}

fn tagged(kind: PodValueKind, payload: Value) -> Value {
    let mut map = Map::new();
    map.insert(kind.as_str().to_string(), payload);
    Value::Object(map)
}

/// Encode a value in canonical JSON form.
pub fn encode_value(value: &PodValue) -> Value {
    match value {
        PodValue::Null => Value::Null,
        PodValue::Boolean(b) => Value::Bool(*b),
        PodValue::String(s) => Value::String(s.clone()),
        PodValue::Bytes(b) => tagged(PodValueKind::Bytes, Value::String(STANDARD.encode(b))),
        PodValue::EdDsaPubkey(b) => {
            tagged(PodValueKind::EdDsaPubkey, Value::String(STANDARD_NO_PAD.encode(b)))
        }
        PodValue::Date(t) => tagged(PodValueKind::Date, Value::String(format_date(t))),
        PodValue::Int(i) => match canonical_numeric(i) {
            CanonicalNumber::Number(n) => Value::from(n),
            text => tagged(PodValueKind::Int, text.into()),
        },
        PodValue::Cryptographic(c) => tagged(PodValueKind::Cryptographic, canonical_numeric(c).into()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_payload(kind: PodValueKind, payload: &Value) -> PodError {
    PodError::ValueFormat(format!(
        "invalid {kind} payload: got {}",
        json_type_name(payload)
    ))
}

fn decode_tagged(kind: PodValueKind, payload: &Value) -> Result<PodValue> {
    let value = match (kind, payload) {
        (PodValueKind::Null, Value::Null) => PodValue::Null,
        (PodValueKind::String, Value::String(s)) => PodValue::String(s.clone()),
        (PodValueKind::Boolean, Value::Bool(b)) => PodValue::Boolean(*b),
        (PodValueKind::Int, payload) => PodValue::Int(decode_integer_payload(kind, payload)?),
        (PodValueKind::Cryptographic, payload) => {
            PodValue::Cryptographic(decode_integer_payload(kind, payload)?)
        }
        (PodValueKind::Bytes, Value::String(s)) => PodValue::Bytes(decode_base64(s)?),
        (PodValueKind::EdDsaPubkey, Value::String(s)) => {
            let bytes = decode_key_text(s, PUBLIC_KEY_LEN)
                .map_err(|e| PodError::ValueFormat(format!("eddsa_pubkey: {e}")))?;
            PodValue::EdDsaPubkey(bytes)
        }
        (PodValueKind::Date, Value::String(s)) => PodValue::date(parse_date(s)?)?,
        (kind, payload) => return Err(wrong_payload(kind, payload)),
    };
    Ok(value)
}

fn decode_object(map: &Map<String, Value>) -> Result<PodValue> {
    if map.len() == 2 {
        if let (Some(Value::String(tag)), Some(payload)) = (map.get("type"), map.get("value")) {
            let kind = PodValueKind::from_tag(tag)
                .ok_or_else(|| PodError::ValueFormat(format!("unknown value type {tag:?}")))?;
            return decode_tagged(kind, payload);
        }
    }
    let mut fields = map.iter();
    match (fields.next(), fields.next()) {
        (Some((tag, payload)), None) => {
            let kind = PodValueKind::from_tag(tag)
                .ok_or_else(|| PodError::ValueFormat(format!("unknown value type {tag:?}")))?;
            decode_tagged(kind, payload)
        }
        _ => Err(PodError::ValueFormat(format!(
            "expected a single-key tagged object, got {} keys",
            map.len()
        ))),
    }
}

/// Decode any accepted JSON form of a value and check its range.
pub fn decode_value(json: &Value) -> Result<PodValue> {
    let value = match json {
        Value::Null => PodValue::Null,
        Value::Bool(b) => PodValue::Boolean(*b),
        Value::String(s) => PodValue::String(s.clone()),
        Value::Number(n) => PodValue::Int(number_to_bigint(n)?),
        Value::Object(map) => decode_object(map)?,
        Value::Array(_) => {
            return Err(PodError::ValueFormat("arrays are not POD values".to_string()))
        }
    };
    value.check()?;
    Ok(value)
}

impl Serialize for PodValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PodValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        decode_value(&json).map_err(serde::de::Error::custom)
    }
}

impl PodValue {
    /// Canonical JSON text of this value.
    pub fn to_json(&self) -> String {
        encode_value(self).to_string()
    }

    /// Parse any accepted JSON form of a value.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value =
            serde_json::from_str(json).map_err(|e| PodError::ValueFormat(e.to_string()))?;
        decode_value(&raw)
    }
}
