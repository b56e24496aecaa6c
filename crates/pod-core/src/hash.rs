//! Value hashing and content-ID computation.
//!
//! Every value kind maps to a single BN254 field element. The content ID of
//! an entry set is the root of a lean incremental Merkle tree built with
//! two-input Poseidon over the sorted `[h(name), h(value)]` pairs.

use std::fmt;

use ark_ff::{BigInteger, PrimeField};
use num_bigint::{BigInt, BigUint, Sign};
use poseidon_ark::Poseidon;
use sha2::{Digest, Sha256};

use crate::crypto::decompress_public_key;
use crate::entries::{check_pod_name, PodEntries};
use crate::error::{PodError, Result};
use crate::types::ContentId;
use crate::value::{date_millis, field_modulus, Fq, PodValue};

/// Hash of the `null` value: 32 bytes of `0x1d`, reduced into the field.
pub const NULL_HASH_BYTES: [u8; 32] = [0x1d; 32];

/// Stateless hashing over a shared Poseidon parameter set.
pub struct PodHasher {
    poseidon: Poseidon,
}

impl PodHasher {
    pub fn new() -> Self {
        Self {
            poseidon: Poseidon::new(),
        }
    }

    /// Poseidon over 1 to 16 inputs.
    pub fn poseidon(&self, inputs: Vec<Fq>) -> Result<Fq> {
        self.poseidon.hash(inputs).map_err(PodError::Hash)
    }

    /// Hash a value. The value is range-checked first.
    pub fn value_hash(&self, value: &PodValue) -> Result<Fq> {
        value.check()?;
        match value {
            PodValue::Null => Ok(null_hash()),
            PodValue::String(s) => Ok(string_hash(s)),
            PodValue::Bytes(b) => Ok(bytes_hash(b)),
            PodValue::Boolean(b) => self.poseidon(vec![Fq::from(*b)]),
            PodValue::Int(i) => self.poseidon(vec![field_safe_int(i)]),
            PodValue::Cryptographic(c) => self.poseidon(vec![bigint_to_fq(c)]),
            PodValue::Date(t) => self.poseidon(vec![field_safe_int(&BigInt::from(date_millis(t)))]),
            PodValue::EdDsaPubkey(bytes) => {
                let point = decompress_public_key(bytes)?;
                self.poseidon(vec![point.x, point.y])
            }
        }
    }

    /// Root of the lean Poseidon IMT over `inputs`.
    ///
    /// At each level adjacent pairs are hashed. A trailing odd element moves
    /// up unchanged.
    pub fn lean_imt(&self, inputs: &[Fq]) -> Result<Fq> {
        if inputs.is_empty() {
            return Err(PodError::EmptyEntries);
        }
        let mut level = inputs.to_vec();
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                match *pair {
                    [left, right] => next.push(self.poseidon(vec![left, right])?),
                    [odd] => next.push(odd),
                    _ => {}
                }
            }
            level = next;
        }
        Ok(level[0])
    }

    /// Content ID of an entry set.
    ///
    /// Fails on an empty set, an illegal name, or an out-of-range value.
    pub fn content_id(&self, entries: &PodEntries) -> Result<ContentId> {
        if entries.is_empty() {
            return Err(PodError::EmptyEntries);
        }
        let mut hashes = Vec::with_capacity(entries.len() * 2);
        for (name, value) in entries {
            check_pod_name(name)?;
            hashes.push(name_hash(name));
            hashes.push(self.value_hash(value).map_err(|e| e.in_entry(name))?);
        }
        let root = self.lean_imt(&hashes)?;
        tracing::trace!(entries = entries.len(), "computed content ID");
        Ok(ContentId::from_field(root))
    }
}

impl Default for PodHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PodHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodHasher").finish_non_exhaustive()
    }
}

/// SHA-256 of the input, first 31 bytes read big-endian.
pub fn bytes_hash(bytes: &[u8]) -> Fq {
    let digest = Sha256::digest(bytes);
    Fq::from_be_bytes_mod_order(&digest[..31])
}

/// Hash of a string value, which is also the hash of an entry name.
pub fn string_hash(s: &str) -> Fq {
    bytes_hash(s.as_bytes())
}

/// Hash of an entry name.
pub fn name_hash(name: &str) -> Fq {
    string_hash(name)
}

pub fn null_hash() -> Fq {
    Fq::from_be_bytes_mod_order(&NULL_HASH_BYTES)
}

/// Reduce a signed integer into `[0, P)` with the Euclidean remainder.
pub fn field_safe_int(value: &BigInt) -> Fq {
    let reduced = ((value % field_modulus()) + field_modulus()) % field_modulus();
    bigint_to_fq(&reduced)
}

/// Convert a big integer to a field element, reducing mod P.
pub fn bigint_to_fq(value: &BigInt) -> Fq {
    let (sign, magnitude) = value.to_bytes_be();
    let fq = Fq::from_be_bytes_mod_order(&magnitude);
    if sign == Sign::Minus {
        -fq
    } else {
        fq
    }
}

/// Canonical integer representative of a field element.
pub fn fq_to_bigint(value: &Fq) -> BigInt {
    let bytes = value.into_bigint().to_bytes_be();
    BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(&bytes))
}

/// Root of the lean Poseidon IMT over `inputs`.
pub fn lean_poseidon_imt(inputs: &[Fq]) -> Result<Fq> {
    PodHasher::new().lean_imt(inputs)
}

/// Hash a single value.
pub fn value_hash(value: &PodValue) -> Result<Fq> {
    PodHasher::new().value_hash(value)
}

/// Content ID of an entry set.
pub fn content_id(entries: &PodEntries) -> Result<ContentId> {
    PodHasher::new().content_id(entries)
}
