//! EdDSA-Poseidon signing over BabyJubjub.
//!
//! Keys and signatures travel as text. Decoding is lenient: a string of
//! exactly twice the expected byte length is read as hex, anything else as
//! Base64 with or without padding. Encoding is governed by [`WireEncoding`].

use std::fmt;

use babyjubjub_ark::{decompress_point, decompress_signature, verify, Point, PrivateKey, Signature};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, STANDARD_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use rand::RngCore;

use crate::entries::PodEntries;
use crate::error::{PodError, Result};
use crate::pod::Pod;
use crate::types::ContentId;

/// Length of a private key seed.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of a compressed BabyJubjub point.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of a compressed EdDSA signature.
pub const SIGNATURE_LEN: usize = 64;

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode Base64 with or without padding.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    LENIENT_BASE64
        .decode(encoded)
        .map_err(|e| PodError::ValueFormat(format!("invalid base64: {e}")))
}

/// Decode key-shaped text: hex when it is exactly twice `expected_len`
/// characters long, Base64 otherwise. The decoded length is not checked.
pub(crate) fn decode_key_text(
    encoded: &str,
    expected_len: usize,
) -> std::result::Result<Vec<u8>, String> {
    if encoded.len() == expected_len * 2 {
        hex::decode(encoded).map_err(|e| format!("invalid hex: {e}"))
    } else {
        LENIENT_BASE64
            .decode(encoded)
            .map_err(|e| format!("invalid base64: {e}"))
    }
}

/// Decode a fixed-length byte string from hex or Base64.
pub fn decode_fixed_bytes(encoded: &str, expected_len: usize) -> Result<Vec<u8>> {
    let bytes = decode_key_text(encoded, expected_len).map_err(PodError::KeyFormat)?;
    if bytes.len() != expected_len {
        return Err(PodError::KeyFormat(format!(
            "expected {expected_len} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn decode_array<const N: usize>(encoded: &str) -> Result<[u8; N]> {
    let bytes = decode_fixed_bytes(encoded, N)?;
    bytes
        .try_into()
        .map_err(|_| PodError::KeyFormat(format!("expected {N} bytes")))
}

/// Text encoding used when emitting keys and signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireEncoding {
    /// Standard Base64 without padding.
    #[default]
    Base64NoPad,
    /// Standard Base64 with padding.
    Base64,
    /// Lowercase hex.
    Hex,
}

impl WireEncoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            WireEncoding::Base64NoPad => STANDARD_NO_PAD.encode(bytes),
            WireEncoding::Base64 => STANDARD.encode(bytes),
            WireEncoding::Hex => hex::encode(bytes),
        }
    }
}

/// Signer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignerConfig {
    /// Encoding of the signature and public key on produced PODs.
    pub encoding: WireEncoding,
}

/// A 32-byte compressed BabyJubjub public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PodPublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PodPublicKey {
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from any accepted text encoding.
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_array(encoded).map(Self)
    }

    pub fn encode(&self, encoding: WireEncoding) -> String {
        encoding.encode(&self.0)
    }

    /// Decompress to a curve point.
    pub fn to_point(&self) -> Result<Point> {
        decompress_point(self.0).map_err(PodError::Decode)
    }
}

impl fmt::Debug for PodPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodPublicKey({})", &self.to_hex()[..16])
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for PodPublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte compressed EdDSA-Poseidon signature (R8 point then S).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PodSignature(pub [u8; SIGNATURE_LEN]);

impl PodSignature {
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from any accepted text encoding.
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_array(encoded).map(Self)
    }

    pub fn encode(&self, encoding: WireEncoding) -> String {
        encoding.encode(&self.0)
    }

    /// Check the signature against a public key and content ID.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match,
    /// and `Err(Decode)` when either the key or R8 is not a curve point.
    pub fn verify(&self, public_key: &PodPublicKey, content_id: &ContentId) -> Result<bool> {
        let point = public_key.to_point()?;
        let signature = self.decompress()?;
        Ok(verify_signature(point, signature, content_id))
    }

    /// Decompress to the R8 point and scalar S.
    pub fn decompress(&self) -> Result<Signature> {
        decompress_signature(&self.0).map_err(PodError::Decode)
    }
}

impl fmt::Debug for PodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodSignature({}...)", &self.to_hex()[..16])
    }
}

impl From<[u8; SIGNATURE_LEN]> for PodSignature {
    fn from(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }
}

/// EdDSA-Poseidon verification of a decompressed signature.
pub fn verify_signature(public_key: Point, signature: Signature, content_id: &ContentId) -> bool {
    verify(public_key, signature, *content_id.as_field())
}

/// Decompress an `eddsa_pubkey` value's bytes to a curve point.
pub(crate) fn decompress_public_key(bytes: &[u8]) -> Result<Point> {
    let array: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
        PodError::ValueRange(format!(
            "eddsa_pubkey must be {PUBLIC_KEY_LEN} bytes, got {}",
            bytes.len()
        ))
    })?;
    PodPublicKey(array).to_point()
}

/// A BabyJubjub private key with its derived public key.
///
/// Parse the key once and reuse the signer for any number of PODs.
#[derive(Clone)]
pub struct Signer {
    seed: [u8; PRIVATE_KEY_LEN],
    public_key: PodPublicKey,
    config: SignerConfig,
}

impl Signer {
    /// Parse a private key from hex or Base64.
    pub fn new(encoded_private_key: &str) -> Result<Self> {
        let seed = decode_array(encoded_private_key)?;
        Ok(Self::from_seed(&seed))
    }

    /// Build from raw private key bytes, which must be 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let seed: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|_| {
            PodError::KeyFormat(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// Build from a 32-byte seed.
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LEN]) -> Self {
        let public_key = PodPublicKey(PrivateKey { key: *seed }.public().compress());
        Self {
            seed: *seed,
            public_key,
            config: SignerConfig::default(),
        }
    }

    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut seed = [0u8; PRIVATE_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    pub fn with_config(mut self, config: SignerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn public_key(&self) -> PodPublicKey {
        self.public_key
    }

    /// The public key in the configured wire encoding.
    pub fn public_key_encoded(&self) -> String {
        self.public_key.encode(self.config.encoding)
    }

    /// Raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.seed
    }

    /// Sign a content ID.
    pub fn sign_content_id(&self, content_id: &ContentId) -> Result<PodSignature> {
        let signature = PrivateKey { key: self.seed }
            .sign(*content_id.as_field())
            .map_err(PodError::Signing)?;
        Ok(PodSignature(signature.compress()))
    }

    /// Check the entries, compute their content ID and sign it.
    pub fn sign(&self, entries: PodEntries) -> Result<Pod> {
        let content_id = entries.content_id()?;
        let signature = self.sign_content_id(&content_id)?;
        tracing::debug!(entries = entries.len(), %content_id, "signed POD");
        Ok(Pod::from_parts(
            entries,
            signature.encode(self.config.encoding),
            self.public_key_encoded(),
        ))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signer({:?})", self.public_key)
    }
}

/// Sign `entries` with a hex or Base64 private key.
pub fn sign(private_key: &str, entries: PodEntries) -> Result<Pod> {
    Signer::new(private_key)?.sign(entries)
}
