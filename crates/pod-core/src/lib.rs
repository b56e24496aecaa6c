//! # POD Core
//!
//! Provable Object Datatypes: small sets of named, typed values signed with
//! EdDSA-Poseidon over BabyJubjub so that they can be checked both natively
//! and inside zero-knowledge circuits.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the value model, its hash and its JSON encoding.
//!
//! ## Key Types
//!
//! - [`PodValue`] - One of eight value kinds, range-checked by `check()`
//! - [`PodEntries`] - Sorted mapping from entry name to value
//! - [`ContentId`] - Poseidon Merkle root of an entry set, the signed message
//! - [`Pod`] - Entries plus signature and signer public key
//! - [`Signer`] - A parsed private key that produces PODs
//!
//! ## Example
//!
//! ```
//! use pod_core::{pod_entries, Signer};
//!
//! let signer = Signer::from_seed(&[1u8; 32]);
//! let pod = signer.sign(pod_entries! { "score" => 42, "name" => "alice" })?;
//! assert!(pod.verify()?);
//! # Ok::<(), pod_core::PodError>(())
//! ```
//!
//! ## Canonicalization
//!
//! Values are emitted in a single canonical JSON form and parsed from several
//! legacy forms. See the [`canonical`] module.

pub mod macros;

pub mod canonical;
pub mod crypto;
pub mod entries;
pub mod error;
pub mod hash;
pub mod pcd;
pub mod pod;
pub mod types;
pub mod value;

pub use canonical::{canonical_numeric, decode_value, encode_value, CanonicalNumber};
pub use crypto::{sign, PodPublicKey, PodSignature, Signer, SignerConfig, WireEncoding};
pub use entries::{check_pod_name, PodEntries};
pub use error::{PodError, Result};
pub use hash::{content_id, lean_poseidon_imt, PodHasher};
pub use pcd::PodPcd;
pub use pod::{verify_pod, Pod};
pub use types::ContentId;
pub use value::{
    field_modulus, pod_cryptographic_max, pod_cryptographic_min, Fq, PodValue, PodValueKind,
    POD_DATE_MAX_MS, POD_DATE_MIN_MS, POD_INT_MAX, POD_INT_MIN,
};
