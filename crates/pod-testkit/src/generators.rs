//! Proptest generators for property-based testing.

use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;

use pod_core::{
    field_modulus, PodEntries, PodPublicKey, PodValue, Signer, POD_DATE_MAX_MS, POD_DATE_MIN_MS,
};

/// Generate a signer from a random seed.
pub fn signer() -> impl Strategy<Value = Signer> {
    any::<[u8; 32]>().prop_map(|seed| Signer::from_seed(&seed))
}

/// Generate a public key that decompresses to a curve point.
pub fn public_key() -> impl Strategy<Value = PodPublicKey> {
    signer().prop_map(|s| s.public_key())
}

/// Generate a legal entry name.
pub fn pod_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a name that fails the entry-name rule.
pub fn illegal_pod_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[0-9][A-Za-z0-9_]{0,8}",
        "[A-Za-z_]{1,4}[ !@#$%^&*.-][A-Za-z0-9_]{0,4}",
    ]
}

/// Generate a field element in `[0, P-1]`.
pub fn field_element() -> impl Strategy<Value = BigInt> {
    any::<[u8; 32]>().prop_map(|bytes| {
        let raw = BigInt::from(BigUint::from_bytes_be(&bytes));
        raw % field_modulus()
    })
}

/// Generate a date in the legal range, in epoch milliseconds.
pub fn date_millis() -> impl Strategy<Value = i64> {
    POD_DATE_MIN_MS..=POD_DATE_MAX_MS
}

/// Generate a valid value of any kind.
pub fn pod_value() -> impl Strategy<Value = PodValue> {
    prop_oneof![
        Just(PodValue::Null),
        "\\PC{0,24}".prop_map(PodValue::String),
        prop::collection::vec(any::<u8>(), 0..=48).prop_map(PodValue::Bytes),
        field_element().prop_map(PodValue::Cryptographic),
        any::<i64>().prop_map(PodValue::from),
        any::<bool>().prop_map(PodValue::Boolean),
        public_key().prop_map(|k| PodValue::EdDsaPubkey(k.as_bytes().to_vec())),
        date_millis().prop_filter_map("date in range", |ms| PodValue::date_from_millis(ms).ok()),
    ]
}

/// Generate a non-empty set of valid entries.
pub fn pod_entries(max_len: usize) -> impl Strategy<Value = PodEntries> {
    prop::collection::btree_map(pod_name(), pod_value(), 1..=max_len.max(1))
        .prop_map(PodEntries::from)
}

/// Parameters for signing a POD.
#[derive(Debug, Clone)]
pub struct PodParams {
    pub signer: Signer,
    pub entries: PodEntries,
}

impl Arbitrary for PodParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<[u8; 32]>(), pod_entries(8))
            .prop_map(|(seed, entries)| PodParams {
                signer: Signer::from_seed(&seed),
                entries,
            })
            .boxed()
    }
}

/// Sign the entries described by `params`.
pub fn pod_from_params(params: &PodParams) -> pod_core::Pod {
    params
        .signer
        .sign(params.entries.clone())
        .expect("generated entries are valid")
}
