//! Golden vectors and end-to-end behaviour of signed PODs.
//!
//! Every implementation of POD must produce identical:
//! - content IDs
//! - signatures (deterministic EdDSA-Poseidon)
//! - canonical JSON

use num_bigint::BigInt;
use pod_core::{
    field_modulus, pod_cryptographic_max, sign, ContentId, Pod, PodEntries, PodError, PodValue,
    Signer, SignerConfig, WireEncoding, POD_DATE_MAX_MS, POD_DATE_MIN_MS, POD_INT_MAX, POD_INT_MIN,
};
use pod_testkit::generators::{pod_entries, pod_from_params, PodParams};
use pod_testkit::vectors::{
    all_vectors, entries_from_vector, generate_pod_from_vector, GOLDEN_PUBLIC_KEY, GOLDEN_SEED,
};
use pod_testkit::{init_tracing, TestFixture};
use proptest::prelude::*;
use serde_json::{json, Value};

fn simple_entries() -> PodEntries {
    pod_core::pod_entries! {
        "A" => 123,
        "B" => 321,
        "C" => false,
        "D" => "foobar",
        "G" => -7,
    }
}

fn pod_json(pod: &Pod) -> Value {
    serde_json::to_value(pod).unwrap()
}

fn pod_from_value(value: Value) -> Pod {
    serde_json::from_value(value).unwrap()
}

#[test]
fn golden_vectors_match() {
    init_tracing();
    for vector in all_vectors() {
        let pod = generate_pod_from_vector(&vector);
        assert_eq!(
            pod.content_id().unwrap().to_string(),
            vector.expected_content_id,
            "content ID for '{}'",
            vector.name
        );
        assert_eq!(pod.signature(), vector.expected_signature, "signature for '{}'", vector.name);
        assert_eq!(pod.signer_public_key(), GOLDEN_PUBLIC_KEY);
        assert!(pod.verify().unwrap(), "'{}' should verify", vector.name);
    }
}

#[test]
fn golden_vector_entries_emit_canonically() {
    let vectors = all_vectors();
    let ticket = entries_from_vector(&vectors[1]);
    let attendee = BigInt::parse_bytes(
        b"18711405342588116796533073928767088921854096266145046362753928030796553161041",
        10,
    )
    .unwrap();

    let json: Value = serde_json::from_str(&ticket.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        json!({
            "attendee": {"cryptographic": format!("0x{}", attendee.to_str_radix(16))},
            "eventID": {"cryptographic": 456},
            "ticketID": {"cryptographic": 999},
            "isConsumed": true,
            "issueDate": {"date": "2024-01-01T00:00:00.000Z"},
            "image": {"bytes": "AQID"},
            "vipStatus": null
        })
    );
}

#[test]
fn concrete_scenario() {
    let key = hex::encode(GOLDEN_SEED);
    let pod = sign(&key, simple_entries()).unwrap();
    assert!(pod.verify().unwrap());
    assert_eq!(pod.entries().to_json().unwrap(), r#"{"A":123,"B":321,"C":false,"D":"foobar","G":-7}"#);

    let reparsed = Pod::from_json(&pod.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, pod);
    assert!(reparsed.verify().unwrap());
}

#[test]
fn private_key_in_every_encoding() {
    use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
    use base64::Engine as _;

    let expected = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();
    for key in [
        hex::encode(GOLDEN_SEED),
        STANDARD.encode(GOLDEN_SEED),
        STANDARD_NO_PAD.encode(GOLDEN_SEED),
    ] {
        assert_eq!(sign(&key, simple_entries()).unwrap(), expected);
    }
    assert!(matches!(sign("AAEC", simple_entries()), Err(PodError::KeyFormat(_))));
}

#[test]
fn legacy_entry_forms_hash_identically() {
    let legacy = PodEntries::from_json(
        r#"{
            "A": {"type": "int", "value": 123},
            "B": {"int": "0x141"},
            "C": {"type": "boolean", "value": false},
            "D": {"string": "foobar"},
            "G": {"int": "-7"}
        }"#,
    )
    .unwrap();
    assert_eq!(legacy, simple_entries());
    assert_eq!(
        legacy.content_id().unwrap(),
        "18003549444852780886592139349318927700964545643704389119309344945101355208480"
            .parse::<ContentId>()
            .unwrap()
    );
    assert_eq!(legacy.to_json().unwrap(), r#"{"A":123,"B":321,"C":false,"D":"foobar","G":-7}"#);
}

#[test]
fn alternative_signature_encodings_verify() {
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();
    let signature = pod.signature_bytes().unwrap();
    let public_key = pod.signer_public_key_bytes().unwrap();

    for encoding in [WireEncoding::Base64, WireEncoding::Hex, WireEncoding::Base64NoPad] {
        let reencoded = Pod::from_parts(
            pod.entries().clone(),
            signature.encode(encoding),
            public_key.encode(encoding),
        );
        assert!(reencoded.verify().unwrap(), "{encoding:?}");
    }

    let hex_signer = Signer::from_seed(&GOLDEN_SEED).with_config(SignerConfig {
        encoding: WireEncoding::Hex,
    });
    let hex_pod = hex_signer.sign(simple_entries()).unwrap();
    assert_eq!(hex_pod.signature(), signature.to_hex());
    assert!(hex_pod.verify().unwrap());
}

#[test]
fn tamper_signature_bit() {
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();
    let mut bytes = *pod.signature_bytes().unwrap().as_bytes();
    bytes[32] ^= 0x01;

    let mut json = pod_json(&pod);
    json["signature"] = json!(WireEncoding::Base64NoPad.encode(&bytes));
    assert!(!pod_from_value(json).verify().unwrap());
}

#[test]
fn tamper_signature_from_other_entries() {
    let signer = Signer::from_seed(&GOLDEN_SEED);
    let pod = signer.sign(simple_entries()).unwrap();
    let other = signer.sign(pod_core::pod_entries! { "A" => 124 }).unwrap();

    let swapped = Pod::from_parts(
        pod.entries().clone(),
        other.signature(),
        pod.signer_public_key(),
    );
    assert!(!swapped.verify().unwrap());
}

#[test]
fn tamper_public_key() {
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();
    let stranger = TestFixture::with_seed([0x55; 32]);

    let mut json = pod_json(&pod);
    json["signerPublicKey"] = json!(stranger.signer.public_key_encoded());
    assert!(!pod_from_value(json).verify().unwrap());
}

#[test]
fn tamper_entry_value_and_name() {
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();

    let mut json = pod_json(&pod);
    json["entries"]["D"] = json!("foobaz");
    assert!(!pod_from_value(json).verify().unwrap());

    let mut json = pod_json(&pod);
    let value = json["entries"].as_object_mut().unwrap().remove("G").unwrap();
    json["entries"]["H"] = value;
    assert!(!pod_from_value(json).verify().unwrap());

    let mut json = pod_json(&pod);
    json["entries"]["C"] = json!(true);
    assert!(!pod_from_value(json).verify().unwrap());
}

#[test]
fn malformed_encodings_are_errors() {
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();

    let mut json = pod_json(&pod);
    json["signature"] = json!("too short");
    let broken = pod_from_value(json);
    assert!(matches!(broken.verify(), Err(PodError::KeyFormat(_))));
    assert!(broken.check().is_err());

    let mut json = pod_json(&pod);
    json["signerPublicKey"] = json!(hex::encode([0xffu8; 31]));
    assert!(matches!(pod_from_value(json).verify(), Err(PodError::KeyFormat(_))));
}

#[test]
fn undecompressable_points_are_errors() {
    // Compressed y = 2 is not on the curve.
    let mut off_curve = [0u8; 32];
    off_curve[0] = 2;
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap();

    let mut json = pod_json(&pod);
    json["signerPublicKey"] = json!(hex::encode(off_curve));
    assert!(matches!(pod_from_value(json).verify(), Err(PodError::Decode(_))));

    let mut signature = *pod.signature_bytes().unwrap().as_bytes();
    signature[..32].copy_from_slice(&off_curve);
    let mut json = pod_json(&pod);
    json["signature"] = json!(hex::encode(signature));
    assert!(matches!(pod_from_value(json).verify(), Err(PodError::Decode(_))));

    let mut entries = simple_entries();
    entries.insert("owner", PodValue::EdDsaPubkey(off_curve.to_vec()));
    assert!(matches!(entries.content_id(), Err(PodError::Decode(_))));
    assert!(matches!(
        Signer::from_seed(&GOLDEN_SEED).sign(entries),
        Err(PodError::Decode(_))
    ));
}

#[test]
fn invalid_name_scenario() {
    let mut entries = simple_entries();
    entries.insert("bad name", 1);

    assert!(matches!(entries.check(), Err(PodError::EntryName(_))));
    assert!(matches!(entries.content_id(), Err(PodError::EntryName(_))));
    assert!(Signer::from_seed(&GOLDEN_SEED).sign(entries).is_err());
    assert!(PodEntries::from_json(r#"{"bad name": 1}"#).is_err());

    let mut json = pod_json(&Signer::from_seed(&GOLDEN_SEED).sign(simple_entries()).unwrap());
    json["entries"]["bad name"] = json!(1);
    assert!(serde_json::from_value::<Pod>(json).is_err());
}

#[test]
fn empty_entries_cannot_be_signed() {
    assert_eq!(
        Signer::from_seed(&GOLDEN_SEED).sign(PodEntries::new()),
        Err(PodError::EmptyEntries)
    );
}

#[test]
fn boundary_values_sign_and_roundtrip() {
    let entries = pod_core::pod_entries! {
        "cryptMin" => PodValue::cryptographic(0).unwrap(),
        "cryptMax" => PodValue::cryptographic(pod_cryptographic_max()).unwrap(),
        "intMin" => POD_INT_MIN,
        "intMax" => POD_INT_MAX,
        "dateMin" => PodValue::date_from_millis(POD_DATE_MIN_MS).unwrap(),
        "dateMax" => PodValue::date_from_millis(POD_DATE_MAX_MS).unwrap(),
        "owner" => PodValue::eddsa_pubkey(GOLDEN_PUBLIC_KEY).unwrap(),
    };
    let pod = Signer::from_seed(&GOLDEN_SEED).sign(entries).unwrap();
    let reparsed = Pod::from_json(&pod.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, pod);
    assert!(reparsed.verify().unwrap());
}

#[test]
fn out_of_range_values_are_rejected_on_parse() {
    let p = field_modulus().to_str_radix(10);
    for bad in [
        json!({"cryptographic": p}),
        json!({"cryptographic": -1}),
        json!({"int": (BigInt::from(POD_INT_MAX) + 1i64).to_string()}),
        json!({"int": (BigInt::from(POD_INT_MIN) - 1i64).to_string()}),
        json!({"date": "+275760-09-13T00:00:00.001Z"}),
        json!({"eddsa_pubkey": "AQID"}),
    ] {
        let err = serde_json::from_value::<PodValue>(bad.clone()).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{bad}: {err}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn signed_pods_verify(params: PodParams) {
        let pod = pod_from_params(&params);
        prop_assert!(pod.verify().unwrap());
    }

    #[test]
    fn json_roundtrip_preserves_pod(params: PodParams) {
        let pod = pod_from_params(&params);
        let reparsed = Pod::from_json(&pod.to_json().unwrap()).unwrap();
        prop_assert_eq!(&reparsed, &pod);
        prop_assert!(reparsed.verify().unwrap());
    }

    #[test]
    fn content_id_ignores_insertion_order(entries in pod_entries(8)) {
        let reversed: PodEntries = entries
            .iter()
            .rev()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        prop_assert_eq!(entries.content_id().unwrap(), reversed.content_id().unwrap());
    }
}
