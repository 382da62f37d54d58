//! Canonicalization and digest properties.

use ciborium::value::Value as CborValue;
use gaugebench_core::canonical::canonical_value_bytes;
use gaugebench_core::{canonical_bytes, Sha256Hash};
use gaugebench_testkit::generators::{artifact, json_value, key, shuffled_map_pair, OrderedMap};
use proptest::prelude::*;
use serde_json::Value;

proptest! {
    #[test]
    fn map_insertion_order_does_not_matter((a, b) in shuffled_map_pair()) {
        prop_assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }

    #[test]
    fn changing_a_value_changes_bytes(
        (a, _) in shuffled_map_pair(),
        extra_key in key(),
    ) {
        let mut entries = a.0.clone();
        prop_assume!(!entries.iter().any(|(k, _)| k == &extra_key));
        entries.push((extra_key, Value::Null));
        prop_assert_ne!(
            canonical_bytes(&a).unwrap(),
            canonical_bytes(&OrderedMap(entries)).unwrap()
        );
    }

    #[test]
    fn sequence_order_matters(
        items in prop::collection::vec(json_value(), 2..6),
    ) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assume!(reversed != items);
        prop_assert_ne!(
            canonical_bytes(&items).unwrap(),
            canonical_bytes(&reversed).unwrap()
        );
    }

    #[test]
    fn canonicalization_is_idempotent(value in json_value()) {
        let bytes = canonical_bytes(&value).unwrap();
        let decoded: CborValue = ciborium::de::from_reader(bytes.as_slice()).unwrap();
        prop_assert_eq!(canonical_value_bytes(&decoded).unwrap(), bytes);
    }

    #[test]
    fn digest_is_deterministic(data in artifact(2048)) {
        prop_assert_eq!(Sha256Hash::hash(&data), Sha256Hash::hash(&data.clone()));
    }
}

#[test]
fn duplicate_keys_are_rejected() {
    let map = OrderedMap(vec![
        ("shots".into(), Value::from(1000)),
        ("shots".into(), Value::from(1024)),
    ]);
    assert!(canonical_bytes(&map).is_err());
}

#[test]
fn non_finite_floats_are_rejected() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(canonical_bytes(&vec![f]).is_err());
    }
}
