//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use gaugebench_core::chain::ChainBuilder;
use gaugebench_core::claim::{input_claim_name, Claim, ClaimSet, MANIFEST, RESULTS};
use gaugebench_core::{Keypair, Receipt, ReceiptBuilder, ReceiptSigner, Sha256Hash};

/// A map that serializes its entries in exactly the given order.
///
/// Lets a test present the same logical map in several insertion orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap(pub Vec<(String, Value)>);

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Generate a random Sha256Hash.
pub fn sha256_hash() -> impl Strategy<Value = Sha256Hash> {
    any::<[u8; 32]>().prop_map(Sha256Hash::from_bytes)
}

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a map key.
pub fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,11}".prop_map(String::from)
}

/// Generate a JSON scalar. Floats span every finite `f64`.
pub fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::String),
    ]
}

/// Generate a JSON tree up to a few levels deep.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate a JSON object.
pub fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key(), json_value(), 0..8)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Generate a map with unique keys in two different insertion orders.
pub fn shuffled_map_pair() -> impl Strategy<Value = (OrderedMap, OrderedMap)> {
    prop::collection::btree_map(key(), json_value(), 0..10).prop_flat_map(|m| {
        let entries: Vec<_> = m.into_iter().collect();
        (Just(entries.clone()), Just(entries).prop_shuffle())
            .prop_map(|(a, b)| (OrderedMap(a), OrderedMap(b)))
    })
}

/// Generate artifact bytes.
pub fn artifact(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a wrapped-file relative path.
pub fn input_rel_path() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.(txt|csv|json)".prop_map(String::from)
}

/// Parameters for generating a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptParams {
    pub signer: Option<Keypair>,
    pub manifest: Vec<u8>,
    pub results: Vec<u8>,
    pub inputs: Vec<(String, Vec<u8>)>,
    pub timestamp: i64,
    pub run_metadata: Value,
}

impl Arbitrary for ReceiptParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            proptest::option::of(keypair()),
            artifact(256),
            artifact(256),
            prop::collection::btree_map(input_rel_path(), artifact(64), 0..4),
            0i64..=1_800_000_000_000i64,
            json_object(),
        )
            .prop_map(|(signer, manifest, results, inputs, timestamp, run_metadata)| {
                ReceiptParams {
                    signer,
                    manifest,
                    results,
                    inputs: inputs.into_iter().collect(),
                    timestamp,
                    run_metadata,
                }
            })
            .boxed()
    }
}

/// Build a single-checkpoint receipt from parameters.
///
/// Claims are `manifest`, `input:*` in order, then `results`; the checkpoint
/// runs from `manifest` plus inputs to `results`.
pub fn receipt_from_params(params: &ReceiptParams) -> Receipt {
    let mut claims = ClaimSet::new();
    let mut inputs = vec![MANIFEST.to_string()];
    claims
        .push(Claim::from_bytes(MANIFEST, &params.manifest))
        .expect("manifest claim");
    for (rel, bytes) in &params.inputs {
        let name = input_claim_name(rel);
        claims
            .push(Claim::from_bytes(name.clone(), bytes))
            .expect("input claim");
        inputs.push(name);
    }
    claims
        .push(Claim::from_bytes(RESULTS, &params.results))
        .expect("results claim");

    let chain = ChainBuilder::new(&claims)
        .step(inputs.as_slice(), &[RESULTS])
        .and_then(|b| b.finish())
        .expect("chain");

    ReceiptBuilder::new(claims, chain)
        .timestamp(params.timestamp)
        .run_metadata(params.run_metadata.clone())
        .build(params.signer.as_ref().map(|k| k as &dyn ReceiptSigner))
        .expect("receipt")
}
