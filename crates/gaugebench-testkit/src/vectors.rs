//! Golden test vectors for canonical encoding.
//!
//! These vectors pin the canonical bytes so that any implementation, in any
//! language, can check it hashes receipts identically.

use gaugebench_core::{canonical_bytes, canonical_digest};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input as JSON text.
    pub json: &'static str,
    /// Expected canonical bytes (hex).
    pub expected_bytes: &'static str,
    /// Expected SHA-256 of the canonical bytes (hex).
    pub expected_digest: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty map",
            json: "{}",
            expected_bytes: "a0",
            expected_digest: "c19a797fa1fd590cd2e5b42d1cf5f246e29b91684e2f87404b81dc345c7a56a0",
        },
        GoldenVector {
            name: "keys sorted, array order kept",
            json: r#"{"b":1,"a":[true,null]}"#,
            expected_bytes: "a2616182f5f6616201",
            expected_digest: "9e7fa72bbf392bddc872b5b32fcfaf0057ca7418199301fccf3a2824d9afea2e",
        },
        GoldenVector {
            name: "e2e manifest",
            json: r#"{"shots":1000}"#,
            expected_bytes: "a16573686f74731903e8",
            expected_digest: "36a82693f2c78032b5a85907129b12baab9ec6cac4137d05b31a639d5dbf1196",
        },
        GoldenVector {
            name: "e2e results, binary64 float",
            json: r#"{"gate_error_rate":0.002}"#,
            expected_bytes: "a16f676174655f6572726f725f72617465fb3f60624dd2f1a9fc",
            expected_digest: "d38481460d7f0cb97b70029d0db159d10333df81aed0e41f35f256feac7758b6",
        },
        GoldenVector {
            name: "integer widths",
            json: "[-1,24,-25,256,-65537]",
            expected_bytes: "8520181838181901003a00010000",
            expected_digest: "698de88dbd2504dfa499a033c5238138f1ee25a7722facf7a029628715587c39",
        },
        GoldenVector {
            name: "byte order, nesting, non-ascii",
            json: r#"{"z":"é","aa":{"y":false},"a":1.5}"#,
            expected_bytes: "a36161fb3ff8000000000000626161a16179f4617a62c3a9",
            expected_digest: "9ca21d39654378effa607c5f70c2e0c90f470fb5ff24e454ae908850c2199dc2",
        },
        GoldenVector {
            name: "upper case keys sort first",
            json: r#"{"N":8,"K":4,"engine":"hierarchy"}"#,
            expected_bytes: "a3614b04614e0866656e67696e6569686965726172636879",
            expected_digest: "596c95e51fdc73d164aeb567b836f26cf719ba14d220119ba4cab7c7ce4ccd8b",
        },
    ]
}

/// Check every vector. Returns the names of the vectors that fail.
pub fn verify_all_vectors() -> Result<(), Vec<&'static str>> {
    let failures: Vec<_> = all_vectors()
        .into_iter()
        .filter(|v| !check_vector(v))
        .map(|v| v.name)
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

fn check_vector(vector: &GoldenVector) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(vector.json) else {
        return false;
    };
    let bytes_ok = canonical_bytes(&value)
        .map(|b| hex::encode(b) == vector.expected_bytes)
        .unwrap_or(false);
    let digest_ok = canonical_digest(&value)
        .map(|d| d.to_hex() == vector.expected_digest)
        .unwrap_or(false);
    bytes_ok && digest_ok
}
