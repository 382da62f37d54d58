//! # GaugeBench Testkit
//!
//! Testing utilities for GaugeBench.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known canonical encodings for cross-implementation checks
//! - **Generators**: Proptest strategies for structured values and receipts
//! - **Fixtures**: Temporary run directories with deterministic keys
//!
//! ## Golden Vectors
//!
//! ```rust
//! use gaugebench_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(verify_all_vectors().is_ok());
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.expected_digest);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use gaugebench_testkit::generators::{receipt_from_params, ReceiptParams};
//!
//! proptest! {
//!     #[test]
//!     fn receipt_id_is_deterministic(params: ReceiptParams) {
//!         let r1 = receipt_from_params(&params);
//!         let r2 = receipt_from_params(&params);
//!         prop_assert_eq!(r1.id, r2.id);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use gaugebench_testkit::fixtures::RunFixture;
//!
//! let fixture = RunFixture::new();
//! let run = fixture.produce_e2e();
//! assert!(run.join("receipt.json").is_file());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{RunFixture, FIXTURE_TIMESTAMP};
pub use generators::{receipt_from_params, OrderedMap, ReceiptParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
