//! # POD Testkit
//!
//! Testing utilities for POD Core.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known entries with expected content IDs and signatures
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use pod_testkit::vectors::{all_vectors, generate_pod_from_vector};
//!
//! for vector in all_vectors() {
//!     let pod = generate_pod_from_vector(&vector);
//!     assert_eq!(pod.signature(), vector.expected_signature);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pod_testkit::generators::{pod_from_params, PodParams};
//!
//! proptest! {
//!     #[test]
//!     fn signed_pods_verify(params: PodParams) {
//!         prop_assert!(pod_from_params(&params).verify().unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pod_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let pod = fixture.make_item(7);
//! assert!(pod.verify().unwrap());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, multi_party_fixtures, TestFixture};
pub use generators::{pod_from_params, PodParams};
pub use vectors::{all_vectors, generate_pod_from_vector, verify_all_vectors, GoldenVector};
