//! Key and certificate helpers.
//!
//! # Responsibilities
//! - Read PEM certificate chains and private keys (pem.rs)
//! - Locate certificate fixtures for tests (testing.rs, `test-utils` feature)

pub mod pem;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use pem::{read_certificates, read_der, read_private_key, CryptoError};
