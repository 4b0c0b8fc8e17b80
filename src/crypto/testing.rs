//! Certificate fixtures for tests.
//!
//! Fixed fixtures are checked into `testdata/fixed` and never change; they
//! back tests that compare against known bytes. Generated fixtures live in
//! `testdata/generated` and may be recreated at any time.

use std::path::{Path, PathBuf};

use super::pem::CryptoError;

/// Algorithm of every fixture key.
pub const KEY_ALGORITHM: &str = "EC";

fn testdata_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

pub fn fixed_testdata_dir() -> PathBuf {
    testdata_dir().join("fixed")
}

pub fn generated_testdata_dir() -> PathBuf {
    testdata_dir().join("generated")
}

/// Resolve a fixed fixture, failing if it is missing.
pub fn load_fixed_resource_file(filename: &str) -> Result<PathBuf, CryptoError> {
    let path = fixed_testdata_dir().join(filename);
    if path.is_file() {
        Ok(path)
    } else {
        Err(CryptoError::NotFound(path))
    }
}

/// Resolve a generated fixture. The file is not required to exist yet.
pub fn load_resource_file(filename: &str) -> PathBuf {
    generated_testdata_dir().join(filename)
}

/// Checked-in fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedFixture {
    ServerCertPem,
    ServerKey,
    ServerCertDer,
    ServerKeyDer,
    CaCertPem,
    EncryptionPrivateKeyDer,
    EncryptionPublicKeyDer,
}

impl FixedFixture {
    pub const ALL: [FixedFixture; 7] = [
        FixedFixture::ServerCertPem,
        FixedFixture::ServerKey,
        FixedFixture::ServerCertDer,
        FixedFixture::ServerKeyDer,
        FixedFixture::CaCertPem,
        FixedFixture::EncryptionPrivateKeyDer,
        FixedFixture::EncryptionPublicKeyDer,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            FixedFixture::ServerCertPem => "server.pem",
            FixedFixture::ServerKey => "server.key",
            FixedFixture::ServerCertDer => "server-cert.der",
            FixedFixture::ServerKeyDer => "server-key.der",
            FixedFixture::CaCertPem => "ca.pem",
            FixedFixture::EncryptionPrivateKeyDer => "ec-private.der",
            FixedFixture::EncryptionPublicKeyDer => "ec-public.der",
        }
    }

    pub fn path(self) -> Result<PathBuf, CryptoError> {
        load_fixed_resource_file(self.file_name())
    }
}

/// Regenerable fixtures: two independent self-signed roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedFixture {
    Org1ServerCertPem,
    Org1ServerKey,
    Org2ServerCertPem,
    Org2ServerKey,
}

impl GeneratedFixture {
    pub fn file_name(self) -> &'static str {
        match self {
            GeneratedFixture::Org1ServerCertPem => "test_root.pem",
            GeneratedFixture::Org1ServerKey => "test_root.key",
            GeneratedFixture::Org2ServerCertPem => "test_root_2.pem",
            GeneratedFixture::Org2ServerKey => "test_root_2.key",
        }
    }

    pub fn path(self) -> PathBuf {
        load_resource_file(self.file_name())
    }
}
