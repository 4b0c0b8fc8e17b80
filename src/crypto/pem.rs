//! PEM and DER file loading.

use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates in {}", .0.display())]
    NoCertificates(PathBuf),

    #[error("no private key in {}", .0.display())]
    NoPrivateKey(PathBuf),
}

fn open(path: &Path) -> Result<BufReader<File>, CryptoError> {
    if !path.exists() {
        return Err(CryptoError::NotFound(path.to_path_buf()));
    }
    File::open(path).map(BufReader::new).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every certificate in a PEM file, in file order.
pub fn read_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, CryptoError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| CryptoError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    if certs.is_empty() {
        return Err(CryptoError::NoCertificates(path.to_path_buf()));
    }
    Ok(certs)
}

/// Read the first private key (PKCS#8, SEC1 or PKCS#1) in a PEM file.
pub fn read_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, CryptoError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| CryptoError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| CryptoError::NoPrivateKey(path.to_path_buf()))
}

/// Read a binary DER file.
pub fn read_der(path: &Path) -> Result<Vec<u8>, CryptoError> {
    if !path.exists() {
        return Err(CryptoError::NotFound(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|source| CryptoError::Io {
        path: path.to_path_buf(),
        source,
    })
}
