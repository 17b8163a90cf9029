//! Error types for the text toolkit.
//!
//! Only the fallible surfaces have error types: persistence and the
//! cipher wrapper. The codecs and tokenizers are infallible by contract —
//! malformed input gets a documented fallback, never an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures from [`DiskMap`](crate::store::DiskMap) persistence.
///
/// The variants keep "could not open" apart from "could not write" and
/// from per-pair filter rejections, so callers can branch on them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backing file could not be opened or created.
    #[error("could not open {}: {source}", .path.display())]
    Open {
        /// The store path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A record could not be written; the file is partially written.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        /// The store path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An empty map's backing file exists but could not be deleted.
    #[error("could not remove {}: {source}", .path.display())]
    Remove {
        /// The store path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The read filter rejected a pair while loading.
    #[error("read filter rejected key `{}`", String::from_utf8_lossy(.key))]
    ReadFilter {
        /// The rejected key, as decoded from the file.
        key: Vec<u8>,
    },

    /// The write filter rejected a pair while saving.
    #[error("write filter rejected key `{}`", String::from_utf8_lossy(.key))]
    WriteFilter {
        /// The rejected key.
        key: Vec<u8>,
    },
}

/// Failures from the Blowfish-CBC wrapper.
#[cfg(feature = "crypt")]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CipherError {
    /// The key is outside the 4..=56 byte range Blowfish accepts.
    #[error("invalid key length {len}: expected 4 to 56 bytes")]
    KeyLength {
        /// Length of the rejected key.
        len: usize,
    },
}
