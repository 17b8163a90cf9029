//! Flat-file persistence for an ordered text mapping.
//!
//! [`DiskMap`] is a `BTreeMap<Vec<u8>, Vec<u8>>` with a durable form: one
//! record per line, the key and value separated by a single space, both
//! fields percent-encoded so they can carry any byte (see [`encode_field`]).
//! The whole file is read on load and rewritten on save; saving an empty
//! map deletes the file instead.
//!
//! Optional read/write filter callbacks can veto individual pairs; a veto
//! aborts the operation immediately with a distinct error, so callers can
//! tell "could not open" from "partially wrote" (see
//! [`StoreError`](crate::error::StoreError)).
//!
//! # Example
//!
//! ```no_run
//! use slirc_text::DiskMap;
//!
//! let mut registry = DiskMap::new();
//! registry.set("device::abc123", "1 iphone");
//! registry.save("devices.registry")?;
//!
//! let reloaded = DiskMap::load("devices.registry")?;
//! assert_eq!(reloaded.get(b"device::abc123".as_slice()).unwrap(), b"1 iphone");
//! # Ok::<(), slirc_text::StoreError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::split;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// An ordered text-to-text mapping with a flat-file serialized form.
///
/// Dereferences to the underlying `BTreeMap` for lookups and iteration;
/// iteration (and therefore the serialized record order) follows byte-wise
/// key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiskMap {
    pairs: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl DiskMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.pairs.insert(key.into(), value.into());
    }

    /// Reads a mapping from `path`.
    ///
    /// Every line is trimmed and split into two whitespace-delimited
    /// fields, which are percent-decoded into key and value. Later
    /// duplicate keys overwrite earlier ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::load_filtered(path, |_, _| true)
    }

    /// Like [`load`](Self::load), consulting `filter` for every decoded
    /// pair. A `false` return aborts immediately with
    /// [`StoreError::ReadFilter`]; pairs after the rejected one are never
    /// read.
    pub fn load_filtered(
        path: impl AsRef<Path>,
        mut filter: impl FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StoreError::Open {
            path: path.into(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let mut map = Self::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(error) => {
                    // a short read ends the load; everything read so
                    // far is kept
                    warn!(path = %path.display(), %error, "store read ended early");
                    break;
                }
            }

            let text = String::from_utf8_lossy(&line);
            let trimmed = text.trim();
            let key = decode_field(split::token(trimmed, 0, " ").as_bytes());
            let value = decode_field(split::token(trimmed, 1, " ").as_bytes());

            if !filter(&key, &value) {
                return Err(StoreError::ReadFilter { key });
            }

            map.pairs.insert(key, value);
        }

        debug!(path = %path.display(), pairs = map.len(), "loaded key/value store");
        Ok(map)
    }

    /// Writes the mapping to `path`, truncating any previous content.
    ///
    /// An empty mapping deletes the file instead; a missing file counts as
    /// success. Pairs with empty keys are skipped.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        self.save_filtered(path, |_, _| true)
    }

    /// Like [`save`](Self::save), consulting `filter` for every pair
    /// before it is written. A `false` return aborts immediately with
    /// [`StoreError::WriteFilter`], leaving the file partially written.
    pub fn save_filtered(
        &self,
        path: impl AsRef<Path>,
        mut filter: impl FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();

        if self.pairs.is_empty() {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(StoreError::Remove {
                        path: path.into(),
                        source,
                    })
                }
            }
            debug!(path = %path.display(), "removed empty key/value store");
            return Ok(());
        }

        let file = File::create(path).map_err(|source| StoreError::Open {
            path: path.into(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        for (key, value) in &self.pairs {
            if !filter(key, value) {
                return Err(StoreError::WriteFilter { key: key.clone() });
            }
            if key.is_empty() {
                continue;
            }

            let record = format!("{} {}\n", encode_field(key), encode_field(value));
            writer.write_all(record.as_bytes()).map_err(|source| {
                StoreError::Write {
                    path: path.into(),
                    source,
                }
            })?;
        }

        writer.flush().map_err(|source| StoreError::Write {
            path: path.into(),
            source,
        })?;

        debug!(path = %path.display(), pairs = self.len(), "saved key/value store");
        Ok(())
    }
}

impl Deref for DiskMap {
    type Target = BTreeMap<Vec<u8>, Vec<u8>>;

    fn deref(&self) -> &Self::Target {
        &self.pairs
    }
}

impl DerefMut for DiskMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pairs
    }
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for DiskMap {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
        DiskMap {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Encodes a record field: alphanumeric bytes pass through, every other
/// byte becomes `%XX;` with uppercase hex.
///
/// This is the store's own framing, not the URL encoding — the trailing
/// `;` lets the decoder accept hex runs of any length.
pub fn encode_field(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());

    for &byte in input {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(byte >> 4) as usize] as char);
            out.push(HEX_UPPER[(byte & 0x0F) as usize] as char);
            out.push(';');
        }
    }

    out
}

/// Decodes a record field: `%` starts a hex run terminated by `;`,
/// truncated to a byte; a `%` not followed by a hex run and `;` passes
/// through literally.
pub fn decode_field(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] != b'%' {
            out.push(input[i]);
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let mut value: u32 = 0;
        while j < input.len() && input[j].is_ascii_hexdigit() {
            value = value
                .wrapping_mul(16)
                .wrapping_add((input[j] as char).to_digit(16).unwrap_or(0));
            j += 1;
        }

        if j < input.len() && input[j] == b';' {
            out.push(value as u8);
            i = j + 1;
        } else {
            out.push(b'%');
            i += 1;
        }
    }

    out
}
