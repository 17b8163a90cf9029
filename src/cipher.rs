//! Blowfish-CBC encryption for stored secrets.
//!
//! A thin wrapper over the Blowfish block primitive: this module owns the
//! CBC chaining, the IV handling and the padding policy. The IV is
//! truncated to the 8-byte block size and zero-padded when shorter. Input
//! is padded with NUL bytes up to the next block multiple before either
//! direction runs, and that padding is **not** removed on decrypt — a
//! plaintext ending in NUL bytes is indistinguishable from padding after a
//! round trip. Callers needing exact lengths track them out of band. The
//! lossy padding matches the long-deployed storage format and stays for
//! compatibility.
//!
//! # Example
//!
//! ```
//! use slirc_text::cipher::{decrypt, encrypt};
//!
//! let secret = encrypt(b"hunter2!", b"passphrase", b"12345678").unwrap();
//! let back = decrypt(&secret, b"passphrase", b"12345678").unwrap();
//! assert_eq!(back, b"hunter2!");
//! ```

use blowfish::Blowfish;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::error::CipherError;

/// Blowfish block and IV size in bytes.
pub const BLOCK_SIZE: usize = 8;

/// Encrypts `data` under `key` with the given IV.
///
/// The result length is `data.len()` rounded up to the next multiple of
/// [`BLOCK_SIZE`] (NUL padding). Keys must be 4 through 56 bytes.
pub fn encrypt(data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let bf = new_cipher(key)?;
    let mut buf = pad(data);
    let mut prev = normalize_iv(iv);

    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        for (byte, chained) in block.iter_mut().zip(prev.iter()) {
            *byte ^= chained;
        }
        bf.encrypt_block(GenericArray::from_mut_slice(block));
        prev.copy_from_slice(block);
    }

    Ok(buf)
}

/// Decrypts `data` under `key` with the given IV.
///
/// Ciphertext that is not a block multiple is NUL-padded first, mirroring
/// [`encrypt`]; the NUL padding applied on encryption is left in place.
pub fn decrypt(data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let bf = new_cipher(key)?;
    let mut buf = pad(data);
    let mut prev = normalize_iv(iv);

    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        let mut saved = [0u8; BLOCK_SIZE];
        saved.copy_from_slice(block);
        bf.decrypt_block(GenericArray::from_mut_slice(block));
        for (byte, chained) in block.iter_mut().zip(prev.iter()) {
            *byte ^= chained;
        }
        prev = saved;
    }

    Ok(buf)
}

fn new_cipher(key: &[u8]) -> Result<Blowfish, CipherError> {
    Blowfish::new_from_slice(key).map_err(|_| CipherError::KeyLength { len: key.len() })
}

fn normalize_iv(iv: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut out = [0u8; BLOCK_SIZE];
    let take = iv.len().min(BLOCK_SIZE);
    out[..take].copy_from_slice(&iv[..take]);
    out
}

fn pad(data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + BLOCK_SIZE - rem, 0);
    }
    buf
}
