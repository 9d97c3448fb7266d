//! Encrypt/decrypt driver.
//!
//! Every operation re-derives the trajectory from `(key, nonce)`: mix, run
//! the warmup, then take one step per byte and XOR the extracted keystream
//! byte into the data. Decryption is the same operation.
//!
//! # Nonce reuse
//!
//! Encrypting two messages under the same key and nonce produces the same
//! keystream, so XOR-ing the two ciphertexts yields the XOR of the two
//! plaintexts. Nothing here tracks which nonces have been used; callers must
//! never repeat a nonce under one key. There is also no authentication tag:
//! modified ciphertext decrypts to modified plaintext without any error.

use super::extract::keystream_byte;
use super::mixer::mix;
use super::params::CipherParams;
use super::state::{ChaoticState, Key, Nonce};
use super::stepper::{advance, step};
use crate::error::{KaosError, Result};
use tracing::debug;

/// Raw keystream for one `(key, nonce)`, starting right after the warmup.
pub struct Keystream {
    params: CipherParams,
    state: ChaoticState,
    counter: u64,
}

impl Keystream {
    pub fn new(params: &CipherParams, key: &Key, nonce: &Nonce) -> Self {
        let seeded = mix(key, nonce);
        let state = advance(params, seeded, params.warmup());
        debug!(warmup = params.warmup(), "keystream warmup complete");
        Self {
            params: *params,
            state,
            counter: 0,
        }
    }

    /// State after the most recently produced byte (or after warmup).
    pub fn state(&self) -> ChaoticState {
        self.state
    }

    /// Number of keystream bytes produced so far.
    pub fn position(&self) -> u64 {
        self.counter
    }

    /// XOR the next `data.len()` keystream bytes into `data`.
    pub fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }

    fn next_byte(&mut self) -> u8 {
        self.state = step(&self.params, self.state);
        let k = keystream_byte(self.state, self.counter);
        self.counter += 1;
        k
    }
}

impl Iterator for Keystream {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}

/// Encrypt `plaintext`. The output has the same length as the input.
///
/// Fails with [`KaosError::InvalidLength`] on empty input and
/// [`KaosError::AllocationFailure`] when the output buffer cannot be
/// reserved. See the module docs on nonce reuse.
pub fn encrypt(
    params: &CipherParams,
    key: &Key,
    nonce: &Nonce,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let mut output = allocate(plaintext.len())?;
    output.extend_from_slice(plaintext);
    Keystream::new(params, key, nonce).apply(&mut output);
    Ok(output)
}

/// Decrypt `ciphertext`. Identical to [`encrypt`].
pub fn decrypt(
    params: &CipherParams,
    key: &Key,
    nonce: &Nonce,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    encrypt(params, key, nonce, ciphertext)
}

/// Encrypt or decrypt `buf` in place.
pub fn apply_keystream(
    params: &CipherParams,
    key: &Key,
    nonce: &Nonce,
    buf: &mut [u8],
) -> Result<()> {
    if buf.is_empty() {
        return Err(KaosError::InvalidLength);
    }
    Keystream::new(params, key, nonce).apply(buf);
    Ok(())
}

/// Collect the first `len` keystream bytes.
pub fn keystream(
    params: &CipherParams,
    key: &Key,
    nonce: &Nonce,
    len: usize,
) -> Result<Vec<u8>> {
    let mut output = allocate(len)?;
    output.extend(Keystream::new(params, key, nonce).take(len));
    Ok(output)
}

fn allocate(len: usize) -> Result<Vec<u8>> {
    if len == 0 {
        return Err(KaosError::InvalidLength);
    }
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| KaosError::AllocationFailure(len))?;
    Ok(buffer)
}
