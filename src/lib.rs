//! KAOS - stream cipher driven by a discretized Lorenz attractor
//!
//! A 256-bit key and 96-bit nonce seed the initial point of a Lorenz
//! trajectory. After a fixed warmup, every step of the trajectory yields one
//! keystream byte which is XORed into the data.
//!
//! ## Engine
//!
//! ```text
//! (key, nonce) → mix → warmup (5000 steps) → [step → keystream_byte → XOR] per byte
//! ```
//!
//! - **mix**: three 64-bit lanes absorb key and nonce, cross-mix, normalize to `[0,1)³`
//! - **step**: forward-Euler Lorenz step, sigma=10, rho=28, beta=8/3, dt=0.01
//! - **keystream_byte**: project the state onto φ, e, π, quantize, fold in the position
//! - **encrypt / decrypt**: the same XOR operation
//!
//! ## Caveats
//!
//! - No security claim: the keystream's quality is measured, not proven.
//! - No authentication: tampered ciphertext decrypts without error.
//! - **Never reuse a nonce under the same key.** Two ciphertexts sharing a
//!   keystream reveal the XOR of their plaintexts. Nothing here tracks nonces.
//! - Output is defined by IEEE-754 double arithmetic in the order written;
//!   ciphertext equality with other implementations is not guaranteed.
//!
//! ## Example
//!
//! ```
//! use kaos::engine::{decrypt, encrypt, CipherParams};
//!
//! let params = CipherParams::init();
//! let key = [0x42u8; 32];
//! let nonce = [0x99u8; 12];
//!
//! let ciphertext = encrypt(&params, &key, &nonce, b"attack at dawn").unwrap();
//! let plaintext = decrypt(&params, &key, &nonce, &ciphertext).unwrap();
//! assert_eq!(plaintext, b"attack at dawn");
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod keyfile;
pub mod stats;
pub mod trace;

pub use engine::{
    decrypt, encrypt, keystream_byte, mix, step, ChaoticState, CipherParams, Key, Nonce,
};
pub use error::{KaosError, Result};
pub use keyfile::{read_key_file, write_key_file, KeyMaterial};
