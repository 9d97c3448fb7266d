use crate::engine::{decrypt, encrypt, CipherParams};
use crate::error::{KaosError, Result};
use crate::keyfile::{read_key_file, write_key_file};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for the encrypt command
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    pub key_file: PathBuf,
    /// Encrypt under a fresh nonce and save the new key material here.
    /// `key_file` is never modified; the path must not exist yet.
    pub key_out: Option<PathBuf>,
}

/// Encrypt a file with the key material in `options.key_file`
/// Returns the number of bytes written
///
/// Nothing is written unless encryption succeeds. With `key_out` set, the
/// ciphertext is written first and the new key material last.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    options: &EncryptOptions,
) -> Result<usize> {
    let stored = read_key_file(&options.key_file)?;
    let material = match &options.key_out {
        Some(key_out) => {
            if key_out.exists() {
                return Err(KaosError::KeyFileExists(key_out.clone()));
            }
            stored.with_fresh_nonce()
        }
        None => {
            warn!(
                key_file = %options.key_file.display(),
                "reusing stored nonce; two files encrypted under one key file leak their XOR"
            );
            stored
        }
    };

    let plaintext = std::fs::read(input_path)?;
    let params = CipherParams::init();
    let ciphertext = encrypt(&params, &material.key, &material.nonce, &plaintext)?;
    std::fs::write(output_path, &ciphertext)?;

    if let Some(key_out) = &options.key_out {
        write_key_file(key_out, &material)?;
        info!(key_out = %key_out.display(), "wrote key material with fresh nonce");
    }

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        bytes = ciphertext.len(),
        fingerprint = %material.fingerprint(),
        "encrypted"
    );
    Ok(ciphertext.len())
}

/// Decrypt a file with the key material in `key_file`
/// Returns the number of bytes written
pub fn decrypt_file(input_path: &Path, output_path: &Path, key_file: &Path) -> Result<usize> {
    let material = read_key_file(key_file)?;
    let ciphertext = std::fs::read(input_path)?;
    let params = CipherParams::init();
    let plaintext = decrypt(&params, &material.key, &material.nonce, &ciphertext)?;
    std::fs::write(output_path, &plaintext)?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        bytes = plaintext.len(),
        fingerprint = %material.fingerprint(),
        "decrypted"
    );
    Ok(plaintext.len())
}
