use crate::engine::{Key, Nonce, KEY_SIZE, NONCE_SIZE};
use crate::error::{KaosError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// On-disk size: the key immediately followed by the nonce.
pub const KEY_MATERIAL_SIZE: usize = KEY_SIZE + NONCE_SIZE;

/// Key and nonce as stored in a key file.
/// Layout: [key: 32][nonce: 12], no header, no version, no length prefix
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub key: Key,
    pub nonce: Nonce,
}

impl KeyMaterial {
    pub fn new(key: Key, nonce: Nonce) -> Self {
        Self { key, nonce }
    }

    /// The fixed key (32 x 0x42) and nonce (12 x 0x99) used for
    /// reproducible keystream dumps and statistical runs.
    pub fn test_vector() -> Self {
        Self {
            key: [0x42; KEY_SIZE],
            nonce: [0x99; NONCE_SIZE],
        }
    }

    /// Fresh key and nonce from the operating system CSPRNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut nonce);
        Self { key, nonce }
    }

    /// Same key with a newly drawn nonce
    pub fn with_fresh_nonce(&self) -> Self {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        Self {
            key: self.key,
            nonce,
        }
    }

    pub fn to_bytes(&self) -> [u8; KEY_MATERIAL_SIZE] {
        let mut out = [0u8; KEY_MATERIAL_SIZE];
        out[..KEY_SIZE].copy_from_slice(&self.key);
        out[KEY_SIZE..].copy_from_slice(&self.nonce);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != KEY_MATERIAL_SIZE {
            return Err(KaosError::MalformedKeyMaterial {
                expected: KEY_MATERIAL_SIZE,
                actual: data.len(),
            });
        }
        let mut key = [0u8; KEY_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        key.copy_from_slice(&data[..KEY_SIZE]);
        nonce.copy_from_slice(&data[KEY_SIZE..]);
        Ok(Self { key, nonce })
    }

    /// Short identifier for logs. Never reveals the key itself.
    pub fn fingerprint(&self) -> String {
        let digest = blake3::hash(&self.to_bytes());
        hex::encode(&digest.as_bytes()[..8])
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Read key material from disk
pub fn read_key_file(path: &Path) -> Result<KeyMaterial> {
    let data = std::fs::read(path)?;
    KeyMaterial::from_bytes(&data)
}

/// Write key material to disk (creates new file or overwrites)
pub fn write_key_file(path: &Path, material: &KeyMaterial) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&material.to_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_layout_is_key_then_nonce() {
        let material = KeyMaterial::new([0x11; 32], [0x22; 12]);
        let bytes = material.to_bytes();
        assert_eq!(bytes.len(), 44);
        assert!(bytes[..32].iter().all(|&b| b == 0x11));
        assert!(bytes[32..].iter().all(|&b| b == 0x22));
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        for len in [0usize, 32, 43, 45] {
            let err = KeyMaterial::from_bytes(&vec![0u8; len]).unwrap_err();
            match err {
                KaosError::MalformedKeyMaterial { expected, actual } => {
                    assert_eq!(expected, 44);
                    assert_eq!(actual, len);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.bin");
        let material = KeyMaterial::generate();

        write_key_file(&path, &material).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 44);
        assert_eq!(read_key_file(&path).unwrap(), material);
    }

    #[test]
    fn test_fresh_nonce_keeps_key() {
        let material = KeyMaterial::generate();
        let rotated = material.with_fresh_nonce();
        assert_eq!(rotated.key, material.key);
        assert_ne!(rotated.nonce, material.nonce);
    }

    #[test]
    fn test_fingerprint_is_stable_and_redacted() {
        let material = KeyMaterial::test_vector();
        let fp = material.fingerprint();
        assert_eq!(fp.len(), 16);
        assert_eq!(fp, material.fingerprint());
        assert!(!format!("{:?}", material).contains("66, 66"));
    }
}
