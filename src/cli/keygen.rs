use crate::error::Result;
use crate::keyfile::{write_key_file, KeyMaterial};
use std::path::Path;
use tracing::info;

/// Generate fresh key material and write it to `path`
pub fn generate_key_file(path: &Path) -> Result<KeyMaterial> {
    let material = KeyMaterial::generate();
    write_key_file(path, &material)?;
    info!(path = %path.display(), fingerprint = %material.fingerprint(), "wrote key file");
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyfile::read_key_file;
    use tempfile::tempdir;

    #[test]
    fn test_generate_key_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("k.bin");
        let material = generate_key_file(&path).unwrap();
        assert_eq!(read_key_file(&path).unwrap(), material);
    }

    #[test]
    fn test_two_keys_differ() {
        let dir = tempdir().unwrap();
        let a = generate_key_file(&dir.path().join("a.bin")).unwrap();
        let b = generate_key_file(&dir.path().join("b.bin")).unwrap();
        assert_ne!(a.key, b.key);
    }
}
