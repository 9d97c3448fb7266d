use crate::engine::{keystream, CipherParams};
use crate::error::Result;
use crate::keyfile::{read_key_file, KeyMaterial};
use crate::stats::{bit_balance, chi_square};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Bytes examined by the quick verification after a dump.
pub const VERIFY_SAMPLE_SIZE: usize = 10_000;

/// Chi-square band (df = 255) reported as GOOD.
pub const CHI_SQUARE_GOOD_BAND: (f64, f64) = (200.0, 300.0);

/// Options for the keystream command
#[derive(Debug, Clone, Default)]
pub struct KeystreamOptions {
    pub size: usize,
    /// Key file to draw from; the fixed test vector when absent
    pub key_file: Option<PathBuf>,
}

/// Quick sanity figures for a keystream sample
#[derive(Debug, Clone, PartialEq)]
pub struct KeystreamCheck {
    pub sample_len: usize,
    pub bit_balance: f64,
    pub chi_square: f64,
}

impl KeystreamCheck {
    pub fn uniform(&self) -> bool {
        self.chi_square > CHI_SQUARE_GOOD_BAND.0 && self.chi_square < CHI_SQUARE_GOOD_BAND.1
    }
}

/// Bit balance and chi-square over the first [`VERIFY_SAMPLE_SIZE`] bytes
pub fn verify_keystream(data: &[u8]) -> KeystreamCheck {
    let sample = &data[..data.len().min(VERIFY_SAMPLE_SIZE)];
    KeystreamCheck {
        sample_len: sample.len(),
        bit_balance: bit_balance(sample),
        chi_square: chi_square(sample),
    }
}

/// Write `options.size` raw keystream bytes to `output_path`
/// Returns a printable report
pub fn dump_keystream(output_path: &Path, options: &KeystreamOptions) -> Result<String> {
    let material = match &options.key_file {
        Some(path) => read_key_file(path)?,
        None => KeyMaterial::test_vector(),
    };
    let params = CipherParams::init();

    let start = Instant::now();
    let stream = keystream(&params, &material.key, &material.nonce, options.size)?;
    let elapsed = start.elapsed().as_secs_f64();
    std::fs::write(output_path, &stream)?;
    info!(
        bytes = stream.len(),
        output = %output_path.display(),
        fingerprint = %material.fingerprint(),
        "keystream written"
    );

    let check = verify_keystream(&stream);
    let megabytes = stream.len() as f64 / (1024.0 * 1024.0);

    let mut output = String::new();
    output.push_str("KAOS Keystream Dump\n");
    output.push_str("===================\n\n");
    output.push_str(&format!("Key fingerprint: {}\n", material.fingerprint()));
    output.push_str(&format!("Warmup: {} iterations\n", params.warmup()));
    output.push_str(&format!(
        "Size: {} bytes ({:.2} MB)\n",
        stream.len(),
        megabytes
    ));
    if elapsed > 0.0 {
        output.push_str(&format!(
            "Time: {:.3} s ({:.2} MB/s)\n",
            elapsed,
            megabytes / elapsed
        ));
    }
    output.push_str(&format!(
        "\nQuick verification (first {} bytes):\n",
        check.sample_len
    ));
    output.push_str(&format!(
        "  Bit balance: {:.6} (ideal: 0.500000)\n",
        check.bit_balance
    ));
    output.push_str(&format!(
        "  Chi-squared: {:.2} (ideal: ~255)\n",
        check.chi_square
    ));
    output.push_str(&format!(
        "  Uniform distribution: {}\n",
        if check.uniform() { "GOOD" } else { "CHECK" }
    ));
    output.push_str(&format!("\nWritten to {}\n", output_path.display()));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KaosError;
    use tempfile::tempdir;

    #[test]
    fn test_dump_default_vector() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ks.bin");
        let options = KeystreamOptions {
            size: 20_000,
            key_file: None,
        };
        let report = dump_keystream(&out, &options).unwrap();
        let data = std::fs::read(&out).unwrap();
        assert_eq!(data.len(), 20_000);
        assert_eq!(data[0], 200);
        assert!(report.contains("first 10000 bytes"));
    }

    #[test]
    fn test_zero_size_rejected() {
        let dir = tempdir().unwrap();
        let options = KeystreamOptions::default();
        let err = dump_keystream(&dir.path().join("ks.bin"), &options).unwrap_err();
        assert!(matches!(err, KaosError::InvalidLength));
    }

    #[test]
    fn test_verify_flags_constant_stream() {
        let check = verify_keystream(&[0u8; 4096]);
        assert_eq!(check.bit_balance, 0.0);
        assert!(!check.uniform());
    }
}
