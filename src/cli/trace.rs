use crate::error::Result;
use crate::keyfile::{read_key_file, KeyMaterial};
use crate::trace::{capture, write_trajectory, TRACE_WARMUP_DEFAULT};
use std::path::{Path, PathBuf};

/// Options for the trace command
#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub text: String,
    /// Random key material when absent
    pub key_file: Option<PathBuf>,
    pub warmup: u32,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            text: "Hello KAOS".into(),
            key_file: None,
            warmup: TRACE_WARMUP_DEFAULT,
        }
    }
}

/// Export the attractor trajectory for `options.text` as JSON
pub fn export_trace(output_path: &Path, options: &TraceOptions) -> Result<String> {
    let material = match &options.key_file {
        Some(path) => read_key_file(path)?,
        None => KeyMaterial::generate(),
    };
    let trajectory = capture(
        &material.key,
        &material.nonce,
        options.text.as_bytes(),
        options.warmup,
    )?;
    write_trajectory(output_path, &trajectory)?;

    let keystream = trajectory.keystream();
    let mut output = String::new();
    output.push_str(&format!(
        "Captured {} points ({} warmup, {} encryption)\n",
        trajectory.points.len(),
        trajectory.warmup_points(),
        keystream.len()
    ));
    if keystream.len() < trajectory.message_len {
        output.push_str(&format!(
            "Point limit reached: {} of {} message bytes traced\n",
            keystream.len(),
            trajectory.message_len
        ));
    }
    output.push_str(&format!("Keystream: {}\n", hex::encode(&keystream)));
    output.push_str(&format!("Written to {}\n", output_path.display()));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyfile::write_key_file;
    use tempfile::tempdir;

    #[test]
    fn test_export_trace_writes_json() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("key.bin");
        let out = dir.path().join("trace.json");
        write_key_file(&key, &KeyMaterial::test_vector()).unwrap();

        let options = TraceOptions {
            text: "abc".into(),
            key_file: Some(key),
            warmup: 10,
        };
        let report = export_trace(&out, &options).unwrap();
        assert!(report.contains("Captured 13 points (10 warmup, 3 encryption)"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["points"].as_array().unwrap().len(), 13);
        assert_eq!(json["message_len"], 3);
    }

    #[test]
    fn test_export_reports_truncation() {
        let dir = tempdir().unwrap();
        let options = TraceOptions {
            text: "x".repeat(50),
            key_file: None,
            warmup: 1990,
        };
        let report = export_trace(&dir.path().join("t.json"), &options).unwrap();
        assert!(report.contains("10 of 50 message bytes traced"));
    }
}
