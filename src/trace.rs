//! Trajectory capture for external visualization.
//!
//! Records every state the attractor passes through while warming up and
//! while producing keystream for a short message, so a 3-D viewer can show
//! where the keystream comes from. The warmup here is shorter than the
//! cipher's and the capture is capped, so this is a picture of the
//! dynamics rather than a transcript of a real encryption.

use crate::engine::{keystream_byte, mix, step, CipherParams, ChaoticState, Key, Nonce};
use crate::error::{KaosError, Result};
use serde::Serialize;
use std::path::Path;

/// Warmup used for visualization runs.
pub const TRACE_WARMUP_DEFAULT: u32 = 1000;

/// Hard limit on captured points.
pub const MAX_TRACE_POINTS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Encryption,
}

#[derive(Debug, Clone, Serialize)]
pub struct TracePoint {
    pub step: u64,
    pub phase: Phase,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Keystream byte emitted at this step; absent during warmup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystream_byte: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    pub params: CipherParams,
    pub initial: ChaoticState,
    pub message_len: usize,
    pub points: Vec<TracePoint>,
}

impl Trajectory {
    pub fn warmup_points(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.phase == Phase::Warmup)
            .count()
    }

    pub fn keystream(&self) -> Vec<u8> {
        self.points.iter().filter_map(|p| p.keystream_byte).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Capture the trajectory for `message` under `(key, nonce)`.
pub fn capture(key: &Key, nonce: &Nonce, message: &[u8], warmup: u32) -> Result<Trajectory> {
    if message.is_empty() {
        return Err(KaosError::InvalidLength);
    }

    let params = CipherParams::with_trace_warmup(warmup);
    let initial = mix(key, nonce);
    let mut state = initial;
    let capacity = MAX_TRACE_POINTS.min(warmup as usize + message.len());
    let mut points = Vec::with_capacity(capacity);

    for i in 0..u64::from(warmup) {
        // Once the cap is hit nothing further can be recorded.
        if points.len() >= MAX_TRACE_POINTS {
            break;
        }
        state = step(&params, state);
        points.push(TracePoint {
            step: i,
            phase: Phase::Warmup,
            x: state.x,
            y: state.y,
            z: state.z,
            keystream_byte: None,
        });
    }

    for (i, _) in message.iter().enumerate() {
        if points.len() >= MAX_TRACE_POINTS {
            break;
        }
        state = step(&params, state);
        let counter = i as u64;
        points.push(TracePoint {
            step: u64::from(warmup) + counter,
            phase: Phase::Encryption,
            x: state.x,
            y: state.y,
            z: state.z,
            keystream_byte: Some(keystream_byte(state, counter)),
        });
    }

    Ok(Trajectory {
        params,
        initial,
        message_len: message.len(),
        points,
    })
}

/// Write a trajectory as pretty JSON
pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> Result<()> {
    std::fs::write(path, trajectory.to_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::keystream;

    const KEY: Key = [0x42; 32];
    const NONCE: Nonce = [0x99; 12];

    #[test]
    fn test_capture_counts_points_per_phase() {
        let t = capture(&KEY, &NONCE, b"hello", 100).unwrap();
        assert_eq!(t.points.len(), 105);
        assert_eq!(t.warmup_points(), 100);
        assert_eq!(t.points[100].step, 100);
        assert_eq!(t.points[100].phase, Phase::Encryption);
    }

    #[test]
    fn test_capture_is_capped() {
        let message = vec![0u8; 500];
        let t = capture(&KEY, &NONCE, &message, 1800).unwrap();
        assert_eq!(t.points.len(), MAX_TRACE_POINTS);
        assert_eq!(t.keystream().len(), 200);
    }

    #[test]
    fn test_long_warmup_leaves_no_room_for_keystream() {
        let t = capture(&KEY, &NONCE, &[0u8; 16], 5000).unwrap();
        assert_eq!(t.points.len(), MAX_TRACE_POINTS);
        assert!(t.keystream().is_empty());
    }

    #[test]
    fn test_huge_warmup_stops_at_cap() {
        let t = capture(&KEY, &NONCE, b"hi", u32::MAX).unwrap();
        assert_eq!(t.points.len(), MAX_TRACE_POINTS);
        assert_eq!(t.warmup_points(), MAX_TRACE_POINTS);
        assert_eq!(t.points[MAX_TRACE_POINTS - 1].step, MAX_TRACE_POINTS as u64 - 1);
        assert!(t.keystream().is_empty());
    }

    #[test]
    fn test_keystream_matches_engine_at_same_warmup() {
        let t = capture(&KEY, &NONCE, &[0u8; 4], 0).unwrap();
        let params = CipherParams::with_trace_warmup(0);
        let expected = keystream(&params, &KEY, &NONCE, 4).unwrap();
        assert_eq!(t.keystream(), expected);
        assert_eq!(expected, vec![17, 23, 98, 179]);
    }

    #[test]
    fn test_json_shape() {
        let t = capture(&KEY, &NONCE, b"a", 1).unwrap();
        let json: serde_json::Value = serde_json::from_str(&t.to_json().unwrap()).unwrap();
        assert_eq!(json["points"][0]["phase"], "warmup");
        assert!(json["points"][0].get("keystream_byte").is_none());
        assert_eq!(json["points"][1]["phase"], "encryption");
        assert!(json["points"][1]["keystream_byte"].is_u64());
        assert_eq!(json["params"]["warmup"], 1);
    }

    #[test]
    fn test_empty_message_rejected() {
        assert!(matches!(
            capture(&KEY, &NONCE, b"", 10),
            Err(KaosError::InvalidLength)
        ));
    }
}
