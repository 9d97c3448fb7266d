//! Key and nonce to initial state.
//!
//! Three 64-bit lanes absorb the key and nonce with independent rules, are
//! cross-mixed, then each lane is normalized into `[0, 1)` to seed one
//! coordinate of the attractor.

use super::state::{ChaoticState, Key, Nonce};

const LANE1_MUL: u64 = 0x9E3779B97F4A7C15;
const LANE2_MUL: u64 = 0xBF58476D1CE4E5B9;
const LANE3_MUL: u64 = 0x94D049BB133111EB;

/// Substitutes for a coordinate that normalizes to exactly zero. The origin
/// is a fixed point of the Lorenz system.
const FALLBACK_X: f64 = 0.1234567890123456;
const FALLBACK_Y: f64 = 0.9876543210987654;
const FALLBACK_Z: f64 = 0.5555555555555555;

/// Derive the initial chaotic state from a key and nonce.
pub fn mix(key: &Key, nonce: &Nonce) -> ChaoticState {
    let (mut h1, mut h2, mut h3) = (0u64, 0u64, 0u64);

    for &byte in key.iter() {
        let k = u64::from(byte);
        h1 = h1.rotate_left(5) ^ k.wrapping_mul(LANE1_MUL);
        h2 = h2.rotate_left(7) ^ k.wrapping_mul(LANE2_MUL);
        h3 = h3.rotate_left(11) ^ k.wrapping_mul(LANE3_MUL);
    }

    for (i, &byte) in nonce.iter().enumerate() {
        let n = u64::from(byte);
        h1 ^= n << (i * 3);
        h2 = h2.wrapping_add(n * (i as u64 + 1));
        h3 = h3.rotate_left(13) ^ n;
    }

    h1 ^= h2 ^ h3;
    h2 = h2.wrapping_add(h1.wrapping_mul(3));
    h3 ^= (h1 << 32) | (h2 >> 32);

    ChaoticState {
        x: unit_interval(h1 ^ LANE1_MUL, FALLBACK_X),
        y: unit_interval(h2 ^ LANE2_MUL, FALLBACK_Y),
        z: unit_interval(h3 ^ LANE3_MUL, FALLBACK_Z),
    }
}

/// Scale a lane into `[0, 1)`. Lanes within rounding distance of
/// `u64::MAX` wrap to zero and take the fallback.
fn unit_interval(lane: u64, fallback: f64) -> f64 {
    let value = (lane as f64 / u64::MAX as f64) % 1.0;
    if value == 0.0 {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_vector() {
        let state = mix(&[0x42; 32], &[0x99; 12]);
        assert_eq!(state.x, 0.7931678780848623);
        assert_eq!(state.y, 0.8401856113631514);
        assert_eq!(state.z, 0.8388335152011134);
    }

    #[test]
    fn test_all_zero_input_is_not_origin() {
        let state = mix(&[0u8; 32], &[0u8; 12]);
        assert!(state.x != 0.0 && state.y != 0.0 && state.z != 0.0);
        // With empty lanes only the output constants remain.
        assert_eq!(state.x, LANE1_MUL as f64 / u64::MAX as f64);
    }

    #[test]
    fn test_coordinates_in_unit_interval() {
        for seed in 0..64u8 {
            let key = [seed.wrapping_mul(37); 32];
            let nonce = [seed; 12];
            let s = mix(&key, &nonce);
            for v in [s.x, s.y, s.z] {
                assert!((0.0..1.0).contains(&v), "coordinate {} out of range", v);
            }
        }
    }

    #[test]
    fn test_zero_lane_takes_fallback() {
        assert_eq!(unit_interval(0, FALLBACK_X), FALLBACK_X);
        // u64::MAX normalizes to exactly 1.0, which wraps to 0.0
        assert_eq!(unit_interval(u64::MAX, FALLBACK_Y), FALLBACK_Y);
        assert_eq!(unit_interval(u64::MAX - 1, FALLBACK_Z), FALLBACK_Z);
        assert!(unit_interval(1 << 63, FALLBACK_X) == 0.5);
    }

    #[test]
    fn test_key_and_nonce_both_matter() {
        let base = mix(&[1u8; 32], &[2u8; 12]);

        let mut key = [1u8; 32];
        key[31] ^= 0x01;
        assert_ne!(mix(&key, &[2u8; 12]), base);

        let mut nonce = [2u8; 12];
        nonce[11] ^= 0x80;
        assert_ne!(mix(&[1u8; 32], &nonce), base);
    }
}
