use super::state::ChaoticState;

const PHI: f64 = 1.6180339887498948482;
const EULER: f64 = std::f64::consts::E;
const PI: f64 = std::f64::consts::PI;

/// Per-position offset added to the fractional part before quantizing.
const COUNTER_PERTURBATION: f64 = 1e-7;

/// Derive one keystream byte from the current state and its position.
///
/// The state is projected onto three irrational weights and the fractional
/// part of the result is quantized to a byte, then three fixed byte-level
/// passes fold the counter back in. Uniformity is a measured property of
/// the output, not a guarantee of this function.
pub fn keystream_byte(state: ChaoticState, counter: u64) -> u8 {
    let combined = state.x * PHI + state.y * EULER + state.z * PI;
    let magnitude = combined.abs();
    let mut fractional = magnitude - magnitude.floor();
    fractional = (fractional + counter as f64 * COUNTER_PERTURBATION) % 1.0;

    // fractional < 1.0, so the product stays below 256
    let mut b = (fractional * 256.0) as u8;

    b = b.wrapping_add(counter as u8);
    b ^= (b >> 4) ^ (b << 3) ^ (counter % 97) as u8;
    b.wrapping_mul(167).wrapping_add(123)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_reference_digits() {
        assert_eq!(EULER, 2.71828182845904523536);
        assert_eq!(PI, 3.14159265358979323846);
    }

    #[test]
    fn test_origin_counter_zero() {
        // b = 0 through every pass except the final affine map
        assert_eq!(keystream_byte(ChaoticState::new(0.0, 0.0, 0.0), 0), 123);
    }

    #[test]
    fn test_known_values() {
        let s = ChaoticState::new(0.5, 0.25, 0.125);
        assert_eq!(keystream_byte(s, 0), 44);
        assert_eq!(keystream_byte(s, 300), 239);
        assert_eq!(keystream_byte(ChaoticState::new(1.0, 2.0, 3.0), 97), 157);
    }

    #[test]
    fn test_sign_of_projection_is_ignored() {
        let s = ChaoticState::new(0.5, 0.25, 0.125);
        let neg = ChaoticState::new(-0.5, -0.25, -0.125);
        assert_eq!(keystream_byte(s, 7), keystream_byte(neg, 7));
    }

    #[test]
    fn test_counter_changes_output_for_same_state() {
        let s = ChaoticState::new(3.0, -4.0, 20.0);
        let outputs: std::collections::HashSet<u8> =
            (0..256u64).map(|c| keystream_byte(s, c)).collect();
        assert!(outputs.len() > 64);
    }
}
