use serde::Serialize;

/// Key length in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce length in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Raw 256-bit cipher key. Key derivation from passwords is the caller's job.
pub type Key = [u8; KEY_SIZE];

/// 96-bit nonce. Must never repeat under the same key.
pub type Nonce = [u8; NONCE_SIZE];

/// Position of the attractor trajectory in phase space.
///
/// One state is created per cipher operation and advanced in place; it is
/// never shared between operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaoticState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ChaoticState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance to another state.
    #[cfg(test)]
    pub(crate) fn distance(&self, other: &ChaoticState) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = ChaoticState::new(0.0, 0.0, 0.0);
        let b = ChaoticState::new(2.0, 3.0, 6.0);
        assert_eq!(a.distance(&b), 7.0);
        assert_eq!(b.distance(&a), 7.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(ChaoticState::new(1.0, -2.0, 3.0).is_finite());
        assert!(!ChaoticState::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!ChaoticState::new(0.0, f64::INFINITY, 0.0).is_finite());
    }
}
