//! Deterministic math utilities
//!
//! Re-exports glam with the quantization helpers used across the engine

pub use glam::*;

/// Round a scalar to the nearest 0.01.
///
/// Ties round toward positive infinity, so `round2(-0.125) == -0.12`.
/// Applied to every scalar crossing the public surface; internal state
/// stays unrounded between ticks.
pub fn round2(n: f64) -> f64 {
    let scaled = n * 100.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / 100.0
}

/// Componentwise [`round2`] for vectors.
pub fn round2_vec(v: DVec2) -> DVec2 {
    DVec2::new(round2(v.x), round2(v.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_hundredths() {
        assert_eq!(round2(0.981), 0.98);
        assert_eq!(round2(-1.4019), -1.4);
        assert_eq!(round2(2.005001), 2.01);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn ties_round_toward_positive_infinity() {
        // 0.125 * 100 and -0.125 * 100 are binary-exact halves.
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(-12.5), -12.5);
    }

    #[test]
    fn rounding_is_idempotent() {
        let mut x = -3.0;
        while x < 3.0 {
            let once = round2(x);
            assert_eq!(round2(once), once, "not idempotent at {x}");
            x += 0.0137;
        }
    }

    #[test]
    fn vector_rounding_is_componentwise() {
        let v = round2_vec(DVec2::new(1.007, -0.4985));
        assert_eq!(v, DVec2::new(1.01, -0.5));
    }
}
