//! Distance estimators for the A* search

use std::f32::consts::SQRT_2;

use waygrid_common::Vec3;

/// Heuristic used to estimate remaining distance to the goal.
///
/// All estimators work on the horizontal (X/Z) footprint distance, except
/// [`Heuristic::Hex`] which projects onto X/Y axial coordinates. Octile is
/// the default: on a grid with diagonal movement it matches real movement
/// distance exactly, so it steers the search without over- or
/// under-estimating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Straight-line distance
    Euclidean,
    /// Axis-aligned taxicab distance
    Manhattan,
    /// Maximum per-axis distance (diagonal moves cost the same as straight)
    Chebyshev,
    /// Diagonal-aware grid distance
    #[default]
    Octile,
    /// Axial hex-grid distance over the X and Y axes
    Hex,
}

impl Heuristic {
    /// Estimated remaining distance from `from` to `to`
    pub fn estimate(self, from: Vec3, to: Vec3) -> f32 {
        let dx = (to.x - from.x).abs();
        let dz = (to.z - from.z).abs();
        match self {
            Self::Euclidean => (dx * dx + dz * dz).sqrt(),
            Self::Manhattan => dx + dz,
            Self::Chebyshev => dx.max(dz),
            Self::Octile => dx + dz + (SQRT_2 - 2.0) * dx.min(dz),
            Self::Hex => {
                let qx = to.x - from.x;
                let qy = to.y - from.y;
                qx.abs().max(qy.abs()).max((qx - qy).abs())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Vec3::new(3.0, 1.0, -2.0);
        for h in [
            Heuristic::Euclidean,
            Heuristic::Manhattan,
            Heuristic::Chebyshev,
            Heuristic::Octile,
            Heuristic::Hex,
        ] {
            assert_eq!(h.estimate(p, p), 0.0);
        }
    }

    #[test]
    fn test_axis_aligned_estimates_agree() {
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 0.0, 0.0);
        assert!((Heuristic::Euclidean.estimate(a, b) - 5.0).abs() < 1e-6);
        assert!((Heuristic::Manhattan.estimate(a, b) - 5.0).abs() < 1e-6);
        assert!((Heuristic::Chebyshev.estimate(a, b) - 5.0).abs() < 1e-6);
        assert!((Heuristic::Octile.estimate(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_estimates() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 0.0, 3.0);
        assert!((Heuristic::Euclidean.estimate(a, b) - 3.0 * SQRT_2).abs() < 1e-5);
        assert!((Heuristic::Manhattan.estimate(a, b) - 6.0).abs() < 1e-6);
        assert!((Heuristic::Chebyshev.estimate(a, b) - 3.0).abs() < 1e-6);
        assert!((Heuristic::Octile.estimate(a, b) - 3.0 * SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_octile_mixed_offsets() {
        let a = Vec3::ZERO;
        let b = Vec3::new(4.0, 0.0, 1.0);
        // One diagonal step plus three straight steps.
        let expected = 3.0 + SQRT_2;
        assert!((Heuristic::Octile.estimate(a, b) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_height_is_ignored_by_planar_estimators() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 50.0, 4.0);
        assert!((Heuristic::Euclidean.estimate(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_hex_uses_x_and_y() {
        let a = Vec3::ZERO;
        assert!((Heuristic::Hex.estimate(a, Vec3::new(2.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!((Heuristic::Hex.estimate(a, Vec3::new(2.0, -1.0, 0.0)) - 3.0).abs() < 1e-6);
        assert!((Heuristic::Hex.estimate(a, Vec3::new(1.0, 1.0, 9.0)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_is_octile() {
        assert_eq!(Heuristic::default(), Heuristic::Octile);
    }
}
