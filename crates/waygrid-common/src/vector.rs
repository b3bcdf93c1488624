//! Ray and vector utilities for waygrid

use glam::Vec3;

/// Intersects a ray with a triangle using the Möller–Trumbore algorithm.
///
/// Returns the distance `t` along the ray at the intersection point, or
/// `None` when the ray misses, runs parallel to the triangle plane, or the
/// hit lies behind the origin.
pub fn ray_triangle_intersection(
    origin: &Vec3,
    direction: &Vec3,
    v0: &Vec3,
    v1: &Vec3,
    v2: &Vec3,
) -> Option<f32> {
    let edge1 = *v1 - *v0;
    let edge2 = *v2 - *v0;

    let p = direction.cross(edge2);
    let det = edge1.dot(p);

    // Parallel to the triangle plane
    if det.abs() < f32::EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = *origin - *v0;
    let u = inv_det * s.dot(p);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    if t > f32::EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Component-wise equality within `eps`, including the Y axis.
///
/// Corner matching during adjacency inference compares full 3D positions so
/// that stacked surface layers sharing a lattice column are never linked.
#[inline]
pub fn points_eq(a: &Vec3, b: &Vec3, eps: f32) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps && (a.z - b.z).abs() <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_floor_triangle() {
        let origin = Vec3::new(0.25, 5.0, 0.25);
        let dir = Vec3::new(0.0, -1.0, 0.0);
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 0.0, 1.0);

        let t = ray_triangle_intersection(&origin, &dir, &v0, &v1, &v2).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        let origin = Vec3::new(2.0, 5.0, 2.0);
        let dir = Vec3::new(0.0, -1.0, 0.0);
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 0.0, 1.0);

        assert!(ray_triangle_intersection(&origin, &dir, &v0, &v1, &v2).is_none());
    }

    #[test]
    fn test_ray_behind_origin_is_no_hit() {
        let origin = Vec3::new(0.25, -5.0, 0.25);
        let dir = Vec3::new(0.0, -1.0, 0.0);
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 0.0, 1.0);

        assert!(ray_triangle_intersection(&origin, &dir, &v0, &v1, &v2).is_none());
    }

    #[test]
    fn test_ray_parallel_to_plane() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 0.0, 1.0);

        assert!(ray_triangle_intersection(&origin, &dir, &v0, &v1, &v2).is_none());
    }

    #[test]
    fn test_points_eq_checks_height() {
        let a = Vec3::new(1.0, 0.0, 1.0);
        let b = Vec3::new(1.0, 20.0, 1.0);
        assert!(!points_eq(&a, &b, 1e-4));
        assert!(points_eq(&a, &a, 1e-4));
    }
}
