//! Triangle soup geometry for waygrid
//!
//! Walkable-surface sampling works on raw triangle soups in a Y-up coordinate
//! system; headings and footprints live on the XZ plane.

use glam::Vec3;

/// A single triangle of source geometry.
///
/// Immutable once constructed; the normal is derived from the winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    /// Creates a new triangle from three positions
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// The (unnormalized) cross product of the triangle's edge vectors
    #[inline]
    pub fn raw_normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// The unit normal derived from the winding order.
    ///
    /// Returns the zero vector for degenerate triangles.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.raw_normal().normalize_or_zero()
    }

    /// A triangle with collinear vertices has no area and no usable normal
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.raw_normal().length_squared() < f32::EPSILON
    }

    /// True when every vertex component is a finite number
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }
}

/// Calculates the axis-aligned bounding box of a triangle soup.
///
/// Returns `None` for an empty soup.
pub fn calc_bounds(triangles: &[Triangle]) -> Option<(Vec3, Vec3)> {
    let first = triangles.first()?;
    let mut bmin = first.a;
    let mut bmax = first.a;

    for tri in triangles {
        for v in [tri.a, tri.b, tri.c] {
            bmin = bmin.min(v);
            bmax = bmax.max(v);
        }
    }

    Some((bmin, bmax))
}
