//! Content hashing for grid persistence
//!
//! A persisted grid is only reusable while the source geometry and generation
//! settings it was built from are unchanged. The digest below is order
//! independent for the triangle list: upstream geometry providers make no
//! ordering guarantees, so per-triangle digests are sorted before being fed
//! into the outer hash.

use crate::Triangle;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Incremental FNV-1a 64-bit hasher
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv1a {
    pub fn new() -> Self {
        Self(FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write(&value.to_le_bytes());
    }

    pub fn finish(&self) -> u64 {
        self.0
    }
}

/// Deterministic digest of a single triangle's vertex data
pub fn triangle_digest(tri: &Triangle) -> u64 {
    let mut h = Fnv1a::new();
    for v in [tri.a, tri.b, tri.c] {
        h.write_f32(v.x);
        h.write_f32(v.y);
        h.write_f32(v.z);
    }
    h.finish()
}

/// Computes the content hash over a triangle soup plus serialized settings.
///
/// The result is a fixed-width lowercase hex string suitable for embedding in
/// grid files and comparing on load.
pub fn content_hash(triangles: &[Triangle], settings_bytes: &[u8]) -> String {
    let mut digests: Vec<u64> = triangles.iter().map(triangle_digest).collect();
    digests.sort_unstable();

    let mut h = Fnv1a::new();
    for d in digests {
        h.write_u64(d);
    }
    h.write(settings_bytes);

    format!("{:016x}", h.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tri(x: f32) -> Triangle {
        Triangle::new(
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + 1.0, 0.0, 0.0),
            Vec3::new(x, 0.0, 1.0),
        )
    }

    #[test]
    fn test_hash_is_order_independent() {
        let forward = vec![tri(0.0), tri(1.0), tri(2.0)];
        let backward = vec![tri(2.0), tri(1.0), tri(0.0)];
        assert_eq!(content_hash(&forward, b"s"), content_hash(&backward, b"s"));
    }

    #[test]
    fn test_hash_changes_with_geometry() {
        let a = vec![tri(0.0)];
        let mut moved = a.clone();
        moved[0].b.y += 0.5;
        assert_ne!(content_hash(&a, b"s"), content_hash(&moved, b"s"));
    }

    #[test]
    fn test_hash_changes_with_settings() {
        let a = vec![tri(0.0)];
        assert_ne!(content_hash(&a, b"cell=1"), content_hash(&a, b"cell=2"));
    }

    #[test]
    fn test_hash_is_stable() {
        let a = vec![tri(0.0)];
        assert_eq!(content_hash(&a, b"s"), content_hash(&a, b"s"));
        assert_eq!(content_hash(&a, b"s").len(), 16);
    }
}
