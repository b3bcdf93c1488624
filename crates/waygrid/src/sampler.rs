//! Geometry sampler: vertical raycasts over a lattice of columns
//!
//! The sampler derives lattice lines from the bounding box of the input soup
//! and casts one ray straight down per column, collecting every triangle
//! intersection so that multi-layer surfaces (bridges over floors) produce
//! stacked samples within a single column.

use waygrid_common::{calc_bounds, ray_triangle_intersection, Triangle, Vec3};

use crate::GridSettings;

/// Coincident hits (shared triangle edges, duplicated vertices) are collapsed
/// when their ray distances differ by less than this.
const HIT_MERGE_EPS: f32 = 1e-4;

/// Clearance above the bounding box from which sampling rays are cast
const RAY_CLEARANCE: f32 = 1.0;

/// A single ray/triangle intersection within a lattice column
#[derive(Debug, Clone, Copy)]
pub(crate) struct CollisionSample {
    /// World-space hit point
    pub point: Vec3,
    /// Index of the hit triangle in the source soup
    pub triangle: usize,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Per-column intersection stacks over the sampling lattice
///
/// Columns sit on lattice boundary lines (not cell centers) spaced by the
/// configured cell size. The iteration over lattice lines is half-open, so
/// the far boundary row and column of the bounding box are dropped.
#[derive(Debug)]
pub(crate) struct ColumnLattice {
    columns_x: usize,
    columns_z: usize,
    stacks: Vec<Vec<CollisionSample>>,
}

impl ColumnLattice {
    fn empty() -> Self {
        Self {
            columns_x: 0,
            columns_z: 0,
            stacks: Vec::new(),
        }
    }

    /// Number of lattice lines along the x axis
    pub fn columns_x(&self) -> usize {
        self.columns_x
    }

    /// Number of lattice lines along the z axis
    pub fn columns_z(&self) -> usize {
        self.columns_z
    }

    /// The intersection stack of the column at lattice coordinates (x, z),
    /// ordered nearest hit first (topmost surface first)
    pub fn stack(&self, x: usize, z: usize) -> &[CollisionSample] {
        &self.stacks[z * self.columns_x + x]
    }

    /// True when the lattice holds no columns at all
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

/// Samples the triangle soup into per-column intersection stacks.
///
/// An empty soup, or one whose bounding box has zero extent on a horizontal
/// axis, yields an empty lattice; a column with zero hits keeps an empty
/// stack and contributes no footprint downstream.
pub(crate) fn sample_columns(triangles: &[Triangle], settings: &GridSettings) -> ColumnLattice {
    let Some((bmin, bmax)) = calc_bounds(triangles) else {
        return ColumnLattice::empty();
    };

    let cell = settings.cell_size;
    let columns_x = count_lines(bmin.x, bmax.x, cell);
    let columns_z = count_lines(bmin.z, bmax.z, cell);
    if columns_x == 0 || columns_z == 0 {
        return ColumnLattice::empty();
    }

    let ray_y = bmax.y + RAY_CLEARANCE;
    let down = Vec3::new(0.0, -1.0, 0.0);

    let mut stacks = Vec::with_capacity(columns_x * columns_z);
    for iz in 0..columns_z {
        for ix in 0..columns_x {
            let origin = Vec3::new(
                bmin.x + ix as f32 * cell,
                ray_y,
                bmin.z + iz as f32 * cell,
            );
            stacks.push(cast_column(&origin, &down, triangles));
        }
    }

    ColumnLattice {
        columns_x,
        columns_z,
        stacks,
    }
}

/// Number of lattice lines strictly below the max bound
fn count_lines(min: f32, max: f32, cell: f32) -> usize {
    let mut count = 0;
    while min + count as f32 * cell < max {
        count += 1;
    }
    count
}

/// Casts a single downward ray against every triangle and returns all hits
/// sorted by entry order, with coincident hits collapsed
fn cast_column(origin: &Vec3, direction: &Vec3, triangles: &[Triangle]) -> Vec<CollisionSample> {
    let mut hits: Vec<CollisionSample> = Vec::new();

    for (idx, tri) in triangles.iter().enumerate() {
        if let Some(t) = ray_triangle_intersection(origin, direction, &tri.a, &tri.b, &tri.c) {
            hits.push(CollisionSample {
                point: *origin + *direction * t,
                triangle: idx,
                distance: t,
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits.dedup_by(|a, b| (a.distance - b.distance).abs() < HIT_MERGE_EPS);
    hits
}
