/// Frustum: six clipping planes plus world-space bounds for visibility culling.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The axis-aligned `bounds()` of the volume drive spatial hash queries;
/// the planes drive the per-cell and per-element classification.

use glam::{Mat4, Vec3, Vec4};
use crate::scene::AABB;

/// Result of a 3-way frustum/AABB classification.
///
/// Used by spatial structures for hierarchical culling:
/// - `Outside` → skip the cell
/// - `Inside` → collect all members without further testing
/// - `Partial` → test individual members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes and the box enclosing the volume they bound.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    planes: [Vec4; 6],
    /// World-space bounds of the eight corners
    bounds: AABB,
}

impl Frustum {
    /// Bounds used when the corners cannot be computed (parallel planes)
    pub const UNBOUNDED: AABB = AABB {
        min: Vec3::splat(-f32::MAX),
        max: Vec3::splat(f32::MAX),
    };

    /// Build a frustum from explicit planes; bounds are derived from the
    /// plane intersections.
    pub fn from_planes(mut planes: [Vec4; 6]) -> Self {
        for plane in &mut planes {
            let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }
        let bounds = Self::corner_bounds(&planes);
        Self { planes, bounds }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        Self::from_planes([
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ])
    }

    /// Box-shaped query volume (used for orthographic region queries).
    pub fn from_aabb(aabb: &AABB) -> Self {
        let planes = [
            Vec4::new(1.0, 0.0, 0.0, -aabb.min.x),
            Vec4::new(-1.0, 0.0, 0.0, aabb.max.x),
            Vec4::new(0.0, 1.0, 0.0, -aabb.min.y),
            Vec4::new(0.0, -1.0, 0.0, aabb.max.y),
            Vec4::new(0.0, 0.0, 1.0, -aabb.min.z),
            Vec4::new(0.0, 0.0, -1.0, aabb.max.z),
        ];
        Self { planes, bounds: *aabb }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// World-space axis-aligned bounds of the volume
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    fn corner_bounds(planes: &[Vec4; 6]) -> AABB {
        let mut bounds = AABB::EMPTY;
        for x in [PLANE_LEFT, PLANE_RIGHT] {
            for y in [PLANE_BOTTOM, PLANE_TOP] {
                for z in [PLANE_NEAR, PLANE_FAR] {
                    match Self::intersect_planes(&planes[x], &planes[y], &planes[z]) {
                        Some(corner) => bounds.add_point(corner),
                        None => return Self::UNBOUNDED,
                    }
                }
            }
        }
        bounds
    }

    fn intersect_planes(a: &Vec4, b: &Vec4, c: &Vec4) -> Option<Vec3> {
        let (na, nb, nc) = (a.truncate(), b.truncate(), c.truncate());
        let bc = nb.cross(nc);
        let denom = na.dot(bc);
        if denom.abs() < 1e-6 {
            return None;
        }
        let point = -(bc * a.w + nc.cross(na) * b.w + na.cross(nb) * c.w) / denom;
        point.is_finite().then_some(point)
    }

    /// Test if a point lies inside all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != FrustumTest::Outside
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - If all n-vertices are inside all planes → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        if aabb.is_empty() {
            return FrustumTest::Outside;
        }
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = Vec3::new(plane.x, plane.y, plane.z);

            // Positive vertex: corner most in the direction of the normal
            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if normal.dot(p_vertex) + plane.w < 0.0 {
                return FrustumTest::Outside;
            }

            // Negative vertex: corner least in the direction of the normal
            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
