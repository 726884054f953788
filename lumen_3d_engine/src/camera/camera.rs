/// Camera: low-level passive data container.
///
/// The caller (game code) computes and sets the view matrix, projection
/// matrix and frustum. The camera only derives the values the scene needs
/// during enqueue: eye position and view-space depth for batch sorting.

use glam::{Mat4, Vec3};
use super::frustum::Frustum;

/// Low-level camera used for scene traversal.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
    eye_position: Vec3,
}

impl Camera {
    /// Create a camera with an explicit frustum.
    pub fn new(view: Mat4, projection: Mat4, frustum: Frustum) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            frustum,
            eye_position: Self::eye_from_view(&view),
        }
    }

    /// Create a camera whose frustum is extracted from `projection * view`.
    pub fn from_matrices(view: Mat4, projection: Mat4) -> Self {
        let frustum = Frustum::from_view_projection(&(projection * view));
        Self::new(view, projection, frustum)
    }

    fn eye_from_view(view: &Mat4) -> Vec3 {
        view.inverse().col(3).truncate()
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Frustum planes and bounds for culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// World-space eye position.
    pub fn eye_position(&self) -> Vec3 {
        self.eye_position
    }

    /// Distance in front of the eye along the view direction
    /// (positive for visible points, right-handed view space).
    pub fn view_depth(&self, world_point: Vec3) -> f32 {
        -self.view_matrix.transform_point3(world_point).z
    }

    // ===== SETTERS: store, compute nothing else =====

    /// Set the view matrix (updates the eye position).
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
        self.eye_position = Self::eye_from_view(&matrix);
    }

    /// Set the projection matrix.
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    /// Set the frustum.
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
