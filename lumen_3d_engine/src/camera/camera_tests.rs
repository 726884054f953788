use glam::{Mat4, Vec3};
use super::*;

fn create_test_camera() -> Camera {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 10.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    Camera::from_matrices(view, projection)
}

#[test]
fn test_eye_position_from_view() {
    let camera = create_test_camera();
    assert!((camera.eye_position() - Vec3::new(0.0, 2.0, 10.0)).length() < 1e-4);
}

#[test]
fn test_view_depth_positive_in_front() {
    let camera = create_test_camera();
    assert!((camera.view_depth(Vec3::new(0.0, 2.0, 0.0)) - 10.0).abs() < 1e-4);
    assert!(camera.view_depth(Vec3::new(0.0, 2.0, 20.0)) < 0.0);
}

#[test]
fn test_view_projection_matrix() {
    let camera = create_test_camera();
    let expected = *camera.projection_matrix() * *camera.view_matrix();
    assert_eq!(camera.view_projection_matrix(), expected);
}

#[test]
fn test_set_view_updates_eye() {
    let mut camera = create_test_camera();
    camera.set_view(Mat4::look_at_rh(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y));
    assert!((camera.eye_position() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_frustum_from_matrices_sees_target() {
    let camera = create_test_camera();
    assert!(camera.frustum().contains_point(Vec3::new(0.0, 2.0, 0.0)));
}
