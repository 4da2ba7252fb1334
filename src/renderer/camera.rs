//! Camera controller for the globe viewport

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::PointOfView;

/// Minimum distance from the globe centre, in globe radii
const MIN_DISTANCE: f32 = 1.1;
const MAX_DISTANCE: f32 = 50.0;

/// Orbital camera that rotates around the globe centre
#[derive(Debug, Clone)]
pub struct Camera {
    /// Target point the camera looks at (the globe centre)
    pub target: Vec3,
    /// Distance from target, in globe radii
    pub distance: f32,
    /// Azimuth angle (rotation around Y axis) in radians
    pub azimuth: f32,
    /// Elevation angle (rotation above/below XZ plane) in radians
    pub elevation: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_point_of_view(&PointOfView::default())
    }
}

impl Camera {
    /// Place the camera above `pov.lat`/`pov.lng`, `pov.altitude` radii off the surface
    pub fn from_point_of_view(pov: &PointOfView) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: (1.0 + pov.altitude as f32).clamp(MIN_DISTANCE, MAX_DISTANCE),
            azimuth: (pov.lng as f32).to_radians(),
            elevation: (pov.lat as f32).to_radians().clamp(
                -std::f32::consts::FRAC_PI_2 + 0.01,
                std::f32::consts::FRAC_PI_2 - 0.01,
            ),
            fov: 50.0_f32.to_radians(),
            near: 0.01,
            far: 100.0,
        }
    }

    /// Get camera position in world space
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect_ratio, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    /// Orbit the camera (mouse drag)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth -= delta_x * 0.005;
        self.elevation = (self.elevation + delta_y * 0.005).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }

    /// Zoom the camera (mouse wheel)
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance auto-rotation by `dt` seconds.
    ///
    /// `speed` follows the orbit-controls convention: 2.0 is one revolution
    /// every 30 seconds.
    pub fn auto_rotate(&mut self, dt: f32, speed: f32) {
        let angle = std::f32::consts::TAU / 60.0 * speed * dt;
        self.azimuth = (self.azimuth + angle).rem_euclid(std::f32::consts::TAU);
    }
}

/// Shared handle to the live scene camera.
///
/// Cloning the handle shares the camera; readers always see the current
/// orientation, including auto-rotation applied after the handle was taken.
#[derive(Debug, Clone)]
pub struct CameraHandle(Arc<RwLock<Camera>>);

impl CameraHandle {
    pub fn new(camera: Camera) -> Self {
        Self(Arc::new(RwLock::new(camera)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Camera> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Camera> {
        self.0.write()
    }

    /// Copy of the camera as it is right now
    pub fn snapshot(&self) -> Camera {
        self.0.read().clone()
    }

    /// Whether both handles refer to the same camera
    #[cfg(test)]
    pub fn same_camera(&self, other: &CameraHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera, aspect_ratio: f32) -> Self {
        let pos = camera.position();
        Self {
            view_proj: camera
                .view_projection_matrix(aspect_ratio)
                .to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_pos: [pos.x, pos.y, pos.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_of_view() {
        let camera = Camera::default();
        let pos = camera.position();

        assert!((pos.length() - 3.0).abs() < 1e-5);
        // 20 degrees north, on the prime meridian (+Z)
        assert!((pos.y / pos.length() - 20.0_f32.to_radians().sin()).abs() < 1e-5);
        assert!(pos.x.abs() < 1e-5);
        assert!(pos.z > 0.0);
    }

    #[test]
    fn test_auto_rotate_full_revolution() {
        let mut camera = Camera::default();
        let start = camera.azimuth;

        // speed 0.5 -> one revolution every 120 s
        camera.auto_rotate(30.0, 0.5);
        assert!((camera.azimuth - (start + std::f32::consts::FRAC_PI_2)).abs() < 1e-4);

        camera.auto_rotate(90.0, 0.5);
        let wrapped = camera.azimuth.rem_euclid(std::f32::consts::TAU);
        assert!(wrapped < 1e-3 || (std::f32::consts::TAU - wrapped) < 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom(100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_orbit_clamps_elevation() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10_000.0);
        assert!(camera.elevation < std::f32::consts::FRAC_PI_2);
        camera.orbit(0.0, -20_000.0);
        assert!(camera.elevation > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_handle_shares_camera() {
        let handle = CameraHandle::new(Camera::default());
        let other = handle.clone();

        handle.write().auto_rotate(10.0, 2.0);
        assert_eq!(other.read().azimuth, handle.read().azimuth);
        assert!(handle.same_camera(&other));
        assert!(!handle.same_camera(&CameraHandle::new(Camera::default())));
    }
}
