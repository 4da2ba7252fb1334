//! Lat/lng to screen-space projection
//!
//! All world positions of points, labels and the info bubble anchor come from
//! [`surface_position`], so the overlay always lands on the marker it
//! describes.

use glam::{Mat4, Vec2, Vec3};

use super::HoverInfo;
use crate::renderer::CameraHandle;

/// Bubble anchor used when there is nothing to project
pub const FALLBACK_POSITION: Vec2 = Vec2::ZERO;

/// Spherical to Cartesian, polar angle measured from +Y and azimuth from +Z
/// towards +X.
pub fn spherical_to_cartesian(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin() * radius;
    Vec3::new(
        sin_polar * azimuth.sin(),
        polar.cos() * radius,
        sin_polar * azimuth.cos(),
    )
}

/// Unit-sphere position of a lat/lng pair.
///
/// Latitude is used as the polar angle and longitude as the azimuth.
pub fn surface_position(lat: f64, lng: f64) -> Vec3 {
    spherical_to_cartesian(1.0, (lat as f32).to_radians(), (lng as f32).to_radians())
}

/// Project a world position to normalized device coordinates
pub fn project_to_ndc(world: Vec3, view_proj: Mat4) -> Vec3 {
    view_proj.project_point3(world)
}

/// Like [`project_to_ndc`], but `None` for positions behind the camera
pub fn project_visible(world: Vec3, view_proj: Mat4) -> Option<Vec3> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

/// Map NDC to pixels, with Y growing downwards
pub fn ndc_to_pixels(ndc: Vec3, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        -(ndc.y * 0.5 - 0.5) * viewport.y,
    )
}

/// A zero or NaN coordinate counts as missing
fn is_falsy(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Pixel anchor of the info bubble for the hovered point.
///
/// Falls back to [`FALLBACK_POSITION`] when nothing is hovered, the camera has
/// not been captured yet, or either coordinate is zero.
pub fn bubble_position(
    info: Option<&HoverInfo>,
    camera: Option<&CameraHandle>,
    viewport: Vec2,
) -> Vec2 {
    let (Some(info), Some(camera)) = (info, camera) else {
        return FALLBACK_POSITION;
    };
    if is_falsy(info.lat) || is_falsy(info.lng) || viewport.y <= 0.0 {
        return FALLBACK_POSITION;
    }

    let view_proj = camera.read().view_projection_matrix(viewport.x / viewport.y);
    let ndc = project_to_ndc(surface_position(info.lat, info.lng), view_proj);
    ndc_to_pixels(ndc, viewport)
}

/// Whether the unit globe blocks the line of sight from `camera_pos` to `point`
pub fn is_occluded_by_globe(camera_pos: Vec3, point: Vec3) -> bool {
    if camera_pos.length_squared() <= 1.0 {
        return false;
    }
    let dir = point - camera_pos;
    let a = dir.dot(dir);
    if a <= 0.0 {
        return false;
    }

    let b = 2.0 * camera_pos.dot(dir);
    let c = camera_pos.dot(camera_pos) - 1.0;
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return false;
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    let (tmin, tmax) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

    // Points on the surface touch the sphere at t == 1; only count hits strictly before
    const EPS: f32 = 1e-4;
    (tmin >= 0.0 && tmin < 1.0 - EPS) || (tmax >= 0.0 && tmax < 1.0 - EPS)
}
