//! Hover state and pointer picking against the point layer

use glam::Vec2;

use super::projection::{is_occluded_by_globe, ndc_to_pixels, project_visible, surface_position};
use crate::data::Point;
use crate::renderer::Camera;

/// Display data of the hovered point
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub name: String,
    pub image: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Point> for HoverInfo {
    fn from(point: &Point) -> Self {
        Self {
            name: point.name.clone(),
            image: point.image.clone(),
            description: point.description.clone(),
            lat: point.lat,
            lng: point.lng,
        }
    }
}

/// Screen-space footprint of one marker column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFootprint {
    pub index: usize,
    /// Pixel position of the column base
    pub base: Vec2,
    /// Pixel position of the column tip
    pub tip: Vec2,
}

/// Project every visible marker column to pixels.
///
/// `growth` scales the column height (0 while a marker is appearing, 1 once
/// fully grown). Columns whose tip is hidden behind the globe are skipped.
pub fn marker_footprints(
    points: &[Point],
    camera: &Camera,
    viewport: Vec2,
    growth: f32,
) -> Vec<MarkerFootprint> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec::new();
    }
    let view_proj = camera.view_projection_matrix(viewport.x / viewport.y);
    let camera_pos = camera.position();

    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let base_world = surface_position(point.lat, point.lng);
            let tip_world = base_world * (1.0 + point.altitude * growth);
            if is_occluded_by_globe(camera_pos, tip_world) {
                return None;
            }
            let base = project_visible(base_world, view_proj)?;
            let tip = project_visible(tip_world, view_proj)?;
            Some(MarkerFootprint {
                index,
                base: ndc_to_pixels(base, viewport),
                tip: ndc_to_pixels(tip, viewport),
            })
        })
        .collect()
}

/// Distance from `p` to the segment `a`-`b`
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Index of the marker under the pointer, nearest first
pub fn pick_marker(footprints: &[MarkerFootprint], pointer: Vec2, radius_px: f32) -> Option<usize> {
    footprints
        .iter()
        .map(|fp| (fp.index, distance_to_segment(pointer, fp.base, fp.tip)))
        .filter(|(_, dist)| *dist <= radius_px)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointStyle;
    use crate::data::{default_locations, derive_points};

    fn points() -> Vec<Point> {
        derive_points(&default_locations(), &PointStyle::default())
    }

    #[test]
    fn test_hover_info_mirrors_point() {
        let points = points();
        let info = HoverInfo::from(&points[1]);
        assert_eq!(info.name, "Delhi");
        assert_eq!(info.image, "delhi.jpg");
        assert_eq!(info.lat, 28.6139);
        assert_eq!(info.lng, 77.209);
    }

    #[test]
    fn test_pick_nearest_within_radius() {
        let footprints = [
            MarkerFootprint {
                index: 0,
                base: Vec2::new(100.0, 100.0),
                tip: Vec2::new(100.0, 80.0),
            },
            MarkerFootprint {
                index: 1,
                base: Vec2::new(106.0, 100.0),
                tip: Vec2::new(106.0, 80.0),
            },
        ];

        assert_eq!(pick_marker(&footprints, Vec2::new(101.0, 90.0), 8.0), Some(0));
        assert_eq!(pick_marker(&footprints, Vec2::new(105.0, 90.0), 8.0), Some(1));
        assert_eq!(pick_marker(&footprints, Vec2::new(300.0, 300.0), 8.0), None);
    }

    #[test]
    fn test_pick_along_column() {
        let footprints = [MarkerFootprint {
            index: 2,
            base: Vec2::new(0.0, 100.0),
            tip: Vec2::new(0.0, 0.0),
        }];
        assert_eq!(pick_marker(&footprints, Vec2::new(3.0, 50.0), 4.0), Some(2));
        assert_eq!(pick_marker(&footprints, Vec2::new(0.0, 110.0), 4.0), None);
    }

    #[test]
    fn test_footprints_skip_far_side() {
        let points = points();
        let viewport = Vec2::new(1920.0, 1080.0);
        let mut camera = Camera::default();

        // Looking from the opposite side, London is hidden behind the globe
        let london = surface_position(points[0].lat, points[0].lng);
        let visible = marker_footprints(&points, &camera, viewport, 1.0);
        assert!(visible.iter().any(|fp| fp.index == 0));

        camera.azimuth = london.x.atan2(london.z) + std::f32::consts::PI;
        camera.elevation = -(london.y.asin());
        let hidden = marker_footprints(&points, &camera, viewport, 1.0);
        assert!(hidden.iter().all(|fp| fp.index != 0));
    }

    #[test]
    fn test_footprints_collapse_before_growth() {
        let points = points();
        let footprints = marker_footprints(&points, &Camera::default(), Vec2::new(800.0, 600.0), 0.0);
        for fp in footprints {
            assert!(fp.base.distance(fp.tip) < 1e-3);
        }
    }
}
