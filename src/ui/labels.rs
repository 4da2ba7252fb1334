//! Point name labels, drawn with the egui painter over the globe

use egui::Color32;
use glam::Vec2;

use crate::config::LabelStyle;
use crate::data::Point;
use crate::globe::{is_occluded_by_globe, ndc_to_pixels, project_visible, surface_position};
use crate::renderer::{parse_color, Camera};

const MIN_FONT_SIZE: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub index: usize,
    pub text: String,
    /// Pixel position of the labelled point inside the viewport
    pub position: Vec2,
    pub font_size: f32,
}

/// Place labels for the points on the visible hemisphere.
///
/// `style.size` is the text height in degrees of arc at the point, so labels
/// shrink as the camera zooms out.
pub fn label_placements(
    points: &[Point],
    camera: &Camera,
    viewport: Vec2,
    style: &LabelStyle,
) -> Vec<LabelPlacement> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec::new();
    }
    let view_proj = camera.view_projection_matrix(viewport.x / viewport.y);
    let camera_pos = camera.position();
    let pixels_per_unit_at_one = viewport.y / (2.0 * (camera.fov * 0.5).tan());

    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let world = surface_position(point.lat, point.lng);
            if is_occluded_by_globe(camera_pos, world) {
                return None;
            }
            let ndc = project_visible(world, view_proj)?;
            let depth = camera_pos.distance(world).max(f32::EPSILON);
            let font_size =
                (style.size.to_radians() * pixels_per_unit_at_one / depth).max(MIN_FONT_SIZE);
            Some(LabelPlacement {
                index,
                text: point.name.clone(),
                position: ndc_to_pixels(ndc, viewport),
                font_size,
            })
        })
        .collect()
}

pub fn label_color(style: &LabelStyle) -> Color32 {
    let [r, g, b, a] = parse_color(&style.color).unwrap_or([255, 255, 255, 255]);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

pub fn draw_labels(
    painter: &egui::Painter,
    origin: egui::Pos2,
    placements: &[LabelPlacement],
    color: Color32,
) {
    for label in placements {
        let pos = origin + egui::vec2(label.position.x, label.position.y);
        painter.circle_filled(pos, label.font_size * 0.15, color);
        painter.text(
            pos + egui::vec2(label.font_size * 0.4, 0.0),
            egui::Align2::LEFT_CENTER,
            &label.text,
            egui::FontId::proportional(label.font_size),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointStyle;
    use crate::data::{default_locations, derive_points};

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    fn points() -> Vec<Point> {
        derive_points(&default_locations(), &PointStyle::default())
    }

    #[test]
    fn test_labels_for_visible_points() {
        let points = points();
        let labels = label_placements(&points, &Camera::default(), VIEWPORT, &LabelStyle::default());

        let london = labels.iter().find(|l| l.index == 0).unwrap();
        assert_eq!(london.text, "London");
        assert!(london.position.x >= 0.0 && london.position.x <= VIEWPORT.x);
        assert!(london.position.y >= 0.0 && london.position.y <= VIEWPORT.y);
        assert!(london.font_size >= MIN_FONT_SIZE);
    }

    #[test]
    fn test_labels_shrink_when_zoomed_out() {
        let points = points();
        let style = LabelStyle {
            size: 5.0,
            ..LabelStyle::default()
        };
        let mut camera = Camera::default();
        let near = label_placements(&points, &camera, VIEWPORT, &style);
        camera.distance = 10.0;
        let far = label_placements(&points, &camera, VIEWPORT, &style);

        let size_of = |labels: &[LabelPlacement]| {
            labels.iter().find(|l| l.index == 0).map(|l| l.font_size).unwrap()
        };
        assert!(size_of(&far) < size_of(&near));
    }

    #[test]
    fn test_hidden_points_have_no_label() {
        let points = points();
        let london = surface_position(points[0].lat, points[0].lng);
        let mut camera = Camera::default();
        camera.azimuth = london.x.atan2(london.z) + std::f32::consts::PI;
        camera.elevation = -(london.y.asin());

        let labels = label_placements(&points, &camera, VIEWPORT, &LabelStyle::default());
        assert!(labels.iter().all(|l| l.index != 0));
    }

    #[test]
    fn test_label_color() {
        assert_eq!(label_color(&LabelStyle::default()), Color32::WHITE);
        let style = LabelStyle {
            color: "#FF0000".to_string(),
            ..LabelStyle::default()
        };
        assert_eq!(label_color(&style), Color32::from_rgb(255, 0, 0));
    }
}
