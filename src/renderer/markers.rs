//! Point markers - instanced columns rising from the globe surface

use std::time::Duration;

use bytemuck::{Pod, Zeroable};

use crate::data::Point;
use crate::globe::surface_position;

/// Instance data for each marker column
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// Column base on the globe surface (globe radii)
    pub base: [f32; 3],
    /// Column tip
    pub tip: [f32; 3],
    /// Linear RGBA
    pub color: [f32; 4],
    /// Column half-width in world units
    pub radius: f32,
}

impl PointInstance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Base
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Tip
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Radius
                wgpu::VertexAttribute {
                    offset: 40,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a basic colour name into sRGB bytes
pub fn parse_color(value: &str) -> Option<[u8; 4]> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255]),
            6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
            8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
            _ => None,
        };
    }

    match value.to_ascii_lowercase().as_str() {
        "white" => Some([255, 255, 255, 255]),
        "black" => Some([0, 0, 0, 255]),
        "red" => Some([255, 0, 0, 255]),
        "green" => Some([0, 128, 0, 255]),
        "blue" => Some([0, 0, 255, 255]),
        "yellow" => Some([255, 255, 0, 255]),
        "orange" => Some([255, 165, 0, 255]),
        _ => None,
    }
}

/// Linear RGBA for the shaders; unparseable colours render white
pub fn color_to_linear(value: &str) -> [f32; 4] {
    let [r, g, b, a] = parse_color(value).unwrap_or_else(|| {
        log::warn!("Unrecognised colour {:?}, using white", value);
        [255, 255, 255, 255]
    });
    let to_linear = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [to_linear(r), to_linear(g), to_linear(b), a as f32 / 255.0]
}

/// Growth animation of marker columns after mount
#[derive(Debug, Clone, Copy)]
pub struct PointTransition {
    pub duration: Duration,
}

impl PointTransition {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Eased progress in `[0, 1]` after `elapsed` (quadratic in-out)
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        if t < 0.5 {
            2.0 * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
        }
    }
}

/// Build marker instances for the point layer at the given growth
pub fn build_point_instances(points: &[Point], growth: f32) -> Vec<PointInstance> {
    points
        .iter()
        .map(|point| {
            let base = surface_position(point.lat, point.lng);
            let tip = base * (1.0 + point.altitude * growth);
            PointInstance {
                base: base.to_array(),
                tip: tip.to_array(),
                color: color_to_linear(&point.color),
                radius: point.size.to_radians(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointStyle;
    use crate::data::{default_locations, derive_points};
    use glam::Vec3;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FBBC04"), Some([0xFB, 0xBC, 0x04, 255]));
        assert_eq!(parse_color("#fff"), Some([255, 255, 255, 255]));
        assert_eq!(parse_color("#00000080"), Some([0, 0, 0, 0x80]));
        assert_eq!(parse_color("White"), Some([255, 255, 255, 255]));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#GG0000"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_color_to_linear_bounds() {
        assert_eq!(color_to_linear("#000000"), [0.0, 0.0, 0.0, 1.0]);
        let white = color_to_linear("#FFFFFF");
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(color_to_linear("not a colour"), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transition_progress() {
        let transition = PointTransition::new(Duration::from_millis(2000));
        assert_eq!(transition.progress(Duration::ZERO), 0.0);
        assert!((transition.progress(Duration::from_millis(1000)) - 0.5).abs() < 1e-6);
        assert_eq!(transition.progress(Duration::from_millis(2000)), 1.0);
        assert_eq!(transition.progress(Duration::from_secs(60)), 1.0);

        let mut last = 0.0;
        for ms in (0..=2000).step_by(100) {
            let p = transition.progress(Duration::from_millis(ms));
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let transition = PointTransition::new(Duration::ZERO);
        assert_eq!(transition.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_instances_rise_to_altitude() {
        let points = derive_points(&default_locations(), &PointStyle::default());

        let grown = build_point_instances(&points, 1.0);
        for instance in &grown {
            let base = Vec3::from_array(instance.base);
            let tip = Vec3::from_array(instance.tip);
            assert!((base.length() - 1.0).abs() < 1e-5);
            assert!((tip.length() - 1.2).abs() < 1e-5);
            assert!((instance.radius - 0.5_f32.to_radians()).abs() < 1e-7);
        }

        let flat = build_point_instances(&points, 0.0);
        assert!(flat.iter().all(|i| i.base == i.tip));
    }
}
