//! Info bubble for the hovered point

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use egui::{Color32, RichText};
use glam::Vec2;

use crate::config::GlobeConfig;
use crate::globe::HoverInfo;

/// Outer width limit of the bubble, padding included
pub const BUBBLE_MAX_WIDTH: f32 = 300.0;
pub const BUBBLE_PADDING: f32 = 10.0;
/// Widest the bubble contents may get inside the padding
pub const BUBBLE_CONTENT_WIDTH: f32 = BUBBLE_MAX_WIDTH - 2.0 * BUBBLE_PADDING;
pub const BUBBLE_CORNER_RADIUS: f32 = 8.0;
pub const BUBBLE_IMAGE_SIZE: egui::Vec2 = egui::vec2(200.0, 150.0);

/// Everything needed to draw the bubble for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    /// Screen position of the bubble's bottom centre
    pub anchor: egui::Pos2,
    pub title: String,
    pub image: String,
    pub description: String,
}

/// Lay out the bubble at `position` (pixels inside the viewport starting at
/// `origin`). No hovered point means no bubble.
pub fn bubble_layout(
    info: Option<&HoverInfo>,
    position: Vec2,
    origin: egui::Pos2,
) -> Option<BubbleLayout> {
    let info = info?;
    Some(BubbleLayout {
        anchor: origin + egui::vec2(position.x, position.y),
        title: info.name.clone(),
        image: info.image.clone(),
        description: info.description.clone(),
    })
}

fn load_color_image(path: &Path) -> Result<egui::ColorImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to load image: {:?}", path))?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

/// Draws the bubble and caches its images as egui textures
#[derive(Default)]
pub struct InfoBubble {
    images: HashMap<String, Option<egui::TextureHandle>>,
}

impl InfoBubble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for an image key; failed loads are remembered and not retried
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        key: &str,
        config: &GlobeConfig,
    ) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.images.get(key) {
            return cached.clone();
        }

        let path = config.location_image_path(key);
        let texture = match load_color_image(&path) {
            Ok(image) => Some(ctx.load_texture(key, image, egui::TextureOptions::LINEAR)),
            Err(e) => {
                log::debug!("{:#}", e);
                None
            }
        };
        self.images.insert(key.to_string(), texture.clone());
        texture
    }

    pub fn show(&mut self, ctx: &egui::Context, layout: &BubbleLayout, config: &GlobeConfig) {
        let texture = self.texture(ctx, &layout.image, config);

        egui::Area::new(egui::Id::new("info_bubble"))
            .fixed_pos(layout.anchor)
            .pivot(egui::Align2::CENTER_BOTTOM)
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(Color32::WHITE)
                    .stroke(egui::Stroke::new(1.0, Color32::BLACK))
                    .corner_radius(BUBBLE_CORNER_RADIUS)
                    .inner_margin(BUBBLE_PADDING)
                    .show(ui, |ui| {
                        ui.set_max_width(BUBBLE_CONTENT_WIDTH);
                        ui.label(RichText::new(&layout.title).heading().color(Color32::BLACK));
                        if let Some(texture) = &texture {
                            ui.add(egui::Image::new(egui::load::SizedTexture::new(
                                texture.id(),
                                BUBBLE_IMAGE_SIZE,
                            )));
                        }
                        ui.add(
                            egui::Label::new(
                                RichText::new(&layout.description).color(Color32::BLACK),
                            )
                            .wrap(),
                        );
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> HoverInfo {
        HoverInfo {
            name: "London".to_string(),
            image: "london.jpg".to_string(),
            description: "London is the capital of England and the United Kingdom.".to_string(),
            lat: 51.5074,
            lng: -0.1278,
        }
    }

    #[test]
    fn test_no_bubble_without_hover() {
        assert_eq!(bubble_layout(None, Vec2::new(10.0, 10.0), egui::Pos2::ZERO), None);
    }

    #[test]
    fn test_bubble_anchored_at_projection() {
        let info = london();
        let layout = bubble_layout(Some(&info), Vec2::new(640.0, 200.0), egui::pos2(0.0, 24.0))
            .unwrap();
        assert_eq!(layout.anchor, egui::pos2(640.0, 224.0));
        assert_eq!(layout.title, "London");
        assert_eq!(layout.image, "london.jpg");
        assert_eq!(layout.description, info.description);
    }

    #[test]
    fn test_content_width_leaves_room_for_padding() {
        assert_eq!(BUBBLE_CONTENT_WIDTH + 2.0 * BUBBLE_PADDING, BUBBLE_MAX_WIDTH);
        assert!(BUBBLE_IMAGE_SIZE.x <= BUBBLE_CONTENT_WIDTH);
    }

    #[test]
    fn test_missing_image_is_cached_as_absent() {
        let ctx = egui::Context::default();
        let config = GlobeConfig {
            assets_dir: "/nonexistent/assets".into(),
            ..Default::default()
        };
        let mut bubble = InfoBubble::new();
        assert!(bubble.texture(&ctx, "london.jpg", &config).is_none());
        assert!(bubble.images.contains_key("london.jpg"));
        assert!(bubble.texture(&ctx, "london.jpg", &config).is_none());
    }

    #[test]
    fn test_image_loaded_once_from_assets_dir() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 10, 10, 255]))
            .save(dir.path().join("pin.png"))
            .unwrap();
        let config = GlobeConfig {
            assets_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let ctx = egui::Context::default();
        let mut bubble = InfoBubble::new();
        let first = bubble.texture(&ctx, "pin.png", &config).unwrap();
        assert_eq!(first.size(), [4, 3]);
        let second = bubble.texture(&ctx, "pin.png", &config).unwrap();
        assert_eq!(first.id(), second.id());
    }
}
