//! Globe configuration
//!
//! Every tunable of the widget lives here. Defaults reproduce the stock
//! widget; a JSON file may override any subset of fields.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Initial camera orientation around the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOfView {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Distance from the globe surface, in globe radii
    pub altitude: f64,
}

impl Default for PointOfView {
    fn default() -> Self {
        Self {
            lat: 20.0,
            lng: 0.0,
            altitude: 2.0,
        }
    }
}

/// Rendering attributes applied to every point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Marker radius in angular degrees
    pub size: f32,
    pub color: String,
    /// Marker column height in globe radii
    pub altitude: f32,
    /// Time for markers to grow to full altitude after mount
    pub transition_ms: u64,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 0.5,
            color: "#FBBC04".to_string(),
            altitude: 0.2,
            transition_ms: 2000,
        }
    }
}

/// Point label layer attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Text height in angular degrees
    pub size: f32,
    pub color: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 0.7,
            color: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Window inner width in points
    pub width: f32,
    /// Window inner height in points
    pub height: f32,
    pub background_color: String,
    /// Directory holding textures and location images
    pub assets_dir: PathBuf,
    /// Globe colour texture, relative to `assets_dir`
    pub globe_image: PathBuf,
    /// Globe bump map, relative to `assets_dir`
    pub bump_image: PathBuf,
    pub point_of_view: PointOfView,
    pub auto_rotate: bool,
    /// Orbit-controls speed unit: one revolution every `60 / speed` seconds
    pub auto_rotate_speed: f32,
    pub points: PointStyle,
    pub labels: LabelStyle,
    /// Pointer distance in pixels within which a marker counts as hovered
    pub pick_radius_px: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            background_color: "#000000".to_string(),
            assets_dir: PathBuf::from("assets"),
            globe_image: PathBuf::from("earth-blue-marble.jpg"),
            bump_image: PathBuf::from("earth-topology.png"),
            point_of_view: PointOfView::default(),
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            points: PointStyle::default(),
            labels: LabelStyle::default(),
            pick_radius_px: 8.0,
        }
    }
}

impl GlobeConfig {
    /// Load a config file; fields missing from the file keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading config from {:?}", path);

        let file =
            File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: GlobeConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    pub fn globe_image_path(&self) -> PathBuf {
        self.assets_dir.join(&self.globe_image)
    }

    pub fn bump_image_path(&self) -> PathBuf {
        self.assets_dir.join(&self.bump_image)
    }

    pub fn location_image_path(&self, image: &str) -> PathBuf {
        self.assets_dir.join(image)
    }
}
