//! globeview - interactive 3D globe with points of interest
//!
//! Renders a rotating textured globe with a marker and label for each
//! location. Hovering a marker shows an info bubble anchored to it; clicking
//! one stops the auto-rotation.

mod config;
mod data;
mod globe;
mod renderer;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use glam::Vec2;

use config::GlobeConfig;
use data::{default_locations, derive_points, load_locations, Point};
use globe::{marker_footprints, GlobeSession, SceneController};
use renderer::{
    color_to_linear, load_texture_or, parse_color, GlobeCallback, GlobeRenderResources,
    GlobeTextures, GlobeView,
};
use ui::{bubble_layout, draw_labels, label_color, label_placements, InfoBubble};

/// Flat colours used when the globe textures cannot be read
const OCEAN_FALLBACK: [u8; 4] = [18, 52, 110, 255];
const FLAT_BUMP: [u8; 4] = [128, 128, 128, 255];

#[derive(Parser, Debug)]
#[command(name = "globeview", about = "Interactive 3D globe with points of interest")]
struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of locations to show instead of the built-in ones
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Directory holding the globe textures and location images
    #[arg(long)]
    assets: Option<PathBuf>,

    #[arg(long)]
    width: Option<f32>,

    #[arg(long)]
    height: Option<f32>,

    #[arg(long)]
    no_auto_rotate: bool,
}

impl Cli {
    fn load_config(&self) -> Result<GlobeConfig> {
        let mut config = match &self.config {
            Some(path) => GlobeConfig::load(path)?,
            None => GlobeConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GlobeConfig) {
        if let Some(assets) = &self.assets {
            config.assets_dir = assets.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.no_auto_rotate {
            config.auto_rotate = false;
        }
    }
}

fn to_color32(value: &str, fallback: egui::Color32) -> egui::Color32 {
    parse_color(value)
        .map(|[r, g, b, a]| egui::Color32::from_rgba_unmultiplied(r, g, b, a))
        .unwrap_or(fallback)
}

/// Application state
pub struct GlobeApp {
    config: GlobeConfig,
    session: GlobeSession<GlobeView>,
    bubble: InfoBubble,

    // 3D Renderer state
    wgpu_initialized: bool,

    // Frame timing
    last_frame_time: Instant,
}

impl GlobeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GlobeConfig, points: Vec<Point>) -> Self {
        let points = Arc::new(points);
        let view = GlobeView::new(&config, Arc::clone(&points));
        let session = GlobeSession::mount(view, points, config.auto_rotate);

        // Initialize wgpu renderer if available
        let wgpu_initialized = if let Some(wgpu_render_state) = &cc.wgpu_render_state {
            let device = &wgpu_render_state.device;
            let queue = &wgpu_render_state.queue;
            let target_format = wgpu_render_state.target_format;

            let textures = GlobeTextures {
                color: load_texture_or(config.globe_image_path(), OCEAN_FALLBACK),
                bump: load_texture_or(config.bump_image_path(), FLAT_BUMP).into_linear(),
            };
            let [r, g, b, a] = color_to_linear(&config.background_color);
            let clear_color = wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            };
            let size = (config.width.max(1.0) as u32, config.height.max(1.0) as u32);

            match GlobeRenderResources::new(
                device,
                queue,
                target_format,
                size,
                &textures,
                clear_color,
            ) {
                Ok(resources) => {
                    wgpu_render_state
                        .renderer
                        .write()
                        .callback_resources
                        .insert(resources);
                    log::info!("wgpu 3D renderer initialized successfully");
                    true
                }
                Err(e) => {
                    log::error!("Failed to initialize wgpu renderer: {:#}", e);
                    false
                }
            }
        } else {
            log::warn!("No wgpu render state available, using 2D fallback");
            false
        };

        Self {
            bubble: InfoBubble::new(),
            config,
            session,
            wgpu_initialized,
            last_frame_time: Instant::now(),
        }
    }

    /// Feed pointer input through the view into the session
    fn process_input(&mut self, ctx: &egui::Context, viewport_rect: egui::Rect) {
        let events = self.session.controller_mut().handle_input(ctx, viewport_rect);
        for event in events {
            self.session.handle_event(event);
        }
    }

    fn render_3d_viewport(&mut self, ui: &mut egui::Ui, frame: &eframe::Frame) {
        let viewport_rect = ui.available_rect_before_wrap();
        let pixels_per_point = ui.ctx().pixels_per_point();
        let viewport_width = (viewport_rect.width() * pixels_per_point).round().max(1.0) as u32;
        let viewport_height = (viewport_rect.height() * pixels_per_point).round().max(1.0) as u32;

        self.process_input(ui.ctx(), viewport_rect);

        let aspect_ratio = viewport_rect.width() / viewport_rect.height().max(1.0);
        if let Some(wgpu_render_state) = frame.wgpu_render_state() {
            let renderer = wgpu_render_state.renderer.read();
            if let Some(resources) = renderer.callback_resources.get::<GlobeRenderResources>() {
                resources.set_render_data(self.session.controller().render_data(aspect_ratio));
            }
        }

        let (response, painter) =
            ui.allocate_painter(viewport_rect.size(), egui::Sense::click_and_drag());

        painter.add(egui_wgpu::Callback::new_paint_callback(
            response.rect,
            GlobeCallback {
                viewport_size: (viewport_width, viewport_height),
            },
        ));

        self.draw_overlays(ui.ctx(), &painter, response.rect);
    }

    fn render_2d_fallback(&mut self, ui: &mut egui::Ui) {
        let viewport_rect = ui.available_rect_before_wrap();
        self.process_input(ui.ctx(), viewport_rect);

        let (response, painter) =
            ui.allocate_painter(viewport_rect.size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(
            rect,
            0.0,
            to_color32(&self.config.background_color, egui::Color32::BLACK),
        );

        let camera = self.session.controller().camera().snapshot();
        let viewport = Vec2::new(rect.width(), rect.height());

        // Apparent radius of the unit globe seen from the camera distance
        let pixels_per_unit = rect.height() / (2.0 * (camera.fov * 0.5).tan());
        let angular_radius = (1.0 / camera.distance).clamp(-1.0, 1.0).asin();
        let globe_radius = angular_radius.tan() * pixels_per_unit;
        let center = rect.center();

        painter.circle_filled(center, globe_radius, egui::Color32::from_rgb(25, 60, 120));
        painter.circle_stroke(
            center,
            globe_radius,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(50, 100, 180)),
        );

        // Atmosphere glow
        for i in 1..=3 {
            let r = globe_radius * (1.0 + i as f32 * 0.03);
            let alpha = (40 - i * 10) as u8;
            painter.circle_stroke(
                center,
                r,
                egui::Stroke::new(
                    2.0,
                    egui::Color32::from_rgba_unmultiplied(100, 150, 255, alpha),
                ),
            );
        }

        let view = self.session.controller();
        let points = self.session.points();
        for footprint in marker_footprints(points, &camera, viewport, view.growth()) {
            let Some(point) = points.get(footprint.index) else {
                continue;
            };
            let color = to_color32(&point.color, egui::Color32::WHITE);
            let base = rect.min + egui::vec2(footprint.base.x, footprint.base.y);
            let tip = rect.min + egui::vec2(footprint.tip.x, footprint.tip.y);
            painter.line_segment([base, tip], egui::Stroke::new(3.0, color));
            painter.circle_filled(tip, 2.5, color);
        }

        painter.text(
            rect.left_top() + egui::vec2(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            "Drag to orbit | Scroll to zoom | 2D Fallback (wgpu not available)",
            egui::FontId::monospace(12.0),
            egui::Color32::from_rgb(150, 150, 150),
        );

        self.draw_overlays(ui.ctx(), &painter, rect);
    }

    /// Labels and the info bubble, shared by both render paths
    fn draw_overlays(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let viewport = Vec2::new(rect.width(), rect.height());

        let camera = self.session.controller().camera().snapshot();
        let labels = label_placements(self.session.points(), &camera, viewport, &self.config.labels);
        draw_labels(painter, rect.min, &labels, label_color(&self.config.labels));

        let position = self.session.bubble_position(viewport);
        if let Some(layout) = bubble_layout(self.session.hover_info(), position, rect.min) {
            self.bubble.show(ctx, &layout, &self.config);
        }
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = Instant::now();
        // Clamp so a stalled frame does not spin the globe
        let dt = (now - self.last_frame_time).as_secs_f32().min(0.1);
        self.last_frame_time = now;

        self.session.controller_mut().advance(dt);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if self.wgpu_initialized {
                    self.render_3d_viewport(ui, frame);
                } else {
                    self.render_2d_fallback(ui);
                }
            });

        if let Some(event) = self.session.controller_mut().frame_rendered() {
            self.session.handle_event(event);
        }

        ctx.request_repaint();
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting globeview...");

    let config = cli.load_config()?;
    let locations = match &cli.locations {
        Some(path) => load_locations(path)?,
        None => default_locations(),
    };
    let points = derive_points(&locations, &config.points);
    log::info!("Showing {} points", points.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_title("globeview"),
        renderer: eframe::Renderer::Wgpu, // Force wgpu renderer
        ..Default::default()
    };

    eframe::run_native(
        "globeview",
        options,
        Box::new(move |cc| Ok(Box::new(GlobeApp::new(cc, config, points)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
