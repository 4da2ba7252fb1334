//! Globe view: the scene controller behind the 3D viewport.
//!
//! Owns the live camera, turns pointer input into [`GlobeEvent`]s and
//! produces the per-frame render data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use glam::Vec2;

use super::markers::{build_point_instances, PointInstance, PointTransition};
use super::{Camera, CameraHandle, SceneRenderData};
use crate::config::GlobeConfig;
use crate::data::Point;
use crate::globe::{marker_footprints, pick_marker, GlobeEvent, SceneController};

pub struct GlobeView {
    camera: CameraHandle,
    auto_rotate: bool,
    auto_rotate_speed: f32,
    pointer_interaction: bool,
    points: Arc<Vec<Point>>,
    pick_radius_px: f32,
    hovered: Option<usize>,
    camera_drag: Option<egui::Pos2>,
    ready_emitted: bool,
    mounted_at: Instant,
    transition: PointTransition,
}

impl GlobeView {
    pub fn new(config: &GlobeConfig, points: Arc<Vec<Point>>) -> Self {
        Self {
            camera: CameraHandle::new(Camera::from_point_of_view(&config.point_of_view)),
            auto_rotate: false,
            auto_rotate_speed: config.auto_rotate_speed,
            pointer_interaction: false,
            points,
            pick_radius_px: config.pick_radius_px,
            hovered: None,
            camera_drag: None,
            ready_emitted: false,
            mounted_at: Instant::now(),
            transition: PointTransition::new(Duration::from_millis(config.points.transition_ms)),
        }
    }

    /// Advance time-based state by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.auto_rotate {
            self.camera.write().auto_rotate(dt, self.auto_rotate_speed);
        }
    }

    /// Current marker growth in `[0, 1]`
    pub fn growth(&self) -> f32 {
        self.transition.progress(self.mounted_at.elapsed())
    }

    pub fn instances(&self) -> Vec<PointInstance> {
        build_point_instances(&self.points, self.growth())
    }

    pub fn render_data(&self, aspect_ratio: f32) -> SceneRenderData {
        SceneRenderData {
            camera: self.camera.snapshot(),
            aspect_ratio,
            points: Arc::new(self.instances()),
        }
    }

    /// Apply pointer input over `viewport_rect` and collect the resulting events
    pub fn handle_input(&mut self, ctx: &egui::Context, viewport_rect: egui::Rect) -> Vec<GlobeEvent> {
        let mut events = Vec::new();
        if !self.pointer_interaction {
            return events;
        }

        let input = ctx.input(|i| i.clone());
        let pointer = input
            .pointer
            .hover_pos()
            .filter(|pos| viewport_rect.contains(*pos));

        if let Some(pos) = pointer {
            // Scroll to zoom
            let scroll = input.raw_scroll_delta.y;
            if scroll != 0.0 {
                self.camera.write().zoom(scroll * 0.01);
            }

            // Drag to orbit
            if input.pointer.button_down(egui::PointerButton::Primary) {
                if let Some(last_pos) = self.camera_drag {
                    let delta = pos - last_pos;
                    self.camera.write().orbit(delta.x, delta.y);
                }
                self.camera_drag = Some(pos);
            } else {
                self.camera_drag = None;
            }
        } else {
            self.camera_drag = None;
        }

        let local = pointer.map(|pos| Vec2::new(pos.x - viewport_rect.min.x, pos.y - viewport_rect.min.y));
        let viewport = Vec2::new(viewport_rect.width(), viewport_rect.height());
        events.extend(self.pointer_moved(local, viewport));

        if input.pointer.primary_clicked() {
            events.extend(self.pointer_clicked());
        }
        events
    }

    /// Re-pick under the pointer; emits only when the hovered point changes
    pub fn pointer_moved(&mut self, pointer: Option<Vec2>, viewport: Vec2) -> Option<GlobeEvent> {
        if !self.pointer_interaction {
            return None;
        }
        let hovered = pointer.and_then(|pointer| {
            let camera = self.camera.read();
            let footprints = marker_footprints(&self.points, &camera, viewport, self.growth());
            pick_marker(&footprints, pointer, self.pick_radius_px)
        });
        if hovered == self.hovered {
            return None;
        }
        self.hovered = hovered;
        Some(GlobeEvent::PointHover(hovered))
    }

    pub fn pointer_clicked(&self) -> Option<GlobeEvent> {
        if !self.pointer_interaction {
            return None;
        }
        self.hovered.map(GlobeEvent::PointClick)
    }

    /// `GlobeReady` after the first rendered frame, nothing afterwards
    pub fn frame_rendered(&mut self) -> Option<GlobeEvent> {
        if self.ready_emitted {
            return None;
        }
        self.ready_emitted = true;
        Some(GlobeEvent::GlobeReady)
    }

    #[cfg(test)]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[cfg(test)]
    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    #[cfg(test)]
    pub fn is_pointer_interactive(&self) -> bool {
        self.pointer_interaction
    }
}

impl SceneController for GlobeView {
    fn set_auto_rotate(&mut self, enabled: bool) {
        log::debug!("Auto-rotate {}", if enabled { "on" } else { "off" });
        self.auto_rotate = enabled;
    }

    fn set_pointer_interaction(&mut self, enabled: bool) {
        self.pointer_interaction = enabled;
        if !enabled {
            self.hovered = None;
            self.camera_drag = None;
        }
    }

    fn camera(&self) -> CameraHandle {
        self.camera.clone()
    }
}
