//! Globe session: hover state, camera capture and the mounted lifetime of a
//! scene controller.

use std::sync::Arc;

use glam::Vec2;

use super::projection::bubble_position;
use super::{AutoRotation, HoverInfo};
use crate::data::Point;
use crate::renderer::CameraHandle;

/// Operations the session drives on the globe renderer
pub trait SceneController {
    fn set_auto_rotate(&mut self, enabled: bool);
    fn set_pointer_interaction(&mut self, enabled: bool);
    /// Handle to the live scene camera
    fn camera(&self) -> CameraHandle;
}

/// Events emitted by the globe renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeEvent {
    /// Pointer moved onto a point (by index) or off all points
    PointHover(Option<usize>),
    PointClick(usize),
    /// First frame has been rendered
    GlobeReady,
}

/// State owned by one mounted globe.
///
/// Mounting enables pointer interaction and auto-rotation on the controller;
/// dropping the session (or calling [`GlobeSession::unmount`]) turns both off
/// again.
pub struct GlobeSession<C: SceneController> {
    controller: C,
    points: Arc<Vec<Point>>,
    hover_info: Option<HoverInfo>,
    camera: Option<CameraHandle>,
    rotation: AutoRotation,
    mounted: bool,
}

impl<C: SceneController> GlobeSession<C> {
    pub fn mount(mut controller: C, points: Arc<Vec<Point>>, auto_rotate: bool) -> Self {
        controller.set_pointer_interaction(true);
        controller.set_auto_rotate(auto_rotate);
        log::info!("Globe mounted with {} points", points.len());

        Self {
            controller,
            points,
            hover_info: None,
            camera: None,
            rotation: AutoRotation::new(auto_rotate),
            mounted: true,
        }
    }

    pub fn handle_event(&mut self, event: GlobeEvent) {
        if !self.mounted {
            return;
        }
        match event {
            GlobeEvent::PointHover(index) => {
                let points = Arc::clone(&self.points);
                self.on_hover(index.and_then(|i| points.get(i)));
            }
            GlobeEvent::PointClick(index) => {
                let points = Arc::clone(&self.points);
                if let Some(point) = points.get(index) {
                    self.on_click(point);
                }
            }
            GlobeEvent::GlobeReady => self.on_globe_ready(),
        }
    }

    /// Mirror the hovered point, or clear when the pointer left all points
    pub fn on_hover(&mut self, point: Option<&Point>) {
        let info = point.map(HoverInfo::from);
        if info != self.hover_info {
            log::debug!(
                "Hover: {}",
                info.as_ref().map(|i| i.name.as_str()).unwrap_or("<none>")
            );
        }
        self.hover_info = info;
    }

    /// Any point click stops auto-rotation for the rest of the session
    pub fn on_click(&mut self, point: &Point) {
        if self.rotation.stop() {
            log::debug!("Clicked {}, stopping auto-rotation", point.name);
            self.controller.set_auto_rotate(false);
        }
    }

    /// Capture the scene camera; only the first call has any effect
    pub fn on_globe_ready(&mut self) {
        if self.camera.is_none() {
            log::debug!("Globe ready, camera captured");
            self.camera = Some(self.controller.camera());
        }
    }

    /// Release the controller: auto-rotation and pointer interaction off
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.controller.set_auto_rotate(false);
        self.controller.set_pointer_interaction(false);
        log::info!("Globe unmounted");
    }

    pub fn hover_info(&self) -> Option<&HoverInfo> {
        self.hover_info.as_ref()
    }

    #[cfg(test)]
    pub fn camera(&self) -> Option<&CameraHandle> {
        self.camera.as_ref()
    }

    #[cfg(test)]
    pub fn is_auto_rotating(&self) -> bool {
        self.rotation.is_rotating()
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn points(&self) -> &Arc<Vec<Point>> {
        &self.points
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Pixel anchor for the info bubble in a viewport of the given size
    pub fn bubble_position(&self, viewport: Vec2) -> Vec2 {
        bubble_position(self.hover_info.as_ref(), self.camera.as_ref(), viewport)
    }
}

impl<C: SceneController> Drop for GlobeSession<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointStyle;
    use crate::data::{default_locations, derive_points};
    use crate::globe::FALLBACK_POSITION;
    use crate::renderer::Camera;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AutoRotate(bool),
        PointerInteraction(bool),
        Camera,
    }

    /// Records every call so tests can inspect them after the session is gone
    #[derive(Clone)]
    struct FakeController {
        calls: Arc<Mutex<Vec<Call>>>,
        camera: CameraHandle,
    }

    impl FakeController {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                camera: CameraHandle::new(Camera::default()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }
    }

    impl SceneController for FakeController {
        fn set_auto_rotate(&mut self, enabled: bool) {
            self.calls.lock().push(Call::AutoRotate(enabled));
        }

        fn set_pointer_interaction(&mut self, enabled: bool) {
            self.calls.lock().push(Call::PointerInteraction(enabled));
        }

        fn camera(&self) -> CameraHandle {
            self.calls.lock().push(Call::Camera);
            self.camera.clone()
        }
    }

    fn mount(fake: &FakeController) -> GlobeSession<FakeController> {
        let points = derive_points(&default_locations(), &PointStyle::default());
        GlobeSession::mount(fake.clone(), Arc::new(points), true)
    }

    #[test]
    fn test_mount_enables_controller() {
        let fake = FakeController::new();
        let session = mount(&fake);

        assert!(session.is_mounted());
        assert!(session.is_auto_rotating());
        assert_eq!(
            fake.calls(),
            vec![Call::PointerInteraction(true), Call::AutoRotate(true)]
        );
    }

    #[test]
    fn test_hover_round_trip() {
        let fake = FakeController::new();
        let mut session = mount(&fake);

        session.handle_event(GlobeEvent::PointHover(Some(0)));
        assert_eq!(session.hover_info().map(|i| i.name.as_str()), Some("London"));

        session.handle_event(GlobeEvent::PointHover(None));
        assert!(session.hover_info().is_none());
    }

    #[test]
    fn test_repeated_hover_is_idempotent() {
        let fake = FakeController::new();
        let mut session = mount(&fake);

        session.handle_event(GlobeEvent::PointHover(Some(2)));
        let first = session.hover_info().cloned();
        session.handle_event(GlobeEvent::PointHover(Some(2)));
        session.handle_event(GlobeEvent::PointHover(Some(2)));

        assert_eq!(session.hover_info().cloned(), first);
        assert_eq!(first.map(|i| i.name), Some("New York".to_string()));
    }

    #[test]
    fn test_hover_unknown_index_clears() {
        let fake = FakeController::new();
        let mut session = mount(&fake);

        session.handle_event(GlobeEvent::PointHover(Some(0)));
        session.handle_event(GlobeEvent::PointHover(Some(42)));
        assert!(session.hover_info().is_none());
    }

    #[test]
    fn test_click_stops_rotation_once() {
        let fake = FakeController::new();
        let mut session = mount(&fake);

        session.handle_event(GlobeEvent::PointClick(1));
        assert!(!session.is_auto_rotating());
        session.handle_event(GlobeEvent::PointClick(0));
        session.handle_event(GlobeEvent::PointClick(2));
        assert!(!session.is_auto_rotating());

        let stops = fake
            .calls()
            .iter()
            .filter(|c| **c == Call::AutoRotate(false))
            .count();
        assert_eq!(stops, 1);
        assert!(!fake.calls().contains(&Call::Camera));
    }

    #[test]
    fn test_camera_captured_once() {
        let fake = FakeController::new();
        let mut session = mount(&fake);
        assert!(session.camera().is_none());

        session.handle_event(GlobeEvent::GlobeReady);
        session.handle_event(GlobeEvent::GlobeReady);

        let captured = session.camera().expect("camera captured");
        assert!(captured.same_camera(&fake.camera));
        let fetches = fake.calls().iter().filter(|c| **c == Call::Camera).count();
        assert_eq!(fetches, 1);
    }

    #[test]
    fn test_bubble_needs_camera() {
        let fake = FakeController::new();
        let mut session = mount(&fake);
        let viewport = Vec2::new(1920.0, 1080.0);

        session.handle_event(GlobeEvent::PointHover(Some(0)));
        assert_eq!(session.bubble_position(viewport), FALLBACK_POSITION);

        session.handle_event(GlobeEvent::GlobeReady);
        assert_ne!(session.bubble_position(viewport), FALLBACK_POSITION);

        session.handle_event(GlobeEvent::PointHover(None));
        assert_eq!(session.bubble_position(viewport), FALLBACK_POSITION);
    }

    #[test]
    fn test_drop_tears_down_controller() {
        let fake = FakeController::new();
        {
            let _session = mount(&fake);
        }
        let calls = fake.calls();
        assert_eq!(
            &calls[calls.len() - 2..],
            &[Call::AutoRotate(false), Call::PointerInteraction(false)]
        );
    }

    #[test]
    fn test_no_events_after_unmount() {
        let fake = FakeController::new();
        let mut session = mount(&fake);
        session.unmount();
        session.unmount();

        session.handle_event(GlobeEvent::PointHover(Some(0)));
        session.handle_event(GlobeEvent::GlobeReady);
        assert!(session.hover_info().is_none());
        assert!(session.camera().is_none());

        let teardowns = fake
            .calls()
            .iter()
            .filter(|c| **c == Call::PointerInteraction(false))
            .count();
        assert_eq!(teardowns, 1);
    }
}
