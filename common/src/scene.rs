//! Scene lifecycle
//!
//! A [`Scene`] is one interactive page: state, stepper and renderer behind a
//! single object. [`FrameLoop`] plays the role of the animation-frame
//! scheduler. It holds at most one mounted scene and one pending frame
//! request; unmounting cancels the request so no frame ever runs against a
//! scene that has been torn down.

use crate::canvas::Canvas;
use crate::equations_ui::Equation;
use crate::input::{Key, PointerEvent, WheelEvent};

pub trait Scene {
    fn title(&self) -> &str;

    /// Advance the simulation by `dt` seconds of wall time
    fn update(&mut self, dt: f32);

    /// Draw the current state. Must not mutate simulation state.
    fn draw(&self, canvas: &mut dyn Canvas);

    fn resize(&mut self, _width: f32, _height: f32) {}

    fn pointer(&mut self, _event: PointerEvent) {}

    fn wheel(&mut self, _event: WheelEvent) {}

    fn key(&mut self, _key: Key) {}

    fn equations(&self) -> &'static [Equation] {
        &[]
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Live readouts shown in the control panel
    fn stats(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Parameter widgets (sliders, buttons) for the control panel
    fn controls(&mut self, _ui: &mut egui::Ui) {}
}

/// Handle of a scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Schedules frames for the mounted scene
#[derive(Default)]
pub struct FrameLoop {
    scene: Option<Box<dyn Scene>>,
    pending: Option<FrameRequest>,
    next_request: u64,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a scene, replacing (and unmounting) any current one
    pub fn mount(&mut self, scene: Box<dyn Scene>) {
        self.unmount();
        log::info!("Mounting scene '{}'", scene.title());
        self.scene = Some(scene);
        self.request_frame();
    }

    /// Tear down the current scene and cancel its pending frame
    pub fn unmount(&mut self) -> Option<Box<dyn Scene>> {
        if let Some(request) = self.pending.take() {
            log::debug!("Cancelled frame request {}", request.0);
        }
        let scene = self.scene.take();
        if let Some(scene) = &scene {
            log::info!("Unmounted scene '{}'", scene.title());
        }
        scene
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Frames run since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> Option<&dyn Scene> {
        self.scene.as_deref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        self.scene.as_deref_mut()
    }

    /// Run the pending frame: update, draw when a surface is available, then
    /// schedule the next one. Returns false when nothing was scheduled.
    pub fn tick(&mut self, dt: f32, surface: Option<&mut dyn Canvas>) -> bool {
        let Some(_request) = self.pending.take() else {
            return false;
        };
        let Some(scene) = self.scene.as_deref_mut() else {
            return false;
        };

        scene.update(dt);
        match surface {
            Some(canvas) => scene.draw(canvas),
            None => log::trace!("No drawing surface, skipping draw"),
        }

        self.frames += 1;
        self.request_frame();
        true
    }

    fn request_frame(&mut self) {
        self.next_request += 1;
        self.pending = Some(FrameRequest(self.next_request));
    }
}
