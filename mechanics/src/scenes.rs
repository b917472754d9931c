//! Interactive scenes for the mechanics binary

use common::constants::FRAME_DT;
use common::{Canvas, Equation, Key, PointerEvent, Scene, Viewport, WheelEvent};
use glam::{DVec2, Vec2};

use crate::cradle::{CradleConfig, NewtonsCradle};
use crate::equations_ui::*;
use crate::faraday::FaradayExperiment;
use crate::hydraulics::HydraulicPress;
use crate::pendulum::{Pendulum, PendulumConfig};
use crate::projectile::{Launch, Projectile, ProjectileConfig};
use crate::renderer;

const MAX_TRAIL: usize = 400;

// ============================================================================
// Pendulum
// ============================================================================

pub struct PendulumScene {
    pendulum: Pendulum,
    release_angle: f32,
    steps_per_frame: u32,
    paused: bool,
    dragging: bool,
    trail: Vec<Vec2>,
    width: f32,
}

impl PendulumScene {
    pub fn new() -> Self {
        Self {
            pendulum: Pendulum::default(),
            release_angle: 30.0,
            steps_per_frame: 1,
            paused: false,
            dragging: false,
            trail: Vec::new(),
            width: 800.0,
        }
    }

    fn anchor(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, 100.0)
    }

    fn reset(&mut self) {
        self.pendulum.release(self.release_angle.to_radians());
        self.trail.clear();
    }
}

impl Default for PendulumScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PendulumScene {
    fn title(&self) -> &str {
        "Simple Pendulum"
    }

    fn update(&mut self, _dt: f32) {
        if self.paused || self.dragging {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.pendulum.step(FRAME_DT);
        }
        self.trail.push(self.pendulum.bob_position(self.anchor()));
        if self.trail.len() > MAX_TRAIL {
            self.trail.remove(0);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_pendulum(canvas, &self.pendulum, self.anchor(), &self.trail);
    }

    fn resize(&mut self, width: f32, _height: f32) {
        self.width = width;
        self.trail.clear();
    }

    fn pointer(&mut self, event: PointerEvent) {
        let anchor = self.anchor();
        match event {
            PointerEvent::Down { position, .. } => {
                let bob = self.pendulum.bob_position(anchor);
                self.dragging = position.distance(bob) < 30.0;
            }
            PointerEvent::Move { position, .. } if self.dragging => {
                let offset = position - anchor;
                self.pendulum.release(offset.x.atan2(offset.y));
                self.trail.clear();
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => self.dragging = false,
            _ => {}
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Space => self.paused = !self.paused,
            Key::Reset => self.reset(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        PENDULUM_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        PENDULUM_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let p = &self.pendulum;
        vec![
            ("Angle", format!("{:.1}°", p.angle.to_degrees())),
            ("ω", format!("{:.3} rad/s", p.angular_velocity)),
            ("KE", format!("{:.1} J", p.kinetic_energy())),
            ("PE", format!("{:.1} J", p.potential_energy())),
            ("Total", format!("{:.1} J", p.total_energy())),
            ("Period", format!("{:.2} s", p.small_angle_period())),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let config: &mut PendulumConfig = &mut self.pendulum.config;
        ui.add(egui::Slider::new(&mut config.gravity, 1.0..=25.0).text("Gravity (m/s²)"));
        ui.add(egui::Slider::new(&mut config.length, 50.0..=350.0).text("Length (px)"));
        ui.add(egui::Slider::new(&mut config.damping, 0.0..=0.5).text("Damping"));
        ui.add(egui::Slider::new(&mut config.mass, 1.0..=50.0).text("Mass (kg)"));
        ui.add(egui::Slider::new(&mut self.release_angle, -90.0..=90.0).text("Release angle (°)"));
        ui.add(egui::Slider::new(&mut self.steps_per_frame, 1..=20).text("Speed"));
        ui.horizontal(|ui| {
            let label = if self.paused { "Resume" } else { "Pause" };
            if ui.button(label).clicked() {
                self.paused = !self.paused;
            }
            if ui.button("Release").clicked() {
                self.reset();
            }
        });
    }
}

// ============================================================================
// Newton's Cradle
// ============================================================================

pub struct CradleScene {
    cradle: NewtonsCradle,
    running: bool,
    show_vectors: bool,
    show_energy: bool,
    steps_per_frame: u32,
}

const CRADLE_ANCHOR_Y: f32 = 100.0;

impl CradleScene {
    pub fn new() -> Self {
        Self {
            cradle: NewtonsCradle::default(),
            running: false,
            show_vectors: true,
            show_energy: false,
            steps_per_frame: 1,
        }
    }

    fn reset(&mut self) {
        self.running = false;
        self.cradle.reset();
    }
}

impl Default for CradleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for CradleScene {
    fn title(&self) -> &str {
        "Newton's Cradle"
    }

    fn update(&mut self, _dt: f32) {
        if !self.running {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.cradle.step(FRAME_DT);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_cradle(
            canvas,
            &self.cradle,
            CRADLE_ANCHOR_Y,
            self.show_vectors,
            self.show_energy,
        );
    }

    fn resize(&mut self, width: f32, _height: f32) {
        let shift = width / 2.0 - self.cradle.center_x;
        self.cradle.center_x += shift;
        for ball in &mut self.cradle.balls {
            ball.anchor_x += shift;
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Space => {
                if !self.running {
                    log::info!("Cradle released");
                }
                self.running = !self.running;
            }
            Key::Reset => self.reset(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        CRADLE_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        CRADLE_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let stats = self.cradle.stats();
        vec![
            ("Momentum", format!("{:.2}", stats.total_momentum)),
            ("Energy", format!("{:.2}", stats.total_energy)),
            ("Max angle", format!("{:.1}°", stats.max_angle)),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let mut config: CradleConfig = self.cradle.config;
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut config.ball_count, 2..=7).text("Balls"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut config.pulled, 1..=config.ball_count - 1).text("Pulled"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut config.pull_angle, 10.0..=60.0).text("Pull angle (°)"))
            .changed();
        ui.add(egui::Slider::new(&mut config.gravity, 1.0..=25.0).text("Gravity (m/s²)"));
        ui.add(egui::Slider::new(&mut config.damping, 0.0..=0.02).text("Damping"));
        ui.add(egui::Slider::new(&mut self.steps_per_frame, 1..=20).text("Speed"));
        ui.checkbox(&mut self.show_vectors, "Show velocity vectors");
        ui.checkbox(&mut self.show_energy, "Show energy bars");

        config.pulled = config.pulled.min(config.ball_count - 1);
        self.cradle.config = config;
        // layout changes only take effect on a fresh release
        if changed && !self.running {
            self.cradle.reset();
        }

        ui.horizontal(|ui| {
            let label = if self.running { "Stop" } else { "Start" };
            if ui.button(label).clicked() {
                self.running = !self.running;
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
        });
    }
}

// ============================================================================
// Faraday's Law
// ============================================================================

pub struct FaradayScene {
    experiment: FaradayExperiment,
    show_field: bool,
}

impl FaradayScene {
    pub fn new() -> Self {
        Self {
            experiment: FaradayExperiment::default(),
            show_field: true,
        }
    }
}

impl Default for FaradayScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for FaradayScene {
    fn title(&self) -> &str {
        "Faraday's Law of Induction"
    }

    fn update(&mut self, dt: f32) {
        self.experiment.step(dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_faraday(canvas, &self.experiment, self.show_field);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, .. } => {
                self.experiment.start_drag(position.x);
            }
            PointerEvent::Move { position, .. } => self.experiment.drag_to(position.x),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.experiment.end_drag(),
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Left => self.experiment.push(-1.0),
            Key::Right => self.experiment.push(1.0),
            Key::Reset => self.experiment.reset(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        FARADAY_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        FARADAY_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Flux", format!("{:.2} Wb", self.experiment.flux())),
            ("EMF", format!("{:.2} V", self.experiment.emf())),
            ("Current", format!("{:.3} A", self.experiment.current())),
            ("Velocity", format!("{:.2} u/s", self.experiment.velocity)),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.checkbox(&mut self.show_field, "Show magnetic field");
        ui.horizontal(|ui| {
            if ui.button("← Push Left").clicked() {
                self.experiment.push(-1.0);
            }
            if ui.button("Push Right →").clicked() {
                self.experiment.push(1.0);
            }
        });
        if ui.button("Reset").clicked() {
            self.experiment.reset();
        }
        ui.label("Drag the magnet through the coil");
    }
}

// ============================================================================
// Projectile Motion
// ============================================================================

pub struct ProjectileScene {
    projectile: Projectile,
    viewport: Viewport,
    paused: bool,
    pan_from: Option<Vec2>,
}

/// Pixel position of the launch point, measured from the bottom-left corner
const LAUNCH_MARGIN: f64 = 80.0;

impl ProjectileScene {
    pub fn new() -> Self {
        let mut viewport = Viewport::with_limits(800.0, 600.0, 2.0, 100.0);
        viewport.scale = 15.0;
        let mut scene = Self {
            projectile: Projectile::new(ProjectileConfig::default(), Launch::default()),
            viewport,
            paused: false,
            pan_from: None,
        };
        scene.frame_launch_point();
        scene
    }

    /// Put the launch point near the bottom-left corner
    fn frame_launch_point(&mut self) {
        let v = &mut self.viewport;
        v.center = DVec2::new(
            (v.width / 2.0 - LAUNCH_MARGIN) / v.scale,
            (v.height / 2.0 - LAUNCH_MARGIN) / v.scale,
        );
    }
}

impl Default for ProjectileScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for ProjectileScene {
    fn title(&self) -> &str {
        "Projectile Motion"
    }

    fn update(&mut self, dt: f32) {
        if !self.paused {
            self.projectile.step(dt);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_projectile(canvas, &self.projectile, &self.viewport);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width as f64, height as f64);
        self.frame_launch_point();
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, .. } => self.pan_from = Some(position),
            PointerEvent::Move { position, .. } => {
                if let Some(from) = self.pan_from {
                    self.viewport.pan((position - from).as_dvec2());
                    self.pan_from = Some(position);
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => self.pan_from = None,
        }
    }

    fn wheel(&mut self, event: WheelEvent) {
        self.viewport.zoom(event.delta as f64);
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Space => self.projectile.fire(),
            Key::Reset => {
                self.viewport.scale = 15.0;
                self.frame_launch_point();
                self.projectile.fire();
            }
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        PROJECTILE_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        PROJECTILE_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let p = &self.projectile;
        let g = p.config.gravity;
        vec![
            ("Time", format!("{:.2} s", p.time)),
            ("Speed", format!("{:.2} m/s", p.velocity.length())),
            ("Apex", format!("{:.2} m", p.apex)),
            ("Bounces", p.bounces.to_string()),
            ("Range (no drag)", format!("{:.2} m", p.launch.range(g))),
            ("Max height (no drag)", format!("{:.2} m", p.launch.max_height(g))),
            ("Flight time (no drag)", format!("{:.2} s", p.launch.time_of_flight(g))),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let launch = &mut self.projectile.launch;
        ui.add(egui::Slider::new(&mut launch.speed, 1.0..=50.0).text("Speed (m/s)"));
        ui.add(egui::Slider::new(&mut launch.angle, 0.0..=90.0).text("Angle (°)"));
        ui.add(egui::Slider::new(&mut launch.height, 0.0..=30.0).text("Height (m)"));
        let config = &mut self.projectile.config;
        ui.add(egui::Slider::new(&mut config.gravity, 1.0..=25.0).text("Gravity (m/s²)"));
        ui.add(egui::Slider::new(&mut config.drag, 0.0..=1.0).text("Drag (1/s)"));
        ui.add(egui::Slider::new(&mut config.restitution, 0.0..=0.95).text("Bounciness"));
        ui.horizontal(|ui| {
            if ui.button("Launch").clicked() {
                self.projectile.fire();
            }
            let label = if self.paused { "Resume" } else { "Pause" };
            if ui.button(label).clicked() {
                self.paused = !self.paused;
            }
        });
    }
}

// ============================================================================
// Pascal's Law
// ============================================================================

pub struct PressScene {
    press: HydraulicPress,
}

impl PressScene {
    pub fn new() -> Self {
        Self {
            press: HydraulicPress::default(),
        }
    }
}

impl Default for PressScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PressScene {
    fn title(&self) -> &str {
        "Pascal's Law"
    }

    fn update(&mut self, dt: f32) {
        self.press.step(dt);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_press(canvas, &self.press);
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Space => self.press.apply(),
            Key::Reset => self.press.reset(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        PASCAL_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        PASCAL_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pressure", format!("{:.2} N/cm²", self.press.pressure())),
            ("Output force", format!("{:.1} N", self.press.output_force())),
            ("MA", format!("{:.2}×", self.press.mechanical_advantage())),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let animating = self.press.is_animating();
        ui.add_enabled_ui(!animating, |ui| {
            ui.add(egui::Slider::new(&mut self.press.applied_force, 10.0..=200.0).step_by(5.0).text("Force (N)"));
            ui.add(egui::Slider::new(&mut self.press.small_area, 5.0..=30.0).text("Small piston (cm²)"));
            ui.add(egui::Slider::new(&mut self.press.large_area, 20.0..=100.0).text("Large piston (cm²)"));
        });
        ui.horizontal(|ui| {
            if ui.add_enabled(!animating, egui::Button::new("Apply Pressure")).clicked() {
                self.press.apply();
            }
            if ui.button("Reset").clicked() {
                self.press.reset();
            }
        });
    }
}
