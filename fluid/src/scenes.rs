//! Interactive SPH scene

use common::{Canvas, Equation, Key, PointerButton, PointerEvent, Scene};
use glam::Vec2;

use crate::equations_ui::{SPH_EQUATIONS, SPH_VARIABLES};
use crate::particle::FluidKind;
use crate::renderer;
use crate::sph::FluidSimulation;

/// Particles added each frame while the pointer is held
pub const SPAWN_PER_FRAME: usize = 3;

pub struct FluidScene {
    simulation: FluidSimulation,
    kind: FluidKind,
    running: bool,
    show_velocity: bool,
    /// Pointer position while the primary button is held
    spawning: Option<Vec2>,
}

impl FluidScene {
    pub fn new() -> Self {
        Self {
            simulation: FluidSimulation::default(),
            kind: FluidKind::Water,
            running: false,
            show_velocity: false,
            spawning: None,
        }
    }

    /// Start always begins from an empty tank
    fn start(&mut self) {
        self.simulation.clear();
        self.running = true;
        log::info!("Fluid started with {}", self.kind.label());
    }

    fn reset(&mut self) {
        self.running = false;
        self.spawning = None;
        self.simulation.clear();
    }
}

impl Default for FluidScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for FluidScene {
    fn title(&self) -> &str {
        "Fluid Dynamics"
    }

    fn update(&mut self, _dt: f32) {
        if !self.running {
            return;
        }
        if let Some(at) = self.spawning {
            self.simulation
                .spawn(&mut rand::thread_rng(), at, SPAWN_PER_FRAME, self.kind);
        }
        self.simulation.step();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_fluid(canvas, &self.simulation, self.show_velocity, self.running);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.simulation.resize(width, height);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
                ..
            } if self.running => self.spawning = Some(position),
            PointerEvent::Move { position, .. } if self.spawning.is_some() => {
                self.spawning = Some(position);
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => self.spawning = None,
            _ => {}
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Space => {
                if self.running {
                    self.running = false;
                } else {
                    self.start();
                }
            }
            Key::Reset => self.reset(),
            Key::Char('w') => self.kind = FluidKind::Water,
            Key::Char('o') => self.kind = FluidKind::Oil,
            Key::Char('h') => self.kind = FluidKind::Honey,
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        SPH_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        SPH_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let stats = self.simulation.stats();
        vec![
            ("Particles", stats.particle_count.to_string()),
            ("Avg velocity", format!("{:.2}", stats.average_speed)),
            ("Avg density", format!("{:.2}", stats.average_density)),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in FluidKind::ALL {
                ui.selectable_value(&mut self.kind, kind, kind.label());
            }
        });
        ui.add(
            egui::Slider::new(&mut self.simulation.config.gravity, 0.0..=2.0)
                .step_by(0.1)
                .text("Gravity"),
        );
        ui.checkbox(&mut self.show_velocity, "Show velocity");
        ui.horizontal(|ui| {
            let label = if self.running { "Stop" } else { "Start" };
            if ui.button(label).clicked() {
                if self.running {
                    self.running = false;
                } else {
                    self.start();
                }
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
        });
        ui.label("Click and drag to spawn fluid particles");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;
    use common::{CommandRecorder, FrameLoop, Modifiers};

    fn press(scene: &mut FluidScene, position: Vec2) {
        scene.pointer(PointerEvent::Down {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
    }

    #[test]
    fn test_no_spawn_before_start() {
        let mut scene = FluidScene::new();
        press(&mut scene, Vec2::new(450.0, 200.0));
        scene.update(FRAME_DT);
        assert!(scene.simulation.is_empty());
    }

    #[test]
    fn test_held_pointer_spawns_each_frame() {
        let mut scene = FluidScene::new();
        scene.key(Key::Space);
        press(&mut scene, Vec2::new(450.0, 200.0));
        for _ in 0..4 {
            scene.update(FRAME_DT);
        }
        assert_eq!(scene.simulation.len(), 4 * SPAWN_PER_FRAME);

        scene.pointer(PointerEvent::Up {
            position: Vec2::new(450.0, 200.0),
            button: PointerButton::Primary,
        });
        scene.update(FRAME_DT);
        assert_eq!(scene.simulation.len(), 4 * SPAWN_PER_FRAME);
    }

    #[test]
    fn test_start_clears_tank() {
        let mut scene = FluidScene::new();
        scene.key(Key::Space);
        scene.key(Key::Char('h'));
        press(&mut scene, Vec2::new(300.0, 300.0));
        scene.update(FRAME_DT);
        assert!(scene.simulation.particles.iter().all(|p| p.kind == FluidKind::Honey));

        scene.key(Key::Space);
        scene.key(Key::Space);
        assert!(scene.simulation.is_empty());
    }

    #[test]
    fn test_runs_in_frame_loop() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.mount(Box::new(FluidScene::new()));
        let mut recorder = CommandRecorder::new(900.0, 600.0);
        assert!(frame_loop.tick(FRAME_DT, Some(&mut recorder)));
        assert!(recorder.count_fills() == 0);
        assert!(frame_loop.unmount().is_some());
    }
}
