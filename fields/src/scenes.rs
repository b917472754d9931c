//! Interactive scenes for the field binary

use common::{Canvas, Equation, Key, PointerButton, PointerEvent, Scene};

use crate::electric::{ElectricField, SPACING_RANGE};
use crate::equations_ui::*;
use crate::magnetic::{MagneticField, WireConfiguration, CURRENT_RANGE};
use crate::renderer;

// ============================================================================
// Electric Field
// ============================================================================

pub struct ElectricScene {
    field: ElectricField,
    show_field: bool,
    show_force: bool,
    /// Primary button held on empty space moves the test charge
    probing: bool,
}

impl ElectricScene {
    pub fn new() -> Self {
        Self {
            field: ElectricField::default(),
            show_field: true,
            show_force: false,
            probing: false,
        }
    }
}

impl Default for ElectricScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for ElectricScene {
    fn title(&self) -> &str {
        "Electric Field"
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_electric(canvas, &self.field, self.show_field, self.show_force);
    }

    fn pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
                ..
            } => {
                let grabbed = self.field.start_drag(position);
                if self.show_force {
                    self.field.test_point = position;
                    self.probing = !grabbed;
                }
            }
            PointerEvent::Move { position, .. } => {
                if self.field.is_dragging() {
                    self.field.drag_to(position);
                } else if self.probing {
                    self.field.test_point = position;
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => {
                self.field.end_drag();
                self.probing = false;
            }
            _ => {}
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Plus => self.field.add_charge(1.0),
            Key::Minus => self.field.add_charge(-1.0),
            Key::Delete => {
                self.field.remove_last();
            }
            Key::Char('f') => self.show_force = !self.show_force,
            Key::Reset => self.field.reset(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        ELECTRIC_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        ELECTRIC_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let positive = self.field.charges.iter().filter(|c| c.is_positive()).count();
        vec![
            ("Charges", self.field.charges.len().to_string()),
            ("Positive", positive.to_string()),
            ("Negative", (self.field.charges.len() - positive).to_string()),
            ("|E| at test charge", format!("{:.2e}", self.field.test_force().length())),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.checkbox(&mut self.show_field, "Show field lines");
        ui.checkbox(&mut self.show_force, "Show force vector");
        let mut spacing = self.field.spacing;
        if ui
            .add(egui::Slider::new(&mut spacing, SPACING_RANGE).text("Field density (px)"))
            .changed()
        {
            self.field.set_spacing(spacing);
        }
        ui.horizontal(|ui| {
            if ui.button("Add Positive (+)").clicked() {
                self.field.add_charge(1.0);
            }
            if ui.button("Add Negative (−)").clicked() {
                self.field.add_charge(-1.0);
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Remove Last").clicked() {
                self.field.remove_last();
            }
            if ui.button("Reset").clicked() {
                self.field.reset();
            }
        });
        ui.label("Drag charges to move them");
    }
}

// ============================================================================
// Magnetic Field
// ============================================================================

pub struct MagneticScene {
    field: MagneticField,
    show_compass: bool,
}

impl MagneticScene {
    pub fn new() -> Self {
        Self {
            field: MagneticField::default(),
            show_compass: true,
        }
    }

    fn select(&mut self, configuration: WireConfiguration) {
        if self.field.configuration != configuration {
            self.field.configuration = configuration;
            log::info!("Showing {}", configuration.label());
        }
    }
}

impl Default for MagneticScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for MagneticScene {
    fn title(&self) -> &str {
        "Magnetic Field"
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_magnetic(canvas, &self.field, self.show_compass);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.field.width = width;
        self.field.height = height;
    }

    fn pointer(&mut self, event: PointerEvent) {
        if let PointerEvent::Down { position, .. } = event {
            if self.show_compass {
                self.field.compass = position;
            }
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Char('s') => self.select(WireConfiguration::Straight),
            Key::Char('l') => self.select(WireConfiguration::Loop),
            Key::Char('c') => self.select(WireConfiguration::Solenoid),
            Key::Up | Key::Plus => self.field.set_current(self.field.current + 0.5),
            Key::Down | Key::Minus => self.field.set_current(self.field.current - 0.5),
            Key::Space => self.field.turn_off(),
            Key::Reset => self.field = MagneticField::new(self.field.configuration),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        MAGNETIC_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        MAGNETIC_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Configuration", self.field.configuration.label().to_string()),
            ("Current", format!("{:.1} A", self.field.current)),
            ("B at compass", format!("{:.3}", self.field.strength_at(self.field.compass))),
            ("Needle", format!("{:.0}°", self.field.compass_angle().to_degrees())),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let mut configuration = self.field.configuration;
        egui::ComboBox::from_label("Configuration")
            .selected_text(configuration.label())
            .show_ui(ui, |ui| {
                for option in WireConfiguration::ALL {
                    ui.selectable_value(&mut configuration, option, option.label());
                }
            });
        self.select(configuration);
        ui.add(
            egui::Slider::new(&mut self.field.current, CURRENT_RANGE)
                .step_by(0.5)
                .text("Current (A)"),
        );
        ui.checkbox(&mut self.show_compass, "Show compass");
        if ui.button("Turn Off Current").clicked() {
            self.field.turn_off();
        }
        ui.label("Click to move the compass");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;
    use common::{CommandRecorder, FrameLoop, Modifiers};
    use glam::Vec2;

    fn click(position: Vec2) -> PointerEvent {
        PointerEvent::Down {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_charge_point_follows_pointer_when_force_shown() {
        let mut scene = ElectricScene::new();
        scene.pointer(click(Vec2::new(100.0, 100.0)));
        assert_eq!(scene.field.test_point, Vec2::new(400.0, 200.0));

        scene.key(Key::Char('f'));
        scene.pointer(click(Vec2::new(100.0, 100.0)));
        scene.pointer(PointerEvent::Move {
            position: Vec2::new(120.0, 90.0),
            modifiers: Modifiers::default(),
        });
        assert_eq!(scene.field.test_point, Vec2::new(120.0, 90.0));
        scene.pointer(PointerEvent::Leave);
        assert!(!scene.probing);
    }

    #[test]
    fn test_charge_keys() {
        let mut scene = ElectricScene::new();
        scene.key(Key::Plus);
        scene.key(Key::Minus);
        assert_eq!(scene.field.charges.len(), 4);
        scene.key(Key::Delete);
        assert_eq!(scene.field.charges.len(), 3);
        scene.key(Key::Reset);
        assert_eq!(scene.field.charges.len(), 2);
    }

    #[test]
    fn test_compass_moves_on_click() {
        let mut scene = MagneticScene::new();
        scene.key(Key::Char('l'));
        scene.pointer(click(Vec2::new(600.0, 300.0)));
        assert_eq!(scene.field.compass, Vec2::new(600.0, 300.0));
        assert_eq!(scene.field.configuration, WireConfiguration::Loop);
        scene.key(Key::Space);
        assert_eq!(scene.field.current, 0.0);
    }

    #[test]
    fn test_scenes_run_in_frame_loop() {
        let builders: [fn() -> Box<dyn Scene>; 2] =
            [|| Box::new(ElectricScene::new()), || Box::new(MagneticScene::new())];
        let mut frame_loop = FrameLoop::new();
        for build in builders {
            frame_loop.mount(build());
            let mut recorder = CommandRecorder::new(800.0, 600.0);
            assert!(frame_loop.tick(FRAME_DT, Some(&mut recorder)));
            assert!(recorder.count_fills() > 0);
        }
        frame_loop.unmount();
        assert!(frame_loop.pending_request().is_none());
    }
}
