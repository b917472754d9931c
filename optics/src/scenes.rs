//! Interactive scenes for the optics binary

use common::{Canvas, Equation, Key, PointerButton, PointerEvent, Scene};

use crate::equations_ui::*;
use crate::lens::{LensKind, ThinLens, FOCAL_RANGE, OBJECT_DISTANCE_RANGE, OBJECT_HEIGHT_RANGE};
use crate::prism::{Prism, APEX_RANGE, INCIDENCE_RANGE};
use crate::refraction::{Interaction, Material, RefractionSetup};
use crate::renderer;

// ============================================================================
// Refraction
// ============================================================================

pub struct RefractionScene {
    setup: RefractionSetup,
    show_normal: bool,
    show_angles: bool,
}

impl RefractionScene {
    pub fn new() -> Self {
        Self {
            setup: RefractionSetup::default(),
            show_normal: true,
            show_angles: true,
        }
    }

    fn set_incidence(&mut self, degrees: f32) {
        self.setup = RefractionSetup::new(self.setup.upper, self.setup.lower, degrees);
    }

    /// Swap the two media so light travels from the denser one
    fn swap_media(&mut self) {
        std::mem::swap(&mut self.setup.upper, &mut self.setup.lower);
        log::info!(
            "Light now travels from {} into {}",
            self.setup.upper.label(),
            self.setup.lower.label()
        );
    }
}

impl Default for RefractionScene {
    fn default() -> Self {
        Self::new()
    }
}

fn material_combo(ui: &mut egui::Ui, label: &str, material: &mut Material) {
    egui::ComboBox::from_label(label)
        .selected_text(format!("{} (n = {:.2})", material.label(), material.index()))
        .show_ui(ui, |ui| {
            for option in Material::ALL {
                ui.selectable_value(material, option, option.label());
            }
        });
}

impl Scene for RefractionScene {
    fn title(&self) -> &str {
        "Refraction"
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_refraction(canvas, &self.setup, self.show_normal, self.show_angles);
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Left => self.set_incidence(self.setup.incidence - 1.0),
            Key::Right => self.set_incidence(self.setup.incidence + 1.0),
            Key::Char('s') => self.swap_media(),
            Key::Char('n') => self.show_normal = !self.show_normal,
            Key::Reset => self.setup = RefractionSetup::default(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        REFRACTION_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        REFRACTION_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let refracted = match self.setup.interaction() {
            Interaction::Refracted { angle } => format!("{:.1}°", angle.to_degrees()),
            Interaction::TotalInternalReflection { .. } => "TIR".to_string(),
        };
        let critical = self
            .setup
            .critical_angle()
            .map(|c| format!("{:.1}°", c.to_degrees()))
            .unwrap_or_else(|| "none".to_string());
        vec![
            ("Incidence", format!("{:.0}°", self.setup.incidence)),
            ("Refraction", refracted),
            ("Critical angle", critical),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        material_combo(ui, "Medium 1 (top)", &mut self.setup.upper);
        material_combo(ui, "Medium 2 (bottom)", &mut self.setup.lower);
        ui.add(egui::Slider::new(&mut self.setup.incidence, 0.0..=89.0).text("Angle of incidence (°)"));
        ui.checkbox(&mut self.show_normal, "Show normal");
        ui.checkbox(&mut self.show_angles, "Show angles");
        if ui.button("Swap Media").clicked() {
            self.swap_media();
        }
    }
}

// ============================================================================
// Prism Dispersion
// ============================================================================

/// Photon speed along the incoming beam in phase degrees per second
const PHOTON_RATE: f32 = 120.0;

pub struct PrismScene {
    prism: Prism,
    show_spectrum: bool,
    animate: bool,
    /// 0..360, advances while animating
    phase: f32,
}

impl PrismScene {
    pub fn new() -> Self {
        Self {
            prism: Prism::default(),
            show_spectrum: true,
            animate: true,
            phase: 0.0,
        }
    }

    fn adjust(&mut self, apex: f32, incidence: f32) {
        let apex_point = self.prism.apex;
        self.prism = Prism::new(self.prism.apex_angle + apex, self.prism.incidence + incidence);
        self.prism.apex = apex_point;
    }
}

impl Default for PrismScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PrismScene {
    fn title(&self) -> &str {
        "Prism Dispersion"
    }

    fn update(&mut self, dt: f32) {
        if self.animate {
            self.phase = (self.phase + dt * PHOTON_RATE) % 360.0;
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let phase = self.animate.then_some(self.phase);
        renderer::draw_prism(canvas, &self.prism, self.show_spectrum, phase);
    }

    fn resize(&mut self, width: f32, height: f32) {
        // keep the prism left of centre with room for the fan of colours
        self.prism.apex.x = (width * 0.35).max(200.0);
        self.prism.apex.y = ((height - self.prism.side) / 2.0).max(40.0);
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Left => self.adjust(0.0, -1.0),
            Key::Right => self.adjust(0.0, 1.0),
            Key::Up => self.adjust(1.0, 0.0),
            Key::Down => self.adjust(-1.0, 0.0),
            Key::Space => self.animate = !self.animate,
            Key::Char('s') => self.show_spectrum = !self.show_spectrum,
            Key::Reset => {
                let apex = self.prism.apex;
                self.prism = Prism::default();
                self.prism.apex = apex;
            }
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        PRISM_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        PRISM_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let deviation = |index: f32| {
            self.prism
                .deviation(index)
                .map(|d| format!("{d:.2}°"))
                .unwrap_or_else(|| "reflected".to_string())
        };
        vec![
            ("Apex angle", format!("{:.0}°", self.prism.apex_angle)),
            ("Incidence", format!("{:.0}°", self.prism.incidence)),
            ("Red deviation", deviation(crate::prism::SPECTRUM[0].index)),
            ("Violet deviation", deviation(crate::prism::SPECTRUM[6].index)),
        ]
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.add(egui::Slider::new(&mut self.prism.apex_angle, APEX_RANGE).text("Prism angle (°)"));
        ui.add(egui::Slider::new(&mut self.prism.incidence, INCIDENCE_RANGE).text("Incident angle (°)"));
        ui.checkbox(&mut self.show_spectrum, "Show spectrum");
        ui.checkbox(&mut self.animate, "Animate light");
    }
}

// ============================================================================
// Thin Lens
// ============================================================================

/// Grab radius around the object arrow in pixels
const OBJECT_GRAB: f32 = 20.0;

pub struct LensScene {
    lens: ThinLens,
    show_rays: bool,
    width: f32,
    height: f32,
    dragging: bool,
}

impl LensScene {
    pub fn new() -> Self {
        Self {
            lens: ThinLens::default(),
            show_rays: true,
            width: 800.0,
            height: 600.0,
            dragging: false,
        }
    }

    fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    fn set_object_distance(&mut self, distance: f32) {
        self.lens.object_distance =
            distance.clamp(*OBJECT_DISTANCE_RANGE.start(), *OBJECT_DISTANCE_RANGE.end());
    }

    fn set_focal_length(&mut self, focal: f32) {
        self.lens.focal_length = focal.clamp(*FOCAL_RANGE.start(), *FOCAL_RANGE.end());
    }
}

impl Default for LensScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for LensScene {
    fn title(&self) -> &str {
        "Thin Lens"
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw_lens(canvas, &self.lens, self.show_rays);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn pointer(&mut self, event: PointerEvent) {
        let center = self.center();
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
                ..
            } => {
                let base_x = center.x - self.lens.object_distance;
                let tip_y = self.lens.object_tip(center).y;
                self.dragging = (position.x - base_x).abs() < OBJECT_GRAB
                    && position.y >= tip_y - OBJECT_GRAB
                    && position.y <= center.y + OBJECT_GRAB;
            }
            PointerEvent::Move { position, .. } if self.dragging => {
                self.set_object_distance(center.x - position.x);
            }
            PointerEvent::Up { .. } | PointerEvent::Leave => self.dragging = false,
            _ => {}
        }
    }

    fn key(&mut self, key: Key) {
        match key {
            Key::Left => self.set_object_distance(self.lens.object_distance + 10.0),
            Key::Right => self.set_object_distance(self.lens.object_distance - 10.0),
            Key::Up => self.set_focal_length(self.lens.focal_length + 10.0),
            Key::Down => self.set_focal_length(self.lens.focal_length - 10.0),
            Key::Char('c') => self.lens.kind = LensKind::Converging,
            Key::Char('d') => self.lens.kind = LensKind::Diverging,
            Key::Reset => self.lens = ThinLens::default(),
            _ => {}
        }
    }

    fn equations(&self) -> &'static [Equation] {
        LENS_EQUATIONS
    }

    fn variables(&self) -> &'static [(&'static str, &'static str)] {
        LENS_VARIABLES
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        let mut stats = vec![
            ("Focal length", format!("{:.0} px", self.lens.signed_focal_length())),
            ("Object distance", format!("{:.0} px", self.lens.object_distance)),
        ];
        match self.lens.image() {
            Some(image) => {
                stats.push(("Image distance", format!("{:.0} px", image.distance)));
                stats.push(("Magnification", format!("{:.2}×", image.magnification)));
                stats.push(("Image", format!("{:?}, {:?}", image.nature, image.orientation)));
            }
            None => stats.push(("Image", "at infinity".to_string())),
        }
        stats
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in [LensKind::Converging, LensKind::Diverging] {
                ui.selectable_value(&mut self.lens.kind, kind, kind.label());
            }
        });
        ui.add(egui::Slider::new(&mut self.lens.focal_length, FOCAL_RANGE).text("Focal length (px)"));
        ui.add(
            egui::Slider::new(&mut self.lens.object_distance, OBJECT_DISTANCE_RANGE)
                .text("Object distance (px)"),
        );
        ui.add(
            egui::Slider::new(&mut self.lens.object_height, OBJECT_HEIGHT_RANGE)
                .text("Object height (px)"),
        );
        ui.checkbox(&mut self.show_rays, "Show ray diagram");
        ui.label("Drag the object arrow to move it");
    }
}
