//! Magnetic field around current-carrying conductors
//!
//! Each configuration uses its own closed-form approximation chosen for a
//! readable picture rather than a Biot-Savart integral. Coordinates are
//! surface pixels (y down) and the conductor sits at the surface centre.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const LOOP_RADIUS: f32 = 120.0;
pub const SOLENOID_WIDTH: f32 = 300.0;
pub const SOLENOID_HEIGHT: f32 = 200.0;
pub const CURRENT_RANGE: std::ops::RangeInclusive<f32> = -10.0..=10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WireConfiguration {
    #[default]
    Straight,
    Loop,
    Solenoid,
}

impl WireConfiguration {
    pub const ALL: [WireConfiguration; 3] = [
        WireConfiguration::Straight,
        WireConfiguration::Loop,
        WireConfiguration::Solenoid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WireConfiguration::Straight => "Straight Wire",
            WireConfiguration::Loop => "Current Loop",
            WireConfiguration::Solenoid => "Solenoid",
        }
    }

    /// Spacing of the sampled field markers in pixels
    pub fn sample_step(self) -> f32 {
        match self {
            WireConfiguration::Loop => 35.0,
            WireConfiguration::Straight | WireConfiguration::Solenoid => 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMarker {
    pub position: Vec2,
    /// Field magnitude clamped to 0..=1
    pub strength: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagneticField {
    pub configuration: WireConfiguration,
    /// Current in amperes; the sign sets the flow direction
    pub current: f32,
    pub compass: Vec2,
    pub width: f32,
    pub height: f32,
}

impl MagneticField {
    pub fn new(configuration: WireConfiguration) -> Self {
        Self {
            configuration,
            current: 5.0,
            compass: Vec2::new(400.0, 200.0),
            width: 800.0,
            height: 600.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn set_current(&mut self, current: f32) {
        self.current = current.clamp(*CURRENT_RANGE.start(), *CURRENT_RANGE.end());
    }

    pub fn turn_off(&mut self) {
        self.current = 0.0;
        log::debug!("Current switched off");
    }

    fn direction_sign(&self) -> f32 {
        if self.current > 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Inside the solenoid core, between the two winding rows
    pub fn inside_solenoid(&self, p: Vec2) -> bool {
        let offset = p - self.center();
        offset.x.abs() < SOLENOID_WIDTH / 2.0 && offset.y.abs() < SOLENOID_HEIGHT / 4.0
    }

    /// Field magnitude at `p`
    pub fn strength_at(&self, p: Vec2) -> f32 {
        let current = self.current.abs();
        let offset = p - self.center();
        match self.configuration {
            WireConfiguration::Straight => {
                let d = offset.y.abs();
                if d < 1.0 {
                    0.0
                } else {
                    current * 0.5 / d
                }
            }
            WireConfiguration::Loop => {
                let r = offset.length();
                if r < 1.0 {
                    0.0
                } else {
                    current * 0.3 * LOOP_RADIUS / (r + LOOP_RADIUS)
                }
            }
            WireConfiguration::Solenoid => {
                if self.inside_solenoid(p) {
                    current * 0.3
                } else {
                    current * 0.1
                }
            }
        }
    }

    /// Unit direction of the field at `p`
    pub fn direction_at(&self, p: Vec2) -> Vec2 {
        let sign = self.direction_sign();
        let offset = p - self.center();
        match self.configuration {
            // right-hand rule: the field flips across the wire
            WireConfiguration::Straight => {
                let side = if offset.y > 0.0 { 1.0 } else { -1.0 };
                Vec2::new(sign * side, 0.0)
            }
            WireConfiguration::Loop => {
                let angle = offset.y.atan2(offset.x);
                Vec2::new(-angle.sin(), angle.cos()) * sign
            }
            WireConfiguration::Solenoid => Vec2::new(0.0, sign),
        }
    }

    pub fn field_at(&self, p: Vec2) -> Vec2 {
        self.direction_at(p) * self.strength_at(p)
    }

    /// Compass needle angle (north end) from the surface x axis
    pub fn compass_angle(&self) -> f32 {
        let direction = self.direction_at(self.compass);
        direction.y.atan2(direction.x)
    }

    /// Points too close to the conductor to draw a marker
    pub fn in_exclusion_band(&self, p: Vec2) -> bool {
        let offset = p - self.center();
        match self.configuration {
            WireConfiguration::Straight => offset.y.abs() < 20.0,
            WireConfiguration::Loop => (offset.length() - LOOP_RADIUS).abs() < 25.0,
            WireConfiguration::Solenoid => offset.y.abs() < 10.0,
        }
    }

    pub fn sample_markers(&self) -> Vec<FieldMarker> {
        let step = self.configuration.sample_step();
        let mut markers = Vec::new();
        let mut x = step;
        while x < self.width {
            let mut y = step;
            while y < self.height {
                let position = Vec2::new(x, y);
                if !self.in_exclusion_band(position) {
                    markers.push(FieldMarker {
                        position,
                        strength: self.strength_at(position).min(1.0),
                    });
                }
                y += step;
            }
            x += step;
        }
        markers
    }
}

impl Default for MagneticField {
    fn default() -> Self {
        Self::new(WireConfiguration::Straight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_straight_wire_inverse_distance() {
        let field = MagneticField::default();
        let near = field.strength_at(Vec2::new(100.0, 350.0));
        let far = field.strength_at(Vec2::new(100.0, 400.0));
        assert!((near - 0.05).abs() < 1e-6);
        assert!((near / far - 2.0).abs() < 1e-5);
        assert_eq!(field.strength_at(Vec2::new(100.0, 300.5)), 0.0);
    }

    #[test]
    fn test_straight_wire_flips_across() {
        let mut field = MagneticField::default();
        assert_eq!(field.direction_at(Vec2::new(0.0, 400.0)), Vec2::X);
        assert_eq!(field.direction_at(Vec2::new(0.0, 200.0)), -Vec2::X);
        field.set_current(-3.0);
        assert_eq!(field.direction_at(Vec2::new(0.0, 400.0)), -Vec2::X);
    }

    #[test]
    fn test_compass_follows_loop() {
        let mut field = MagneticField::new(WireConfiguration::Loop);
        field.compass = Vec2::new(600.0, 300.0);
        assert!((field.compass_angle() - FRAC_PI_2).abs() < 1e-5);
        field.compass = Vec2::new(400.0, 100.0);
        // tangent at the top of the loop points along +x
        assert!(field.compass_angle().abs() < 1e-5);

        field.set_current(-5.0);
        field.compass = Vec2::new(600.0, 300.0);
        assert!((field.compass_angle() + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_loop_field_weakens_outwards() {
        let field = MagneticField::new(WireConfiguration::Loop);
        let center = field.center();
        assert_eq!(field.strength_at(center), 0.0);
        let inner = field.strength_at(center + Vec2::new(50.0, 0.0));
        let outer = field.strength_at(center + Vec2::new(250.0, 0.0));
        assert!(inner > outer);
        // R / (R + R) at the wire itself
        let at_wire = field.strength_at(center + Vec2::new(LOOP_RADIUS, 0.0));
        assert!((at_wire - 5.0 * 0.3 * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_solenoid_uniform_inside() {
        let field = MagneticField::new(WireConfiguration::Solenoid);
        let inside = Vec2::new(350.0, 280.0);
        assert!(field.inside_solenoid(inside));
        assert!((field.strength_at(inside) - 1.5).abs() < 1e-6);
        assert!((field.strength_at(Vec2::new(50.0, 50.0)) - 0.5).abs() < 1e-6);
        assert_eq!(field.direction_at(inside), Vec2::Y);
    }

    #[test]
    fn test_markers_skip_conductor() {
        for configuration in WireConfiguration::ALL {
            let field = MagneticField::new(configuration);
            let markers = field.sample_markers();
            assert!(!markers.is_empty());
            for marker in &markers {
                assert!(!field.in_exclusion_band(marker.position));
                assert!((0.0..=1.0).contains(&marker.strength));
            }
        }
    }

    #[test]
    fn test_turn_off() {
        let mut field = MagneticField::new(WireConfiguration::Solenoid);
        field.turn_off();
        assert_eq!(field.field_at(Vec2::new(400.0, 280.0)), Vec2::ZERO);
        field.set_current(50.0);
        assert_eq!(field.current, 10.0);
    }
}
