//! Electrostatic field of point charges
//!
//! Works in surface pixels with y pointing down. The constant is scaled so a
//! unit charge gives a visible field a few hundred pixels away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Coulomb constant in pixel units
pub const COULOMB_K: f32 = 0.01;
/// Charges closer than this to the query point contribute nothing
pub const MIN_DISTANCE: f32 = 5.0;
/// Pick radius for dragging a charge
pub const HIT_RADIUS: f32 = 15.0;
/// Field values are tiny at pixel distances; arrows scale them by this first
pub const DISPLAY_GAIN: f32 = 2.0e5;
/// Scaled magnitude at which field arrows reach full length
pub const FULL_SCALE_FIELD: f32 = 0.5;
pub const MAX_ARROW_LENGTH: f32 = 10.0;
pub const MAX_FORCE_ARROW: f32 = 100.0;

pub const SPACING_RANGE: std::ops::RangeInclusive<f32> = 15.0..=40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub position: Vec2,
    /// Signed charge in elementary units
    pub charge: f32,
    pub dragging: bool,
}

impl Charge {
    pub fn new(position: Vec2, charge: f32) -> Self {
        Self {
            position,
            charge,
            dragging: false,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.charge > 0.0
    }

    /// Contribution to the field at `p`, or zero inside [`MIN_DISTANCE`]
    pub fn field_at(&self, p: Vec2) -> Vec2 {
        let offset = p - self.position;
        let r = offset.length();
        if r <= MIN_DISTANCE {
            return Vec2::ZERO;
        }
        let magnitude = COULOMB_K * self.charge / (r * r);
        offset / r * magnitude
    }
}

/// One arrow of the sampled field grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub position: Vec2,
    pub field: Vec2,
    /// Magnitude mapped onto 0..=1
    pub strength: f32,
}

impl FieldSample {
    pub fn arrow_length(&self) -> f32 {
        MAX_ARROW_LENGTH * self.strength
    }

    pub fn tip(&self) -> Vec2 {
        self.position + self.field.normalize_or_zero() * self.arrow_length()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricField {
    pub charges: Vec<Charge>,
    /// Test charge position for the force readout
    pub test_point: Vec2,
    /// Distance between sampled arrows in pixels
    pub spacing: f32,
}

impl ElectricField {
    pub fn new() -> Self {
        Self {
            charges: default_charges(),
            test_point: Vec2::new(400.0, 200.0),
            spacing: 25.0,
        }
    }

    pub fn field_at(&self, p: Vec2) -> Vec2 {
        self.charges.iter().map(|c| c.field_at(p)).sum()
    }

    /// Force on a unit positive test charge at `test_point`
    pub fn test_force(&self) -> Vec2 {
        self.field_at(self.test_point)
    }

    pub fn force_arrow_length(&self) -> f32 {
        (self.test_force().length() * DISPLAY_GAIN * 100.0).min(MAX_FORCE_ARROW)
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = spacing.clamp(*SPACING_RANGE.start(), *SPACING_RANGE.end());
    }

    /// Field arrows on a regular grid, skipping the surface edges
    pub fn sample_grid(&self, width: f32, height: f32) -> Vec<FieldSample> {
        let step = self.spacing.max(1.0);
        let mut samples = Vec::new();
        let mut x = step;
        while x < width {
            let mut y = step;
            while y < height {
                let position = Vec2::new(x, y);
                let field = self.field_at(position);
                samples.push(FieldSample {
                    position,
                    field,
                    strength: (field.length() * DISPLAY_GAIN).min(FULL_SCALE_FIELD)
                        / FULL_SCALE_FIELD,
                });
                y += step;
            }
            x += step;
        }
        samples
    }

    /// First charge within [`HIT_RADIUS`] of `p`
    pub fn charge_at(&self, p: Vec2) -> Option<usize> {
        self.charges
            .iter()
            .position(|c| c.position.distance(p) < HIT_RADIUS)
    }

    /// New charges appear at the middle of the default layout
    pub fn add_charge(&mut self, charge: f32) {
        self.charges.push(Charge::new(Vec2::new(400.0, 300.0), charge));
        log::debug!("Added charge {:+}", charge);
    }

    pub fn remove_last(&mut self) -> Option<Charge> {
        self.charges.pop()
    }

    /// Grab the charge under `p`; returns whether one was hit
    pub fn start_drag(&mut self, p: Vec2) -> bool {
        match self.charge_at(p) {
            Some(index) => {
                self.charges[index].dragging = true;
                true
            }
            None => false,
        }
    }

    pub fn drag_to(&mut self, p: Vec2) {
        for charge in self.charges.iter_mut().filter(|c| c.dragging) {
            charge.position = p;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.charges.iter().any(|c| c.dragging)
    }

    pub fn end_drag(&mut self) {
        for charge in &mut self.charges {
            charge.dragging = false;
        }
    }

    pub fn reset(&mut self) {
        self.charges = default_charges();
        self.test_point = Vec2::new(400.0, 200.0);
    }
}

impl Default for ElectricField {
    fn default() -> Self {
        Self::new()
    }
}

/// A dipole: +1 on the left, -1 on the right
fn default_charges() -> Vec<Charge> {
    vec![
        Charge::new(Vec2::new(300.0, 300.0), 1.0),
        Charge::new(Vec2::new(500.0, 300.0), -1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_square() {
        let charge = Charge::new(Vec2::ZERO, 1.0);
        let near = charge.field_at(Vec2::new(10.0, 0.0));
        let far = charge.field_at(Vec2::new(20.0, 0.0));
        assert!((near.x / far.x - 4.0).abs() < 1e-4);
        assert!((near.x - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn test_singularity_excluded() {
        let charge = Charge::new(Vec2::new(100.0, 100.0), 1.0);
        assert_eq!(charge.field_at(Vec2::new(100.0, 100.0)), Vec2::ZERO);
        assert_eq!(charge.field_at(Vec2::new(104.0, 103.0)), Vec2::ZERO);
        assert_ne!(charge.field_at(Vec2::new(106.0, 100.0)), Vec2::ZERO);
    }

    #[test]
    fn test_dipole_midpoint_points_to_negative() {
        let field = ElectricField::default();
        let e = field.field_at(Vec2::new(400.0, 300.0));
        assert!(e.x > 0.0);
        assert!(e.y.abs() < 1e-9);
        // both charges contribute equally at 100 px
        assert!((e.x - 2.0 * COULOMB_K / 1e4).abs() < 1e-9);
    }

    #[test]
    fn test_grid_sampling() {
        let field = ElectricField::default();
        let samples = field.sample_grid(800.0, 600.0);
        // x = 25..775, y = 25..575
        assert_eq!(samples.len(), 31 * 23);
        for s in &samples {
            assert!(s.field.is_finite());
            assert!((0.0..=1.0).contains(&s.strength));
            assert!(s.arrow_length() <= MAX_ARROW_LENGTH);
        }
    }

    #[test]
    fn test_spacing_clamped() {
        let mut field = ElectricField::default();
        field.set_spacing(5.0);
        assert_eq!(field.spacing, 15.0);
        field.set_spacing(100.0);
        assert_eq!(field.spacing, 40.0);
    }

    #[test]
    fn test_drag_charge() {
        let mut field = ElectricField::default();
        assert!(!field.start_drag(Vec2::new(400.0, 400.0)));
        assert!(field.start_drag(Vec2::new(310.0, 305.0)));
        field.drag_to(Vec2::new(250.0, 250.0));
        field.end_drag();
        assert_eq!(field.charges[0].position, Vec2::new(250.0, 250.0));
        assert_eq!(field.charges[1].position, Vec2::new(500.0, 300.0));
        assert!(!field.is_dragging());
    }

    #[test]
    fn test_add_remove_reset() {
        let mut field = ElectricField::default();
        field.add_charge(-1.0);
        assert_eq!(field.charges.len(), 3);
        assert_eq!(field.charges[2].position, Vec2::new(400.0, 300.0));
        field.remove_last();
        field.remove_last();
        field.remove_last();
        assert!(field.remove_last().is_none());
        assert_eq!(field.field_at(Vec2::new(10.0, 10.0)), Vec2::ZERO);

        field.test_point = Vec2::ZERO;
        field.reset();
        assert_eq!(field, ElectricField::default());
    }

    #[test]
    fn test_force_arrow_capped() {
        let mut field = ElectricField::default();
        let at_test_point = field.force_arrow_length();
        assert!(at_test_point > 1.0 && at_test_point < MAX_FORCE_ARROW);
        field.test_point = Vec2::new(306.0, 300.0);
        assert_eq!(field.force_arrow_length(), MAX_FORCE_ARROW);
    }

    #[test]
    fn test_serializes() {
        let field = ElectricField::default();
        let json = serde_json::to_string(&field).unwrap();
        let back: ElectricField = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
