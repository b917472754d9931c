//! Fluid particles and fluid presets

use common::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fluid preset; fixes a particle's color and viscosity multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FluidKind {
    #[default]
    Water,
    Oil,
    Honey,
}

impl FluidKind {
    pub const ALL: [FluidKind; 3] = [FluidKind::Water, FluidKind::Oil, FluidKind::Honey];

    /// Fraction of velocity kept each frame
    pub fn viscosity(self) -> f32 {
        match self {
            FluidKind::Water => 0.98,
            FluidKind::Oil => 0.90,
            FluidKind::Honey => 0.70,
        }
    }

    pub fn color(self) -> Color {
        match self {
            FluidKind::Water => Color::rgb8(59, 130, 246),
            FluidKind::Oil => Color::rgb8(234, 179, 8),
            FluidKind::Honey => Color::rgb8(245, 158, 11),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FluidKind::Water => "Water",
            FluidKind::Oil => "Oil",
            FluidKind::Honey => "Honey",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Position in pixels (y down)
    pub position: Vec2,
    /// Velocity in pixels per frame
    pub velocity: Vec2,
    pub density: f32,
    pub pressure: f32,
    pub kind: FluidKind,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, kind: FluidKind) -> Self {
        Self {
            position,
            velocity,
            density: 0.0,
            pressure: 0.0,
            kind,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thicker_fluids_damp_more() {
        assert!(FluidKind::Water.viscosity() > FluidKind::Oil.viscosity());
        assert!(FluidKind::Oil.viscosity() > FluidKind::Honey.viscosity());
    }

    #[test]
    fn test_new_particle_has_no_density() {
        let p = Particle::new(Vec2::ONE, Vec2::new(3.0, 4.0), FluidKind::Oil);
        assert_eq!(p.density, 0.0);
        assert_eq!(p.speed(), 5.0);
    }
}
