//! Snell's law at a flat interface

use common::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Air,
    Water,
    Glass,
    Diamond,
}

impl Material {
    pub const ALL: [Material; 4] = [Material::Air, Material::Water, Material::Glass, Material::Diamond];

    pub fn index(self) -> f32 {
        match self {
            Material::Air => 1.00,
            Material::Water => 1.33,
            Material::Glass => 1.52,
            Material::Diamond => 2.42,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Material::Air => "Air",
            Material::Water => "Water",
            Material::Glass => "Glass",
            Material::Diamond => "Diamond",
        }
    }

    /// Translucent fill for the half-space occupied by the material
    pub fn tint(self) -> Color {
        match self {
            Material::Air => Color::rgb8(135, 206, 235).with_alpha(0.1),
            Material::Water => Color::rgb8(100, 149, 237).with_alpha(0.3),
            Material::Glass => Color::rgb8(173, 216, 230).with_alpha(0.4),
            Material::Diamond => Color::rgb8(200, 200, 255).with_alpha(0.5),
        }
    }
}

/// Outcome of a ray meeting an interface; angles are from the normal in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Interaction {
    Refracted { angle: f32 },
    TotalInternalReflection { reflected: f32 },
}

impl Interaction {
    pub fn is_total_internal_reflection(&self) -> bool {
        matches!(self, Interaction::TotalInternalReflection { .. })
    }
}

/// n₁·sin θ₁ = n₂·sin θ₂
pub fn snell(incidence: f32, n1: f32, n2: f32) -> Interaction {
    let sin_refracted = n1 / n2 * incidence.sin();
    if sin_refracted.abs() > 1.0 {
        Interaction::TotalInternalReflection {
            reflected: incidence,
        }
    } else {
        Interaction::Refracted {
            angle: sin_refracted.asin(),
        }
    }
}

/// Smallest incidence that totally reflects; only exists going into a rarer medium
pub fn critical_angle(n1: f32, n2: f32) -> Option<f32> {
    if n1 > n2 {
        Some((n2 / n1).asin())
    } else {
        None
    }
}

/// Refract unit direction `d` at a surface with unit `normal` (either
/// orientation). Returns `None` on total internal reflection.
pub fn refract_direction(d: Vec2, normal: Vec2, n1: f32, n2: f32) -> Option<Vec2> {
    let normal = if normal.dot(d) > 0.0 { -normal } else { normal };
    let eta = n1 / n2;
    let cos_i = -normal.dot(d);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((d * eta + normal * (eta * cos_i - k.sqrt())).normalize())
}

pub fn reflect_direction(d: Vec2, normal: Vec2) -> Vec2 {
    d - 2.0 * d.dot(normal) * normal
}

/// Two media stacked at a horizontal interface with the ray coming from above
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefractionSetup {
    pub upper: Material,
    pub lower: Material,
    /// Incidence in degrees, 0..=89
    pub incidence: f32,
}

impl RefractionSetup {
    pub fn new(upper: Material, lower: Material, incidence: f32) -> Self {
        Self {
            upper,
            lower,
            incidence: incidence.clamp(0.0, 89.0),
        }
    }

    pub fn interaction(&self) -> Interaction {
        snell(self.incidence.to_radians(), self.upper.index(), self.lower.index())
    }

    pub fn critical_angle(&self) -> Option<f32> {
        critical_angle(self.upper.index(), self.lower.index())
    }
}

impl Default for RefractionSetup {
    fn default() -> Self {
        Self::new(Material::Air, Material::Water, 30.0)
    }
}
