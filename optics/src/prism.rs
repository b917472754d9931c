//! Dispersion of white light through a triangular prism
//!
//! The prism stands apex-up in surface pixels (y down). Each spectral band
//! is traced with two vector refractions, one at the left face on the way in
//! and one at whichever face the ray reaches on the way out.

use common::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::refraction::refract_direction;

pub const APEX_RANGE: std::ops::RangeInclusive<f32> = 30.0..=90.0;
pub const INCIDENCE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralBand {
    pub name: &'static str,
    /// Wavelength in nanometres
    pub wavelength: f32,
    pub index: f32,
    pub color: u32,
}

impl SpectralBand {
    pub fn color(&self) -> Color {
        Color::hex(self.color)
    }
}

pub const SPECTRUM: [SpectralBand; 7] = [
    SpectralBand { name: "Red", wavelength: 700.0, index: 1.513, color: 0xff0000 },
    SpectralBand { name: "Orange", wavelength: 620.0, index: 1.514, color: 0xff7f00 },
    SpectralBand { name: "Yellow", wavelength: 580.0, index: 1.517, color: 0xffff00 },
    SpectralBand { name: "Green", wavelength: 550.0, index: 1.519, color: 0x00ff00 },
    SpectralBand { name: "Blue", wavelength: 470.0, index: 1.528, color: 0x0000ff },
    SpectralBand { name: "Indigo", wavelength: 450.0, index: 1.532, color: 0x4b0082 },
    SpectralBand { name: "Violet", wavelength: 400.0, index: 1.538, color: 0x9400d3 },
];

/// Mean index across the visible bands
pub fn mean_index() -> f32 {
    SPECTRUM.iter().map(|b| b.index).sum::<f32>() / SPECTRUM.len() as f32
}

/// Path of one band through the prism
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandTrace {
    pub index: f32,
    pub entry: Vec2,
    pub inside: Vec2,
    /// Where the ray leaves the glass
    pub exit: Vec2,
    /// Emerging direction, `None` when the ray totally reflects at the exit face
    pub outgoing: Option<Vec2>,
    /// Emergence angle from the exit face normal, in degrees
    pub emergence: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    /// Apex angle in degrees
    pub apex_angle: f32,
    /// Incidence at the entry face in degrees
    pub incidence: f32,
    pub apex: Vec2,
    /// Length of the two slanted faces
    pub side: f32,
}

impl Prism {
    pub fn new(apex_angle: f32, incidence: f32) -> Self {
        Self {
            apex_angle: apex_angle.clamp(*APEX_RANGE.start(), *APEX_RANGE.end()),
            incidence: incidence.clamp(*INCIDENCE_RANGE.start(), *INCIDENCE_RANGE.end()),
            apex: Vec2::new(280.0, 130.0),
            side: 300.0,
        }
    }

    fn half_apex(&self) -> f32 {
        self.apex_angle.to_radians() / 2.0
    }

    /// Apex, bottom-right and bottom-left corners
    pub fn vertices(&self) -> [Vec2; 3] {
        let half = self.half_apex();
        let right = self.apex + Vec2::new(half.sin(), half.cos()) * self.side;
        let left = self.apex + Vec2::new(-half.sin(), half.cos()) * self.side;
        [self.apex, right, left]
    }

    /// Outward normal of the entry (left) face
    pub fn entry_normal(&self) -> Vec2 {
        let half = self.half_apex();
        Vec2::new(-half.cos(), -half.sin())
    }

    /// Outward normal of the right face
    pub fn exit_normal(&self) -> Vec2 {
        let half = self.half_apex();
        Vec2::new(half.cos(), -half.sin())
    }

    /// Where the white beam meets the left face
    pub fn entry_point(&self) -> Vec2 {
        let [apex, _, left] = self.vertices();
        apex.lerp(left, 0.45)
    }

    /// Direction of the incoming beam
    pub fn incident_direction(&self) -> Vec2 {
        -self.entry_normal().rotate(Vec2::from_angle(-self.incidence.to_radians()))
    }

    pub fn trace(&self, index: f32) -> Option<BandTrace> {
        let entry = self.entry_point();
        let inside = refract_direction(self.incident_direction(), self.entry_normal(), 1.0, index)?;

        let [apex, right, left] = self.vertices();
        let faces = [(apex, right), (right, left)];
        let (exit, normal) = faces.iter().find_map(|&(a, b)| {
            let t = ray_segment(entry, inside, a, b)?;
            let edge = (b - a).normalize();
            // outward is to the left of the clockwise-wound edge (y down)
            Some((entry + inside * t, Vec2::new(edge.y, -edge.x)))
        })?;

        let outgoing = refract_direction(inside, normal, index, 1.0);
        let emergence = outgoing.map(|d| d.dot(normal).clamp(-1.0, 1.0).acos().to_degrees());
        Some(BandTrace {
            index,
            entry,
            inside,
            exit,
            outgoing,
            emergence,
        })
    }

    pub fn trace_spectrum(&self) -> Vec<(SpectralBand, Option<BandTrace>)> {
        SPECTRUM.iter().map(|band| (*band, self.trace(band.index))).collect()
    }

    /// Angle between the incoming and emerging rays in degrees, which is
    /// i + e - A when the band leaves through the right face; `None` when
    /// the band does not emerge
    pub fn deviation(&self, index: f32) -> Option<f32> {
        let outgoing = self.trace(index)?.outgoing?;
        Some(self.incident_direction().angle_between(outgoing).abs().to_degrees())
    }

    /// Angle between the violet and red emerging rays in degrees
    pub fn angular_spread(&self) -> Option<f32> {
        let red = self.deviation(SPECTRUM[0].index)?;
        let violet = self.deviation(SPECTRUM[SPECTRUM.len() - 1].index)?;
        Some(violet - red)
    }
}

impl Default for Prism {
    fn default() -> Self {
        Self::new(60.0, 50.0)
    }
}

/// Distance along the ray to segment `a`-`b`, if it crosses it ahead of `origin`
fn ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<f32> {
    let edge = b - a;
    let denom = dir.perp_dot(edge);
    if denom.abs() < 1e-9 {
        return None;
    }
    let offset = a - origin;
    let t = offset.perp_dot(edge) / denom;
    let u = offset.perp_dot(dir) / denom;
    (t > 1e-3 && (0.0..=1.0).contains(&u)).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_passage_at_minimum_deviation() {
        // n = 1.52, A = 60°: minimum deviation near 38.9° with i ≈ e
        let prism = Prism::new(60.0, 49.5);
        let trace = prism.trace(1.52).unwrap();
        assert!(trace.inside.y.abs() < 0.02, "inside ray {:?}", trace.inside);
        let e = trace.emergence.unwrap();
        assert!((e - 49.5).abs() < 1.0);
        let delta = prism.deviation(1.52).unwrap();
        assert!((delta - 38.9).abs() < 1.0);
    }

    #[test]
    fn test_deviation_matches_ray_directions() {
        let prism = Prism::default();
        let trace = prism.trace(1.517).unwrap();
        let outgoing = trace.outgoing.unwrap();
        let turned = prism
            .incident_direction()
            .angle_between(outgoing)
            .abs()
            .to_degrees();
        assert!((turned - prism.deviation(1.517).unwrap()).abs() < 0.01);
    }

    #[test]
    fn test_violet_bends_more_than_red() {
        let prism = Prism::default();
        let mut previous = f32::MIN;
        for (band, trace) in prism.trace_spectrum() {
            assert!(trace.is_some(), "{} lost", band.name);
            let delta = prism.deviation(band.index).unwrap();
            assert!(delta >= previous);
            previous = delta;
        }
        assert!(prism.angular_spread().unwrap() > 0.5);
    }

    #[test]
    fn test_steep_apex_reflects_internally() {
        // A = 90° at normal incidence runs parallel to the right face and
        // meets the base at 45°, past the critical angle of glass
        let prism = Prism::new(90.0, 0.0);
        let trace = prism.trace(1.52).unwrap();
        assert!(trace.outgoing.is_none());
        assert!(prism.deviation(1.52).is_none());
    }

    #[test]
    fn test_exit_through_base_deviation() {
        // a low index at A = 90° clears the right face and leaves through the
        // base, where i + e - A would come out negative
        let prism = Prism::new(90.0, 0.0);
        let trace = prism.trace(1.33).unwrap();
        assert!((trace.exit.y - prism.vertices()[1].y).abs() < 0.01);
        let e = trace.emergence.unwrap();
        assert!(prism.incidence + e - prism.apex_angle < 0.0);
        let delta = prism.deviation(1.33).unwrap();
        assert!((delta - 25.13).abs() < 0.1, "deviation {delta}");
    }

    #[test]
    fn test_parameters_clamped() {
        let prism = Prism::new(10.0, 85.0);
        assert_eq!(prism.apex_angle, 30.0);
        assert_eq!(prism.incidence, 80.0);
    }
}
