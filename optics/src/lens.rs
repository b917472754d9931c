//! Thin lens imaging
//!
//! Distances are in pixels measured from the lens; the object sits on the
//! left. Heights are positive above the optical axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const FOCAL_RANGE: std::ops::RangeInclusive<f32> = 50.0..=250.0;
pub const OBJECT_DISTANCE_RANGE: std::ops::RangeInclusive<f32> = 100.0..=500.0;
pub const OBJECT_HEIGHT_RANGE: std::ops::RangeInclusive<f32> = 40.0..=150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LensKind {
    #[default]
    Converging,
    Diverging,
}

impl LensKind {
    pub fn label(self) -> &'static str {
        match self {
            LensKind::Converging => "Convex (Converging)",
            LensKind::Diverging => "Concave (Diverging)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageNature {
    Real,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Upright,
    Inverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Signed image distance, positive on the far side of the lens
    pub distance: f32,
    pub magnification: f32,
    pub height: f32,
    pub nature: ImageNature,
    pub orientation: Orientation,
}

/// The three canonical construction rays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    /// Parallel to the axis, then through the far focus
    Parallel,
    /// Through the optical centre, undeviated
    Central,
    /// Through the near focus, then parallel to the axis
    Focal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructionRay {
    pub kind: RayKind,
    pub start: Vec2,
    /// Where the ray crosses the lens plane
    pub lens_point: Vec2,
    pub end: Vec2,
    /// Backward extension to a virtual image, drawn dashed
    pub virtual_extension: Option<(Vec2, Vec2)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinLens {
    pub kind: LensKind,
    /// Focal length magnitude in pixels
    pub focal_length: f32,
    pub object_distance: f32,
    pub object_height: f32,
}

impl ThinLens {
    pub fn new(kind: LensKind, focal_length: f32, object_distance: f32) -> Self {
        Self {
            kind,
            focal_length: focal_length.clamp(*FOCAL_RANGE.start(), *FOCAL_RANGE.end()),
            object_distance: object_distance
                .clamp(*OBJECT_DISTANCE_RANGE.start(), *OBJECT_DISTANCE_RANGE.end()),
            object_height: 80.0,
        }
    }

    /// Negative for a diverging lens
    pub fn signed_focal_length(&self) -> f32 {
        match self.kind {
            LensKind::Converging => self.focal_length,
            LensKind::Diverging => -self.focal_length,
        }
    }

    /// 1/f = 1/dₒ + 1/dᵢ; `None` when the object sits at the focal point
    pub fn image(&self) -> Option<Image> {
        let f = self.signed_focal_length();
        let d_o = self.object_distance;
        let inverse = 1.0 / f - 1.0 / d_o;
        if inverse.abs() < 1e-9 {
            return None;
        }
        let distance = 1.0 / inverse;
        let magnification = -distance / d_o;
        Some(Image {
            distance,
            magnification,
            height: magnification * self.object_height,
            nature: if distance > 0.0 {
                ImageNature::Real
            } else {
                ImageNature::Virtual
            },
            orientation: if magnification > 0.0 {
                Orientation::Upright
            } else {
                Orientation::Inverted
            },
        })
    }

    /// Object tip in surface pixels for a lens centred at `center`
    pub fn object_tip(&self, center: Vec2) -> Vec2 {
        center + Vec2::new(-self.object_distance, -self.object_height)
    }

    pub fn image_tip(&self, center: Vec2) -> Option<Vec2> {
        self.image()
            .map(|image| center + Vec2::new(image.distance, -image.height))
    }

    /// Construction rays from the object tip, running out to `right_edge`
    pub fn construction_rays(&self, center: Vec2, right_edge: f32) -> Vec<ConstructionRay> {
        let Some(image) = self.image() else {
            return Vec::new();
        };
        let image_tip = center + Vec2::new(image.distance, -image.height);
        let tip = self.object_tip(center);
        let f = self.signed_focal_length();

        // the focal ray aims at the near focus (or the far one for a diverging lens)
        let focal_y = tip.y + (center.y - tip.y) * self.object_distance / (self.object_distance - f);

        [
            (RayKind::Parallel, Vec2::new(center.x, tip.y)),
            (RayKind::Central, center),
            (RayKind::Focal, Vec2::new(center.x, focal_y)),
        ]
        .into_iter()
        .map(|(kind, lens_point)| {
            let real = image.nature == ImageNature::Real;
            let direction = if real {
                image_tip - lens_point
            } else {
                lens_point - image_tip
            };
            ConstructionRay {
                kind,
                start: tip,
                lens_point,
                end: extend_to(lens_point, direction, right_edge),
                virtual_extension: (!real).then_some((lens_point, image_tip)),
            }
        })
        .collect()
    }
}

impl Default for ThinLens {
    fn default() -> Self {
        Self::new(LensKind::Converging, 150.0, 300.0)
    }
}

/// Follow `direction` from `from` until x reaches `right_edge`
fn extend_to(from: Vec2, direction: Vec2, right_edge: f32) -> Vec2 {
    if direction.x <= f32::EPSILON {
        return from + direction.normalize_or_zero() * 1000.0;
    }
    from + direction * ((right_edge - from.x) / direction.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance_to_line(p: Vec2, a: Vec2, b: Vec2) -> f32 {
        (b - a).perp_dot(p - a).abs() / (b - a).length()
    }

    #[test]
    fn test_real_inverted_at_2f() {
        let image = ThinLens::new(LensKind::Converging, 150.0, 300.0).image().unwrap();
        assert!((image.distance - 300.0).abs() < 1e-3);
        assert!((image.magnification + 1.0).abs() < 1e-5);
        assert_eq!(image.nature, ImageNature::Real);
        assert_eq!(image.orientation, Orientation::Inverted);
    }

    #[test]
    fn test_virtual_upright_inside_focus() {
        let image = ThinLens::new(LensKind::Converging, 150.0, 100.0).image().unwrap();
        assert!(image.distance < 0.0);
        assert!((image.distance + 300.0).abs() < 1e-2);
        assert!(image.magnification > 0.0);
        assert_eq!(image.nature, ImageNature::Virtual);
        assert_eq!(image.orientation, Orientation::Upright);
    }

    #[test]
    fn test_object_at_focus_has_no_image() {
        let lens = ThinLens::new(LensKind::Converging, 150.0, 150.0);
        assert!(lens.image().is_none());
        assert!(lens.construction_rays(Vec2::new(400.0, 300.0), 800.0).is_empty());
    }

    #[test]
    fn test_diverging_always_virtual() {
        for d_o in [100.0, 150.0, 300.0, 500.0] {
            let image = ThinLens::new(LensKind::Diverging, 150.0, d_o).image().unwrap();
            assert_eq!(image.nature, ImageNature::Virtual);
            assert_eq!(image.orientation, Orientation::Upright);
            assert!(image.magnification < 1.0);
        }
    }

    #[test]
    fn test_rays_meet_at_image() {
        let center = Vec2::new(400.0, 300.0);
        for lens in [
            ThinLens::new(LensKind::Converging, 150.0, 300.0),
            ThinLens::new(LensKind::Converging, 150.0, 100.0),
            ThinLens::new(LensKind::Diverging, 120.0, 250.0),
        ] {
            let image_tip = lens.image_tip(center).unwrap();
            let rays = lens.construction_rays(center, 800.0);
            assert_eq!(rays.len(), 3);
            for ray in rays {
                assert!(
                    distance_to_line(image_tip, ray.lens_point, ray.end) < 0.05,
                    "{:?} misses the image of {:?}",
                    ray.kind,
                    lens
                );
                assert_eq!(ray.virtual_extension.is_some(), lens.image().unwrap().distance < 0.0);
            }
        }
    }

    #[test]
    fn test_constructor_clamps_to_ranges() {
        let lens = ThinLens::new(LensKind::Converging, 400.0, 0.0);
        assert_eq!(lens.object_distance, 100.0);
        assert_eq!(lens.focal_length, 250.0);
        let image = lens.image().unwrap();
        assert!(image.distance.is_finite() && image.magnification.is_finite());
    }

    #[test]
    fn test_lens_serializes() {
        let lens = ThinLens::new(LensKind::Diverging, 120.0, 250.0);
        let json = serde_json::to_string(&lens).unwrap();
        let back: ThinLens = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lens);
    }

    #[test]
    fn test_focal_ray_leaves_parallel() {
        let center = Vec2::new(400.0, 300.0);
        let lens = ThinLens::default();
        let focal = lens
            .construction_rays(center, 800.0)
            .into_iter()
            .find(|r| r.kind == RayKind::Focal)
            .unwrap();
        assert!((focal.end.y - focal.lens_point.y).abs() < 1e-3);
    }
}
