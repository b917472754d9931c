//! Drawing for the optics scenes

use std::f32::consts::FRAC_PI_2;

use common::{Canvas, Color, Paint, Path, Rect, Stroke, TextAlign, TextStyle};
use glam::Vec2;

use crate::lens::{ImageNature, LensKind, Orientation, ThinLens};
use crate::prism::{mean_index, Prism, SPECTRUM};
use crate::refraction::{Interaction, RefractionSetup};

pub const BACKGROUND: Color = Color::rgb(0.059, 0.059, 0.118);
const INCIDENT: Color = Color::rgb(1.0, 0.42, 0.42);
const REFRACTED: Color = Color::rgb(0.306, 0.804, 0.769);
const REFLECTED: Color = Color::rgb(1.0, 0.667, 0.0);
const GLASS_EDGE: Color = Color::rgb(0.4, 0.6, 1.0);
const GUIDE: Color = Color::rgba(1.0, 1.0, 1.0, 0.3);

/// Solid arrow head at `tip` pointing along `direction`
fn arrow_head(canvas: &mut dyn Canvas, tip: Vec2, direction: Vec2, color: Color) {
    let back = direction.normalize_or_zero() * 10.0;
    let side = back.perp() * 0.3;
    canvas.fill_path(Path::polygon(&[tip, tip - back + side, tip - back - side]), color.into());
}

pub fn draw_refraction(canvas: &mut dyn Canvas, setup: &RefractionSetup, show_normal: bool, show_angles: bool) {
    canvas.clear(BACKGROUND);
    let size = canvas.size();
    let interface = Vec2::new(size.x / 2.0, size.y / 2.0);

    canvas.fill_rect(Rect::new(0.0, 0.0, size.x, interface.y), setup.upper.tint());
    canvas.fill_rect(Rect::new(0.0, interface.y, size.x, size.y - interface.y), setup.lower.tint());
    canvas.line(
        Vec2::new(0.0, interface.y),
        Vec2::new(size.x, interface.y),
        Stroke::new(Color::WHITE, 2.0).dashed(&[10.0, 5.0]),
    );
    if show_normal {
        canvas.line(
            Vec2::new(interface.x, 0.0),
            Vec2::new(interface.x, size.y),
            Stroke::new(GUIDE, 1.0).dashed(&[5.0, 5.0]),
        );
    }

    let theta1 = setup.incidence.to_radians();
    let ray_length = 300.0;
    let source = interface - Vec2::new(theta1.sin(), theta1.cos()) * ray_length;
    canvas.line(source, interface, Stroke::new(INCIDENT, 3.0));
    arrow_head(canvas, interface, interface - source, INCIDENT);

    let interaction = setup.interaction();
    match interaction {
        Interaction::Refracted { angle } => {
            let end = interface + Vec2::new(angle.sin(), angle.cos()) * ray_length;
            canvas.line(interface, end, Stroke::new(REFRACTED, 3.0));
            arrow_head(canvas, end, end - interface, REFRACTED);
        }
        Interaction::TotalInternalReflection { reflected } => {
            let end = interface + Vec2::new(reflected.sin(), -reflected.cos()) * ray_length;
            canvas.line(interface, end, Stroke::new(REFLECTED, 3.0));
            arrow_head(canvas, end, end - interface, REFLECTED);
            canvas.fill_text(
                interface + Vec2::new(50.0, 100.0),
                "Total Internal Reflection!",
                TextStyle::new(REFLECTED, 18.0),
            );
        }
    }

    if show_angles {
        // angles measured from the normal, drawn as arcs around the point of incidence
        canvas.stroke_path(
            Path::new().arc(interface, 60.0, -FRAC_PI_2 - theta1, -FRAC_PI_2),
            Stroke::new(INCIDENT.with_alpha(0.5), 2.0),
        );
        canvas.fill_text(
            interface + Vec2::new(70.0, -80.0),
            &format!("θ₁ = {:.0}°", setup.incidence),
            TextStyle::new(INCIDENT, 14.0),
        );
        if let Interaction::Refracted { angle } = interaction {
            canvas.stroke_path(
                Path::new().arc(interface, 60.0, FRAC_PI_2 - angle, FRAC_PI_2),
                Stroke::new(REFRACTED.with_alpha(0.5), 2.0),
            );
            canvas.fill_text(
                interface + Vec2::new(70.0, 100.0),
                &format!("θ₂ = {:.1}°", angle.to_degrees()),
                TextStyle::new(REFRACTED, 14.0),
            );
        }
    }

    let heading = TextStyle::new(Color::WHITE, 16.0).align(TextAlign::Center);
    canvas.fill_text(
        Vec2::new(size.x / 2.0, 30.0),
        &format!("{} (n = {:.2})", setup.upper.label(), setup.upper.index()),
        heading,
    );
    canvas.fill_text(
        Vec2::new(size.x / 2.0, size.y - 20.0),
        &format!("{} (n = {:.2})", setup.lower.label(), setup.lower.index()),
        heading,
    );
    canvas.fill_text(
        Vec2::new(20.0, size.y - 20.0),
        "Snell's Law: n₁sin(θ₁) = n₂sin(θ₂)",
        TextStyle::new(Color::WHITE.with_alpha(0.7), 14.0),
    );
}

/// `phase` in 0..360 drives the photons travelling along the white beam
pub fn draw_prism(canvas: &mut dyn Canvas, prism: &Prism, show_spectrum: bool, phase: Option<f32>) {
    canvas.clear(BACKGROUND);
    let size = canvas.size();
    let [apex, right, left] = prism.vertices();

    let centroid = (apex + right + left) / 3.0;
    canvas.fill_path(
        Path::polygon(&[apex, right, left]),
        Paint::linear(
            centroid - Vec2::splat(100.0),
            centroid + Vec2::splat(100.0),
            &[
                (0.0, Color::rgba(0.39, 0.59, 1.0, 0.15)),
                (1.0, Color::rgba(0.59, 0.39, 1.0, 0.25)),
            ],
        ),
    );
    canvas.stroke_path(Path::polygon(&[apex, right, left]), Stroke::new(GLASS_EDGE, 3.0));

    let entry = prism.entry_point();
    let incoming = prism.incident_direction();
    let source = entry - incoming * 250.0;
    canvas.line(source, entry, Stroke::new(Color::WHITE.with_alpha(0.8), 4.0));

    let exit_length = size.x;
    if show_spectrum {
        for (band, trace) in prism.trace_spectrum() {
            let Some(trace) = trace else { continue };
            let color = band.color().with_alpha(0.8);
            canvas.line(trace.entry, trace.exit, Stroke::new(color, 3.0));
            if let Some(outgoing) = trace.outgoing {
                canvas.line(trace.exit, trace.exit + outgoing * exit_length, Stroke::new(color, 3.0));
            }
        }
    } else if let Some(trace) = prism.trace(mean_index()) {
        let white = Color::WHITE.with_alpha(0.7);
        canvas.line(trace.entry, trace.exit, Stroke::new(white, 3.0));
        if let Some(outgoing) = trace.outgoing {
            canvas.line(trace.exit, trace.exit + outgoing * exit_length, Stroke::new(white, 3.0));
        }
    }

    if let Some(phase) = phase {
        let beam = entry - source;
        for i in 0..3 {
            let t = ((phase + i as f32 * 120.0) % 360.0) / 360.0;
            canvas.fill_circle(source + beam * t, 4.0, Color::WHITE.with_alpha(0.8));
        }
    }

    let label = TextStyle::new(Color::WHITE, 16.0);
    canvas.fill_text(source - Vec2::new(0.0, 30.0), "White Light", label);

    if show_spectrum {
        let legend = Vec2::new(size.x - 200.0, 100.0);
        canvas.fill_text(legend, "Spectrum:", TextStyle::new(Color::WHITE, 14.0));
        for (i, band) in SPECTRUM.iter().enumerate() {
            let row = legend + Vec2::new(0.0, 20.0 + i as f32 * 25.0);
            canvas.fill_rect(Rect::new(row.x, row.y, 30.0, 15.0), band.color());
            canvas.fill_text(
                row + Vec2::new(40.0, 8.0),
                &format!("{} ({:.0}nm)", band.name, band.wavelength),
                TextStyle::new(Color::WHITE, 12.0),
            );
        }
    }

    if let Some(spread) = prism.angular_spread() {
        canvas.fill_text(
            Vec2::new(20.0, size.y - 20.0),
            &format!("Dispersion: {:.2}°", spread),
            TextStyle::new(Color::WHITE.with_alpha(0.7), 14.0),
        );
    }
}

pub fn draw_lens(canvas: &mut dyn Canvas, lens: &ThinLens, show_rays: bool) {
    canvas.clear(BACKGROUND);
    let size = canvas.size();
    let center = size / 2.0;

    canvas.line(
        Vec2::new(0.0, center.y),
        Vec2::new(size.x, center.y),
        Stroke::new(Color::WHITE.with_alpha(0.2), 1.0).dashed(&[5.0, 5.0]),
    );

    // lens body: bulging sides for converging, pinched for diverging
    let half_height = 100.0;
    let bulge = match lens.kind {
        LensKind::Converging => 30.0,
        LensKind::Diverging => -30.0,
    };
    let top = center - Vec2::new(0.0, half_height);
    let bottom = center + Vec2::new(0.0, half_height);
    let body = Path::new()
        .move_to(top)
        .quad_to(center + Vec2::new(bulge, 0.0), bottom)
        .quad_to(center - Vec2::new(bulge, 0.0), top)
        .close();
    canvas.fill_path(body.clone(), Color::rgba(0.39, 0.59, 1.0, 0.2).into());
    canvas.stroke_path(body, Stroke::new(GLASS_EDGE, 3.0));
    canvas.line(
        Vec2::new(center.x, 0.0),
        Vec2::new(center.x, size.y),
        Stroke::new(GUIDE, 1.0).dashed(&[5.0, 5.0]),
    );

    let f = lens.signed_focal_length();
    let focus = Color::rgba(1.0, 0.78, 0.0, 0.9);
    for (offset, label) in [(-f, "F"), (f, "F"), (-2.0 * f, "2F"), (2.0 * f, "2F")] {
        let at = center + Vec2::new(offset, 0.0);
        canvas.fill_circle(at, 4.0, focus);
        canvas.fill_text(at + Vec2::new(0.0, 20.0), label, TextStyle::new(focus, 12.0).align(TextAlign::Center));
    }

    let object_base = center - Vec2::new(lens.object_distance, 0.0);
    let object_tip = lens.object_tip(center);
    canvas.line(object_base, object_tip, Stroke::new(INCIDENT, 4.0));
    arrow_head(canvas, object_tip, object_tip - object_base, INCIDENT);
    canvas.fill_text(
        object_base + Vec2::new(0.0, 25.0),
        "Object",
        TextStyle::new(Color::WHITE, 14.0).align(TextAlign::Center),
    );

    let Some(image) = lens.image() else {
        canvas.fill_text(
            Vec2::new(center.x, size.y - 40.0),
            "Object at the focal point: image at infinity",
            TextStyle::new(Color::WHITE, 14.0).align(TextAlign::Center),
        );
        return;
    };

    if show_rays {
        let colors = [Color::hex(0x00ff88), Color::hex(0xff00ff), Color::hex(0x00aaff)];
        for (ray, color) in lens.construction_rays(center, size.x).iter().zip(colors) {
            canvas.stroke_path(
                Path::polyline(&[ray.start, ray.lens_point, ray.end]),
                Stroke::new(color, 2.0),
            );
            if let Some((from, to)) = ray.virtual_extension {
                canvas.line(from, to, Stroke::new(color.with_alpha(0.5), 1.5).dashed(&[6.0, 4.0]));
            }
        }
    }

    if image.distance.abs() < size.x * 0.75 {
        let base = center + Vec2::new(image.distance, 0.0);
        let tip = base - Vec2::new(0.0, image.height);
        let color = match image.orientation {
            Orientation::Upright => REFRACTED,
            Orientation::Inverted => Color::hex(0xffaa44),
        };
        let stroke = match image.nature {
            ImageNature::Real => Stroke::new(color, 4.0),
            ImageNature::Virtual => Stroke::new(color, 4.0).dashed(&[10.0, 5.0]),
        };
        canvas.line(base, tip, stroke);
        arrow_head(canvas, tip, tip - base, color);
        canvas.fill_text(
            base + Vec2::new(0.0, 25.0),
            &format!("Image ({:?}, {:?})", image.nature, image.orientation),
            TextStyle::new(Color::WHITE, 14.0).align(TextAlign::Center),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refraction::Material;
    use common::{CommandRecorder, DrawCommand};

    #[test]
    fn test_tir_banner() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_refraction(&mut recorder, &RefractionSetup::new(Material::Water, Material::Air, 60.0), true, true);
        assert!(recorder.texts().contains(&"Total Internal Reflection!"));
        assert!(!recorder.texts().iter().any(|t| t.starts_with("θ₂")));

        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_refraction(&mut recorder, &RefractionSetup::default(), true, true);
        assert!(recorder.texts().contains(&"θ₂ = 22.1°"));
    }

    #[test]
    fn test_prism_draws_seven_bands() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_prism(&mut recorder, &Prism::default(), true, None);
        let legend_rows = recorder.texts().iter().filter(|t| t.ends_with("nm)")).count();
        assert_eq!(legend_rows, 7);
        assert!(recorder.count_strokes() >= 1 + 1 + 14);
        assert!(matches!(
            recorder.commands[1],
            DrawCommand::FillPath { paint: Paint::Linear { .. }, .. }
        ));
    }

    #[test]
    fn test_lens_labels_image() {
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_lens(&mut recorder, &ThinLens::default(), true);
        assert!(recorder.texts().contains(&"Image (Real, Inverted)"));

        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_lens(&mut recorder, &ThinLens::new(LensKind::Converging, 150.0, 150.0), true);
        assert!(!recorder.texts().iter().any(|t| t.starts_with("Image")));
    }
}
