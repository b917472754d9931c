//! Drawing for the field scenes

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use common::{Canvas, Color, Paint, Path, Stroke, TextAlign, TextStyle};
use glam::Vec2;

use crate::electric::{ElectricField, HIT_RADIUS};
use crate::magnetic::{MagneticField, WireConfiguration, LOOP_RADIUS, SOLENOID_HEIGHT, SOLENOID_WIDTH};

pub const BACKGROUND: Color = Color::rgb(0.059, 0.059, 0.118);
const ELECTRIC_ARROW: Color = Color::rgb(0.4, 0.494, 0.918);
const MAGNETIC_MARKER: Color = Color::rgb(0.541, 0.169, 0.886);
const WIRE: Color = Color::rgb(1.0, 0.42, 0.42);
const FORCE: Color = Color::rgb(0.0, 1.0, 0.0);
const NORTH: Color = Color::rgb(1.0, 0.267, 0.267);
const SOUTH: Color = Color::rgb(0.267, 0.267, 1.0);

pub fn draw_electric(canvas: &mut dyn Canvas, field: &ElectricField, show_field: bool, show_force: bool) {
    canvas.clear(BACKGROUND);
    let size = canvas.size();

    if show_field {
        for sample in field.sample_grid(size.x, size.y) {
            let tip = sample.tip();
            canvas.line(
                sample.position,
                tip,
                Stroke::new(ELECTRIC_ARROW.with_alpha(sample.strength * 0.6), 1.0),
            );
            canvas.fill_circle(tip, 2.0, ELECTRIC_ARROW.with_alpha(sample.strength * 0.8));
        }
    }

    let sign = TextStyle::new(Color::WHITE, 20.0).align(TextAlign::Center);
    for charge in &field.charges {
        let (inner, outer, symbol) = if charge.is_positive() {
            (Color::hex(0xff4444), Color::hex(0xcc0000), "+")
        } else {
            (Color::hex(0x4444ff), Color::hex(0x0000cc), "−")
        };
        canvas.fill_path(
            Path::circle(charge.position, HIT_RADIUS),
            Paint::radial(charge.position, HIT_RADIUS, &[(0.0, inner), (1.0, outer)]),
        );
        canvas.stroke_circle(charge.position, HIT_RADIUS, Stroke::new(Color::WHITE, 2.0));
        canvas.fill_text(charge.position, symbol, sign);
    }

    if show_force {
        let point = field.test_point;
        let force = field.test_force();
        let tip = point + force.normalize_or_zero() * field.force_arrow_length();
        canvas.line(point, tip, Stroke::new(FORCE, 3.0));
        canvas.fill_circle(point, 5.0, FORCE);
        canvas.fill_text(
            point - Vec2::new(0.0, 20.0),
            &format!("F = {:.2e} N", force.length()),
            TextStyle::new(Color::WHITE, 14.0).align(TextAlign::Center),
        );
    }
}

pub fn draw_magnetic(canvas: &mut dyn Canvas, field: &MagneticField, show_compass: bool) {
    canvas.clear(BACKGROUND);
    let center = field.center();
    let label = TextStyle::new(Color::WHITE, 16.0);
    let arrow_glyph = TextStyle::new(Color::WHITE, 24.0).align(TextAlign::Center);
    let flow = if field.current > 0.0 { "→" } else { "←" };
    let current_text = format!("I = {:.1} A", field.current);

    match field.configuration {
        WireConfiguration::Straight => {
            canvas.line(
                Vec2::new(0.0, center.y),
                Vec2::new(field.width, center.y),
                Stroke::new(WIRE, 8.0),
            );
            canvas.fill_text(Vec2::new(20.0, center.y - 20.0), &current_text, label);
            canvas.fill_text(Vec2::new(field.width - 50.0, center.y), flow, arrow_glyph);
        }
        WireConfiguration::Loop => {
            canvas.stroke_circle(center, LOOP_RADIUS, Stroke::new(WIRE, 8.0));
            // flow marker on the lower right of the loop
            let at = center + Vec2::from_angle(FRAC_PI_4) * LOOP_RADIUS;
            let tangent = FRAC_PI_4 + field.current.signum() * FRAC_PI_2;
            let back_left = at - Vec2::from_angle(tangent - 0.3) * 15.0;
            let back_right = at - Vec2::from_angle(tangent + 0.3) * 15.0;
            canvas.fill_path(Path::polygon(&[at, back_left, back_right]), Color::WHITE.into());
            canvas.fill_text(
                center - Vec2::new(0.0, LOOP_RADIUS + 20.0),
                &current_text,
                label.align(TextAlign::Center),
            );
        }
        WireConfiguration::Solenoid => {
            let coils = 8;
            let pitch = SOLENOID_WIDTH / coils as f32;
            let left = center.x - SOLENOID_WIDTH / 2.0;
            let radius = SOLENOID_HEIGHT / 4.0;
            for i in 0..coils {
                let x = left + pitch * i as f32;
                canvas.stroke_path(
                    Path::new().arc(Vec2::new(x, center.y), radius, 0.0, -PI),
                    Stroke::new(WIRE, 4.0),
                );
                canvas.stroke_path(
                    Path::new().arc(Vec2::new(x + pitch, center.y), radius, PI, 0.0),
                    Stroke::new(WIRE, 4.0),
                );
            }
            let top = center.y - radius;
            canvas.line(
                Vec2::new(left, top),
                Vec2::new(left + SOLENOID_WIDTH, top),
                Stroke::new(WIRE, 6.0),
            );
            canvas.fill_text(Vec2::new(left + SOLENOID_WIDTH + 30.0, top), flow, arrow_glyph);
            canvas.fill_text(
                center - Vec2::new(0.0, SOLENOID_HEIGHT / 2.0 + 30.0),
                &current_text,
                label.align(TextAlign::Center),
            );
        }
    }

    for marker in field.sample_markers() {
        canvas.stroke_circle(
            marker.position,
            8.0 * marker.strength,
            Stroke::new(MAGNETIC_MARKER.with_alpha(marker.strength * 0.8), 1.5),
        );
        canvas.fill_circle(marker.position, 2.0, MAGNETIC_MARKER.with_alpha(marker.strength));
    }

    if show_compass {
        draw_compass(canvas, field.compass, field.compass_angle());
    }
}

fn draw_compass(canvas: &mut dyn Canvas, at: Vec2, angle: f32) {
    canvas.fill_circle(at, 25.0, Color::WHITE.with_alpha(0.2));
    canvas.stroke_circle(at, 25.0, Stroke::new(Color::WHITE, 2.0));
    let along = Vec2::from_angle(angle);
    let across = along.perp();
    canvas.fill_path(
        Path::polygon(&[at + along * 20.0, at - along * 5.0 - across * 5.0, at - along * 5.0 + across * 5.0]),
        NORTH.into(),
    );
    canvas.fill_path(
        Path::polygon(&[at - along * 20.0, at + along * 5.0 - across * 5.0, at + along * 5.0 + across * 5.0]),
        SOUTH.into(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CommandRecorder, DrawCommand};

    #[test]
    fn test_electric_draws_each_charge() {
        let field = ElectricField::default();
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_electric(&mut recorder, &field, false, false);
        let radial = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { paint: Paint::Radial { .. }, .. }))
            .count();
        assert_eq!(radial, 2);
        assert_eq!(recorder.texts(), vec!["+", "−"]);
    }

    #[test]
    fn test_force_label_only_when_enabled() {
        let field = ElectricField::default();
        let mut recorder = CommandRecorder::new(800.0, 600.0);
        draw_electric(&mut recorder, &field, true, true);
        assert!(recorder.texts().iter().any(|t| t.starts_with("F = ")));
    }

    #[test]
    fn test_magnetic_draws_every_configuration() {
        for configuration in WireConfiguration::ALL {
            let field = MagneticField::new(configuration);
            let mut recorder = CommandRecorder::new(800.0, 600.0);
            draw_magnetic(&mut recorder, &field, true);
            assert!(recorder.texts().contains(&"I = 5.0 A"));
            assert!(recorder.count_fills() > field.sample_markers().len());
        }
    }
}
