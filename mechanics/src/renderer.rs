//! Drawing for the mechanics scenes
//!
//! Every function here is a pure function of simulation state.

use common::{Canvas, Color, Paint, Path, Rect, Stroke, TextAlign, TextStyle, Viewport};
use glam::{DVec2, Vec2};

use crate::cradle::NewtonsCradle;
use crate::faraday::FaradayExperiment;
use crate::hydraulics::HydraulicPress;
use crate::pendulum::Pendulum;
use crate::projectile::Projectile;

pub const BACKGROUND: Color = Color::rgb(0.04, 0.04, 0.06);
pub const GRID: Color = Color::rgb(0.1, 0.1, 0.12);
const FRAME_COLOR: Color = Color::rgb(0.32, 0.32, 0.32);
const STRING_COLOR: Color = Color::rgb(0.25, 0.25, 0.25);
const VECTOR_COLOR: Color = Color::rgb(0.06, 0.73, 0.51);
const KE_COLOR: Color = Color::rgb(0.23, 0.51, 0.96);
const PE_COLOR: Color = Color::rgb(0.94, 0.27, 0.27);
const LABEL: Color = Color::rgb(0.85, 0.85, 0.85);

fn metal_ball(canvas: &mut dyn Canvas, center: Vec2, radius: f32) {
    let paint = Paint::radial(
        center - Vec2::splat(radius * 0.3),
        radius * 1.3,
        &[
            (0.0, Color::hex(0xe5e5e5)),
            (1.0, Color::hex(0x737373)),
        ],
    );
    canvas.fill_path(Path::circle(center, radius), paint);
    canvas.stroke_circle(center, radius, Stroke::new(Color::hex(0x262626), 2.0));
}

fn background(canvas: &mut dyn Canvas) {
    canvas.clear(BACKGROUND);
    canvas.grid(50.0, GRID);
}

pub fn draw_pendulum(canvas: &mut dyn Canvas, pendulum: &Pendulum, anchor: Vec2, trail: &[Vec2]) {
    background(canvas);

    canvas.line(
        anchor - Vec2::new(60.0, 0.0),
        anchor + Vec2::new(60.0, 0.0),
        Stroke::new(FRAME_COLOR, 6.0),
    );

    if trail.len() > 1 {
        canvas.stroke_path(
            Path::polyline(trail),
            Stroke::new(KE_COLOR.with_alpha(0.4), 1.5),
        );
    }

    let bob = pendulum.bob_position(anchor);
    canvas.line(anchor, bob, Stroke::new(STRING_COLOR, 2.0));
    metal_ball(canvas, bob, 20.0);

    // swing arc for reference
    let amplitude = pendulum.angle.abs().max(0.05);
    let arc = Path::new().arc(
        anchor,
        pendulum.config.length,
        std::f32::consts::FRAC_PI_2 - amplitude,
        std::f32::consts::FRAC_PI_2 + amplitude,
    );
    canvas.stroke_path(arc, Stroke::new(GRID.lerp(Color::WHITE, 0.2), 1.0).dashed(&[4.0, 4.0]));

    let style = TextStyle::new(LABEL, 14.0);
    canvas.fill_text(
        Vec2::new(20.0, 24.0),
        &format!("θ = {:.1}°", pendulum.angle.to_degrees()),
        style,
    );
    canvas.fill_text(
        Vec2::new(20.0, 44.0),
        &format!("t = {:.1} s", pendulum.time),
        style,
    );
    let size = canvas.size();
    energy_bar(
        canvas,
        Vec2::new(size.x - 60.0, size.y - 60.0),
        30.0,
        pendulum.kinetic_energy(),
        pendulum.potential_energy(),
        150.0 / pendulum.total_energy().max(1e-3),
    );
}

/// Stacked KE/PE bar growing upwards from `base`
fn energy_bar(canvas: &mut dyn Canvas, base: Vec2, width: f32, ke: f32, pe: f32, scale: f32) {
    let total = ke + pe;
    if total <= 0.0 {
        return;
    }
    let height = total * scale;
    let ke_height = height * ke / total;
    let left = base.x - width / 2.0;
    canvas.fill_rect(Rect::new(left, base.y - ke_height, width, ke_height), KE_COLOR);
    canvas.fill_rect(Rect::new(left, base.y - height, width, height - ke_height), PE_COLOR);
    canvas.stroke_rect(
        Rect::new(left, base.y - height, width, height),
        Stroke::new(FRAME_COLOR, 1.0),
    );
}

pub fn draw_cradle(
    canvas: &mut dyn Canvas,
    cradle: &NewtonsCradle,
    anchor_y: f32,
    show_vectors: bool,
    show_energy: bool,
) {
    background(canvas);

    let config = &cradle.config;
    let frame_width = (config.ball_count.saturating_sub(1)) as f32 * config.spacing()
        + config.ball_radius * 4.0;
    let left = cradle.center_x - frame_width / 2.0;
    let right = cradle.center_x + frame_width / 2.0;
    canvas.stroke_path(
        Path::polyline(&[
            Vec2::new(left, anchor_y - 20.0),
            Vec2::new(left, anchor_y),
            Vec2::new(right, anchor_y),
            Vec2::new(right, anchor_y - 20.0),
        ]),
        Stroke::new(FRAME_COLOR, 6.0),
    );

    let bar_base = canvas.size().y - 60.0;
    for ball in &cradle.balls {
        let position = ball.position(anchor_y);
        canvas.line(
            Vec2::new(ball.anchor_x, anchor_y),
            position,
            Stroke::new(STRING_COLOR, 2.0),
        );
        metal_ball(canvas, position, ball.radius);

        if show_vectors && ball.angular_velocity.abs() > 0.01 {
            let v = ball.velocity();
            let tip = position + Vec2::new(ball.angle.cos(), -ball.angle.sin()) * v * 5.0;
            canvas.arrow(position, tip, VECTOR_COLOR, 3.0, 10.0);
        }

        if show_energy {
            energy_bar(
                canvas,
                Vec2::new(ball.anchor_x, bar_base),
                config.spacing() * 0.6,
                ball.kinetic_energy(),
                ball.potential_energy(config.gravity),
                0.5,
            );
        }
    }
}

pub fn draw_faraday(canvas: &mut dyn Canvas, experiment: &FaradayExperiment, show_field: bool) {
    background(canvas);
    let config = &experiment.config;
    let mid_y = canvas.size().y / 2.0;

    // coil windings
    let coil_half = config.coil_radius;
    for i in 0..8 {
        let x = config.coil_center - coil_half + i as f32 * (2.0 * coil_half / 7.0);
        canvas.stroke_path(
            Path::new()
                .move_to(Vec2::new(x, mid_y - 60.0))
                .quad_to(Vec2::new(x + 12.0, mid_y), Vec2::new(x, mid_y + 60.0)),
            Stroke::new(Color::hex(0xb87333), 4.0),
        );
    }

    // galvanometer needle swings with the current
    let meter = Vec2::new(config.coil_center + 150.0, mid_y + 120.0);
    canvas.stroke_circle(meter, 40.0, Stroke::new(FRAME_COLOR, 3.0));
    let needle = (experiment.current() * 3.0).clamp(-1.2, 1.2);
    let tip = meter + Vec2::new(needle.sin(), -needle.cos()) * 34.0;
    let current_color = if experiment.current() > 0.0 {
        Color::hex(0x00ff00)
    } else if experiment.current() < 0.0 {
        Color::hex(0xff0000)
    } else {
        Color::hex(0x888888)
    };
    canvas.line(meter, tip, Stroke::new(current_color, 2.0));
    canvas.fill_text(
        meter + Vec2::new(0.0, 58.0),
        "Current",
        TextStyle::new(LABEL, 13.0).align(TextAlign::Center),
    );

    if show_field {
        // dipole field loops around the magnet
        for k in 1..=4 {
            let r = 20.0 * k as f32;
            canvas.stroke_path(
                Path::new().arc(
                    Vec2::new(experiment.magnet_x, mid_y),
                    r + 20.0,
                    0.0,
                    std::f32::consts::TAU,
                ),
                Stroke::new(KE_COLOR.with_alpha(0.5 / k as f32), 1.0).dashed(&[3.0, 5.0]),
            );
        }
    }

    // magnet with north (red) and south (blue) halves
    let magnet = Rect::new(experiment.magnet_x - 20.0, mid_y - 30.0, 40.0, 60.0);
    canvas.fill_rect(Rect::new(magnet.min.x, magnet.min.y, 20.0, 60.0), PE_COLOR);
    canvas.fill_rect(Rect::new(magnet.min.x + 20.0, magnet.min.y, 20.0, 60.0), KE_COLOR);
    canvas.stroke_rect(magnet, Stroke::new(Color::WHITE, 2.0));
    let letter = TextStyle::new(Color::WHITE, 16.0).align(TextAlign::Center);
    canvas.fill_text(Vec2::new(experiment.magnet_x - 10.0, mid_y), "N", letter);
    canvas.fill_text(Vec2::new(experiment.magnet_x + 10.0, mid_y), "S", letter);

    if experiment.velocity.abs() > 0.1 {
        let dir = experiment.velocity.signum();
        let start = Vec2::new(experiment.magnet_x + dir * 30.0, mid_y - 45.0);
        canvas.arrow(start, start + Vec2::new(dir * 30.0, 0.0), VECTOR_COLOR, 2.0, 8.0);
    }

    let style = TextStyle::new(LABEL, 14.0);
    canvas.fill_text(Vec2::new(20.0, 24.0), &format!("Φ = {:.2} Wb", experiment.flux()), style);
    canvas.fill_text(Vec2::new(20.0, 44.0), &format!("ε = {:.2} V", experiment.emf()), style);
    canvas.fill_text(Vec2::new(20.0, 64.0), &format!("I = {:.3} A", experiment.current()), style);
}

pub fn draw_projectile(canvas: &mut dyn Canvas, projectile: &Projectile, viewport: &Viewport) {
    background(canvas);
    let to_px = |p: Vec2| viewport.to_pixel(DVec2::new(p.x as f64, p.y as f64)).as_vec2();
    let size = canvas.size();

    // ground
    let ground_y = to_px(Vec2::ZERO).y;
    canvas.fill_rect(
        Rect::new(0.0, ground_y, size.x, (size.y - ground_y).max(0.0)),
        Color::rgb(0.08, 0.16, 0.08),
    );
    canvas.line(
        Vec2::new(0.0, ground_y),
        Vec2::new(size.x, ground_y),
        Stroke::new(Color::rgb(0.2, 0.6, 0.2), 2.0),
    );

    // drag-free prediction
    let launch = projectile.launch;
    let g = projectile.config.gravity;
    let flight = launch.time_of_flight(g);
    if flight.is_finite() && flight > 0.0 {
        let v0 = launch.velocity();
        let points: Vec<Vec2> = (0..=60)
            .map(|i| {
                let t = flight * i as f32 / 60.0;
                to_px(Vec2::new(v0.x * t, launch.height + v0.y * t - 0.5 * g * t * t))
            })
            .collect();
        canvas.stroke_path(
            Path::polyline(&points),
            Stroke::new(LABEL.with_alpha(0.4), 1.0).dashed(&[6.0, 6.0]),
        );
    }

    if projectile.trail.len() > 1 {
        let points: Vec<Vec2> = projectile.trail.iter().map(|p| to_px(*p)).collect();
        canvas.stroke_path(Path::polyline(&points), Stroke::new(KE_COLOR, 2.0));
    }

    // launcher
    let origin = to_px(Vec2::new(0.0, launch.height));
    let barrel = launch.velocity().normalize_or_zero() * Vec2::new(1.0, -1.0) * 30.0;
    canvas.line(origin, origin + barrel, Stroke::new(FRAME_COLOR, 6.0));

    let ball = to_px(projectile.position);
    canvas.fill_circle(ball, 8.0, PE_COLOR);
    if !projectile.at_rest {
        let tip = ball + projectile.velocity * Vec2::new(1.0, -1.0) * 2.0;
        canvas.arrow(ball, tip, VECTOR_COLOR, 2.0, 8.0);
    }

    let style = TextStyle::new(LABEL, 14.0);
    canvas.fill_text(
        Vec2::new(20.0, 24.0),
        &format!("x = {:.2} m   y = {:.2} m", projectile.position.x, projectile.position.y),
        style,
    );
    canvas.fill_text(Vec2::new(20.0, 44.0), &format!("t = {:.2} s", projectile.time), style);
}

pub fn draw_press(canvas: &mut dyn Canvas, press: &HydraulicPress) {
    background(canvas);
    let size = canvas.size();
    let base_y = size.y * 0.75;
    let fluid = Color::rgba(0.23, 0.51, 0.96, 0.6);

    // piston widths scale with the square root of area
    let small_w = press.small_area.sqrt() * 12.0;
    let large_w = press.large_area.sqrt() * 12.0;
    let small_x = size.x * 0.3;
    let large_x = size.x * 0.65;
    let top = base_y - 200.0;

    let small_top = top + press.stroke;
    let large_top = top - press.large_displacement();

    // connecting channel and the two cylinders of fluid
    let channel_left = small_x - small_w / 2.0;
    let channel_right = large_x + large_w / 2.0;
    canvas.fill_rect(
        Rect::new(channel_left, base_y - 40.0, channel_right - channel_left, 40.0),
        fluid,
    );
    canvas.fill_rect(
        Rect::new(small_x - small_w / 2.0, small_top, small_w, base_y - small_top),
        fluid,
    );
    canvas.fill_rect(
        Rect::new(large_x - large_w / 2.0, large_top, large_w, base_y - large_top),
        fluid,
    );

    let piston = Color::hex(0x737373);
    canvas.fill_rect(Rect::new(small_x - small_w / 2.0, small_top - 15.0, small_w, 15.0), piston);
    canvas.fill_rect(Rect::new(large_x - large_w / 2.0, large_top - 15.0, large_w, 15.0), piston);

    canvas.arrow(
        Vec2::new(small_x, small_top - 80.0),
        Vec2::new(small_x, small_top - 18.0),
        PE_COLOR,
        3.0,
        10.0,
    );
    canvas.arrow(
        Vec2::new(large_x, large_top - 18.0),
        Vec2::new(large_x, large_top - 18.0 - 40.0 * press.mechanical_advantage().min(4.0)),
        VECTOR_COLOR,
        3.0,
        10.0,
    );

    let centered = TextStyle::new(LABEL, 14.0).align(TextAlign::Center);
    canvas.fill_text(
        Vec2::new(small_x, small_top - 95.0),
        &format!("F₁ = {:.0} N", press.applied_force),
        centered,
    );
    canvas.fill_text(
        Vec2::new(large_x, large_top - 30.0 - 40.0 * press.mechanical_advantage().min(4.0)),
        &format!("F₂ = {:.0} N", press.output_force()),
        centered,
    );
    canvas.fill_text(
        Vec2::new(size.x / 2.0, 40.0),
        &format!("Pressure: {:.2} N/cm²", press.pressure()),
        centered,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CommandRecorder, DrawCommand};

    #[test]
    fn test_cradle_draws_every_ball() {
        let cradle = NewtonsCradle::default();
        let mut recorder = CommandRecorder::new(900.0, 500.0);
        draw_cradle(&mut recorder, &cradle, 100.0, false, false);
        assert!(matches!(recorder.commands[0], DrawCommand::Clear(_)));

        let radial_fills = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { paint: Paint::Radial { .. }, .. }))
            .count();
        assert_eq!(radial_fills, 5);
    }

    #[test]
    fn test_drawing_is_pure() {
        let experiment = FaradayExperiment::default();
        let snapshot = experiment.clone();
        let mut a = CommandRecorder::new(800.0, 400.0);
        let mut b = CommandRecorder::new(800.0, 400.0);
        draw_faraday(&mut a, &experiment, true);
        draw_faraday(&mut b, &experiment, true);
        assert_eq!(a.commands, b.commands);
        assert_eq!(experiment, snapshot);
    }

    #[test]
    fn test_press_labels() {
        let mut recorder = CommandRecorder::new(800.0, 500.0);
        draw_press(&mut recorder, &HydraulicPress::default());
        let texts = recorder.texts();
        assert!(texts.contains(&"F₂ = 200 N"));
        assert!(texts.contains(&"Pressure: 5.00 N/cm²"));
    }
}
