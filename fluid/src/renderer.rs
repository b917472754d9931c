//! Drawing for the fluid scene

use common::{Canvas, Color, Stroke, TextAlign, TextStyle};
use glam::Vec2;

use crate::sph::FluidSimulation;

pub const BACKGROUND: Color = Color::rgb(0.039, 0.039, 0.039);
pub const GRID: Color = Color::rgb(0.102, 0.102, 0.102);
const VELOCITY: Color = Color::rgb(0.063, 0.725, 0.506);

/// Opacity grows with density so packed regions read as deeper fluid
pub fn particle_alpha(density: f32, target_density: f32) -> f32 {
    (density / target_density).min(1.0) * 0.8 + 0.2
}

pub fn draw_fluid(canvas: &mut dyn Canvas, sim: &FluidSimulation, show_velocity: bool, running: bool) {
    canvas.clear(BACKGROUND);
    canvas.grid(50.0, GRID);

    let config = &sim.config;
    for particle in &sim.particles {
        let alpha = particle_alpha(particle.density, config.target_density);
        canvas.fill_circle(
            particle.position,
            config.particle_radius,
            particle.kind.color().with_alpha(alpha),
        );
    }

    if show_velocity {
        let stroke = Stroke::new(VELOCITY.with_alpha(0.5), 1.0);
        for particle in &sim.particles {
            if particle.speed() > 0.1 {
                canvas.line(
                    particle.position,
                    particle.position + particle.velocity * 2.0,
                    stroke.clone(),
                );
            }
        }
    }

    if !running && sim.is_empty() {
        let size = canvas.size();
        canvas.fill_text(
            size / 2.0,
            "Click \"Start\" then click and drag to spawn fluid particles",
            TextStyle::new(Color::rgb(0.6, 0.6, 0.6), 16.0).align(TextAlign::Center),
        );
    }

    let stats = sim.stats();
    let style = TextStyle::new(Color::rgb(0.85, 0.85, 0.85), 14.0);
    canvas.fill_text(Vec2::new(20.0, 24.0), &format!("Particles: {}", stats.particle_count), style);
    canvas.fill_text(
        Vec2::new(20.0, 44.0),
        &format!("Avg velocity: {:.2}", stats.average_speed),
        style,
    );
}
