//! Smoothed-particle hydrodynamics in pixel units
//!
//! Positions are in pixels and velocities in pixels per frame; one call to
//! [`FluidSimulation::step`] advances one frame. Density and pressure are
//! evaluated first, then pressure forces are computed from a snapshot of the
//! positions so the result does not depend on particle order.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::{FluidKind, Particle};
use crate::spatial_hash::SpatialHash;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Downward acceleration in px/frame²
    pub gravity: f32,
    pub particle_radius: f32,
    /// Kernel support radius, also the hash cell size
    pub smoothing_radius: f32,
    pub target_density: f32,
    pub pressure_multiplier: f32,
    /// Scales the summed pressure force into a velocity change
    pub force_factor: f32,
    pub wall_restitution: f32,
    pub width: f32,
    pub height: f32,
    /// Spawned particles land within ±half of this around the pointer
    pub spawn_jitter: f32,
    pub spawn_speed: f32,
    /// Optional ceiling on the particle count; particles accumulate freely when `None`
    pub max_particles: Option<usize>,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            particle_radius: 3.0,
            smoothing_radius: 20.0,
            target_density: 2.5,
            pressure_multiplier: 0.5,
            force_factor: 0.1,
            wall_restitution: 0.5,
            width: 900.0,
            height: 600.0,
            spawn_jitter: 10.0,
            spawn_speed: 2.0,
            max_particles: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FluidStats {
    pub particle_count: usize,
    pub average_speed: f32,
    pub average_density: f32,
}

#[derive(Debug, Clone)]
pub struct FluidSimulation {
    pub config: FluidConfig,
    pub particles: Vec<Particle>,
    grid: SpatialHash,
    positions: Vec<Vec2>,
    forces: Vec<Vec2>,
}

impl FluidSimulation {
    pub fn new(config: FluidConfig) -> Self {
        Self {
            grid: SpatialHash::new(config.smoothing_radius),
            config,
            particles: Vec::new(),
            positions: Vec::new(),
            forces: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.grid.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
    }

    /// Smoothing kernel: (1 - d/h)² inside the support, zero outside
    pub fn kernel(&self, distance: f32) -> f32 {
        let h = self.config.smoothing_radius;
        if distance >= h {
            0.0
        } else {
            let q = 1.0 - distance / h;
            q * q
        }
    }

    /// Add `count` particles around `at` with random jitter and a random
    /// initial velocity. Returns how many were actually added.
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        at: Vec2,
        count: usize,
        kind: FluidKind,
    ) -> usize {
        let count = match self.config.max_particles {
            Some(limit) => count.min(limit.saturating_sub(self.particles.len())),
            None => count,
        };
        let jitter = self.config.spawn_jitter;
        for _ in 0..count {
            let offset = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * jitter;
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let speed = rng.gen::<f32>() * self.config.spawn_speed;
            self.particles.push(Particle::new(
                at + offset,
                Vec2::from_angle(angle) * speed,
                kind,
            ));
        }
        if let Some(limit) = self.config.max_particles.filter(|&l| self.particles.len() >= l) {
            log::trace!("Particle limit {limit} reached");
        }
        count
    }

    /// Advance one frame
    pub fn step(&mut self) {
        if self.particles.is_empty() {
            return;
        }
        self.positions.clear();
        self.positions.extend(self.particles.iter().map(|p| p.position));
        self.grid.rebuild(self.positions.iter().copied());

        self.compute_densities();
        self.compute_forces();
        self.integrate();
    }

    fn compute_densities(&mut self) {
        let config = self.config;
        for i in 0..self.particles.len() {
            let p = self.positions[i];
            // includes the particle itself, so density is never below 1
            let density: f32 = self
                .grid
                .candidates(p)
                .map(|j| self.kernel(self.positions[j].distance(p)))
                .sum();
            let particle = &mut self.particles[i];
            particle.density = density;
            particle.pressure = (density - config.target_density) * config.pressure_multiplier;
        }
    }

    fn compute_forces(&mut self) {
        let h = self.config.smoothing_radius;
        self.forces.clear();
        self.forces.resize(self.particles.len(), Vec2::ZERO);
        for i in 0..self.particles.len() {
            let p = self.positions[i];
            let pressure = self.particles[i].pressure;
            let mut force = Vec2::ZERO;
            for j in self.grid.candidates(p) {
                if j == i {
                    continue;
                }
                let delta = self.positions[j] - p;
                let distance = delta.length();
                if distance <= 0.0 || distance >= h {
                    continue;
                }
                let shared = (pressure + self.particles[j].pressure) / 2.0;
                let influence = 1.0 - distance / h;
                force -= delta / distance * shared * influence;
            }
            self.forces[i] = force;
        }
    }

    fn integrate(&mut self) {
        let config = self.config;
        let r = config.particle_radius;
        for (particle, force) in self.particles.iter_mut().zip(&self.forces) {
            particle.velocity += *force * config.force_factor;
            particle.velocity.y += config.gravity;
            particle.velocity *= particle.kind.viscosity();
            particle.position += particle.velocity;

            if particle.position.x < r {
                particle.position.x = r;
                particle.velocity.x *= -config.wall_restitution;
            } else if particle.position.x > config.width - r {
                particle.position.x = config.width - r;
                particle.velocity.x *= -config.wall_restitution;
            }
            if particle.position.y < r {
                particle.position.y = r;
                particle.velocity.y *= -config.wall_restitution;
            } else if particle.position.y > config.height - r {
                particle.position.y = config.height - r;
                particle.velocity.y *= -config.wall_restitution;
            }
        }
    }

    pub fn stats(&self) -> FluidStats {
        let n = self.particles.len();
        if n == 0 {
            return FluidStats::default();
        }
        let speed: f32 = self.particles.iter().map(Particle::speed).sum();
        let density: f32 = self.particles.iter().map(|p| p.density).sum();
        FluidStats {
            particle_count: n,
            average_speed: speed / n as f32,
            average_density: density / n as f32,
        }
    }
}

impl Default for FluidSimulation {
    fn default() -> Self {
        Self::new(FluidConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn weightless() -> FluidSimulation {
        FluidSimulation::new(FluidConfig {
            gravity: 0.0,
            ..FluidConfig::default()
        })
    }

    #[test]
    fn test_lone_particle_density_is_self() {
        let mut sim = weightless();
        sim.particles.push(Particle::new(Vec2::new(450.0, 300.0), Vec2::ZERO, FluidKind::Water));
        sim.step();
        let p = sim.particles[0];
        assert!((p.density - 1.0).abs() < 1e-6);
        assert!((p.pressure - (1.0 - 2.5) * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pair_density() {
        let mut sim = weightless();
        sim.particles.push(Particle::new(Vec2::new(400.0, 300.0), Vec2::ZERO, FluidKind::Water));
        sim.particles.push(Particle::new(Vec2::new(410.0, 300.0), Vec2::ZERO, FluidKind::Water));
        sim.step();
        // 1 + (1 - 10/20)²
        for p in &sim.particles {
            assert!((p.density - 1.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_pressure_forces_are_symmetric() {
        let mut sim = weightless();
        let mut rng = StdRng::seed_from_u64(3);
        sim.spawn(&mut rng, Vec2::new(450.0, 300.0), 40, FluidKind::Water);
        for p in &mut sim.particles {
            p.velocity = Vec2::ZERO;
        }
        sim.step();
        let momentum: Vec2 = sim.particles.iter().map(|p| p.velocity).sum();
        assert!(momentum.length() < 1e-3, "net momentum {momentum:?}");
    }

    #[test]
    fn test_result_independent_of_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut forward = weightless();
        forward.spawn(&mut rng, Vec2::new(300.0, 300.0), 30, FluidKind::Oil);
        let mut reversed = weightless();
        reversed.particles = forward.particles.iter().rev().copied().collect();

        forward.step();
        reversed.step();
        for (a, b) in forward.particles.iter().zip(reversed.particles.iter().rev()) {
            assert!(a.position.distance(b.position) < 1e-4);
        }
    }

    #[test]
    fn test_walls_reflect_and_damp() {
        let mut sim = FluidSimulation::default();
        sim.particles.push(Particle::new(Vec2::new(100.0, 596.0), Vec2::new(0.0, 5.0), FluidKind::Water));
        sim.step();
        let p = sim.particles[0];
        assert_eq!(p.position.y, 597.0);
        // (5 + 0.5)·0.98 reflected at half strength
        assert!((p.velocity.y + 5.5 * 0.98 * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_particles_stay_in_bounds() {
        let mut sim = FluidSimulation::default();
        let mut rng = StdRng::seed_from_u64(42);
        for frame in 0..200 {
            if frame < 60 {
                sim.spawn(&mut rng, Vec2::new(450.0, 100.0), 3, FluidKind::ALL[frame % 3]);
            }
            sim.step();
        }
        let r = sim.config.particle_radius;
        for p in &sim.particles {
            assert!(p.position.x >= r && p.position.x <= sim.config.width - r);
            assert!(p.position.y >= r && p.position.y <= sim.config.height - r);
            assert!(p.position.is_finite());
        }
        assert_eq!(sim.stats().particle_count, 180);
    }

    #[test]
    fn test_spawn_accumulates_without_limit() {
        let mut sim = FluidSimulation::default();
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(sim.spawn(&mut rng, Vec2::new(450.0, 300.0), 3500, FluidKind::Water), 3500);
        assert_eq!(sim.spawn(&mut rng, Vec2::new(450.0, 300.0), 3, FluidKind::Oil), 3);
        assert_eq!(sim.len(), 3503);
    }

    #[test]
    fn test_spawn_jitter_and_optional_limit() {
        let mut sim = FluidSimulation::new(FluidConfig {
            max_particles: Some(10),
            ..FluidConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        let at = Vec2::new(200.0, 200.0);
        assert_eq!(sim.spawn(&mut rng, at, 8, FluidKind::Honey), 8);
        assert_eq!(sim.spawn(&mut rng, at, 8, FluidKind::Honey), 2);
        assert_eq!(sim.spawn(&mut rng, at, 8, FluidKind::Honey), 0);
        for p in &sim.particles {
            assert!((p.position - at).abs().max_element() <= 5.0);
            assert!(p.speed() < 2.0);
            assert_eq!(p.kind, FluidKind::Honey);
        }
    }

    #[test]
    fn test_honey_slows_fastest() {
        let mut sim = weightless();
        for (i, kind) in FluidKind::ALL.iter().enumerate() {
            let position = Vec2::new(100.0 + 200.0 * i as f32, 300.0);
            sim.particles.push(Particle::new(position, Vec2::new(4.0, 0.0), *kind));
        }
        for _ in 0..5 {
            sim.step();
        }
        let speeds: Vec<f32> = sim.particles.iter().map(Particle::speed).collect();
        assert!(speeds[0] > speeds[1] && speeds[1] > speeds[2]);
    }

    #[test]
    fn test_clear() {
        let mut sim = FluidSimulation::default();
        let mut rng = StdRng::seed_from_u64(5);
        sim.spawn(&mut rng, Vec2::new(100.0, 100.0), 5, FluidKind::Water);
        sim.clear();
        assert!(sim.is_empty());
        assert_eq!(sim.stats(), FluidStats::default());
    }

    #[test]
    fn test_config_and_particles_serialize() {
        let config = FluidConfig {
            max_particles: Some(500),
            ..FluidConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<FluidConfig>(&json).unwrap(), config);

        let mut sim = FluidSimulation::new(config);
        let mut rng = StdRng::seed_from_u64(21);
        sim.spawn(&mut rng, Vec2::new(300.0, 200.0), 12, FluidKind::Oil);
        sim.step();
        let json = serde_json::to_string(&sim.particles).unwrap();
        let back: Vec<Particle> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sim.particles);
        assert!(back.iter().all(|p| p.density >= 1.0));
    }
}
