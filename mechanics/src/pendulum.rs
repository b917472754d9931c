//! Simple pendulum with semi-implicit Euler integration

use common::constants::G;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumConfig {
    pub gravity: f32,
    /// String length in pixels
    pub length: f32,
    pub damping: f32,
    pub mass: f32,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: G,
            length: 200.0,
            damping: 0.0,
            mass: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub config: PendulumConfig,
    /// Angle from the downward vertical in radians, positive to the right
    pub angle: f32,
    pub angular_velocity: f32,
    pub time: f32,
}

impl Pendulum {
    pub fn new(config: PendulumConfig, initial_angle: f32) -> Self {
        Self {
            config,
            angle: initial_angle,
            angular_velocity: 0.0,
            time: 0.0,
        }
    }

    /// Hold the bob at `angle` at rest
    pub fn release(&mut self, angle: f32) {
        self.angle = angle;
        self.angular_velocity = 0.0;
        self.time = 0.0;
    }

    pub fn angular_acceleration(&self) -> f32 {
        -(self.config.gravity / self.config.length) * self.angle.sin()
            - self.config.damping * self.angular_velocity
    }

    /// Advance by dt seconds. Velocity is updated before position.
    pub fn step(&mut self, dt: f32) {
        self.angular_velocity += self.angular_acceleration() * dt;
        self.angle += self.angular_velocity * dt;
        self.time += dt;
    }

    /// Bob position in pixel space (y down) for a pivot at `anchor`
    pub fn bob_position(&self, anchor: Vec2) -> Vec2 {
        anchor + Vec2::new(self.angle.sin(), self.angle.cos()) * self.config.length
    }

    /// Tangential speed of the bob
    pub fn speed(&self) -> f32 {
        self.angular_velocity * self.config.length
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.config.mass * self.speed().powi(2)
    }

    pub fn potential_energy(&self) -> f32 {
        self.config.mass * self.config.gravity * self.config.length * (1.0 - self.angle.cos())
    }

    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy() + self.potential_energy()
    }

    /// Small-angle period T = 2π√(L/g)
    pub fn small_angle_period(&self) -> f32 {
        std::f32::consts::TAU * (self.config.length / self.config.gravity).sqrt()
    }
}

impl Default for Pendulum {
    fn default() -> Self {
        Self::new(PendulumConfig::default(), 30f32.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;

    #[test]
    fn test_energy_does_not_grow() {
        let mut pendulum = Pendulum::default();
        let e0 = pendulum.total_energy();
        // semi-implicit Euler oscillates around the true energy by O(dt·ω₀)
        let omega0_sq = pendulum.config.gravity / pendulum.config.length;
        let tolerance = e0 * FRAME_DT * omega0_sq.sqrt();

        let mut previous = e0;
        for frame in 0..5000 {
            pendulum.step(FRAME_DT);
            let energy = pendulum.total_energy();
            assert!(
                energy <= e0 + tolerance,
                "frame {frame}: energy {energy} exceeds initial {e0}"
            );
            assert!(
                energy <= previous + tolerance,
                "frame {frame}: energy jumped from {previous} to {energy}"
            );
            previous = energy;
        }
    }

    #[test]
    fn test_damping_dissipates() {
        let mut pendulum = Pendulum::new(
            PendulumConfig {
                damping: 0.5,
                ..Default::default()
            },
            0.5,
        );
        let e0 = pendulum.total_energy();
        for _ in 0..2000 {
            pendulum.step(FRAME_DT);
        }
        assert!(pendulum.total_energy() < 0.5 * e0);
    }

    #[test]
    fn test_rest_is_equilibrium() {
        let mut pendulum = Pendulum::new(PendulumConfig::default(), 0.0);
        for _ in 0..100 {
            pendulum.step(FRAME_DT);
        }
        assert_eq!(pendulum.angle, 0.0);
        assert_eq!(pendulum.total_energy(), 0.0);
    }

    #[test]
    fn test_bob_hangs_below_anchor() {
        let pendulum = Pendulum::new(PendulumConfig::default(), 0.0);
        let bob = pendulum.bob_position(Vec2::new(400.0, 100.0));
        assert_eq!(bob, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_small_angle_period() {
        let config = PendulumConfig {
            gravity: 9.81,
            length: 1.0,
            ..Default::default()
        };
        let mut pendulum = Pendulum::new(config, 0.05);
        let expected = pendulum.small_angle_period();

        // time between the first two downward zero crossings of the angle
        let dt = 0.0005;
        let mut crossings = Vec::new();
        let mut last = pendulum.angle;
        while crossings.len() < 3 {
            pendulum.step(dt);
            if last > 0.0 && pendulum.angle <= 0.0 {
                crossings.push(pendulum.time);
            }
            last = pendulum.angle;
        }
        let measured = crossings[2] - crossings[1];
        assert!((measured - expected).abs() / expected < 0.01);
    }
}
