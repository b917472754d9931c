//! Newton's cradle
//!
//! Each ball is an independent pendulum. After integrating all of them the
//! neighbours are checked once, left to right, for contact. A moving ball that
//! strikes a run of resting balls hands its velocity straight to the first
//! ball past the run, which is the classic cradle behaviour without resolving
//! every intermediate impact.

use common::constants::G;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this, angles (rad) and speeds (px/s) count as "at rest"
pub const REST_THRESHOLD: f32 = 0.01;
/// Extra slack added to the contact distance, in pixels
pub const CONTACT_SLACK: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CradleConfig {
    pub ball_count: usize,
    /// Release angle of the pulled balls, in degrees
    pub pull_angle: f32,
    pub pulled: usize,
    pub gravity: f32,
    pub damping: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub string_length: f32,
}

impl Default for CradleConfig {
    fn default() -> Self {
        Self {
            ball_count: 5,
            pull_angle: 30.0,
            pulled: 1,
            gravity: G,
            damping: 0.002,
            ball_radius: 25.0,
            ball_mass: 10.0,
            string_length: 200.0,
        }
    }
}

impl CradleConfig {
    /// Distance between neighbouring anchors
    pub fn spacing(&self) -> f32 {
        self.ball_radius * 2.0 + 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub angle: f32,
    pub angular_velocity: f32,
    /// Horizontal anchor position in pixels
    pub anchor_x: f32,
    pub mass: f32,
    pub radius: f32,
    pub length: f32,
}

impl Ball {
    /// Horizontal bob position
    pub fn x(&self) -> f32 {
        self.anchor_x + self.length * self.angle.sin()
    }

    pub fn position(&self, anchor_y: f32) -> Vec2 {
        Vec2::new(self.x(), anchor_y + self.length * self.angle.cos())
    }

    /// Tangential velocity in px/s
    pub fn velocity(&self) -> f32 {
        self.angular_velocity * self.length
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity().powi(2)
    }

    pub fn potential_energy(&self, gravity: f32) -> f32 {
        self.mass * gravity * self.length * (1.0 - self.angle.cos())
    }

    fn at_rest(&self) -> bool {
        self.angle.abs() < REST_THRESHOLD && self.velocity().abs() < REST_THRESHOLD
    }
}

/// Aggregate readouts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CradleStats {
    pub total_momentum: f32,
    pub total_energy: f32,
    /// Largest absolute angle in degrees
    pub max_angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonsCradle {
    pub config: CradleConfig,
    pub balls: Vec<Ball>,
    /// Horizontal center of the frame in pixels
    pub center_x: f32,
}

impl NewtonsCradle {
    pub fn new(config: CradleConfig, center_x: f32) -> Self {
        let mut cradle = Self {
            config,
            balls: Vec::new(),
            center_x,
        };
        cradle.reset();
        cradle
    }

    /// Hang all balls at rest and pull back the leftmost `pulled` balls
    pub fn reset(&mut self) {
        let config = self.config;
        let spacing = config.spacing();
        let start_x = self.center_x - (config.ball_count.saturating_sub(1)) as f32 * spacing / 2.0;
        // pulled balls swing out to the left so they never start overlapping
        let pulled_angle = -config.pull_angle.to_radians();

        self.balls = (0..config.ball_count)
            .map(|i| Ball {
                angle: if i < config.pulled { pulled_angle } else { 0.0 },
                angular_velocity: 0.0,
                anchor_x: start_x + i as f32 * spacing,
                mass: config.ball_mass,
                radius: config.ball_radius,
                length: config.string_length,
            })
            .collect();
        log::info!(
            "Cradle reset: {} balls, {} pulled to {}°",
            config.ball_count,
            config.pulled,
            config.pull_angle
        );
    }

    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.resolve_collisions();
    }

    /// Advance every ball as a free pendulum
    pub fn integrate(&mut self, dt: f32) {
        let g = self.config.gravity;
        let damping = self.config.damping;
        for ball in &mut self.balls {
            let angular_accel =
                -(g / ball.length) * ball.angle.sin() - damping * ball.angular_velocity;
            ball.angular_velocity += angular_accel * dt;
            ball.angle += ball.angular_velocity * dt;
        }
    }

    /// One left-to-right pass over neighbouring pairs
    pub fn resolve_collisions(&mut self) {
        let n = self.balls.len();
        for i in 0..n.saturating_sub(1) {
            let (b1, b2) = (self.balls[i], self.balls[i + 1]);

            let distance = (b2.x() - b1.x()).abs();
            if distance > b1.radius + b2.radius + CONTACT_SLACK {
                continue;
            }

            let (v1, v2) = (b1.velocity(), b2.velocity());
            let relative = v1 - v2;
            let approaching = (relative > REST_THRESHOLD && b1.angle > b2.angle)
                || (relative < -REST_THRESHOLD && b1.angle < b2.angle);
            if !approaching {
                continue;
            }

            if b2.at_rest() {
                self.transfer_through_rest(i);
            } else {
                let (m1, m2) = (b1.mass, b2.mass);
                let v1_final = ((m1 - m2) * v1 + 2.0 * m2 * v2) / (m1 + m2);
                let v2_final = ((m2 - m1) * v2 + 2.0 * m1 * v1) / (m1 + m2);
                self.balls[i].angular_velocity = v1_final / b1.length;
                self.balls[i + 1].angular_velocity = v2_final / b2.length;
            }
        }
    }

    /// Ball `i` strikes a resting neighbour: its velocity skips across the
    /// resting run and lands on the first ball beyond it (or the last ball).
    fn transfer_through_rest(&mut self, i: usize) {
        let n = self.balls.len();
        let mut receiver = i + 1;
        while receiver < n - 1 && self.balls[receiver].at_rest() {
            receiver += 1;
        }

        self.balls[receiver].angular_velocity = self.balls[i].angular_velocity;
        self.balls[i].angular_velocity = 0.0;
        self.balls[i].angle = 0.0;
        for ball in &mut self.balls[i + 1..receiver] {
            ball.angle = 0.0;
            ball.angular_velocity = 0.0;
        }
    }

    pub fn stats(&self) -> CradleStats {
        let g = self.config.gravity;
        self.balls.iter().fold(CradleStats::default(), |mut acc, ball| {
            acc.total_momentum += ball.mass * ball.velocity();
            acc.total_energy += ball.kinetic_energy() + ball.potential_energy(g);
            acc.max_angle = acc.max_angle.max(ball.angle.to_degrees().abs());
            acc
        })
    }
}

impl Default for NewtonsCradle {
    fn default() -> Self {
        Self::new(CradleConfig::default(), 450.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;

    fn two_balls(v1: f32, v2: f32) -> NewtonsCradle {
        let config = CradleConfig {
            ball_count: 2,
            pulled: 0,
            ..Default::default()
        };
        let mut cradle = NewtonsCradle::new(config, 450.0);
        // nudge both off rest so the elastic branch applies
        cradle.balls[0].angle = 0.02;
        cradle.balls[1].angle = -0.02;
        cradle.balls[0].angular_velocity = v1 / config.string_length;
        cradle.balls[1].angular_velocity = v2 / config.string_length;
        cradle
    }

    #[test]
    fn test_equal_mass_collision_swaps_velocities() {
        let mut cradle = two_balls(30.0, -10.0);
        cradle.resolve_collisions();
        assert!((cradle.balls[0].velocity() - -10.0).abs() < 1e-3);
        assert!((cradle.balls[1].velocity() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_balls_do_not_collide() {
        let mut cradle = two_balls(-30.0, 10.0);
        cradle.resolve_collisions();
        assert!((cradle.balls[0].velocity() - -30.0).abs() < 1e-3);
        assert!((cradle.balls[1].velocity() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_strike_transfers_to_last_ball() {
        let mut cradle = NewtonsCradle::default();
        cradle.balls[0].angle = 0.0;
        cradle.balls[0].angular_velocity = 0.5;
        // the striker has just swung into contact
        cradle.balls[0].angle = 0.005;
        cradle.resolve_collisions();

        assert_eq!(cradle.balls[0].angular_velocity, 0.0);
        for ball in &cradle.balls[1..4] {
            assert_eq!(ball.angular_velocity, 0.0);
        }
        assert_eq!(cradle.balls[4].angular_velocity, 0.5);
    }

    #[test]
    fn test_momentum_conserved_through_strike() {
        let mut cradle = NewtonsCradle::default();
        let mut peak_momentum: f32 = 0.0;
        let mut last_ball_moved = false;
        for _ in 0..4000 {
            cradle.step(FRAME_DT);
            peak_momentum = peak_momentum.max(cradle.stats().total_momentum.abs());
            if cradle.balls[4].angle > 0.1 {
                last_ball_moved = true;
                break;
            }
        }
        assert!(last_ball_moved, "energy never reached the far ball");
        // middle balls stay put
        for ball in &cradle.balls[1..4] {
            assert!(ball.angle.abs() < REST_THRESHOLD);
        }
        assert!(peak_momentum > 0.0);
    }

    #[test]
    fn test_reset_layout() {
        let cradle = NewtonsCradle::default();
        assert_eq!(cradle.balls.len(), 5);
        let spacing = cradle.config.spacing();
        assert!((cradle.balls[1].anchor_x - cradle.balls[0].anchor_x - spacing).abs() < 1e-4);
        assert!((cradle.balls[2].anchor_x - 450.0).abs() < 1e-4);
        assert!(cradle.balls[0].angle < 0.0);
        assert!(cradle.balls[1..].iter().all(|b| b.angle == 0.0));
        assert!((cradle.stats().max_angle - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_state_serializes() {
        let cradle = NewtonsCradle::default();
        let json = serde_json::to_string(&cradle).unwrap();
        let back: NewtonsCradle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cradle);
    }
}
