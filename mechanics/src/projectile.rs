//! Projectile motion with optional linear drag
//!
//! World space is y-up in meters with the ground at y = 0.

use common::constants::G;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub gravity: f32,
    /// Linear drag coefficient per unit mass (1/s)
    pub drag: f32,
    /// Vertical restitution on ground contact
    pub restitution: f32,
    /// Fraction of horizontal speed kept on each bounce
    pub ground_friction: f32,
    /// Rebound speed below which the projectile comes to rest
    pub rest_speed: f32,
    /// Minimum spacing between stored trail points, in meters
    pub trail_spacing: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            gravity: G,
            drag: 0.0,
            restitution: 0.6,
            ground_friction: 0.8,
            rest_speed: 0.5,
            trail_spacing: 0.1,
        }
    }
}

/// Launch parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub speed: f32,
    /// Elevation angle in degrees
    pub angle: f32,
    pub height: f32,
}

impl Default for Launch {
    fn default() -> Self {
        Self {
            speed: 20.0,
            angle: 45.0,
            height: 0.0,
        }
    }
}

impl Launch {
    pub fn velocity(&self) -> Vec2 {
        let theta = self.angle.to_radians();
        Vec2::new(theta.cos(), theta.sin()) * self.speed
    }

    /// Drag-free time until the projectile returns to y = 0
    pub fn time_of_flight(&self, gravity: f32) -> f32 {
        let vy = self.velocity().y;
        (vy + (vy * vy + 2.0 * gravity * self.height).sqrt()) / gravity
    }

    /// Drag-free apex height above the ground
    pub fn max_height(&self, gravity: f32) -> f32 {
        let vy = self.velocity().y.max(0.0);
        self.height + vy * vy / (2.0 * gravity)
    }

    /// Drag-free horizontal distance to the first ground contact
    pub fn range(&self, gravity: f32) -> f32 {
        self.velocity().x * self.time_of_flight(gravity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub config: ProjectileConfig,
    pub launch: Launch,
    pub position: Vec2,
    pub velocity: Vec2,
    pub time: f32,
    pub trail: Vec<Vec2>,
    pub bounces: u32,
    pub at_rest: bool,
    /// Highest point reached so far
    pub apex: f32,
}

impl Projectile {
    pub fn new(config: ProjectileConfig, launch: Launch) -> Self {
        let mut projectile = Self {
            config,
            launch,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            time: 0.0,
            trail: Vec::new(),
            bounces: 0,
            at_rest: false,
            apex: 0.0,
        };
        projectile.fire();
        projectile
    }

    /// Restart from the launch point with the current launch parameters
    pub fn fire(&mut self) {
        self.position = Vec2::new(0.0, self.launch.height.max(0.0));
        self.velocity = self.launch.velocity();
        self.time = 0.0;
        self.trail = vec![self.position];
        self.bounces = 0;
        self.at_rest = false;
        self.apex = self.position.y;
        log::info!(
            "Launch: {:.1} m/s at {:.1}° from {:.1} m",
            self.launch.speed,
            self.launch.angle,
            self.launch.height
        );
    }

    pub fn acceleration(&self) -> Vec2 {
        Vec2::new(0.0, -self.config.gravity) - self.velocity * self.config.drag
    }

    pub fn step(&mut self, dt: f32) {
        if self.at_rest {
            return;
        }

        self.velocity += self.acceleration() * dt;
        self.position += self.velocity * dt;
        self.time += dt;

        if self.position.y <= 0.0 && self.velocity.y < 0.0 {
            self.position.y = 0.0;
            let rebound = -self.velocity.y * self.config.restitution;
            if rebound < self.config.rest_speed {
                self.velocity = Vec2::ZERO;
                self.at_rest = true;
                log::debug!("Projectile at rest at x = {:.2} m", self.position.x);
            } else {
                self.velocity.y = rebound;
                self.velocity.x *= self.config.ground_friction;
                self.bounces += 1;
            }
        }

        self.apex = self.apex.max(self.position.y);
        let far_enough = self
            .trail
            .last()
            .map_or(true, |last| last.distance(self.position) >= self.config.trail_spacing);
        if far_enough || self.at_rest {
            self.trail.push(self.position);
        }
    }

    pub fn kinetic_energy_per_kg(&self) -> f32 {
        0.5 * self.velocity.length_squared()
    }

    pub fn potential_energy_per_kg(&self) -> f32 {
        self.config.gravity * self.position.y
    }
}

impl Default for Projectile {
    fn default() -> Self {
        Self::new(ProjectileConfig::default(), Launch::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step until the first ground contact and return the landing x
    fn first_landing(projectile: &mut Projectile, dt: f32) -> f32 {
        for _ in 0..1_000_000 {
            projectile.step(dt);
            if projectile.bounces > 0 || projectile.at_rest {
                return projectile.position.x;
            }
        }
        panic!("projectile never landed");
    }

    #[test]
    fn test_range_matches_closed_form() {
        let mut projectile = Projectile::default();
        let expected = projectile.launch.range(9.81);
        // v²/g at 45°
        assert!((expected - 400.0 / 9.81).abs() < 1e-3);

        let landed = first_landing(&mut projectile, 0.0005);
        assert!((landed - expected).abs() / expected < 0.01, "{landed} vs {expected}");
    }

    #[test]
    fn test_apex_matches_closed_form() {
        let mut projectile = Projectile::new(
            ProjectileConfig::default(),
            Launch {
                speed: 15.0,
                angle: 60.0,
                height: 5.0,
            },
        );
        let expected = projectile.launch.max_height(9.81);
        first_landing(&mut projectile, 0.0005);
        assert!((projectile.apex - expected).abs() < 0.05);
    }

    #[test]
    fn test_drag_shortens_range() {
        let mut free = Projectile::default();
        let mut dragged = Projectile::new(
            ProjectileConfig {
                drag: 0.2,
                ..Default::default()
            },
            Launch::default(),
        );
        let a = first_landing(&mut free, 0.001);
        let b = first_landing(&mut dragged, 0.001);
        assert!(b < a);
    }

    #[test]
    fn test_bounces_then_rests_on_ground() {
        let mut projectile = Projectile::default();
        for _ in 0..100_000 {
            projectile.step(0.01);
            assert!(projectile.position.y >= 0.0);
            if projectile.at_rest {
                break;
            }
        }
        assert!(projectile.at_rest);
        assert!(projectile.bounces > 0);
        assert_eq!(projectile.velocity, Vec2::ZERO);

        // resting projectiles no longer move
        let x = projectile.position.x;
        projectile.step(0.01);
        assert_eq!(projectile.position.x, x);
    }

    #[test]
    fn test_trail_is_recorded() {
        let mut projectile = Projectile::default();
        for _ in 0..100 {
            projectile.step(0.016);
        }
        assert!(projectile.trail.len() > 10);
        assert_eq!(projectile.trail[0], Vec2::ZERO);
    }
}
