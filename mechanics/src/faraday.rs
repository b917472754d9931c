//! Faraday induction: a bar magnet sliding through a coil
//!
//! The magnet moves along one axis. Its position is kept in pixels and its
//! velocity in simulation units per second (`pixels_per_unit` pixels each).
//! Flux, EMF and current are derived from (position, velocity) on demand.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaradayConfig {
    pub coil_center: f32,
    pub coil_radius: f32,
    /// Flux with the magnet centred in the coil, in Wb
    pub max_flux: f32,
    /// Distance over which the flux falls off by 1/e, in pixels
    pub flux_decay: f32,
    pub emf_factor: f32,
    pub current_factor: f32,
    /// Fraction of velocity kept per 16 ms frame while coasting
    pub friction: f32,
    pub pixels_per_unit: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub restitution: f32,
    /// Pointer hit radius around the magnet, in pixels
    pub grab_radius: f32,
    /// Speed given by the push buttons, in units/s
    pub push_speed: f32,
}

impl Default for FaradayConfig {
    fn default() -> Self {
        Self {
            coil_center: 400.0,
            coil_radius: 80.0,
            max_flux: 10.0,
            flux_decay: 100.0,
            emf_factor: 0.5,
            current_factor: 0.1,
            friction: 0.95,
            pixels_per_unit: 100.0,
            min_x: 50.0,
            max_x: 750.0,
            restitution: 0.5,
            grab_radius: 30.0,
            push_speed: 2.0,
        }
    }
}

const FRICTION_FRAME: f32 = 0.016;
const START_X: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Drag {
    last_x: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaradayExperiment {
    pub config: FaradayConfig,
    /// Magnet center, in pixels
    pub magnet_x: f32,
    /// Magnet velocity, in units/s
    pub velocity: f32,
    drag: Option<Drag>,
}

impl FaradayExperiment {
    pub fn new(config: FaradayConfig) -> Self {
        Self {
            config,
            magnet_x: START_X,
            velocity: 0.0,
            drag: None,
        }
    }

    pub fn reset(&mut self) {
        self.magnet_x = START_X;
        self.velocity = 0.0;
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Magnetic flux through the coil
    pub fn flux(&self) -> f32 {
        let distance = (self.magnet_x - self.config.coil_center).abs();
        self.config.max_flux * (-distance / self.config.flux_decay).exp()
    }

    /// Induced EMF, opposing the motion (Lenz's law)
    pub fn emf(&self) -> f32 {
        -self.velocity * self.config.emf_factor
    }

    pub fn current(&self) -> f32 {
        self.emf() * self.config.current_factor
    }

    /// Whether the magnet is inside the coil windings
    pub fn in_coil(&self) -> bool {
        (self.magnet_x - self.config.coil_center).abs() < self.config.coil_radius
    }

    pub fn step(&mut self, dt: f32) {
        if let Some(drag) = &mut self.drag {
            drag.elapsed += dt;
            return;
        }

        self.velocity *= self.config.friction.powf(dt / FRICTION_FRAME);
        self.magnet_x += self.velocity * dt * self.config.pixels_per_unit;

        let (min_x, max_x) = (self.config.min_x, self.config.max_x);
        if self.magnet_x < min_x || self.magnet_x > max_x {
            self.magnet_x = self.magnet_x.clamp(min_x, max_x);
            self.velocity *= -self.config.restitution;
        }
    }

    /// Start dragging if `x` is on the magnet
    pub fn start_drag(&mut self, x: f32) -> bool {
        if (x - self.magnet_x).abs() < self.config.grab_radius {
            self.drag = Some(Drag {
                last_x: self.magnet_x,
                elapsed: 0.0,
            });
            log::debug!("Grabbed magnet at {x:.0}");
            true
        } else {
            false
        }
    }

    /// Move the held magnet; velocity is measured from the pointer motion
    /// since the previous drag update.
    pub fn drag_to(&mut self, x: f32) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        let x = x.clamp(self.config.min_x, self.config.max_x);
        if drag.elapsed > 0.0 {
            self.velocity = (x - drag.last_x) / drag.elapsed / self.config.pixels_per_unit;
            drag.elapsed = 0.0;
        }
        drag.last_x = x;
        self.magnet_x = x;
    }

    /// Release the magnet; it keeps its measured velocity
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Give the magnet a shove; `direction` is +1 (right) or -1 (left)
    pub fn push(&mut self, direction: f32) {
        self.velocity = direction.signum() * self.config.push_speed;
    }
}

impl Default for FaradayExperiment {
    fn default() -> Self {
        Self::new(FaradayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::FRAME_DT;

    #[test]
    fn test_flux_peaks_at_coil() {
        let mut exp = FaradayExperiment::default();
        exp.magnet_x = 400.0;
        assert!((exp.flux() - 10.0).abs() < 1e-6);
        exp.magnet_x = 500.0;
        assert!((exp.flux() - 10.0 * (-1.0f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_emf_opposes_motion() {
        let mut exp = FaradayExperiment::default();
        exp.push(1.0);
        assert_eq!(exp.velocity, 2.0);
        assert_eq!(exp.emf(), -1.0);
        assert!((exp.current() - -0.1).abs() < 1e-6);

        exp.push(-1.0);
        assert!(exp.emf() > 0.0);
    }

    #[test]
    fn test_coasting_slows_down() {
        let mut exp = FaradayExperiment::default();
        exp.push(1.0);
        let start = exp.magnet_x;
        for _ in 0..200 {
            exp.step(FRAME_DT);
        }
        assert!(exp.magnet_x > start);
        assert!(exp.velocity.abs() < 1e-3);
    }

    #[test]
    fn test_stays_in_bounds_and_bounces() {
        let mut exp = FaradayExperiment::default();
        exp.magnet_x = 745.0;
        exp.velocity = 5.0;
        exp.step(FRAME_DT);
        assert_eq!(exp.magnet_x, 750.0);
        assert!(exp.velocity < 0.0);
        assert!(exp.velocity.abs() < 5.0);

        for _ in 0..500 {
            exp.step(FRAME_DT);
            assert!((50.0..=750.0).contains(&exp.magnet_x));
        }
    }

    #[test]
    fn test_drag_measures_velocity() {
        let mut exp = FaradayExperiment::default();
        assert!(!exp.start_drag(300.0));
        assert!(exp.start_drag(210.0));

        exp.step(0.1);
        exp.drag_to(250.0);
        // 50 px over 0.1 s is 500 px/s, or 5 units/s
        assert!((exp.velocity - 5.0).abs() < 1e-4);
        assert_eq!(exp.magnet_x, 250.0);

        // held magnet does not coast
        exp.step(0.1);
        assert_eq!(exp.magnet_x, 250.0);

        exp.end_drag();
        exp.step(FRAME_DT);
        assert!(exp.magnet_x > 250.0);
    }

    #[test]
    fn test_reset() {
        let mut exp = FaradayExperiment::default();
        exp.push(1.0);
        exp.step(FRAME_DT);
        exp.reset();
        assert_eq!(exp.magnet_x, 200.0);
        assert_eq!(exp.emf(), 0.0);
    }
}
