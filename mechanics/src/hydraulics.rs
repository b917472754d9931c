//! Hydraulic press demonstrating Pascal's law

use serde::{Deserialize, Serialize};

/// Small piston travel per 16 ms frame, in pixels
const STROKE_PER_FRAME: f32 = 2.0;
const FRAME: f32 = 0.016;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrokePhase {
    Idle,
    Pressing,
    /// Fully pressed, waiting this many seconds before springing back
    Holding(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicPress {
    /// Small piston area in cm²
    pub small_area: f32,
    /// Large piston area in cm²
    pub large_area: f32,
    /// Force on the small piston in N
    pub applied_force: f32,
    /// Full stroke of the small piston in pixels
    pub max_stroke: f32,
    pub hold_time: f32,
    pub phase: StrokePhase,
    /// Small piston displacement in pixels
    pub stroke: f32,
}

impl HydraulicPress {
    pub fn new(small_area: f32, large_area: f32, applied_force: f32) -> Self {
        Self {
            small_area,
            large_area,
            applied_force,
            max_stroke: 50.0,
            hold_time: 0.5,
            phase: StrokePhase::Idle,
            stroke: 0.0,
        }
    }

    /// P = F / A₁, in N/cm²
    pub fn pressure(&self) -> f32 {
        self.applied_force / self.small_area
    }

    /// F₂ = P · A₂
    pub fn output_force(&self) -> f32 {
        self.pressure() * self.large_area
    }

    /// MA = A₂ / A₁
    pub fn mechanical_advantage(&self) -> f32 {
        self.large_area / self.small_area
    }

    /// Incompressible fluid: the displaced volume is the same on both sides
    pub fn large_displacement(&self) -> f32 {
        self.stroke * self.small_area / self.large_area
    }

    /// Begin a press stroke (ignored while one is running)
    pub fn apply(&mut self) {
        if self.phase == StrokePhase::Idle {
            self.phase = StrokePhase::Pressing;
            self.stroke = 0.0;
            log::debug!("Pressing with {:.0} N", self.applied_force);
        }
    }

    pub fn reset(&mut self) {
        self.phase = StrokePhase::Idle;
        self.stroke = 0.0;
    }

    pub fn is_animating(&self) -> bool {
        self.phase != StrokePhase::Idle
    }

    pub fn step(&mut self, dt: f32) {
        match self.phase {
            StrokePhase::Idle => {}
            StrokePhase::Pressing => {
                self.stroke += STROKE_PER_FRAME * dt / FRAME;
                if self.stroke >= self.max_stroke {
                    self.stroke = self.max_stroke;
                    self.phase = StrokePhase::Holding(self.hold_time);
                }
            }
            StrokePhase::Holding(remaining) => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.reset();
                } else {
                    self.phase = StrokePhase::Holding(remaining);
                }
            }
        }
    }
}

impl Default for HydraulicPress {
    fn default() -> Self {
        Self::new(10.0, 40.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_amplification() {
        let press = HydraulicPress::default();
        assert_eq!(press.pressure(), 5.0);
        assert_eq!(press.output_force(), 200.0);
        assert_eq!(press.mechanical_advantage(), 4.0);
    }

    #[test]
    fn test_volume_conserved() {
        let mut press = HydraulicPress::default();
        press.stroke = 40.0;
        assert_eq!(press.large_displacement(), 10.0);
        let small_volume = press.stroke * press.small_area;
        let large_volume = press.large_displacement() * press.large_area;
        assert!((small_volume - large_volume).abs() < 1e-3);
    }

    #[test]
    fn test_stroke_cycle() {
        let mut press = HydraulicPress::default();
        press.apply();
        let mut frames = 0;
        while press.phase == StrokePhase::Pressing {
            press.step(FRAME);
            frames += 1;
            assert!(press.stroke <= press.max_stroke);
        }
        assert_eq!(frames, 25);
        assert!(matches!(press.phase, StrokePhase::Holding(_)));

        // a second press while animating is ignored
        press.apply();
        assert!(matches!(press.phase, StrokePhase::Holding(_)));

        for _ in 0..40 {
            press.step(FRAME);
        }
        assert_eq!(press.phase, StrokePhase::Idle);
        assert_eq!(press.stroke, 0.0);
    }
}
