//! Derivatives, extrema and tangents of an explicit function

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::expression::{sample, Evaluator, Scope};

/// Central-difference step
pub const DERIVATIVE_STEP: f64 = 1e-4;
/// Samples across the visible range when searching for extrema
pub const CRITICAL_SAMPLES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extremum {
    Maximum,
    Minimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub position: DVec2,
    pub kind: Extremum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tangent {
    pub point: DVec2,
    pub slope: f64,
}

impl Tangent {
    pub fn y_at(&self, x: f64) -> f64 {
        self.point.y + self.slope * (x - self.point.x)
    }
}

/// `y = f(x)` bound to an evaluator and parameter values
pub struct Function<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    expr: &'a str,
    scope: Scope,
}

impl<'a, E: Evaluator + ?Sized> Function<'a, E> {
    pub fn new(evaluator: &'a E, expr: &'a str, scope: Scope) -> Self {
        Self {
            evaluator,
            expr,
            scope,
        }
    }

    pub fn value(&self, x: f64) -> Option<f64> {
        let scope = self.scope.clone().with("x", x);
        sample(self.evaluator, self.expr, &scope)
    }

    pub fn derivative(&self, x: f64) -> Option<f64> {
        let h = DERIVATIVE_STEP;
        Some((self.value(x + h)? - self.value(x - h)?) / (2.0 * h))
    }

    /// Extrema found by a sign change of the derivative between neighbouring
    /// samples in `min_x..=max_x`
    pub fn critical_points(&self, min_x: f64, max_x: f64) -> Vec<CriticalPoint> {
        let step = (max_x - min_x) / CRITICAL_SAMPLES as f64;
        if !(step > 0.0) {
            return Vec::new();
        }
        let mut points = Vec::new();
        let mut previous = self.derivative(min_x);
        for i in 1..=CRITICAL_SAMPLES {
            let x = min_x + step * i as f64;
            let current = self.derivative(x);
            if let (Some(before), Some(after)) = (previous, current) {
                let kind = if before > 0.0 && after < 0.0 {
                    Some(Extremum::Maximum)
                } else if before < 0.0 && after > 0.0 {
                    Some(Extremum::Minimum)
                } else {
                    None
                };
                if let (Some(kind), Some(y)) = (kind, self.value(x)) {
                    points.push(CriticalPoint {
                        position: DVec2::new(x, y),
                        kind,
                    });
                }
            }
            previous = current;
        }
        points
    }

    pub fn tangent(&self, x: f64) -> Option<Tangent> {
        Some(Tangent {
            point: DVec2::new(x, self.value(x)?),
            slope: self.derivative(x)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Calculator;
    use std::f64::consts::PI;

    #[test]
    fn test_derivative() {
        let calc = Calculator::new();
        let f = Function::new(&calc, "x^3", Scope::new());
        assert!((f.derivative(2.0).unwrap() - 12.0).abs() < 1e-6);
        let f = Function::new(&calc, "sqrt(x)", Scope::new());
        assert_eq!(f.derivative(0.0), None);
    }

    #[test]
    fn test_cubic_extrema() {
        let calc = Calculator::new();
        let f = Function::new(&calc, "x^3 - 3*x", Scope::new());
        let points = f.critical_points(-10.0, 10.0);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].kind, Extremum::Maximum);
        assert!((points[0].position.x + 1.0).abs() < 0.05);
        assert!((points[0].position.y - 2.0).abs() < 0.01);
        assert_eq!(points[1].kind, Extremum::Minimum);
        assert!((points[1].position.x - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_parameters_reach_the_function() {
        let calc = Calculator::new();
        let scope = Scope::new().with("a", 1.0).with("b", 1.0);
        let f = Function::new(&calc, "a*cos(b*x)", scope);
        let points = f.critical_points(0.1, 2.0 * PI - 0.1);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].kind, Extremum::Minimum);
        assert!((points[0].position.x - PI).abs() < 0.02);
    }

    #[test]
    fn test_tangent_line() {
        let calc = Calculator::new();
        let f = Function::new(&calc, "x^2", Scope::new());
        let tangent = f.tangent(1.0).unwrap();
        assert!((tangent.slope - 2.0).abs() < 1e-6);
        assert!((tangent.y_at(3.0) - 5.0).abs() < 1e-5);
        assert!(Function::new(&calc, "ln(x)", Scope::new()).tangent(-1.0).is_none());
    }
}
