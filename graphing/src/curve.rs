//! Plottable curves
//!
//! User input is classified once into a [`Curve`] variant (or a point
//! definition) and each variant knows how to trace itself into pixel-space
//! polylines for a given viewport.

use std::f64::consts::TAU;

use common::Viewport;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expression::{is_identifier, sample, Evaluator, Scope};

/// Explicit samples further than this many pixels off the surface break the line
pub const OFFSCREEN_MARGIN: f64 = 100.0;
/// Marching-squares cell size in pixels
pub const IMPLICIT_CELL_PX: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("nothing to plot")]
    Empty,

    #[error("malformed equation '{0}'")]
    MalformedEquation(String),
}

/// Shapes drawn from their parametric form. Arguments are expressions,
/// usually a number or a parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Preset {
    Circle { radius: String },
    Ellipse { a: String, b: String },
    Hyperbola { a: String, b: String },
    Heart,
}

impl Preset {
    /// `circle(r)`, `ellipse(a, b)`, `hyperbola(a, b)` or `heart`, case-insensitive
    pub fn parse_shorthand(input: &str) -> Option<Preset> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("heart") {
            return Some(Preset::Heart);
        }
        if let Some([radius]) = call_args(input, "circle").as_deref() {
            return Some(Preset::Circle {
                radius: radius.clone(),
            });
        }
        if let Some([a, b]) = call_args(input, "ellipse").as_deref() {
            return Some(Preset::Ellipse {
                a: a.clone(),
                b: b.clone(),
            });
        }
        if let Some([a, b]) = call_args(input, "hyperbola").as_deref() {
            return Some(Preset::Hyperbola {
                a: a.clone(),
                b: b.clone(),
            });
        }
        None
    }

    /// The equation the shorthand stands for
    pub fn equation(&self) -> String {
        match self {
            Preset::Circle { radius } => format!("x^2 + y^2 = ({radius})^2"),
            Preset::Ellipse { a, b } => format!("(x/({a}))^2 + (y/({b}))^2 = 1"),
            Preset::Hyperbola { a, b } => format!("(x/({a}))^2 - (y/({b}))^2 = 1"),
            Preset::Heart => "(x^2 + y^2 - 1)^3 = x^2 * y^3".to_string(),
        }
    }

    pub fn arguments(&self) -> Vec<&str> {
        match self {
            Preset::Circle { radius } => vec![radius.as_str()],
            Preset::Ellipse { a, b } | Preset::Hyperbola { a, b } => vec![a.as_str(), b.as_str()],
            Preset::Heart => Vec::new(),
        }
    }

    /// Polylines in graph space; empty when an argument does not evaluate
    pub fn points<E: Evaluator + ?Sized>(&self, evaluator: &E, scope: &Scope) -> Vec<Vec<DVec2>> {
        let arg = |expr: &str| sample(evaluator, expr, scope);
        let closed = |segments: usize, f: &dyn Fn(f64) -> DVec2| -> Vec<DVec2> {
            (0..=segments)
                .map(|i| f(i as f64 / segments as f64 * TAU))
                .collect()
        };
        match self {
            Preset::Circle { radius } => {
                let Some(r) = arg(radius) else { return Vec::new() };
                vec![closed(200, &|t| DVec2::new(r * t.cos(), r * t.sin()))]
            }
            Preset::Ellipse { a, b } => {
                let (Some(a), Some(b)) = (arg(a), arg(b)) else {
                    return Vec::new();
                };
                vec![closed(200, &|t| DVec2::new(a * t.cos(), b * t.sin()))]
            }
            Preset::Hyperbola { a, b } => {
                let (Some(a), Some(b)) = (arg(a), arg(b)) else {
                    return Vec::new();
                };
                [-1.0, 1.0]
                    .into_iter()
                    .map(|sign| {
                        (0..=100)
                            .map(|i| {
                                let t = -3.0 + 6.0 * i as f64 / 100.0;
                                DVec2::new(sign * a * t.cosh(), b * t.sinh())
                            })
                            .collect()
                    })
                    .collect()
            }
            Preset::Heart => vec![closed(300, &|t| {
                let x = t.sin().powi(3);
                let y = (13.0 * t.cos()
                    - 5.0 * (2.0 * t).cos()
                    - 2.0 * (3.0 * t).cos()
                    - (4.0 * t).cos())
                    / 16.0;
                DVec2::new(x, y)
            })],
        }
    }
}

/// Arguments of `name(arg, ...)` when `input` is exactly such a call
fn call_args(input: &str, name: &str) -> Option<Vec<String>> {
    let head = input.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let inner = input[name.len()..]
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let args: Vec<String> = inner.split(',').map(|a| a.trim().to_string()).collect();
    if args.iter().any(|a| a.is_empty() || a.contains(['(', ')'])) {
        return None;
    }
    Some(args)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// y = f(x)
    Explicit { expr: String },
    /// lhs(x, y) = rhs(x, y)
    Implicit { lhs: String, rhs: String },
    Preset(Preset),
}

/// What a line of user input defines
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Curve(Curve),
    /// `A = (x, y)` point notation
    Point { label: String, position: DVec2 },
}

pub fn parse_input(text: &str) -> Result<Input, CurveError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CurveError::Empty);
    }
    if let Some((label, position)) = parse_point(text) {
        return Ok(Input::Point { label, position });
    }
    if let Some(preset) = Preset::parse_shorthand(text) {
        return Ok(Input::Curve(Curve::Preset(preset)));
    }
    let Some((lhs, rhs)) = text.split_once('=') else {
        return Ok(Input::Curve(Curve::Explicit {
            expr: text.to_string(),
        }));
    };
    let (lhs, rhs) = (lhs.trim(), rhs.trim());
    if lhs.is_empty() || rhs.is_empty() || rhs.contains('=') {
        return Err(CurveError::MalformedEquation(text.to_string()));
    }
    if lhs == "y" && !rhs.contains('y') {
        return Ok(Input::Curve(Curve::Explicit {
            expr: rhs.to_string(),
        }));
    }
    Ok(Input::Curve(Curve::Implicit {
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
    }))
}

/// `A = (1.5, -2)`: a single-letter label and two numbers
fn parse_point(text: &str) -> Option<(String, DVec2)> {
    let (label, rest) = text.split_once('=')?;
    let label = label.trim();
    if label.len() != 1 || !is_identifier(label) {
        return None;
    }
    let inner = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then(|| (label.to_string(), DVec2::new(x, y)))
}

impl Curve {
    /// Every expression the curve evaluates, for parameter discovery
    pub fn expressions(&self) -> Vec<&str> {
        match self {
            Curve::Explicit { expr } => vec![expr.as_str()],
            Curve::Implicit { lhs, rhs } => vec![lhs.as_str(), rhs.as_str()],
            Curve::Preset(preset) => preset.arguments(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Curve::Explicit { expr } => format!("y = {expr}"),
            Curve::Implicit { lhs, rhs } => format!("{lhs} = {rhs}"),
            Curve::Preset(preset) => preset.equation(),
        }
    }

    /// Pixel-space polylines covering the visible part of the curve
    pub fn trace<E: Evaluator + ?Sized>(
        &self,
        evaluator: &E,
        scope: &Scope,
        viewport: &Viewport,
    ) -> Vec<Vec<DVec2>> {
        match self {
            Curve::Explicit { expr } => trace_explicit(evaluator, expr, scope, viewport),
            Curve::Implicit { lhs, rhs } => {
                let (min, max) = viewport.visible_bounds();
                let mut scope = scope.clone();
                let segments = marching_squares(
                    |p| {
                        scope.set("x", p.x);
                        scope.set("y", p.y);
                        Some(sample(evaluator, lhs, &scope)? - sample(evaluator, rhs, &scope)?)
                    },
                    min,
                    max,
                    IMPLICIT_CELL_PX / viewport.scale,
                );
                segments
                    .into_iter()
                    .map(|[a, b]| vec![viewport.to_pixel(a), viewport.to_pixel(b)])
                    .collect()
            }
            Curve::Preset(preset) => preset
                .points(evaluator, scope)
                .into_iter()
                .map(|line| line.into_iter().map(|p| viewport.to_pixel(p)).collect())
                .collect(),
        }
    }
}

/// One sample per pixel column. The line breaks wherever the expression has
/// no value or the point lies far outside the surface.
pub fn trace_explicit<E: Evaluator + ?Sized>(
    evaluator: &E,
    expr: &str,
    scope: &Scope,
    viewport: &Viewport,
) -> Vec<Vec<DVec2>> {
    let mut scope = scope.clone();
    trace_columns(viewport, |x| {
        scope.set("x", x);
        sample(evaluator, expr, &scope)
    })
}

/// Pixel-space polylines of `f` sampled once per pixel column
pub fn trace_columns<F>(viewport: &Viewport, mut f: F) -> Vec<Vec<DVec2>>
where
    F: FnMut(f64) -> Option<f64>,
{
    let columns = viewport.width.max(1.0).ceil() as usize;
    let (min, max) = viewport.visible_bounds();
    let step = (max.x - min.x) / columns as f64;

    let mut runs = Vec::new();
    let mut current = Vec::new();
    for i in 0..=columns {
        let x = min.x + step * i as f64;
        let point = f(x)
            .map(|y| viewport.to_pixel(DVec2::new(x, y)))
            .filter(|p| p.y >= -OFFSCREEN_MARGIN && p.y <= viewport.height + OFFSCREEN_MARGIN);
        match point {
            Some(p) => current.push(p),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Contour `f = 0` over the rectangle `min..max` as line segments.
/// Cells with any undefined corner are skipped.
pub fn marching_squares<F>(mut f: F, min: DVec2, max: DVec2, cell: f64) -> Vec<[DVec2; 2]>
where
    F: FnMut(DVec2) -> Option<f64>,
{
    if !(cell > 0.0) || !(max.x > min.x) || !(max.y > min.y) {
        return Vec::new();
    }
    let nx = ((max.x - min.x) / cell).ceil() as usize;
    let ny = ((max.y - min.y) / cell).ceil() as usize;
    let corner = |i: usize, j: usize| min + DVec2::new(i as f64, j as f64) * cell;

    let mut values = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            values.push(f(corner(i, j)));
        }
    }
    let value = |i: usize, j: usize| values[j * (nx + 1) + i];

    let mut segments = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            // counter-clockwise from bottom-left
            let (Some(v0), Some(v1), Some(v2), Some(v3)) =
                (value(i, j), value(i + 1, j), value(i + 1, j + 1), value(i, j + 1))
            else {
                continue;
            };
            let p = [corner(i, j), corner(i + 1, j), corner(i + 1, j + 1), corner(i, j + 1)];
            let v = [v0, v1, v2, v3];
            let case = v
                .iter()
                .enumerate()
                .fold(0u8, |acc, (k, &value)| acc | (u8::from(value > 0.0) << k));

            // edges: 0 bottom, 1 right, 2 top, 3 left
            let edge = |e: usize| {
                let (a, b) = match e {
                    0 => (0, 1),
                    1 => (1, 2),
                    2 => (3, 2),
                    _ => (0, 3),
                };
                let t = if v[a] == v[b] { 0.5 } else { v[a] / (v[a] - v[b]) };
                p[a].lerp(p[b], t.clamp(0.0, 1.0))
            };
            let joined = (v0 + v1 + v2 + v3) / 4.0 > 0.0;
            let pairs: &[(usize, usize)] = match case {
                1 | 14 => &[(3, 0)],
                2 | 13 => &[(0, 1)],
                3 | 12 => &[(3, 1)],
                4 | 11 => &[(1, 2)],
                6 | 9 => &[(0, 2)],
                7 | 8 => &[(2, 3)],
                5 if joined => &[(0, 1), (2, 3)],
                5 => &[(3, 0), (1, 2)],
                10 if joined => &[(3, 0), (1, 2)],
                10 => &[(0, 1), (2, 3)],
                _ => &[],
            };
            segments.extend(pairs.iter().map(|&(a, b)| [edge(a), edge(b)]));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Calculator;

    fn curve(text: &str) -> Curve {
        match parse_input(text) {
            Ok(Input::Curve(curve)) => curve,
            other => panic!("{text:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_shorthand_presets() {
        assert_eq!(
            curve("circle(3)"),
            Curve::Preset(Preset::Circle { radius: "3".into() })
        );
        assert_eq!(
            curve("Ellipse( a , 2 )"),
            Curve::Preset(Preset::Ellipse { a: "a".into(), b: "2".into() })
        );
        assert_eq!(
            curve("hyperbola(1,1)"),
            Curve::Preset(Preset::Hyperbola { a: "1".into(), b: "1".into() })
        );
        assert_eq!(curve("HEART"), Curve::Preset(Preset::Heart));
        assert_eq!(
            Preset::Circle { radius: "r".into() }.equation(),
            "x^2 + y^2 = (r)^2"
        );
        assert!(Preset::parse_shorthand("circle()").is_none());
        assert!(Preset::parse_shorthand("ellipse(1)").is_none());
    }

    #[test]
    fn test_classification() {
        assert_eq!(curve("sin(x)"), Curve::Explicit { expr: "sin(x)".into() });
        assert_eq!(curve("y = x^2"), Curve::Explicit { expr: "x^2".into() });
        assert_eq!(
            curve("x^2 + y^2 = 4"),
            Curve::Implicit { lhs: "x^2 + y^2".into(), rhs: "4".into() }
        );
        assert_eq!(
            curve("y = x*y"),
            Curve::Implicit { lhs: "y".into(), rhs: "x*y".into() }
        );
        assert_eq!(
            parse_input("a = b = c"),
            Err(CurveError::MalformedEquation("a = b = c".into()))
        );
        assert_eq!(parse_input("  "), Err(CurveError::Empty));
    }

    #[test]
    fn test_point_notation() {
        assert_eq!(
            parse_input("A = (1, -2.5)"),
            Ok(Input::Point { label: "A".into(), position: DVec2::new(1.0, -2.5) })
        );
        assert!(matches!(parse_input("b=(3,4)"), Ok(Input::Point { .. })));
        // three coordinates is not a point
        assert!(matches!(parse_input("A = (1, 2, 3)"), Ok(Input::Curve(Curve::Implicit { .. }))));
        assert!(matches!(parse_input("AB = (1, 2)"), Ok(Input::Curve(_))));
    }

    #[test]
    fn test_explicit_breaks_at_gaps() {
        let calc = Calculator::new();
        let viewport = Viewport::default();
        let runs = trace_explicit(&calc, "1/x", &Scope::new(), &viewport);
        assert!(runs.len() >= 2);
        for p in runs.iter().flatten() {
            assert!(p.y >= -OFFSCREEN_MARGIN && p.y <= viewport.height + OFFSCREEN_MARGIN);
        }

        // sqrt has no value left of the origin
        let runs = trace_explicit(&calc, "sqrt(x)", &Scope::new(), &viewport);
        assert_eq!(runs.len(), 1);
        assert!((runs[0][0].x - 400.0).abs() <= 1.0);
        assert!(runs[0].len() >= 399);
    }

    #[test]
    fn test_typed_formulas_trace() {
        let calc = Calculator::new();
        let viewport = Viewport::default();
        for text in ["x^2 + 1", "2*x", "sin(2*x)", "y = 0.5*x^3 - x"] {
            let lines = curve(text).trace(&calc, &Scope::new(), &viewport);
            assert!(!lines.is_empty(), "{text} drew nothing");
        }
        // y = 2x passes through the origin at the surface centre
        let lines = curve("2*x").trace(&calc, &Scope::new(), &viewport);
        assert!(lines.iter().flatten().any(|p| p.distance(DVec2::new(400.0, 300.0)) < 1e-9));

        let lines = curve("x*y = 1").trace(&calc, &Scope::new(), &viewport);
        assert!(lines.len() > 10);
    }

    #[test]
    fn test_explicit_one_sample_per_column() {
        let calc = Calculator::new();
        let viewport = Viewport::default();
        let runs = trace_explicit(&calc, "sin(x)", &Scope::new(), &viewport);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 801);
    }

    #[test]
    fn test_marching_squares_circle() {
        let cell = 0.05;
        let segments = marching_squares(
            |p| Some(p.length_squared() - 9.0),
            DVec2::splat(-5.0),
            DVec2::splat(5.0),
            cell,
        );
        assert!(segments.len() > 100);
        for p in segments.iter().flatten() {
            assert!((p.length() - 3.0).abs() < cell, "{p:?} off the circle");
        }
    }

    #[test]
    fn test_marching_squares_skips_undefined() {
        let segments = marching_squares(
            |p| (p.x > 0.0).then(|| p.length_squared() - 1.0),
            DVec2::splat(-2.0),
            DVec2::splat(2.0),
            0.1,
        );
        assert!(!segments.is_empty());
        assert!(segments.iter().flatten().all(|p| p.x >= -1e-9));
    }

    #[test]
    fn test_implicit_trace_uses_evaluator() {
        let calc = Calculator::new();
        let scope = Scope::new().with("r", 2.0);
        let viewport = Viewport::default();
        let lines = curve("x^2 + y^2 = r^2").trace(&calc, &scope, &viewport);
        assert!(!lines.is_empty());
        let center = DVec2::new(400.0, 300.0);
        for p in lines.iter().flatten() {
            // radius 2 at 40 px per unit, within one 2 px cell
            assert!((p.distance(center) - 80.0).abs() < IMPLICIT_CELL_PX);
        }
    }

    #[test]
    fn test_presets_trace() {
        let calc = Calculator::new();
        let scope = Scope::new().with("a", 2.0);
        let heart = Preset::Heart.points(&calc, &scope);
        assert_eq!(heart.len(), 1);
        assert!(heart[0][0].distance(heart[0][300]) < 1e-9);

        let hyperbola = Preset::Hyperbola { a: "a".into(), b: "1".into() }.points(&calc, &scope);
        assert_eq!(hyperbola.len(), 2);
        assert!(hyperbola[0].iter().all(|p| p.x <= -2.0));
        assert!(hyperbola[1].iter().all(|p| p.x >= 2.0));

        let missing = Preset::Circle { radius: "q".into() }.points(&calc, &scope);
        assert!(missing.is_empty());
    }
}
