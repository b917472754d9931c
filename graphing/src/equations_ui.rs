//! Equation table for the graphing board

use common::Equation;

pub const GRAPHING_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Derivative",
        formula: "f'(x) ≈ [f(x+h) − f(x−h)] / 2h",
        description: "Central difference with h = 0.0001",
    },
    Equation {
        name: "Tangent Line",
        formula: "y = f(x₀) + f'(x₀)(x − x₀)",
        description: "Shift+click the graph to place it",
    },
    Equation {
        name: "Circle",
        formula: "x² + y² = r²",
        description: "Shorthand: circle(r)",
    },
    Equation {
        name: "Ellipse",
        formula: "(x/a)² + (y/b)² = 1",
        description: "Shorthand: ellipse(a, b)",
    },
    Equation {
        name: "Hyperbola",
        formula: "(x/a)² − (y/b)² = 1",
        description: "Shorthand: hyperbola(a, b)",
    },
    Equation {
        name: "Distance",
        formula: "d = √((x₂−x₁)² + (y₂−y₁)²)",
        description: "Length between two points",
    },
];

pub const GRAPHING_VARIABLES: &[(&str, &str)] = &[
    ("x, y", "Graph coordinates"),
    ("a, b, r …", "Parameters, each with a slider"),
    ("A = (x, y)", "Defines or moves point A"),
    ("h", "Difference step"),
];
