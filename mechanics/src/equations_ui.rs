//! Equation tables for the mechanics scenes

use common::Equation;

// ============================================================================
// Pendulum
// ============================================================================

pub const PENDULUM_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Equation of Motion",
        formula: "θ̈ = -(g/L)·sin θ - b·θ̇",
        description: "Angular acceleration with damping",
    },
    Equation {
        name: "Small-Angle Period",
        formula: "T = 2π·√(L/g)",
        description: "Valid for small amplitudes",
    },
    Equation {
        name: "Kinetic Energy",
        formula: "KE = ½·m·(L·θ̇)²",
        description: "Energy of motion",
    },
    Equation {
        name: "Potential Energy",
        formula: "PE = m·g·L·(1 - cos θ)",
        description: "Height above the lowest point",
    },
];

pub const PENDULUM_VARIABLES: &[(&str, &str)] = &[
    ("θ", "Angle from vertical"),
    ("θ̇", "Angular velocity"),
    ("g", "Gravitational acceleration"),
    ("L", "String length"),
    ("b", "Damping coefficient"),
    ("m", "Bob mass"),
];

// ============================================================================
// Newton's Cradle
// ============================================================================

pub const CRADLE_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Conservation of Momentum",
        formula: "m₁v₁ + m₂v₂ = m₁v₁' + m₂v₂'",
        description: "Total momentum before equals after",
    },
    Equation {
        name: "Elastic Collision",
        formula: "v₁' = ((m₁-m₂)v₁ + 2m₂v₂)/(m₁+m₂)",
        description: "Equal masses simply swap velocities",
    },
    Equation {
        name: "Kinetic Energy",
        formula: "KE = ½·m·v²",
        description: "Conserved in elastic collisions",
    },
    Equation {
        name: "Potential Energy",
        formula: "PE = m·g·L·(1 - cos θ)",
        description: "Raised ball stores energy",
    },
];

pub const CRADLE_VARIABLES: &[(&str, &str)] = &[
    ("m", "Ball mass"),
    ("v", "Tangential velocity"),
    ("v'", "Velocity after impact"),
    ("L", "String length"),
    ("θ", "Swing angle"),
];

// ============================================================================
// Faraday's Law
// ============================================================================

pub const FARADAY_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Faraday's Law",
        formula: "ε = -dΦ/dt",
        description: "Changing flux induces an EMF",
    },
    Equation {
        name: "Magnetic Flux",
        formula: "Φ = B·A·cos θ",
        description: "Field passing through the coil",
    },
    Equation {
        name: "Lenz's Law",
        formula: "ε ∝ -v",
        description: "Induced current opposes the motion",
    },
    Equation {
        name: "Ohm's Law",
        formula: "I = ε / R",
        description: "Current driven through the coil",
    },
];

pub const FARADAY_VARIABLES: &[(&str, &str)] = &[
    ("ε", "Induced EMF (V)"),
    ("Φ", "Magnetic flux (Wb)"),
    ("B", "Field strength"),
    ("A", "Coil area"),
    ("I", "Induced current (A)"),
    ("R", "Coil resistance"),
];

// ============================================================================
// Projectile Motion
// ============================================================================

pub const PROJECTILE_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Position",
        formula: "x = v₀·cos θ·t,  y = h + v₀·sin θ·t - ½gt²",
        description: "Drag-free trajectory",
    },
    Equation {
        name: "Range",
        formula: "R = v₀·cos θ·t_f",
        description: "Horizontal distance on landing",
    },
    Equation {
        name: "Maximum Height",
        formula: "H = h + (v₀·sin θ)² / 2g",
        description: "Apex of the arc",
    },
    Equation {
        name: "Linear Drag",
        formula: "a⃗ = g⃗ - k·v⃗",
        description: "Air resistance proportional to speed",
    },
];

pub const PROJECTILE_VARIABLES: &[(&str, &str)] = &[
    ("v₀", "Launch speed"),
    ("θ", "Launch angle"),
    ("h", "Launch height"),
    ("g", "Gravitational acceleration"),
    ("k", "Drag coefficient"),
    ("t_f", "Time of flight"),
];

// ============================================================================
// Pascal's Law
// ============================================================================

pub const PASCAL_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Pascal's Principle",
        formula: "P = F₁/A₁ = F₂/A₂",
        description: "Pressure is transmitted undiminished",
    },
    Equation {
        name: "Output Force",
        formula: "F₂ = P·A₂",
        description: "Force on the large piston",
    },
    Equation {
        name: "Mechanical Advantage",
        formula: "MA = A₂/A₁",
        description: "Force multiplication ratio",
    },
    Equation {
        name: "Volume Conservation",
        formula: "A₁·d₁ = A₂·d₂",
        description: "Large piston moves less",
    },
];

pub const PASCAL_VARIABLES: &[(&str, &str)] = &[
    ("P", "Pressure (N/cm²)"),
    ("F₁, F₂", "Input and output force"),
    ("A₁, A₂", "Piston areas"),
    ("d₁, d₂", "Piston displacements"),
];
