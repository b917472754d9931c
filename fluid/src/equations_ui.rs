//! Equation tables for the fluid scene

use common::Equation;

pub const SPH_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Density",
        formula: "ρᵢ = Σⱼ (1 - rᵢⱼ/h)²",
        description: "Kernel sum over neighbours within h",
    },
    Equation {
        name: "Equation of State",
        formula: "Pᵢ = k·(ρᵢ - ρ₀)",
        description: "Pressure pushes density toward rest",
    },
    Equation {
        name: "Pressure Force",
        formula: "F⃗ᵢ = -Σⱼ r̂ᵢⱼ·(Pᵢ+Pⱼ)/2·(1 - rᵢⱼ/h)",
        description: "Symmetric pairwise repulsion",
    },
    Equation {
        name: "Viscosity",
        formula: "v⃗ ← μ·v⃗",
        description: "Per-frame damping by fluid type",
    },
];

pub const SPH_VARIABLES: &[(&str, &str)] = &[
    ("ρ", "Particle density"),
    ("ρ₀", "Target density"),
    ("P", "Pressure"),
    ("k", "Pressure multiplier"),
    ("h", "Smoothing radius (px)"),
    ("μ", "Viscosity multiplier"),
];
