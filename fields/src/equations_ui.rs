//! Equation tables for the field scenes

use common::Equation;

pub const ELECTRIC_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Coulomb's Law",
        formula: "F = k·q₁·q₂ / r²",
        description: "Force between two point charges",
    },
    Equation {
        name: "Electric Field",
        formula: "E⃗ = k·Q/r² · r̂",
        description: "Field of a single point charge",
    },
    Equation {
        name: "Superposition",
        formula: "E⃗ = Σᵢ E⃗ᵢ",
        description: "Fields from all charges add as vectors",
    },
    Equation {
        name: "Force on a Charge",
        formula: "F⃗ = q·E⃗",
        description: "Unit test charge feels the field itself",
    },
];

pub const ELECTRIC_VARIABLES: &[(&str, &str)] = &[
    ("k", "Coulomb constant"),
    ("Q, q", "Charge"),
    ("r", "Distance from the charge"),
    ("r̂", "Unit vector away from the charge"),
    ("E", "Electric field strength"),
];

pub const MAGNETIC_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Straight Wire",
        formula: "B = μ₀I / 2πd",
        description: "Field circles the wire, falling off as 1/d",
    },
    Equation {
        name: "Current Loop",
        formula: "B = μ₀I / 2R",
        description: "Field at the centre of a loop",
    },
    Equation {
        name: "Solenoid",
        formula: "B = μ₀·n·I",
        description: "Nearly uniform field inside the coil",
    },
    Equation {
        name: "Right-Hand Rule",
        formula: "B⃗ ∝ I⃗ × r̂",
        description: "Thumb along the current, fingers curl with B",
    },
];

pub const MAGNETIC_VARIABLES: &[(&str, &str)] = &[
    ("B", "Magnetic field strength"),
    ("I", "Current (A)"),
    ("μ₀", "Permeability of free space"),
    ("d", "Distance from the wire"),
    ("R", "Loop radius"),
    ("n", "Turns per unit length"),
];
