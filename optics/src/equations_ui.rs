//! Equation tables for the optics scenes

use common::Equation;

pub const REFRACTION_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Snell's Law",
        formula: "n₁·sin θ₁ = n₂·sin θ₂",
        description: "Relates the angles on either side of an interface",
    },
    Equation {
        name: "Critical Angle",
        formula: "θc = arcsin(n₂/n₁)",
        description: "Only exists when n₁ > n₂",
    },
    Equation {
        name: "Total Internal Reflection",
        formula: "θ₁ > θc ⇒ reflected",
        description: "All light reflects back into the denser medium",
    },
    Equation {
        name: "Refractive Index",
        formula: "n = c / v",
        description: "How much light slows down in the medium",
    },
];

pub const REFRACTION_VARIABLES: &[(&str, &str)] = &[
    ("n₁, n₂", "Refractive indices"),
    ("θ₁", "Angle of incidence"),
    ("θ₂", "Angle of refraction"),
    ("θc", "Critical angle"),
    ("c", "Speed of light in vacuum"),
];

pub const PRISM_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Deviation",
        formula: "δ = i + e − A",
        description: "Total turn of the ray through the prism",
    },
    Equation {
        name: "Minimum Deviation",
        formula: "n = sin((A + δm)/2) / sin(A/2)",
        description: "Symmetric passage through the prism",
    },
    Equation {
        name: "Cauchy Dispersion",
        formula: "n(λ) ≈ A + B/λ²",
        description: "Shorter wavelengths see a higher index",
    },
];

pub const PRISM_VARIABLES: &[(&str, &str)] = &[
    ("A", "Apex angle"),
    ("i", "Angle of incidence"),
    ("e", "Angle of emergence"),
    ("δ", "Angle of deviation"),
    ("λ", "Wavelength"),
];

pub const LENS_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Thin Lens",
        formula: "1/f = 1/dₒ + 1/dᵢ",
        description: "Object and image distances from the lens",
    },
    Equation {
        name: "Magnification",
        formula: "m = −dᵢ/dₒ = hᵢ/hₒ",
        description: "Negative magnification means an inverted image",
    },
    Equation {
        name: "Lensmaker's Equation",
        formula: "1/f = (n − 1)(1/R₁ − 1/R₂)",
        description: "Focal length from the surface curvatures",
    },
];

pub const LENS_VARIABLES: &[(&str, &str)] = &[
    ("f", "Focal length (negative when diverging)"),
    ("dₒ", "Object distance"),
    ("dᵢ", "Image distance (negative when virtual)"),
    ("m", "Magnification"),
    ("hₒ, hᵢ", "Object and image heights"),
];
