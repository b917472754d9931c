//! Geometric optics: refraction, prism dispersion and thin lenses

pub mod equations_ui;
pub mod lens;
pub mod prism;
pub mod refraction;
pub mod renderer;
pub mod scenes;
