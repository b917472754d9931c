//! Particle fluid simulation (SPH) with a spatial hash grid

pub mod equations_ui;
pub mod particle;
pub mod renderer;
pub mod scenes;
pub mod spatial_hash;
pub mod sph;
