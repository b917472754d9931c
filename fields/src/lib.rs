//! Electric and magnetic field visualisations

pub mod electric;
pub mod equations_ui;
pub mod magnetic;
pub mod renderer;
pub mod scenes;
