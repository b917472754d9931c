//! Function plotting and geometry construction

pub mod analysis;
pub mod curve;
pub mod equations_ui;
pub mod expression;
pub mod geometry;
pub mod parameters;
pub mod renderer;
pub mod scenes;
