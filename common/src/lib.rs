//! Common utilities for the simulations
//!
//! This crate provides the viewport mapping, the drawing-surface contract,
//! scene lifecycle, GPU presentation and the window runner used by every
//! simulation binary.

pub mod app;
pub mod canvas;
pub mod equations_ui;
pub mod error;
pub mod graphics;
pub mod input;
pub mod scene;
pub mod viewport;

pub use canvas::*;
pub use equations_ui::{Equation, draw_controls_panel, draw_equations_sidebar};
pub use error::GraphicsError;
pub use graphics::{GraphicsContext, Vertex};
pub use input::*;
pub use scene::*;
pub use viewport::*;

/// Physical and presentation constants shared by the simulations
pub mod constants {
    /// Standard gravity in m/s²
    pub const G: f32 = 9.81;

    /// Fixed frame step used by the per-frame steppers, in seconds
    pub const FRAME_DT: f32 = 0.016;
}
