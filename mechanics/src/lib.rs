//! Classical mechanics simulations: pendulum, Newton's cradle, Faraday
//! induction, projectile motion and the hydraulic press.

pub mod cradle;
pub mod equations_ui;
pub mod faraday;
pub mod hydraulics;
pub mod pendulum;
pub mod projectile;
pub mod renderer;
pub mod scenes;
