//! Viewport mapping between simulation space and surface pixels
//!
//! Simulation space is y-up with the viewport center mapped to the middle of
//! the surface. Pixel space is y-down with the origin at the top-left corner.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Default pixels per simulation unit
pub const DEFAULT_SCALE: f64 = 40.0;

/// Wheel zoom factor applied when scrolling away from the user
pub const ZOOM_OUT_FACTOR: f64 = 0.9;
/// Wheel zoom factor applied when scrolling toward the user
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Toolbar zoom step
pub const ZOOM_STEP: f64 = 1.3;

/// 2D pan/zoom viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: DVec2,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            center: DVec2::ZERO,
            scale: DEFAULT_SCALE,
            width,
            height,
            min_scale: 5.0,
            max_scale: 200.0,
        }
    }

    /// Viewport with custom zoom limits (the function plotter allows zooming out to 1)
    pub fn with_limits(width: f64, height: f64, min_scale: f64, max_scale: f64) -> Self {
        let mut viewport = Self::new(width, height);
        viewport.min_scale = min_scale;
        viewport.max_scale = max_scale;
        viewport.scale = viewport.scale.clamp(min_scale, max_scale);
        viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Simulation coordinates to pixel coordinates
    pub fn to_pixel(&self, sim: DVec2) -> DVec2 {
        DVec2::new(
            (sim.x - self.center.x) * self.scale + self.width / 2.0,
            -(sim.y - self.center.y) * self.scale + self.height / 2.0,
        )
    }

    /// Pixel coordinates to simulation coordinates
    pub fn to_sim(&self, px: DVec2) -> DVec2 {
        DVec2::new(
            (px.x - self.width / 2.0) / self.scale + self.center.x,
            -(px.y - self.height / 2.0) / self.scale + self.center.y,
        )
    }

    /// Pan by a pointer drag expressed in pixels
    pub fn pan(&mut self, delta_px: DVec2) {
        self.center.x -= delta_px.x / self.scale;
        self.center.y += delta_px.y / self.scale;
    }

    /// Apply a wheel event. Positive deltas zoom out.
    pub fn zoom(&mut self, wheel_delta: f64) {
        let factor = if wheel_delta > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        self.zoom_by(factor);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / ZOOM_STEP);
    }

    pub fn reset(&mut self) {
        self.center = DVec2::ZERO;
        self.scale = DEFAULT_SCALE.clamp(self.min_scale, self.max_scale);
    }

    /// Distance between grid lines in simulation units: the largest power of
    /// ten that keeps lines at most ~50 pixels apart (and so more than 5).
    pub fn grid_spacing(&self) -> f64 {
        10f64.powf((50.0 / self.scale).log10().floor())
    }

    /// Simulation-space rectangle visible on the surface as (min, max)
    pub fn visible_bounds(&self) -> (DVec2, DVec2) {
        let top_left = self.to_sim(DVec2::ZERO);
        let bottom_right = self.to_sim(DVec2::new(self.width, self.height));
        (
            DVec2::new(top_left.x, bottom_right.y),
            DVec2::new(bottom_right.x, top_left.y),
        )
    }

    /// Grid line positions covering the visible area, as (vertical x values, horizontal y values)
    pub fn grid_lines(&self) -> (Vec<f64>, Vec<f64>) {
        let spacing = self.grid_spacing();
        let (min, max) = self.visible_bounds();
        (
            multiples_between(min.x, max.x, spacing),
            multiples_between(min.y, max.y, spacing),
        )
    }

    /// Pixel distance between a simulation point and a pixel position
    pub fn pixel_distance(&self, sim: DVec2, px: DVec2) -> f64 {
        self.to_pixel(sim).distance(px)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

fn multiples_between(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    if !(spacing > 0.0) || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let start = (min / spacing).floor() as i64;
    let end = (max / spacing).ceil() as i64;
    (start..=end).map(|i| i as f64 * spacing).collect()
}

/// Round a value to the nearest multiple of `step`
pub fn snap(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Axis tick label
pub fn axis_label(value: f64) -> String {
    if value.abs() < 0.01 {
        "0".to_string()
    } else if value.abs() >= 1.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
