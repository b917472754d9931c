//! Graphing Calculator
//!
//! Type functions such as `sin(x)`, equations such as `x^2 + y^2 = 4`,
//! shorthands such as `circle(r)` or points such as `A = (1, 2)`.
//!
//! Controls:
//! - Drag: Pan (or move a point)
//! - Wheel, +/-: Zoom
//! - Shift+Click: Tangent line
//! - S / P / L / G / C / O / D: Select, point, line, segment, circle, polygon, distance tools
//! - Delete: Remove the selected object and everything built on it
//! - Escape: Cancel the construction in progress
//! - R: Reset the view

use common::app::{run, Page};
use common::Scene;
use graphing::scenes::GraphingScene;

fn graphing() -> Box<dyn Scene> {
    Box::new(GraphingScene::new())
}

static PAGES: &[Page] = &[Page { name: "Graphing & Geometry", build: graphing }];

fn main() -> anyhow::Result<()> {
    run("Graphing Calculator", PAGES)?;
    Ok(())
}
