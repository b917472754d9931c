//! Fluid Dynamics Simulation
//!
//! Controls:
//! - Space: Start (clears the tank) / Stop
//! - Mouse drag: Spawn particles while running
//! - W / O / H: Water, oil or honey
//! - R: Reset

use common::app::{run, Page};
use common::Scene;
use fluid::scenes::FluidScene;

fn fluid() -> Box<dyn Scene> {
    Box::new(FluidScene::new())
}

static PAGES: &[Page] = &[Page { name: "Fluid Dynamics", build: fluid }];

fn main() -> anyhow::Result<()> {
    run("Fluid Dynamics", PAGES)?;
    Ok(())
}
