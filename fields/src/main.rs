//! Field Simulations
//!
//! Pages:
//! 1. Electric field of point charges (drag charges, F toggles the test-charge force)
//! 2. Magnetic field of a wire, loop or solenoid (click to move the compass)
//!
//! Controls:
//! - 1-2: Select page
//! - +/-: Add a charge / change the current
//! - Delete: Remove the last charge
//! - S / L / C: Straight wire, loop, solenoid
//! - R: Reset

use common::app::{run, Page};
use common::Scene;
use fields::scenes::{ElectricScene, MagneticScene};

fn electric() -> Box<dyn Scene> {
    Box::new(ElectricScene::new())
}

fn magnetic() -> Box<dyn Scene> {
    Box::new(MagneticScene::new())
}

static PAGES: &[Page] = &[
    Page { name: "Electric Field", build: electric },
    Page { name: "Magnetic Field", build: magnetic },
];

fn main() -> anyhow::Result<()> {
    run("Electromagnetic Fields", PAGES)?;
    Ok(())
}
