//! Mechanics Simulations
//!
//! Pages:
//! 1. Simple pendulum (drag the bob to set the release angle)
//! 2. Newton's cradle
//! 3. Faraday's law (drag the magnet, arrow keys push it)
//! 4. Projectile motion (drag to pan, scroll to zoom)
//! 5. Pascal's law hydraulic press
//!
//! Controls:
//! - 1-5: Select page
//! - Space: Pause / start / launch / press
//! - R: Reset

use common::app::{run, Page};
use common::Scene;
use mechanics::scenes::{CradleScene, FaradayScene, PendulumScene, PressScene, ProjectileScene};

fn pendulum() -> Box<dyn Scene> {
    Box::new(PendulumScene::new())
}

fn cradle() -> Box<dyn Scene> {
    Box::new(CradleScene::new())
}

fn faraday() -> Box<dyn Scene> {
    Box::new(FaradayScene::new())
}

fn projectile() -> Box<dyn Scene> {
    Box::new(ProjectileScene::new())
}

fn press() -> Box<dyn Scene> {
    Box::new(PressScene::new())
}

static PAGES: &[Page] = &[
    Page { name: "Simple Pendulum", build: pendulum },
    Page { name: "Newton's Cradle", build: cradle },
    Page { name: "Faraday's Law", build: faraday },
    Page { name: "Projectile Motion", build: projectile },
    Page { name: "Pascal's Law", build: press },
];

fn main() -> anyhow::Result<()> {
    run("Mechanics", PAGES)?;
    Ok(())
}
