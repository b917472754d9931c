//! Optics Simulations
//!
//! Pages:
//! 1. Refraction and total internal reflection at a flat interface
//! 2. White light dispersed by a prism
//! 3. Image formation by a thin lens
//!
//! Controls:
//! - 1-3: Select page
//! - Left/Right: Angle of incidence (or object distance)
//! - Up/Down: Apex angle (or focal length)
//! - Space: Pause the light animation
//! - R: Reset

use common::app::{run, Page};
use common::Scene;
use optics::scenes::{LensScene, PrismScene, RefractionScene};

fn refraction() -> Box<dyn Scene> {
    Box::new(RefractionScene::new())
}

fn prism() -> Box<dyn Scene> {
    Box::new(PrismScene::new())
}

fn lens() -> Box<dyn Scene> {
    Box::new(LensScene::new())
}

static PAGES: &[Page] = &[
    Page { name: "Refraction", build: refraction },
    Page { name: "Prism Dispersion", build: prism },
    Page { name: "Thin Lens", build: lens },
];

fn main() -> anyhow::Result<()> {
    run("Optics", PAGES)?;
    Ok(())
}
