use anyhow::{Context, Result};
use cgmath::Vector3;

use cubelink::config::SandboxConfig;
use cubelink::SandboxApp;

fn main() -> Result<()> {
    env_logger::init();

    // The mouse controller sits at the camera, so spawn cubes further out
    let config = SandboxConfig::default().with_spawn_offset(Vector3::new(0.0, 0.0, -1.0));

    let app = SandboxApp::new(config).context("failed to set up the desktop sandbox")?;
    app.run().context("desktop sandbox stopped with an error")?;
    Ok(())
}
