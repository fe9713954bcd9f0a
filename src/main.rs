mod app;

use anyhow::{Context, Result};

use app::App;
use falling_sand::config::SimulationConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = SimulationConfig::from_env().context("reading SAND_* configuration")?;
    let mut app = App::new(config)?;

    while app.is_running() {
        app.input();
        app.update();
    }

    Ok(())
}
