use anyhow::Result;

mod camera;
mod config;
mod engine;
mod mesh;
mod rendering;
mod sim;
mod state;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
