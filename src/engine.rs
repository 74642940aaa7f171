use crate::{rendering::renderer::Renderer, state::AppState};

pub fn update(state: &mut AppState, _renderer: &mut Renderer) -> anyhow::Result<()> {
    state.update();

    Ok(())
}
