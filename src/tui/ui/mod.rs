mod layout;
mod setup;
mod table;

use crate::tui::app::{AppState, Scene};
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState) {
    match app.scene {
        Scene::Setup => setup::draw_setup(f, app),
        Scene::Table => table::draw_table(f, app),
    }
}
