use std::env;

use macroquad::window::next_frame;

use level_editor::editor_app::{App, window_conf};
use level_editor::sprites::Textures;

const ASSET_DIR: &str = "assets";

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let level_name = env::args().nth(1);
    let textures = Textures::load(ASSET_DIR).await;
    let mut app = App::new(textures, level_name.as_deref());
    while app.tick() {
        next_frame().await;
    }
}
