use std::collections::HashMap;

use macroquad::prelude::*;

use crate::metadata::BACKGROUND_IDS;
use crate::palette::texture_keys;
use crate::resources::ResourceProvider;

/// Every texture the editor draws, keyed by name.
pub struct Textures {
    textures: HashMap<String, Texture2D>,
}

fn background_keys() -> impl Iterator<Item = String> {
    BACKGROUND_IDS
        .filter(|&id| id != 0)
        .map(|id| format!("background{id}"))
}

impl Textures {
    /// Loads `<dir>/<key>.png` for every known key. Missing files are
    /// skipped with a warning.
    pub async fn load(dir: &str) -> Self {
        let mut textures = HashMap::new();
        for key in texture_keys().into_iter().chain(background_keys()) {
            let path = format!("{dir}/{key}.png");
            match load_texture(&path).await {
                Ok(texture) => {
                    texture.set_filter(FilterMode::Nearest);
                    textures.insert(key, texture);
                }
                Err(e) => log::warn!("Failed to load {path}: {e:?}"),
            }
        }
        if textures.is_empty() {
            log::warn!("No textures found in {dir}; only colored tiles can be painted");
        } else {
            log::info!("Loaded {} textures from {dir}", textures.len());
        }
        Self { textures }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Texture2D> {
        self.textures.get(key)
    }
}

impl ResourceProvider for Textures {
    fn texture_size(&self, key: &str) -> Option<Vec2> {
        self.get(key).map(Texture2D::size)
    }

    fn is_ready(&self) -> bool {
        !self.textures.is_empty()
    }
}
