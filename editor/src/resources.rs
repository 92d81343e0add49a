use std::collections::HashMap;

use macroquad::math::Vec2;

/// Named textures the editor needs sizes for.
pub trait ResourceProvider {
    /// Pixel size of the texture stored under `key`.
    fn texture_size(&self, key: &str) -> Option<Vec2>;

    /// Whether loading has finished. Palettes are only built after this.
    fn is_ready(&self) -> bool;
}

/// Provider backed by a plain size table, for headless use.
#[derive(Clone, Debug, Default)]
pub struct SizeTable {
    sizes: HashMap<String, Vec2>,
    ready: bool,
}

impl SizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, size: Vec2) {
        self.sizes.insert(key.to_string(), size);
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl ResourceProvider for SizeTable {
    fn texture_size(&self, key: &str) -> Option<Vec2> {
        self.sizes.get(key).copied()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
