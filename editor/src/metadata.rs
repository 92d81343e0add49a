use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::cell::Rgb;
use crate::grid::GridBounds;

pub const BACKGROUND_IDS: RangeInclusive<u32> = 0..=10;
pub const MUSIC_IDS: RangeInclusive<u32> = 1..=9;
pub const TIME_LIMITS: RangeInclusive<u32> = 1..=2000;

/// Per-level properties. Setters clamp to the valid ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelMetadata {
    name: String,
    background_texture_id: u32,
    background_color: Rgb,
    music_id: u32,
    time_to_finish: u32,
    rows: usize,
    columns: usize,
}

impl Default for LevelMetadata {
    fn default() -> Self {
        let bounds = GridBounds::default();
        Self {
            name: String::new(),
            background_texture_id: 1,
            background_color: Rgb::WHITE,
            music_id: 1,
            time_to_finish: 200,
            rows: bounds.min_rows,
            columns: bounds.min_columns,
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn offset(value: u32, delta: i32) -> u32 {
    value.saturating_add_signed(delta)
}

impl LevelMetadata {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn background_texture_id(&self) -> u32 {
        self.background_texture_id
    }

    pub fn set_background_texture_id(&mut self, id: u32) {
        self.background_texture_id = clamp(id, &BACKGROUND_IDS);
    }

    pub fn adjust_background_texture_id(&mut self, delta: i32) {
        self.set_background_texture_id(offset(self.background_texture_id, delta));
    }

    /// Texture key of the background image; id 0 means none.
    pub fn background_key(&self) -> Option<String> {
        (self.background_texture_id != 0).then(|| format!("background{}", self.background_texture_id))
    }

    pub fn background_color(&self) -> Rgb {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.background_color = color;
    }

    /// Steps the fill color through the preset colors.
    pub fn adjust_background_color(&mut self, delta: i32) {
        self.background_color = self.background_color.step_preset(delta);
    }

    pub fn music_id(&self) -> u32 {
        self.music_id
    }

    pub fn set_music_id(&mut self, id: u32) {
        self.music_id = clamp(id, &MUSIC_IDS);
    }

    pub fn adjust_music_id(&mut self, delta: i32) {
        self.set_music_id(offset(self.music_id, delta));
    }

    pub fn music_key(&self) -> String {
        format!("music{}", self.music_id)
    }

    pub fn time_to_finish(&self) -> u32 {
        self.time_to_finish
    }

    pub fn set_time_to_finish(&mut self, seconds: u32) {
        self.time_to_finish = clamp(seconds, &TIME_LIMITS);
    }

    pub fn adjust_time_to_finish(&mut self, delta: i32) {
        self.set_time_to_finish(offset(self.time_to_finish, delta));
    }

    /// Requested `(rows, columns)`. The grid follows on the next frame.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn set_rows(&mut self, rows: usize, bounds: &GridBounds) {
        self.rows = bounds.clamp_rows(rows);
    }

    pub fn set_columns(&mut self, columns: usize, bounds: &GridBounds) {
        self.columns = bounds.clamp_columns(columns);
    }

    /// Re-applies every clamp, for values that came from a file.
    pub fn sanitize(&mut self, bounds: &GridBounds) {
        self.set_background_texture_id(self.background_texture_id);
        self.set_music_id(self.music_id);
        self.set_time_to_finish(self.time_to_finish);
        self.set_rows(self.rows, bounds);
        self.set_columns(self.columns, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let meta = LevelMetadata::new("castle");
        assert_eq!(meta.name(), "castle");
        assert_eq!(meta.background_texture_id(), 1);
        assert_eq!(meta.background_color(), Rgb::WHITE);
        assert_eq!(meta.music_id(), 1);
        assert_eq!(meta.time_to_finish(), 200);
        assert_eq!(meta.dimensions(), (14, 18));
    }

    #[test]
    fn setters_clamp() {
        let bounds = GridBounds::default();
        let mut meta = LevelMetadata::default();
        meta.set_background_texture_id(11);
        meta.set_music_id(0);
        meta.set_time_to_finish(5000);
        meta.set_rows(3, &bounds);
        meta.set_columns(1000, &bounds);
        assert_eq!(meta.background_texture_id(), 10);
        assert_eq!(meta.music_id(), 1);
        assert_eq!(meta.time_to_finish(), 2000);
        assert_eq!(meta.dimensions(), (14, 400));
    }

    #[test]
    fn adjustments_saturate() {
        let mut meta = LevelMetadata::default();
        meta.adjust_background_texture_id(-5);
        assert_eq!(meta.background_texture_id(), 0);
        assert_eq!(meta.background_key(), None);
        meta.adjust_background_texture_id(3);
        assert_eq!(meta.background_key().as_deref(), Some("background3"));
        meta.adjust_music_id(20);
        assert_eq!(meta.music_key(), "music9");
        meta.adjust_time_to_finish(-1000);
        assert_eq!(meta.time_to_finish(), 1);
    }

    #[test]
    fn sanitize_fixes_loaded_values() {
        let json = r#"{"name":"x","music_id":42,"rows":2}"#;
        let mut meta: LevelMetadata = serde_json::from_str(json).unwrap();
        meta.sanitize(&GridBounds::default());
        assert_eq!(meta.music_id(), 9);
        assert_eq!(meta.dimensions(), (14, 18));
        assert_eq!(meta.time_to_finish(), 200);
    }
}
