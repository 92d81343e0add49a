use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};

use macroquad::prelude::*;

use crate::editor::{Command, Editor, InsertionMode};
use crate::error::LevelIoError;
use crate::grid::{Grid, GridBounds, LevelFile};
use crate::input::{ButtonState, InputState};
use crate::layout::Layout;
use crate::metadata::LevelMetadata;
use crate::palette::CatalogId;
use crate::render::{self, PROPERTIES};
use crate::sprites::Textures;
use crate::storage::{self, EditorPrefs};

const LEVEL_DIR: &str = "levels";
const DEFAULT_LEVEL: &str = "untitled";

pub fn window_conf() -> Conf {
    let bounds = GridBounds::default();
    let size = Layout::new(bounds.min_rows, bounds.min_columns).window_size();
    Conf {
        window_title: "Level Editor".to_string(),
        window_width: size.x as i32,
        window_height: size.y as i32,
        ..Default::default()
    }
}

/// The toolbar command under `point`. `step` scales property adjustments.
fn toolbar_command(editor: &Editor, point: Vec2, step: i32) -> Option<Command> {
    let layout = editor.layout();
    for (i, mode) in InsertionMode::all().into_iter().enumerate() {
        if layout.mode_button(i).contains(point) {
            return Some(Command::SetMode(mode));
        }
    }

    let count = editor.grid().layer_count();
    for layer in 0..count {
        if layout.layer_toggle(layer, count).contains(point) {
            return Some(Command::ToggleLayer(layer));
        }
        if layout.layer_preview(layer, count).contains(point) {
            return Some(Command::SelectLayer(layer));
        }
    }

    for (row, (_, adjust)) in PROPERTIES.iter().enumerate() {
        let (minus, plus) = layout.property_buttons(row);
        if minus.contains(point) {
            return Some(adjust(-step));
        }
        if plus.contains(point) {
            return Some(adjust(step));
        }
    }

    if editor.mode() == InsertionMode::PaintTile {
        let brush = [
            Command::TogglePainting,
            Command::CycleCollision,
            Command::ToggleBrushVisible,
        ];
        for (i, command) in brush.into_iter().enumerate() {
            if layout.brush_button(i).contains(point) {
                return Some(command);
            }
        }
        for (slot, id) in [CatalogId::Terrain, CatalogId::Pipes].into_iter().enumerate() {
            let (prev, next) = layout.page_buttons(slot);
            if prev.contains(point) {
                return Some(Command::TurnPage(id, -1));
            }
            if next.contains(point) {
                return Some(Command::TurnPage(id, 1));
            }
        }
    }

    None
}

fn level_paths(level_name: &str) -> (PathBuf, PathBuf) {
    let dir = Path::new(LEVEL_DIR);
    (
        dir.join(format!("{level_name}.csv")),
        dir.join(format!("{level_name}.json")),
    )
}

/// Loads a saved level, or `None` if it has never been saved.
fn load_level(csv_path: &Path, json_path: &Path) -> Result<Option<Editor>, LevelIoError> {
    if !json_path.exists() {
        return Ok(None);
    }
    let file = LevelFile::parse(&read_to_string(json_path)?)?;
    let csv = if csv_path.exists() {
        read_to_string(csv_path)?
    } else {
        String::new()
    };
    let grid = Grid::from_csv_and_level(&csv, &file)?;
    Ok(Some(Editor::from_level(file.metadata, grid)))
}

pub struct App {
    editor: Editor,
    textures: Textures,
    input: InputState,
    prefs: EditorPrefs,
    csv_path: PathBuf,
    json_path: PathBuf,
}

impl App {
    /// Opens `level_name`, falling back to the last level edited.
    pub fn new(textures: Textures, level_name: Option<&str>) -> Self {
        let mut prefs = storage::load_prefs();
        let level_name = level_name
            .map(str::to_string)
            .or_else(|| prefs.last_level.clone())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let (csv_path, json_path) = level_paths(&level_name);

        let editor = match load_level(&csv_path, &json_path) {
            Ok(Some(editor)) => {
                log::info!("Loaded level {level_name}");
                editor
            }
            Ok(None) => {
                log::info!("Starting new level {level_name}");
                Editor::new(LevelMetadata::new(&level_name))
            }
            Err(e) => {
                log::error!("Failed to load level {level_name}: {e}");
                Editor::new(LevelMetadata::new(&level_name))
            }
        };

        prefs.last_level = Some(level_name);
        storage::save_prefs(&prefs);

        Self {
            editor,
            textures,
            input: InputState::new(),
            prefs,
            csv_path,
            json_path,
        }
    }

    fn save(&self) -> Result<(), LevelIoError> {
        if let Some(parent) = self.csv_path.parent() {
            create_dir_all(parent)?;
        }
        let grid = self.editor.grid();
        write(&self.csv_path, grid.to_csv()?)?;
        write(&self.json_path, LevelFile::new(self.editor.metadata(), grid).to_json()?)?;
        Ok(())
    }

    /// Run one frame of the editor loop. Returns true to continue.
    pub fn tick(&mut self) -> bool {
        let mut frame = self.input.poll(get_frame_time());

        if frame.button == ButtonState::Pressed {
            let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
            let step = if shift { 10 } else { 1 };
            if let Some(command) = toolbar_command(&self.editor, frame.pointer, step) {
                frame.commands.push(command);
            }
        }

        for command in &frame.commands {
            match command {
                Command::Save => match self.save() {
                    Ok(()) => log::info!("Saved {}", self.json_path.display()),
                    Err(e) => log::error!("Failed to save {}: {e}", self.json_path.display()),
                },
                Command::ToggleGrid => {
                    self.prefs.show_grid = !self.prefs.show_grid;
                    storage::save_prefs(&self.prefs);
                }
                _ => {}
            }
        }

        self.editor.input_and_update(&frame, &self.textures);
        render::draw(&self.editor, &self.textures, self.prefs.show_grid);

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::new(LevelMetadata::new("toolbar"))
    }

    #[test]
    fn mode_buttons_map_to_modes() {
        let editor = editor();
        let center = editor.layout().mode_button(3).center();
        assert_eq!(
            toolbar_command(&editor, center, 1),
            Some(Command::SetMode(InsertionMode::PaintEnemy))
        );
    }

    #[test]
    fn property_buttons_scale_by_step() {
        let editor = editor();
        let (minus, plus) = editor.layout().property_buttons(4);
        assert_eq!(
            toolbar_command(&editor, minus.center(), 10),
            Some(Command::AdjustTimeToFinish(-10))
        );
        assert_eq!(
            toolbar_command(&editor, plus.center(), 1),
            Some(Command::AdjustTimeToFinish(1))
        );
    }

    #[test]
    fn color_rows_adjust_fill_and_brush() {
        let editor = editor();
        let (minus, _) = editor.layout().property_buttons(5);
        let (_, plus) = editor.layout().property_buttons(6);
        let (alpha_minus, _) = editor.layout().property_buttons(7);
        assert_eq!(
            toolbar_command(&editor, minus.center(), 10),
            Some(Command::AdjustBackgroundColor(-10))
        );
        assert_eq!(
            toolbar_command(&editor, plus.center(), 1),
            Some(Command::AdjustBrushColor(1))
        );
        assert_eq!(
            toolbar_command(&editor, alpha_minus.center(), 1),
            Some(Command::AdjustBrushAlpha(-1))
        );
    }

    #[test]
    fn layer_panel_selects_and_toggles() {
        let editor = editor();
        let count = editor.grid().layer_count();
        let preview = editor.layout().layer_preview(2, count);
        let toggle = editor.layout().layer_toggle(2, count);
        assert_eq!(
            toolbar_command(&editor, preview.center(), 1),
            Some(Command::SelectLayer(2))
        );
        assert_eq!(
            toolbar_command(&editor, toggle.center(), 1),
            Some(Command::ToggleLayer(2))
        );
    }

    #[test]
    fn grid_clicks_are_not_toolbar_clicks() {
        let editor = editor();
        let inside = editor.layout().grid.center();
        assert_eq!(toolbar_command(&editor, inside, 1), None);
    }

    #[test]
    fn brush_buttons_only_in_tile_mode() {
        let mut editor = editor();
        let button = editor.layout().brush_button(1).center();
        assert_eq!(toolbar_command(&editor, button, 1), Some(Command::CycleCollision));
        editor.set_mode(InsertionMode::PaintItem);
        assert_eq!(toolbar_command(&editor, button, 1), None);
    }
}
