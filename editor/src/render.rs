use macroquad::prelude::*;

use crate::cell::{CELL_SIZE, Cell, CellKind, Visual};
use crate::editor::{Command, Editor, InsertionMode, TilePainting};
use crate::layout::PREVIEW_SCALE;
use crate::palette::{CatalogId, EntryRef, PaletteEntry, Palettes};
use crate::position::{CellRef, Position};
use crate::sprites::Textures;

const BACKDROP: Color = Color::new(0.12, 0.12, 0.16, 1.0);
const PANEL: Color = Color::new(0.08, 0.08, 0.12, 1.0);
const BUTTON: Color = Color::new(0.2, 0.2, 0.24, 1.0);
const BUTTON_ACTIVE: Color = Color::new(0.31, 0.31, 0.4, 1.0);
const GRID_LINE: Color = Color::new(0.0, 0.0, 0.0, 0.25);
const SELECTION: Color = Color::new(1.0, 0.85, 0.1, 1.0);
const ARMED: Color = Color::new(0.2, 0.9, 0.3, 1.0);
const HIDDEN_FADE: f32 = 0.35;

/// Property rows of the map panel, top to bottom.
pub(crate) const PROPERTIES: [(&str, fn(i32) -> Command); 8] = [
    ("Rows", Command::AdjustRows),
    ("Columns", Command::AdjustColumns),
    ("Background", Command::AdjustBackground),
    ("Music", Command::AdjustMusic),
    ("Time", Command::AdjustTimeToFinish),
    ("Fill", Command::AdjustBackgroundColor),
    ("Brush", Command::AdjustBrushColor),
    ("Alpha", Command::AdjustBrushAlpha),
];

/// Something that draws itself with its top-left corner at `at`.
pub(crate) trait Render {
    fn render(&self, at: Vec2, scale: f32, textures: &Textures);
}

impl Render for Cell {
    fn render(&self, at: Vec2, scale: f32, textures: &Textures) {
        let fade = if self.is_visible() { 1.0 } else { HIDDEN_FADE };
        let size = CELL_SIZE * scale;
        match self.visual() {
            Visual::Color { color, alpha } => {
                if *alpha > 0.0 {
                    draw_rectangle(at.x, at.y, size, size, color.with_alpha(alpha * fade));
                }
            }
            Visual::Texture { key, alpha } => {
                let Some(texture) = textures.get(key) else {
                    draw_rectangle_lines(at.x, at.y, size, size, 1.0, MAGENTA);
                    return;
                };
                let (dx, dy) = self.draw_offset();
                draw_texture_ex(
                    texture,
                    at.x + dx * scale,
                    at.y + dy * scale,
                    Color::new(1.0, 1.0, 1.0, alpha * fade),
                    DrawTextureParams {
                        dest_size: Some(texture.size() * scale),
                        ..Default::default()
                    },
                );
            }
        }
    }
}

impl Render for PaletteEntry {
    fn render(&self, at: Vec2, scale: f32, textures: &Textures) {
        self.prototype().render(at, scale, textures);
    }
}

fn draw_button(rect: Rect, label: &str, active: bool) {
    let bg = if active { BUTTON_ACTIVE } else { BUTTON };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    let dims = measure_text(label, None, 18, 1.0);
    draw_text(
        label,
        rect.x + (rect.w - dims.width) / 2.0,
        rect.y + (rect.h + dims.offset_y) / 2.0,
        18.0,
        WHITE,
    );
}

fn outline(rect: Rect, thickness: f32, color: Color) {
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, color);
}

fn draw_panel(rect: Rect) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, PANEL);
}

pub(crate) fn draw(editor: &Editor, textures: &Textures, show_grid: bool) {
    clear_background(BACKDROP);
    draw_map(editor, textures, show_grid);
    draw_rulers(editor);
    draw_mode_bar(editor);
    draw_layers(editor, textures);
    draw_properties(editor);
    draw_palette(editor, textures);
    draw_hover(editor);
}

fn draw_map(editor: &Editor, textures: &Textures, show_grid: bool) {
    let viewport = editor.viewport();
    let grid = editor.grid();
    let dims = grid.dimensions();
    let area = viewport.screen_rect();
    let metadata = editor.metadata();

    draw_rectangle(area.x, area.y, area.w, area.h, metadata.background_color().with_alpha(1.0));
    if let Some(key) = metadata.background_key()
        && let Some(texture) = textures.get(&key)
    {
        draw_texture_ex(
            texture,
            area.x,
            area.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(area.size()),
                ..Default::default()
            },
        );
    }

    let (rows, columns) = viewport.visible_range(dims);
    for (index, layer) in grid.layers().iter().enumerate() {
        if !layer.is_visible() {
            continue;
        }
        for row in rows.clone() {
            for column in columns.clone() {
                let pos = Position::new(row, column);
                let (Some(at), Some(cell)) = (
                    viewport.cell_to_screen(pos, dims),
                    grid.at(CellRef::new(index, pos)),
                ) else {
                    continue;
                };
                cell.render(at, 1.0, textures);
                if cell.is_selected() {
                    outline(Rect::new(at.x, at.y, CELL_SIZE, CELL_SIZE), 2.0, SELECTION);
                }
            }
        }
    }

    if show_grid {
        for i in 0..=viewport.visible_rows() {
            let y = area.y + i as f32 * CELL_SIZE;
            draw_line(area.x, y, area.right(), y, 1.0, GRID_LINE);
        }
        for i in 0..=viewport.visible_columns() {
            let x = area.x + i as f32 * CELL_SIZE;
            draw_line(x, area.y, x, area.bottom(), 1.0, GRID_LINE);
        }
    }
    outline(area, 2.0, GRAY);
}

fn draw_rulers(editor: &Editor) {
    let viewport = editor.viewport();
    let area = viewport.screen_rect();
    let (rows, columns) = viewport.visible_range(editor.grid().dimensions());
    for (i, row) in rows.enumerate() {
        let y = area.y + i as f32 * CELL_SIZE + CELL_SIZE / 2.0 + 5.0;
        draw_text(&row.to_string(), area.x - 22.0, y, 14.0, LIGHTGRAY);
    }
    for (i, column) in columns.enumerate() {
        let x = area.x + i as f32 * CELL_SIZE + 6.0;
        draw_text(&column.to_string(), x, area.y - 8.0, 14.0, LIGHTGRAY);
    }
}

fn draw_mode_bar(editor: &Editor) {
    let layout = editor.layout();
    for (i, mode) in InsertionMode::all().into_iter().enumerate() {
        let label = format!("[{}] {}", mode.key(), mode.name());
        draw_button(layout.mode_button(i), &label, editor.mode() == mode);
    }
}

fn draw_layers(editor: &Editor, textures: &Textures) {
    let layout = editor.layout();
    let grid = editor.grid();
    let dims = grid.dimensions();
    let count = grid.layer_count();
    let (rows, columns) = editor.viewport().visible_range(dims);
    let scale = PREVIEW_SCALE / CELL_SIZE;
    draw_panel(layout.layers);

    for (index, layer) in grid.layers().iter().enumerate() {
        let preview = layout.layer_preview(index, count);
        draw_rectangle(preview.x, preview.y, preview.w, preview.h, DARKGRAY);
        for (r, row) in rows.clone().enumerate() {
            for (c, column) in columns.clone().enumerate() {
                let pos = Position::new(row, column);
                if let Some(cell) = grid.at(CellRef::new(index, pos))
                    && !cell.is_blank()
                {
                    let at = preview.point() + vec2(c as f32, r as f32) * PREVIEW_SCALE;
                    cell.render(at, scale, textures);
                }
            }
        }
        let border = if index == editor.current_layer() { ARMED } else { GRAY };
        outline(preview, 2.0, border);

        let toggle = layout.layer_toggle(index, count);
        outline(toggle, 2.0, LIGHTGRAY);
        if layer.is_visible() {
            draw_rectangle(toggle.x + 5.0, toggle.y + 5.0, toggle.w - 10.0, toggle.h - 10.0, LIGHTGRAY);
        }
        draw_text(&(index + 1).to_string(), toggle.x + 6.0, toggle.y - 4.0, 14.0, WHITE);
    }
}

fn property_value(editor: &Editor, row: usize) -> String {
    let metadata = editor.metadata();
    let (rows, columns) = editor.grid().dimensions();
    match row {
        0 => rows.to_string(),
        1 => columns.to_string(),
        2 => match metadata.background_texture_id() {
            0 => "none".to_string(),
            id => id.to_string(),
        },
        3 => metadata.music_id().to_string(),
        4 => format!("{}s", metadata.time_to_finish()),
        5 => metadata.background_color().to_hex(),
        6 => editor.brush().color().0.to_hex(),
        _ => format!("{:.0}%", editor.brush().color().1 * 100.0),
    }
}

/// Color shown next to a property row, if it has one.
fn property_swatch(editor: &Editor, row: usize) -> Option<Color> {
    match row {
        5 => Some(editor.metadata().background_color().with_alpha(1.0)),
        6 | 7 => {
            let (color, alpha) = editor.brush().color();
            Some(color.with_alpha(alpha))
        }
        _ => None,
    }
}

fn draw_properties(editor: &Editor) {
    let layout = editor.layout();
    draw_panel(layout.properties);
    for (row, (label, _)) in PROPERTIES.iter().enumerate() {
        let at = layout.property_label(row);
        let text = format!("{label}: {}", property_value(editor, row));
        draw_text(&text, at.x, at.y, 20.0, WHITE);
        let (minus, plus) = layout.property_buttons(row);
        if let Some(color) = property_swatch(editor, row) {
            let swatch = Rect::new(minus.x - minus.w - 8.0, minus.y, minus.w, minus.h);
            draw_rectangle(swatch.x, swatch.y, swatch.w, swatch.h, color);
            outline(swatch, 1.0, GRAY);
        }
        draw_button(minus, "-", false);
        draw_button(plus, "+", false);
    }
}

fn draw_entries(palettes: &Palettes, id: CatalogId, textures: &Textures) {
    for (index, entry) in palettes.catalog(id).visible() {
        entry.render(entry.rect().point(), 1.0, textures);
        if palettes.is_armed(EntryRef::new(id, index)) {
            outline(entry.rect(), 2.0, ARMED);
        }
    }
}

fn draw_palette(editor: &Editor, textures: &Textures) {
    let layout = editor.layout();
    draw_panel(layout.palette);
    let origin = layout.palette_origin();
    let mode = editor.mode();

    if mode == InsertionMode::MarqueeSelect {
        let help = ["Click or drag to select", "Del: erase", "F: fill", "Esc: deselect"];
        for (i, line) in help.iter().enumerate() {
            draw_text(line, origin.x, origin.y + i as f32 * 24.0, 20.0, WHITE);
        }
        return;
    }

    let Some(palettes) = editor.palettes() else {
        draw_text("Loading textures...", origin.x, origin.y + 16.0, 20.0, WHITE);
        return;
    };

    match mode {
        InsertionMode::PaintTile => {
            let brush = editor.brush();
            let colored = brush.painting == TilePainting::Colored;
            let painting = if colored { "Colored" } else { "Textured" };
            let visible = if brush.visible { "Visible" } else { "Hidden" };
            draw_button(layout.brush_button(0), painting, colored);
            draw_button(layout.brush_button(1), brush.collision.name(), false);
            draw_button(layout.brush_button(2), visible, !brush.visible);
            if colored {
                let swatch = layout.brush_button(0);
                brush
                    .color_cell()
                    .render(vec2(swatch.right() - 22.0, swatch.y + 5.0), 0.5, textures);
            }
            for (slot, id) in [CatalogId::Terrain, CatalogId::Pipes].into_iter().enumerate() {
                let (prev, next) = layout.page_buttons(slot);
                draw_button(prev, "<", false);
                draw_button(next, ">", false);
                let label = palettes.catalog(id).page_label();
                draw_text(&label, prev.right() + 8.0, prev.y + 18.0, 18.0, WHITE);
                draw_entries(palettes, id, textures);
            }
        }
        InsertionMode::PlacePlayerStart => {
            palettes.player_start().render(origin, 1.0, textures);
        }
        mode => {
            for &id in mode.catalogs() {
                draw_entries(palettes, id, textures);
            }
        }
    }
}

fn draw_hover(editor: &Editor) {
    let (mx, my) = mouse_position();
    let Some(pos) = editor.cell_at(vec2(mx, my)) else {
        return;
    };
    let dims = editor.grid().dimensions();
    if let Some(at) = editor.viewport().cell_to_screen(pos, dims) {
        outline(Rect::new(at.x, at.y, CELL_SIZE, CELL_SIZE), 1.0, WHITE);
    }
    let text = format!("row {} column {}", pos.row, pos.column);
    let area = editor.viewport().screen_rect();
    draw_text(&text, area.x, area.bottom() + 60.0, 18.0, LIGHTGRAY);
    if let Some(start) = editor.player_start()
        && start.pos == pos
        && editor
            .grid()
            .at(start)
            .is_some_and(|c| c.kind() == CellKind::PlayerStart)
    {
        draw_text("player start", area.x + 200.0, area.bottom() + 60.0, 18.0, LIGHTGRAY);
    }
}
