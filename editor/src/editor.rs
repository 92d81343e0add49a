use std::mem;

use macroquad::math::Vec2;

use crate::cell::{Cell, CellKind, CollisionType, Rgb, Visual};
use crate::grid::{Grid, GridBounds};
use crate::input::{ButtonState, FrameInput};
use crate::layout::Layout;
use crate::metadata::LevelMetadata;
use crate::palette::{CatalogId, EntryRef, Palettes};
use crate::position::{CellRef, Position};
use crate::resources::ResourceProvider;
use crate::viewport::Viewport;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsertionMode {
    PaintTile,
    PaintBlock,
    PaintItem,
    PaintEnemy,
    PlacePlayerStart,
    MarqueeSelect,
}

impl InsertionMode {
    pub fn all() -> [InsertionMode; 6] {
        [
            InsertionMode::PaintTile,
            InsertionMode::PaintBlock,
            InsertionMode::PaintItem,
            InsertionMode::PaintEnemy,
            InsertionMode::PlacePlayerStart,
            InsertionMode::MarqueeSelect,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            InsertionMode::PaintTile => "Tiles",
            InsertionMode::PaintBlock => "Blocks",
            InsertionMode::PaintItem => "Items",
            InsertionMode::PaintEnemy => "Enemies",
            InsertionMode::PlacePlayerStart => "Player",
            InsertionMode::MarqueeSelect => "Select",
        }
    }

    pub fn key(self) -> char {
        match self {
            InsertionMode::PaintTile => '1',
            InsertionMode::PaintBlock => '2',
            InsertionMode::PaintItem => '3',
            InsertionMode::PaintEnemy => '4',
            InsertionMode::PlacePlayerStart => '5',
            InsertionMode::MarqueeSelect => '6',
        }
    }

    /// Catalogs whose entries this mode can arm.
    pub fn catalogs(self) -> &'static [CatalogId] {
        match self {
            InsertionMode::PaintTile => &[CatalogId::Terrain, CatalogId::Pipes],
            InsertionMode::PaintBlock => &[CatalogId::Blocks],
            InsertionMode::PaintItem => &[CatalogId::Items],
            InsertionMode::PaintEnemy => &[CatalogId::Enemies],
            InsertionMode::PlacePlayerStart | InsertionMode::MarqueeSelect => &[],
        }
    }

    pub fn is_paint(self) -> bool {
        !self.catalogs().is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilePainting {
    Textured,
    Colored,
}

/// Settings applied when painting in tile mode.
#[derive(Clone, Debug)]
pub struct TileBrush {
    pub painting: TilePainting,
    pub collision: CollisionType,
    pub visible: bool,
    color: Cell,
}

impl Default for TileBrush {
    fn default() -> Self {
        Self {
            painting: TilePainting::Textured,
            collision: CollisionType::Solid,
            visible: true,
            color: Cell::colored(Rgb::BLACK, 1.0),
        }
    }
}

impl TileBrush {
    pub fn color_cell(&self) -> &Cell {
        &self.color
    }

    /// Color and alpha used by colored painting.
    pub fn color(&self) -> (Rgb, f32) {
        match self.color.visual() {
            Visual::Color { color, alpha } => (*color, *alpha),
            Visual::Texture { alpha, .. } => (Rgb::BLACK, *alpha),
        }
    }

    pub fn set_color(&mut self, color: Rgb, alpha: f32) {
        self.color.set_color(color, alpha);
    }

    pub fn adjust_color(&mut self, delta: i32) {
        let (color, alpha) = self.color();
        self.set_color(color.step_preset(delta), alpha);
    }

    /// Steps alpha in tenths, never below one tenth.
    pub fn adjust_alpha(&mut self, delta: i32) {
        let (color, alpha) = self.color();
        let tenths = ((alpha * 10.0).round() as i32).saturating_add(delta).clamp(1, 10);
        self.set_color(color, tenths as f32 / 10.0);
    }
}

/// A discrete editing action from the keyboard or a toolbar button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    SetMode(InsertionMode),
    SelectLayer(usize),
    ToggleLayer(usize),
    AdjustRows(i32),
    AdjustColumns(i32),
    AdjustBackground(i32),
    AdjustBackgroundColor(i32),
    AdjustMusic(i32),
    AdjustTimeToFinish(i32),
    TogglePainting,
    CycleCollision,
    ToggleBrushVisible,
    AdjustBrushColor(i32),
    AdjustBrushAlpha(i32),
    TurnPage(CatalogId, i32),
    DeleteSelection,
    ClearSelection,
    FillSelection,
    // Handled by the app shell.
    ToggleGrid,
    Save,
}

pub struct Editor {
    grid: Grid,
    metadata: LevelMetadata,
    layout: Layout,
    viewport: Viewport,
    palettes: Option<Palettes>,
    mode: InsertionMode,
    last_paint_mode: InsertionMode,
    brush: TileBrush,
    current_layer: usize,
    selection: Vec<CellRef>,
    player_start: Option<CellRef>,
    last_cell: Option<Position>,
}

impl Editor {
    pub fn new(metadata: LevelMetadata) -> Self {
        let (rows, columns) = metadata.dimensions();
        let grid = Grid::new(rows, columns, GridBounds::default());
        Self::from_level(metadata, grid)
    }

    /// Wraps a loaded level. The first player-start marker found is kept and
    /// any others are blanked.
    pub fn from_level(mut metadata: LevelMetadata, mut grid: Grid) -> Self {
        let bounds = grid.bounds();
        metadata.set_rows(grid.rows(), &bounds);
        metadata.set_columns(grid.columns(), &bounds);

        let markers: Vec<CellRef> = (0..grid.layer_count())
            .flat_map(|layer| {
                grid.entries(layer)
                    .filter(|(_, cell)| cell.kind() == CellKind::PlayerStart)
                    .map(move |(pos, _)| CellRef::new(layer, pos))
                    .collect::<Vec<_>>()
            })
            .collect();
        for extra in markers.iter().skip(1) {
            log::warn!("dropping extra player start at {extra:?}");
            if let Some(cell) = grid.at_mut(*extra) {
                cell.reset();
            }
        }

        let layout = Layout::new(bounds.min_rows, bounds.min_columns);
        let viewport = Viewport::new(
            layout.grid_origin(),
            bounds.min_rows,
            bounds.min_columns,
            grid.dimensions(),
        );
        Self {
            grid,
            metadata,
            layout,
            viewport,
            palettes: None,
            mode: InsertionMode::PaintTile,
            last_paint_mode: InsertionMode::PaintTile,
            brush: TileBrush::default(),
            current_layer: 0,
            selection: Vec::new(),
            player_start: markers.first().copied(),
            last_cell: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn metadata(&self) -> &LevelMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut LevelMetadata {
        &mut self.metadata
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palettes(&self) -> Option<&Palettes> {
        self.palettes.as_ref()
    }

    pub fn mode(&self) -> InsertionMode {
        self.mode
    }

    pub fn brush(&self) -> &TileBrush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut TileBrush {
        &mut self.brush
    }

    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    pub fn selection(&self) -> &[CellRef] {
        &self.selection
    }

    pub fn player_start(&self) -> Option<CellRef> {
        self.player_start
    }

    /// Runs one frame: builds palettes once resources are ready, applies
    /// commands, handles the pointer, scrolls, then follows any requested
    /// grid resize.
    pub fn input_and_update(&mut self, input: &FrameInput, resources: &impl ResourceProvider) {
        if self.palettes.is_none() {
            self.palettes = Palettes::build(resources, self.layout.palette_origin());
        }

        for &command in &input.commands {
            self.apply(command);
        }

        match input.button {
            ButtonState::Pressed => self.press(input.pointer),
            ButtonState::Held => self.drag(input.pointer),
            ButtonState::Released | ButtonState::Up => self.release(),
        }

        let (rows, columns) = input.scroll;
        if rows != 0 || columns != 0 {
            self.scroll(rows, columns);
        }

        self.sync_dimensions();
    }

    pub fn apply(&mut self, command: Command) {
        let bounds = self.grid.bounds();
        match command {
            Command::SetMode(mode) => self.set_mode(mode),
            Command::SelectLayer(layer) => self.select_layer(layer),
            Command::ToggleLayer(layer) => self.toggle_layer(layer),
            Command::AdjustRows(delta) => {
                let (rows, _) = self.metadata.dimensions();
                self.metadata.set_rows(rows.saturating_add_signed(delta as isize), &bounds);
            }
            Command::AdjustColumns(delta) => {
                let (_, columns) = self.metadata.dimensions();
                self.metadata
                    .set_columns(columns.saturating_add_signed(delta as isize), &bounds);
            }
            Command::AdjustBackground(delta) => self.metadata.adjust_background_texture_id(delta),
            Command::AdjustBackgroundColor(delta) => self.metadata.adjust_background_color(delta),
            Command::AdjustMusic(delta) => self.metadata.adjust_music_id(delta),
            Command::AdjustTimeToFinish(delta) => self.metadata.adjust_time_to_finish(delta),
            Command::TogglePainting => {
                self.brush.painting = match self.brush.painting {
                    TilePainting::Textured => TilePainting::Colored,
                    TilePainting::Colored => TilePainting::Textured,
                };
            }
            Command::CycleCollision => self.brush.collision = self.brush.collision.next(),
            Command::ToggleBrushVisible => self.brush.visible = !self.brush.visible,
            Command::AdjustBrushColor(delta) => self.brush.adjust_color(delta),
            Command::AdjustBrushAlpha(delta) => self.brush.adjust_alpha(delta),
            Command::TurnPage(catalog, delta) => {
                if let Some(palettes) = &mut self.palettes {
                    palettes.catalog_mut(catalog).turn_page(delta);
                }
            }
            Command::DeleteSelection => self.delete_selection(),
            Command::ClearSelection => self.clear_selection(),
            Command::FillSelection => self.fill_selection(),
            Command::ToggleGrid | Command::Save => {}
        }
    }

    pub fn set_mode(&mut self, mode: InsertionMode) {
        if mode != self.mode {
            self.clear_selection();
            self.last_cell = None;
        }
        self.mode = mode;
        if mode.is_paint() {
            self.last_paint_mode = mode;
        }
    }

    pub fn select_layer(&mut self, layer: usize) {
        if layer < self.grid.layer_count() {
            self.current_layer = layer;
        }
    }

    pub fn toggle_layer(&mut self, layer: usize) {
        if let Some(layer) = self.grid.layer_mut(layer) {
            layer.set_visible(!layer.is_visible());
        }
    }

    pub fn arm(&mut self, entry: EntryRef) -> bool {
        self.palettes.as_mut().is_some_and(|p| p.arm(entry))
    }

    pub fn scroll(&mut self, delta_rows: i32, delta_columns: i32) {
        self.viewport
            .scroll(delta_rows, delta_columns, self.grid.dimensions());
    }

    pub fn cell_at(&self, point: Vec2) -> Option<Position> {
        self.viewport.screen_to_cell(point, self.grid.dimensions())
    }

    fn press(&mut self, point: Vec2) {
        let Some(pos) = self.cell_at(point) else {
            self.pick_palette(point);
            return;
        };
        self.last_cell = Some(pos);
        if self.mode == InsertionMode::PlacePlayerStart {
            self.place_player_start(pos);
        } else {
            self.stroke(pos);
        }
    }

    fn drag(&mut self, point: Vec2) {
        match self.cell_at(point) {
            Some(pos) if self.last_cell != Some(pos) => {
                self.last_cell = Some(pos);
                self.stroke(pos);
            }
            Some(_) => {}
            None => self.pick_palette(point),
        }
    }

    fn release(&mut self) {
        self.last_cell = None;
    }

    fn pick_palette(&mut self, point: Vec2) {
        let catalogs = self.mode.catalogs();
        if let Some(palettes) = &mut self.palettes
            && let Some(entry) = palettes.entry_at(catalogs, point)
        {
            palettes.arm(entry);
        }
    }

    fn stroke(&mut self, pos: Position) {
        let target = CellRef::new(self.current_layer, pos);
        match self.mode {
            InsertionMode::MarqueeSelect => self.select(target),
            InsertionMode::PlacePlayerStart => {}
            mode => {
                self.paint(mode, target);
            }
        }
    }

    /// Overwrites `target` with the current prototype of `mode`. Does
    /// nothing if the mode has no prototype yet.
    fn paint(&mut self, mode: InsertionMode, target: CellRef) -> bool {
        let armed = |id| self.palettes.as_ref().and_then(|p| p.armed_prototype(id));
        let (prototype, collision, visible) = match mode {
            InsertionMode::PaintTile => {
                let prototype = match self.brush.painting {
                    TilePainting::Textured => armed(CatalogId::Terrain),
                    TilePainting::Colored => Some(&self.brush.color),
                };
                (prototype, self.brush.collision, self.brush.visible)
            }
            InsertionMode::PaintBlock => (armed(CatalogId::Blocks), CollisionType::Solid, true),
            InsertionMode::PaintItem => (armed(CatalogId::Items), CollisionType::Solid, true),
            InsertionMode::PaintEnemy => (armed(CatalogId::Enemies), CollisionType::Solid, true),
            InsertionMode::PlacePlayerStart | InsertionMode::MarqueeSelect => return false,
        };
        let (Some(prototype), Some(cell)) = (prototype, self.grid.at_mut(target)) else {
            return false;
        };
        cell.copy_from(prototype, collision, visible);
        if self.player_start == Some(target) {
            self.player_start = None;
        }
        true
    }

    fn place_player_start(&mut self, pos: Position) {
        let Some(palettes) = &self.palettes else {
            return;
        };
        let target = CellRef::new(self.current_layer, pos);
        if let Some(previous) = self.player_start.take()
            && let Some(cell) = self.grid.at_mut(previous)
        {
            cell.reset();
        }
        if let Some(cell) = self.grid.at_mut(target) {
            cell.copy_from(palettes.player_start(), CollisionType::Solid, true);
            self.player_start = Some(target);
        }
    }

    fn select(&mut self, target: CellRef) {
        if let Some(cell) = self.grid.at_mut(target)
            && !cell.is_selected()
        {
            cell.set_selected(true);
            self.selection.push(target);
        }
    }

    /// Blanks every selected cell and empties the selection.
    pub fn delete_selection(&mut self) {
        for target in self.selection.drain(..) {
            if let Some(cell) = self.grid.at_mut(target) {
                cell.reset();
            }
            if self.player_start == Some(target) {
                self.player_start = None;
            }
        }
    }

    /// Empties the selection without touching cell content.
    pub fn clear_selection(&mut self) {
        for target in self.selection.drain(..) {
            if let Some(cell) = self.grid.at_mut(target) {
                cell.set_selected(false);
            }
        }
    }

    /// Paints every selected cell with the most recently used paint mode.
    pub fn fill_selection(&mut self) {
        let targets = mem::take(&mut self.selection);
        for &target in &targets {
            if let Some(cell) = self.grid.at_mut(target) {
                cell.set_selected(false);
            }
            self.paint(self.last_paint_mode, target);
        }
    }

    /// Resizes the grid if the metadata asks for different dimensions.
    pub fn sync_dimensions(&mut self) -> bool {
        let old = self.grid.dimensions();
        let new = self.metadata.dimensions();
        if old == new {
            return false;
        }
        self.clear_selection();
        self.grid.resize(new.0, new.1);
        self.player_start = self
            .player_start
            .and_then(|r| Grid::relocate(r.pos, old, new).map(|pos| CellRef::new(r.layer, pos)));
        self.viewport.follow_resize(old, new);
        self.last_cell = None;
        true
    }
}
