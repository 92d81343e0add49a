use std::ops::Range;

use macroquad::math::{Rect, Vec2, vec2};

use crate::cell::{CELL_SIZE, Cell, CellKind};
use crate::resources::ResourceProvider;

pub const TERRAIN_PAGES: usize = 4;
pub const TERRAIN_PAGE_SIZE: usize = 18;
pub const PIPE_COLORS: [&str; 9] = [
    "blue", "darkgray", "gray", "green", "orange", "pink", "purple", "red", "yellow",
];
pub const PIPE_PAGE_SIZE: usize = 6;
pub const BLOCK_COUNT: usize = 15;
pub const ITEM_KEYS: [&str; 2] = ["coin", "yoshiCoin"];
pub const ENEMY_KEYS: [&str; 17] = [
    "goombaL",
    "flyingGoombaL",
    "redKoopaTroopaL",
    "greenKoopaTroopaL",
    "blueKoopaTroopaL",
    "yellowKoopaTroopaL",
    "rexL",
    "montyMoleL",
    "bobOmbL",
    "bulletBillL",
    "buzzyBeetleL",
    "mummyBeetleL",
    "swooperL",
    "banzaiBillL",
    "muncher",
    "piranhaPlant",
    "jumpingPiranhaPlant",
];
pub const PLAYER_START_KEY: &str = "marioR";

const BLOCK_COLUMNS: [Range<usize>; 3] = [0..5, 5..9, 9..15];
const ENEMY_COLUMNS: [Range<usize>; 5] = [0..2, 2..6, 6..13, 13..14, 14..17];
const ENTRY_SPACING: f32 = 4.0;
const COLUMN_SPACING: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogId {
    Terrain,
    Pipes,
    Blocks,
    Items,
    Enemies,
}

impl CatalogId {
    pub fn all() -> [CatalogId; 5] {
        [
            CatalogId::Terrain,
            CatalogId::Pipes,
            CatalogId::Blocks,
            CatalogId::Items,
            CatalogId::Enemies,
        ]
    }

    // Terrain and pipes both paint tiles, so they share an armed slot.
    fn slot(self) -> usize {
        match self {
            CatalogId::Terrain | CatalogId::Pipes => 0,
            CatalogId::Blocks => 1,
            CatalogId::Items => 2,
            CatalogId::Enemies => 3,
        }
    }
}

/// Stable handle to a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryRef {
    pub catalog: CatalogId,
    pub index: usize,
}

impl EntryRef {
    pub fn new(catalog: CatalogId, index: usize) -> Self {
        Self { catalog, index }
    }
}

#[derive(Clone, Debug)]
pub struct PaletteEntry {
    rect: Rect,
    prototype: Cell,
}

impl PaletteEntry {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn prototype(&self) -> &Cell {
        &self.prototype
    }
}

#[derive(Clone, Debug)]
pub struct Catalog {
    id: CatalogId,
    entries: Vec<PaletteEntry>,
    page_size: Option<usize>,
    page: usize,
}

impl Catalog {
    fn new(id: CatalogId, entries: Vec<PaletteEntry>) -> Self {
        Self {
            id,
            entries,
            page_size: None,
            page: 0,
        }
    }

    fn paged(id: CatalogId, entries: Vec<PaletteEntry>, page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
            ..Self::new(id, entries)
        }
    }

    pub fn id(&self) -> CatalogId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        match self.page_size {
            Some(size) => self.entries.len().div_ceil(size).max(1),
            None => 1,
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn turn_page(&mut self, delta: i32) {
        self.set_page(self.page.saturating_add_signed(delta as isize));
    }

    pub fn page_label(&self) -> String {
        match self.id {
            CatalogId::Pipes => PIPE_COLORS.get(self.page).unwrap_or(&"").to_string(),
            _ => format!("page {}", self.page + 1),
        }
    }

    /// Indices of the entries on the current page.
    pub fn visible_range(&self) -> Range<usize> {
        match self.page_size {
            Some(size) => {
                let start = (self.page * size).min(self.entries.len());
                start..(start + size).min(self.entries.len())
            }
            None => 0..self.entries.len(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, &PaletteEntry)> {
        let range = self.visible_range();
        self.entries[range.clone()]
            .iter()
            .enumerate()
            .map(move |(i, entry)| (range.start + i, entry))
    }

    pub fn entry_at(&self, point: Vec2) -> Option<usize> {
        self.visible()
            .find(|(_, entry)| entry.rect.contains(point))
            .map(|(i, _)| i)
    }
}

/// Every catalog plus the armed entry of each paint slot.
#[derive(Clone, Debug)]
pub struct Palettes {
    terrain: Catalog,
    pipes: Catalog,
    blocks: Catalog,
    items: Catalog,
    enemies: Catalog,
    player_start: Cell,
    armed: [Option<EntryRef>; 4],
}

impl Palettes {
    /// Builds every catalog below `origin`, or `None` while the provider is
    /// still loading. The first entry of each slot starts armed.
    pub fn build(provider: &impl ResourceProvider, origin: Vec2) -> Option<Self> {
        if !provider.is_ready() {
            return None;
        }
        let mut palettes = Self {
            terrain: terrain_catalog(provider, origin),
            pipes: pipe_catalog(provider, origin),
            blocks: block_catalog(provider, origin),
            items: item_catalog(provider, origin),
            enemies: enemy_catalog(provider, origin),
            player_start: Cell::textured(PLAYER_START_KEY, CellKind::PlayerStart).with_draw_offset(0.0, -8.0),
            armed: [None; 4],
        };
        for id in [CatalogId::Terrain, CatalogId::Blocks, CatalogId::Items, CatalogId::Enemies] {
            palettes.arm(EntryRef::new(id, 0));
        }
        log::info!("built palettes from loaded textures");
        Some(palettes)
    }

    pub fn catalog(&self, id: CatalogId) -> &Catalog {
        match id {
            CatalogId::Terrain => &self.terrain,
            CatalogId::Pipes => &self.pipes,
            CatalogId::Blocks => &self.blocks,
            CatalogId::Items => &self.items,
            CatalogId::Enemies => &self.enemies,
        }
    }

    pub fn catalog_mut(&mut self, id: CatalogId) -> &mut Catalog {
        match id {
            CatalogId::Terrain => &mut self.terrain,
            CatalogId::Pipes => &mut self.pipes,
            CatalogId::Blocks => &mut self.blocks,
            CatalogId::Items => &mut self.items,
            CatalogId::Enemies => &mut self.enemies,
        }
    }

    /// Arms `entry`, unarming whatever its slot held before.
    pub fn arm(&mut self, entry: EntryRef) -> bool {
        if self.catalog(entry.catalog).get(entry.index).is_none() {
            return false;
        }
        self.armed[entry.catalog.slot()] = Some(entry);
        true
    }

    /// The entry armed in the slot `id` paints through.
    pub fn armed(&self, id: CatalogId) -> Option<EntryRef> {
        self.armed[id.slot()]
    }

    pub fn is_armed(&self, entry: EntryRef) -> bool {
        self.armed(entry.catalog) == Some(entry)
    }

    pub fn prototype(&self, entry: EntryRef) -> Option<&Cell> {
        self.catalog(entry.catalog).get(entry.index).map(PaletteEntry::prototype)
    }

    pub fn armed_prototype(&self, id: CatalogId) -> Option<&Cell> {
        self.prototype(self.armed(id)?)
    }

    pub fn player_start(&self) -> &Cell {
        &self.player_start
    }

    /// First visible entry under `point` among `catalogs`.
    pub fn entry_at(&self, catalogs: &[CatalogId], point: Vec2) -> Option<EntryRef> {
        catalogs.iter().find_map(|&id| {
            self.catalog(id)
                .entry_at(point)
                .map(|index| EntryRef::new(id, index))
        })
    }
}

/// Every texture key a palette can refer to.
pub fn texture_keys() -> Vec<String> {
    let mut keys = terrain_keys();
    keys.extend(pipe_keys());
    keys.extend(block_keys());
    keys.extend(ITEM_KEYS.iter().map(|k| k.to_string()));
    keys.extend(ENEMY_KEYS.iter().map(|k| k.to_string()));
    keys.push(PLAYER_START_KEY.to_string());
    keys
}

fn terrain_keys() -> Vec<String> {
    (1..=TERRAIN_PAGES)
        .flat_map(|page| (b'A'..b'A' + TERRAIN_PAGE_SIZE as u8).map(move |c| format!("{}{page}", c as char)))
        .collect()
}

fn pipe_keys() -> Vec<String> {
    PIPE_COLORS
        .iter()
        .flat_map(|color| {
            (0..4)
                .map(move |i| format!("pipe_{color}{i}"))
                .chain((0..2).map(move |i| format!("sm_pipe_{color}{i}")))
        })
        .collect()
}

fn block_keys() -> Vec<String> {
    (0..BLOCK_COUNT).map(|i| format!("block{i}")).collect()
}

fn size_of(provider: &impl ResourceProvider, key: &str) -> Vec2 {
    provider
        .texture_size(key)
        .unwrap_or(vec2(CELL_SIZE, CELL_SIZE))
}

fn entry(rect: Rect, key: &str, kind: CellKind) -> PaletteEntry {
    PaletteEntry {
        rect,
        prototype: Cell::textured(key, kind),
    }
}

/// Stacks `keys` downwards from `top_left`, centering each within `width`
/// when given.
fn column(
    provider: &impl ResourceProvider,
    keys: &[String],
    top_left: Vec2,
    width: Option<f32>,
    kind: CellKind,
) -> Vec<PaletteEntry> {
    let mut y = top_left.y;
    keys.iter()
        .map(|key| {
            let size = size_of(provider, key);
            let x = top_left.x + width.map_or(0.0, |w| (w - size.x) / 2.0);
            let e = entry(Rect::new(x, y, size.x, size.y), key, kind);
            y += size.y + ENTRY_SPACING;
            e
        })
        .collect()
}

fn terrain_catalog(provider: &impl ResourceProvider, origin: Vec2) -> Catalog {
    let entries = terrain_keys()
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let slot = i % TERRAIN_PAGE_SIZE;
            let pos = origin
                + vec2(
                    (slot % 2) as f32 * (CELL_SIZE + 5.0),
                    (slot / 2) as f32 * (CELL_SIZE + ENTRY_SPACING),
                );
            let size = size_of(provider, key);
            entry(Rect::new(pos.x, pos.y, size.x, size.y), key, CellKind::Tile)
        })
        .collect();
    Catalog::paged(CatalogId::Terrain, entries, TERRAIN_PAGE_SIZE)
}

fn pipe_catalog(provider: &impl ResourceProvider, origin: Vec2) -> Catalog {
    let top_left = origin + vec2(2.0 * (CELL_SIZE + 5.0) + 20.0, 0.0);
    let entries = pipe_keys()
        .chunks(PIPE_PAGE_SIZE)
        .flat_map(|page| column(provider, page, top_left, None, CellKind::Tile))
        .collect();
    Catalog::paged(CatalogId::Pipes, entries, PIPE_PAGE_SIZE)
}

fn block_catalog(provider: &impl ResourceProvider, origin: Vec2) -> Catalog {
    let keys = block_keys();
    let entries = BLOCK_COLUMNS
        .iter()
        .enumerate()
        .flat_map(|(i, range)| {
            let top_left = origin + vec2(i as f32 * (CELL_SIZE + 20.0), 0.0);
            column(provider, &keys[range.clone()], top_left, None, CellKind::Block)
        })
        .collect();
    Catalog::new(CatalogId::Blocks, entries)
}

fn item_catalog(provider: &impl ResourceProvider, origin: Vec2) -> Catalog {
    let keys: Vec<String> = ITEM_KEYS.iter().map(|k| k.to_string()).collect();
    Catalog::new(CatalogId::Items, column(provider, &keys, origin, None, CellKind::Item))
}

fn enemy_catalog(provider: &impl ResourceProvider, origin: Vec2) -> Catalog {
    let keys: Vec<String> = ENEMY_KEYS.iter().map(|k| k.to_string()).collect();
    let mut x = origin.x;
    let mut entries = Vec::with_capacity(keys.len());
    for range in ENEMY_COLUMNS {
        let group = &keys[range];
        let width = group
            .iter()
            .map(|key| size_of(provider, key).x)
            .fold(0.0, f32::max);
        entries.extend(column(provider, group, vec2(x, origin.y), Some(width), CellKind::Enemy));
        x += width + COLUMN_SPACING;
    }
    Catalog::new(CatalogId::Enemies, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::SizeTable;

    const ORIGIN: Vec2 = Vec2::new(100.0, 200.0);

    fn ready_provider() -> SizeTable {
        let mut provider = SizeTable::new();
        provider.insert("rexL", vec2(40.0, 64.0));
        provider.set_ready(true);
        provider
    }

    fn palettes() -> Palettes {
        Palettes::build(&ready_provider(), ORIGIN).unwrap()
    }

    #[test]
    fn nothing_is_built_before_resources_are_ready() {
        assert!(Palettes::build(&SizeTable::new(), ORIGIN).is_none());
    }

    #[test]
    fn catalog_sizes() {
        let p = palettes();
        assert_eq!(p.catalog(CatalogId::Terrain).len(), 72);
        assert_eq!(p.catalog(CatalogId::Pipes).len(), 54);
        assert_eq!(p.catalog(CatalogId::Blocks).len(), 15);
        assert_eq!(p.catalog(CatalogId::Items).len(), 2);
        assert_eq!(p.catalog(CatalogId::Enemies).len(), 17);
        assert_eq!(p.catalog(CatalogId::Terrain).page_count(), 4);
        assert_eq!(p.catalog(CatalogId::Pipes).page_count(), 9);
        assert_eq!(p.catalog(CatalogId::Blocks).page_count(), 1);
    }

    #[test]
    fn first_entries_start_armed() {
        let p = palettes();
        let tile = p.armed_prototype(CatalogId::Terrain).unwrap();
        assert_eq!(tile.visual().texture_key(), Some("A1"));
        assert_eq!(p.armed(CatalogId::Pipes), Some(EntryRef::new(CatalogId::Terrain, 0)));
        let enemy = p.armed_prototype(CatalogId::Enemies).unwrap();
        assert_eq!(enemy.visual().texture_key(), Some("goombaL"));
        assert_eq!(enemy.kind(), CellKind::Enemy);
        assert_eq!(p.player_start().draw_offset(), (0.0, -8.0));
    }

    #[test]
    fn arming_replaces_previous_entry_in_slot() {
        let mut p = palettes();
        assert!(p.arm(EntryRef::new(CatalogId::Pipes, 7)));
        assert!(!p.is_armed(EntryRef::new(CatalogId::Terrain, 0)));
        assert!(p.is_armed(EntryRef::new(CatalogId::Pipes, 7)));
        let proto = p.armed_prototype(CatalogId::Terrain).unwrap();
        assert_eq!(proto.visual().texture_key(), Some("pipe_darkgray1"));
        assert!(!p.arm(EntryRef::new(CatalogId::Items, 2)));
        assert_eq!(p.armed(CatalogId::Blocks), Some(EntryRef::new(CatalogId::Blocks, 0)));
    }

    #[test]
    fn paging_limits_visible_entries() {
        let mut p = palettes();
        let terrain = p.catalog_mut(CatalogId::Terrain);
        terrain.set_page(2);
        assert_eq!(terrain.visible_range(), 36..54);
        terrain.turn_page(5);
        assert_eq!(terrain.page(), 3);
        terrain.turn_page(-10);
        assert_eq!(terrain.page(), 0);
        assert_eq!(p.catalog(CatalogId::Pipes).page_label(), "blue");
    }

    #[test]
    fn picking_only_sees_current_page() {
        let mut p = palettes();
        let second = ORIGIN + vec2(CELL_SIZE + 5.0 + 1.0, 1.0);
        assert_eq!(
            p.entry_at(&[CatalogId::Terrain, CatalogId::Pipes], second),
            Some(EntryRef::new(CatalogId::Terrain, 1))
        );
        p.catalog_mut(CatalogId::Terrain).set_page(1);
        assert_eq!(
            p.entry_at(&[CatalogId::Terrain], second),
            Some(EntryRef::new(CatalogId::Terrain, 19))
        );
        assert_eq!(p.entry_at(&[CatalogId::Terrain], vec2(0.0, 0.0)), None);
    }

    #[test]
    fn turning_pages_keeps_armed_entry() {
        let mut p = palettes();
        p.arm(EntryRef::new(CatalogId::Terrain, 5));
        p.catalog_mut(CatalogId::Terrain).set_page(3);
        assert_eq!(p.armed(CatalogId::Terrain), Some(EntryRef::new(CatalogId::Terrain, 5)));
    }

    #[test]
    fn enemy_columns_center_on_widest_sprite() {
        let p = palettes();
        let enemies = p.catalog(CatalogId::Enemies);
        let rex = enemies.get(6).unwrap().rect();
        let mole = enemies.get(7).unwrap().rect();
        assert_eq!(rex.w, 40.0);
        assert_eq!(mole.x, rex.x + 4.0);
        assert_eq!(mole.y, rex.bottom() + ENTRY_SPACING);
    }

    #[test]
    fn texture_keys_cover_all_catalogs() {
        let keys = texture_keys();
        assert_eq!(keys.len(), 72 + 54 + 15 + 2 + 17 + 1);
        assert!(keys.contains(&"R4".to_string()));
        assert!(keys.contains(&"sm_pipe_yellow1".to_string()));
        assert!(keys.contains(&"block14".to_string()));
    }
}
