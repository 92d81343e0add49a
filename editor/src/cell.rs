use macroquad::color::Color;
use serde::{Deserialize, Serialize};

/// Side length of one grid unit, in pixels.
pub const CELL_SIZE: f32 = 32.0;

/// How the game treats a cell for collision purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionType {
    Solid,
    SolidFromAbove,
    SolidOnlyForEnemies,
    #[default]
    NonSolid,
}

impl CollisionType {
    pub fn all() -> [CollisionType; 4] {
        [
            CollisionType::Solid,
            CollisionType::SolidFromAbove,
            CollisionType::SolidOnlyForEnemies,
            CollisionType::NonSolid,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            CollisionType::Solid => "solid",
            CollisionType::SolidFromAbove => "solid from above",
            CollisionType::SolidOnlyForEnemies => "solid for enemies",
            CollisionType::NonSolid => "non-solid",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|&c| c == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }
}

/// What a cell represents to the game that loads the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Tile,
    Block,
    Item,
    Enemy,
    PlayerStart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// The preset `delta` steps away from this color, wrapping around.
    /// Colors outside the presets step from the first one.
    pub fn step_preset(self, delta: i32) -> Rgb {
        let n = PRESET_COLORS.len() as i32;
        let i = PRESET_COLORS.iter().position(|&c| c == self).unwrap_or(0) as i32;
        PRESET_COLORS[(i + delta).rem_euclid(n) as usize]
    }

    pub fn with_alpha(self, alpha: f32) -> Color {
        Color::from_rgba(self.r, self.g, self.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
    }
}

/// Colors offered by the background and brush color controls.
pub const PRESET_COLORS: [Rgb; 12] = [
    Rgb::WHITE,
    Rgb::BLACK,
    Rgb::new(128, 128, 128),
    Rgb::new(224, 32, 32),
    Rgb::new(248, 144, 32),
    Rgb::new(248, 216, 40),
    Rgb::new(56, 176, 56),
    Rgb::new(32, 120, 64),
    Rgb::new(96, 184, 248),
    Rgb::new(32, 64, 200),
    Rgb::new(136, 72, 200),
    Rgb::new(144, 88, 40),
];

/// The single renderable a cell resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Color { color: Rgb, alpha: f32 },
    Texture { key: String, alpha: f32 },
}

impl Visual {
    pub fn alpha(&self) -> f32 {
        match self {
            Visual::Color { alpha, .. } | Visual::Texture { alpha, .. } => *alpha,
        }
    }

    pub fn texture_key(&self) -> Option<&str> {
        match self {
            Visual::Texture { key, .. } => Some(key),
            Visual::Color { .. } => None,
        }
    }
}

/// One grid position's paintable content. Its row and column are implied
/// by where it sits in its layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    visual: Visual,
    kind: CellKind,
    collision: CollisionType,
    visible: bool,
    draw_offset: (f32, f32),
    selected: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    pub fn blank() -> Self {
        Self {
            visual: Visual::Color {
                color: Rgb::WHITE,
                alpha: 0.0,
            },
            kind: CellKind::Empty,
            collision: CollisionType::NonSolid,
            visible: true,
            draw_offset: (0.0, 0.0),
            selected: false,
        }
    }

    pub fn textured(key: impl Into<String>, kind: CellKind) -> Self {
        Self {
            visual: Visual::Texture {
                key: key.into(),
                alpha: 1.0,
            },
            kind,
            ..Self::blank()
        }
    }

    pub fn colored(color: Rgb, alpha: f32) -> Self {
        Self {
            visual: Visual::Color {
                color,
                alpha: alpha.clamp(0.0, 1.0),
            },
            kind: CellKind::Tile,
            ..Self::blank()
        }
    }

    pub(crate) fn from_parts(
        visual: Visual,
        kind: CellKind,
        collision: CollisionType,
        visible: bool,
        draw_offset: (f32, f32),
    ) -> Self {
        Self {
            visual,
            kind,
            collision,
            visible,
            draw_offset,
            selected: false,
        }
    }

    pub fn with_draw_offset(mut self, dx: f32, dy: f32) -> Self {
        self.draw_offset = (dx, dy);
        self
    }

    pub fn with_collision(mut self, collision: CollisionType) -> Self {
        self.collision = collision;
        self
    }

    /// Overwrites everything but the selection flag with `prototype`'s
    /// content and the given collision and visibility.
    pub fn copy_from(&mut self, prototype: &Cell, collision: CollisionType, visible: bool) {
        self.visual = prototype.visual.clone();
        self.kind = prototype.kind;
        self.draw_offset = prototype.draw_offset;
        self.collision = collision;
        self.visible = visible;
    }

    pub fn reset(&mut self) {
        *self = Self::blank();
    }

    /// True for untouched content. The selection flag is ignored.
    pub fn is_blank(&self) -> bool {
        let blank = Self::blank();
        self.visual == blank.visual
            && self.kind == blank.kind
            && self.collision == blank.collision
            && self.visible == blank.visible
            && self.draw_offset == blank.draw_offset
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn collision(&self) -> CollisionType {
        self.collision
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draw_offset(&self) -> (f32, f32) {
        self.draw_offset
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_color(&mut self, color: Rgb, alpha: f32) {
        self.visual = Visual::Color {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_overwrites_content_but_keeps_selection() {
        let mut cell = Cell::blank();
        cell.set_selected(true);
        let goomba = Cell::textured("goombaL", CellKind::Enemy).with_draw_offset(0.0, -4.0);
        cell.copy_from(&goomba, CollisionType::Solid, false);

        assert_eq!(cell.visual().texture_key(), Some("goombaL"));
        assert_eq!(cell.kind(), CellKind::Enemy);
        assert_eq!(cell.collision(), CollisionType::Solid);
        assert!(!cell.is_visible());
        assert_eq!(cell.draw_offset(), (0.0, -4.0));
        assert!(cell.is_selected());
    }

    #[test]
    fn reset_returns_to_blank() {
        let mut cell = Cell::colored(Rgb::BLACK, 1.0).with_collision(CollisionType::Solid);
        cell.set_selected(true);
        assert!(!cell.is_blank());
        cell.reset();
        assert!(cell.is_blank());
        assert!(!cell.is_selected());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::new(255, 16, 0).to_hex(), "#ff1000");
        assert_eq!(Rgb::from_hex("#ff1000"), Some(Rgb::new(255, 16, 0)));
        assert_eq!(Rgb::from_hex("ff1000"), None);
        assert_eq!(Rgb::from_hex("#ff10"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("#+f+f+f"), None);
        assert_eq!(Rgb::from_hex("#-10000"), None);
    }

    #[test]
    fn presets_wrap_both_ways() {
        assert_eq!(Rgb::BLACK.step_preset(2), Rgb::new(224, 32, 32));
        assert_eq!(Rgb::WHITE.step_preset(-1), Rgb::new(144, 88, 40));
        assert_eq!(Rgb::WHITE.step_preset(PRESET_COLORS.len() as i32), Rgb::WHITE);
        assert_eq!(Rgb::new(1, 2, 3).step_preset(1), Rgb::BLACK);
    }

    #[test]
    fn collision_cycles_through_all() {
        let mut c = CollisionType::Solid;
        for _ in 0..CollisionType::all().len() {
            c = c.next();
        }
        assert_eq!(c, CollisionType::Solid);
    }
}
