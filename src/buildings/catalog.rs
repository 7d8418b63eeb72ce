use std::borrow::Cow;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of a catalog entry, e.g. `"habitat"`.
///
/// Saved games hold owned keys; the catalog holds static ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingKey(Cow<'static, str>);

impl BuildingKey {
    /// Key backed by a static string.
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BuildingKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl fmt::Display for BuildingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top level of the build menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum BuildingCategory {
    /// Housing, power and logistics.
    Infrastructure,
    /// Extraction and manufacturing.
    Production,
    /// Science buildings.
    Research,
    /// Planetary defense.
    Defense,
}

impl BuildingCategory {
    /// All categories in menu order.
    pub const ALL: [BuildingCategory; 4] = [
        BuildingCategory::Infrastructure,
        BuildingCategory::Production,
        BuildingCategory::Research,
        BuildingCategory::Defense,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            BuildingCategory::Infrastructure => "Infrastructure",
            BuildingCategory::Production => "Production",
            BuildingCategory::Research => "Research",
            BuildingCategory::Defense => "Defense",
        }
    }
}

/// Column/row track counts of a building's block grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridStyle {
    /// Number of columns.
    pub columns: u8,
    /// Number of rows.
    pub rows: u8,
}

impl GridStyle {
    /// `columns × rows` tracks.
    pub const fn new(columns: u8, rows: u8) -> Self {
        Self { columns, rows }
    }
}

/// Palette entry of a decorative block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTone {
    /// Structural body.
    Hull,
    /// Secondary panels.
    Plating,
    /// Windows and domes.
    Glass,
    /// Lit elements.
    Glow,
    /// Highlights and trims.
    Accent,
    /// Recesses and doors.
    Shadow,
}

impl BlockTone {
    /// Render colour.
    pub fn color(self) -> Color {
        match self {
            BlockTone::Hull => Color::srgb(0.62, 0.66, 0.72),
            BlockTone::Plating => Color::srgb(0.42, 0.46, 0.53),
            BlockTone::Glass => Color::srgb(0.45, 0.78, 0.95),
            BlockTone::Glow => Color::srgb(1.0, 0.82, 0.35),
            BlockTone::Accent => Color::srgb(0.92, 0.36, 0.28),
            BlockTone::Shadow => Color::srgb(0.16, 0.18, 0.22),
        }
    }
}

/// One decorative block placed on a building's grid, zero-based from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// First column.
    pub col: u8,
    /// First row.
    pub row: u8,
    /// Columns covered.
    pub col_span: u8,
    /// Rows covered.
    pub row_span: u8,
    /// Palette entry.
    pub tone: BlockTone,
}

impl Block {
    /// A single-cell block.
    pub const fn at(col: u8, row: u8, tone: BlockTone) -> Self {
        Self {
            col,
            row,
            col_span: 1,
            row_span: 1,
            tone,
        }
    }

    /// Same block covering `cols × rows` cells.
    pub const fn span(self, col_span: u8, row_span: u8) -> Self {
        Self {
            col_span,
            row_span,
            ..self
        }
    }

    /// Whether the block lies inside `grid`.
    pub fn fits(&self, grid: GridStyle) -> bool {
        self.col_span > 0
            && self.row_span > 0
            && self.col + self.col_span <= grid.columns
            && self.row + self.row_span <= grid.rows
    }

    /// Block rectangle in a `side × side` square centred on the origin, y up.
    pub fn rect(&self, grid: GridStyle, side: f32) -> Rect {
        let cw = side / grid.columns.max(1) as f32;
        let rh = side / grid.rows.max(1) as f32;
        let left = -side / 2.0 + self.col as f32 * cw;
        let top = side / 2.0 - self.row as f32 * rh;
        Rect::from_corners(
            Vec2::new(left, top),
            Vec2::new(
                left + self.col_span as f32 * cw,
                top - self.row_span as f32 * rh,
            ),
        )
    }
}

/// Static catalog entry.
#[derive(Debug, PartialEq)]
pub struct BuildingDef {
    /// Lookup key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Menu category.
    pub category: BuildingCategory,
    /// Grid the blocks are placed on.
    pub grid: GridStyle,
    /// Blocks in paint order.
    pub blocks: &'static [Block],
    /// Construction time in simulation ticks.
    pub build_ticks: u32,
}

impl BuildingDef {
    /// Owned key for this entry.
    pub fn building_key(&self) -> BuildingKey {
        BuildingKey::from_static(self.key)
    }
}

use BlockTone::{Accent, Glass, Glow, Hull, Plating, Shadow};

/// Every building the player can construct.
pub static CATALOG: &[BuildingDef] = &[
    // ── Infrastructure ──────────────────────────────────────────────
    BuildingDef {
        key: "habitat",
        name: "Habitat Dome",
        category: BuildingCategory::Infrastructure,
        grid: GridStyle::new(4, 4),
        blocks: &[
            Block::at(1, 0, Glass).span(2, 1),
            Block::at(0, 1, Glass).span(4, 2),
            Block::at(0, 3, Hull).span(4, 1),
            Block::at(1, 3, Shadow),
            Block::at(2, 1, Glow),
        ],
        build_ticks: 50,
    },
    BuildingDef {
        key: "solar_array",
        name: "Solar Array",
        category: BuildingCategory::Infrastructure,
        grid: GridStyle::new(3, 3),
        blocks: &[
            Block::at(0, 0, Glass),
            Block::at(2, 0, Glass),
            Block::at(0, 2, Glass),
            Block::at(2, 2, Glass),
            Block::at(1, 0, Plating).span(1, 3),
            Block::at(0, 1, Plating).span(3, 1),
        ],
        build_ticks: 40,
    },
    BuildingDef {
        key: "fusion_reactor",
        name: "Fusion Reactor",
        category: BuildingCategory::Infrastructure,
        grid: GridStyle::new(3, 3),
        blocks: &[
            Block::at(0, 0, Hull).span(3, 3),
            Block::at(1, 1, Glow),
            Block::at(0, 0, Plating),
            Block::at(2, 2, Plating),
        ],
        build_ticks: 120,
    },
    BuildingDef {
        key: "spaceport",
        name: "Spaceport",
        category: BuildingCategory::Infrastructure,
        grid: GridStyle::new(5, 5),
        blocks: &[
            Block::at(0, 1, Plating).span(5, 3),
            Block::at(1, 2, Shadow).span(3, 1),
            Block::at(2, 0, Hull).span(1, 2),
            Block::at(2, 0, Accent),
            Block::at(0, 4, Glow),
            Block::at(4, 4, Glow),
        ],
        build_ticks: 150,
    },
    // ── Production ──────────────────────────────────────────────────
    BuildingDef {
        key: "metal_mine",
        name: "Metal Extractor",
        category: BuildingCategory::Production,
        grid: GridStyle::new(3, 4),
        blocks: &[
            Block::at(1, 0, Hull).span(1, 3),
            Block::at(0, 3, Plating).span(3, 1),
            Block::at(1, 3, Shadow),
            Block::at(0, 1, Accent),
        ],
        build_ticks: 60,
    },
    BuildingDef {
        key: "refinery",
        name: "Refinery",
        category: BuildingCategory::Production,
        grid: GridStyle::new(4, 3),
        blocks: &[
            Block::at(0, 1, Hull).span(4, 2),
            Block::at(0, 0, Plating),
            Block::at(3, 0, Plating),
            Block::at(1, 2, Shadow).span(2, 1),
            Block::at(2, 1, Glow),
        ],
        build_ticks: 80,
    },
    BuildingDef {
        key: "hydroponics",
        name: "Hydroponics Bay",
        category: BuildingCategory::Production,
        grid: GridStyle::new(4, 2),
        blocks: &[
            Block::at(0, 0, Glass).span(4, 1),
            Block::at(0, 1, Plating).span(4, 1),
            Block::at(1, 1, Glow),
            Block::at(3, 1, Glow),
        ],
        build_ticks: 45,
    },
    BuildingDef {
        key: "shipyard",
        name: "Orbital Shipyard",
        category: BuildingCategory::Production,
        grid: GridStyle::new(5, 4),
        blocks: &[
            Block::at(0, 0, Plating).span(1, 4),
            Block::at(4, 0, Plating).span(1, 4),
            Block::at(1, 1, Hull).span(3, 2),
            Block::at(3, 1, Accent),
            Block::at(1, 3, Shadow).span(3, 1),
        ],
        build_ticks: 200,
    },
    // ── Research ────────────────────────────────────────────────────
    BuildingDef {
        key: "research_lab",
        name: "Research Lab",
        category: BuildingCategory::Research,
        grid: GridStyle::new(3, 3),
        blocks: &[
            Block::at(0, 1, Hull).span(3, 2),
            Block::at(1, 0, Glass),
            Block::at(0, 1, Glass),
            Block::at(2, 1, Glass),
            Block::at(1, 2, Shadow),
        ],
        build_ticks: 90,
    },
    BuildingDef {
        key: "observatory",
        name: "Deep-Space Observatory",
        category: BuildingCategory::Research,
        grid: GridStyle::new(4, 4),
        blocks: &[
            Block::at(1, 0, Glass).span(2, 2),
            Block::at(0, 2, Hull).span(4, 2),
            Block::at(3, 0, Accent),
            Block::at(1, 3, Shadow).span(2, 1),
        ],
        build_ticks: 110,
    },
    // ── Defense ─────────────────────────────────────────────────────
    BuildingDef {
        key: "shield_generator",
        name: "Shield Generator",
        category: BuildingCategory::Defense,
        grid: GridStyle::new(3, 3),
        blocks: &[
            Block::at(0, 0, Glass).span(3, 1),
            Block::at(1, 1, Glow),
            Block::at(0, 2, Hull).span(3, 1),
        ],
        build_ticks: 100,
    },
    BuildingDef {
        key: "defense_battery",
        name: "Missile Battery",
        category: BuildingCategory::Defense,
        grid: GridStyle::new(4, 3),
        blocks: &[
            Block::at(0, 1, Hull).span(4, 2),
            Block::at(0, 0, Accent),
            Block::at(2, 0, Accent),
            Block::at(1, 2, Shadow).span(2, 1),
        ],
        build_ticks: 70,
    },
];

/// Catalog lookup by key.
pub fn building(key: &str) -> Option<&'static BuildingDef> {
    CATALOG.iter().find(|def| def.key == key)
}

/// Catalog entries of one category, in catalog order.
pub fn in_category(category: BuildingCategory) -> impl Iterator<Item = &'static BuildingDef> {
    CATALOG.iter().filter(move |def| def.category == category)
}

#[cfg(test)]
mod tests {
    use bevy::platform::collections::HashSet;

    use super::*;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<&str> = CATALOG.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn every_block_fits_its_grid() {
        for def in CATALOG {
            for (i, block) in def.blocks.iter().enumerate() {
                assert!(block.fits(def.grid), "{} block {i} overflows", def.key);
            }
        }
    }

    #[test]
    fn every_category_has_buildings() {
        for cat in BuildingCategory::ALL {
            assert!(in_category(cat).next().is_some(), "{cat:?} is empty");
        }
    }

    #[test]
    fn build_ticks_are_positive() {
        assert!(CATALOG.iter().all(|d| d.build_ticks > 0));
    }

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        assert_eq!(building("refinery").map(|d| d.name), Some("Refinery"));
        assert!(building("warp_gate").is_none());
    }

    #[test]
    fn static_and_owned_keys_compare_equal() {
        assert_eq!(
            BuildingKey::from_static("habitat"),
            BuildingKey::from("habitat".to_owned())
        );
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let json = serde_json::to_string(&BuildingKey::from_static("spaceport")).unwrap();
        assert_eq!(json, "\"spaceport\"");
    }

    #[test]
    fn full_block_covers_the_square() {
        let r = Block::at(0, 0, Hull).span(4, 4).rect(GridStyle::new(4, 4), 40.0);
        assert_eq!(r.min, Vec2::splat(-20.0));
        assert_eq!(r.max, Vec2::splat(20.0));
    }

    #[test]
    fn top_left_block_is_up_and_left() {
        let r = Block::at(0, 0, Hull).rect(GridStyle::new(2, 2), 20.0);
        assert_eq!(r.center(), Vec2::new(-5.0, 5.0));
        assert_eq!(r.size(), Vec2::splat(10.0));
    }
}
