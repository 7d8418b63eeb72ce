use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::Hex;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::HexGridConfig;
use super::entities::{HexId, HexRecord};
use crate::game_state::Richness;
use crate::math;

/// Generated hex records plus the projection used to place them.
///
/// Projection math lives in [`crate::math`] and works in screen space; this
/// type adds the y-flip into Bevy world space and the hex ↔ id bookkeeping.
#[derive(Debug, Clone)]
pub struct HexGridLayout {
    hex_size: f32,
    spacing: f32,
    records: Vec<HexRecord>,
    index: HashMap<Hex, HexId>,
}

impl HexGridLayout {
    /// Axial coordinates of a hexagon of ring radius `radius`, q-major.
    ///
    /// Keeps every `(q, r)` with `max(-N, -q-N) <= r <= min(N, -q+N)`.
    pub fn axial_range(radius: u32) -> impl Iterator<Item = Hex> {
        let n = radius as i32;
        (-n..=n).flat_map(move |q| {
            let r_min = (-n).max(-q - n);
            let r_max = n.min(-q + n);
            (r_min..=r_max).map(move |r| Hex::new(q, r))
        })
    }

    /// Builds the grid from config, sampling a noise field for richness.
    pub fn from_config(cfg: &HexGridConfig) -> Self {
        let fbm: Fbm<Perlin> =
            Fbm::new(cfg.richness_noise_seed).set_octaves(cfg.richness_noise_octaves);
        let mut layout = Self::empty(cfg.hex_size, cfg.spacing);

        for hex in Self::axial_range(cfg.radius) {
            let pos = math::axial_to_pixel(hex.x, hex.y, cfg.hex_size, cfg.spacing);
            let sample = fbm.get([
                pos.x as f64 / cfg.richness_noise_scale,
                pos.y as f64 / cfg.richness_noise_scale,
            ]);
            let value = math::map_noise_to_range(sample, 0.0, 1.0);
            let richness = if value >= cfg.rich_threshold {
                Richness::Rich
            } else if value <= cfg.poor_threshold {
                Richness::Poor
            } else {
                Richness::Normal
            };
            layout.push(hex, richness);
        }
        layout
    }

    /// Builds a grid from arbitrary coordinates, all with [`Richness::Normal`].
    ///
    /// Duplicates are ignored.
    pub fn from_hexes(hexes: impl IntoIterator<Item = Hex>, hex_size: f32, spacing: f32) -> Self {
        let mut layout = Self::empty(hex_size, spacing);
        for hex in hexes {
            layout.push(hex, Richness::Normal);
        }
        layout
    }

    fn empty(hex_size: f32, spacing: f32) -> Self {
        Self {
            hex_size,
            spacing,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, hex: Hex, richness: Richness) {
        if self.index.contains_key(&hex) {
            return;
        }
        let id = HexId(self.records.len() as u32);
        self.records.push(HexRecord { id, hex, richness });
        self.index.insert(hex, id);
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Hex circumradius in world units.
    pub fn hex_size(&self) -> f32 {
        self.hex_size
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in id order.
    pub fn records(&self) -> &[HexRecord] {
        &self.records
    }

    /// Record for `id`, if it belongs to this grid.
    pub fn record(&self, id: HexId) -> Option<&HexRecord> {
        self.records.get(id.0 as usize)
    }

    /// Id of the cell at `hex`.
    pub fn id_of(&self, hex: Hex) -> Option<HexId> {
        self.index.get(&hex).copied()
    }

    /// Whether `hex` is part of the grid.
    pub fn contains(&self, hex: Hex) -> bool {
        self.index.contains_key(&hex)
    }

    /// Whether `id` is part of the grid.
    pub fn contains_id(&self, id: HexId) -> bool {
        (id.0 as usize) < self.records.len()
    }

    // ── Projection ─────────────────────────────────────────────────

    /// World-space center of `hex`.
    pub fn world_center(&self, hex: Hex) -> Vec2 {
        math::screen_to_world(math::axial_to_pixel(
            hex.x,
            hex.y,
            self.hex_size,
            self.spacing,
        ))
    }

    /// World-space corner `index` (0..5) of `hex`.
    pub fn world_corner(&self, hex: Hex, index: usize) -> Vec2 {
        let screen = math::axial_to_pixel(hex.x, hex.y, self.hex_size, self.spacing)
            + math::corner_offset(index, self.hex_size);
        math::screen_to_world(screen)
    }

    /// Nearest axial cell to a world position (may lie outside the grid).
    pub fn world_pos_to_hex(&self, pos: Vec2) -> Hex {
        let (q, r) = math::pixel_to_axial(math::screen_to_world(pos), self.hex_size, self.spacing);
        Hex::new(q, r)
    }

    /// Grid cell whose drawn hexagon contains a world position. Points in the
    /// spacing gap hit nothing.
    pub fn hex_at_world(&self, pos: Vec2) -> Option<HexId> {
        let hex = self.world_pos_to_hex(pos);
        let id = self.id_of(hex)?;
        math::point_in_hex(pos - self.world_center(hex), self.hex_size).then_some(id)
    }

    /// World-space bounding box of all hex centers.
    pub fn bounds(&self) -> Rect {
        self.records
            .iter()
            .map(|r| self.world_center(r.hex))
            .fold(None, |acc: Option<Rect>, p| {
                Some(match acc {
                    Some(rect) => rect.union_point(p),
                    None => Rect::from_center_size(p, Vec2::ZERO),
                })
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use bevy::platform::collections::HashSet;
    use hexx::shapes;

    use super::*;

    fn layout(radius: u32) -> HexGridLayout {
        HexGridLayout::from_config(&HexGridConfig {
            radius,
            ..default()
        })
    }

    #[test]
    fn cell_count_matches_formula() {
        for n in 0..=6 {
            assert_eq!(layout(n).len(), math::hex_count(n), "radius {n}");
        }
    }

    #[test]
    fn axial_range_matches_hexx_hexagon() {
        let ours: HashSet<Hex> = HexGridLayout::axial_range(5).collect();
        let theirs: HashSet<Hex> = shapes::hexagon(Hex::ZERO, 5).collect();
        assert_eq!(ours, theirs);
    }

    #[test]
    fn ids_are_sequential_in_generation_order() {
        let grid = layout(2);
        for (i, rec) in grid.records().iter().enumerate() {
            assert_eq!(rec.id, HexId(i as u32));
            assert_eq!(grid.id_of(rec.hex), Some(rec.id));
        }
        // q-major: the first record is the lowest q with the lowest r
        assert_eq!(grid.records()[0].hex, Hex::new(-2, 0));
    }

    #[test]
    fn projection_is_injective() {
        let grid = layout(6);
        let mut seen: Vec<Vec2> = Vec::new();
        for rec in grid.records() {
            let p = grid.world_center(rec.hex);
            assert!(
                seen.iter().all(|q| q.distance(p) > 1e-3),
                "{:?} collides",
                rec.hex
            );
            seen.push(p);
        }
    }

    #[test]
    fn world_pos_roundtrip() {
        let grid = layout(4);
        for rec in grid.records() {
            let p = grid.world_center(rec.hex);
            assert_eq!(grid.world_pos_to_hex(p), rec.hex);
            assert_eq!(grid.hex_at_world(p), Some(rec.id));
        }
    }

    #[test]
    fn world_y_points_up() {
        // r grows downward on screen, so it must shrink world y.
        let grid = layout(1);
        assert!(grid.world_center(Hex::new(0, 1)).y < 0.0);
    }

    #[test]
    fn spacing_gap_hits_nothing() {
        let grid = layout(1);
        let center = grid.world_center(Hex::ZERO);
        let east = grid.world_center(Hex::new(1, 0));
        let midpoint = (center + east) / 2.0;
        assert!(grid.hex_at_world(midpoint).is_none());

        // Just past the drawn right edge, still inside the circumradius.
        let apothem = grid.hex_size() * 3.0_f32.sqrt() / 2.0;
        assert!(grid.hex_at_world(center + Vec2::X * (apothem + 0.5)).is_none());
        assert_eq!(
            grid.hex_at_world(center + Vec2::X * (apothem - 0.5)),
            grid.id_of(Hex::ZERO)
        );
    }

    #[test]
    fn point_outside_grid_hits_nothing() {
        let grid = layout(1);
        assert!(grid.hex_at_world(Vec2::new(10_000.0, 0.0)).is_none());
    }

    #[test]
    fn from_hexes_ignores_duplicates() {
        let grid = HexGridLayout::from_hexes([Hex::ZERO, Hex::new(1, 0), Hex::ZERO], 10.0, 1.0);
        assert_eq!(grid.len(), 2);
        assert!(grid.contains_id(HexId(1)));
        assert!(!grid.contains_id(HexId(2)));
    }

    #[test]
    fn richness_uses_all_classes_on_a_large_grid() {
        let grid = layout(10);
        let classes: HashSet<Richness> = grid.records().iter().map(|r| r.richness).collect();
        assert!(classes.contains(&Richness::Normal));
        assert!(classes.len() >= 2, "noise should vary richness: {classes:?}");
    }

    #[test]
    fn corners_are_hex_size_from_center() {
        let grid = layout(1);
        let hex = Hex::new(1, -1);
        for i in 0..6 {
            let d = grid.world_corner(hex, i).distance(grid.world_center(hex));
            assert!((d - grid.hex_size()).abs() < 1e-3);
        }
    }
}
