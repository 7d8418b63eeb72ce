use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use hexx::Hex;

use super::entities::HexId;
use super::layout::HexGridLayout;

/// Axial offsets of the six neighbors.
///
/// Direction `i` shares the edge between corners `i` and `(i + 1) % 6`
/// (see [`crate::math::corner_offset`]).
pub const NEIGHBOR_OFFSETS: [Hex; 6] = [
    Hex::new(1, 0),
    Hex::new(0, 1),
    Hex::new(-1, 1),
    Hex::new(-1, 0),
    Hex::new(0, -1),
    Hex::new(1, -1),
];

/// Edge of a selected hex that faces an unselected or missing neighbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundarySegment {
    /// Selected hex owning the edge.
    pub hex: HexId,
    /// Neighbor direction index (0..5).
    pub direction: u8,
    /// World-space start (corner `direction`).
    pub from: Vec2,
    /// World-space end (corner `direction + 1`).
    pub to: Vec2,
}

/// Neighbor of `hex` in direction `dir` (0..5).
pub fn neighbor(hex: Hex, dir: usize) -> Hex {
    hex + NEIGHBOR_OFFSETS[dir % 6]
}

/// Outline of the selection as independent segments.
///
/// Each selected hex contributes one segment per side whose neighbor is absent
/// from the grid or not selected, so shared interior edges vanish and a single
/// merged outline emerges for contiguous and disjoint selections alike.
/// Ids that are not part of `layout` are skipped.
pub fn boundary_segments(layout: &HexGridLayout, selected: &HashSet<HexId>) -> Vec<BoundarySegment> {
    let mut segments = Vec::with_capacity(selected.len() * 6);
    for &id in selected {
        let Some(record) = layout.record(id) else {
            continue;
        };
        for dir in 0..6 {
            let shared = layout
                .id_of(neighbor(record.hex, dir))
                .is_some_and(|n| selected.contains(&n));
            if shared {
                continue;
            }
            segments.push(BoundarySegment {
                hex: id,
                direction: dir as u8,
                from: layout.world_corner(record.hex, dir),
                to: layout.world_corner(record.hex, (dir + 1) % 6),
            });
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex_grid::HexGridConfig;

    fn grid() -> HexGridLayout {
        HexGridLayout::from_config(&HexGridConfig {
            radius: 3,
            spacing: 1.0,
            ..default()
        })
    }

    fn select(layout: &HexGridLayout, hexes: &[Hex]) -> HashSet<HexId> {
        hexes.iter().filter_map(|h| layout.id_of(*h)).collect()
    }

    #[test]
    fn empty_selection_has_no_outline() {
        assert!(boundary_segments(&grid(), &HashSet::default()).is_empty());
    }

    #[test]
    fn isolated_hex_has_six_segments() {
        let g = grid();
        let segs = boundary_segments(&g, &select(&g, &[Hex::ZERO]));
        assert_eq!(segs.len(), 6);
    }

    #[test]
    fn two_adjacent_hexes_have_ten_segments() {
        let g = grid();
        for dir in 0..6 {
            let sel = select(&g, &[Hex::ZERO, neighbor(Hex::ZERO, dir)]);
            assert_eq!(boundary_segments(&g, &sel).len(), 10, "direction {dir}");
        }
    }

    #[test]
    fn disjoint_hexes_keep_all_edges() {
        let g = grid();
        let sel = select(&g, &[Hex::new(-2, 0), Hex::new(2, 0)]);
        assert_eq!(boundary_segments(&g, &sel).len(), 12);
    }

    #[test]
    fn full_ring_around_center_hides_inner_edges() {
        let g = grid();
        let mut hexes = vec![Hex::ZERO];
        hexes.extend((0..6).map(|d| neighbor(Hex::ZERO, d)));
        let sel = select(&g, &hexes);
        // 7-hex flower: 6 outer hexes × 3 exposed sides
        assert_eq!(boundary_segments(&g, &sel).len(), 18);
    }

    #[test]
    fn edge_of_map_counts_as_boundary() {
        let g = HexGridLayout::from_hexes([Hex::ZERO], 10.0, 1.0);
        let sel = select(&g, &[Hex::ZERO]);
        assert_eq!(boundary_segments(&g, &sel).len(), 6);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let g = grid();
        let sel: HashSet<HexId> = [HexId(9_999)].into_iter().collect();
        assert!(boundary_segments(&g, &sel).is_empty());
    }

    #[test]
    fn boundary_edge_is_shared_with_neighbor() {
        // With spacing 1.0 the edge toward a neighbor coincides with the
        // neighbor's opposite edge, so the direction/corner table is consistent.
        let g = grid();
        for dir in 0..6 {
            let n = neighbor(Hex::ZERO, dir);
            let a0 = g.world_corner(Hex::ZERO, dir);
            let a1 = g.world_corner(Hex::ZERO, (dir + 1) % 6);
            let opp = (dir + 3) % 6;
            let b0 = g.world_corner(n, opp);
            let b1 = g.world_corner(n, (opp + 1) % 6);
            assert!(a0.distance(b1) < 1e-3, "dir {dir}: {a0:?} vs {b1:?}");
            assert!(a1.distance(b0) < 1e-3, "dir {dir}: {a1:?} vs {b0:?}");
        }
    }

    #[test]
    fn segments_belong_to_selected_hexes() {
        let g = grid();
        let sel = select(&g, &[Hex::ZERO, Hex::new(1, 0)]);
        for seg in boundary_segments(&g, &sel) {
            assert!(sel.contains(&seg.hex));
            assert!(seg.direction < 6);
        }
    }
}
