use bevy::prelude::*;

use crate::buildings::{BuildingCategory, BuildingDef, Constructions, Placements};
use crate::hex_grid::HexId;
use crate::selection::Selection;

/// Two-level navigation: category list, or the buildings of one category.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Showing the category list.
    #[default]
    NoCategory,
    /// Showing the buildings of a category.
    Category(BuildingCategory),
}

impl MenuState {
    /// Opens `category`.
    pub fn select_category(&mut self, category: BuildingCategory) {
        *self = MenuState::Category(category);
    }

    /// Returns to the category list.
    pub fn back(&mut self) {
        *self = MenuState::NoCategory;
    }

    /// The open category, if any.
    pub fn category(&self) -> Option<BuildingCategory> {
        match self {
            MenuState::NoCategory => None,
            MenuState::Category(c) => Some(*c),
        }
    }
}

/// Hex the menu is currently about, and whether a demolish is awaiting
/// confirmation for it.
#[derive(Resource, Default, Debug)]
pub struct MenuFocus {
    /// Hex the menu was last opened for.
    pub hex: Option<HexId>,
    /// Demolish confirmation is showing.
    pub confirm_demolish: bool,
}

/// What the menu should display for the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuView {
    /// Nothing or several hexes selected.
    Hidden,
    /// One empty hex: offer buildings.
    Empty {
        /// Selected hex.
        hex: HexId,
    },
    /// One hex with a building in progress.
    UnderConstruction {
        /// Selected hex.
        hex: HexId,
        /// Building being constructed.
        def: &'static BuildingDef,
        /// Completion percentage.
        progress: f32,
    },
    /// One hex with a finished building.
    Built {
        /// Selected hex.
        hex: HexId,
        /// Building standing there.
        def: &'static BuildingDef,
    },
}

/// Derives the menu contents from the selection and building state.
pub fn menu_view(
    selection: &Selection,
    placements: &Placements,
    constructions: &Constructions,
) -> MenuView {
    let Some(hex) = selection.single() else {
        return MenuView::Hidden;
    };
    if placements.get(hex).is_none() {
        return MenuView::Empty { hex };
    }
    let Some(def) = placements.definition(hex) else {
        return MenuView::Hidden;
    };
    match constructions.get(hex) {
        Some(c) => MenuView::UnderConstruction {
            hex,
            def,
            progress: c.progress,
        },
        None => MenuView::Built { hex, def },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::{BuildingKey, Construction};

    #[test]
    fn category_then_back() {
        let mut m = MenuState::default();
        assert_eq!(m.category(), None);
        m.select_category(BuildingCategory::Research);
        assert_eq!(m, MenuState::Category(BuildingCategory::Research));
        m.select_category(BuildingCategory::Defense);
        assert_eq!(m.category(), Some(BuildingCategory::Defense));
        m.back();
        assert_eq!(m, MenuState::NoCategory);
    }

    #[test]
    fn back_from_root_stays_at_root() {
        let mut m = MenuState::NoCategory;
        m.back();
        assert_eq!(m, MenuState::NoCategory);
    }

    fn state() -> (Selection, Placements, Constructions) {
        let mut placements = Placements::default();
        placements
            .place(HexId(1), BuildingKey::from_static("habitat"))
            .unwrap();
        placements
            .place(HexId(2), BuildingKey::from_static("refinery"))
            .unwrap();
        let mut constructions = Constructions::default();
        let mut c = Construction::new(BuildingKey::from_static("refinery"));
        c.progress = 25.0;
        constructions.insert(HexId(2), c);
        (Selection::default(), placements, constructions)
    }

    #[test]
    fn hidden_without_single_selection() {
        let (mut sel, p, c) = state();
        assert_eq!(menu_view(&sel, &p, &c), MenuView::Hidden);
        sel.toggle(HexId(0));
        sel.toggle(HexId(1));
        assert_eq!(menu_view(&sel, &p, &c), MenuView::Hidden);
    }

    #[test]
    fn empty_hex_offers_building() {
        let (mut sel, p, c) = state();
        sel.toggle(HexId(0));
        assert_eq!(menu_view(&sel, &p, &c), MenuView::Empty { hex: HexId(0) });
    }

    #[test]
    fn construction_shows_progress() {
        let (mut sel, p, c) = state();
        sel.toggle(HexId(2));
        match menu_view(&sel, &p, &c) {
            MenuView::UnderConstruction { hex, def, progress } => {
                assert_eq!(hex, HexId(2));
                assert_eq!(def.key, "refinery");
                assert_eq!(progress, 25.0);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn finished_building_offers_demolish() {
        let (mut sel, p, c) = state();
        sel.toggle(HexId(1));
        assert!(matches!(
            menu_view(&sel, &p, &c),
            MenuView::Built { hex: HexId(1), .. }
        ));
    }
}
