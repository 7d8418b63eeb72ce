//! The set of selected hexes and its change notifications.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::hex_grid::HexId;

/// Selected hex ids. Order is irrelevant.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<HexId>,
}

impl Selection {
    /// Adds `id` if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: HexId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Click semantics: `Some(id)` toggles, `None` clears.
    ///
    /// Returns `true` when the set changed.
    pub fn apply(&mut self, clicked: Option<HexId>) -> bool {
        match clicked {
            Some(id) => {
                self.toggle(id);
                true
            }
            None => {
                let had_any = !self.ids.is_empty();
                self.clear();
                had_any
            }
        }
    }

    /// Applies a click and returns the notification to emit, if the set changed.
    pub fn click(&mut self, clicked: Option<HexId>) -> Option<SelectionChanged> {
        self.apply(clicked).then(|| SelectionChanged {
            clicked,
            selected: self.sorted(),
        })
    }

    /// Replaces the selection with the empty set.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: HexId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected hexes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The underlying id set.
    pub fn ids(&self) -> &HashSet<HexId> {
        &self.ids
    }

    /// Selected ids in ascending order.
    pub fn sorted(&self) -> Vec<HexId> {
        let mut ids: Vec<HexId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The selected hex when exactly one is selected.
    pub fn single(&self) -> Option<HexId> {
        if self.ids.len() == 1 {
            self.ids.iter().next().copied()
        } else {
            None
        }
    }
}

/// Written whenever a click changed the selection.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The clicked hex, `None` for a click off the map.
    pub clicked: Option<HexId>,
    /// Selection after the click, ascending.
    pub selected: Vec<HexId>,
}

/// Registers [`Selection`] and [`SelectionChanged`].
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>()
            .add_message::<SelectionChanged>();
    }
}
