use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::entities::{MenuFocus, MenuState, MenuView, menu_view};
use crate::buildings::{
    self, BuildRequest, BuildingCategory, Constructions, DemolishRequest, Placements,
};
use crate::game_state::GameConfig;
use crate::hex_grid::{HexGrid, HexId};
use crate::selection::{Selection, SelectionChanged};

/// Resets navigation and any pending confirmation when the menu's hex changes.
pub fn refocus_menu(
    mut changed: MessageReader<SelectionChanged>,
    selection: Res<Selection>,
    mut menu: ResMut<MenuState>,
    mut focus: ResMut<MenuFocus>,
) {
    if changed.is_empty() {
        return;
    }
    changed.clear();
    let hex = selection.single();
    if focus.hex != hex {
        focus.hex = hex;
        focus.confirm_demolish = false;
        menu.back();
    }
}

/// Button pressed during one frame of the menu.
#[derive(Debug, Clone, Copy)]
enum MenuAction {
    Open(BuildingCategory),
    Back,
    Build(HexId, &'static buildings::BuildingDef),
    AskDemolish,
    ConfirmDemolish(HexId),
    CancelDemolish,
}

/// Request the menu hands to the game state.
#[derive(Debug, Clone, PartialEq)]
enum MenuRequest {
    Build(BuildRequest),
    Demolish(DemolishRequest),
}

/// Updates navigation for `action` and returns the request it triggers.
fn apply_menu_action(
    action: MenuAction,
    menu: &mut MenuState,
    focus: &mut MenuFocus,
) -> Option<MenuRequest> {
    match action {
        MenuAction::Open(category) => menu.select_category(category),
        MenuAction::Back => menu.back(),
        MenuAction::Build(hex, def) => {
            menu.back();
            return Some(MenuRequest::Build(BuildRequest {
                hex,
                building: def.building_key(),
            }));
        }
        MenuAction::AskDemolish => focus.confirm_demolish = true,
        MenuAction::ConfirmDemolish(hex) => {
            focus.confirm_demolish = false;
            return Some(MenuRequest::Demolish(DemolishRequest { hex }));
        }
        MenuAction::CancelDemolish => focus.confirm_demolish = false,
    }
    None
}

/// Draws the menu window anchored to the top-right corner.
#[allow(clippy::too_many_arguments)]
pub fn build_menu_ui(
    mut contexts: EguiContexts,
    selection: Res<Selection>,
    grid: Res<HexGrid>,
    placements: Res<Placements>,
    constructions: Res<Constructions>,
    config: Res<GameConfig>,
    mut menu: ResMut<MenuState>,
    mut focus: ResMut<MenuFocus>,
    mut build: MessageWriter<BuildRequest>,
    mut demolish: MessageWriter<DemolishRequest>,
) -> Result {
    let view = menu_view(&selection, &placements, &constructions);
    let hex = match view {
        MenuView::Hidden => return Ok(()),
        MenuView::Empty { hex }
        | MenuView::UnderConstruction { hex, .. }
        | MenuView::Built { hex, .. } => hex,
    };
    let ctx = contexts.ctx_mut()?;

    let mut action = None;
    egui::Window::new("Colony")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .resizable(false)
        .collapsible(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            if let Some(record) = grid.layout.record(hex) {
                ui.label(format!(
                    "Sector {},{} · {} (×{:.1})",
                    record.hex.x,
                    record.hex.y,
                    record.richness.label(),
                    config.richness.for_class(record.richness),
                ));
                ui.separator();
            }

            match view {
                MenuView::Hidden => {}
                MenuView::Empty { hex } => match *menu {
                    MenuState::NoCategory => {
                        ui.heading("Build");
                        for category in BuildingCategory::ALL {
                            if ui.button(category.label()).clicked() {
                                action = Some(MenuAction::Open(category));
                            }
                        }
                    }
                    MenuState::Category(category) => {
                        ui.horizontal(|ui| {
                            if ui.button("◀ Back").clicked() {
                                action = Some(MenuAction::Back);
                            }
                            ui.heading(category.label());
                        });
                        for def in buildings::in_category(category) {
                            let secs = def.build_ticks as f32 * config.tick_interval_ms as f32
                                / 1000.0;
                            if ui
                                .button(format!("{}  ({secs:.0}s)", def.name))
                                .clicked()
                            {
                                action = Some(MenuAction::Build(hex, def));
                            }
                        }
                    }
                },
                MenuView::UnderConstruction { def, progress, .. } => {
                    ui.heading(def.name);
                    ui.label("Under construction");
                    ui.add(
                        egui::ProgressBar::new(progress / 100.0)
                            .text(format!("{progress:.0}%")),
                    );
                }
                MenuView::Built { hex, def } => {
                    ui.heading(def.name);
                    ui.label(def.category.label());
                    ui.separator();
                    if focus.confirm_demolish {
                        ui.label(format!("Demolish {}?", def.name));
                        ui.horizontal(|ui| {
                            if ui.button("Confirm").clicked() {
                                action = Some(MenuAction::ConfirmDemolish(hex));
                            }
                            if ui.button("Cancel").clicked() {
                                action = Some(MenuAction::CancelDemolish);
                            }
                        });
                    } else if ui.button("Demolish").clicked() {
                        action = Some(MenuAction::AskDemolish);
                    }
                }
            }
        });

    let request = action.and_then(|a| apply_menu_action(a, &mut menu, &mut focus));
    match request {
        Some(MenuRequest::Build(request)) => {
            build.write(request);
        }
        Some(MenuRequest::Demolish(request)) => {
            demolish.write(request);
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Selection>()
            .init_resource::<MenuState>()
            .init_resource::<MenuFocus>()
            .add_message::<SelectionChanged>()
            .add_systems(Update, refocus_menu);
        app
    }

    fn click(app: &mut App, hex: HexId) {
        let selected = {
            let mut selection = app.world_mut().resource_mut::<Selection>();
            selection.apply(Some(hex));
            selection.sorted()
        };
        app.world_mut().write_message(SelectionChanged {
            clicked: Some(hex),
            selected,
        });
        app.update();
    }

    #[test]
    fn new_hex_resets_category_and_confirmation() {
        let mut app = test_app();
        click(&mut app, HexId(4));
        app.world_mut()
            .resource_mut::<MenuState>()
            .select_category(BuildingCategory::Production);
        app.world_mut().resource_mut::<MenuFocus>().confirm_demolish = true;

        // Deselect 4, select 7: still one hex, but a different one.
        click(&mut app, HexId(4));
        click(&mut app, HexId(7));

        let focus = app.world().resource::<MenuFocus>();
        assert_eq!(focus.hex, Some(HexId(7)));
        assert!(!focus.confirm_demolish);
        assert_eq!(*app.world().resource::<MenuState>(), MenuState::NoCategory);
    }

    #[test]
    fn unrelated_frames_keep_menu_state() {
        let mut app = test_app();
        click(&mut app, HexId(2));
        app.world_mut()
            .resource_mut::<MenuState>()
            .select_category(BuildingCategory::Research);
        app.update();

        assert_eq!(
            *app.world().resource::<MenuState>(),
            MenuState::Category(BuildingCategory::Research)
        );
        assert_eq!(app.world().resource::<MenuFocus>().hex, Some(HexId(2)));
    }

    fn habitat() -> &'static buildings::BuildingDef {
        buildings::building("habitat").unwrap()
    }

    #[test]
    fn build_requests_and_returns_to_categories() {
        let mut menu = MenuState::Category(BuildingCategory::Infrastructure);
        let mut focus = MenuFocus::default();

        let request = apply_menu_action(MenuAction::Build(HexId(3), habitat()), &mut menu, &mut focus);

        assert_eq!(
            request,
            Some(MenuRequest::Build(BuildRequest {
                hex: HexId(3),
                building: habitat().building_key(),
            }))
        );
        assert_eq!(menu, MenuState::NoCategory);
    }

    #[test]
    fn demolish_waits_for_confirm() {
        let mut menu = MenuState::default();
        let mut focus = MenuFocus::default();

        assert_eq!(apply_menu_action(MenuAction::AskDemolish, &mut menu, &mut focus), None);
        assert!(focus.confirm_demolish);

        let request = apply_menu_action(MenuAction::ConfirmDemolish(HexId(5)), &mut menu, &mut focus);
        assert_eq!(
            request,
            Some(MenuRequest::Demolish(DemolishRequest { hex: HexId(5) }))
        );
        assert!(!focus.confirm_demolish);
    }

    #[test]
    fn cancel_closes_confirmation_without_request() {
        let mut menu = MenuState::default();
        let mut focus = MenuFocus::default();

        apply_menu_action(MenuAction::AskDemolish, &mut menu, &mut focus);
        assert_eq!(apply_menu_action(MenuAction::CancelDemolish, &mut menu, &mut focus), None);
        assert!(!focus.confirm_demolish);
    }

    #[test]
    fn category_navigation_sends_nothing() {
        let mut menu = MenuState::default();
        let mut focus = MenuFocus::default();

        let open = MenuAction::Open(BuildingCategory::Defense);
        assert_eq!(apply_menu_action(open, &mut menu, &mut focus), None);
        assert_eq!(menu, MenuState::Category(BuildingCategory::Defense));
        assert_eq!(apply_menu_action(MenuAction::Back, &mut menu, &mut focus), None);
        assert_eq!(menu, MenuState::NoCategory);
    }
}
