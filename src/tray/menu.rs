//! Context menu for the system tray.

use crate::app::{TrayAction, TrayMenuState};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};

/// Menu item IDs
pub const MENU_ID_STATUS: &str = "status";
pub const MENU_ID_SHOW: &str = "show_overlay";
pub const MENU_ID_HIDE: &str = "hide_overlay";
pub const MENU_ID_QUIT: &str = "quit";

/// Handles to the menu items whose labels or enabled state change.
pub struct TrayMenu {
    status: MenuItem,
    show: MenuItem,
    hide: MenuItem,
}

impl TrayMenu {
    /// Builds the context menu, returning it alongside the item handles.
    pub fn build(initial: &TrayMenuState) -> (Menu, Self) {
        let menu = Menu::new();

        let item = |id: &str, text: &str, enabled: bool| {
            MenuItem::with_id(MenuId::new(id), text, enabled, None)
        };
        // Status line, never clickable
        let status = item(MENU_ID_STATUS, initial.status_label.as_str(), false);
        let show = item(MENU_ID_SHOW, "Show Overlay", initial.show_enabled);
        let hide = item(MENU_ID_HIDE, "Hide Overlay", initial.hide_enabled);
        let quit = item(MENU_ID_QUIT, "Quit Service", true);

        let _ = menu.append(&status);
        let _ = menu.append(&PredefinedMenuItem::separator());
        let _ = menu.append(&show);
        let _ = menu.append(&hide);
        let _ = menu.append(&PredefinedMenuItem::separator());
        let _ = menu.append(&quit);

        (menu, Self { status, show, hide })
    }

    pub fn apply(&self, state: &TrayMenuState) {
        self.status.set_text(&state.status_label);
        self.show.set_enabled(state.show_enabled);
        self.hide.set_enabled(state.hide_enabled);
    }
}

/// Maps a clicked menu id to the action it requests.
pub fn action_for(menu_id: &str) -> Option<TrayAction> {
    match menu_id {
        MENU_ID_SHOW => Some(TrayAction::ShowOverlay),
        MENU_ID_HIDE => Some(TrayAction::HideOverlay),
        MENU_ID_QUIT => Some(TrayAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_for_known_ids() {
        assert_eq!(action_for(MENU_ID_SHOW), Some(TrayAction::ShowOverlay));
        assert_eq!(action_for(MENU_ID_HIDE), Some(TrayAction::HideOverlay));
        assert_eq!(action_for(MENU_ID_QUIT), Some(TrayAction::Quit));
    }

    #[test]
    fn test_status_item_has_no_action() {
        assert_eq!(action_for(MENU_ID_STATUS), None);
        assert_eq!(action_for("unknown"), None);
    }
}
