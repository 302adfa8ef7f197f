//! System tray module.
//!
//! Provides the tray icon and context menu that keep the service reachable
//! while the overlay is closed.

pub mod icon;
pub mod menu;

pub use icon::*;
pub use menu::*;

use crate::app::{TrayAction, TrayMenuState};
use crate::winapi_utils::{post_app_message, AppMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tray_icon::menu::MenuEvent;
use tray_icon::{TrayIcon, TrayIconBuilder};

/// The live tray icon. Keep this alive for the tray to remain visible.
pub struct Tray {
    icon: TrayIcon,
    menu: TrayMenu,
}

impl Tray {
    /// Pushes new labels, enabled flags and tooltip to the tray.
    pub fn refresh(&self, state: &TrayMenuState) {
        self.menu.apply(state);
        if let Err(e) = self.icon.set_tooltip(Some(&state.tooltip)) {
            tracing::warn!(?e, "Failed to update tray tooltip");
        }
    }
}

/// Sets up the system tray icon and menu.
///
/// Menu clicks are forwarded to the main thread as [`AppMessage`]s until
/// `shutdown` is set.
pub fn setup_tray(
    initial: &TrayMenuState,
    shutdown: Arc<AtomicBool>,
) -> Result<Tray, Box<dyn std::error::Error>> {
    let icon = create_default_icon()?;
    let (menu, handles) = TrayMenu::build(initial);

    let tray = TrayIconBuilder::new()
        .with_tooltip(&initial.tooltip)
        .with_icon(icon)
        .with_menu(Box::new(menu))
        .build()?;

    spawn_menu_handler(shutdown);

    tracing::info!("System tray initialized");
    Ok(Tray {
        icon: tray,
        menu: handles,
    })
}

/// Spawns a thread to forward menu events.
fn spawn_menu_handler(shutdown: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        while !shutdown.load(Ordering::Relaxed) {
            if let Ok(event) = receiver.recv_timeout(Duration::from_millis(200)) {
                handle_menu_event(&event.id.0);
            }
        }
    });
}

fn handle_menu_event(menu_id: &str) {
    let message = match action_for(menu_id) {
        Some(TrayAction::ShowOverlay) => AppMessage::TrayShow,
        Some(TrayAction::HideOverlay) => AppMessage::TrayHide,
        Some(TrayAction::Quit) => AppMessage::TrayQuit,
        None => {
            tracing::debug!(menu_id, "Unknown menu event");
            return;
        }
    };
    post_app_message(message);
}
