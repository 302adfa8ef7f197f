//! Application context.
//!
//! [`App`] owns all mutable overlay state. The host shell feeds it events
//! (game transitions, hotkey presses, tray clicks, window input) and carries
//! out the [`ShellCommand`]s it returns. Nothing here touches the OS, so the
//! whole control flow is testable without a window.

use crate::assets::AssetResolver;
use crate::calculator::{
    ImageLayout, InteractionMode, KeyInput, OverlayView, Placeholder, Shortcut, TargetingCalculator,
};
use crate::catalog::MapCatalog;
use crate::config::{ConfigStore, SettingsStore};
use crate::error::{AssetLoadError, HotkeyError};
use crate::monitor::GameEvent;
use crate::shell::{choose_placement, Accelerator, Placement, WindowBounds, WorkArea};
use chrono::{DateTime, Local};
use std::path::PathBuf;

pub const TRAY_TOOLTIP: &str = "Foxhole Overlay";

/// Environment variable that forces test mode (hotkey without the game).
pub const TEST_MODE_ENV: &str = "FOXHOLE_OVERLAY_TEST_MODE";

/// Something the host shell must do.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    RegisterHotkey(Accelerator),
    UnregisterHotkey,
    /// Show the overlay, creating the window first if it is closed.
    ShowOverlay,
    HideOverlay,
    CloseOverlay,
    MinimizeOverlay,
    LoadImage { map_id: &'static str, path: PathBuf },
    Redraw,
    RefreshTray,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    ShowOverlay,
    HideOverlay,
    Quit,
}

/// Input coming from the overlay window.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Left click in window client coordinates.
    Click { x: f64, y: f64 },
    Key { key: KeyInput, ctrl: bool },
    SelectMap(String),
    SetMode(InteractionMode),
    Clear,
    Close,
    Minimize,
    Moved(WindowBounds),
    Relayout(ImageLayout),
}

/// Labels and enabled flags for the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuState {
    pub status_label: String,
    pub tooltip: String,
    pub show_enabled: bool,
    pub hide_enabled: bool,
}

pub struct App {
    calculator: TargetingCalculator<'static>,
    settings: ConfigStore,
    assets: AssetResolver,
    hotkey: Accelerator,
    hotkey_registered: bool,
    game_running_since: Option<DateTime<Local>>,
    test_mode: bool,
    overlay: OverlayState,
    notice: Option<Placeholder>,
}

impl App {
    pub fn new(settings: ConfigStore, assets: AssetResolver, test_mode: bool) -> Self {
        let hotkey = Accelerator::parse_or_default(&settings.hotkey());
        tracing::info!(%hotkey, "Hotkey configured");

        Self {
            calculator: TargetingCalculator::new(MapCatalog::builtin()),
            settings,
            assets,
            hotkey,
            hotkey_registered: false,
            game_running_since: None,
            test_mode,
            overlay: OverlayState::Closed,
            notice: None,
        }
    }

    /// Test mode is on in debug builds or when the env var is `1`/`true`.
    pub fn test_mode_from_env() -> bool {
        let forced = std::env::var(TEST_MODE_ENV)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        forced || cfg!(debug_assertions)
    }

    pub fn calculator(&self) -> &TargetingCalculator<'static> {
        &self.calculator
    }

    pub fn settings(&self) -> &ConfigStore {
        &self.settings
    }

    pub fn hotkey(&self) -> Accelerator {
        self.hotkey
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay
    }

    pub fn game_running(&self) -> bool {
        self.game_running_since.is_some()
    }

    /// Commands to run once the shell is up.
    pub fn startup(&mut self) -> Vec<ShellCommand> {
        let mut commands = Vec::new();
        if self.test_mode {
            tracing::info!("TEST MODE: Hotkey enabled without Foxhole running");
            self.push_register_hotkey(&mut commands);
        }
        commands.push(ShellCommand::RefreshTray);
        commands
    }

    pub fn on_game_event(&mut self, event: GameEvent) -> Vec<ShellCommand> {
        let mut commands = Vec::new();
        match event {
            GameEvent::Started => {
                tracing::info!("Foxhole detected - enabling hotkey");
                self.game_running_since = Some(Local::now());
                self.push_register_hotkey(&mut commands);
            }
            GameEvent::Stopped => {
                tracing::info!("Foxhole stopped - disabling hotkey and closing overlay");
                self.game_running_since = None;
                if self.hotkey_registered {
                    self.hotkey_registered = false;
                    commands.push(ShellCommand::UnregisterHotkey);
                }
                self.push_close(&mut commands);
            }
        }
        commands.push(ShellCommand::RefreshTray);
        commands
    }

    /// The global hotkey toggles the overlay.
    pub fn on_hotkey(&mut self) -> Vec<ShellCommand> {
        tracing::info!(hotkey = %self.hotkey, "Hotkey pressed");
        let mut commands = Vec::new();
        match self.overlay {
            OverlayState::Visible => self.push_hide(&mut commands),
            OverlayState::Hidden | OverlayState::Closed => self.push_show(&mut commands),
        }
        commands
    }

    /// Registration was rejected by the OS (usually another app owns it).
    pub fn on_hotkey_failed(&mut self, error: &HotkeyError) {
        tracing::error!(%error, "Hotkey unavailable");
        self.hotkey_registered = false;
    }

    pub fn on_tray(&mut self, action: TrayAction) -> Vec<ShellCommand> {
        let mut commands = Vec::new();
        match action {
            TrayAction::ShowOverlay => {
                if self.game_running() || self.test_mode {
                    self.push_show(&mut commands);
                }
            }
            TrayAction::HideOverlay => {
                if self.overlay == OverlayState::Visible {
                    self.push_hide(&mut commands);
                }
            }
            TrayAction::Quit => {
                tracing::info!("User requested quit - shutting down service");
                commands.push(ShellCommand::Quit);
            }
        }
        commands
    }

    pub fn on_ui(&mut self, event: UiEvent) -> Vec<ShellCommand> {
        let mut commands = Vec::new();
        match event {
            UiEvent::Click { x, y } => {
                if self.notice.is_some() {
                    tracing::debug!(x, y, "Map hidden behind a notice, ignoring click");
                    return commands;
                }
                self.calculator.register_click(x, y);
                commands.push(ShellCommand::Redraw);
            }
            UiEvent::Key { key, ctrl } => match Shortcut::from_key(key, ctrl) {
                Some(shortcut) if self.calculator.apply_shortcut(shortcut) => {
                    commands.push(ShellCommand::Redraw);
                }
                Some(_) => self.push_close(&mut commands),
                None => {}
            },
            UiEvent::SelectMap(map_id) => {
                self.select_map(&map_id, &mut commands);
            }
            UiEvent::SetMode(mode) => {
                self.calculator.set_mode(mode);
                commands.push(ShellCommand::Redraw);
            }
            UiEvent::Clear => {
                self.calculator.clear();
                commands.push(ShellCommand::Redraw);
            }
            UiEvent::Close => self.push_close(&mut commands),
            UiEvent::Minimize => {
                if self.overlay == OverlayState::Visible {
                    commands.push(ShellCommand::MinimizeOverlay);
                }
            }
            UiEvent::Moved(bounds) => {
                if let Err(e) = self.settings.set_last_window_bounds(bounds) {
                    tracing::warn!(?e, "Failed to save window bounds");
                }
            }
            UiEvent::Relayout(layout) => {
                self.calculator.set_layout(layout);
                commands.push(ShellCommand::Redraw);
            }
        }
        commands
    }

    pub fn on_image_loaded(&mut self, map_id: &str, layout: ImageLayout) -> Vec<ShellCommand> {
        self.calculator.image_loaded(map_id, layout);
        vec![ShellCommand::Redraw]
    }

    pub fn on_image_failed(&mut self, map_id: &str, error: &AssetLoadError) -> Vec<ShellCommand> {
        self.calculator.image_failed(map_id, error);
        vec![ShellCommand::Redraw]
    }

    /// Where to put a newly created overlay window.
    ///
    /// Rejected saved bounds are overwritten with the default.
    pub fn overlay_placement(&mut self, work: WorkArea) -> WindowBounds {
        let placement = choose_placement(self.settings.last_window_bounds(), work);
        if let Placement::Default { bounds, replaced: true } = placement {
            if let Err(e) = self.settings.set_last_window_bounds(bounds) {
                tracing::warn!(?e, "Failed to reset saved window bounds");
            }
        }
        placement.bounds()
    }

    pub fn view(&self) -> OverlayView {
        let view = self.calculator.view();
        match &self.notice {
            Some(notice) => view.with_notice(notice.clone()),
            None => view,
        }
    }

    pub fn tray_menu(&self) -> TrayMenuState {
        let status_label = if self.game_running() {
            format!("Foxhole Running ({} to toggle)", self.hotkey)
        } else {
            "Waiting for Foxhole...".to_string()
        };
        let tooltip = match self.game_running_since {
            Some(since) => format!(
                "{TRAY_TOOLTIP} - Foxhole running since {}",
                since.format("%H:%M")
            ),
            None => TRAY_TOOLTIP.to_string(),
        };

        TrayMenuState {
            status_label,
            tooltip,
            show_enabled: self.game_running() || self.test_mode,
            hide_enabled: self.overlay == OverlayState::Visible,
        }
    }

    fn push_register_hotkey(&mut self, commands: &mut Vec<ShellCommand>) {
        if self.hotkey_registered {
            tracing::debug!(hotkey = %self.hotkey, "Hotkey already registered");
            return;
        }
        self.hotkey_registered = true;
        commands.push(ShellCommand::RegisterHotkey(self.hotkey));
    }

    fn push_show(&mut self, commands: &mut Vec<ShellCommand>) {
        let was_closed = self.overlay == OverlayState::Closed;
        self.overlay = OverlayState::Visible;
        commands.push(ShellCommand::ShowOverlay);

        // A fresh window starts from the saved sector, like a reload
        if was_closed {
            self.calculator = TargetingCalculator::new(MapCatalog::builtin());
            self.notice = None;
            if let Some(map_id) = self.settings.selected_map_id() {
                self.select_map(&map_id, commands);
            }
        }
        commands.push(ShellCommand::RefreshTray);
    }

    fn push_hide(&mut self, commands: &mut Vec<ShellCommand>) {
        self.overlay = OverlayState::Hidden;
        commands.push(ShellCommand::HideOverlay);
        commands.push(ShellCommand::RefreshTray);
    }

    fn push_close(&mut self, commands: &mut Vec<ShellCommand>) {
        if self.overlay == OverlayState::Closed {
            return;
        }
        self.overlay = OverlayState::Closed;
        commands.push(ShellCommand::CloseOverlay);
        commands.push(ShellCommand::RefreshTray);
    }

    fn select_map(&mut self, map_id: &str, commands: &mut Vec<ShellCommand>) {
        let entry = match self.calculator.select_map(map_id, &mut self.settings) {
            Ok(entry) => entry,
            Err(e) => {
                self.notice = Some(Placeholder::NotFound { map_id: e.id });
                commands.push(ShellCommand::Redraw);
                return;
            }
        };

        self.notice = None;
        match self.assets.resolve(&entry) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Loading map");
                commands.push(ShellCommand::LoadImage {
                    map_id: entry.id,
                    path,
                });
            }
            Err(e) => self.calculator.image_failed(entry.id, &e),
        }
        commands.push(ShellCommand::Redraw);
    }
}
