//! Foxhole Overlay
//!
//! Runs silently in the system tray, watches for the Foxhole client and
//! toggles the artillery calculator overlay with a global hotkey.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use foxhole_overlay::app::App;
use foxhole_overlay::assets::AssetResolver;
use foxhole_overlay::config::ConfigStore;
use foxhole_overlay::instance::InstanceLock;
use foxhole_overlay::monitor::{GameEvent, GameProcessMonitor, MonitorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("foxhole_overlay=info")),
        )
        .init();

    let lock = match InstanceLock::acquire(InstanceLock::default_path())? {
        Some(lock) => lock,
        None => {
            notify_already_running();
            return Ok(());
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Foxhole Overlay starting");
    run_application(lock)
}

fn open_settings() -> ConfigStore {
    match ConfigStore::open() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(%e, "Settings will not be saved this session");
            ConfigStore::in_memory()
        }
    }
}

fn build_app() -> App {
    let assets = AssetResolver::discover();
    tracing::info!(tiles = %assets.tiles_dir().display(), "Map tiles directory");
    App::new(open_settings(), assets, App::test_mode_from_env())
}

#[cfg(windows)]
fn notify_already_running() {
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONWARNING, MB_OK};
    unsafe {
        MessageBoxW(
            None,
            windows::core::w!(
                "Foxhole Overlay is already running.\n\n\
                 Check the system tray for the application icon."
            ),
            windows::core::w!("Foxhole Overlay - Already Running"),
            MB_OK | MB_ICONWARNING,
        );
    }
}

#[cfg(not(windows))]
fn notify_already_running() {
    eprintln!("Foxhole Overlay is already running.");
}

#[cfg(windows)]
fn run_application(_lock: InstanceLock) -> Result<(), Box<dyn std::error::Error>> {
    use foxhole_overlay::app::TrayAction;
    use foxhole_overlay::tray::setup_tray;
    use foxhole_overlay::winapi_utils::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    set_main_thread();
    init_com()?;

    let mut app = build_app();

    // Shutdown signal for the tray menu thread
    let shutdown = Arc::new(AtomicBool::new(false));

    let tray = match setup_tray(&app.tray_menu(), Arc::clone(&shutdown)) {
        Ok(tray) => Some(tray),
        Err(e) => {
            tracing::warn!(%e, "Failed to create system tray, continuing without it");
            None
        }
    };

    // Handle Ctrl+C as backup
    ctrlc::set_handler(|| {
        tracing::info!("Shutdown signal received");
        post_quit_message(0);
    })?;

    let mut monitor = GameProcessMonitor::new(MonitorConfig::default());
    monitor.start(|event| {
        post_app_message(match event {
            GameEvent::Started => AppMessage::GameStarted,
            GameEvent::Stopped => AppMessage::GameStopped,
        })
    });

    let mut shell = shell::Win32Shell::new(tray);
    let startup = app.startup();
    shell.run(&mut app, startup);

    tracing::info!("Foxhole Overlay running in the system tray");
    run_message_loop(|event| {
        let commands = match event {
            LoopEvent::App(AppMessage::GameStarted) => app.on_game_event(GameEvent::Started),
            LoopEvent::App(AppMessage::GameStopped) => app.on_game_event(GameEvent::Stopped),
            LoopEvent::App(AppMessage::TrayShow) => app.on_tray(TrayAction::ShowOverlay),
            LoopEvent::App(AppMessage::TrayHide) => app.on_tray(TrayAction::HideOverlay),
            LoopEvent::App(AppMessage::TrayQuit) => app.on_tray(TrayAction::Quit),
            LoopEvent::Hotkey(id) if id == OVERLAY_HOTKEY_ID => app.on_hotkey(),
            LoopEvent::Hotkey(id) => {
                tracing::debug!(id, "Ignoring unknown hotkey");
                Vec::new()
            }
            LoopEvent::Dispatched => Vec::new(),
        };
        shell.run(&mut app, commands);
    });

    tracing::info!("Shutting down");
    shutdown.store(true, Ordering::SeqCst);
    monitor.stop();
    drop(shell);

    if let Err(e) = app.settings().save() {
        tracing::warn!(%e, "Failed to save settings on exit");
    }
    tracing::info!("Foxhole Overlay has exited");
    Ok(())
}

/// Carries out [`ShellCommand`]s against the real window, hotkey and tray.
///
/// [`ShellCommand`]: foxhole_overlay::app::ShellCommand
#[cfg(windows)]
mod shell {
    use foxhole_overlay::app::{App, ShellCommand, UiEvent};
    use foxhole_overlay::catalog::MapCatalog;
    use foxhole_overlay::tray::Tray;
    use foxhole_overlay::winapi_utils::{
        decode_image, post_quit_message, work_area, HotkeyGuard, OverlayWindow, OVERLAY_HOTKEY_ID,
    };

    pub struct Win32Shell {
        window: Option<OverlayWindow>,
        hotkey: Option<HotkeyGuard>,
        tray: Option<Tray>,
    }

    impl Win32Shell {
        pub fn new(tray: Option<Tray>) -> Self {
            Self {
                window: None,
                hotkey: None,
                tray,
            }
        }

        /// Executes `commands`, then keeps feeding queued window input to
        /// the app until nothing is left to do.
        pub fn run(&mut self, app: &mut App, mut commands: Vec<ShellCommand>) {
            loop {
                let mut follow_up = Vec::new();
                for command in commands.drain(..) {
                    self.execute(app, command, &mut follow_up);
                }

                let events = self
                    .window
                    .as_ref()
                    .map(OverlayWindow::take_events)
                    .unwrap_or_default();
                for event in events {
                    follow_up.extend(app.on_ui(event));
                }

                if follow_up.is_empty() {
                    break;
                }
                commands = follow_up;
            }
        }

        fn execute(
            &mut self,
            app: &mut App,
            command: ShellCommand,
            follow_up: &mut Vec<ShellCommand>,
        ) {
            match command {
                ShellCommand::RegisterHotkey(accelerator) => {
                    // Replaces and releases any previous registration
                    self.hotkey = None;
                    match HotkeyGuard::register(OVERLAY_HOTKEY_ID, accelerator) {
                        Ok(guard) => self.hotkey = Some(guard),
                        Err(e) => app.on_hotkey_failed(&e),
                    }
                }
                ShellCommand::UnregisterHotkey => self.hotkey = None,
                ShellCommand::ShowOverlay => {
                    if self.window.is_none() {
                        let bounds = app.overlay_placement(work_area());
                        match OverlayWindow::create(bounds, MapCatalog::builtin()) {
                            Ok(window) => self.window = Some(window),
                            Err(e) => {
                                tracing::error!(?e, "Failed to create overlay window");
                                follow_up.extend(app.on_ui(UiEvent::Close));
                                return;
                            }
                        }
                    }
                    if let Some(window) = &self.window {
                        window.set_view(app.view());
                        window.show();
                    }
                }
                ShellCommand::HideOverlay => {
                    if let Some(window) = &self.window {
                        window.hide();
                    }
                }
                ShellCommand::MinimizeOverlay => {
                    if let Some(window) = &self.window {
                        window.minimize();
                    }
                }
                ShellCommand::CloseOverlay => self.window = None,
                ShellCommand::LoadImage { map_id, path } => {
                    let Some(window) = &self.window else {
                        tracing::debug!(map_id, "No overlay window, skipping image load");
                        return;
                    };
                    match decode_image(&path) {
                        Ok(image) => {
                            let layout = window.set_image(image);
                            follow_up.extend(app.on_image_loaded(map_id, layout));
                        }
                        Err(e) => {
                            tracing::error!(%e, "Failed to load map image");
                            window.clear_image();
                            follow_up.extend(app.on_image_failed(map_id, &e));
                        }
                    }
                }
                ShellCommand::Redraw => {
                    if let Some(window) = &self.window {
                        window.set_view(app.view());
                    }
                }
                ShellCommand::RefreshTray => {
                    if let Some(tray) = &self.tray {
                        tray.refresh(&app.tray_menu());
                    }
                }
                ShellCommand::Quit => post_quit_message(0),
            }
        }
    }
}

/// Without a desktop shell the service only tracks the game process.
#[cfg(not(windows))]
fn run_application(_lock: InstanceLock) -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::mpsc;

    enum Signal {
        Game(GameEvent),
        Quit,
    }

    let mut app = build_app();
    tracing::info!("No overlay window on this platform, monitoring Foxhole only");

    let (tx, rx) = mpsc::channel();

    let quit_tx = tx.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        let _ = quit_tx.send(Signal::Quit);
    })?;

    let mut monitor = GameProcessMonitor::new(MonitorConfig::default());
    monitor.start(move |event| {
        let _ = tx.send(Signal::Game(event));
    });

    let startup = app.startup();
    tracing::debug!(?startup, "Startup commands");

    for signal in rx {
        match signal {
            Signal::Game(event) => {
                let commands = app.on_game_event(event);
                let tray = app.tray_menu();
                tracing::info!(status = %tray.status_label, ?commands, "Game state changed");
            }
            Signal::Quit => break,
        }
    }

    monitor.stop();
    if let Err(e) = app.settings().save() {
        tracing::warn!(%e, "Failed to save settings on exit");
    }
    tracing::info!("Foxhole Overlay has exited");
    Ok(())
}
