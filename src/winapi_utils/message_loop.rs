//! Windows message loop utilities.
//!
//! Runs the main thread's message pump and lets other threads (the game
//! monitor, the tray menu listener, the Ctrl+C handler) post events into it.

use std::sync::atomic::{AtomicU32, Ordering};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_APP, WM_HOTKEY,
    WM_QUIT,
};

/// Stores the main thread ID for cross-thread signaling.
static MAIN_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Thread message carrying an [`AppMessage`] in `wParam`.
const WM_APP_EVENT: u32 = WM_APP + 1;

/// Events other threads hand to the main thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMessage {
    GameStarted,
    GameStopped,
    TrayShow,
    TrayHide,
    TrayQuit,
}

impl AppMessage {
    fn to_wparam(self) -> usize {
        match self {
            AppMessage::GameStarted => 1,
            AppMessage::GameStopped => 2,
            AppMessage::TrayShow => 3,
            AppMessage::TrayHide => 4,
            AppMessage::TrayQuit => 5,
        }
    }

    fn from_wparam(value: usize) -> Option<Self> {
        Some(match value {
            1 => AppMessage::GameStarted,
            2 => AppMessage::GameStopped,
            3 => AppMessage::TrayShow,
            4 => AppMessage::TrayHide,
            5 => AppMessage::TrayQuit,
            _ => return None,
        })
    }
}

/// What the loop hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    App(AppMessage),
    /// `WM_HOTKEY` with the registered hotkey id.
    Hotkey(i32),
    /// A window message was just dispatched; window procedures may have
    /// queued input.
    Dispatched,
}

/// Records the calling thread as the main thread.
///
/// Must be called before any other thread posts to it. [`run_message_loop`]
/// calls it as well.
pub fn set_main_thread() {
    let thread_id = unsafe { GetCurrentThreadId() };
    MAIN_THREAD_ID.store(thread_id, Ordering::SeqCst);
}

/// Runs the Windows message loop until a WM_QUIT message is received.
///
/// Thread messages (hotkeys and posted [`AppMessage`]s) are not dispatched;
/// they go to `on_event` directly.
pub fn run_message_loop(mut on_event: impl FnMut(LoopEvent)) {
    set_main_thread();
    tracing::debug!(thread_id = MAIN_THREAD_ID.load(Ordering::SeqCst), "Message loop starting");

    let mut msg = MSG::default();

    unsafe {
        // GetMessageW returns:
        // - Positive: message retrieved
        // - 0: WM_QUIT received
        // - -1: error occurred
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            if msg.hwnd.0.is_null() {
                match msg.message {
                    WM_HOTKEY => on_event(LoopEvent::Hotkey(msg.wParam.0 as i32)),
                    WM_APP_EVENT => match AppMessage::from_wparam(msg.wParam.0) {
                        Some(message) => on_event(LoopEvent::App(message)),
                        None => tracing::debug!(wparam = msg.wParam.0, "Unknown app message"),
                    },
                    _ => {
                        let _ = TranslateMessage(&msg);
                        DispatchMessageW(&msg);
                    }
                }
                continue;
            }

            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
            on_event(LoopEvent::Dispatched);
        }
    }

    tracing::debug!("Message loop exited");
}

/// Posts `message` to the main thread. Safe to call from any thread.
pub fn post_app_message(message: AppMessage) {
    post_to_main(WM_APP_EVENT, message.to_wparam(), message);
}

/// Posts a WM_QUIT message to terminate the message loop.
///
/// This can be called from any thread.
pub fn post_quit_message(exit_code: i32) {
    post_to_main(WM_QUIT, exit_code as usize, exit_code);
}

fn post_to_main(msg: u32, wparam: usize, detail: impl std::fmt::Debug) {
    let main_thread_id = MAIN_THREAD_ID.load(Ordering::SeqCst);

    if main_thread_id == 0 {
        tracing::warn!(?detail, "Main thread ID not set, cannot post message");
        return;
    }

    let result = unsafe { PostThreadMessageW(main_thread_id, msg, WPARAM(wparam), LPARAM(0)) };
    match result {
        Ok(()) => {
            tracing::debug!(?detail, thread_id = main_thread_id, "Posted message to main thread")
        }
        Err(e) => tracing::error!(?e, ?detail, "Failed to post message to main thread"),
    }
}
