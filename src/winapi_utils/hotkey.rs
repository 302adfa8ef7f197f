//! Global hotkey registration.
//!
//! Provides an RAII wrapper around `RegisterHotKey` so the hotkey is
//! released when the guard goes out of scope.

use crate::error::HotkeyError;
use crate::shell::{Accelerator, Key};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
    MOD_SHIFT, MOD_WIN, VIRTUAL_KEY, VK_DELETE, VK_END, VK_F1, VK_HOME, VK_INSERT, VK_NEXT,
    VK_PRIOR, VK_SPACE, VK_TAB,
};

/// Id passed to `RegisterHotKey`; `WM_HOTKEY` carries it in `wParam`.
pub const OVERLAY_HOTKEY_ID: i32 = 1;

/// RAII guard for a thread-level global hotkey.
///
/// The hotkey is registered without a window, so `WM_HOTKEY` lands in the
/// registering thread's message queue. Must be dropped on that thread.
pub struct HotkeyGuard {
    id: i32,
    accelerator: Accelerator,
}

impl HotkeyGuard {
    pub fn register(id: i32, accelerator: Accelerator) -> Result<Self, HotkeyError> {
        let (modifiers, vk) = to_native(&accelerator);

        unsafe { RegisterHotKey(None, id, modifiers | MOD_NOREPEAT, u32::from(vk.0)) }.map_err(|e| {
            HotkeyError::Registration {
                accelerator: accelerator.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::info!(%accelerator, id, "Hotkey registered");
        Ok(Self { id, accelerator })
    }
}

impl Drop for HotkeyGuard {
    fn drop(&mut self) {
        match unsafe { UnregisterHotKey(None, self.id) } {
            Ok(()) => tracing::info!(accelerator = %self.accelerator, "Hotkey unregistered"),
            Err(e) => {
                tracing::warn!(?e, accelerator = %self.accelerator, "Failed to unregister hotkey")
            }
        }
    }
}

fn to_native(accelerator: &Accelerator) -> (HOT_KEY_MODIFIERS, VIRTUAL_KEY) {
    let m = accelerator.modifiers;
    let mut modifiers = HOT_KEY_MODIFIERS(0);
    if m.ctrl {
        modifiers |= MOD_CONTROL;
    }
    if m.alt {
        modifiers |= MOD_ALT;
    }
    if m.shift {
        modifiers |= MOD_SHIFT;
    }
    if m.super_key {
        modifiers |= MOD_WIN;
    }

    (modifiers, virtual_key(accelerator.key))
}

fn virtual_key(key: Key) -> VIRTUAL_KEY {
    match key {
        // VK_F1..VK_F24 are contiguous
        Key::Function(n) => VIRTUAL_KEY(VK_F1.0 + u16::from(n.saturating_sub(1))),
        // Letters and digits use their uppercase ASCII code
        Key::Char(c) => VIRTUAL_KEY(c.to_ascii_uppercase() as u16),
        Key::Space => VK_SPACE,
        Key::Tab => VK_TAB,
        Key::Insert => VK_INSERT,
        Key::Delete => VK_DELETE,
        Key::Home => VK_HOME,
        Key::End => VK_END,
        Key::PageUp => VK_PRIOR,
        Key::PageDown => VK_NEXT,
    }
}
