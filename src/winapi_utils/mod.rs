//! Safe wrappers around Windows API calls.
//!
//! This module provides safe Rust abstractions over unsafe WinAPI functions
//! for process enumeration, global hotkeys, the message loop, image decoding
//! and the overlay window.

pub mod hotkey;
pub mod image;
pub mod message_loop;
pub mod process;
pub mod window;

pub use hotkey::*;
pub use image::*;
pub use message_loop::*;
pub use process::*;
pub use window::*;
