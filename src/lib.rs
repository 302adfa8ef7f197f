//! Foxhole Overlay.
//!
//! A tray companion for Foxhole: it watches for the game process, toggles an
//! always-on-top overlay with a global hotkey and computes artillery distance
//! and azimuth from two clicks on a hex map.
//!
//! The application never reads game memory, injects code, hooks graphics
//! APIs or simulates input. It only looks at process names.

pub mod app;
pub mod assets;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod instance;
pub mod monitor;
pub mod shell;

#[cfg(windows)]
pub mod tray;
#[cfg(windows)]
pub mod winapi_utils;
