//! Game process monitoring.
//!
//! This module contains the process-name matcher, the running/stopped
//! transition logic and the polling thread that drives it.

pub mod game_poller;
pub mod matcher;
pub mod source;
pub mod transition;

pub use game_poller::*;
pub use matcher::*;
pub use source::*;
pub use transition::*;
