//! Platform-neutral pieces of the host shell.
//!
//! The Win32 side lives in `winapi_utils` and `tray`; everything here is
//! plain data and can be tested on any platform.

pub mod accelerator;
pub mod bounds;
pub mod layout;

pub use accelerator::*;
pub use bounds::*;
pub use layout::*;
