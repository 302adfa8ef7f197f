//! Overlay window placement.

use serde::{Deserialize, Serialize};

/// Fraction of the work area the overlay covers by default.
const DEFAULT_FRACTION: f64 = 0.75;

/// Saved bounds larger than this fraction of the work area are treated as
/// an accidental fullscreen/maximized state.
const FULLSCREEN_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Usable area of the primary display (excluding the taskbar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Result of checking saved bounds against the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Saved bounds are usable as-is.
    Saved(WindowBounds),
    /// No usable saved bounds. `replaced` is set when saved bounds existed
    /// but were rejected, so the caller should overwrite them.
    Default { bounds: WindowBounds, replaced: bool },
}

impl Placement {
    pub fn bounds(&self) -> WindowBounds {
        match *self {
            Placement::Saved(bounds) | Placement::Default { bounds, .. } => bounds,
        }
    }
}

/// 75% of the work area, centered.
pub fn default_bounds(work: WorkArea) -> WindowBounds {
    let width = (f64::from(work.width) * DEFAULT_FRACTION).floor() as i32;
    let height = (f64::from(work.height) * DEFAULT_FRACTION).floor() as i32;

    WindowBounds {
        x: work.x + (work.width - width) / 2,
        y: work.y + (work.height - height) / 2,
        width,
        height,
    }
}

/// Picks the overlay bounds from what was saved last time.
pub fn choose_placement(saved: Option<WindowBounds>, work: WorkArea) -> Placement {
    let default = default_bounds(work);

    let Some(saved) = saved else {
        return Placement::Default {
            bounds: default,
            replaced: false,
        };
    };

    let too_wide = f64::from(saved.width) > f64::from(work.width) * FULLSCREEN_FRACTION;
    let too_tall = f64::from(saved.height) > f64::from(work.height) * FULLSCREEN_FRACTION;
    let degenerate = saved.width <= 0 || saved.height <= 0;

    if too_wide || too_tall || degenerate {
        tracing::info!(
            width = saved.width,
            height = saved.height,
            "Saved bounds appear to be fullscreen or invalid, resetting to default"
        );
        return Placement::Default {
            bounds: default,
            replaced: true,
        };
    }

    Placement::Saved(saved)
}
