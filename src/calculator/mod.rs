//! Artillery calculator.
//!
//! Turns two clicks on a hex tile image into a distance in metres and an
//! azimuth in degrees, and tracks which marker the next click places.

pub mod geometry;
pub mod shortcuts;
pub mod targeting;
pub mod view;

pub use geometry::*;
pub use shortcuts::*;
pub use targeting::*;
pub use view::*;
