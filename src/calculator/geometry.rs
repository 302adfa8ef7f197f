//! Pixel geometry and the distance/azimuth computation.

/// World metres covered by one native pixel of a hex tile image.
///
/// A hex tile is 2194 m wide and its image is 1024 native pixels wide.
pub const METERS_PER_NATIVE_PIXEL: f64 = 2194.0 / 1024.0;

/// A point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x + by.x, self.y + by.y)
    }
}

/// Native and on-screen dimensions of the loaded map image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapImageMetrics {
    pub natural_width: u32,
    pub natural_height: u32,
    pub displayed_width: f64,
    pub displayed_height: f64,
}

impl MapImageMetrics {
    /// Native pixels per displayed pixel.
    ///
    /// Falls back to 1.0 when the displayed or native width is unusable so a
    /// bad layout never poisons the result with NaN or infinity.
    pub fn scale(&self) -> f64 {
        let scale = f64::from(self.natural_width) / self.displayed_width;
        if self.natural_width == 0 || !scale.is_finite() || scale <= 0.0 {
            tracing::debug!(?self, "Unusable image metrics, using unit scale");
            return 1.0;
        }
        scale
    }
}

/// Where the map image sits inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageLayout {
    /// Top-left corner of the rendered image in window coordinates.
    pub origin: ScreenPoint,
    pub metrics: MapImageMetrics,
}

impl ImageLayout {
    /// Converts a window-space point to image-space, or `None` when the
    /// point lies outside the rendered image. Edges count as inside.
    pub fn to_image_space(&self, x: f64, y: f64) -> Option<ScreenPoint> {
        let local = ScreenPoint::new(x - self.origin.x, y - self.origin.y);
        let width = self.metrics.displayed_width;
        let height = self.metrics.displayed_height;

        let inside = local.x >= 0.0 && local.x <= width && local.y >= 0.0 && local.y <= height;
        inside.then_some(local)
    }

    pub fn to_window_space(&self, point: ScreenPoint) -> ScreenPoint {
        point.offset(self.origin)
    }
}

/// Distance and bearing between the artillery and target points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationResult {
    pub distance_meters: f64,
    /// Clockwise from screen up, in `[0, 360)`.
    pub azimuth_degrees: f64,
}

/// Straight-line distance between two points in displayed pixels.
pub fn pixel_distance(from: ScreenPoint, to: ScreenPoint) -> f64 {
    (to.x - from.x).hypot(to.y - from.y)
}

/// Bearing from `from` to `to`, 0 = up, 90 = right.
pub fn azimuth_degrees(from: ScreenPoint, to: ScreenPoint) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let degrees = dx.atan2(-dy).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Computes the world distance and azimuth between two image-space points.
pub fn compute_result(
    artillery: ScreenPoint,
    target: ScreenPoint,
    metrics: &MapImageMetrics,
) -> CalculationResult {
    let distance_meters =
        pixel_distance(artillery, target) * metrics.scale() * METERS_PER_NATIVE_PIXEL;

    CalculationResult {
        distance_meters,
        azimuth_degrees: azimuth_degrees(artillery, target),
    }
}
