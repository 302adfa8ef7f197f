//! Fitting the map image into the overlay's client area.

use crate::calculator::{ImageLayout, MapImageMetrics, ScreenPoint};

/// Height of the toolbar strip above the map, in pixels.
pub const TOOLBAR_HEIGHT: i32 = 40;

/// Fits an image of `natural_width` x `natural_height` into the map area
/// below the toolbar, preserving aspect ratio and centering it.
pub fn fit_image(
    client_width: i32,
    client_height: i32,
    natural_width: u32,
    natural_height: u32,
) -> ImageLayout {
    let area_width = f64::from(client_width.max(0));
    let area_height = f64::from((client_height - TOOLBAR_HEIGHT).max(0));

    let metrics = |displayed_width: f64, displayed_height: f64| MapImageMetrics {
        natural_width,
        natural_height,
        displayed_width,
        displayed_height,
    };

    if natural_width == 0 || natural_height == 0 || area_width == 0.0 || area_height == 0.0 {
        return ImageLayout {
            origin: ScreenPoint::new(0.0, f64::from(TOOLBAR_HEIGHT)),
            metrics: metrics(0.0, 0.0),
        };
    }

    let fit = (area_width / f64::from(natural_width)).min(area_height / f64::from(natural_height));
    let width = f64::from(natural_width) * fit;
    let height = f64::from(natural_height) * fit;

    ImageLayout {
        origin: ScreenPoint::new(
            (area_width - width) / 2.0,
            f64::from(TOOLBAR_HEIGHT) + (area_height - height) / 2.0,
        ),
        metrics: metrics(width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_area_letterboxes_horizontally() {
        let layout = fit_image(2048, 888 + TOOLBAR_HEIGHT, 1024, 888);
        assert_eq!(layout.metrics.displayed_width, 1024.0);
        assert_eq!(layout.metrics.displayed_height, 888.0);
        assert_eq!(layout.origin, ScreenPoint::new(512.0, 40.0));
        assert_eq!(layout.metrics.scale(), 1.0);
    }

    #[test]
    fn test_fit_tall_area_letterboxes_vertically() {
        let layout = fit_image(512, 1000 + TOOLBAR_HEIGHT, 1024, 888);
        assert_eq!(layout.metrics.displayed_width, 512.0);
        assert_eq!(layout.metrics.displayed_height, 444.0);
        assert_eq!(layout.origin.x, 0.0);
        assert_eq!(layout.origin.y, 40.0 + 278.0);
        assert_eq!(layout.metrics.scale(), 2.0);
    }

    #[test]
    fn test_fit_degenerate_inputs() {
        let layout = fit_image(100, 20, 1024, 888);
        assert_eq!(layout.metrics.displayed_width, 0.0);
        assert_eq!(layout.to_image_space(50.0, 45.0), None);

        let empty = fit_image(800, 600, 0, 0);
        assert_eq!(empty.metrics.natural_width, 0);
    }
}
