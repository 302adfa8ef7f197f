//! Icon creation for the system tray.

use tray_icon::Icon;

/// Draws the tray icon: a crosshair over an olive disc.
pub fn create_default_icon() -> Result<Icon, Box<dyn std::error::Error>> {
    let size = 32u32;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let center = size as f32 / 2.0;
    let radius = center - 2.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let distance = (dx * dx + dy * dy).sqrt();

            let on_crosshair = (dx.abs() < 1.0 || dy.abs() < 1.0) && distance <= radius - 3.0;
            let on_ring = (distance - (radius - 1.0)).abs() < 1.0;

            let pixel: [u8; 4] = if on_crosshair || on_ring {
                [235, 64, 52, 255]
            } else if distance <= radius {
                [94, 107, 62, 255]
            } else {
                [0, 0, 0, 0]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    Icon::from_rgba(rgba, size, size).map_err(|e| e.into())
}
