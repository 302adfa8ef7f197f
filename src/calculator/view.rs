//! Render-ready view of the calculator state.
//!
//! The overlay window paints exclusively from an [`OverlayView`]; it never
//! reads calculator internals.

use super::geometry::{CalculationResult, ScreenPoint};
use super::targeting::{InteractionMode, MapStatus, TargetingCalculator};
use std::fmt;
use std::path::PathBuf;

/// Text shown in place of the map image.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    NoMapSelected,
    Loading,
    NotFound { map_id: String },
    LoadFailed { path: PathBuf },
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::NoMapSelected => write!(f, "Select a map to begin"),
            Placeholder::Loading => write!(f, "Loading map..."),
            Placeholder::NotFound { map_id } => {
                write!(f, "Map not found\nMap ID: {map_id}\nPlease select a valid map")
            }
            Placeholder::LoadFailed { path } => {
                write!(f, "Failed to load map\nPath: {}", path.display())
            }
        }
    }
}

/// Formatted distance and azimuth.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub distance: String,
    pub azimuth: String,
}

impl From<CalculationResult> for ResultsPanel {
    fn from(result: CalculationResult) -> Self {
        Self {
            distance: format_distance(result.distance_meters),
            azimuth: format_azimuth(result.azimuth_degrees),
        }
    }
}

/// Everything the renderer needs for one frame.
///
/// Marker and line coordinates are window coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayView {
    pub mode: InteractionMode,
    /// Id of the selected sector, for syncing the sector picker.
    pub selected_map: Option<String>,
    pub placeholder: Option<Placeholder>,
    pub show_image: bool,
    pub show_instructions: bool,
    pub artillery_marker: Option<ScreenPoint>,
    pub target_marker: Option<ScreenPoint>,
    pub line: Option<(ScreenPoint, ScreenPoint)>,
    pub results: Option<ResultsPanel>,
}

impl OverlayView {
    /// Replaces whatever placeholder the calculator produced with `notice`
    /// and hides the image along with anything drawn on it.
    pub fn with_notice(mut self, notice: Placeholder) -> Self {
        self.placeholder = Some(notice);
        self.show_image = false;
        self.show_instructions = false;
        self.artillery_marker = None;
        self.target_marker = None;
        self.line = None;
        self.results = None;
        self
    }
}

pub fn format_distance(meters: f64) -> String {
    format!("{meters:.1}m")
}

pub fn format_azimuth(degrees: f64) -> String {
    format!("{degrees:.1}°")
}

impl TargetingCalculator<'_> {
    pub fn view(&self) -> OverlayView {
        let layout = self.layout();
        let status = self.status();

        let placeholder = match status {
            MapStatus::Unselected => Some(Placeholder::NoMapSelected),
            MapStatus::Loading(_) => Some(Placeholder::Loading),
            MapStatus::Ready(_) => None,
            MapStatus::Failed { path, .. } => Some(Placeholder::LoadFailed { path: path.clone() }),
        };
        let ready = status.is_ready();

        let artillery_marker = self
            .artillery_point()
            .filter(|_| ready)
            .map(|p| layout.to_window_space(p));
        let target_marker = self
            .target_point()
            .filter(|_| ready)
            .map(|p| layout.to_window_space(p));

        let result = self.result().filter(|_| ready);
        let line = match (artillery_marker, target_marker, result) {
            (Some(a), Some(t), Some(_)) => Some((a, t)),
            _ => None,
        };

        OverlayView {
            mode: self.mode(),
            selected_map: status.entry().map(|entry| entry.id.to_string()),
            placeholder,
            show_image: ready,
            show_instructions: ready,
            artillery_marker,
            target_marker,
            line,
            results: result.map(ResultsPanel::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::geometry::{ImageLayout, MapImageMetrics};
    use crate::catalog::MapCatalog;
    use crate::config::ConfigStore;
    use crate::error::AssetLoadError;

    fn layout() -> ImageLayout {
        ImageLayout {
            origin: ScreenPoint::new(20.0, 40.0),
            metrics: MapImageMetrics {
                natural_width: 1024,
                natural_height: 888,
                displayed_width: 512.0,
                displayed_height: 444.0,
            },
        }
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_distance(2194.0), "2194.0m");
        assert_eq!(format_distance(12.345), "12.3m");
        assert_eq!(format_azimuth(90.0), "90.0°");
        assert_eq!(format_azimuth(359.96), "360.0°");
    }

    #[test]
    fn test_view_without_map() {
        let calc = crate::calculator::TargetingCalculator::new(MapCatalog::builtin());
        let view = calc.view();
        assert_eq!(view.placeholder, Some(Placeholder::NoMapSelected));
        assert!(!view.show_image);
        assert!(view.results.is_none());
        assert!(view.selected_map.is_none());
    }

    #[test]
    fn test_view_markers_in_window_space() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = crate::calculator::TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("origin", &mut settings).unwrap();
        assert_eq!(calc.view().placeholder, Some(Placeholder::Loading));

        calc.image_loaded("origin", layout());
        calc.register_click(20.0, 40.0);

        let view = calc.view();
        assert!(view.placeholder.is_none());
        assert!(view.show_instructions);
        assert_eq!(view.artillery_marker, Some(ScreenPoint::new(20.0, 40.0)));
        assert!(view.target_marker.is_none());
        assert!(view.line.is_none());
        assert!(view.results.is_none());
        assert_eq!(view.mode, InteractionMode::Target);

        calc.register_click(276.0, 40.0);
        let view = calc.view();
        let (from, to) = view.line.unwrap();
        assert_eq!(from, ScreenPoint::new(20.0, 40.0));
        assert_eq!(to, ScreenPoint::new(276.0, 40.0));

        let panel = view.results.unwrap();
        // 256 displayed px at scale 2 is one hex width
        assert_eq!(panel.distance, "1097.0m");
        assert_eq!(panel.azimuth, "90.0°");
        assert_eq!(view.selected_map.as_deref(), Some("origin"));
    }

    #[test]
    fn test_view_after_load_failure() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = crate::calculator::TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("origin", &mut settings).unwrap();
        calc.image_failed("origin", &AssetLoadError::new("x/MapOriginHex.png", "missing"));

        let view = calc.view();
        let placeholder = view.placeholder.unwrap();
        assert!(placeholder.to_string().contains("x/MapOriginHex.png"));
        assert!(!view.show_image);
    }

    #[test]
    fn test_notice_overrides_placeholder() {
        let calc = crate::calculator::TargetingCalculator::new(MapCatalog::builtin());
        let view = calc.view().with_notice(Placeholder::NotFound {
            map_id: "atlantis".to_string(),
        });
        let text = view.placeholder.unwrap().to_string();
        assert!(text.starts_with("Map not found"));
        assert!(text.contains("atlantis"));
    }

    #[test]
    fn test_notice_hides_markers_and_results() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = crate::calculator::TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("origin", &mut settings).unwrap();
        calc.image_loaded("origin", layout());
        calc.register_click(20.0, 40.0);
        calc.register_click(276.0, 40.0);
        assert!(calc.view().results.is_some());

        let view = calc.view().with_notice(Placeholder::NotFound {
            map_id: "atlantis".to_string(),
        });
        assert!(!view.show_image);
        assert!(view.artillery_marker.is_none());
        assert!(view.target_marker.is_none());
        assert!(view.line.is_none());
        assert!(view.results.is_none());
        assert_eq!(view.selected_map.as_deref(), Some("origin"));
    }
}
