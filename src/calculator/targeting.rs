//! Click-interaction state machine for placing artillery and target markers.

use super::geometry::{compute_result, CalculationResult, ImageLayout, ScreenPoint};
use crate::catalog::{MapCatalog, MapEntry};
use crate::config::SettingsStore;
use crate::error::{AssetLoadError, UnknownMapError};
use std::path::PathBuf;

/// Which marker the next map click places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Artillery,
    Target,
}

/// Load state of the selected map image.
#[derive(Debug, Clone, PartialEq)]
pub enum MapStatus {
    Unselected,
    Loading(MapEntry),
    Ready(MapEntry),
    Failed { entry: MapEntry, path: PathBuf },
}

impl MapStatus {
    pub fn entry(&self) -> Option<&MapEntry> {
        match self {
            MapStatus::Unselected => None,
            MapStatus::Loading(entry) | MapStatus::Ready(entry) => Some(entry),
            MapStatus::Failed { entry, .. } => Some(entry),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, MapStatus::Ready(_))
    }
}

/// What a call to [`TargetingCalculator::register_click`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// No map image is displayed.
    NoMap,
    /// The click fell outside the rendered image.
    OutOfBounds,
    ArtilleryPlaced(ScreenPoint),
    TargetPlaced(ScreenPoint),
}

/// Calculator session state.
///
/// Points are stored relative to the rendered image's top-left corner.
#[derive(Debug)]
pub struct TargetingCalculator<'c> {
    catalog: &'c MapCatalog,
    mode: InteractionMode,
    artillery: Option<ScreenPoint>,
    target: Option<ScreenPoint>,
    layout: ImageLayout,
    status: MapStatus,
    result: Option<CalculationResult>,
}

impl<'c> TargetingCalculator<'c> {
    pub fn new(catalog: &'c MapCatalog) -> Self {
        Self {
            catalog,
            mode: InteractionMode::Artillery,
            artillery: None,
            target: None,
            layout: ImageLayout::default(),
            status: MapStatus::Unselected,
            result: None,
        }
    }

    pub fn catalog(&self) -> &'c MapCatalog {
        self.catalog
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn artillery_point(&self) -> Option<ScreenPoint> {
        self.artillery
    }

    pub fn target_point(&self) -> Option<ScreenPoint> {
        self.target
    }

    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    /// Latest result; present exactly when both points are set.
    pub fn result(&self) -> Option<CalculationResult> {
        self.result
    }

    /// Selects a sector by id.
    ///
    /// The id is validated before anything changes, so an unknown id leaves
    /// markers, status and the persisted selection exactly as they were. On
    /// success the markers are cleared, the map enters `Loading` and the entry
    /// is returned so the host can load its image.
    pub fn select_map(
        &mut self,
        map_id: &str,
        settings: &mut dyn SettingsStore,
    ) -> Result<MapEntry, UnknownMapError> {
        let entry = *self.catalog.get(map_id).ok_or_else(|| {
            tracing::warn!(map_id, "Map not found in catalog");
            UnknownMapError {
                id: map_id.to_string(),
            }
        })?;

        tracing::info!(map_id, file = entry.file_name, "Selecting map");
        self.clear_points();
        self.status = MapStatus::Loading(entry);

        if let Err(e) = settings.set_selected_map_id(map_id) {
            tracing::warn!(?e, map_id, "Failed to persist selected map");
        }

        Ok(entry)
    }

    /// Marks the image for `map_id` as displayed at `layout`.
    ///
    /// Ignored when `map_id` is not the map currently selected.
    pub fn image_loaded(&mut self, map_id: &str, layout: ImageLayout) {
        match self.status.entry() {
            Some(entry) if entry.id == map_id => {
                tracing::info!(
                    map_id,
                    width = layout.metrics.natural_width,
                    height = layout.metrics.natural_height,
                    "Map image loaded"
                );
                self.status = MapStatus::Ready(*entry);
                self.set_layout(layout);
            }
            _ => tracing::debug!(
                map_id,
                "Ignoring image load for a map that is no longer selected"
            ),
        }
    }

    /// Records that the image for `map_id` could not be loaded.
    pub fn image_failed(&mut self, map_id: &str, error: &AssetLoadError) {
        match self.status.entry() {
            Some(entry) if entry.id == map_id => {
                tracing::error!(
                    map_id,
                    path = %error.path.display(),
                    reason = %error.reason,
                    "Failed to load map"
                );
                self.status = MapStatus::Failed {
                    entry: *entry,
                    path: error.path.clone(),
                };
                self.clear_points();
            }
            _ => tracing::debug!(
                map_id,
                "Ignoring image failure for a map that is no longer selected"
            ),
        }
    }

    /// Updates where the image is rendered, e.g. after a window resize.
    ///
    /// Placed markers are rescaled so they keep pointing at the same map
    /// locations under the new displayed size.
    pub fn set_layout(&mut self, layout: ImageLayout) {
        let old = self.layout.metrics;
        let sx = layout.metrics.displayed_width / old.displayed_width;
        let sy = layout.metrics.displayed_height / old.displayed_height;

        if sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0 {
            let rescale = |point: ScreenPoint| ScreenPoint::new(point.x * sx, point.y * sy);
            self.artillery = self.artillery.map(rescale);
            self.target = self.target.map(rescale);
        } else if self.artillery.is_some() || self.target.is_some() {
            tracing::debug!(?old, new = ?layout.metrics, "Cannot rescale markers, clearing them");
            self.artillery = None;
            self.target = None;
        }

        self.layout = layout;
        self.recompute();
    }

    /// Handles a click at window coordinates `(x, y)`.
    pub fn register_click(&mut self, x: f64, y: f64) -> ClickOutcome {
        if !self.status.is_ready() {
            return ClickOutcome::NoMap;
        }

        let Some(point) = self.layout.to_image_space(x, y) else {
            tracing::debug!(x, y, "Click outside map bounds, ignoring");
            return ClickOutcome::OutOfBounds;
        };

        tracing::debug!(x = point.x, y = point.y, mode = ?self.mode, "Valid map click");

        let outcome = match self.mode {
            InteractionMode::Artillery => {
                self.artillery = Some(point);
                self.mode = InteractionMode::Target;
                ClickOutcome::ArtilleryPlaced(point)
            }
            InteractionMode::Target => {
                self.target = Some(point);
                ClickOutcome::TargetPlaced(point)
            }
        };

        self.recompute();
        outcome
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    /// Removes both markers and returns to artillery placement.
    pub fn clear(&mut self) {
        self.clear_points();
        self.mode = InteractionMode::Artillery;
    }

    fn clear_points(&mut self) {
        self.artillery = None;
        self.target = None;
        self.result = None;
    }

    fn recompute(&mut self) {
        self.result = match (self.artillery, self.target) {
            (Some(artillery), Some(target)) => {
                let result = compute_result(artillery, target, &self.layout.metrics);
                tracing::info!(
                    distance_m = %format!("{:.1}", result.distance_meters),
                    azimuth_deg = %format!("{:.1}", result.azimuth_degrees),
                    "Firing solution"
                );
                Some(result)
            }
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::geometry::MapImageMetrics;
    use crate::config::ConfigStore;

    fn layout() -> ImageLayout {
        ImageLayout {
            origin: ScreenPoint::new(0.0, 40.0),
            metrics: MapImageMetrics {
                natural_width: 1024,
                natural_height: 888,
                displayed_width: 1024.0,
                displayed_height: 888.0,
            },
        }
    }

    fn ready_calculator<'c>(
        catalog: &'c MapCatalog,
        settings: &mut ConfigStore,
    ) -> TargetingCalculator<'c> {
        let mut calc = TargetingCalculator::new(catalog);
        calc.select_map("deadlands", settings).unwrap();
        calc.image_loaded("deadlands", layout());
        calc
    }

    #[test]
    fn test_new_calculator_state() {
        let calc = TargetingCalculator::new(MapCatalog::builtin());
        assert_eq!(calc.mode(), InteractionMode::Artillery);
        assert!(calc.artillery_point().is_none());
        assert!(calc.target_point().is_none());
        assert!(calc.result().is_none());
        assert_eq!(calc.status(), &MapStatus::Unselected);
    }

    #[test]
    fn test_click_ignored_without_map() {
        let mut calc = TargetingCalculator::new(MapCatalog::builtin());
        assert_eq!(calc.register_click(10.0, 50.0), ClickOutcome::NoMap);
        assert!(calc.artillery_point().is_none());
        assert_eq!(calc.mode(), InteractionMode::Artillery);
    }

    #[test]
    fn test_click_ignored_while_loading() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("deadlands", &mut settings).unwrap();
        assert_eq!(calc.register_click(10.0, 50.0), ClickOutcome::NoMap);
    }

    #[test]
    fn test_artillery_then_target() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);

        let first = calc.register_click(100.0, 140.0);
        assert_eq!(first, ClickOutcome::ArtilleryPlaced(ScreenPoint::new(100.0, 100.0)));
        assert_eq!(calc.mode(), InteractionMode::Target);
        assert!(calc.result().is_none());

        let second = calc.register_click(100.0, 40.0);
        assert_eq!(second, ClickOutcome::TargetPlaced(ScreenPoint::new(100.0, 0.0)));
        assert_eq!(calc.mode(), InteractionMode::Target);

        let result = calc.result().unwrap();
        assert!((result.distance_meters - 100.0 * 2194.0 / 1024.0).abs() < 1e-9);
        assert_eq!(result.azimuth_degrees, 0.0);
    }

    #[test]
    fn test_repeated_target_clicks_move_target() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);

        calc.register_click(0.0, 40.0);
        calc.register_click(10.0, 40.0);
        calc.register_click(20.0, 40.0);

        assert_eq!(calc.artillery_point(), Some(ScreenPoint::new(0.0, 0.0)));
        assert_eq!(calc.target_point(), Some(ScreenPoint::new(20.0, 0.0)));
        assert_eq!(calc.mode(), InteractionMode::Target);
    }

    #[test]
    fn test_out_of_bounds_click_changes_nothing() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);

        // Toolbar area above the image
        assert_eq!(calc.register_click(100.0, 20.0), ClickOutcome::OutOfBounds);
        assert_eq!(calc.register_click(1025.0, 100.0), ClickOutcome::OutOfBounds);
        assert!(calc.artillery_point().is_none());
        assert!(calc.target_point().is_none());
        assert_eq!(calc.mode(), InteractionMode::Artillery);
    }

    #[test]
    fn test_set_mode_overrides_and_is_idempotent() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);

        calc.set_mode(InteractionMode::Target);
        calc.set_mode(InteractionMode::Target);
        assert_eq!(calc.mode(), InteractionMode::Target);

        calc.register_click(5.0, 45.0);
        assert_eq!(calc.target_point(), Some(ScreenPoint::new(5.0, 5.0)));
        assert!(calc.artillery_point().is_none());
        assert!(calc.result().is_none());

        calc.set_mode(InteractionMode::Artillery);
        calc.register_click(5.0, 55.0);
        assert!(calc.result().is_some());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);

        calc.register_click(0.0, 40.0);
        calc.register_click(10.0, 50.0);
        assert!(calc.result().is_some());

        calc.clear();
        assert!(calc.artillery_point().is_none());
        assert!(calc.target_point().is_none());
        assert!(calc.result().is_none());
        assert_eq!(calc.mode(), InteractionMode::Artillery);
        assert!(calc.status().is_ready());
    }

    #[test]
    fn test_select_map_resets_points_and_persists() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);
        calc.register_click(0.0, 40.0);
        calc.register_click(10.0, 50.0);

        let entry = calc.select_map("westgate", &mut settings).unwrap();
        assert_eq!(entry.file_name, "MapWestgateHex.png");
        assert!(calc.artillery_point().is_none());
        assert!(calc.result().is_none());
        assert_eq!(calc.status(), &MapStatus::Loading(entry));
        assert_eq!(settings.selected_map_id().as_deref(), Some("westgate"));
    }

    #[test]
    fn test_unknown_map_leaves_state_untouched() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);
        calc.register_click(0.0, 40.0);
        calc.register_click(10.0, 50.0);
        let before = calc.result();

        let err = calc.select_map("nonexistent", &mut settings).unwrap_err();
        assert_eq!(err.id, "nonexistent");
        assert_eq!(calc.result(), before);
        assert!(calc.artillery_point().is_some());
        assert!(calc.status().is_ready());
        assert_eq!(settings.selected_map_id().as_deref(), Some("deadlands"));
    }

    #[test]
    fn test_stale_image_load_ignored() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("origin", &mut settings).unwrap();
        calc.image_loaded("deadlands", layout());
        assert!(matches!(calc.status(), MapStatus::Loading(_)));
    }

    #[test]
    fn test_image_failure_records_path() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = TargetingCalculator::new(MapCatalog::builtin());
        calc.select_map("origin", &mut settings).unwrap();

        let err = AssetLoadError::new("tiles/MapOriginHex.png", "file not found");
        calc.image_failed("origin", &err);

        match calc.status() {
            MapStatus::Failed { entry, path } => {
                assert_eq!(entry.id, "origin");
                assert_eq!(path, &PathBuf::from("tiles/MapOriginHex.png"));
            }
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(calc.register_click(10.0, 50.0), ClickOutcome::NoMap);
    }

    #[test]
    fn test_relayout_keeps_markers_on_the_same_map_spot() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);
        calc.register_click(0.0, 40.0);
        calc.register_click(1024.0, 40.0);
        let before = calc.result().unwrap();
        assert!((before.distance_meters - 2194.0).abs() < 1e-9);

        let mut half = layout();
        half.metrics.displayed_width = 512.0;
        half.metrics.displayed_height = 444.0;
        calc.set_layout(half);

        let after = calc.result().unwrap();
        assert!((after.distance_meters - before.distance_meters).abs() < 1e-9);
        assert_eq!(after.azimuth_degrees, before.azimuth_degrees);
        assert_eq!(calc.artillery_point(), Some(ScreenPoint::new(0.0, 0.0)));
        assert_eq!(calc.target_point(), Some(ScreenPoint::new(512.0, 0.0)));

        let target = half.to_window_space(calc.target_point().unwrap());
        assert!(half.to_image_space(target.x, target.y).is_some());
    }

    #[test]
    fn test_relayout_to_empty_image_drops_markers() {
        let mut settings = ConfigStore::in_memory();
        let mut calc = ready_calculator(MapCatalog::builtin(), &mut settings);
        calc.register_click(0.0, 40.0);
        calc.register_click(100.0, 40.0);

        let mut collapsed = layout();
        collapsed.metrics.displayed_width = 0.0;
        collapsed.metrics.displayed_height = 0.0;
        calc.set_layout(collapsed);

        assert!(calc.artillery_point().is_none());
        assert!(calc.target_point().is_none());
        assert!(calc.result().is_none());
    }
}
