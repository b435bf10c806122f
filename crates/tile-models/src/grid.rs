//! Longitude/latitude graticule.
//!
//! The grid has no remote source: it picks a line spacing from the current
//! map scale and lays meridians and parallels over the visible extent.

use ogc_common::{BoundingBox, ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};

use crate::provider::ModelDescriptor;

/// Line spacing in degrees, used at map scales at or above `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSetting {
    pub scale: f64,
    pub delta_lon: f64,
    pub delta_lat: f64,
}

impl GridSetting {
    pub const fn new(scale: f64, delta_lon: f64, delta_lat: f64) -> Self {
        Self {
            scale,
            delta_lon,
            delta_lat,
        }
    }
}

/// Spacing from a minute at street level to 45 degrees at world scale.
pub fn default_grid_settings() -> Vec<GridSetting> {
    vec![
        GridSetting::new(40000.0e-9, 1.0 / 60.0, 1.0 / 60.0),
        GridSetting::new(20000.0e-9, 1.0 / 30.0, 1.0 / 30.0),
        GridSetting::new(10000.0e-9, 1.0 / 10.0, 1.0 / 10.0),
        GridSetting::new(5000.0e-9, 1.0 / 2.0, 1.0 / 2.0),
        GridSetting::new(1000.0e-9, 1.0, 1.0),
        GridSetting::new(200.0e-9, 5.0, 5.0),
        GridSetting::new(20.0e-9, 10.0, 10.0),
        GridSetting::new(9.0e-9, 20.0, 20.0),
        GridSetting::new(5.0e-9, 30.0, 30.0),
        GridSetting::new(0.0, 45.0, 45.0),
    ]
}

/// Model options as carried by a layer command. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GridOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<GridSetting>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    /// Sorted by descending scale.
    settings: Vec<GridSetting>,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            settings: default_grid_settings(),
        }
    }
}

impl GridModel {
    pub fn new(options: GridOptions) -> ConnectorResult<Self> {
        let mut settings = match options.settings {
            Some(settings) if !settings.is_empty() => settings,
            _ => return Ok(Self::default()),
        };

        if let Some(bad) = settings
            .iter()
            .find(|s| !(s.delta_lon > 0.0 && s.delta_lat > 0.0) || !s.scale.is_finite())
        {
            return Err(ConnectorError::InvalidModelOptions(format!(
                "Grid setting at scale {} needs positive spacing",
                bad.scale
            )));
        }

        settings.sort_by(|a, b| b.scale.total_cmp(&a.scale));
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &[GridSetting] {
        &self.settings
    }

    /// The finest setting whose scale threshold `scale` reaches. Below every
    /// threshold the coarsest setting applies.
    pub fn setting_for_scale(&self, scale: f64) -> GridSetting {
        self.settings
            .iter()
            .find(|s| scale >= s.scale)
            .or_else(|| self.settings.last())
            .copied()
            .unwrap_or(GridSetting::new(0.0, 45.0, 45.0))
    }

    /// Longitudes of the meridians drawn inside `extent`.
    pub fn meridians(&self, scale: f64, extent: &BoundingBox) -> Vec<f64> {
        let setting = self.setting_for_scale(scale);
        lines(extent.min_x.max(-180.0), extent.max_x.min(180.0), setting.delta_lon)
    }

    /// Latitudes of the parallels drawn inside `extent`.
    pub fn parallels(&self, scale: f64, extent: &BoundingBox) -> Vec<f64> {
        let setting = self.setting_for_scale(scale);
        lines(extent.min_y.max(-90.0), extent.max_y.min(90.0), setting.delta_lat)
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::new("", "Grid", "Longitude/latitude grid")
    }
}

/// Multiples of `delta` in `[min, max]`.
fn lines(min: f64, max: f64, delta: f64) -> Vec<f64> {
    if min > max {
        return Vec::new();
    }
    let first = (min / delta).ceil() as i64;
    let last = (max / delta).floor() as i64;
    (first..=last).map(|i| i as f64 * delta).collect()
}
