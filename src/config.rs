//! Viewer configuration.
//!
//! Settings are read from JSON objects with camelCase keys. A project's file
//! only needs the keys it overrides; every missing or malformed key falls back
//! to the built-in defaults in `config/defaultviewerconfig.json`.

use crate::color::{Color, VehicleColorMode};
use crate::transform::ViewTransform;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

/// The default configuration shipped with the crate.
const DEFAULT_CONFIG: &str = include_str!("../config/defaultviewerconfig.json");

static DEFAULTS: Lazy<ViewProperties> =
    Lazy::new(|| match ViewProperties::fallback().overlay_json(DEFAULT_CONFIG) {
        Ok(properties) => properties,
        Err(err) => {
            error!("Failed to read the default viewer configuration: {}", err);
            ViewProperties::fallback()
        }
    });

/// An error reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("configuration must be a JSON object")]
    NotAnObject,
}

/// The settings that control what the view draws and how.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewProperties {
    pub draw_road_id: bool,
    pub draw_sources: bool,
    pub draw_sinks: bool,
    pub draw_speed_limits: bool,
    pub draw_slopes: bool,
    pub background_color: Color,
    pub road_color: Color,
    pub road_edge_color: Color,
    pub road_line_color: Color,
    pub source_color: Color,
    pub sink_color: Color,
    pub vehicle_color_mode: VehicleColorMode,
    /// The speed at the top of the velocity colour spectrum in km/h.
    pub vmax_for_color_spectrum: f64,
    /// The width of lane lines in world units.
    pub line_width: f64,
    /// The length of lane line dashes in world units.
    pub line_length: f64,
    /// The gap between lane line dashes in world units.
    pub gap_length: f64,
    /// The gap between dashes of the line bounding the exit lanes.
    pub gap_length_exit: f64,
    pub initial_scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    /// The initial pause between simulation ticks in ms.
    pub initial_sleep_time: u32,
}

impl Default for ViewProperties {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

impl ViewProperties {
    /// The settings used if even the embedded defaults cannot be read.
    fn fallback() -> Self {
        Self {
            draw_road_id: true,
            draw_sources: true,
            draw_sinks: true,
            draw_speed_limits: true,
            draw_slopes: true,
            background_color: Color::rgb(0x30, 0x30, 0x30),
            road_color: Color::rgb(0x80, 0x80, 0x80),
            road_edge_color: Color::rgb(0x22, 0x22, 0x22),
            road_line_color: Color::rgb(0xdd, 0xdd, 0xdd),
            source_color: Color::WHITE,
            sink_color: Color::BLACK,
            vehicle_color_mode: VehicleColorMode::VelocityColor,
            vmax_for_color_spectrum: 140.0,
            line_width: 1.0,
            line_length: 5.0,
            gap_length: 15.0,
            gap_length_exit: 6.0,
            initial_scale: 0.707106781,
            x_offset: 0.0,
            y_offset: 0.0,
            initial_sleep_time: 20,
        }
    }

    /// Loads the settings for a project from `<dir>/<project_name>.json`.
    ///
    /// Never fails: if the file is missing or unreadable the defaults are used.
    pub fn load(project_name: &str, dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(format!("{}.json", project_name));
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No viewer configuration at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                warn!("{}", ConfigError::from(err));
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(properties) => {
                info!("Loaded viewer configuration from {}", path.display());
                properties
            }
            Err(err) => {
                warn!("{} in {}, using defaults", err, path.display());
                Self::default()
            }
        }
    }

    /// Parses settings from JSON, taking unspecified keys from the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::default().overlay_json(json)
    }

    /// Overrides these settings with the keys present in a JSON object.
    pub fn overlay_json(&self, json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(self.overlay(&map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Overrides these settings with the keys present in `map`.
    ///
    /// Keys with values of the wrong type are skipped with a warning.
    pub fn overlay(&self, map: &Map<String, Value>) -> Self {
        let mut out = self.clone();
        read_key(map, "drawRoadId", &mut out.draw_road_id);
        read_key(map, "drawSources", &mut out.draw_sources);
        read_key(map, "drawSinks", &mut out.draw_sinks);
        read_key(map, "drawSpeedLimits", &mut out.draw_speed_limits);
        read_key(map, "drawSlopes", &mut out.draw_slopes);
        read_key(map, "backgroundColor", &mut out.background_color);
        read_key(map, "roadColor", &mut out.road_color);
        read_key(map, "roadEdgeColor", &mut out.road_edge_color);
        read_key(map, "roadLineColor", &mut out.road_line_color);
        read_key(map, "sourceColor", &mut out.source_color);
        read_key(map, "sinkColor", &mut out.sink_color);
        read_key(map, "vehicleColorMode", &mut out.vehicle_color_mode);
        read_key(map, "vmaxForColorSpectrum", &mut out.vmax_for_color_spectrum);
        read_key(map, "lineWidth", &mut out.line_width);
        read_key(map, "lineLength", &mut out.line_length);
        read_key(map, "gapLength", &mut out.gap_length);
        read_key(map, "gapLengthExit", &mut out.gap_length_exit);
        read_key(map, "initialScale", &mut out.initial_scale);
        read_key(map, "xOffset", &mut out.x_offset);
        read_key(map, "yOffset", &mut out.y_offset);
        read_key(map, "initial_sleep_time", &mut out.initial_sleep_time);

        if !(out.initial_scale.is_finite() && out.initial_scale > 0.0) {
            warn!(
                "Ignoring invalid value for initialScale: {}",
                out.initial_scale
            );
            out.initial_scale = self.initial_scale;
        }
        out
    }

    /// The view transform the view starts with, and returns to on reset.
    ///
    /// An invalid `initial_scale` is replaced by the default scale.
    pub fn initial_transform(&self) -> ViewTransform {
        match ViewTransform::try_new(self.initial_scale, self.x_offset, self.y_offset) {
            Some(transform) => transform,
            None => {
                warn!("Ignoring invalid initial scale {}", self.initial_scale);
                ViewTransform::new(DEFAULTS.initial_scale, self.x_offset, self.y_offset)
            }
        }
    }
}

/// Overwrites `target` with the value of `key`, if it is present and well-formed.
fn read_key<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, target: &mut T) {
    if let Some(value) = map.get(key) {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => *target = parsed,
            Err(err) => warn!("Ignoring invalid value for {}: {}", key, err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    #[test]
    fn embedded_defaults_match_fallback() {
        assert_eq!(ViewProperties::default(), ViewProperties::fallback());
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let json = r##"{ "roadColor": "#102030", "lineWidth": 2.5 }"##;
        let properties = ViewProperties::from_json(json).unwrap();
        assert_eq!(properties.road_color, Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(properties.line_width, 2.5);
        assert_eq!(properties.gap_length, 15.0);
        assert_eq!(properties.vehicle_color_mode, VehicleColorMode::VelocityColor);
    }

    #[test]
    fn malformed_keys_fall_back_individually() {
        let properties = ViewProperties::from_json(
            r#"{
                "roadColor": "not a colour",
                "drawSinks": "sometimes",
                "vehicleColorMode": "EXIT_COLOR",
                "initialScale": -2.0,
                "initial_sleep_time": 5
            }"#,
        )
        .unwrap();
        let defaults = ViewProperties::default();
        assert_eq!(properties.road_color, defaults.road_color);
        assert_eq!(properties.draw_sinks, defaults.draw_sinks);
        assert_eq!(properties.initial_scale, defaults.initial_scale);
        assert_eq!(properties.vehicle_color_mode, VehicleColorMode::ExitColor);
        assert_eq!(properties.initial_sleep_time, 5);
    }

    #[test]
    fn invalid_initial_scale_uses_default() {
        for initial_scale in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let properties = ViewProperties {
                initial_scale,
                x_offset: 3.0,
                ..ViewProperties::default()
            };
            let transform = properties.initial_transform();
            assert_eq!(transform.scale(), ViewProperties::default().initial_scale);
            assert_eq!(transform.x_offset(), 3.0);
        }
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            ViewProperties::from_json("[1, 2, 3]"),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            ViewProperties::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = env::temp_dir().join(format!("traffic-view-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(ViewProperties::load("missing", &dir), ViewProperties::default());

        fs::write(dir.join("broken.json"), "not json").unwrap();
        assert_eq!(ViewProperties::load("broken", &dir), ViewProperties::default());

        fs::write(dir.join("ringroad.json"), r#"{ "drawRoadId": false }"#).unwrap();
        let properties = ViewProperties::load("ringroad", &dir);
        assert!(!properties.draw_road_id);
        assert!(properties.draw_sources);

        fs::remove_dir_all(&dir).unwrap();
    }
}
