//! Colours, and the mapping from vehicle state to display colour.

use crate::traffic::Vehicle;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// An opaque-by-default ARGB colour.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const MAGENTA: Color = Color::rgb(0xff, 0x00, 0xff);
    pub const DARK_GRAY: Color = Color::rgb(0x44, 0x44, 0x44);

    /// Creates an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Creates a random opaque colour.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.a, self.r, self.g, self.b
        )
    }
}

/// The error returned when parsing a colour fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour `{0}`, expected RRGGBB or AARRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `RRGGBB` or `AARRGGBB` hex, with an optional leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        let [a, r, g, b] = value.to_be_bytes();
        match hex.len() {
            6 => Ok(Color::rgb(r, g, b)),
            8 => Ok(Color { r, g, b, a }),
            _ => Err(err()),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hue of the lowest speed in the spectrum (red).
const HUE_VMIN: f64 = 1.00;
/// Hue of the highest speed in the spectrum (violet-blue, once wrapped).
const HUE_VMAX: f64 = 1.84;
const SPECTRUM_SATURATION: f64 = 1.0;
const SPECTRUM_BRIGHTNESS: f64 = 0.92;

/// Upper bounds of the acceleration buckets, in m/s^2.
pub const ACCELERATION_THRESHOLDS: [f64; 3] = [-7.5, -0.1, 0.2];

/// Colours of the acceleration buckets: strong braking, braking, cruising, accelerating.
pub const ACCELERATION_COLORS: [Color; 4] = [Color::WHITE, Color::RED, Color::BLACK, Color::GREEN];

/// Converts hue, saturation and value (each in [0, 1]) to RGB.
///
/// The hue wraps around, so `h` and `h + 1` give the same colour.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h = (h % 1.0 + 1.0) % 1.0;
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [r, g, b].map(|x| f64::min(x * 256.0, 255.0) as u8)
}

/// Maps a speed onto a spectrum running from red (`vmin`) to violet-blue (`vmax`).
/// Vehicles that are not moving are black.
pub fn color_for_speed(vmin: f64, vmax: f64, v: f64) -> Color {
    if v <= 0.0 {
        return Color::BLACK;
    }
    let v_relative = if vmax > vmin {
        ((v - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let hue = HUE_VMIN + v_relative * (HUE_VMAX - HUE_VMIN);
    let [r, g, b] = hsv_to_rgb(hue, SPECTRUM_SATURATION, SPECTRUM_BRIGHTNESS);
    Color::rgb(r, g, b)
}

/// Gets the colour of the first acceleration bucket whose threshold exceeds `acc`.
pub fn acceleration_color(acc: f64) -> Color {
    ACCELERATION_THRESHOLDS
        .iter()
        .position(|threshold| acc < *threshold)
        .map(|idx| ACCELERATION_COLORS[idx])
        .unwrap_or(ACCELERATION_COLORS[ACCELERATION_COLORS.len() - 1])
}

/// How vehicles are coloured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleColorMode {
    /// By speed, along a red to violet-blue spectrum.
    #[default]
    VelocityColor,
    LaneChange,
    /// By acceleration bucket.
    AccelerationColor,
    /// A random colour assigned to each vehicle.
    VehicleColor,
    VehicleLabelColor,
    HighlightVehicle,
    /// As [VehicleColorMode::VehicleColor], but white once the vehicle has an exit.
    ExitColor,
}

/// Picks vehicle colours according to a [VehicleColorMode].
pub struct VehicleColorizer<R = rand::rngs::ThreadRng> {
    mode: VehicleColorMode,
    /// The speed at the top of the spectrum, in km/h.
    vmax: f64,
    rng: R,
}

impl VehicleColorizer {
    pub fn new(mode: VehicleColorMode, vmax: f64) -> Self {
        Self::with_rng(mode, vmax, rand::thread_rng())
    }
}

impl<R: Rng> VehicleColorizer<R> {
    /// Creates a colorizer drawing random vehicle colours from `rng`.
    pub fn with_rng(mode: VehicleColorMode, vmax: f64, rng: R) -> Self {
        Self { mode, vmax, rng }
    }

    pub fn mode(&self) -> VehicleColorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: VehicleColorMode) {
        self.mode = mode;
    }

    /// The speed at the top of the spectrum, in km/h.
    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn set_vmax(&mut self, vmax: f64) {
        self.vmax = vmax;
    }

    /// Gets the colour of a vehicle, assigning it a colour of its own if the mode needs one.
    pub fn vehicle_color(&mut self, vehicle: &mut Vehicle) -> Color {
        use VehicleColorMode::*;
        match self.mode {
            VelocityColor => color_for_speed(0.0, self.vmax, vehicle.speed() * 3.6),
            AccelerationColor => acceleration_color(vehicle.acc()),
            ExitColor => {
                let color = self.own_color(vehicle);
                if vehicle.exit_road_segment().is_some() {
                    Color::WHITE
                } else {
                    color
                }
            }
            // Lane change, label and highlight colouring have no rule of their own yet
            VehicleColor | LaneChange | VehicleLabelColor | HighlightVehicle => {
                self.own_color(vehicle)
            }
        }
    }

    fn own_color(&mut self, vehicle: &mut Vehicle) -> Color {
        match vehicle.color() {
            Some(color) => color,
            None => {
                let color = Color::random(&mut self.rng);
                vehicle.set_color(color);
                color
            }
        }
    }
}
