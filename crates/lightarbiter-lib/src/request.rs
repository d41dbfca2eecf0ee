//! Light requests and the identifiers they are addressed to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LightsError;

/// Low 24 bits of a packed color: the RGB part.
pub const RGB_MASK: u32 = 0x00FF_FFFF;

/// How the requester wants the light to flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Steady color.
    #[default]
    None,
    /// Software-timed blinking using `flash_on_ms` / `flash_off_ms`.
    Timed,
    /// Hardware-assisted flashing (attention pulses).
    Hardware,
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashMode::None => write!(f, "none"),
            FlashMode::Timed => write!(f, "timed"),
            FlashMode::Hardware => write!(f, "hardware"),
        }
    }
}

impl FromStr for FlashMode {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FlashMode::None),
            "timed" => Ok(FlashMode::Timed),
            "hardware" => Ok(FlashMode::Hardware),
            other => Err(LightsError::InvalidArgument(format!(
                "unknown flash mode \"{other}\" (use none, timed or hardware)"
            ))),
        }
    }
}

/// A single light state request, as handed over by the caller.
///
/// Requests are captured by value and replace the previous request for the
/// same light wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightRequest {
    /// Packed `0xAARRGGBB`; only the low 24 bits are displayed.
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
}

impl LightRequest {
    /// Steady color, no flashing.
    pub fn steady(color: u32) -> Self {
        LightRequest {
            color,
            ..Default::default()
        }
    }

    /// Software-timed blink.
    pub fn timed(color: u32, on_ms: u32, off_ms: u32) -> Self {
        LightRequest {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
        }
    }

    /// Hardware flash, as used for attention pulses.
    pub fn hardware(color: u32, on_ms: u32, off_ms: u32) -> Self {
        LightRequest {
            color,
            flash_mode: FlashMode::Hardware,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
        }
    }

    /// The displayed RGB part of the color.
    pub fn rgb(&self) -> u32 {
        self.color & RGB_MASK
    }

    /// Whether the request shows anything at all.
    pub fn is_lit(&self) -> bool {
        self.rgb() != 0
    }
}

/// The arbitrated sources sharing the notification LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Battery,
    Notification,
    Attention,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Battery => write!(f, "battery"),
            Role::Notification => write!(f, "notification"),
            Role::Attention => write!(f, "attention"),
        }
    }
}

/// Names a light can be opened by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightId {
    Backlight,
    Battery,
    Notifications,
    Attention,
    Buttons,
}

impl LightId {
    pub const ALL: [LightId; 5] = [
        LightId::Backlight,
        LightId::Battery,
        LightId::Notifications,
        LightId::Attention,
        LightId::Buttons,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LightId::Backlight => "backlight",
            LightId::Battery => "battery",
            LightId::Notifications => "notifications",
            LightId::Attention => "attention",
            LightId::Buttons => "buttons",
        }
    }

    /// The arbitrated role behind this light, if it shares the indicator.
    pub fn role(self) -> Option<Role> {
        match self {
            LightId::Battery => Some(Role::Battery),
            LightId::Notifications => Some(Role::Notification),
            LightId::Attention => Some(Role::Attention),
            LightId::Backlight | LightId::Buttons => None,
        }
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightId {
    type Err = LightsError;

    /// Exact match only; identifiers are compared byte for byte.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LightId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LightsError::UnsupportedRole(s.to_string()))
    }
}
