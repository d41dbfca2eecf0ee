//! Application configuration: TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# lightarbiter configuration. Keys left out fall back to their defaults.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// LED class directory. Default: "/sys/class/leds".
    #[serde(default = "default_leds_root")]
    pub leds_root: String,

    /// LED directory names of the three indicator channels.
    #[serde(default = "default_red_led")]
    pub red_led: String,
    #[serde(default = "default_green_led")]
    pub green_led: String,
    #[serde(default = "default_blue_led")]
    pub blue_led: String,

    /// LED directory of the display backlight. Default: "lcd-backlight".
    #[serde(default = "default_backlight_led")]
    pub backlight_led: String,

    /// LED directory of the button backlight. Default: "button-backlight".
    #[serde(default = "default_buttons_led")]
    pub buttons_led: String,

    /// Attribute file names inside each LED directory.
    #[serde(default = "default_brightness_file")]
    pub brightness_file: String,
    #[serde(default = "default_blink_file")]
    pub blink_file: String,
    #[serde(default = "default_timing_file")]
    pub timing_file: String,

    /// Blink ramp step, in the timing file's units. Default: 1.
    #[serde(default = "default_ramp_step")]
    pub ramp_step: u32,
}

fn default_leds_root() -> String {
    "/sys/class/leds".into()
}
fn default_red_led() -> String {
    "red".into()
}
fn default_green_led() -> String {
    "green".into()
}
fn default_blue_led() -> String {
    "blue".into()
}
fn default_backlight_led() -> String {
    "lcd-backlight".into()
}
fn default_buttons_led() -> String {
    "button-backlight".into()
}
fn default_brightness_file() -> String {
    "brightness".into()
}
fn default_blink_file() -> String {
    "blink".into()
}
fn default_timing_file() -> String {
    "led_time".into()
}
fn default_ramp_step() -> u32 {
    crate::led::RAMP_STEP_DURATION
}

impl Default for Config {
    fn default() -> Self {
        Config {
            leds_root: default_leds_root(),
            red_led: default_red_led(),
            green_led: default_green_led(),
            blue_led: default_blue_led(),
            backlight_led: default_backlight_led(),
            buttons_led: default_buttons_led(),
            brightness_file: default_brightness_file(),
            blink_file: default_blink_file(),
            timing_file: default_timing_file(),
            ramp_step: default_ramp_step(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `leds_root` is empty or relative.
    InvalidRoot(String),
    /// An LED directory or attribute name is empty or contains a path separator.
    InvalidName { field: &'static str, reason: String },
    /// `ramp_step` is zero.
    ZeroRampStep,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidRoot(e) => write!(f, "Invalid leds_root: {e}"),
            ValidationError::InvalidName { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            ValidationError::ZeroRampStep => write!(f, "ramp_step must be at least 1"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightarbiter"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    fn validate_name(field: &'static str, value: &str) -> Option<ValidationError> {
        let reason = if value.trim().is_empty() {
            "cannot be empty".to_string()
        } else if value.contains('/') || value.contains('\\') {
            format!("\"{value}\" must be a single path component")
        } else if value == "." || value == ".." {
            format!("\"{value}\" is not a valid name")
        } else {
            return None;
        };
        Some(ValidationError::InvalidName { field, reason })
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.leds_root.trim().is_empty() {
            errors.push(ValidationError::InvalidRoot("cannot be empty".into()));
        } else if !Path::new(&self.leds_root).is_absolute() {
            errors.push(ValidationError::InvalidRoot(format!(
                "\"{}\" is not an absolute path",
                self.leds_root
            )));
        }

        let names = [
            ("red_led", &self.red_led),
            ("green_led", &self.green_led),
            ("blue_led", &self.blue_led),
            ("backlight_led", &self.backlight_led),
            ("buttons_led", &self.buttons_led),
            ("brightness_file", &self.brightness_file),
            ("blink_file", &self.blink_file),
            ("timing_file", &self.timing_file),
        ];
        errors.extend(
            names
                .into_iter()
                .filter_map(|(field, value)| Self::validate_name(field, value)),
        );

        if self.ramp_step == 0 {
            errors.push(ValidationError::ZeroRampStep);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
