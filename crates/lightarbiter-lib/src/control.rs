//! Control points: write-only LED attributes + sysfs backend.

use std::collections::HashSet;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::config::Config;
use crate::error::EIO;

// ── Control points ──

/// One color channel of the shared indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// The channel's 8-bit component of a packed `0xAARRGGBB` color.
    pub fn component(self, color: u32) -> u8 {
        let shift = match self {
            Channel::Red => 16,
            Channel::Green => 8,
            Channel::Blue => 0,
        };
        ((color >> shift) & 0xFF) as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single write target on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlPoint {
    /// Channel brightness, 0-255.
    Brightness(Channel),
    /// Channel blink enable, 0 or 1.
    Blink(Channel),
    /// Channel blink timing, `"rise hold fall off"`.
    BlinkTiming(Channel),
    /// Display backlight brightness.
    Backlight,
    /// Button backlight brightness.
    Buttons,
}

impl ControlPoint {
    /// Every control point the module can touch, in listing order.
    pub const ALL: [ControlPoint; 11] = [
        ControlPoint::Brightness(Channel::Red),
        ControlPoint::Brightness(Channel::Green),
        ControlPoint::Brightness(Channel::Blue),
        ControlPoint::Blink(Channel::Red),
        ControlPoint::Blink(Channel::Green),
        ControlPoint::Blink(Channel::Blue),
        ControlPoint::BlinkTiming(Channel::Red),
        ControlPoint::BlinkTiming(Channel::Green),
        ControlPoint::BlinkTiming(Channel::Blue),
        ControlPoint::Backlight,
        ControlPoint::Buttons,
    ];
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlPoint::Brightness(c) => write!(f, "{c} brightness"),
            ControlPoint::Blink(c) => write!(f, "{c} blink"),
            ControlPoint::BlinkTiming(c) => write!(f, "{c} blink timing"),
            ControlPoint::Backlight => write!(f, "backlight"),
            ControlPoint::Buttons => write!(f, "buttons"),
        }
    }
}

// ── Error type ──

/// A failed write to one control point.
#[derive(Debug)]
pub struct ControlPointError {
    pub point: ControlPoint,
    pub source: std::io::Error,
}

impl ControlPointError {
    /// Positive OS error number of the failure (`EIO` when the OS gave none).
    pub fn errno(&self) -> i32 {
        self.source.raw_os_error().unwrap_or(EIO)
    }
}

impl fmt::Display for ControlPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to write {}: {}", self.point, self.source)
    }
}

impl std::error::Error for ControlPointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

pub type Result<T> = std::result::Result<T, ControlPointError>;

// ── Trait ──

/// Sink for control-point writes.
///
/// Values are written as decimal ASCII; implementations append the
/// terminating newline.
pub trait ControlPointWriter {
    fn write_str(&self, point: ControlPoint, value: &str) -> Result<()>;

    fn write_int(&self, point: ControlPoint, value: u32) -> Result<()> {
        self.write_str(point, &value.to_string())
    }
}

// ── Sysfs layout ──

/// Resolves control points to files under an LED class directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointPaths {
    pub root: PathBuf,
    pub red_led: String,
    pub green_led: String,
    pub blue_led: String,
    pub backlight_led: String,
    pub buttons_led: String,
    pub brightness_file: String,
    pub blink_file: String,
    pub timing_file: String,
}

impl ControlPointPaths {
    pub fn from_config(config: &Config) -> Self {
        ControlPointPaths {
            root: PathBuf::from(&config.leds_root),
            red_led: config.red_led.clone(),
            green_led: config.green_led.clone(),
            blue_led: config.blue_led.clone(),
            backlight_led: config.backlight_led.clone(),
            buttons_led: config.buttons_led.clone(),
            brightness_file: config.brightness_file.clone(),
            blink_file: config.blink_file.clone(),
            timing_file: config.timing_file.clone(),
        }
    }

    /// Same layout, rooted somewhere else (tests, chroots).
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    fn led_dir(&self, channel: Channel) -> &str {
        match channel {
            Channel::Red => &self.red_led,
            Channel::Green => &self.green_led,
            Channel::Blue => &self.blue_led,
        }
    }

    pub fn path(&self, point: ControlPoint) -> PathBuf {
        let (led, file) = match point {
            ControlPoint::Brightness(c) => (self.led_dir(c), &self.brightness_file),
            ControlPoint::Blink(c) => (self.led_dir(c), &self.blink_file),
            ControlPoint::BlinkTiming(c) => (self.led_dir(c), &self.timing_file),
            ControlPoint::Backlight => (self.backlight_led.as_str(), &self.brightness_file),
            ControlPoint::Buttons => (self.buttons_led.as_str(), &self.brightness_file),
        };
        self.root.join(led).join(file)
    }
}

impl Default for ControlPointPaths {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Writes control points as sysfs attribute files.
///
/// Files are opened read-write and truncated, the way a shell redirect would,
/// but never created: a missing attribute means the LED is absent. The first
/// open failure for each control point is logged; repeats are silent.
pub struct SysfsWriter {
    paths: ControlPointPaths,
    warned: Mutex<HashSet<ControlPoint>>,
}

impl SysfsWriter {
    pub fn new(paths: ControlPointPaths) -> Self {
        SysfsWriter {
            paths,
            warned: Mutex::new(HashSet::new()),
        }
    }

    fn warn_once(&self, point: ControlPoint, path: &Path, err: &std::io::Error) {
        let mut warned = self.warned.lock().unwrap_or_else(PoisonError::into_inner);
        if warned.insert(point) {
            log::error!("failed to open {point} ({}): {err}", path.display());
        }
    }
}

impl ControlPointWriter for SysfsWriter {
    fn write_str(&self, point: ControlPoint, value: &str) -> Result<()> {
        let path = self.paths.path(point);
        let mut file = match OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(f) => f,
            Err(source) => {
                self.warn_once(point, &path, &source);
                return Err(ControlPointError { point, source });
            }
        };
        file.write_all(format!("{value}\n").as_bytes())
            .map_err(|source| ControlPointError { point, source })
    }
}

/// In-memory writer for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::sync::Arc;

    /// ENOENT, what a missing sysfs attribute reports.
    const MOCK_ERRNO: i32 = 2;

    /// Records every write; clones share the same log so a test can keep a
    /// handle after moving the writer into a service.
    #[derive(Clone, Default)]
    pub struct MockWriter {
        /// Successful writes, in order: (point, value without newline).
        pub writes: Arc<Mutex<Vec<(ControlPoint, String)>>>,
        /// Every attempted write, including failed ones.
        pub attempts: Arc<Mutex<Vec<ControlPoint>>>,
        failing: Arc<Mutex<HashSet<ControlPoint>>>,
    }

    impl MockWriter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every write to `point` fail with ENOENT.
        pub fn fail_point(&self, point: ControlPoint) {
            self.failing.lock().unwrap().insert(point);
        }

        /// Snapshot of the successful writes.
        pub fn writes(&self) -> Vec<(ControlPoint, String)> {
            self.writes.lock().unwrap().clone()
        }

        /// Drain the write and attempt logs, returning the successful writes.
        pub fn take_writes(&self) -> Vec<(ControlPoint, String)> {
            self.attempts.lock().unwrap().clear();
            std::mem::take(&mut *self.writes.lock().unwrap())
        }

        /// Last value successfully written to `point`.
        pub fn last_value(&self, point: ControlPoint) -> Option<String> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(p, _)| *p == point)
                .map(|(_, v)| v.clone())
        }

        /// Number of attempted writes to `point`.
        pub fn attempts_for(&self, point: ControlPoint) -> usize {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .filter(|&&p| p == point)
                .count()
        }
    }

    impl ControlPointWriter for MockWriter {
        fn write_str(&self, point: ControlPoint, value: &str) -> Result<()> {
            self.attempts.lock().unwrap().push(point);
            if self.failing.lock().unwrap().contains(&point) {
                return Err(ControlPointError {
                    point,
                    source: std::io::Error::from_raw_os_error(MOCK_ERRNO),
                });
            }
            self.writes.lock().unwrap().push((point, value.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sysfs_tree() -> (tempfile::TempDir, ControlPointPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ControlPointPaths::default().with_root(dir.path());
        for point in ControlPoint::ALL {
            let path = paths.path(point);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "").unwrap();
        }
        (dir, paths)
    }

    // ── Channel ──

    #[test]
    fn component_extracts_bytes() {
        let color = 0xFF12_3456;
        assert_eq!(Channel::Red.component(color), 0x12);
        assert_eq!(Channel::Green.component(color), 0x34);
        assert_eq!(Channel::Blue.component(color), 0x56);
    }

    #[test]
    fn control_point_display() {
        assert_eq!(ControlPoint::Brightness(Channel::Green).to_string(), "green brightness");
        assert_eq!(ControlPoint::BlinkTiming(Channel::Blue).to_string(), "blue blink timing");
        assert_eq!(ControlPoint::Buttons.to_string(), "buttons");
    }

    // ── ControlPointPaths ──

    #[test]
    fn default_paths_match_leds_class_layout() {
        let paths = ControlPointPaths::default();
        assert_eq!(
            paths.path(ControlPoint::Brightness(Channel::Red)),
            PathBuf::from("/sys/class/leds/red/brightness")
        );
        assert_eq!(
            paths.path(ControlPoint::Blink(Channel::Green)),
            PathBuf::from("/sys/class/leds/green/blink")
        );
        assert_eq!(
            paths.path(ControlPoint::BlinkTiming(Channel::Blue)),
            PathBuf::from("/sys/class/leds/blue/led_time")
        );
        assert_eq!(
            paths.path(ControlPoint::Backlight),
            PathBuf::from("/sys/class/leds/lcd-backlight/brightness")
        );
        assert_eq!(
            paths.path(ControlPoint::Buttons),
            PathBuf::from("/sys/class/leds/button-backlight/brightness")
        );
    }

    #[test]
    fn all_points_have_distinct_paths() {
        let paths = ControlPointPaths::default();
        let unique: HashSet<PathBuf> = ControlPoint::ALL.iter().map(|&p| paths.path(p)).collect();
        assert_eq!(unique.len(), ControlPoint::ALL.len());
    }

    // ── SysfsWriter ──

    #[test]
    fn sysfs_write_int_appends_newline() {
        let (_dir, paths) = sysfs_tree();
        let writer = SysfsWriter::new(paths.clone());
        writer.write_int(ControlPoint::Backlight, 128).unwrap();
        let contents = std::fs::read_to_string(paths.path(ControlPoint::Backlight)).unwrap();
        assert_eq!(contents, "128\n");
    }

    #[test]
    fn sysfs_write_str_timing() {
        let (_dir, paths) = sysfs_tree();
        let writer = SysfsWriter::new(paths.clone());
        let point = ControlPoint::BlinkTiming(Channel::Red);
        writer.write_str(point, "1 998 1 500").unwrap();
        let contents = std::fs::read_to_string(paths.path(point)).unwrap();
        assert_eq!(contents, "1 998 1 500\n");
    }

    #[test]
    fn sysfs_missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ControlPointPaths::default().with_root(dir.path());
        let writer = SysfsWriter::new(paths.clone());

        let err = writer.write_int(ControlPoint::Buttons, 1).unwrap_err();
        assert_eq!(err.point, ControlPoint::Buttons);
        assert!(err.errno() > 0);
        assert!(!paths.path(ControlPoint::Buttons).exists());
    }

    #[test]
    fn sysfs_warns_once_per_point() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SysfsWriter::new(ControlPointPaths::default().with_root(dir.path()));

        assert!(writer.write_int(ControlPoint::Backlight, 1).is_err());
        assert!(writer.write_int(ControlPoint::Backlight, 2).is_err());
        assert!(writer.write_int(ControlPoint::Buttons, 1).is_err());

        let warned = writer.warned.lock().unwrap();
        assert_eq!(warned.len(), 2);
        assert!(warned.contains(&ControlPoint::Backlight));
        assert!(warned.contains(&ControlPoint::Buttons));
    }

    // ── MockWriter ──

    #[test]
    fn mock_records_writes_and_failures() {
        let writer = mock::MockWriter::new();
        writer.fail_point(ControlPoint::Backlight);

        writer.write_int(ControlPoint::Buttons, 1).unwrap();
        let err = writer.write_int(ControlPoint::Backlight, 1).unwrap_err();

        assert_eq!(err.errno(), 2);
        assert_eq!(writer.writes(), vec![(ControlPoint::Buttons, "1".to_string())]);
        assert_eq!(writer.attempts_for(ControlPoint::Backlight), 1);
    }

    #[test]
    fn mock_clones_share_log() {
        let writer = mock::MockWriter::new();
        let handle = writer.clone();
        writer.write_int(ControlPoint::Buttons, 7).unwrap();
        assert_eq!(handle.last_value(ControlPoint::Buttons).as_deref(), Some("7"));
        assert_eq!(handle.take_writes().len(), 1);
        assert!(writer.writes().is_empty());
    }
}
