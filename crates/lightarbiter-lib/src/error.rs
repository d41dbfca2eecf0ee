//! Unified error type for the lightarbiter-lib crate.
//!
//! [`LightsError`] wraps writer failures (`ControlPointError`) and the
//! registry/validation error kinds. [`LightsError::status_code`] maps each
//! variant onto the negative errno convention used at the device boundary.

use std::fmt;

use crate::control::ControlPointError;

/// Invalid argument.
pub const EINVAL: i32 = 22;
/// Generic I/O error, used when the OS gave no error number.
pub const EIO: i32 = 5;

/// Unified error type for lightarbiter-lib operations.
#[derive(Debug)]
pub enum LightsError {
    /// A control point could not be opened or written.
    ControlPoint(ControlPointError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// `open` was called with a light name the module does not serve.
    UnsupportedRole(String),
    /// A required argument was absent or malformed.
    InvalidArgument(String),
    /// `open` was called before `initialize`.
    NotInitialized,
    /// `initialize` was called a second time.
    AlreadyInitialized,
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl LightsError {
    /// Status code reported to callers that speak the errno convention.
    ///
    /// Control-point failures carry the OS error of the failed write, negated.
    pub fn status_code(&self) -> i32 {
        match self {
            LightsError::ControlPoint(e) => -e.errno(),
            LightsError::Io(e) => -e.raw_os_error().unwrap_or(EIO),
            _ => -EINVAL,
        }
    }
}

impl fmt::Display for LightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightsError::ControlPoint(e) => write!(f, "{e}"),
            LightsError::Io(e) => write!(f, "I/O error: {e}"),
            LightsError::UnsupportedRole(name) => write!(f, "Unsupported light: {name}"),
            LightsError::InvalidArgument(e) => write!(f, "Invalid argument: {e}"),
            LightsError::NotInitialized => write!(f, "Lights module is not initialized"),
            LightsError::AlreadyInitialized => write!(f, "Lights module is already initialized"),
            LightsError::Config(e) => write!(f, "Config error: {e}"),
            LightsError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for LightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightsError::ControlPoint(e) => Some(e),
            LightsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ControlPointError> for LightsError {
    fn from(e: ControlPointError) -> Self {
        LightsError::ControlPoint(e)
    }
}

impl From<std::io::Error> for LightsError {
    fn from(e: std::io::Error) -> Self {
        LightsError::Io(e)
    }
}

/// Crate-level Result alias using [`LightsError`].
pub type Result<T> = std::result::Result<T, LightsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Channel, ControlPoint};

    fn point_error(code: i32) -> ControlPointError {
        ControlPointError {
            point: ControlPoint::Brightness(Channel::Red),
            source: std::io::Error::from_raw_os_error(code),
        }
    }

    #[test]
    fn from_control_point_error() {
        let e: LightsError = point_error(2).into();
        assert!(matches!(e, LightsError::ControlPoint(_)));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: LightsError = io_err.into();
        assert!(matches!(e, LightsError::Io(_)));
    }

    #[test]
    fn status_code_negates_os_error() {
        // ENOENT
        assert_eq!(LightsError::from(point_error(2)).status_code(), -2);
        // EACCES
        assert_eq!(LightsError::from(point_error(13)).status_code(), -13);
    }

    #[test]
    fn status_code_without_os_error_is_eio() {
        let e = LightsError::ControlPoint(ControlPointError {
            point: ControlPoint::Backlight,
            source: std::io::Error::other("short write"),
        });
        assert_eq!(e.status_code(), -EIO);
    }

    #[test]
    fn status_code_for_argument_errors_is_einval() {
        assert_eq!(LightsError::UnsupportedRole("x".into()).status_code(), -EINVAL);
        assert_eq!(LightsError::InvalidArgument("x".into()).status_code(), -EINVAL);
        assert_eq!(LightsError::NotInitialized.status_code(), -EINVAL);
    }

    #[test]
    fn display_unsupported_role() {
        let e = LightsError::UnsupportedRole("keyboard".into());
        assert_eq!(e.to_string(), "Unsupported light: keyboard");
    }

    #[test]
    fn display_config_error() {
        let e = LightsError::Config("invalid input".into());
        assert_eq!(e.to_string(), "Config error: invalid input");
    }

    #[test]
    fn display_color_error() {
        let e = LightsError::Color("bad hex".into());
        assert_eq!(e.to_string(), "Color error: bad hex");
    }

    #[test]
    fn display_control_point_error_names_point() {
        let e = LightsError::from(point_error(2));
        assert!(e.to_string().contains("red brightness"));
    }

    #[test]
    fn source_chains_control_point_error() {
        let e = LightsError::from(point_error(13));
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("red brightness"));
    }

    #[test]
    fn source_none_for_string_variants() {
        let e = LightsError::Config("test".into());
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_control_point_to_lights() {
        fn inner() -> crate::control::Result<()> {
            Err(point_error(2))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(err, LightsError::ControlPoint(_)));
    }
}
