//! CLI subcommands: light updates, blink planning, control-point listing.

mod apply;
mod config_cmd;
mod plan;
mod points;
mod set;

use std::path::Path;

use clap::Subcommand;
use serde::Serialize;

pub(super) use lightarbiter_lib::LightsError;
pub(super) use lightarbiter_lib::config::Config;
pub(super) use lightarbiter_lib::control::{ControlPoint, ControlPointPaths, SysfsWriter};
pub(super) use lightarbiter_lib::error::Result;
pub(super) use lightarbiter_lib::led::{self, BlinkPlan};
pub(super) use lightarbiter_lib::module::LightsModule;
pub(super) use lightarbiter_lib::request::{FlashMode, LightId, LightRequest, Role};
pub(super) use lightarbiter_lib::service::LightService;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Config from `path` if given, else from the platform default.
pub(super) fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => {
            let (config, warnings) = Config::load_from(p);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Validate `config` and initialize a module writing to its sysfs layout.
pub(super) fn open_module(config: &Config) -> Result<LightsModule<SysfsWriter>> {
    if let Err(errors) = config.validate() {
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(LightsError::Config(joined.join("; ")));
    }
    let writer = SysfsWriter::new(ControlPointPaths::from_config(config));
    let module = LightsModule::new();
    module.initialize_with(LightService::with_ramp_step(writer, config.ramp_step))?;
    Ok(module)
}

/// Build a request from command-line strings.
pub(super) fn build_request(color: &str, flash: &str, on: u32, off: u32) -> Result<LightRequest> {
    Ok(LightRequest {
        color: led::parse_color(color)?,
        flash_mode: flash.parse::<FlashMode>()?,
        flash_on_ms: on,
        flash_off_ms: off,
    })
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LightsError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct UpdateJson {
    pub light: String,
    pub color: String,
    pub request: LightRequest,
    pub status: i32,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub(super) struct ActiveJson {
    pub role: Role,
    pub color: String,
    pub request: LightRequest,
}

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub update: UpdateJson,
    pub active: ActiveJson,
}

#[derive(Serialize)]
pub(super) struct ApplyOutput {
    pub updates: Vec<UpdateJson>,
    pub drives: u64,
    pub active: ActiveJson,
}

#[derive(Serialize)]
pub(super) struct PlanOutput {
    pub color: String,
    pub on_ms: u32,
    pub off_ms: u32,
    pub ramp_step: u32,
    pub plan: BlinkPlan,
    pub timing: String,
}

#[derive(Serialize)]
pub(super) struct PointJson {
    pub name: String,
    pub path: String,
    pub exists: bool,
}

#[derive(Serialize)]
pub(super) struct PointsOutput {
    pub root: String,
    pub points: Vec<PointJson>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub errors: Vec<String>,
}

pub(super) fn active_json(role: Role, request: LightRequest) -> ActiveJson {
    ActiveJson {
        role,
        color: led::format_color(request.color),
        request,
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Send one request to a light (backlight, battery, notifications, attention, buttons)
    Set {
        /// Light name
        light: String,
        /// Color: #RRGGBB, 0xAARRGGBB or a name (red, green, blue, white, ...)
        color: String,
        /// Flash mode: none, timed or hardware
        #[arg(long, default_value = "none")]
        flash: String,
        /// Flash on time in milliseconds
        #[arg(long, default_value_t = 0)]
        on: u32,
        /// Flash off time in milliseconds
        #[arg(long, default_value_t = 0)]
        off: u32,
    },

    /// Apply a JSON list of requests in order through one module
    Apply {
        /// Path to a JSON file: [{"light": "battery", "color": "#FF0000", ...}, ...]
        file: String,
    },

    /// Show which channels a timed blink would pulse (no hardware required)
    Plan {
        /// Color: #RRGGBB, 0xAARRGGBB or a name
        color: String,
        /// Flash on time in milliseconds
        #[arg(long)]
        on: u32,
        /// Flash off time in milliseconds
        #[arg(long)]
        off: u32,
        /// Ramp step (default: from config)
        #[arg(long)]
        step: Option<u32>,
    },

    /// List control points and whether they exist
    Points,

    /// Show current configuration and file path
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
        /// With --init, replace an existing file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    // `config` loads and reports the file itself.
    let config = || load_config(config_path);
    match cmd {
        Command::Set {
            light,
            color,
            flash,
            on,
            off,
        } => {
            let request = build_request(&color, &flash, on, off)?;
            set::cmd_set(&light, &request, &config(), json)
        }
        Command::Apply { file } => apply::cmd_apply(Path::new(&file), &config(), json),
        Command::Plan {
            color,
            on,
            off,
            step,
        } => plan::cmd_plan(&color, on, off, step.unwrap_or_else(|| config().ramp_step), json),
        Command::Points => points::cmd_points(&config(), json),
        Command::Config { init, force } => config_cmd::cmd_config(json, config_path, init, force),
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Longer key:"], &[]);
        // "Longer key:" = 11 + PADDING = 13
        assert_eq!(w, 13);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["A:"], &["Very long indent key:"]);
        // "Very long indent key:" = 21 + PADDING + 2 = 25
        assert_eq!(w, 25);
    }

    #[test]
    fn kv_width_empty_both() {
        assert_eq!(kv_width(&[], &[]), 0);
    }

    #[test]
    fn values_align_across_levels() {
        let w = kv_width(&["Top:"], &["Indent:"]);
        let top = format_kv("Top:", "V", w);
        let indent = format!("  {:<width$}{}", "Indent:", "V", width = w - 2);
        assert_eq!(top.find('V'), indent.find('V'));
    }

    #[test]
    fn format_kv_basic() {
        assert_eq!(format_kv("Key:", "value", 10), "Key:      value");
    }

    #[test]
    fn format_kv_overlong_key() {
        assert_eq!(format_kv("ExactWidth:", "val", 10), "ExactWidth:val");
    }
}

#[cfg(test)]
mod request_tests {
    use super::*;

    #[test]
    fn build_request_parses_all_parts() {
        let r = build_request("#00FF00", "timed", 1000, 500).unwrap();
        assert_eq!(r, LightRequest::timed(0x00FF00, 1000, 500));
    }

    #[test]
    fn build_request_rejects_bad_color() {
        assert!(matches!(
            build_request("#GG0000", "none", 0, 0),
            Err(LightsError::Color(_))
        ));
    }

    #[test]
    fn build_request_rejects_bad_mode() {
        assert!(matches!(
            build_request("red", "strobe", 0, 0),
            Err(LightsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn open_module_rejects_invalid_config() {
        let config = Config {
            ramp_step: 0,
            ..Config::default()
        };
        assert!(matches!(open_module(&config), Err(LightsError::Config(_))));
    }

    #[test]
    fn open_module_is_initialized() {
        let module = open_module(&Config::default()).unwrap();
        assert!(module.is_initialized());
    }
}

#[cfg(test)]
mod json_struct_tests {
    use super::*;

    #[test]
    fn set_output_has_expected_fields() {
        let request = LightRequest::steady(0xFF0000);
        let output = SetOutput {
            update: UpdateJson {
                light: "battery".into(),
                color: "#FF0000".into(),
                request,
                status: 0,
                error: None,
            },
            active: active_json(Role::Battery, request),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["update"]["status"], 0);
        assert!(json["update"]["error"].is_null());
        assert_eq!(json["active"]["role"], "battery");
        assert_eq!(json["active"]["color"], "#FF0000");
        assert_eq!(json["active"]["request"]["flash_mode"], "none");
    }

    #[test]
    fn plan_output_lists_channels() {
        let plan = led::plan_blink(0x808080, 1000, 500, 1);
        let output = PlanOutput {
            color: "#808080".into(),
            on_ms: 1000,
            off_ms: 500,
            ramp_step: 1,
            timing: plan.timing(),
            plan,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["plan"]["channels"], serde_json::json!(["red", "green", "blue"]));
        assert_eq!(json["plan"]["hold"], 998);
        assert_eq!(json["timing"], "1 998 1 500");
    }

    #[test]
    fn config_output_complete() {
        let output = ConfigOutput {
            config_file: Some("/home/user/.config/lightarbiter/config.toml".into()),
            config_file_exists: false,
            settings: Config::default(),
            errors: vec![],
        };
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["config_file"].is_string());
        assert_eq!(json["settings"]["leds_root"], "/sys/class/leds");
        assert_eq!(json["settings"]["ramp_step"], 1);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn points_output_shape() {
        let output = PointsOutput {
            root: "/sys/class/leds".into(),
            points: vec![PointJson {
                name: "red brightness".into(),
                path: "/sys/class/leds/red/brightness".into(),
                exists: false,
            }],
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["points"][0]["name"], "red brightness");
        assert_eq!(json["points"][0]["exists"], false);
    }
}
