//! `config` subcommand: show current configuration and file paths, or
//! write it out with `--init`.

use std::path::Path;

use super::{Config, ConfigOutput, LightsError, Result, kv, kv_indent, kv_width};

/// Write `config` to `path`. An existing file is only replaced with `force`.
pub(super) fn init_config(config: &Config, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LightsError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Err(errors) = config.validate() {
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(LightsError::Config(joined.join("; ")));
    }
    config.save_to(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(
    json: bool,
    custom_path: Option<&Path>,
    init: bool,
    force: bool,
) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    if init {
        let path = config_path
            .as_deref()
            .ok_or_else(|| LightsError::Config("no config directory".into()))?;
        init_config(&config, path, force)?;
    }
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let errors: Vec<String> = match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            errors,
        };
        return super::print_json(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "leds_root:",
            "red_led:",
            "green_led:",
            "blue_led:",
            "backlight_led:",
            "buttons_led:",
            "brightness_file:",
            "blink_file:",
            "timing_file:",
            "ramp_step:",
        ],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("leds_root:", &config.leds_root, w);
    kv_indent("red_led:", &config.red_led, w);
    kv_indent("green_led:", &config.green_led, w);
    kv_indent("blue_led:", &config.blue_led, w);
    kv_indent("backlight_led:", &config.backlight_led, w);
    kv_indent("buttons_led:", &config.buttons_led, w);
    kv_indent("brightness_file:", &config.brightness_file, w);
    kv_indent("blink_file:", &config.blink_file, w);
    kv_indent("timing_file:", &config.timing_file, w);
    kv_indent("ramp_step:", config.ramp_step, w);

    if !errors.is_empty() {
        println!();
        println!("Problems:");
        for e in &errors {
            println!("  {e}");
        }
    }
    Ok(())
}
