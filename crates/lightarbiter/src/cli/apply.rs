//! `apply` subcommand: feed a recorded request sequence through one module.

use std::path::Path;

use serde::Deserialize;

use super::{
    ApplyOutput, Config, FlashMode, LightId, LightRequest, LightsError, Result, UpdateJson,
    active_json, kv, kv_width, led,
};

/// One entry of an apply file.
#[derive(Debug, Deserialize)]
pub(super) struct ApplyEntry {
    pub light: String,
    pub color: String,
    #[serde(default)]
    pub flash_mode: FlashMode,
    #[serde(default)]
    pub flash_on_ms: u32,
    #[serde(default)]
    pub flash_off_ms: u32,
}

impl ApplyEntry {
    fn light_id(&self) -> Result<LightId> {
        self.light.parse()
    }

    fn request(&self) -> Result<LightRequest> {
        Ok(LightRequest {
            color: led::parse_color(&self.color)?,
            flash_mode: self.flash_mode,
            flash_on_ms: self.flash_on_ms,
            flash_off_ms: self.flash_off_ms,
        })
    }
}

pub(super) fn parse_entries(text: &str) -> Result<Vec<ApplyEntry>> {
    serde_json::from_str(text)
        .map_err(|e| LightsError::InvalidArgument(format!("invalid apply file: {e}")))
}

pub(super) fn cmd_apply(path: &Path, config: &Config, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    let entries = parse_entries(&text)?;
    // Reject bad light names and colors before anything is written.
    let requests = entries
        .iter()
        .map(|entry| -> Result<(LightId, LightRequest)> {
            Ok((entry.light_id()?, entry.request()?))
        })
        .collect::<Result<Vec<_>>>()?;

    let module = super::open_module(config)?;
    let mut updates = Vec::with_capacity(entries.len());
    let mut first_error = None;

    for (entry, (id, request)) in entries.iter().zip(requests) {
        let result = module
            .open(id.as_str())
            .and_then(|device| device.try_set_light(&request));
        let (status, error) = match result {
            Ok(()) => (0, None),
            Err(e) => {
                log::warn!("{} update failed: {e}", entry.light);
                let reported = (e.status_code(), Some(e.to_string()));
                if first_error.is_none() {
                    first_error = Some(e);
                }
                reported
            }
        };
        updates.push(UpdateJson {
            light: entry.light.clone(),
            color: led::format_color(request.color),
            request,
            status,
            error,
        });
    }

    let service = module.service().ok_or(LightsError::NotInitialized)?;
    let (role, active) = service.active();

    if json {
        let output = ApplyOutput {
            updates,
            drives: service.drive_count(),
            active: active_json(role, active),
        };
        super::print_json(&output)?;
    } else {
        let w = kv_width(&["Active:", "Drives:"], &[]);
        for (i, u) in updates.iter().enumerate() {
            let status = match &u.error {
                None => "ok".to_string(),
                Some(e) => format!("{} ({e})", u.status),
            };
            println!(
                "{:>3}. {:<14}{} {:<9}{}",
                i + 1,
                u.light,
                u.color,
                u.request.flash_mode,
                status
            );
        }
        println!();
        kv(
            "Active:",
            format_args!("{role} {}", led::format_color(active.color)),
            w,
        );
        kv("Drives:", service.drive_count(), w);
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
