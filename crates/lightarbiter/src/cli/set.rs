//! `set` subcommand: send one request to a named light.

use super::{
    Config, LightRequest, LightsError, Result, SetOutput, UpdateJson, active_json, kv, kv_width,
    led,
};

pub(super) fn cmd_set(
    light: &str,
    request: &LightRequest,
    config: &Config,
    json: bool,
) -> Result<()> {
    let module = super::open_module(config)?;
    let device = module.open(light)?;
    let result = device.try_set_light(request);
    device.close();

    let service = module.service().ok_or(LightsError::NotInitialized)?;
    let (role, active) = service.active();

    if json {
        let output = SetOutput {
            update: UpdateJson {
                light: light.to_string(),
                color: led::format_color(request.color),
                request: *request,
                status: result.as_ref().map_or_else(|e| e.status_code(), |_| 0),
                error: result.as_ref().err().map(|e| e.to_string()),
            },
            active: active_json(role, active),
        };
        super::print_json(&output)?;
        return result;
    }

    let w = kv_width(&["Light:", "Request:", "Active:", "Status:"], &[]);
    kv("Light:", light, w);
    kv(
        "Request:",
        format_args!(
            "{} {} on={}ms off={}ms",
            led::format_color(request.color),
            request.flash_mode,
            request.flash_on_ms,
            request.flash_off_ms
        ),
        w,
    );
    kv(
        "Active:",
        format_args!("{role} {}", led::format_color(active.color)),
        w,
    );
    match &result {
        Ok(()) => kv("Status:", "ok", w),
        Err(e) => kv("Status:", format_args!("{} ({e})", e.status_code()), w),
    }
    result
}
