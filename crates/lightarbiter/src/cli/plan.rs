//! `plan` subcommand: show a timed blink plan without touching hardware.

use super::{PlanOutput, Result, kv, kv_indent, kv_width, led};

pub(super) fn cmd_plan(
    color: &str,
    on_ms: u32,
    off_ms: u32,
    ramp_step: u32,
    json: bool,
) -> Result<()> {
    let value = led::parse_color(color)?;
    let plan = led::plan_blink(value, on_ms, off_ms, ramp_step);

    if json {
        let output = PlanOutput {
            color: led::format_color(value),
            on_ms,
            off_ms,
            ramp_step,
            timing: plan.timing(),
            plan,
        };
        return super::print_json(&output);
    }

    let w = kv_width(
        &["Color:", "Flash:", "Channels:", "Timing:"],
        &["rise:", "hold:", "fall:", "off:"],
    );
    kv(
        "Color:",
        format_args!("{color} -> {}", led::format_color(value)),
        w,
    );
    kv(
        "Flash:",
        format_args!("on={on_ms}ms off={off_ms}ms step={ramp_step}"),
        w,
    );
    kv("Channels:", plan.channels, w);
    kv("Timing:", plan.timing(), w);
    kv_indent("rise:", plan.rise, w);
    kv_indent("hold:", plan.hold, w);
    kv_indent("fall:", plan.fall, w);
    kv_indent("off:", plan.off, w);
    if plan.channels.is_empty() {
        println!();
        println!("No blink rule matches this color; every channel stays off.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_accepts_names_and_hex() {
        assert!(cmd_plan("red", 1000, 500, 1, true).is_ok());
        assert!(cmd_plan("#808080", 1000, 500, 1, false).is_ok());
    }

    #[test]
    fn plan_rejects_bad_color() {
        assert!(cmd_plan("nope", 1000, 500, 1, true).is_err());
    }
}
