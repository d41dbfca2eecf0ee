//! Indicator LED: color helpers, blink planning, channel driving.

mod blink;
mod color;
mod driver;

pub use blink::{BLINK_RULES, BlinkPlan, BlinkRule, ChannelSet, RAMP_STEP_DURATION, plan_blink};
pub use color::{format_color, luminance, parse_color};
pub use driver::{apply_blink_plan, drive_indicator, set_steady};
