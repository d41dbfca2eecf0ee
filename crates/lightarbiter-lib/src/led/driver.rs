//! Indicator driving: steady colors and blink plans onto the RGB channels.

use crate::control::{Channel, ControlPoint, ControlPointError, ControlPointWriter, Result};
use crate::request::{FlashMode, LightRequest, RGB_MASK};

use super::blink::{BlinkPlan, plan_blink};

/// Issues a sequence of independent writes, remembering the first failure.
///
/// A failed write never stops the ones after it.
struct WriteBatch<'a, W: ControlPointWriter + ?Sized> {
    writer: &'a W,
    first_err: Option<ControlPointError>,
}

impl<'a, W: ControlPointWriter + ?Sized> WriteBatch<'a, W> {
    fn new(writer: &'a W) -> Self {
        WriteBatch {
            writer,
            first_err: None,
        }
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result
            && self.first_err.is_none()
        {
            self.first_err = Some(e);
        }
    }

    fn write_int(&mut self, point: ControlPoint, value: u32) {
        let result = self.writer.write_int(point, value);
        self.record(result);
    }

    fn write_str(&mut self, point: ControlPoint, value: &str) {
        let result = self.writer.write_str(point, value);
        self.record(result);
    }

    fn finish(self) -> Result<()> {
        match self.first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Show `color` steadily on the three channels.
///
/// Black additionally switches blinking off on every channel.
pub fn set_steady(writer: &(impl ControlPointWriter + ?Sized), color: u32) -> Result<()> {
    let mut batch = WriteBatch::new(writer);
    for channel in Channel::ALL {
        batch.write_int(
            ControlPoint::Brightness(channel),
            u32::from(channel.component(color)),
        );
    }
    if color & RGB_MASK == 0 {
        for channel in Channel::ALL {
            batch.write_int(ControlPoint::Blink(channel), 0);
        }
    }
    batch.finish()
}

/// Apply a blink plan: clear the indicator, then arm the planned channels.
pub fn apply_blink_plan(
    writer: &(impl ControlPointWriter + ?Sized),
    plan: &BlinkPlan,
) -> Result<()> {
    let mut batch = WriteBatch::new(writer);
    batch.record(set_steady(writer, 0));

    let timing = plan.timing();
    for channel in Channel::ALL {
        if plan.channels.contains(channel) {
            batch.write_int(ControlPoint::Blink(channel), 1);
            batch.write_str(ControlPoint::BlinkTiming(channel), &timing);
        } else {
            batch.write_int(ControlPoint::Blink(channel), 0);
        }
    }
    log::debug!("blink {} ({timing})", plan.channels);
    batch.finish()
}

/// Drive the indicator with a resolved request.
///
/// Only a timed request with both phases non-zero blinks; everything else,
/// hardware flashing included, is shown steadily.
pub fn drive_indicator(
    writer: &(impl ControlPointWriter + ?Sized),
    request: &LightRequest,
    ramp_step: u32,
) -> Result<()> {
    log::debug!(
        "drive indicator: mode {:?}, color {:08X}, on {}ms, off {}ms",
        request.flash_mode,
        request.color,
        request.flash_on_ms,
        request.flash_off_ms
    );
    let blinking = request.flash_mode == FlashMode::Timed
        && request.flash_on_ms > 0
        && request.flash_off_ms > 0;
    if blinking {
        let plan = plan_blink(
            request.color,
            request.flash_on_ms,
            request.flash_off_ms,
            ramp_step,
        );
        apply_blink_plan(writer, &plan)
    } else {
        set_steady(writer, request.color)
    }
}
