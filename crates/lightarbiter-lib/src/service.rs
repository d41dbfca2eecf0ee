//! Light service: the per-light update operations behind one lock.
//!
//! Every operation holds the lock for its whole body, so "store request,
//! pick the winner, write the channels" never interleaves with another
//! update. Backlight and buttons skip arbitration but share the lock so
//! writes to the device stay serialized.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::arbitration::ArbitrationState;
use crate::control::{ControlPoint, ControlPointWriter};
use crate::error::Result;
use crate::led::{self, RAMP_STEP_DURATION};
use crate::request::{LightId, LightRequest, Role};

struct Inner<W> {
    state: ArbitrationState,
    writer: W,
    ramp_step: u32,
    drives: u64,
}

/// Shared-indicator arbiter plus the two standalone lights.
///
/// `Send + Sync` whenever the writer is `Send`; share it behind an `Arc`.
pub struct LightService<W> {
    inner: Mutex<Inner<W>>,
}

impl<W: ControlPointWriter> LightService<W> {
    pub fn new(writer: W) -> Self {
        Self::with_ramp_step(writer, RAMP_STEP_DURATION)
    }

    pub fn with_ramp_step(writer: W, ramp_step: u32) -> Self {
        LightService {
            inner: Mutex::new(Inner {
                state: ArbitrationState::new(),
                writer,
                ramp_step,
                drives: 0,
            }),
        }
    }

    // The state is only replaced wholesale, so a panic mid-drive leaves it
    // consistent and the lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Display backlight: perceived luminance of the color.
    pub fn update_backlight(&self, request: &LightRequest) -> Result<()> {
        let inner = self.lock();
        let brightness = led::luminance(request.rgb());
        inner.writer.write_int(ControlPoint::Backlight, brightness)?;
        Ok(())
    }

    /// Button backlight: the blue byte, used as on/off.
    pub fn update_buttons(&self, request: &LightRequest) -> Result<()> {
        let inner = self.lock();
        inner
            .writer
            .write_int(ControlPoint::Buttons, request.color & 0xFF)?;
        Ok(())
    }

    pub fn update_battery(&self, request: &LightRequest) -> Result<()> {
        self.update_role(Role::Battery, request)
    }

    pub fn update_notification(&self, request: &LightRequest) -> Result<()> {
        self.update_role(Role::Notification, request)
    }

    pub fn update_attention(&self, request: &LightRequest) -> Result<()> {
        self.update_role(Role::Attention, request)
    }

    /// Dispatch to the operation serving `id`. Lights with a role go
    /// through arbitration; the rest are written directly.
    pub fn update(&self, id: LightId, request: &LightRequest) -> Result<()> {
        match id.role() {
            Some(role) => self.update_role(role, request),
            None if id == LightId::Buttons => self.update_buttons(request),
            None => self.update_backlight(request),
        }
    }

    /// Store the request, then re-drive the indicator with whichever role
    /// wins, even if the winner did not change.
    fn update_role(&self, role: Role, request: &LightRequest) -> Result<()> {
        let mut inner = self.lock();
        inner.state.update(role, *request);
        let winner = inner.state.active_role();
        let active = inner.state.recompute_active();
        inner.drives += 1;
        log::debug!("{role} updated, {winner} owns the indicator");
        led::drive_indicator(&inner.writer, &active, inner.ramp_step)?;
        Ok(())
    }

    /// Current winner and its request.
    pub fn active(&self) -> (Role, LightRequest) {
        let inner = self.lock();
        (inner.state.active_role(), inner.state.recompute_active())
    }

    /// Snapshot of the arbitration state.
    pub fn state(&self) -> ArbitrationState {
        self.lock().state.clone()
    }

    /// Number of times the indicator has been driven.
    pub fn drive_count(&self) -> u64 {
        self.lock().drives
    }
}
