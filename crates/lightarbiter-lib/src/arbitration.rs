//! Arbitration state: which of the competing requests owns the indicator.
//!
//! Precedence is fixed: attention (while its intensity is non-zero), then a
//! lit notification, then battery. Battery is the fallback even when it is
//! off, so clearing the other two always ends on the battery request.

use crate::request::{FlashMode, LightRequest, Role};

/// Last-seen request per role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArbitrationState {
    battery: LightRequest,
    notification: LightRequest,
    attention: LightRequest,
    attention_intensity: u32,
}

impl ArbitrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored request for `role`.
    ///
    /// Attention only reacts to hardware flashing (intensity = on time) and
    /// to `None` (intensity 0); a timed attention request changes nothing.
    pub fn update(&mut self, role: Role, request: LightRequest) {
        match role {
            Role::Battery => self.battery = request,
            Role::Notification => self.notification = request,
            Role::Attention => match request.flash_mode {
                FlashMode::Hardware => {
                    self.attention = request;
                    self.attention_intensity = request.flash_on_ms;
                }
                FlashMode::None => {
                    self.attention = request;
                    self.attention_intensity = 0;
                }
                FlashMode::Timed => {
                    log::debug!("timed attention request ignored");
                }
            },
        }
    }

    /// The stored request for `role`.
    pub fn stored(&self, role: Role) -> &LightRequest {
        match role {
            Role::Battery => &self.battery,
            Role::Notification => &self.notification,
            Role::Attention => &self.attention,
        }
    }

    pub fn attention_intensity(&self) -> u32 {
        self.attention_intensity
    }

    /// The role whose request currently wins.
    pub fn active_role(&self) -> Role {
        if self.attention_intensity != 0 {
            Role::Attention
        } else if self.notification.is_lit() {
            Role::Notification
        } else {
            Role::Battery
        }
    }

    /// The winning request, to be driven onto the indicator.
    pub fn recompute_active(&self) -> LightRequest {
        *self.stored(self.active_role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFF0000;
    const GREEN: u32 = 0x00FF00;
    const BLUE: u32 = 0x0000FF;

    fn all_lit() -> ArbitrationState {
        let mut state = ArbitrationState::new();
        state.update(Role::Battery, LightRequest::steady(RED));
        state.update(Role::Notification, LightRequest::timed(GREEN, 1000, 500));
        state.update(Role::Attention, LightRequest::hardware(BLUE, 3, 0));
        state
    }

    #[test]
    fn empty_state_falls_back_to_dark_battery() {
        let state = ArbitrationState::new();
        assert_eq!(state.active_role(), Role::Battery);
        assert_eq!(state.recompute_active(), LightRequest::default());
    }

    #[test]
    fn attention_beats_notification_beats_battery() {
        let mut state = all_lit();
        assert_eq!(state.active_role(), Role::Attention);
        assert_eq!(state.recompute_active().color, BLUE);

        state.update(Role::Attention, LightRequest::steady(0));
        assert_eq!(state.active_role(), Role::Notification);
        assert_eq!(state.recompute_active(), LightRequest::timed(GREEN, 1000, 500));

        state.update(Role::Notification, LightRequest::steady(0));
        assert_eq!(state.active_role(), Role::Battery);
        assert_eq!(state.recompute_active().color, RED);
    }

    #[test]
    fn battery_wins_even_when_off() {
        let mut state = ArbitrationState::new();
        state.update(Role::Battery, LightRequest::steady(0));
        state.update(Role::Notification, LightRequest::steady(0xFF00_0000));
        assert_eq!(state.active_role(), Role::Battery);
    }

    #[test]
    fn notification_lit_test_ignores_alpha() {
        let mut state = ArbitrationState::new();
        state.update(Role::Battery, LightRequest::steady(RED));
        state.update(Role::Notification, LightRequest::steady(0xFF00_0000));
        assert_eq!(state.active_role(), Role::Battery);

        state.update(Role::Notification, LightRequest::steady(0xFF00_0001));
        assert_eq!(state.active_role(), Role::Notification);
    }

    #[test]
    fn update_replaces_rather_than_merges() {
        let mut state = ArbitrationState::new();
        state.update(Role::Battery, LightRequest::timed(RED, 1000, 500));
        state.update(Role::Battery, LightRequest::steady(GREEN));
        assert_eq!(*state.stored(Role::Battery), LightRequest::steady(GREEN));
    }

    #[test]
    fn attention_intensity_comes_from_on_time() {
        let mut state = ArbitrationState::new();
        state.update(Role::Attention, LightRequest::hardware(BLUE, 7, 0));
        assert_eq!(state.attention_intensity(), 7);
    }

    #[test]
    fn hardware_attention_with_zero_on_time_does_not_win() {
        let mut state = ArbitrationState::new();
        state.update(Role::Notification, LightRequest::steady(GREEN));
        state.update(Role::Attention, LightRequest::hardware(BLUE, 0, 0));
        assert_eq!(state.attention_intensity(), 0);
        assert_eq!(state.active_role(), Role::Notification);
    }

    #[test]
    fn timed_attention_leaves_state_unchanged() {
        let mut state = all_lit();
        let before = state.clone();
        state.update(Role::Attention, LightRequest::timed(RED, 1000, 500));
        assert_eq!(state, before);

        state.update(Role::Attention, LightRequest::steady(0));
        let cleared = state.clone();
        state.update(Role::Attention, LightRequest::timed(RED, 1000, 500));
        assert_eq!(state, cleared);
        assert_eq!(state.active_role(), Role::Notification);
    }

    #[test]
    fn dark_attention_with_intensity_still_wins() {
        // The lit test applies to notification and battery only.
        let mut state = ArbitrationState::new();
        state.update(Role::Notification, LightRequest::steady(GREEN));
        state.update(Role::Attention, LightRequest::hardware(0, 5, 0));
        assert_eq!(state.active_role(), Role::Attention);
        assert_eq!(state.recompute_active().color, 0);
    }
}
