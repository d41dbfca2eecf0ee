//! Blink planning: which channels pulse, and with what ramp timing.
//!
//! The indicator can only pulse each channel on its own, so a requested color
//! is approximated by choosing a subset of {red, green, blue} to blink with a
//! shared rise/hold/fall/off cycle.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::control::Channel;

/// Default ramp step, in device timing units.
pub const RAMP_STEP_DURATION: u32 = 1;

// ── ChannelSet ──

/// A subset of {red, green, blue}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub const EMPTY: ChannelSet = ChannelSet(0);
    pub const RED: ChannelSet = ChannelSet(1);
    pub const GREEN: ChannelSet = ChannelSet(2);
    pub const BLUE: ChannelSet = ChannelSet(4);
    pub const ALL: ChannelSet = ChannelSet(7);

    const fn bit(channel: Channel) -> u8 {
        match channel {
            Channel::Red => 1,
            Channel::Green => 2,
            Channel::Blue => 4,
        }
    }

    pub const fn union(self, other: ChannelSet) -> ChannelSet {
        ChannelSet(self.0 | other.0)
    }

    pub const fn contains(self, channel: Channel) -> bool {
        self.0 & Self::bit(channel) != 0
    }

    pub fn insert(&mut self, channel: Channel) {
        self.0 |= Self::bit(channel);
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in red, green, blue order.
    pub fn iter(self) -> impl Iterator<Item = Channel> {
        Channel::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        let mut set = ChannelSet::EMPTY;
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(Channel::name).collect();
        f.write_str(&names.join("+"))
    }
}

impl Serialize for ChannelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// ── Rules ──

/// One channel-selection rule. Components are passed as `(red, green, blue)`.
#[derive(Debug, Clone, Copy)]
pub struct BlinkRule {
    pub name: &'static str,
    pub matches: fn(u32, u32, u32) -> bool,
    pub channels: ChannelSet,
    /// A single channel carries the color; no further rules are consulted.
    pub dominant: bool,
}

fn red_dominant(r: u32, g: u32, b: u32) -> bool {
    r > g + b
}

fn green_dominant(r: u32, g: u32, b: u32) -> bool {
    g > r + b
}

fn blue_dominant(r: u32, g: u32, b: u32) -> bool {
    b > g + r
}

fn neutral(r: u32, g: u32, b: u32) -> bool {
    r == g && r == b
}

fn red_weak(r: u32, g: u32, b: u32) -> bool {
    r < (g + b) / 2
}

fn green_weak(r: u32, g: u32, b: u32) -> bool {
    g < (r + b) / 2
}

fn blue_weak(r: u32, g: u32, b: u32) -> bool {
    b < (r + g) / 2
}

/// Channel-selection rules, in evaluation order.
///
/// A matching single-channel rule ends evaluation with just that channel.
/// Past those, every matching rule adds its channels and never removes what
/// an earlier rule added. The weak-channel rules overlap (e.g. `#0A0A0F`
/// matches both cyan and magenta and pulses all three).
pub const BLINK_RULES: [BlinkRule; 7] = [
    BlinkRule {
        name: "red",
        matches: red_dominant,
        channels: ChannelSet::RED,
        dominant: true,
    },
    BlinkRule {
        name: "green",
        matches: green_dominant,
        channels: ChannelSet::GREEN,
        dominant: true,
    },
    BlinkRule {
        name: "blue",
        matches: blue_dominant,
        channels: ChannelSet::BLUE,
        dominant: true,
    },
    BlinkRule {
        name: "white",
        matches: neutral,
        channels: ChannelSet::ALL,
        dominant: false,
    },
    BlinkRule {
        name: "cyan",
        matches: red_weak,
        channels: ChannelSet::GREEN.union(ChannelSet::BLUE),
        dominant: false,
    },
    BlinkRule {
        name: "magenta",
        matches: green_weak,
        channels: ChannelSet::RED.union(ChannelSet::BLUE),
        dominant: false,
    },
    BlinkRule {
        name: "orange",
        matches: blue_weak,
        channels: ChannelSet::RED.union(ChannelSet::GREEN),
        dominant: false,
    },
];

// ── Plan ──

/// Channels to pulse plus their shared cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlinkPlan {
    pub channels: ChannelSet,
    pub rise: u32,
    pub hold: u32,
    pub fall: u32,
    pub off: u32,
}

impl BlinkPlan {
    /// Value for the blink timing control point.
    pub fn timing(&self) -> String {
        format!("{} {} {} {}", self.rise, self.hold, self.fall, self.off)
    }
}

/// Plan a blink cycle for `color` (packed `0xAARRGGBB`).
///
/// `hold` is what remains of `on_ms` after one ramp step up and one down.
/// When the ramps do not fit, hold is forced to 0 and the ramps are halved
/// from it, so every phase but `off` ends up 0.
pub fn plan_blink(color: u32, on_ms: u32, off_ms: u32, step: u32) -> BlinkPlan {
    let r = u32::from(Channel::Red.component(color));
    let g = u32::from(Channel::Green.component(color));
    let b = u32::from(Channel::Blue.component(color));

    let mut rise = i64::from(step);
    let mut fall = i64::from(step);
    let mut hold = i64::from(on_ms) - 2 * i64::from(step);
    if rise + fall > hold {
        hold = 0;
        rise = hold / 2;
        fall = hold / 2;
    }

    let mut channels = ChannelSet::EMPTY;
    for rule in &BLINK_RULES {
        if (rule.matches)(r, g, b) {
            log::debug!("blink rule {} matched for #{r:02X}{g:02X}{b:02X}", rule.name);
            channels = channels.union(rule.channels);
            if rule.dominant {
                break;
            }
        }
    }

    BlinkPlan {
        channels,
        // Non-negative and bounded by on_ms after the clamp above.
        rise: rise as u32,
        hold: hold as u32,
        fall: fall as u32,
        off: off_ms,
    }
}
