use std::time::Duration;

use crate::controller::{DEFAULT_DISPLAY_FOR, DEFAULT_FADE_OUT};

pub(super) const fn default_display_for() -> Duration {
    DEFAULT_DISPLAY_FOR
}

pub(super) const fn default_fade_out() -> Duration {
    DEFAULT_FADE_OUT
}

pub(super) const fn default_bus_capacity() -> usize {
    16
}
