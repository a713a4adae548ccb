//! Cancellable timer capability used by the toast controller.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

mod manual;
mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Identifies a shown toast. Strictly increasing per controller.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerHandle(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickKind {
    /// Display time elapsed; start the exit phase.
    AutoHide,
    /// Exit phase elapsed; drop the toast.
    Remove,
}

/// A fired timer, scoped to the toast it was scheduled for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tick {
    pub toast: ToastId,
    pub kind: TickKind,
}

impl Tick {
    #[must_use]
    pub const fn auto_hide(toast: ToastId) -> Self {
        Self {
            toast,
            kind: TickKind::AutoHide,
        }
    }

    #[must_use]
    pub const fn remove(toast: ToastId) -> Self {
        Self {
            toast,
            kind: TickKind::Remove,
        }
    }
}

pub trait Scheduler {
    /// Arrange for `tick` to be delivered back to the controller after `after`.
    fn schedule(&mut self, after: Duration, tick: Tick) -> TimerHandle;

    /// Cancel a pending timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
