//! Single-slot toast state machine.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::event::{EventBus, ShowToast, Subscription};
use crate::presentation::{Presentation, PresentationTable};
use crate::timer::{ManualScheduler, Scheduler, Tick, TickKind, TimerHandle, ToastId};
use crate::types::Level;

pub const DEFAULT_DISPLAY_FOR: Duration = Duration::from_millis(5_000);
pub const DEFAULT_FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ToastSettings {
    /// How long a toast stays visible before it starts hiding.
    pub display_for: Duration,
    /// Exit phase between `visible = false` and removal.
    pub fade_out: Duration,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            display_for: DEFAULT_DISPLAY_FOR,
            fade_out: DEFAULT_FADE_OUT,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastState {
    pub id: ToastId,
    pub level: Level,
    pub message: String,
    pub visible: bool,
    pub presentation: Presentation,
}

/// What a renderer needs to draw the current toast.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ToastView {
    pub id: ToastId,
    pub visible: bool,
    pub level: Level,
    pub message: String,
    pub icon: String,
    pub style: String,
}

impl From<&ToastState> for ToastView {
    fn from(state: &ToastState) -> Self {
        Self {
            id: state.id,
            visible: state.visible,
            level: state.level,
            message: state.message.clone(),
            icon: state.presentation.icon.clone(),
            style: state.presentation.style.clone(),
        }
    }
}

pub struct ToastController<S> {
    scheduler: S,
    settings: ToastSettings,
    table: PresentationTable,
    current: Option<ToastState>,
    pending: Option<TimerHandle>,
    last_id: u64,
    subscription: Option<Subscription>,
}

impl<S: Scheduler> ToastController<S> {
    pub fn new(scheduler: S, settings: ToastSettings, table: PresentationTable) -> Self {
        Self {
            scheduler,
            settings,
            table,
            current: None,
            pending: None,
            last_id: 0,
            subscription: None,
        }
    }

    /// Subscribe to `showToast` events on `bus`, replacing any previous
    /// subscription.
    pub fn initialize(&mut self, bus: &EventBus) {
        self.subscription = Some(bus.subscribe());
        debug!("toast controller subscribed to bus");
    }

    /// Drop the bus subscription and any pending timer. The current toast, if
    /// any, is left as is.
    pub fn dispose(&mut self) {
        self.subscription = None;
        self.cancel_pending();
        debug!("toast controller disposed");
    }

    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace whatever toast is showing with a new one and restart the
    /// auto-hide countdown.
    pub fn show_toast(&mut self, level: &str, message: impl Into<String>) -> ToastId {
        self.cancel_pending();

        self.last_id += 1;
        let id = ToastId(self.last_id);
        let level = Level::lenient(level);
        let state = ToastState {
            id,
            level,
            message: message.into(),
            visible: true,
            presentation: self.table.get(level).clone(),
        };
        debug!(toast = %id, %level, message = %state.message, "showing toast");
        self.current = Some(state);

        self.pending = Some(
            self.scheduler
                .schedule(self.settings.display_for, Tick::auto_hide(id)),
        );
        id
    }

    /// Start the exit phase of the current toast. Without a toast, or when the
    /// toast is already hiding, nothing happens.
    pub fn hide_toast(&mut self) {
        let Some(id) = self.current.as_ref().filter(|t| t.visible).map(|t| t.id) else {
            trace!("hide requested without a visible toast");
            return;
        };
        self.cancel_pending();
        if let Some(toast) = self.current.as_mut() {
            toast.visible = false;
        }
        debug!(toast = %id, "hiding toast");
        self.pending = Some(
            self.scheduler
                .schedule(self.settings.fade_out, Tick::remove(id)),
        );
    }

    /// Apply a fired timer. Ticks scheduled for a toast that is no longer
    /// current, or for a phase the toast already left, are ignored.
    pub fn handle_tick(&mut self, tick: Tick) {
        let visible = match self.current.as_ref() {
            Some(toast) if toast.id == tick.toast => toast.visible,
            _ => {
                trace!(toast = %tick.toast, kind = ?tick.kind, "stale tick ignored");
                return;
            }
        };
        match (tick.kind, visible) {
            (TickKind::AutoHide, true) => {
                self.pending = None;
                self.hide_toast();
            }
            (TickKind::Remove, false) => {
                self.pending = None;
                self.current = None;
                debug!(toast = %tick.toast, "toast removed");
            }
            _ => trace!(toast = %tick.toast, kind = ?tick.kind, "out of phase tick ignored"),
        }
    }

    pub fn on_event(&mut self, event: &ShowToast) -> ToastId {
        self.show_toast(&event.level, event.message.clone())
    }

    /// Apply every event already queued on the subscription.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.on_event(&event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next bus event. Resolves to `None` once the bus is closed;
    /// stays pending forever when not subscribed.
    pub async fn next_event(&mut self) -> Option<ShowToast> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => std::future::pending().await,
        }
    }

    #[must_use]
    pub fn presentation_for(&self, level: &str) -> &Presentation {
        self.table.resolve(level)
    }

    #[must_use]
    pub const fn current(&self) -> Option<&ToastState> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn view(&self) -> Option<ToastView> {
        self.current.as_ref().map(ToastView::from)
    }

    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl ToastController<ManualScheduler> {
    /// Controller on a simulated clock.
    #[must_use]
    pub fn simulated(settings: ToastSettings, table: PresentationTable) -> Self {
        Self::new(ManualScheduler::new(), settings, table)
    }

    /// Move simulated time forward by `by`, firing every tick that comes due,
    /// including ticks scheduled while advancing.
    pub fn advance(&mut self, by: Duration) {
        let target = self.scheduler.now() + by;
        while let Some(tick) = self.scheduler.pop_due(target) {
            self.handle_tick(tick);
        }
        self.scheduler.set_now(target);
    }
}

#[cfg(test)]
mod tests {
    use super::{ToastController, ToastSettings};
    use crate::event::{EventBus, ShowToast};
    use crate::presentation::PresentationTable;
    use crate::timer::{ManualScheduler, Tick, ToastId};
    use crate::types::Level;
    use std::time::Duration;

    fn controller() -> ToastController<ManualScheduler> {
        ToastController::simulated(ToastSettings::default(), PresentationTable::classes())
    }

    const fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn show_creates_visible_toast() {
        let mut toasts = controller();
        let id = toasts.show_toast("success", "Saved");

        let toast = toasts.current().cloned();
        let Some(toast) = toast else {
            panic!("toast should exist after show");
        };
        assert_eq!(toast.id, id);
        assert_eq!(toast.level, Level::Success);
        assert_eq!(toast.message, "Saved");
        assert!(toast.visible);
        assert_eq!(toast.presentation.icon, "heroicons:check-circle-solid");
    }

    #[test]
    fn auto_hide_then_remove() {
        let mut toasts = controller();
        toasts.show_toast("info", "Hello");

        toasts.advance(ms(4_999));
        assert_eq!(toasts.current().map(|t| t.visible), Some(true));

        toasts.advance(ms(1));
        assert_eq!(toasts.current().map(|t| t.visible), Some(false));

        toasts.advance(ms(299));
        assert!(toasts.current().is_some());

        toasts.advance(ms(1));
        assert!(toasts.current().is_none());
        assert_eq!(toasts.scheduler().pending(), 0);
    }

    #[test]
    fn second_show_replaces_and_resets_timer() {
        let mut toasts = controller();
        toasts.show_toast("success", "Saved");
        toasts.advance(ms(3_000));
        toasts.show_toast("error", "Failed");

        assert_eq!(toasts.scheduler().pending(), 1);
        let toast = toasts.current();
        assert_eq!(toast.map(|t| t.level), Some(Level::Error));
        assert_eq!(toast.map(|t| t.message.as_str()), Some("Failed"));

        toasts.advance(ms(4_999));
        assert_eq!(toasts.current().map(|t| t.visible), Some(true));
        toasts.advance(ms(1));
        assert_eq!(toasts.current().map(|t| t.visible), Some(false));
    }

    #[test]
    fn back_to_back_shows_keep_one_timer() {
        let mut toasts = controller();
        toasts.show_toast("success", "Saved");
        toasts.show_toast("error", "Failed");

        assert_eq!(toasts.scheduler().pending(), 1);
        assert_eq!(
            toasts.view().map(|v| (v.level, v.message)),
            Some((Level::Error, "Failed".to_string()))
        );
    }

    #[test]
    fn hide_without_toast_is_noop() {
        let mut toasts = controller();
        toasts.hide_toast();
        assert!(toasts.current().is_none());
        assert_eq!(toasts.scheduler().pending(), 0);
    }

    #[test]
    fn manual_hide_before_timeout() {
        let mut toasts = controller();
        toasts.show_toast("warning", "Careful");
        toasts.advance(ms(1_000));
        toasts.hide_toast();

        assert_eq!(toasts.current().map(|t| t.visible), Some(false));
        toasts.advance(ms(300));
        assert!(toasts.current().is_none());

        toasts.advance(ms(10_000));
        assert!(toasts.current().is_none());
        assert_eq!(toasts.scheduler().pending(), 0);
    }

    #[test]
    fn repeated_hide_keeps_original_removal_deadline() {
        let mut toasts = controller();
        toasts.show_toast("info", "x");
        toasts.hide_toast();
        toasts.advance(ms(200));
        toasts.hide_toast();
        toasts.advance(ms(100));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn show_during_fade_out_survives_old_removal() {
        let mut toasts = controller();
        toasts.show_toast("success", "first");
        toasts.hide_toast();
        toasts.advance(ms(100));
        let second = toasts.show_toast("info", "second");

        toasts.advance(ms(400));
        assert_eq!(toasts.current().map(|t| t.id), Some(second));
        assert_eq!(toasts.current().map(|t| t.visible), Some(true));
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut toasts = controller();
        let first = toasts.show_toast("success", "first");
        let second = toasts.show_toast("error", "second");
        assert!(second > first);

        toasts.handle_tick(Tick::auto_hide(first));
        toasts.handle_tick(Tick::remove(first));
        assert_eq!(toasts.current().map(|t| (t.id, t.visible)), Some((second, true)));

        toasts.handle_tick(Tick::remove(ToastId(99)));
        assert!(toasts.current().is_some());
    }

    #[test]
    fn late_auto_hide_after_manual_hide_keeps_removal() {
        let mut toasts = controller();
        let id = toasts.show_toast("info", "x");
        toasts.hide_toast();
        toasts.handle_tick(Tick::auto_hide(id));
        assert_eq!(toasts.scheduler().pending(), 1);

        toasts.advance(ms(300));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn presentation_for_unknown_level_is_info() {
        let toasts = controller();
        assert_eq!(
            toasts.presentation_for("bogus"),
            toasts.presentation_for("info")
        );
        assert_eq!(
            toasts.presentation_for("error").icon,
            "heroicons:x-circle-solid"
        );
    }

    #[test]
    fn level_names_are_case_sensitive() {
        let mut toasts = controller();
        let info_icon = "heroicons:information-circle-solid";
        for raw in ["SUCCESS", " error ", "Warning"] {
            assert_eq!(toasts.presentation_for(raw).icon, info_icon, "{raw:?}");
            toasts.show_toast(raw, "x");
            assert_eq!(toasts.current().map(|t| t.level), Some(Level::Info));
        }
    }

    #[test]
    fn unknown_level_shows_as_info() {
        let mut toasts = controller();
        toasts.show_toast("critical", "??");
        assert_eq!(toasts.current().map(|t| t.level), Some(Level::Info));
    }

    #[test]
    fn custom_durations_are_honoured() {
        let settings = ToastSettings {
            display_for: ms(1_000),
            fade_out: ms(50),
        };
        let mut toasts = ToastController::simulated(settings, PresentationTable::inline());
        toasts.show_toast("info", "quick");
        toasts.advance(ms(1_050));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn pumped_events_show_toasts() {
        let bus = EventBus::default();
        let mut toasts = controller();
        toasts.initialize(&bus);
        assert!(toasts.is_subscribed());

        bus.publish(ShowToast::new("success", "Saved"));
        bus.publish(ShowToast::new("error", "Failed"));
        assert_eq!(toasts.pump_events(), 2);
        assert_eq!(
            toasts.view().map(|v| v.message),
            Some("Failed".to_string())
        );
        assert_eq!(toasts.scheduler().pending(), 1);
    }

    #[test]
    fn dispose_stops_delivery() {
        let bus = EventBus::default();
        let mut toasts = controller();
        toasts.initialize(&bus);
        toasts.dispose();

        assert_eq!(bus.publish(ShowToast::new("info", "lost")), 0);
        assert_eq!(toasts.pump_events(), 0);
        assert!(toasts.current().is_none());
    }

    #[test]
    fn dispose_cancels_pending_timer() {
        let mut toasts = controller();
        toasts.show_toast("info", "sticky now");
        toasts.dispose();
        toasts.advance(ms(60_000));
        assert_eq!(toasts.current().map(|t| t.visible), Some(true));
    }
}
