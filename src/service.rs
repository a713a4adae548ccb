use std::future::Future;

use async_channel::Receiver;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::controller::{ToastController, ToastSettings, ToastView};
use crate::event::EventBus;
use crate::presentation::PresentationTable;
use crate::timer::{Tick, TokioScheduler};

/// Drives a [`ToastController`] on wall-clock time and publishes every view
/// change on a watch channel.
pub struct ToastService {
    controller: ToastController<TokioScheduler>,
    ticks: Receiver<Tick>,
    views: watch::Sender<Option<ToastView>>,
}

impl ToastService {
    /// Build a service already subscribed to `bus`. Must be called from within
    /// a tokio runtime.
    #[must_use]
    pub fn new(
        bus: &EventBus,
        settings: ToastSettings,
        table: PresentationTable,
    ) -> (Self, watch::Receiver<Option<ToastView>>) {
        let (scheduler, ticks) = TokioScheduler::new();
        let mut controller = ToastController::new(scheduler, settings, table);
        controller.initialize(bus);
        let (views, rx) = watch::channel(None);
        (
            Self {
                controller,
                ticks,
                views,
            },
            rx,
        )
    }

    /// Run until `shutdown` resolves, or until the bus has closed and the last
    /// toast has been removed.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut bus_open = true;

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutdown requested, stopping toast service");
                    break;
                }
                tick = self.ticks.recv() => match tick {
                    Ok(tick) => self.controller.handle_tick(tick),
                    Err(err) => {
                        warn!(error = %err, "timer channel closed");
                        break;
                    }
                },
                event = self.controller.next_event(), if bus_open => match event {
                    Some(event) => {
                        self.controller.on_event(&event);
                    }
                    None => {
                        debug!("event bus closed");
                        bus_open = false;
                    }
                },
            }

            self.publish();
            if !bus_open && self.controller.current().is_none() {
                break;
            }
        }

        self.controller.dispose();
    }

    fn publish(&self) {
        let next = self.controller.view();
        self.views.send_if_modified(|view| {
            if *view == next {
                false
            } else {
                *view = next;
                true
            }
        });
    }
}
