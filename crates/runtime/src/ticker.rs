use crate::editor::EditorEvent;
use isound_core::TickSource;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Clock timer backed by a tokio interval task.
///
/// Each tick is posted to the editor's event queue tagged with the generation
/// it was started for. The task only holds a weak sender, so it never keeps
/// the queue open on its own.
pub struct TokioTicker {
    runtime: Handle,
    events: mpsc::WeakUnboundedSender<EditorEvent>,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(runtime: Handle, events: &mpsc::UnboundedSender<EditorEvent>) -> Self {
        Self {
            runtime,
            events: events.downgrade(),
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl TickSource for TokioTicker {
    fn start(&mut self, generation: u64, interval: Duration) {
        self.stop();

        let period = interval.max(Duration::from_millis(1));
        let events = self.events.clone();
        self.task = Some(self.runtime.spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(sender) = events.upgrade() else {
                    break;
                };
                if sender.send(EditorEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
