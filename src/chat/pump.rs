//! Background worker delivering simulated replies.
//!
//! Polls the shared session on a fixed tick and appends every reply whose
//! delay has elapsed. Shutting the pump down stands for unmounting the view:
//! pending replies are cancelled and never delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::chat::session::{ChatSession, DeliveredReply};

/// Session handle shared between the view and the pump.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Reply delivery worker.
pub struct ReplyPump {
    session: SharedSession,
    tick: Duration,
    shutdown: Arc<Notify>,
    listener: Option<mpsc::UnboundedSender<DeliveredReply>>,
}

impl ReplyPump {
    /// Create a pump polling `session` every `tick`.
    #[must_use]
    pub fn new(session: SharedSession, tick: Duration) -> Self {
        Self {
            session,
            tick,
            shutdown: Arc::new(Notify::new()),
            listener: None,
        }
    }

    /// Forward delivered replies to `listener`.
    #[must_use]
    pub fn with_listener(mut self, listener: mpsc::UnboundedSender<DeliveredReply>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Get a shutdown notifier to stop the pump.
    ///
    /// Use `notify_one`; the signal is kept if the pump is not waiting yet.
    #[must_use]
    pub fn shutdown_notifier(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Spawn the pump as a tokio task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        info!(tick = ?self.tick, "Starting reply pump");

        loop {
            tokio::select! {
                () = tokio::time::sleep(self.tick) => {
                    self.pump_once().await;
                }
                () = self.shutdown.notified() => {
                    let cancelled = self.session.lock().await.cancel_all_replies();
                    info!(cancelled, "Reply pump shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver due replies once. Returns how many were delivered.
    pub async fn pump_once(&self) -> usize {
        let delivered = self.session.lock().await.deliver_due_replies();
        let count = delivered.len();

        if let Some(listener) = &self.listener {
            for reply in delivered {
                if listener.send(reply).is_err() {
                    debug!("Reply listener dropped");
                    break;
                }
            }
        }
        count
    }
}
