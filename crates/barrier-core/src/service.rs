//! Event-loop actor around a [`BarrierController`].
//!
//! All mutation happens on one tokio task fed by an mpsc channel. An
//! accepted request spawns a sleeper that posts `Complete { transition_id }`
//! back to the loop once the transition delay has elapsed. Every event the
//! controller produces is broadcast to subscribers.

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::barrier::{BarrierAction, BarrierController, Snapshot, TransitionOutcome};
use crate::error::{CoreError, Result};
use crate::events::Event;

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

enum Command {
    Request {
        action: BarrierAction,
        reply: oneshot::Sender<TransitionOutcome>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    Complete {
        transition_id: u64,
    },
    Shutdown,
}

/// Cloneable client side of a running [`BarrierService`].
#[derive(Clone)]
pub struct BarrierHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl BarrierHandle {
    /// Submit a transition request. Rejections are returned, not raised.
    pub async fn request(&self, action: BarrierAction) -> Result<TransitionOutcome> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(Command::Request { action, reply }).await?;
        Ok(rx.await?)
    }

    pub async fn open(&self) -> Result<TransitionOutcome> {
        self.request(BarrierAction::Open).await
    }

    pub async fn close(&self) -> Result<TransitionOutcome> {
        self.request(BarrierAction::Close).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(Command::Snapshot { reply }).await?;
        Ok(rx.await?)
    }

    /// Receive every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Ask the service to stop once any in-flight transition has completed.
    pub async fn shutdown(&self) -> Result<()> {
        self.commands.send(Command::Shutdown).await?;
        Ok(())
    }
}

/// A spawned controller task.
pub struct BarrierService {
    handle: BarrierHandle,
    task: JoinHandle<BarrierController>,
}

impl BarrierService {
    /// Spawn the event loop on the current tokio runtime.
    pub fn spawn(controller: BarrierController) -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let task = tokio::spawn(run(controller, rx, commands.downgrade(), events.clone()));
        Self {
            handle: BarrierHandle { commands, events },
            task,
        }
    }

    pub fn handle(&self) -> BarrierHandle {
        self.handle.clone()
    }

    /// Wait for the loop to exit and take back the controller.
    ///
    /// The loop exits after [`BarrierHandle::shutdown`] or once every
    /// handle has been dropped, in both cases only after an in-flight
    /// transition has completed.
    pub async fn join(self) -> Result<BarrierController> {
        let Self { handle, task } = self;
        drop(handle);
        task.await
            .map_err(|e| CoreError::Custom(format!("barrier service task failed: {e}")))
    }
}

async fn run(
    mut controller: BarrierController,
    mut rx: mpsc::Receiver<Command>,
    scheduler: mpsc::WeakSender<Command>,
    events: broadcast::Sender<Event>,
) -> BarrierController {
    let mut draining = false;

    while let Some(command) = rx.recv().await {
        match command {
            Command::Request { action, reply } => {
                if draining {
                    // Reply dropped: caller sees ServiceStopped.
                    continue;
                }
                let outcome = controller.request_transition(action);
                if let TransitionOutcome::Accepted(Event::TransitionStarted {
                    transition_id, ..
                }) = &outcome
                {
                    schedule_completion(
                        &scheduler,
                        *transition_id,
                        controller.transition_duration(),
                    );
                }
                // No subscribers is fine.
                let _ = events.send(outcome.event().clone());
                let _ = reply.send(outcome);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(controller.snapshot());
            }
            Command::Complete { transition_id } => {
                if let Some(event) = controller.complete(transition_id, Utc::now()) {
                    let _ = events.send(event);
                }
            }
            Command::Shutdown => {
                tracing::debug!("barrier service shutdown requested");
                draining = true;
            }
        }

        if draining && controller.pending().is_none() {
            break;
        }
    }

    tracing::debug!(status = %controller.status(), "barrier service stopped");
    controller
}

fn schedule_completion(
    scheduler: &mpsc::WeakSender<Command>,
    transition_id: u64,
    delay: std::time::Duration,
) {
    // The sleeper holds a strong sender so the loop outlives every handle
    // until the transition has landed.
    let Some(tx) = scheduler.upgrade() else {
        tracing::warn!(transition_id, "no live handles, completion not scheduled");
        return;
    };
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Command::Complete { transition_id }).await;
    });
}
