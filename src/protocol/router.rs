use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use crate::config::ProtocolConfig;
use crate::error::RouterError;
use crate::RouterId;
use super::{HopTable, Outbound, ProbeEngine, Registry, RouterMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Running,
    Stopped,
}

enum Lifecycle {
    Idle {
        inbox: mpsc::Receiver<RouterMessage>,
    },
    Running {
        shutdown: watch::Sender<bool>,
        task: JoinHandle<Result<HopTable, RouterError>>,
    },
    Stopped,
}

/// Handle on one router actor.
///
/// The best-hop table lives inside the worker task; the handle only reaches it
/// through the mailbox or by stopping the worker.
pub struct Router {
    id: RouterId,
    config: ProtocolConfig,
    mailbox: mpsc::Sender<RouterMessage>,
    lifecycle: Lifecycle,
}

impl Router {
    /// A zero send cycle or queue capacity is raised to one.
    pub fn new(id: RouterId, config: &ProtocolConfig) -> Self {
        let config = ProtocolConfig {
            send_cycle: config.send_cycle.max(1),
            queue_capacity: config.queue_capacity.max(1),
            ..config.clone()
        };
        let (mailbox, inbox) = mpsc::channel(config.queue_capacity);
        Self {
            id,
            config,
            mailbox,
            lifecycle: Lifecycle::Idle { inbox },
        }
    }

    pub fn id(&self) -> RouterId {
        self.id
    }

    /// Sender side of this router's mailbox, for wiring into a [`Registry`].
    pub fn mailbox(&self) -> mpsc::Sender<RouterMessage> {
        self.mailbox.clone()
    }

    pub fn state(&self) -> RouterState {
        match self.lifecycle {
            Lifecycle::Idle { .. } => RouterState::Idle,
            Lifecycle::Running { .. } => RouterState::Running,
            Lifecycle::Stopped => RouterState::Stopped,
        }
    }

    /// Spawns the worker. Must be called from inside a tokio runtime.
    pub fn start(&mut self, registry: Arc<Registry>) -> Result<(), RouterError> {
        let inbox = match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle { inbox } => inbox,
            other => {
                self.lifecycle = other;
                return Err(RouterError::AlreadyStarted(self.id));
            }
        };

        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = RouterWorker {
            engine: ProbeEngine::new(self.id, registry.topology().clone(), self.config.update_window()),
            registry,
            inbox,
            shutdown: shutdown_rx,
            send_cycle: self.config.send_cycle(),
        };

        let task = tokio::spawn(worker.run());
        self.lifecycle = Lifecycle::Running { shutdown, task };

        info!("Router {} started (send cycle {:?})", self.id, self.config.send_cycle());
        Ok(())
    }

    /// Asks the worker to exit without waiting for it.
    pub fn request_stop(&self) {
        if let Lifecycle::Running { shutdown, .. } = &self.lifecycle {
            // The worker may already be gone after a fault.
            let _ = shutdown.send(true);
        }
    }

    /// Stops the worker and hands back its final table.
    ///
    /// Probes still queued are dropped. A router that was never started stops
    /// with an empty table.
    pub async fn stop(&mut self) -> Result<HopTable, RouterError> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle { .. } => {
                info!("Router {} stopped before it was started", self.id);
                Ok(HopTable::new())
            }
            Lifecycle::Running { shutdown, task } => {
                let _ = shutdown.send(true);
                match task.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Router {} worker failed: {}", self.id, e);
                        Err(RouterError::WorkerPanicked(self.id))
                    }
                }
            }
            Lifecycle::Stopped => Err(RouterError::NotRunning(self.id)),
        }
    }

    /// Copy of the best-hop table, produced by the worker between two events.
    pub async fn inspect(&self) -> Result<HopTable, RouterError> {
        if self.state() != RouterState::Running {
            return Err(RouterError::NotRunning(self.id));
        }

        let (reply, response) = oneshot::channel();
        self.mailbox
            .send(RouterMessage::Inspect(reply))
            .await
            .map_err(|_| RouterError::MailboxClosed(self.id))?;
        response.await.map_err(|_| RouterError::MailboxClosed(self.id))
    }
}

struct RouterWorker {
    engine: ProbeEngine,
    registry: Arc<Registry>,
    inbox: mpsc::Receiver<RouterMessage>,
    shutdown: watch::Receiver<bool>,
    send_cycle: Duration,
}

impl RouterWorker {
    async fn run(mut self) -> Result<HopTable, RouterError> {
        let id = self.engine.id();
        let mut ticker = interval_at(Instant::now() + self.send_cycle, self.send_cycle);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    debug!("Router {} received stop", id);
                    break;
                }
                message = self.inbox.recv() => match message {
                    Some(RouterMessage::Probe(probe)) => {
                        let outbound = match self.engine.handle_probe(&probe, Instant::now()) {
                            Ok(outbound) => outbound,
                            Err(e) => {
                                error!("Router {} halted: {}", id, e);
                                return Err(e);
                            }
                        };
                        if self.dispatch(outbound).await.is_break() {
                            break;
                        }
                    }
                    Some(RouterMessage::Inspect(reply)) => {
                        let _ = reply.send(self.engine.table().clone());
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    let outbound = self.engine.originate();
                    if self.dispatch(outbound).await.is_break() {
                        break;
                    }
                }
            }
        }

        self.close();
        Ok(self.engine.into_table())
    }

    /// Sends each probe in turn. A full mailbox blocks the worker until there is
    /// room or a stop is requested.
    async fn dispatch(&mut self, outbound: Vec<Outbound>) -> ControlFlow<()> {
        let id = self.engine.id();

        for Outbound { to, probe } in outbound {
            tokio::select! {
                result = self.registry.deliver(to, probe) => match result {
                    Ok(()) => {}
                    Err(e @ RouterError::MailboxClosed(_)) => {
                        debug!("router {} send probe to {} failed: {}", id, to, e);
                    }
                    Err(e) => {
                        warn!("router {} send probe to {} failed: {}", id, to, e);
                    }
                },
                _ = self.shutdown.changed() => {
                    debug!("Router {} received stop while sending", id);
                    return ControlFlow::Break(());
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Refuses further sends and discards whatever is still queued.
    fn close(&mut self) {
        let id = self.engine.id();
        self.inbox.close();

        let mut dropped = 0usize;
        while let Ok(message) = self.inbox.try_recv() {
            if let RouterMessage::Probe(_) = message {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("Router {} dropped {} queued probes", id, dropped);
        }

        info!("Router {} stopped with {} routes", id, self.engine.table().len());
    }
}
