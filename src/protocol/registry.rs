use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use crate::error::{RouterError, TopologyError};
use crate::network::Topology;
use crate::RouterId;
use super::{Probe, RouterMessage};

/// Directory shared by every router: the topology plus the mailbox of each
/// router.
///
/// Filled in before the routers start, then frozen behind an `Arc`; nothing
/// writes to it afterwards, so workers read it without locking.
#[derive(Debug)]
pub struct Registry {
    topology: Arc<Topology>,
    mailboxes: HashMap<RouterId, mpsc::Sender<RouterMessage>>,
}

impl Registry {
    pub fn new(topology: Arc<Topology>) -> Self {
        Self {
            topology,
            mailboxes: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: RouterId, mailbox: mpsc::Sender<RouterMessage>) -> Result<(), TopologyError> {
        if !self.topology.contains(id) {
            return Err(TopologyError::UnknownRouter(id));
        }
        if self.contains(id) {
            return Err(TopologyError::DuplicateRouter(id));
        }
        self.mailboxes.insert(id, mailbox);
        Ok(())
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn contains(&self, id: RouterId) -> bool {
        self.mailboxes.contains_key(&id)
    }

    /// Queues `probe` for router `to`, waiting while its mailbox is full.
    pub async fn deliver(&self, to: RouterId, probe: Probe) -> Result<(), RouterError> {
        let mailbox = self
            .mailboxes
            .get(&to)
            .ok_or(RouterError::NeighborNotFound(to))?;

        mailbox
            .send(RouterMessage::Probe(probe))
            .await
            .map_err(|_| RouterError::MailboxClosed(to))
    }
}
