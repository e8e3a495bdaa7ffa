use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, warn};
use tokio::time::Instant;
use crate::error::RouterError;
use crate::network::Topology;
use crate::{Capacity, RouterId};
use super::{HopTable, HopTableEntry, Probe};

/// A probe waiting to be handed to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outbound {
    pub to: RouterId,
    pub probe: Probe,
}

/// Per-router protocol state: best-hop table plus the time each destination
/// was last announced.
///
/// Handling is synchronous; the caller decides when and how the resulting
/// [`Outbound`] probes are delivered.
pub struct ProbeEngine {
    id: RouterId,
    topology: Arc<Topology>,
    update_window: Duration,
    best_hops: HopTable,
    last_announced: HashMap<RouterId, Instant>,
}

impl ProbeEngine {
    pub fn new(id: RouterId, topology: Arc<Topology>, update_window: Duration) -> Self {
        Self {
            id,
            topology,
            update_window,
            best_hops: HopTable::new(),
            last_announced: HashMap::new(),
        }
    }

    pub fn id(&self) -> RouterId {
        self.id
    }

    pub fn table(&self) -> &HopTable {
        &self.best_hops
    }

    pub fn into_table(self) -> HopTable {
        self.best_hops
    }

    /// One self-originated probe per neighbor, carrying the capacity of the
    /// link toward that neighbor.
    pub fn originate(&self) -> Vec<Outbound> {
        self.topology
            .neighbors(self.id)
            .iter()
            .filter_map(|&neighbor| match self.link_capacity(neighbor) {
                Some(capacity) => Some(Outbound {
                    to: neighbor,
                    probe: Probe::originate(self.id, capacity),
                }),
                None => {
                    warn!("router {} can't find the link between {}", self.id, neighbor);
                    None
                }
            })
            .collect()
    }

    pub fn handle_probe(&mut self, probe: &Probe, now: Instant) -> Result<Vec<Outbound>, RouterError> {
        if probe.dest == self.id {
            return Ok(Vec::new());
        }

        let dest = probe.dest;
        let Some(mut entry) = self.best_hops.get(dest).copied() else {
            return Ok(self.discover(probe, now));
        };

        if entry.consider(probe, self.link_capacity(probe.sender)) {
            debug!(
                "router {} -> {}: via {} at {} hops, capacity {}",
                self.id, dest, entry.next_hop, entry.distance, entry.capacity
            );
        }
        self.best_hops.insert(dest, entry);

        let last = *self
            .last_announced
            .get(&dest)
            .ok_or(RouterError::MissingUpdateRecord { router: self.id, dest })?;

        if !entry.dirty || now.saturating_duration_since(last) < self.update_window {
            return Ok(Vec::new());
        }

        let outbound = self.announce(dest, &entry);
        self.last_announced.insert(dest, now);
        if let Some(stored) = self.best_hops.get_mut(dest) {
            stored.dirty = false;
        }
        Ok(outbound)
    }

    /// First news of `probe.dest`: adopt the path and flood it right away.
    fn discover(&mut self, probe: &Probe, now: Instant) -> Vec<Outbound> {
        let entry = HopTableEntry::new(probe.sender, probe.path_dis.saturating_add(1), probe.path_bls);
        debug!(
            "router {} discovered {} via {} at {} hops, capacity {}",
            self.id, probe.dest, entry.next_hop, entry.distance, entry.capacity
        );

        self.last_announced.insert(probe.dest, now);
        let outbound = self.announce(probe.dest, &entry);
        self.best_hops.insert(probe.dest, entry);
        outbound
    }

    /// The entry as seen by each neighbor, clamped to the link toward it.
    fn announce(&self, dest: RouterId, entry: &HopTableEntry) -> Vec<Outbound> {
        self.topology
            .neighbors(self.id)
            .iter()
            .filter_map(|&neighbor| {
                let Some(capacity) = self.link_capacity(neighbor) else {
                    warn!("router {} can't find the link between {}", self.id, neighbor);
                    return None;
                };
                Some(Outbound {
                    to: neighbor,
                    probe: Probe {
                        dest,
                        sender: self.id,
                        path_dis: entry.distance,
                        path_bls: entry.capacity.min(capacity),
                    },
                })
            })
            .collect()
    }

    fn link_capacity(&self, neighbor: RouterId) -> Option<Capacity> {
        self.topology.link(self.id, neighbor).map(|link| link.capacity)
    }
}
