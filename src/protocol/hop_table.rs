use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::{Capacity, RouterId};
use super::Probe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopTableEntry {
    pub next_hop: RouterId,
    pub distance: u32,
    /// Bottleneck capacity of the chosen path.
    pub capacity: Capacity,
    /// Changed since it was last announced to the neighbors.
    pub dirty: bool,
}

impl HopTableEntry {
    pub fn new(next_hop: RouterId, distance: u32, capacity: Capacity) -> Self {
        Self {
            next_hop,
            distance,
            capacity,
            dirty: false,
        }
    }

    /// Applies `probe` to this entry and returns whether anything was taken from it.
    ///
    /// Order of preference: fresh data from the current next hop, then a strictly
    /// shorter path, then an equally long path with a strictly wider bottleneck.
    /// `link_to_sender` is the capacity of the link the probe arrived on.
    pub fn consider(&mut self, probe: &Probe, link_to_sender: Option<Capacity>) -> bool {
        let distance = probe.path_dis.saturating_add(1);

        if probe.sender == self.next_hop {
            self.distance = distance;
            self.capacity = link_to_sender.map_or(probe.path_bls, |link| link.min(probe.path_bls));
            self.dirty = true;
            return true;
        }

        let shorter = distance < self.distance;
        let wider = distance == self.distance && probe.path_bls > self.capacity;
        if !(shorter || wider) {
            return false;
        }

        self.next_hop = probe.sender;
        self.distance = distance;
        self.capacity = probe.path_bls;
        self.dirty = true;
        true
    }

    pub fn route(&self) -> Route {
        Route {
            next_hop: self.next_hop,
            distance: self.distance,
            capacity: self.capacity,
        }
    }
}

/// Public view of an entry, without the bookkeeping flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub next_hop: RouterId,
    pub distance: u32,
    pub capacity: Capacity,
}

/// Best next hop toward every destination a router has heard of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HopTable {
    entries: BTreeMap<RouterId, HopTableEntry>,
}

impl HopTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dest: RouterId) -> Option<&HopTableEntry> {
        self.entries.get(&dest)
    }

    pub fn get_mut(&mut self, dest: RouterId) -> Option<&mut HopTableEntry> {
        self.entries.get_mut(&dest)
    }

    pub fn insert(&mut self, dest: RouterId, entry: HopTableEntry) {
        self.entries.insert(dest, entry);
    }

    pub fn contains(&self, dest: RouterId) -> bool {
        self.entries.contains_key(&dest)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouterId, &HopTableEntry)> {
        self.entries.iter().map(|(dest, entry)| (*dest, entry))
    }

    pub fn route(&self, dest: RouterId) -> Option<Route> {
        self.get(dest).map(HopTableEntry::route)
    }

    pub fn routes(&self) -> BTreeMap<RouterId, Route> {
        self.iter().map(|(dest, entry)| (dest, entry.route())).collect()
    }
}
