use serde::{Deserialize, Serialize};
use std::fmt;
use crate::{Capacity, RouterId};

/// Key of a link as it was registered. Lookups try both orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey(pub RouterId, pub RouterId);

impl LinkKey {
    pub fn new(r1: RouterId, r2: RouterId) -> Self {
        Self(r1, r2)
    }

    pub fn reversed(self) -> Self {
        Self(self.1, self.0)
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Undirected edge between two routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub r1: RouterId,
    pub r2: RouterId,
    pub capacity: Capacity,
}

impl Link {
    pub fn new(r1: RouterId, r2: RouterId, capacity: Capacity) -> Self {
        Self { r1, r2, capacity }
    }
}
