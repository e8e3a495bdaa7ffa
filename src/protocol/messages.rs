use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use crate::{Capacity, RouterId};
use super::HopTable;

/// "`dest` is reachable through `sender`, `path_dis` hops away, with
/// bottleneck capacity `path_bls`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub dest: RouterId,
    pub sender: RouterId,
    pub path_dis: u32,
    pub path_bls: Capacity,
}

impl Probe {
    /// Probe a router sends about itself over a link of capacity `link_capacity`.
    pub fn originate(router: RouterId, link_capacity: Capacity) -> Self {
        Self {
            dest: router,
            sender: router,
            path_dis: 0,
            path_bls: link_capacity,
        }
    }
}

/// Everything that can land in a router's mailbox.
#[derive(Debug)]
pub enum RouterMessage {
    Probe(Probe),
    /// Ask the owning worker for a copy of its best-hop table.
    Inspect(oneshot::Sender<HopTable>),
}
