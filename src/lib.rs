pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
pub mod report;
pub mod simulation;

pub use config::ProtocolConfig;
pub use error::{ConfigError, RouterError, SimulationError, TopologyError};
pub use network::{Link, LinkKey, Topology, TopologyFile};
pub use protocol::{HopTable, HopTableEntry, Probe, Registry, Route, Router, RouterState};
pub use simulation::{FinalState, Simulation};

/// Identity of a router in the fabric.
pub type RouterId = u32;

/// Link capacity, a proxy for available bandwidth.
pub type Capacity = u64;
