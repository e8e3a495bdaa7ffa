use crate::RouterId;

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("router {0} is already registered")]
    DuplicateRouter(RouterId),
    #[error("router {0} is not registered")]
    UnknownRouter(RouterId),
    #[error("link {a} <-----> {b} already exists")]
    DuplicateLink { a: RouterId, b: RouterId },
    #[error("failed to read topology file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed topology document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("can't find the router id: {0}")]
    NeighborNotFound(RouterId),
    #[error("mailbox of router {0} is closed")]
    MailboxClosed(RouterId),
    /// The best-hop table knows `dest` but the update table does not.
    #[error("router {router} has a route to {dest} but no update record for it")]
    MissingUpdateRecord { router: RouterId, dest: RouterId },
    #[error("router {0} was already started")]
    AlreadyStarted(RouterId),
    #[error("router {0} is not running")]
    NotRunning(RouterId),
    #[error("worker of router {0} panicked")]
    WorkerPanicked(RouterId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("send_cycle must be at least one second")]
    ZeroSendCycle,
    #[error("queue_capacity must be positive")]
    ZeroQueueCapacity,
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}
