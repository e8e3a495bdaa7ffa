use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use log::{error, info, warn};
use crate::config::ProtocolConfig;
use crate::error::{RouterError, SimulationError};
use crate::network::{Topology, TopologyFile};
use crate::protocol::{HopTable, Registry, Router, RouterState};
use crate::RouterId;

/// What every router left behind once the simulation stopped.
#[derive(Debug, Default)]
pub struct FinalState {
    pub tables: BTreeMap<RouterId, HopTable>,
    pub faults: BTreeMap<RouterId, RouterError>,
}

/// Wires one router actor per topology node to a shared [`Registry`] and
/// drives their lifecycle.
pub struct Simulation {
    registry: Arc<Registry>,
    routers: BTreeMap<RouterId, Router>,
}

impl Simulation {
    /// Rejects a config the workers can't run with before any router exists.
    pub fn new(topology: Topology, config: &ProtocolConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let ids: Vec<RouterId> = topology.routers().collect();
        let mut registry = Registry::new(Arc::new(topology));
        let mut routers = BTreeMap::new();

        for id in ids {
            let router = Router::new(id, config);
            registry.register(id, router.mailbox())?;
            routers.insert(id, router);
        }

        Ok(Self {
            registry: Arc::new(registry),
            routers,
        })
    }

    pub fn from_graph(graph: &TopologyFile, config: &ProtocolConfig) -> Result<Self, SimulationError> {
        Self::new(graph.build()?, config)
    }

    pub fn load(path: impl AsRef<Path>, config: &ProtocolConfig) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        info!("Loading topology from {}", path.display());
        Self::from_graph(&TopologyFile::load(path)?, config)
    }

    pub fn topology(&self) -> &Topology {
        self.registry.topology()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn router_mut(&mut self, id: RouterId) -> Option<&mut Router> {
        self.routers.get_mut(&id)
    }

    /// Starts every router. Fails on the first one that is not idle.
    pub fn start(&mut self) -> Result<(), RouterError> {
        for router in self.routers.values_mut() {
            router.start(self.registry.clone())?;
        }
        info!("Simulation started with {} routers", self.routers.len());
        Ok(())
    }

    pub async fn run_for(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Tables of the running routers, each produced by its own worker.
    pub async fn snapshot(&self) -> BTreeMap<RouterId, HopTable> {
        let mut tables = BTreeMap::new();
        for (&id, router) in &self.routers {
            match router.inspect().await {
                Ok(table) => {
                    tables.insert(id, table);
                }
                Err(e) => warn!("Can't inspect router {}: {}", id, e),
            }
        }
        tables
    }

    /// Signals every router first, then collects their tables. Routers stopped
    /// individually beforehand are left out.
    pub async fn stop(&mut self) -> FinalState {
        for router in self.routers.values() {
            router.request_stop();
        }

        let mut state = FinalState::default();
        for (&id, router) in self.routers.iter_mut() {
            if router.state() == RouterState::Stopped {
                continue;
            }
            match router.stop().await {
                Ok(table) => {
                    state.tables.insert(id, table);
                }
                Err(e) => {
                    error!("Router {} ended with a fault: {}", id, e);
                    state.faults.insert(id, e);
                }
            }
        }

        info!("Simulation stopped ({} faults)", state.faults.len());
        state
    }
}
