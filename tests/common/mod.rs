#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;
use hula_sim::{FinalState, ProtocolConfig, Simulation, Topology};

pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

pub fn config() -> ProtocolConfig {
    ProtocolConfig {
        update_window: 1,
        send_cycle: 1,
        queue_capacity: 64,
    }
}

pub fn load(name: &str) -> Simulation {
    Simulation::load(testdata(name), &config()).unwrap()
}

pub fn topology(nodes: &[u32], edges: &[(u32, u32, u64)]) -> Topology {
    let mut topology = Topology::new();
    for &id in nodes {
        topology.add_router(id).unwrap();
    }
    for &(a, b, capacity) in edges {
        topology.add_link(a, b, capacity).unwrap();
    }
    topology
}

/// Starts every router, lets the clock run for `secs`, then stops them all.
pub async fn run(simulation: &mut Simulation, secs: f64) -> FinalState {
    simulation.start().unwrap();
    simulation.run_for(Duration::from_secs_f64(secs)).await;
    simulation.stop().await
}
