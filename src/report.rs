use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use crate::network::Topology;
use crate::protocol::Route;
use crate::simulation::FinalState;
use crate::{Capacity, RouterId};

/// A destination reachable in the topology but absent from a router's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingRoute {
    pub router: RouterId,
    pub dest: RouterId,
}

/// A route claiming fewer hops than the topology allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistanceViolation {
    pub router: RouterId,
    pub dest: RouterId,
    pub distance: u32,
    pub shortest: u32,
}

/// A route advertising more than the link toward its next hop can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityViolation {
    pub router: RouterId,
    pub dest: RouterId,
    pub next_hop: RouterId,
    pub capacity: Capacity,
    pub link_capacity: Option<Capacity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceReport {
    pub generated_at: DateTime<Utc>,
    pub routers: usize,
    pub links: usize,
    pub tables: BTreeMap<RouterId, BTreeMap<RouterId, Route>>,
    pub missing: Vec<MissingRoute>,
    pub too_short: Vec<DistanceViolation>,
    pub over_capacity: Vec<CapacityViolation>,
    pub faults: BTreeMap<RouterId, String>,
}

impl ConvergenceReport {
    /// Checks the final tables against the topology they were computed on.
    pub fn evaluate(topology: &Topology, state: &FinalState) -> Self {
        let mut report = Self {
            generated_at: Utc::now(),
            routers: topology.router_count(),
            links: topology.link_count(),
            tables: BTreeMap::new(),
            missing: Vec::new(),
            too_short: Vec::new(),
            over_capacity: Vec::new(),
            faults: state
                .faults
                .iter()
                .map(|(id, fault)| (*id, fault.to_string()))
                .collect(),
        };

        for (&router, table) in &state.tables {
            let shortest = topology.hop_distances(router);

            let mut reachable: Vec<RouterId> = shortest
                .keys()
                .copied()
                .filter(|&dest| dest != router)
                .collect();
            reachable.sort_unstable();
            for dest in reachable {
                if !table.contains(dest) {
                    report.missing.push(MissingRoute { router, dest });
                }
            }

            for (dest, entry) in table.iter() {
                if let Some(&hops) = shortest.get(&dest) {
                    if entry.distance < hops {
                        report.too_short.push(DistanceViolation {
                            router,
                            dest,
                            distance: entry.distance,
                            shortest: hops,
                        });
                    }
                }

                let link_capacity = topology.link(router, entry.next_hop).map(|link| link.capacity);
                if link_capacity.is_none_or(|link| entry.capacity > link) {
                    report.over_capacity.push(CapacityViolation {
                        router,
                        dest,
                        next_hop: entry.next_hop,
                        capacity: entry.capacity,
                        link_capacity,
                    });
                }
            }

            report.tables.insert(router, table.routes());
        }

        report
    }

    pub fn converged(&self) -> bool {
        self.missing.is_empty()
            && self.too_short.is_empty()
            && self.over_capacity.is_empty()
            && self.faults.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_table(&self) -> String {
        let mut output = String::new();
        writeln!(output, "Best-Hop Tables ({} routers, {} links):", self.routers, self.links).unwrap();
        writeln!(output, "Generated at {}", self.generated_at.to_rfc3339()).unwrap();

        for (router, routes) in &self.tables {
            writeln!(output, "\nRouter {}", router).unwrap();
            writeln!(output, "{:<12} {:<12} {:<10} {:<12}", "Destination", "Next Hop", "Distance", "Capacity").unwrap();
            writeln!(output, "{}", "-".repeat(48)).unwrap();

            if routes.is_empty() {
                writeln!(output, "No routes found").unwrap();
            }
            for (dest, route) in routes {
                writeln!(
                    output,
                    "{:<12} {:<12} {:<10} {:<12}",
                    dest, route.next_hop, route.distance, route.capacity
                ).unwrap();
            }
        }

        writeln!(output, "\n{}", "=".repeat(48)).unwrap();
        if self.converged() {
            writeln!(output, "Converged: every router reaches every reachable destination").unwrap();
        } else {
            writeln!(output, "Not converged:").unwrap();
            for gap in &self.missing {
                writeln!(output, "  router {} has no route to {}", gap.router, gap.dest).unwrap();
            }
            for v in &self.too_short {
                writeln!(
                    output,
                    "  router {} claims {} hops to {} (shortest is {})",
                    v.router, v.distance, v.dest, v.shortest
                ).unwrap();
            }
            for v in &self.over_capacity {
                writeln!(
                    output,
                    "  router {} advertises {} to {} via {} over a link of {:?}",
                    v.router, v.capacity, v.dest, v.next_hop, v.link_capacity
                ).unwrap();
            }
            for (router, fault) in &self.faults {
                writeln!(output, "  router {} faulted: {}", router, fault).unwrap();
            }
        }

        output
    }
}
