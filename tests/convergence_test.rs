mod common;

use hula_sim::report::ConvergenceReport;
use hula_sim::{Route, Simulation};

#[tokio::test(start_paused = true)]
async fn two_routers_learn_each_other_after_one_cycle() {
    let mut sim = common::load("two_nodes.json");

    let state = common::run(&mut sim, 1.5).await;

    assert!(state.faults.is_empty());
    assert_eq!(
        state.tables[&1].route(2),
        Some(Route { next_hop: 2, distance: 1, capacity: 100 })
    );
    assert_eq!(
        state.tables[&2].route(1),
        Some(Route { next_hop: 1, distance: 1, capacity: 100 })
    );
}

#[tokio::test(start_paused = true)]
async fn nothing_is_known_before_the_first_tick() {
    let mut sim = common::load("two_nodes.json");

    let state = common::run(&mut sim, 0.5).await;

    assert!(state.tables.values().all(|table| table.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn chain_reports_the_bottleneck_not_the_sum() {
    let mut sim = common::load("chain.json");

    let state = common::run(&mut sim, 5.5).await;

    assert_eq!(
        state.tables[&1].route(3),
        Some(Route { next_hop: 2, distance: 2, capacity: 40 })
    );
    assert_eq!(
        state.tables[&3].route(1),
        Some(Route { next_hop: 2, distance: 2, capacity: 40 })
    );
    assert_eq!(
        state.tables[&2].route(3),
        Some(Route { next_hop: 3, distance: 1, capacity: 40 })
    );
    assert!(state.tables.iter().all(|(id, table)| !table.contains(*id)));
}

#[tokio::test(start_paused = true)]
async fn basic_graph_converges_to_shortest_widest_routes() {
    let mut sim = common::load("basic_graph.json");
    assert_eq!(sim.topology().link_count(), 12);

    let state = common::run(&mut sim, 20.5).await;
    let report = ConvergenceReport::evaluate(sim.topology(), &state);

    assert!(report.converged(), "{}", report.render_table());
    for (router, table) in &state.tables {
        let shortest = sim.topology().hop_distances(*router);
        assert_eq!(table.len(), 9);
        for (dest, entry) in table.iter() {
            assert_eq!(entry.distance, shortest[&dest], "router {} -> {}", router, dest);
        }
    }

    // two three-hop paths toward 5, the one through 4 is wider
    assert_eq!(
        state.tables[&1].route(5),
        Some(Route { next_hop: 2, distance: 3, capacity: 60 })
    );
    assert_eq!(
        state.tables[&1].route(10),
        Some(Route { next_hop: 10, distance: 1, capacity: 10 })
    );
}

#[tokio::test(start_paused = true)]
async fn advertised_capacity_never_exceeds_the_first_link() {
    let topology = common::topology(
        &[1, 2, 3, 4],
        &[(1, 2, 500), (2, 3, 20), (3, 4, 300), (1, 4, 7)],
    );
    let mut sim = Simulation::new(topology, &common::config()).unwrap();

    let state = common::run(&mut sim, 10.5).await;

    for (router, table) in &state.tables {
        for (dest, entry) in table.iter() {
            let link = sim.topology().link(*router, entry.next_hop).unwrap();
            assert!(
                entry.capacity <= link.capacity,
                "router {} -> {} advertises {} over {}",
                router,
                dest,
                entry.capacity,
                link.capacity
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn tables_can_be_inspected_while_running() {
    let mut sim = common::load("chain.json");
    sim.start().unwrap();
    sim.run_for(std::time::Duration::from_millis(3500)).await;

    let snapshot = sim.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(
        snapshot[&1].route(3),
        Some(Route { next_hop: 2, distance: 2, capacity: 40 })
    );

    let state = sim.stop().await;
    assert!(state.faults.is_empty());
    assert_eq!(state.tables[&1].routes(), snapshot[&1].routes());
}
