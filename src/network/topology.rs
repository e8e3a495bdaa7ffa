use std::collections::{BTreeMap, HashMap, VecDeque};
use log::debug;
use crate::error::TopologyError;
use crate::{Capacity, RouterId};
use super::{Link, LinkKey};

/// Routers, their neighbor lists and the links between them.
///
/// Built once before any router starts and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    neighbors: BTreeMap<RouterId, Vec<RouterId>>,
    links: HashMap<LinkKey, Link>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_router(&mut self, id: RouterId) -> Result<(), TopologyError> {
        if self.neighbors.contains_key(&id) {
            return Err(TopologyError::DuplicateRouter(id));
        }
        self.neighbors.insert(id, Vec::new());
        Ok(())
    }

    /// Registers the link `r1 <-> r2` and makes each endpoint a neighbor of the other.
    ///
    /// Fails without touching anything if the pair is already linked in either
    /// orientation.
    pub fn add_link(&mut self, r1: RouterId, r2: RouterId, capacity: Capacity) -> Result<(), TopologyError> {
        for id in [r1, r2] {
            if !self.contains(id) {
                return Err(TopologyError::UnknownRouter(id));
            }
        }

        let key = LinkKey::new(r1, r2);
        if self.links.contains_key(&key) || self.links.contains_key(&key.reversed()) {
            return Err(TopologyError::DuplicateLink { a: r1, b: r2 });
        }

        debug!("Adding link {} with capacity {}", key, capacity);
        self.links.insert(key, Link::new(r1, r2, capacity));

        if let Some(list) = self.neighbors.get_mut(&r1) {
            list.push(r2);
        }
        if let Some(list) = self.neighbors.get_mut(&r2) {
            list.push(r1);
        }
        Ok(())
    }

    /// Link between `router` and `neighbor`, whichever way it was registered.
    pub fn link(&self, router: RouterId, neighbor: RouterId) -> Option<&Link> {
        let key = LinkKey::new(router, neighbor);
        self.links
            .get(&key)
            .or_else(|| self.links.get(&key.reversed()))
    }

    pub fn neighbors(&self, router: RouterId) -> &[RouterId] {
        self.neighbors
            .get(&router)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, router: RouterId) -> bool {
        self.neighbors.contains_key(&router)
    }

    /// Router identities in ascending order.
    pub fn routers(&self) -> impl Iterator<Item = RouterId> + '_ {
        self.neighbors.keys().copied()
    }

    pub fn router_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Shortest hop count from `source` to every router reachable from it.
    pub fn hop_distances(&self, source: RouterId) -> HashMap<RouterId, u32> {
        let mut distances = HashMap::new();
        if !self.contains(source) {
            return distances;
        }

        let mut queue = VecDeque::new();
        distances.insert(source, 0);
        queue.push_back(source);

        while let Some(router) = queue.pop_front() {
            let hops = distances[&router];
            for &neighbor in self.neighbors(router) {
                if !distances.contains_key(&neighbor) {
                    distances.insert(neighbor, hops + 1);
                    queue.push_back(neighbor);
                }
            }
        }

        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_routers(ids: &[RouterId]) -> Topology {
        let mut topology = Topology::new();
        for &id in ids {
            topology.add_router(id).unwrap();
        }
        topology
    }

    #[test]
    fn link_is_found_in_both_orientations() {
        let mut topology = with_routers(&[1, 2]);
        topology.add_link(1, 2, 100).unwrap();

        assert_eq!(topology.link(1, 2).map(|l| l.capacity), Some(100));
        assert_eq!(topology.link(2, 1).map(|l| l.capacity), Some(100));
        assert!(topology.link(1, 3).is_none());
    }

    #[test]
    fn add_link_appends_both_neighbor_lists() {
        let mut topology = with_routers(&[1, 2, 3]);
        topology.add_link(1, 2, 10).unwrap();
        topology.add_link(3, 1, 20).unwrap();

        assert_eq!(topology.neighbors(1), &[2, 3]);
        assert_eq!(topology.neighbors(2), &[1]);
        assert_eq!(topology.neighbors(3), &[1]);
    }

    #[test]
    fn duplicate_link_is_rejected_and_first_link_kept() {
        let mut topology = with_routers(&[1, 2]);
        topology.add_link(1, 2, 100).unwrap();

        let same = topology.add_link(1, 2, 5);
        assert!(matches!(same, Err(TopologyError::DuplicateLink { a: 1, b: 2 })));

        let reversed = topology.add_link(2, 1, 7);
        assert!(matches!(reversed, Err(TopologyError::DuplicateLink { a: 2, b: 1 })));

        assert_eq!(topology.link_count(), 1);
        assert_eq!(topology.link(2, 1).map(|l| l.capacity), Some(100));
        assert_eq!(topology.neighbors(1), &[2]);
        assert_eq!(topology.neighbors(2), &[1]);
    }

    #[test]
    fn link_to_unknown_router_fails() {
        let mut topology = with_routers(&[1]);
        assert!(matches!(
            topology.add_link(1, 9, 10),
            Err(TopologyError::UnknownRouter(9))
        ));
        assert!(topology.neighbors(1).is_empty());
    }

    #[test]
    fn duplicate_router_fails() {
        let mut topology = with_routers(&[4]);
        assert!(matches!(topology.add_router(4), Err(TopologyError::DuplicateRouter(4))));
    }

    #[test]
    fn hop_distances_follow_fewest_links() {
        // 1 - 2 - 3 - 4, plus a shortcut 1 - 4
        let mut topology = with_routers(&[1, 2, 3, 4, 5]);
        topology.add_link(1, 2, 1).unwrap();
        topology.add_link(2, 3, 1).unwrap();
        topology.add_link(3, 4, 1).unwrap();
        topology.add_link(1, 4, 1).unwrap();

        let distances = topology.hop_distances(1);
        assert_eq!(distances[&1], 0);
        assert_eq!(distances[&2], 1);
        assert_eq!(distances[&3], 2);
        assert_eq!(distances[&4], 1);
        assert!(!distances.contains_key(&5));
    }
}
