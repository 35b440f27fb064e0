use std::collections::{BTreeSet, HashMap, HashSet};
use super::{Connectivity, UnorderedPair, UserId};


/// Collects the friends and edges of one ego-network before freezing them
/// into a [`Connectivity`].
pub struct ConnectivityBuilder {
    friends: BTreeSet<UserId>,
    edges: HashSet<UnorderedPair<UserId>>,
    neighbours: HashMap<UserId, HashSet<UserId>>,
}

impl ConnectivityBuilder {
    pub fn new() -> Self {
        Self {
            friends: BTreeSet::new(),
            edges: HashSet::new(),
            neighbours: HashMap::new(),
        }
    }

    pub fn add_friend_in_place(&mut self, friend: UserId) {
        self.friends.insert(friend);
    }

    /// Inserts the undirected edge `a -- b`.
    ///
    /// Returns `false` when nothing was inserted: either the edge was already
    /// present (e.g. listed from the other endpoint's line), or it is a loop.
    pub fn add_edge_in_place(&mut self, a: UserId, b: UserId) -> bool {
        let key = UnorderedPair::new(a, b);
        if key.is_loop() {
            return false;
        }
        if !self.edges.insert(key) {
            return false;
        }
        self.neighbours.entry(a).or_default().insert(b);
        self.neighbours.entry(b).or_default().insert(a);
        true
    }

    pub fn build(self) -> Connectivity {
        Connectivity::new(self.friends, self.edges, self.neighbours)
    }
}

impl Default for ConnectivityBuilder {
    fn default() -> Self {
        Self::new()
    }
}
