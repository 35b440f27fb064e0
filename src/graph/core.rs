use std::collections::{BTreeSet, HashMap, HashSet};
use super::{UnorderedPair, UserId};

/// Friend set of one ego-network together with the undirected edges among
/// (and out of) its members.
///
/// Edges are keyed by [`UnorderedPair`], so both lookup directions hit the
/// same entry. Neighbour sets are kept alongside for set intersection.
#[derive(Debug, Clone)]
pub struct Connectivity {
    friends: BTreeSet<UserId>,
    edges: HashSet<UnorderedPair<UserId>>,
    neighbours: HashMap<UserId, HashSet<UserId>>,
}

impl Connectivity {
    pub(super) fn new(friends: BTreeSet<UserId>,
                      edges: HashSet<UnorderedPair<UserId>>,
                      neighbours: HashMap<UserId, HashSet<UserId>>) -> Self
    {
        Self { friends, edges, neighbours }
    }

    pub fn friends(&self) -> &BTreeSet<UserId> {
        &self.friends
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline(always)]
    pub fn is_connected(&self, a: UserId, b: UserId) -> bool {
        self.edges.contains(&UnorderedPair::new(a, b))
    }

    /// Number of friends connected to both `a` and `b`.
    ///
    /// Only members of the friend set count; mutuals that never appeared as a
    /// friend line are edges but not candidates.
    pub fn common_friend_count(&self, a: UserId, b: UserId) -> usize {
        let (Some(na), Some(nb)) = (self.neighbours.get(&a), self.neighbours.get(&b)) else {
            return 0;
        };
        let (small, large) = if na.len() <= nb.len() { (na, nb) } else { (nb, na) };
        small.iter()
            .filter(|w| large.contains(w) && self.friends.contains(w))
            .count()
    }
}
