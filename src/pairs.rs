use itertools::Itertools;
use crate::graph::{Connectivity, UnorderedPair, UserId};
use crate::profile::Profiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRow {
    pub pair: UnorderedPair<UserId>,
    pub edge: bool,
    pub common_friends: usize,
    pub common_features: Vec<usize>       // aligned with the feature registry
}

pub struct PairFeatureBuilder<'a> {
    connectivity: &'a Connectivity,
    profiles: &'a Profiles,
    feature_names: Vec<&'a str>
}

impl<'a> PairFeatureBuilder<'a> {
    pub fn new(connectivity: &'a Connectivity, profiles: &'a Profiles) -> Self {
        Self {
            connectivity,
            profiles,
            feature_names: profiles.registry().names().collect()
        }
    }

    pub fn pair_count(&self) -> usize {
        let n = self.connectivity.friends().len();
        n * n.saturating_sub(1) / 2
    }

    pub fn row(&self, a: UserId, b: UserId) -> PairRow {
        PairRow {
            pair: UnorderedPair::new(a, b),
            edge: self.connectivity.is_connected(a, b),
            common_friends: self.connectivity.common_friend_count(a, b),
            common_features: self.feature_names.iter()
                .map(|name| self.profiles.common_value_count(a, b, name))
                .collect()
        }
    }

    /// All unordered friend pairs, ascending by (first, second) friend.
    pub fn rows(&self) -> impl Iterator<Item=PairRow> + '_ {
        self.connectivity.friends()
            .iter()
            .copied()
            .tuple_combinations::<(_, _)>()
            .map(|(a, b)| self.row(a, b))
    }
}
