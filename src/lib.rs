//! Labeled friend-pair feature tables from ego-networks.
//!
//! For every ego-network file the friend set and the friendships among the
//! friends are read ([`egonet`]), the friends' profile features are gathered
//! ([`profile`]), and one row per unordered friend pair is computed
//! ([`pairs`]) and written as CSV ([`table`]). [`processing`] drives a whole
//! directory of ego-networks.

pub mod egonet;
pub mod errors;
pub mod graph;
pub mod pairs;
pub mod processing;
pub mod profile;
pub mod table;
