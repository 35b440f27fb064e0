mod pair;
mod builder;
mod core;

pub use pair::UnorderedPair;
pub use builder::ConnectivityBuilder;
pub use self::core::Connectivity;

/// Numeric user identifier as it appears in the ego-network and profile files.
pub type UserId = u64;
