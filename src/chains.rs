//! Chain name mapping.
//!
//! ORE ID tags every chain account with a network name; front ends expect an
//! EIP-155 chain id. The table below is the fixed translation between the two.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Positive EIP-155 chain identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ChainId(u64);

/// Zero is not a valid chain id.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Chain id must be positive, got {0}")]
pub struct InvalidChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const ROPSTEN: ChainId = ChainId(3);
    pub const RINKEBY: ChainId = ChainId(4);
    pub const GOERLI: ChainId = ChainId(5);
    pub const MATIC: ChainId = ChainId(137);
    pub const MATIC_MUMBAI: ChainId = ChainId(80001);

    /// Returns `None` for zero.
    pub const fn new(id: u64) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// `0x`-prefixed hex form used by `eth_chainId`.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl TryFrom<u64> for ChainId {
    type Error = InvalidChainId;

    fn try_from(id: u64) -> std::result::Result<Self, Self::Error> {
        Self::new(id).ok_or(InvalidChainId(id))
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network name to chain id, ordered by id.
const CHAIN_NAME_ID_MAPPINGS: &[(&str, ChainId)] = &[
    ("mainnet", ChainId::MAINNET),
    ("ropsten", ChainId::ROPSTEN),
    ("rinkeby", ChainId::RINKEBY),
    ("eth_goerli", ChainId::GOERLI),
    ("matic", ChainId::MATIC),
    ("matic_mumbai", ChainId::MATIC_MUMBAI),
];

/// Look up the chain id for an ORE ID network name.
///
/// Unknown names yield `None`; they never resolve to a valid chain id.
pub fn chain_id_for_network(network: &str) -> Option<ChainId> {
    CHAIN_NAME_ID_MAPPINGS
        .iter()
        .find(|(name, _)| *name == network)
        .map(|(_, id)| *id)
}

/// Reverse lookup of [`chain_id_for_network`].
pub fn network_for_chain_id(chain_id: ChainId) -> Option<&'static str> {
    CHAIN_NAME_ID_MAPPINGS
        .iter()
        .find(|(_, id)| *id == chain_id)
        .map(|(name, _)| *name)
}

/// All known networks, ordered by chain id.
pub fn known_networks() -> impl Iterator<Item = (&'static str, ChainId)> {
    CHAIN_NAME_ID_MAPPINGS.iter().copied()
}
