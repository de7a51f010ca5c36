//! Active account resolution.
//!
//! ORE ID returns every chain account the user owns, including its own
//! custodial accounts. Resolution picks the single account a dapp should see.
//!
//! Two predicate sets exist and they are NOT equivalent:
//!
//! - [`ResolutionPolicy::naive`]: drop custodial accounts, take the first
//!   remaining record. Chain support is not checked, so the returned chain id
//!   may be one the dapp cannot use.
//! - [`ResolutionPolicy::constrained`] (default): additionally require that
//!   ORE ID holds the key and that the record's chain id is supported.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chains::ChainId;
use crate::error::{ConnectorError, Result};
use crate::types::{ChainAccountRecord, ConnectorUpdate};

/// Substring identifying ORE ID's own custodial accounts.
pub const CUSTODIAL_ACCOUNT_MARKER: &str = "ore";

/// Predicates a chain account must satisfy to become the active account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Accounts containing this substring are skipped.
    pub excluded_marker: String,
    /// Skip accounts whose private key is stored outside ORE ID.
    pub require_internal_custody: bool,
    /// Skip accounts whose chain id is not in the supported set.
    pub require_supported_chain: bool,
}

impl ResolutionPolicy {
    /// First non-custodial account, no further checks.
    pub fn naive() -> Self {
        Self {
            excluded_marker: CUSTODIAL_ACCOUNT_MARKER.into(),
            require_internal_custody: false,
            require_supported_chain: false,
        }
    }

    /// First non-custodial account held by ORE ID on a supported chain.
    pub fn constrained() -> Self {
        Self {
            excluded_marker: CUSTODIAL_ACCOUNT_MARKER.into(),
            require_internal_custody: true,
            require_supported_chain: true,
        }
    }

    fn accepts(&self, record: &ChainAccountRecord, supported: &BTreeSet<ChainId>) -> bool {
        if record.chain_account.contains(self.excluded_marker.as_str()) {
            trace!(account = %record.chain_account, "skipping custodial account");
            return false;
        }
        if self.require_internal_custody && record.default_permission.private_key_stored_externally
        {
            trace!(account = %record.chain_account, "skipping externally held key");
            return false;
        }
        if self.require_supported_chain
            && !record.chain_id().map_or(false, |id| supported.contains(&id))
        {
            trace!(
                account = %record.chain_account,
                network = %record.chain_network,
                "skipping unsupported chain"
            );
            return false;
        }
        true
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::constrained()
    }
}

/// Select the active record: the first one, in SDK order, the policy accepts.
///
/// Fails with [`ConnectorError::UnsupportedChain`] when the policy checks
/// chain support, [`ConnectorError::NoActiveAccount`] otherwise.
pub fn select_active_record<'a>(
    records: &'a [ChainAccountRecord],
    policy: &ResolutionPolicy,
    supported: &BTreeSet<ChainId>,
) -> Result<&'a ChainAccountRecord> {
    records
        .iter()
        .find(|record| policy.accepts(record, supported))
        .ok_or_else(|| {
            if policy.require_supported_chain {
                ConnectorError::UnsupportedChain {
                    supported: supported.iter().copied().collect(),
                }
            } else {
                ConnectorError::NoActiveAccount
            }
        })
}

/// Select the active record and map its network to a chain id.
pub fn resolve_active_account(
    records: &[ChainAccountRecord],
    policy: &ResolutionPolicy,
    supported: &BTreeSet<ChainId>,
) -> Result<ConnectorUpdate> {
    let record = select_active_record(records, policy, supported)?;
    let chain_id = record
        .chain_id()
        .ok_or_else(|| ConnectorError::UnknownNetworkMapping(record.chain_network.clone()))?;

    Ok(ConnectorUpdate {
        account: record.chain_account.clone(),
        chain_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported(ids: &[u64]) -> BTreeSet<ChainId> {
        ids.iter().filter_map(|id| ChainId::new(*id)).collect()
    }

    #[test]
    fn test_naive_takes_first_non_custodial() {
        let records = vec![
            ChainAccountRecord::new("ore1qwerty", "ore_test"),
            ChainAccountRecord::new("0xBB", "ropsten"),
            ChainAccountRecord::new("0xCC", "mainnet"),
        ];
        let update = resolve_active_account(&records, &ResolutionPolicy::naive(), &supported(&[])).unwrap();
        assert_eq!(update.account, "0xBB");
        assert_eq!(update.chain_id, ChainId::ROPSTEN);
    }

    #[test]
    fn test_naive_ignores_custody_and_support() {
        let records = vec![ChainAccountRecord::new("0xDD", "matic").with_external_key(true)];
        let update = resolve_active_account(&records, &ResolutionPolicy::naive(), &supported(&[1])).unwrap();
        assert_eq!(update.chain_id, ChainId::MATIC);
    }

    #[test]
    fn test_naive_unknown_network() {
        let records = vec![ChainAccountRecord::new("0xEE", "telos_main")];
        let err = resolve_active_account(&records, &ResolutionPolicy::naive(), &supported(&[])).unwrap_err();
        assert_eq!(err, ConnectorError::UnknownNetworkMapping("telos_main".into()));
        // selection alone still succeeds
        assert!(select_active_record(&records, &ResolutionPolicy::naive(), &supported(&[])).is_ok());
    }

    #[test]
    fn test_constrained_skips_external_keys() {
        let records = vec![
            ChainAccountRecord::new("0x01", "eth_goerli").with_external_key(true),
            ChainAccountRecord::new("0x02", "eth_goerli"),
        ];
        let update = resolve_active_account(&records, &ResolutionPolicy::constrained(), &supported(&[5])).unwrap();
        assert_eq!(update.account, "0x02");
    }

    #[test]
    fn test_constrained_reports_supported_set() {
        let records = vec![ChainAccountRecord::new("0x01", "matic")];
        let err = resolve_active_account(&records, &ResolutionPolicy::constrained(), &supported(&[5, 1])).unwrap_err();
        assert_eq!(
            err,
            ConnectorError::UnsupportedChain {
                supported: vec![ChainId::MAINNET, ChainId::GOERLI]
            }
        );
    }

    #[test]
    fn test_custody_only_policy_reports_no_active_account() {
        let policy = ResolutionPolicy {
            require_supported_chain: false,
            ..ResolutionPolicy::constrained()
        };
        let records = vec![ChainAccountRecord::new("0x01", "matic").with_external_key(true)];
        let err = select_active_record(&records, &policy, &supported(&[])).unwrap_err();
        assert_eq!(err, ConnectorError::NoActiveAccount);
    }

    #[test]
    fn test_default_is_constrained() {
        assert_eq!(ResolutionPolicy::default(), ResolutionPolicy::constrained());
    }
}
