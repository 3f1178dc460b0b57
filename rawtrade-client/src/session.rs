use std::sync::Arc;

use alloy_primitives::Address;
use serde::Serialize;
use tracing::{info, warn};

use crate::adapter::ContractAdapter;
use crate::error::ClientError;
use crate::transport::ContractTransport;
use crate::verification::Verification;

/// What the connected account is allowed to do, loaded right after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOverview {
    pub account: Address,
    pub supplier: Verification,
    pub buyer: Verification,
    pub is_owner: bool,
}

/// Wallet session: owns the adapter and the network it must be bound to.
pub struct Session {
    adapter: ContractAdapter,
    expected_chain_id: u64,
}

impl Session {
    pub fn new(expected_chain_id: u64) -> Self {
        Self {
            adapter: ContractAdapter::new(),
            expected_chain_id,
        }
    }

    pub fn adapter(&self) -> &ContractAdapter {
        &self.adapter
    }

    pub fn expected_chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    pub fn account(&self) -> Option<Address> {
        self.adapter.account()
    }

    /// Bind `transport` after checking it talks to the expected chain.
    pub async fn connect(&self, transport: Arc<dyn ContractTransport>) -> Result<Address, ClientError> {
        let actual = transport
            .chain_id()
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        if actual != self.expected_chain_id {
            warn!(expected = self.expected_chain_id, actual, "endpoint is on the wrong network");
            return Err(ClientError::WrongNetwork {
                expected: self.expected_chain_id,
                actual,
            });
        }
        let account = transport.account();
        self.adapter.init(transport);
        info!(%account, chain_id = actual, "wallet connected");
        Ok(account)
    }

    pub fn disconnect(&self) {
        self.adapter.reset();
    }

    /// The wallet switched accounts. `None` means it has none left.
    pub async fn accounts_changed(
        &self,
        transport: Option<Arc<dyn ContractTransport>>,
    ) -> Result<Option<Address>, ClientError> {
        match transport {
            None => {
                info!("wallet has no accounts; disconnecting");
                self.disconnect();
                Ok(None)
            }
            Some(t) if Some(t.account()) == self.account() => Ok(self.account()),
            Some(t) => self.connect(t).await.map(Some),
        }
    }

    /// The wallet moved to another chain. The session is dropped and the
    /// caller must connect again.
    pub fn chain_changed(&self, chain_id: u64) {
        info!(chain_id, "network changed; disconnecting");
        self.disconnect();
    }

    /// Roles of the connected account. A failed owner lookup reads as not
    /// owner; failed verification lookups stay visible as `CheckFailed`.
    pub async fn overview(&self) -> Result<AccountOverview, ClientError> {
        let account = self.account().ok_or(ClientError::NotConnected)?;
        let (supplier, buyer, owner) = tokio::join!(
            self.adapter.is_verified_supplier(None),
            self.adapter.is_verified_buyer(None),
            self.adapter.is_owner(),
        );
        let is_owner = owner.unwrap_or_else(|e| {
            warn!(error = %e, "owner check failed");
            false
        });
        Ok(AccountOverview {
            account,
            supplier,
            buyer,
            is_owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockContract, ALICE, BOB, OWNER};
    use rawtrade_types::constants::SEPOLIA_CHAIN_ID;

    #[tokio::test]
    async fn test_connect_checks_network() {
        let mock = MockContract::new(OWNER);
        mock.set_chain_id(1);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        let err = session.connect(mock.transport(ALICE)).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::WrongNetwork {
                expected: SEPOLIA_CHAIN_ID,
                actual: 1
            }
        ));
        assert!(!session.adapter().is_connected());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_connect() {
        let mock = MockContract::new(OWNER);
        mock.set_fail_calls(true);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        let err = session.connect(mock.transport(ALICE)).await.unwrap_err();
        assert!(matches!(err, ClientError::Connect(_)));
    }

    #[tokio::test]
    async fn test_account_switch_rebinds() {
        let mock = MockContract::new(OWNER);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        assert_eq!(session.connect(mock.transport(ALICE)).await.unwrap(), ALICE);
        let generation = session.adapter().generation();

        // Same account again is a no-op.
        session
            .accounts_changed(Some(mock.transport(ALICE)))
            .await
            .unwrap();
        assert_eq!(session.adapter().generation(), generation);

        let now = session
            .accounts_changed(Some(mock.transport(BOB)))
            .await
            .unwrap();
        assert_eq!(now, Some(BOB));
        assert_ne!(session.adapter().generation(), generation);

        assert_eq!(session.accounts_changed(None).await.unwrap(), None);
        assert_eq!(session.account(), None);
    }

    #[tokio::test]
    async fn test_chain_change_disconnects() {
        let mock = MockContract::new(OWNER);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        session.connect(mock.transport(ALICE)).await.unwrap();
        session.chain_changed(1);
        assert!(!session.adapter().is_connected());
    }

    #[tokio::test]
    async fn test_overview_reports_roles() {
        let mock = MockContract::new(OWNER);
        mock.verify_supplier(OWNER);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        session.connect(mock.transport(OWNER)).await.unwrap();

        let overview = session.overview().await.unwrap();
        assert_eq!(overview.account, OWNER);
        assert_eq!(overview.supplier, Verification::Verified);
        assert_eq!(overview.buyer, Verification::Unverified);
        assert!(overview.is_owner);
    }

    #[tokio::test]
    async fn test_overview_keeps_check_failures_visible() {
        let mock = MockContract::new(OWNER);
        let session = Session::new(SEPOLIA_CHAIN_ID);
        session.connect(mock.transport(OWNER)).await.unwrap();
        mock.set_fail_calls(true);

        let overview = session.overview().await.unwrap();
        assert!(overview.supplier.is_check_failed());
        assert!(overview.buyer.is_check_failed());
        assert!(!overview.is_owner);
    }

    #[tokio::test]
    async fn test_overview_requires_connection() {
        let session = Session::new(SEPOLIA_CHAIN_ID);
        assert!(matches!(
            session.overview().await.unwrap_err(),
            ClientError::NotConnected
        ));
    }
}
