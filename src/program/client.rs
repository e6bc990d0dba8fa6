//! Account sources for feed sampling.
//!
//! [`AccountSource`] is the fetch-by-address seam the sampler reads through.
//! [`StorkRpcClient`] backs it with a Solana RPC node; [`InMemoryAccountSource`]
//! backs it with a local map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use solana_pubkey::Pubkey;
use tokio::sync::RwLock;

#[cfg(feature = "rpc")]
use solana_client::nonblocking::rpc_client::RpcClient;
#[cfg(feature = "rpc")]
use solana_commitment_config::CommitmentConfig;

use crate::program::accounts::TemporalNumericValueFeed;
use crate::program::error::{FeedError, FeedResult};

/// Fetches raw account bytes by address.
///
/// `Ok(None)` means the account does not exist.
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch_account(&self, address: &Pubkey) -> FeedResult<Option<Vec<u8>>>;
}

// ============================================================================
// RPC-backed source
// ============================================================================

/// Client for reading Stork feed accounts over Solana RPC.
#[cfg(feature = "rpc")]
pub struct StorkRpcClient {
    /// RPC client for Solana
    pub rpc_client: RpcClient,
}

#[cfg(feature = "rpc")]
impl StorkRpcClient {
    /// Create a new client with `confirmed` commitment.
    pub fn new(rpc_url: &str) -> Self {
        Self::from_rpc_client(RpcClient::new_with_commitment(
            rpc_url.to_string(),
            CommitmentConfig::confirmed(),
        ))
    }

    /// Create a new client with existing RpcClient.
    pub fn from_rpc_client(rpc_client: RpcClient) -> Self {
        Self { rpc_client }
    }

    /// RPC endpoint this client reads from
    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[cfg(feature = "rpc")]
#[async_trait]
impl AccountSource for StorkRpcClient {
    async fn fetch_account(&self, address: &Pubkey) -> FeedResult<Option<Vec<u8>>> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }
}

// ============================================================================
// In-memory source
// ============================================================================

#[derive(Debug, Clone)]
enum Slot {
    Data(Vec<u8>),
    Failing(String),
}

/// Account source backed by a local address map.
///
/// Unknown addresses read as missing accounts. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountSource {
    accounts: Arc<RwLock<HashMap<Pubkey, Slot>>>,
}

impl InMemoryAccountSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw account bytes at an address.
    pub async fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.write().await.insert(address, Slot::Data(data));
    }

    /// Store an encoded feed account at an address.
    pub async fn set_feed(&self, address: Pubkey, feed: &TemporalNumericValueFeed) {
        self.set_account(address, feed.serialize()).await;
    }

    /// Make every fetch of an address fail with a transport error.
    pub async fn set_error(&self, address: Pubkey, message: impl Into<String>) {
        self.accounts
            .write()
            .await
            .insert(address, Slot::Failing(message.into()));
    }

    /// Remove an address so it reads as missing.
    pub async fn remove(&self, address: &Pubkey) {
        self.accounts.write().await.remove(address);
    }
}

#[async_trait]
impl AccountSource for InMemoryAccountSource {
    async fn fetch_account(&self, address: &Pubkey) -> FeedResult<Option<Vec<u8>>> {
        match self.accounts.read().await.get(address) {
            Some(Slot::Data(data)) => Ok(Some(data.clone())),
            Some(Slot::Failing(message)) => Err(FeedError::Fetch(message.clone())),
            None => Ok(None),
        }
    }
}
