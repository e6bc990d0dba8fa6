//! Program-side types shared by derivation and sampling.

use solana_pubkey::Pubkey;

/// A configured asset bound to its feed account.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFeed {
    /// Asset name from the config (e.g. "SOL/USD")
    pub asset_name: String,
    /// Decoded asset id used as the PDA seed
    pub asset_id: Vec<u8>,
    /// Feed account address
    pub address: Pubkey,
    /// PDA bump seed
    pub bump: u8,
}
