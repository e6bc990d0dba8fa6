//! PDA (Program Derived Address) derivation for Stork feed accounts.

use solana_pubkey::Pubkey;

use crate::program::constants::STORK_FEED_SEED;
use crate::program::error::{FeedError, FeedResult};
use crate::program::types::DerivedFeed;

/// Decode an encoded asset id (hex, optional `0x` prefix) into raw bytes.
pub fn parse_encoded_asset_id(encoded: &str) -> FeedResult<Vec<u8>> {
    let trimmed = encoded
        .strip_prefix("0x")
        .or_else(|| encoded.strip_prefix("0X"))
        .unwrap_or(encoded);

    hex::decode(trimmed).map_err(|e| FeedError::InvalidIdentifier {
        input: encoded.to_string(),
        reason: e.to_string(),
    })
}

/// Get a feed account PDA.
///
/// Seeds: ["stork_feed", encoded_asset_id]
pub fn get_feed_pda(encoded_asset_id: &[u8], program_id: &Pubkey) -> FeedResult<(Pubkey, u8)> {
    Pubkey::try_find_program_address(&[STORK_FEED_SEED, encoded_asset_id], program_id).ok_or_else(
        || FeedError::Derivation {
            asset_id: hex::encode(encoded_asset_id),
        },
    )
}

/// Derive the feed account for every `(name, encoded_asset_id)` pair.
///
/// The first invalid id or failed derivation aborts the whole set.
pub fn derive_feeds<'a, I>(program_id: &Pubkey, assets: I) -> FeedResult<Vec<DerivedFeed>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    assets
        .into_iter()
        .map(|(name, encoded)| {
            let asset_id = parse_encoded_asset_id(encoded)?;
            let (address, bump) = get_feed_pda(&asset_id, program_id)?;
            tracing::debug!(asset = name, %address, bump, "Derived feed account");
            Ok(DerivedFeed {
                asset_name: name.to_string(),
                asset_id,
                address,
                bump,
            })
        })
        .collect()
}
