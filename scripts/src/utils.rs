//! Utilities for the deploy scripts.

use std::str::FromStr;

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};

use crate::{
    constants::{HEX_PREFIX, NUM_HEX_CHARS_ADDRESS},
    errors::ScriptError,
};

/// The provider type used to submit deployments
pub type Client = DynProvider<Ethereum>;

/// Sets up a signing client for the given private key and RPC url,
/// returning it alongside the address of the deployer.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(Client, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok((DynProvider::new(provider), deployer))
}

/// Parses an address literal, requiring the `0x` prefix and exactly 40 hex characters.
///
/// Mixed-case literals must carry a valid EIP-55 checksum. All-lowercase and
/// all-uppercase literals carry no checksum information and are accepted as-is.
pub fn parse_address_literal(literal: &str) -> Result<Address, ScriptError> {
    let invalid = |reason: &str| ScriptError::InvalidAddress(format!("`{literal}`: {reason}"));

    let hex_chars = literal
        .strip_prefix(HEX_PREFIX)
        .ok_or_else(|| invalid("missing `0x` prefix"))?;

    if hex_chars.len() != NUM_HEX_CHARS_ADDRESS {
        return Err(invalid(&format!(
            "expected {NUM_HEX_CHARS_ADDRESS} hex characters, found {}",
            hex_chars.len()
        )));
    }

    if !hex_chars.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let has_lower = hex_chars.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_chars.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(literal, None /* chain_id */)
            .map_err(|_| invalid("invalid EIP-55 checksum"))
    } else {
        Address::from_str(literal).map_err(|e| invalid(&e.to_string()))
    }
}
