//! The network -> exchange address mapping read at deploy time

use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::Address;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{errors::ScriptError, utils::parse_address_literal};

/// The deployment parameters for a single network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// The address of the 0x Exchange contract the Whitelist forwards orders to
    pub exchange: String,
    /// The chain id the network is expected to report, if pinned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// The RPC url to use when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
}

impl NetworkConfig {
    /// Resolve the exchange address to pass to the Whitelist constructor.
    ///
    /// An explicitly provided address takes precedence over the configured one.
    pub fn resolve_exchange(&self, exchange_override: Option<&str>) -> Result<Address, ScriptError> {
        parse_address_literal(exchange_override.unwrap_or(&self.exchange))
    }
}

/// A mapping from network id to the deployment parameters for that network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworksConfig {
    /// The configured networks, keyed by id
    networks: BTreeMap<String, NetworkConfig>,
}

impl NetworksConfig {
    /// Read the networks mapping from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))?;

        Self::from_json(&contents)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))
    }

    /// Parse the networks mapping from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up the configuration for the given network id
    pub fn network(&self, id: &str) -> Result<&NetworkConfig, ScriptError> {
        self.networks.get(id).ok_or_else(|| {
            ScriptError::UnknownNetwork(format!(
                "`{id}` (known networks: {})",
                self.networks.keys().join(", ")
            ))
        })
    }

    /// Iterate over the configured networks in id order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &NetworkConfig)> {
        self.networks.iter()
    }

    /// Whether any networks are configured
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Validate every configured exchange address, reporting all failures at once
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.networks.is_empty() {
            return Err(ScriptError::InvalidConfig("no networks configured".to_string()));
        }

        let failures = self
            .networks
            .iter()
            .filter_map(|(id, network)| {
                parse_address_literal(&network.exchange)
                    .err()
                    .map(|e| format!("  {id}: {e}"))
            })
            .collect_vec();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ScriptError::InvalidConfig(failures.join("\n")))
        }
    }
}
