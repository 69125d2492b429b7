//! Reading and writing the `deployments.json` file
//!
//! The file records, for each network, the address at which each contract was
//! deployed along with the transaction that created it.

use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ScriptError;

/// A record of a single contract deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the contract creation transaction
    pub transaction_hash: B256,
    /// The block in which the creation transaction was included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// The chain id reported by the node the contract was deployed through
    pub chain_id: u64,
    /// The exchange address passed to the constructor
    pub exchange: Address,
}

/// The contents of the deployments file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentsFile {
    /// Deployment records keyed by network, then by contract name
    #[serde(default)]
    pub deployments: BTreeMap<String, BTreeMap<String, DeploymentRecord>>,
    /// Any other top-level keys, preserved across writes
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DeploymentsFile {
    /// Look up the deployment of `contract` on `network`
    pub fn get(&self, network: &str, contract: &str) -> Option<&DeploymentRecord> {
        self.deployments.get(network)?.get(contract)
    }

    /// Record the deployment of `contract` on `network`, replacing any previous record
    pub fn insert(&mut self, network: &str, contract: &str, record: DeploymentRecord) {
        self.deployments
            .entry(network.to_string())
            .or_default()
            .insert(contract.to_string(), record);
    }
}

/// Read the deployments file, returning an empty set of deployments if it does not exist
pub fn read_deployments(file_path: &Path) -> Result<DeploymentsFile, ScriptError> {
    if !file_path.exists() {
        return Ok(DeploymentsFile::default());
    }

    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", file_path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", file_path.display())))
}

/// Read the recorded deployment of `contract` on `network`, if any
pub fn read_deployment(
    file_path: &Path,
    network: &str,
    contract: &str,
) -> Result<Option<DeploymentRecord>, ScriptError> {
    Ok(read_deployments(file_path)?.get(network, contract).cloned())
}

/// Write the deployment of `contract` on `network` to the deployments file.
///
/// The file is created if it does not exist, and all other records are preserved.
pub fn write_deployment(
    file_path: &Path,
    network: &str,
    contract: &str,
    record: DeploymentRecord,
) -> Result<(), ScriptError> {
    let mut deployments = read_deployments(file_path)?;
    deployments.insert(network, contract, record);

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    fs::write(file_path, contents)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {e}", file_path.display())))
}
