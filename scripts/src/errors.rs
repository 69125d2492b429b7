//! Definitions of errors that can occur during the execution of the deploy scripts

use thiserror::Error;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Error reading a networks, artifact, or deployments file
    #[error("error reading file: {0}")]
    ReadFile(String),
    /// Error writing the deployments file
    #[error("error writing file: {0}")]
    WriteFile(String),
    /// An address literal is not a `0x`-prefixed, 20-byte hex string
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// The requested network is not present in the networks file
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    /// One or more entries of the networks file failed validation
    #[error("invalid configuration:\n{0}")]
    InvalidConfig(String),
    /// Error parsing or validating a compiled contract artifact
    #[error("error parsing artifact: {0}")]
    ArtifactParsing(String),
    /// Error initializing the RPC client
    #[error("error initializing client: {0}")]
    ClientInitialization(String),
    /// The connected node reports a different chain than the network pins
    #[error("chain id mismatch: {0}")]
    ChainMismatch(String),
    /// Error fetching the nonce of the deployer
    #[error("error fetching nonce: {0}")]
    NonceFetching(String),
    /// Error deploying a contract
    #[error("error deploying contract: {0}")]
    ContractDeployment(String),
}
