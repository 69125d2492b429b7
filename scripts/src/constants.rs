//! Constants used in the deploy scripts

/// The name of the contract artifact deployed by default
pub const WHITELIST_CONTRACT_NAME: &str = "Whitelist";

/// The default path of the network -> exchange address mapping
pub const DEFAULT_NETWORKS_PATH: &str = "networks.json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default directory containing compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// Marker left in bytecode by the compiler for unlinked library references
pub const UNLINKED_LIBRARY_MARKER: &str = "__";

/// The Solidity type the Whitelist constructor expects for the exchange
pub const ADDRESS_TYPE: &str = "address";

/// The prefix of a hex encoded address literal
pub const HEX_PREFIX: &str = "0x";

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of hex characters in an Ethereum address, excluding the prefix
pub const NUM_HEX_CHARS_ADDRESS: usize = NUM_BYTES_ADDRESS * 2;

/// The number of bytes in an ABI encoded word
pub const NUM_BYTES_ABI_WORD: usize = 32;

/// The number of confirmations to wait for the contract deployment transaction
pub const DEFAULT_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of times to poll for the deployment receipt before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 120;

/// The interval between polls for the deployment receipt or new blocks, in milliseconds
pub const POLL_INTERVAL_MS: u64 = 1000;

/// The log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
