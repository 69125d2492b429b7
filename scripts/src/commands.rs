//! Implementations of the deploy scripts

use std::{path::Path, time::Duration};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    artifacts::Artifact,
    cli::{CheckArgs, DeployArgs, GlobalArgs},
    config::NetworksConfig,
    constants::{POLL_INTERVAL_MS, RECEIPT_POLL_ATTEMPTS},
    deployments::{read_deployment, read_deployments, write_deployment, DeploymentRecord},
    errors::ScriptError,
    utils::setup_client,
};

/// Deploy the contract to the requested network and record its address
pub async fn deploy(args: DeployArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    // Resolve the constructor argument for the target network
    let networks = NetworksConfig::from_file(&global.networks)?;
    let network = networks.network(&args.network)?;
    let exchange = network.resolve_exchange(args.exchange.as_deref())?;

    let artifact = Artifact::load(&global.artifacts_dir, &args.contract)?;
    artifact.check_constructor()?;

    if args.no_overwrite {
        if let Some(existing) = read_deployment(&global.deployments, &args.network, &args.contract)?
        {
            info!(
                "`{}` already deployed on {} at {:#x}, skipping",
                args.contract, args.network, existing.address
            );
            return Ok(());
        }
    }

    let priv_key = global.priv_key.as_deref().ok_or_else(|| {
        ScriptError::ClientInitialization("no deployer private key provided".to_string())
    })?;
    let rpc_url = global
        .rpc_url
        .as_deref()
        .or(network.rpc_url.as_deref())
        .ok_or_else(|| {
            ScriptError::ClientInitialization(format!(
                "no RPC url provided and none configured for {}",
                args.network
            ))
        })?;
    let (client, deployer) = setup_client(priv_key, rpc_url)?;

    let target = DeploymentTarget {
        network: args.network,
        contract: args.contract,
        exchange,
    };
    let plan = plan_deployment(
        &client,
        target,
        network.chain_id,
        deployer,
        artifact.deploy_code(exchange),
    )
    .await?;

    info!(
        "Deploying `{}` to {} (chain {}) with exchange {exchange:#x}",
        plan.target.contract, plan.target.network, plan.chain_id
    );
    info!("\tDeployer: {deployer:#x} (nonce {})", plan.nonce);
    info!("\tExpected address: {:#x}", plan.expected_address);

    if args.dry_run {
        info!("Dry run, not sending the deployment transaction");
        return Ok(());
    }

    let record =
        execute_deployment(&client, &plan, args.confirmations, &global.deployments).await?;
    info!("`{}` deployed at {:#x}", plan.target.contract, record.address);
    Ok(())
}

/// What is being deployed, and where
#[derive(Debug)]
struct DeploymentTarget {
    /// The id of the network being deployed to
    network: String,
    /// The name of the contract being deployed
    contract: String,
    /// The exchange address passed to the constructor
    exchange: Address,
}

/// A deployment whose inputs have been resolved against the target chain
#[derive(Debug)]
struct DeploymentPlan {
    /// What is being deployed, and where
    target: DeploymentTarget,
    /// The account sending the creation transaction
    deployer: Address,
    /// The deployer's nonce at the time of planning
    nonce: u64,
    /// The chain id reported by the node
    chain_id: u64,
    /// The address the contract will be created at, given the nonce
    expected_address: Address,
    /// The bytecode followed by the encoded constructor arguments
    deploy_code: Bytes,
}

/// Fetch the chain id and deployer nonce, and predict the created contract's address
async fn plan_deployment(
    client: &impl Provider,
    target: DeploymentTarget,
    pinned_chain_id: Option<u64>,
    deployer: Address,
    deploy_code: Bytes,
) -> Result<DeploymentPlan, ScriptError> {
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    check_chain_id(&target.network, pinned_chain_id, chain_id)?;

    // Get expected deployment address
    let nonce = client
        .get_transaction_count(deployer)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    Ok(DeploymentPlan {
        target,
        deployer,
        nonce,
        chain_id,
        expected_address: deployer.create(nonce),
        deploy_code,
    })
}

/// Send the creation transaction, verify that it produced a contract, and record it.
///
/// The deployments file is only written once the receipt is successful, names the
/// created address, and that address holds code.
async fn execute_deployment(
    client: &impl Provider,
    plan: &DeploymentPlan,
    confirmations: u64,
    deployments_path: &Path,
) -> Result<DeploymentRecord, ScriptError> {
    let tx = TransactionRequest::default()
        .with_from(plan.deployer)
        .with_deploy_code(plan.deploy_code.clone());

    let pending_tx = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    debug!("Deployment transaction sent: {tx_hash:#x}");

    let receipt = wait_for_receipt(client, tx_hash).await?;
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "transaction {tx_hash:#x} reverted"
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "receipt for {tx_hash:#x} has no contract address"
        ))
    })?;
    if address != plan.expected_address {
        warn!(
            "Contract deployed at {address:#x}, expected {:#x}",
            plan.expected_address
        );
    }

    if let Some(block_number) = receipt.block_number {
        wait_for_confirmations(client, block_number, confirmations).await?;
    }

    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    if code.is_empty() {
        return Err(ScriptError::ContractDeployment(format!(
            "no code found at {address:#x}"
        )));
    }

    let record = DeploymentRecord {
        address,
        transaction_hash: tx_hash,
        block_number: receipt.block_number,
        chain_id: plan.chain_id,
        exchange: plan.target.exchange,
    };
    write_deployment(
        deployments_path,
        &plan.target.network,
        &plan.target.contract,
        record.clone(),
    )?;

    Ok(record)
}

/// Poll for the receipt of the given transaction
async fn wait_for_receipt(
    client: &impl Provider,
    tx_hash: TxHash,
) -> Result<TransactionReceipt, ScriptError> {
    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        let receipt = client
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        match receipt {
            Some(receipt) => return Ok(receipt),
            None => sleep(Duration::from_millis(POLL_INTERVAL_MS)).await,
        }
    }

    Err(ScriptError::ContractDeployment(format!(
        "no receipt for {tx_hash:#x} after {RECEIPT_POLL_ATTEMPTS} attempts"
    )))
}

/// Wait until the block containing the deployment has the requested number of confirmations.
///
/// The inclusion block itself counts as the first confirmation.
async fn wait_for_confirmations(
    client: &impl Provider,
    block_number: u64,
    confirmations: u64,
) -> Result<(), ScriptError> {
    if confirmations <= 1 {
        return Ok(());
    }

    let target = block_number + confirmations - 1;
    loop {
        let head = client
            .get_block_number()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        if head >= target {
            return Ok(());
        }

        debug!("Waiting for block {target}, head is {head}");
        sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Statically validate the networks file and the contract artifact
pub fn check(args: CheckArgs, global: &GlobalArgs) -> Result<(), ScriptError> {
    let networks = NetworksConfig::from_file(&global.networks)?;
    networks.validate()?;

    let artifact = Artifact::load(&global.artifacts_dir, &args.contract)?;
    artifact.check_constructor()?;

    for (id, network) in networks.iter() {
        debug!("{id}: exchange {}", network.exchange);
    }

    info!(
        "Configuration OK: `{}` artifact and {} network(s)",
        artifact.contract_name,
        networks.iter().count()
    );
    Ok(())
}

/// Print the configured networks alongside their recorded deployments
pub fn list_networks(global: &GlobalArgs) -> Result<(), ScriptError> {
    let networks = NetworksConfig::from_file(&global.networks)?;
    let deployments = read_deployments(&global.deployments)?;

    for (id, network) in networks.iter() {
        let chain = network
            .chain_id
            .map_or_else(|| "any".to_string(), |chain_id| chain_id.to_string());
        println!("{id}\n\texchange: {}\n\tchain id: {chain}", network.exchange);

        for (contract, record) in deployments.deployments.get(id).into_iter().flatten() {
            println!("\t{contract}: {:#x}", record.address);
        }
    }

    Ok(())
}

/// Ensure the chain the client is connected to is the one the network pins, if any
fn check_chain_id(network: &str, expected: Option<u64>, actual: u64) -> Result<(), ScriptError> {
    match expected {
        Some(expected) if expected != actual => Err(ScriptError::ChainMismatch(format!(
            "{network} expects chain {expected}, node reports chain {actual}"
        ))),
        Some(_) => Ok(()),
        None => {
            warn!("{network} does not pin a chain id, deploying to chain {actual}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{address, b256, Address, Bytes, B256},
        providers::{Provider, ProviderBuilder},
        transports::mock::Asserter,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::{
        check_chain_id, execute_deployment, plan_deployment, DeploymentPlan, DeploymentTarget,
    };
    use crate::{deployments::read_deployment, errors::ScriptError};

    /// The default anvil account
    const DEPLOYER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    /// The address `DEPLOYER` creates its first contract at
    const FIRST_CREATED: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    /// The address `DEPLOYER` creates its second contract at
    const SECOND_CREATED: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");

    /// The exchange passed to the constructor
    const EXCHANGE: Address = address!("080bf510fcbf18b91105470639e9561022937712");

    /// The hash of the mocked creation transaction
    const TX_HASH: B256 =
        b256!("5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060");

    /// A provider answering requests from the given asserter, in order
    fn mock_client(asserter: &Asserter) -> impl Provider {
        ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
    }

    /// The Whitelist on the development network
    fn development_target() -> DeploymentTarget {
        DeploymentTarget {
            network: "development".to_string(),
            contract: "Whitelist".to_string(),
            exchange: EXCHANGE,
        }
    }

    /// A plan for `DEPLOYER`'s first contract
    fn first_deployment() -> DeploymentPlan {
        DeploymentPlan {
            target: development_target(),
            deployer: DEPLOYER,
            nonce: 0,
            chain_id: 31337,
            expected_address: FIRST_CREATED,
            deploy_code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
        }
    }

    /// The JSON-RPC form of a creation transaction receipt
    fn receipt_json(status: bool, contract_address: Option<Address>) -> Value {
        json!({
            "type": "0x2",
            "status": if status { "0x1" } else { "0x0" },
            "cumulativeGasUsed": "0x1d8a8",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": "0x8e38b4dbf6b11fcc3b9dee84fb7986e29ca0a02cecd8977c161ff7333329681e",
            "blockNumber": "0x1",
            "gasUsed": "0x1d8a8",
            "effectiveGasPrice": "0x3b9aca00",
            "from": DEPLOYER,
            "to": null,
            "contractAddress": contract_address,
        })
    }

    #[test]
    fn test_check_chain_id() {
        check_chain_id("kovan", Some(42), 42).unwrap();
        check_chain_id("development", None, 31337).unwrap();

        assert!(matches!(
            check_chain_id("kovan", Some(42), 1),
            Err(ScriptError::ChainMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_plan_predicts_created_address() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        // Chain id, then the deployer's nonce
        asserter.push_success(&"0x7a69");
        asserter.push_success(&"0x1");

        let plan =
            plan_deployment(&client, development_target(), Some(31337), DEPLOYER, Bytes::new())
                .await
                .unwrap();
        assert_eq!(plan.chain_id, 31337);
        assert_eq!(plan.nonce, 1);
        assert_eq!(plan.expected_address, SECOND_CREATED);
    }

    #[tokio::test]
    async fn test_plan_rejects_wrong_chain() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);
        asserter.push_success(&"0x1");

        let target = DeploymentTarget {
            network: "kovan".to_string(),
            ..development_target()
        };
        let res = plan_deployment(&client, target, Some(42), DEPLOYER, Bytes::new()).await;
        assert!(matches!(res, Err(ScriptError::ChainMismatch(_))));
    }

    #[tokio::test]
    async fn test_execute_deployment() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt_json(true, Some(FIRST_CREATED)));
        asserter.push_success(&"0x6080604052");

        let dir = TempDir::new().unwrap();
        let deployments = dir.path().join("deployments.json");
        let record = execute_deployment(&client, &first_deployment(), 1, &deployments)
            .await
            .unwrap();
        assert_eq!(record.address, FIRST_CREATED);
        assert_eq!(record.transaction_hash, TX_HASH);
        assert_eq!(record.block_number, Some(1));
        assert_eq!(record.chain_id, 31337);
        assert_eq!(record.exchange, EXCHANGE);

        let recorded = read_deployment(&deployments, "development", "Whitelist").unwrap();
        assert_eq!(recorded, Some(record));
    }

    #[tokio::test]
    async fn test_execute_deployment_waits_for_confirmations() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt_json(true, Some(FIRST_CREATED)));
        // Included in block 1, three confirmations are reached at block 3
        asserter.push_success(&"0x3");
        asserter.push_success(&"0x6080604052");

        let dir = TempDir::new().unwrap();
        let deployments = dir.path().join("deployments.json");
        let record = execute_deployment(&client, &first_deployment(), 3, &deployments)
            .await
            .unwrap();
        assert_eq!(record.address, FIRST_CREATED);
        assert!(deployments.exists());
    }

    #[tokio::test]
    async fn test_execute_deployment_reverted() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt_json(false, Some(FIRST_CREATED)));

        let dir = TempDir::new().unwrap();
        let deployments = dir.path().join("deployments.json");
        let res = execute_deployment(&client, &first_deployment(), 1, &deployments).await;
        assert!(!deployments.exists());
        assert!(matches!(res, Err(ScriptError::ContractDeployment(msg)) if msg.contains("reverted")));
    }

    #[tokio::test]
    async fn test_execute_deployment_without_contract_address() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt_json(true, None));

        let dir = TempDir::new().unwrap();
        let deployments = dir.path().join("deployments.json");
        let res = execute_deployment(&client, &first_deployment(), 1, &deployments).await;
        assert!(!deployments.exists());
        assert!(matches!(res, Err(ScriptError::ContractDeployment(msg)) if msg.contains("no contract address")));
    }

    #[tokio::test]
    async fn test_execute_deployment_without_code() {
        let asserter = Asserter::new();
        let client = mock_client(&asserter);

        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt_json(true, Some(FIRST_CREATED)));
        asserter.push_success(&"0x");

        let dir = TempDir::new().unwrap();
        let deployments = dir.path().join("deployments.json");
        let res = execute_deployment(&client, &first_deployment(), 1, &deployments).await;
        assert!(!deployments.exists());
        assert!(matches!(res, Err(ScriptError::ContractDeployment(msg)) if msg.contains("no code")));
    }
}
