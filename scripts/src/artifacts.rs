//! Loading of compiled contract artifacts

use std::{fs, path::Path};

use alloy::{
    json_abi::JsonAbi,
    primitives::{hex, Address, Bytes},
    sol_types::SolValue,
};
use serde::Deserialize;

use crate::{
    constants::{ADDRESS_TYPE, ARTIFACT_EXTENSION, UNLINKED_LIBRARY_MARKER},
    errors::ScriptError,
};

/// The subset of a Truffle-style build artifact needed for deployment
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    /// The name of the compiled contract
    contract_name: String,
    /// The contract ABI
    abi: JsonAbi,
    /// The hex encoded creation bytecode
    bytecode: String,
}

/// A compiled contract, ready for deployment
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The name of the compiled contract
    pub contract_name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl Artifact {
    /// Load the artifact for the contract with the given name from `artifacts_dir`.
    ///
    /// The artifact's `contractName` must match the requested name.
    pub fn load(artifacts_dir: &Path, name: &str) -> Result<Self, ScriptError> {
        let path = artifacts_dir.join(format!("{name}.{ARTIFACT_EXTENSION}"));
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {e}", path.display())))?;

        let artifact = Self::from_json(&contents)?;
        if artifact.contract_name != name {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} defines contract `{}`, expected `{name}`",
                path.display(),
                artifact.contract_name
            )));
        }

        Ok(artifact)
    }

    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let ArtifactFile {
            contract_name,
            abi,
            bytecode,
        } = serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        if bytecode.contains(UNLINKED_LIBRARY_MARKER) {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{contract_name}` bytecode contains unlinked library references"
            )));
        }

        let bytecode = Bytes::from(
            hex::decode(&bytecode).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?,
        );
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{contract_name}` has no creation bytecode, is it abstract?"
            )));
        }

        Ok(Self {
            contract_name,
            abi,
            bytecode,
        })
    }

    /// Ensure the contract's constructor takes a single `address` argument
    pub fn check_constructor(&self) -> Result<(), ScriptError> {
        let constructor = self.abi.constructor().ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("`{}` declares no constructor", self.contract_name))
        })?;

        let input_types: Vec<&str> = constructor.inputs.iter().map(|p| p.ty.as_str()).collect();
        if input_types != [ADDRESS_TYPE] {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` constructor takes ({}), expected ({ADDRESS_TYPE})",
                self.contract_name,
                input_types.join(", ")
            )));
        }

        Ok(())
    }

    /// The contract creation payload: the bytecode followed by the ABI encoded exchange address
    pub fn deploy_code(&self, exchange: Address) -> Bytes {
        [self.bytecode.as_ref(), exchange.abi_encode().as_slice()]
            .concat()
            .into()
    }
}
