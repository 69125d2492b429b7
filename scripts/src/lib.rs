//! Scripts for deploying the Whitelist contract, which forwards orders to a 0x
//! Exchange after verifying that both maker and taker are whitelisted.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod deployments;
pub mod errors;
pub mod utils;
