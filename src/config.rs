use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use colored::Colorize;
use crate::errors::DashboardError;
use crate::gateway::{ConfirmationPolicy, ContractAddresses};
use crate::units;

/// Known networks: (name, chain id, default RPC URL)
const NETWORKS: &[(&str, u64, &str)] = &[
    ("goerli", 5, "https://rpc.ankr.com/eth_goerli"),
    ("sepolia", 11_155_111, "https://rpc.sepolia.org"),
    ("mainnet", 1, "https://eth.llamarpc.com"),
    ("localhost", 31_337, "http://127.0.0.1:8545"),
];

const UNSET_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Configuration for the DAO dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub dao_contract: String,
    pub membership_nft_contract: String,
    #[serde(default = "default_poll_ms")]
    pub confirmation_poll_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default)]
    pub wallet_path: Option<PathBuf>,
}

fn default_poll_ms() -> u64 {
    1_000
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "goerli".to_string(),
            chain_id: 5,
            rpc_url: "https://rpc.ankr.com/eth_goerli".to_string(),
            dao_contract: UNSET_ADDRESS.to_string(),
            membership_nft_contract: UNSET_ADDRESS.to_string(),
            confirmation_poll_ms: default_poll_ms(),
            confirmation_timeout_secs: default_timeout_secs(),
            wallet_path: None,
        }
    }
}

impl Config {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?;
        Ok(config_dir.join("dao-dashboard").join("config.toml"))
    }

    /// Load config from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            // Create default config
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        Ok(())
    }

    /// Switch to a known network, resetting chain id and RPC URL
    pub fn apply_network(&mut self, network: &str) -> Result<()> {
        let (name, chain_id, rpc_url) = NETWORKS
            .iter()
            .find(|(name, _, _)| *name == network)
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "Invalid network: {}. Valid options: goerli, sepolia, mainnet, localhost",
                    network
                ))
            })?;

        self.network = name.to_string();
        self.chain_id = *chain_id;
        self.rpc_url = rpc_url.to_string();

        Ok(())
    }

    pub fn apply_contracts(&mut self, dao: &str, membership_nft: &str) -> Result<()> {
        let dao = units::parse_address(dao)?;
        let nft = units::parse_address(membership_nft)?;

        self.dao_contract = dao.to_checksum(None);
        self.membership_nft_contract = nft.to_checksum(None);

        Ok(())
    }

    /// Parsed contract addresses; unset addresses are a configuration error
    pub fn contracts(&self) -> Result<ContractAddresses, DashboardError> {
        let parse = |field: &str, value: &str| -> Result<Address, DashboardError> {
            let address = units::parse_address(value)
                .map_err(|e| DashboardError::Config(format!("{}: {}", field, e)))?;
            if address.is_zero() {
                return Err(DashboardError::Config(format!(
                    "{} is not set. Run 'dao-dashboard config set-contracts'",
                    field
                )));
            }
            Ok(address)
        };

        Ok(ContractAddresses {
            dao: parse("dao_contract", &self.dao_contract)?,
            membership_nft: parse("membership_nft_contract", &self.membership_nft_contract)?,
        })
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.confirmation_poll_ms),
            timeout: Duration::from_secs(self.confirmation_timeout_secs),
        }
    }
}

/// Set network configuration
pub fn set_network(network: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.apply_network(network)?;
    config.save()?;

    println!("{}", format!("✓ Network set to: {}", network).green());
    println!("  Chain ID: {}", config.chain_id);
    println!("  RPC URL:  {}", config.rpc_url);

    Ok(())
}

/// Point the dashboard at a custom RPC endpoint
pub fn set_rpc(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(DashboardError::Config(format!(
            "Invalid RPC URL: {}. Must start with http:// or https://",
            url
        ))
        .into());
    }

    let mut config = Config::load()?;
    config.rpc_url = url.to_string();
    config.save()?;

    println!("{}", format!("✓ RPC URL set to: {}", url).green());

    Ok(())
}

/// Set DAO and membership NFT contract addresses
pub fn set_contracts(dao: &str, membership_nft: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.apply_contracts(dao, membership_nft)?;
    config.save()?;

    println!("{}", "✓ Contract addresses updated".green());
    println!("  DAO:            {}", config.dao_contract);
    println!("  Membership NFT: {}", config.membership_nft_contract);

    Ok(())
}

/// Show current configuration
pub fn show() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "DAO Dashboard Configuration".bright_cyan().bold());
    println!("  Network:        {}", config.network.bright_yellow());
    println!("  Chain ID:       {}", config.chain_id);
    println!("  RPC URL:        {}", config.rpc_url);
    println!("  DAO:            {}", config.dao_contract);
    println!("  Membership NFT: {}", config.membership_nft_contract);
    println!(
        "  Confirmation:   poll every {} ms, give up after {} s",
        config.confirmation_poll_ms, config.confirmation_timeout_secs
    );
    println!(
        "  Wallet:         {}",
        config
            .wallet_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not set".to_string())
    );

    Ok(())
}
