use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::config::Config;
use crate::errors::DashboardError;

/// On-disk wallet: a hex private key plus its address for reference
#[derive(Debug, Serialize, Deserialize)]
struct WalletFile {
    address: String,
    private_key: String,
}

/// Create a new wallet
pub async fn create() -> Result<()> {
    let signer = PrivateKeySigner::random();
    let wallet_path = get_default_wallet_path()?;

    write_wallet(&wallet_path, &signer)?;

    println!("{}", "✓ New wallet created successfully!".green());
    println!("  Address: {}", signer.address().to_string().bright_yellow());
    println!("  Saved to: {}", wallet_path.display());
    println!();
    println!("{}", "⚠ IMPORTANT: Back up your wallet file!".yellow().bold());

    let mut config = Config::load()?;
    config.wallet_path = Some(wallet_path);
    config.save()?;

    Ok(())
}

/// Import wallet from a key file (wallet JSON or a bare hex private key)
pub async fn import(key_path: &str) -> Result<()> {
    let path = Path::new(key_path);

    if !path.exists() {
        return Err(anyhow::anyhow!("Key file not found: {}", key_path));
    }

    let signer = read_wallet(path).context("Invalid key file")?;

    println!("{}", "✓ Wallet imported successfully!".green());
    println!("  Address: {}", signer.address().to_string().bright_yellow());

    let mut config = Config::load()?;
    config.wallet_path = Some(path.to_path_buf());
    config.save()?;

    Ok(())
}

/// Show wallet address
pub async fn show_address() -> Result<()> {
    let config = Config::load()?;
    let signer = load_signer(&config)?.ok_or(DashboardError::WalletNotFound)?;

    println!("{}", "Wallet Address:".bright_cyan());
    println!("  {}", signer.address().to_string().bright_yellow());

    Ok(())
}

/// Signer for the configured wallet, `None` when no wallet is configured
pub fn load_signer(config: &Config) -> Result<Option<PrivateKeySigner>> {
    let Some(wallet_path) = &config.wallet_path else {
        return Ok(None);
    };

    if !wallet_path.exists() {
        return Err(DashboardError::WalletNotFound.into());
    }

    let signer = read_wallet(wallet_path)
        .with_context(|| format!("Failed to load wallet {}", wallet_path.display()))?;
    Ok(Some(signer))
}

fn read_wallet(path: &Path) -> Result<PrivateKeySigner> {
    let contents = std::fs::read_to_string(path)?;
    let key = match serde_json::from_str::<WalletFile>(&contents) {
        Ok(file) => file.private_key,
        Err(_) => contents.trim().to_string(),
    };
    parse_private_key(&key)
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| DashboardError::InvalidInput(format!("invalid private key: {}", e)).into())
}

fn write_wallet(path: &Path, signer: &PrivateKeySigner) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = WalletFile {
        address: signer.address().to_checksum(None),
        private_key: format!("0x{}", hex::encode(signer.to_bytes())),
    };
    std::fs::write(path, serde_json::to_string_pretty(&file)?)?;

    Ok(())
}

/// Get default wallet path
fn get_default_wallet_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?;
    Ok(config_dir.join("dao-dashboard").join("wallet.json"))
}
