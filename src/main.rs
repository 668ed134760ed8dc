use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use dao_dashboard::{commands, config, wallet, VoteChoice};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dao-dashboard")]
#[command(author = "CryptoDAO Team")]
#[command(version = "0.1.0")]
#[command(about = "DAO dashboard for CryptoDAO members", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show membership, treasury and proposal totals
    Status,

    /// List proposals with their current status
    Proposals,

    /// Vote on an active proposal
    Vote {
        /// Proposal ID
        #[arg(long)]
        proposal: u64,

        /// yay or nay
        #[arg(long)]
        choice: VoteChoice,
    },

    /// Execute a passed proposal
    Execute {
        /// Proposal ID
        #[arg(long)]
        proposal: u64,
    },

    /// Create a funding proposal
    Create {
        /// Address of the token the DAO should invest in
        #[arg(long)]
        token: String,

        /// Amount of ETH to invest (e.g. 0.05)
        #[arg(long)]
        amount: String,
    },

    /// Wallet management commands
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet
    Create,

    /// Import wallet from a key file
    Import {
        /// Path to a wallet JSON or hex private key file
        #[arg(long)]
        key_file: String,
    },

    /// Show wallet address
    Address,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Select network (goerli/sepolia/mainnet/localhost)
    SetNetwork {
        /// Network name
        network: String,
    },

    /// Use a custom JSON-RPC endpoint
    SetRpc {
        /// RPC URL
        url: String,
    },

    /// Set DAO and membership NFT contract addresses
    SetContracts {
        /// DAO contract address
        #[arg(long)]
        dao: String,

        /// Membership NFT contract address
        #[arg(long)]
        nft: String,
    },

    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("{}", "╔════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║     CryptoDAO - Member Dashboard          ║".bright_cyan());
    println!("{}", "╚════════════════════════════════════════════╝".bright_cyan());
    println!();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            commands::status::execute().await?;
        }
        Commands::Proposals => {
            commands::proposals::execute().await?;
        }
        Commands::Vote { proposal, choice } => {
            commands::vote::execute(proposal, choice).await?;
        }
        Commands::Execute { proposal } => {
            commands::execute::execute(proposal).await?;
        }
        Commands::Create { token, amount } => {
            commands::create::execute(token, amount).await?;
        }
        Commands::Wallet { action } => match action {
            WalletCommands::Create => wallet::create().await?,
            WalletCommands::Import { key_file } => wallet::import(&key_file).await?,
            WalletCommands::Address => wallet::show_address().await?,
        },
        Commands::Config { action } => match action {
            ConfigCommands::SetNetwork { network } => config::set_network(&network)?,
            ConfigCommands::SetRpc { url } => config::set_rpc(&url)?,
            ConfigCommands::SetContracts { dao, nft } => config::set_contracts(&dao, &nft)?,
            ConfigCommands::Show => config::show()?,
        },
    }

    Ok(())
}
