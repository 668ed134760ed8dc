use anyhow::Result;
use colored::Colorize;
use crate::commands;
use crate::store::Snapshot;
use crate::units::format_ether_amount;

/// Execute dashboard summary
pub async fn execute() -> Result<()> {
    let (config, dashboard) = commands::open_dashboard()?;

    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!("{}", "        CryptoDAO Dashboard".bright_cyan().bold());
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!();

    commands::connect(&dashboard, &config).await?;

    let snapshot = dashboard.snapshot();
    print_summary(&snapshot);

    println!();
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!();

    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    println!("{}", "═══ Membership ═══".bright_cyan());
    let nft_display = if snapshot.membership_balance > 0 {
        snapshot.membership_balance.to_string().bright_green()
    } else {
        snapshot.membership_balance.to_string().yellow()
    };
    println!("  Membership NFTs:  {}", nft_display);
    if snapshot.is_owner {
        println!("  Role:             {}", "DAO owner".bright_magenta());
    }
    if snapshot.membership_balance == 0 {
        println!("  {}", "You need a membership NFT to vote on proposals".dimmed());
    }

    println!();
    println!("{}", "═══ Treasury ═══".bright_cyan());
    println!("  Balance:          {} ETH", format_ether_amount(snapshot.treasury_balance).bright_green());
    println!("  Proposals:        {}", snapshot.proposal_count);

    if let Some(fetched_at) = snapshot.fetched_at {
        println!("  Updated:          {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed());
    }
}
