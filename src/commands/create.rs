use anyhow::Result;
use colored::Colorize;
use crate::commands;
use crate::dashboard::Tab;
use crate::proposal::ProposalForm;
use crate::units::format_ether_amount;

/// Execute proposal creation
pub async fn execute(token_address: String, eth_amount: String) -> Result<()> {
    let form = ProposalForm::new(token_address, eth_amount);

    // Validate inputs before touching config or network
    let valid = form.validate()?;

    let (config, mut dashboard) = commands::open_dashboard()?;
    dashboard.select_tab(Tab::CreateProposal);

    println!("{}", "Creating proposal...".bright_cyan());
    println!("  Token:  {}", valid.token.to_string().bright_yellow());
    println!("  Amount: {} ETH", format_ether_amount(valid.amount));
    println!();

    commands::connect(&dashboard, &config).await?;

    let spinner = commands::confirmation_spinner("Waiting for the proposal to be mined...");
    let result = dashboard.create_proposal(form).await;
    spinner.finish_and_clear();

    match result {
        Ok(confirmed) => {
            println!("{}", "✅ Proposal created!".bright_green());
            commands::print_confirmed(&confirmed);
            println!();
            println!("  Total proposals: {}", dashboard.snapshot().proposal_count);
            println!("{}", "Note: voting closes 10 minutes after creation".yellow());
        }
        Err(e) => {
            println!("{}", "❌ Proposal creation failed".bright_red());
            println!("  Error: {}", e);
            println!();
            println!("{}", "Troubleshooting:".bright_yellow());
            println!("  • Creating proposals requires a membership NFT");
            println!("  • Ensure you have ETH for transaction fees");
            return Err(e.into());
        }
    }

    Ok(())
}
