use anyhow::Result;
use colored::Colorize;
use crate::commands;

/// Execute a passed proposal
pub async fn execute(proposal_id: u64) -> Result<()> {
    let (config, dashboard) = commands::open_dashboard()?;

    println!("{}", "Executing proposal...".bright_cyan());
    println!("  Proposal: #{}", proposal_id);
    println!();

    commands::connect(&dashboard, &config).await?;

    let spinner = commands::confirmation_spinner("Waiting for the execution to be mined...");
    let result = dashboard.execute(proposal_id).await;
    spinner.finish_and_clear();

    match result {
        Ok(confirmed) => {
            println!("{}", "✅ Proposal executed!".bright_green());
            commands::print_confirmed(&confirmed);
        }
        Err(e) => {
            println!("{}", "❌ Execution failed".bright_red());
            println!("  Error: {}", e);
            println!();
            println!("{}", "Troubleshooting:".bright_yellow());
            println!("  • Only proposals past their deadline with more Yay than Nay votes can be executed");
            println!("  • The treasury must hold enough ETH for the proposal amount");
            return Err(e.into());
        }
    }

    Ok(())
}
