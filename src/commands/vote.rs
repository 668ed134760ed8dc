use anyhow::Result;
use colored::Colorize;
use crate::commands;
use crate::proposal::VoteChoice;

/// Execute vote command
pub async fn execute(proposal_id: u64, choice: VoteChoice) -> Result<()> {
    let (config, dashboard) = commands::open_dashboard()?;

    println!("{}", "Voting on proposal...".bright_cyan());
    println!("  Proposal: #{}", proposal_id);
    println!("  Choice:   {}", choice.to_string().bright_yellow());
    println!();

    commands::connect(&dashboard, &config).await?;

    let spinner = commands::confirmation_spinner("Waiting for the vote to be mined...");
    let result = dashboard.vote(proposal_id, choice).await;
    spinner.finish_and_clear();

    match result {
        Ok(confirmed) => {
            println!("{}", "✅ Vote confirmed!".bright_green());
            commands::print_confirmed(&confirmed);

            if let Some(p) = dashboard.snapshot().proposal(proposal_id) {
                println!();
                println!("  Yay votes: {}", p.yay_votes.to_string().bright_green());
                println!("  Nay votes: {}", p.nay_votes.to_string().bright_red());
            }
        }
        Err(e) => {
            println!("{}", "❌ Vote failed".bright_red());
            println!("  Error: {}", e);
            println!();
            println!("{}", "Troubleshooting:".bright_yellow());
            println!("  • Voting requires a membership NFT");
            println!("  • Each member can vote once per proposal");
            println!("  • Votes are only accepted before the deadline");
            return Err(e.into());
        }
    }

    Ok(())
}
