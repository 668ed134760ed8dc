use anyhow::Result;
use colored::{ColoredString, Colorize};
use crate::commands;
use crate::dashboard::{ProposalView, Tab};
use crate::proposal::VoteChoice;
use crate::status::{PermittedAction, ProposalStatus};
use crate::units::format_ether_amount;

/// Execute proposal listing
pub async fn execute() -> Result<()> {
    let (config, mut dashboard) = commands::open_dashboard()?;
    dashboard.select_tab(Tab::ViewProposals);

    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!("{}", "        DAO Proposals".bright_cyan().bold());
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!();

    commands::connect(&dashboard, &config).await?;

    let views = dashboard.proposal_views();
    if views.is_empty() {
        println!("{}", "There are no proposals to display.".yellow());
        println!("  {}", "Create one with 'dao-dashboard create --token <address> --amount <eth>'".dimmed());
        println!();
        return Ok(());
    }

    for view in &views {
        print_proposal(view);
        println!();
    }

    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!();

    Ok(())
}

fn status_label(status: ProposalStatus) -> ColoredString {
    match status {
        ProposalStatus::Active => status.label().bright_green(),
        ProposalStatus::Passed => status.label().bright_cyan(),
        ProposalStatus::NotPassed => status.label().bright_red(),
        ProposalStatus::Executed => status.label().dimmed(),
    }
}

fn action_hint(proposal_id: u64, action: PermittedAction) -> String {
    match action {
        PermittedAction::Vote(VoteChoice::Yay) => {
            format!("dao-dashboard vote --proposal {} --choice yay", proposal_id)
        }
        PermittedAction::Vote(VoteChoice::Nay) => {
            format!("dao-dashboard vote --proposal {} --choice nay", proposal_id)
        }
        PermittedAction::Execute => format!("dao-dashboard execute --proposal {}", proposal_id),
    }
}

fn print_proposal(view: &ProposalView) {
    let p = &view.proposal;

    println!("{} {}", format!("Proposal #{}", p.id).bold(), status_label(view.status));
    println!("  Token:     {}", p.token_address.to_string().bright_yellow());
    println!("  Amount:    {} ETH", format_ether_amount(p.eth_amount));
    println!("  Yay votes: {}", p.yay_votes);
    println!("  Nay votes: {}", p.nay_votes);
    println!("  Deadline:  {}", p.deadline.format("%Y-%m-%d %H:%M:%S UTC"));

    for action in view.actions {
        println!("  {} {}", "→".bright_green(), action_hint(p.id, *action).dimmed());
    }
}
