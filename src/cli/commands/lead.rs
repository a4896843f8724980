use crate::cli::commands::Session;
use crate::cli::parser::{Cli, Commands, LeadAction};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::daily_state::ClaimOutcome;
use crate::ui::messages::{info, success};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Lead { action } = &cli.command else {
        return Ok(());
    };

    let session = Session::open(cli, cfg)?;
    let svc = session.lead_reports();

    match action {
        LeadAction::Claim => match svc.claim_lead()? {
            ClaimOutcome::Claimed => success("You are today's lead."),
            ClaimOutcome::AlreadyLead => info("You are already today's lead."),
        },
        LeadAction::Status => match svc.lead_status()? {
            Some(lead) => info(format!("Today's lead: {}", lead)),
            None => info("No lead assigned for today."),
        },
    }
    Ok(())
}
