use anyhow::Result;
use console::style;

use crate::prompt::rustyline::RustylinePrompt;
use crate::session::{ensure_session_dir, open_chat, Session};
use squad::agents::setup::{build_default_squad, SquadSettings};

pub async fn execute(
    settings: SquadSettings,
    agent: Option<String>,
    name: Option<String>,
    user_id: &str,
) -> Result<()> {
    let squad = build_default_squad(settings)?;
    if let Some(agent) = &agent {
        squad.orchestrator.agent(agent)?;
    }

    let session_dir = ensure_session_dir()?;
    let chat = open_chat(&session_dir, name, user_id)?;

    println!(
        "{} {}",
        style("squad").bold().cyan(),
        style(format!(
            "- {} agents ready{}",
            squad.orchestrator.registry().len(),
            if squad.panel.is_demo() {
                ", NeonPanel in demo mode"
            } else {
                ""
            }
        ))
        .dim()
    );

    let prompt = Box::new(RustylinePrompt::new()?);
    let mut session =
        Session::new(&squad.orchestrator, prompt, chat, session_dir).with_agent(agent);
    session.start().await
}
