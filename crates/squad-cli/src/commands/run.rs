use anyhow::Result;
use console::style;
use futures::StreamExt;
use std::io::{self, Write};

use squad::agents::setup::{build_default_squad, SquadSettings};
use squad::models::context::RequestContext;
use squad::models::response::ResponseContent;

/// Answer a single message and exit
pub async fn execute(
    settings: SquadSettings,
    text: String,
    agent: Option<String>,
    user_id: &str,
) -> Result<()> {
    let squad = build_default_squad(settings)?;

    let mut context = RequestContext::default();
    if let Some(agent) = agent {
        context = context.with_preferred_agent(agent);
    }
    let response = squad
        .orchestrator
        .route_request(&text, user_id, "run", context)
        .await?;

    eprintln!("{}", style(format!("─── {} ───", response.agent_id)).magenta().dim());
    let mut stdout = io::stdout();
    match response.content {
        ResponseContent::Complete(text) => write!(stdout, "{}", text)?,
        ResponseContent::Streaming(mut fragments) => {
            while let Some(fragment) = fragments.next().await {
                write!(stdout, "{}", fragment)?;
                stdout.flush()?;
            }
        }
    }
    writeln!(stdout)?;
    Ok(())
}
