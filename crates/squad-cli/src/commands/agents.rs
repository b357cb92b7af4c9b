use anyhow::Result;
use console::style;

use squad::agents::setup::{build_default_squad, SquadSettings};

pub async fn execute(settings: SquadSettings) -> Result<()> {
    let squad = build_default_squad(settings)?;
    let registry = squad.orchestrator.registry();
    let default_id = registry.default_agent()?.id().to_string();

    for agent in registry.agents() {
        let descriptor = agent.descriptor();
        let marker = if descriptor.id == default_id {
            style(" (default)").green().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            style(&descriptor.id).bold(),
            style(&descriptor.display_name).cyan(),
            marker
        );
        println!("    {}", descriptor.description);
        if !descriptor.capability_tags.is_empty() {
            let tags: Vec<&str> = descriptor.capability_tags.iter().map(String::as_str).collect();
            println!("    {} {}", style("tags:").dim(), tags.join(", "));
        }
    }
    Ok(())
}
