use anyhow::Result;
use console::style;
use serde_json::Value;

use squad::panel::{PanelClient, PanelConfig, ServerAction};

pub enum PanelCommand {
    Stats,
    User(String),
    Search(String),
    Action { server_id: String, action: ServerAction },
}

pub async fn execute(config: PanelConfig, command: PanelCommand) -> Result<()> {
    let client = PanelClient::new(config)?;
    if client.is_demo() {
        eprintln!(
            "{}",
            style("NEONPANEL_API_KEY is not set, showing demo data").yellow()
        );
    }

    let value = match command {
        PanelCommand::Stats => Value::Object(client.get_server_stats().await?),
        PanelCommand::User(user_id) => Value::Object(client.get_user_data(&user_id).await?),
        PanelCommand::Search(query) => Value::Array(
            client
                .search_resources(&query)
                .await?
                .into_iter()
                .map(Value::Object)
                .collect(),
        ),
        PanelCommand::Action { server_id, action } => {
            Value::Object(client.execute_server_action(&server_id, action).await?)
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
