use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single chat turn, either typed by the user or produced by an agent
pub struct Message {
    pub role: Role,
    pub content: String,
    /// The agent that produced an assistant message. Serialized as `agent_name`
    /// to stay compatible with exported chat histories.
    #[serde(
        rename = "agent_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agent_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>>(content: S) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
            agent_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message attributed to `agent_id`
    pub fn assistant<A: Into<String>, S: Into<String>>(agent_id: A, content: S) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
            agent_id: Some(agent_id.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_has_no_agent() {
        let message = Message::user("hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hello");
        assert!(message.agent_id.is_none());
        assert!(message.is_user());
    }

    #[test]
    fn test_assistant_message_serializes_agent_name() -> anyhow::Result<()> {
        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")?.with_timezone(&Utc);
        let message = Message::assistant("tech", "try restarting it").with_timestamp(timestamp);

        let value = serde_json::to_value(&message)?;
        assert_eq!(
            value,
            json!({
                "role": "assistant",
                "content": "try restarting it",
                "agent_name": "tech",
                "timestamp": "2024-05-01T12:00:00Z"
            })
        );
        Ok(())
    }

    #[test]
    fn test_user_message_omits_agent_name() -> anyhow::Result<()> {
        let value = serde_json::to_value(Message::user("hi"))?;
        assert!(value.get("agent_name").is_none());
        assert_eq!(value["role"], json!("user"));
        Ok(())
    }
}
