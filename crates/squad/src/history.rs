use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::message::{Message, Role};

const TEXT_RULE_WIDTH: usize = 50;

/// Message counts of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub user: usize,
    pub assistant: usize,
    /// Distinct agents that answered, in name order
    pub agents: BTreeSet<String>,
}

/// One user's conversation, owned by the caller and passed into each request
#[derive(Debug, Clone)]
pub struct ChatSession {
    session_id: String,
    user_id: String,
    messages: Vec<Message>,
}

impl ChatSession {
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            messages: Vec::new(),
        }
    }

    /// Start a session under a caller-chosen id instead of a random one
    pub fn with_session_id<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Continue a conversation read back from an export
    pub fn resume<S: Into<String>>(user_id: S, export: ChatExport) -> Self {
        Self {
            session_id: export.session_id,
            user_id: user_id.into(),
            messages: export.messages,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_user<S: Into<String>>(&mut self, content: S) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant<A: Into<String>, S: Into<String>>(&mut self, agent_id: A, content: S) {
        self.messages.push(Message::assistant(agent_id, content));
    }

    /// Remove and return the newest message
    pub fn pop(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// The newest `n` messages, oldest first
    pub fn recent(&self, n: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages[skip..].to_vec()
    }

    /// Drop all messages and start over under a fresh session id
    pub fn clear(&mut self) {
        self.messages.clear();
        self.session_id = Uuid::new_v4().to_string();
    }

    pub fn stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total: self.messages.len(),
            ..Default::default()
        };
        for message in &self.messages {
            match message.role {
                Role::User => stats.user += 1,
                Role::Assistant => {
                    stats.assistant += 1;
                    if let Some(agent) = &message.agent_id {
                        stats.agents.insert(agent.clone());
                    }
                }
            }
        }
        stats
    }

    pub fn export(&self) -> ChatExport {
        ChatExport {
            session_id: self.session_id.clone(),
            export_time: Utc::now(),
            messages: self.messages.clone(),
        }
    }
}

/// Portable snapshot of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExport {
    pub session_id: String,
    pub export_time: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl ChatExport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid chat export")
    }

    /// Write `{dir}/{session_id}.json`, creating `dir` when missing
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!("{}.json", self.session_id));

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open chat export {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid chat export {}", path.display()))
    }

    /// Plain-text transcript
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "Chat Session: {}\nExported: {}\n{}\n\n",
            self.session_id,
            self.export_time.to_rfc3339(),
            "=".repeat(TEXT_RULE_WIDTH)
        );
        for message in &self.messages {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => message.agent_id.as_deref().unwrap_or("Assistant"),
            };
            text.push_str(&format!(
                "{} [{}]:\n{}\n\n",
                speaker,
                message.timestamp.to_rfc3339(),
                message.content
            ));
        }
        text
    }
}
