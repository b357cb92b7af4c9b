use anyhow::{Context, Result};
use futures::StreamExt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prompt::{InputType, Prompt};
use squad::history::{ChatExport, ChatSession};
use squad::models::context::RequestContext;
use squad::models::response::ResponseContent;
use squad::orchestrator::Orchestrator;

pub fn ensure_session_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let config_dir = home_dir.join(".config").join("squad").join("sessions");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Resume `{dir}/{name}.json` when it exists, otherwise start a session with
/// that id. Without a name a fresh session is started.
pub fn open_chat(dir: &Path, name: Option<String>, user_id: &str) -> Result<ChatSession> {
    let Some(name) = name else {
        return Ok(ChatSession::new(user_id));
    };

    let path = dir.join(format!("{}.json", name));
    if path.exists() {
        let export = ChatExport::load(&path)
            .with_context(|| format!("Could not resume session {}", name))?;
        Ok(ChatSession::resume(user_id, export))
    } else {
        Ok(ChatSession::new(user_id).with_session_id(name))
    }
}

pub struct Session<'a> {
    orchestrator: &'a Orchestrator,
    prompt: Box<dyn Prompt + 'a>,
    chat: ChatSession,
    session_dir: PathBuf,
    agent: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(
        orchestrator: &'a Orchestrator,
        prompt: Box<dyn Prompt + 'a>,
        chat: ChatSession,
        session_dir: PathBuf,
    ) -> Self {
        Session {
            orchestrator,
            prompt,
            chat,
            session_dir,
            agent: None,
        }
    }

    /// Send every message to `agent` instead of classifying it
    pub fn with_agent(mut self, agent: Option<String>) -> Self {
        self.agent = agent;
        self
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.render_info(&format!(
            "Starting session {}. Recording to {}",
            self.chat.session_id(),
            self.session_path().display()
        ));
        if !self.chat.messages().is_empty() {
            self.prompt.render_info(&format!(
                "Resumed {} earlier messages.",
                self.chat.messages().len()
            ));
        }
        self.prompt
            .render_info("Type /help for commands, /exit to leave.\n");

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = input.content {
                        self.process_message(content).await?;
                    }
                }
                InputType::Clear => {
                    self.chat.clear();
                    self.prompt.render_info(&format!(
                        "History cleared. New session {}",
                        self.chat.session_id()
                    ));
                }
                InputType::Stats => {
                    let stats = self.chat.stats();
                    let agents: Vec<&str> = stats.agents.iter().map(String::as_str).collect();
                    self.prompt.render_info(&format!(
                        "{} messages ({} from you, {} from agents). Agents used: {}",
                        stats.total,
                        stats.user,
                        stats.assistant,
                        if agents.is_empty() {
                            "none".to_string()
                        } else {
                            agents.join(", ")
                        }
                    ));
                }
                InputType::AskAgain => continue,
                InputType::Exit => break,
            }
        }

        self.prompt.render_info(&format!(
            "Closing session. Recorded to {}",
            self.session_path().display()
        ));
        self.prompt.close();
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.session_dir
            .join(format!("{}.json", self.chat.session_id()))
    }

    fn persist(&self) {
        if let Err(e) = self.chat.export().save(&self.session_dir) {
            eprintln!("Failed to persist session: {}", e);
        }
    }

    async fn process_message(&mut self, content: String) -> Result<()> {
        let max_messages = self.orchestrator.config().max_context_messages;
        let history = self.chat.recent(max_messages);
        self.chat.push_user(content.clone());
        self.persist();

        let mut context = RequestContext::default().with_recent_messages(history);
        if let Some(agent) = &self.agent {
            context = context.with_preferred_agent(agent.clone());
        }

        self.prompt.show_busy();
        let response = self
            .orchestrator
            .route_request(&content, self.chat.user_id(), self.chat.session_id(), context)
            .await;
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.prompt.hide_busy();
                eprintln!("Error: {}", e);
                self.chat.pop();
                self.persist();
                return Ok(());
            }
        };

        let agent_id = response.agent_id.clone();
        self.prompt.render_agent(&agent_id);

        let answer = match response.content {
            ResponseContent::Complete(text) => {
                self.prompt.render_fragment(&text);
                Some(text)
            }
            ResponseContent::Streaming(mut fragments) => {
                let mut answer = String::new();
                loop {
                    tokio::select! {
                        fragment = fragments.next() => match fragment {
                            Some(fragment) => {
                                self.prompt.render_fragment(&fragment);
                                answer.push_str(&fragment);
                            }
                            None => break Some(answer),
                        },
                        _ = tokio::signal::ctrl_c() => {
                            self.prompt.render_info("\nInterrupted. The question was dropped from the history.");
                            break None;
                        }
                    }
                }
            }
        };
        self.prompt.render_fragment("\n\n");

        match answer {
            Some(answer) => self.chat.push_assistant(agent_id, answer),
            None => {
                self.chat.pop();
            }
        }
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Input;
    use squad::agents::demo::{DemoAgent, DemoPersona};
    use squad::models::agent::{AgentConfig, AgentDescriptor};
    use squad::registry::AgentRegistry;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tempfile::tempdir;

    /// Replays canned input, then exits
    struct ScriptedPrompt {
        inputs: VecDeque<Input>,
    }

    impl ScriptedPrompt {
        fn new(messages: &[&str]) -> Self {
            let inputs = messages
                .iter()
                .map(|m| Input {
                    input_type: InputType::Message,
                    content: Some(m.to_string()),
                })
                .collect();
            Self { inputs }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn render_agent(&mut self, _agent_id: &str) {}
        fn render_fragment(&mut self, _fragment: &str) {}
        fn render_info(&mut self, _text: &str) {}
        fn get_input(&mut self) -> Result<Input> {
            Ok(self.inputs.pop_front().unwrap_or(Input {
                input_type: InputType::Exit,
                content: None,
            }))
        }
        fn show_busy(&mut self) {}
        fn hide_busy(&mut self) {}
        fn close(&self) {}
    }

    fn orchestrator() -> Orchestrator {
        let mut registry = AgentRegistry::new();
        registry
            .register(Arc::new(DemoAgent::new(
                AgentDescriptor::new("general", "General", ""),
                AgentConfig::default().with_streaming(false),
                DemoPersona::Assistant,
            )))
            .unwrap();
        Orchestrator::new(registry)
    }

    #[tokio::test]
    async fn test_answered_turns_are_recorded() -> Result<()> {
        let dir = tempdir()?;
        let orchestrator = orchestrator();
        let chat = ChatSession::new("me").with_session_id("answered");

        let mut session = Session::new(
            &orchestrator,
            Box::new(ScriptedPrompt::new(&["hello"])),
            chat,
            dir.path().to_path_buf(),
        );
        session.start().await?;

        let saved = ChatExport::load(&dir.path().join("answered.json"))?;
        assert_eq!(saved.messages.len(), 2);
        assert_eq!(saved.messages[1].agent_id.as_deref(), Some("general"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_request_is_dropped_from_history() -> Result<()> {
        let dir = tempdir()?;
        let orchestrator = orchestrator();
        let chat = ChatSession::new("me").with_session_id("unanswered");

        let mut session = Session::new(
            &orchestrator,
            Box::new(ScriptedPrompt::new(&["hello"])),
            chat,
            dir.path().to_path_buf(),
        )
        .with_agent(Some("ghost".to_string()));
        session.start().await?;

        let saved = ChatExport::load(&dir.path().join("unanswered.json"))?;
        assert!(saved.messages.is_empty());
        Ok(())
    }

    #[test]
    fn test_open_chat_resumes_named_session() -> Result<()> {
        let dir = tempdir()?;

        let fresh = open_chat(dir.path(), Some("standup".to_string()), "me")?;
        assert_eq!(fresh.session_id(), "standup");
        assert!(fresh.messages().is_empty());

        let mut chat = fresh;
        chat.push_user("hello");
        chat.push_assistant("general", "hi there");
        chat.export().save(dir.path())?;

        let resumed = open_chat(dir.path(), Some("standup".to_string()), "me")?;
        assert_eq!(resumed.messages(), chat.messages());

        let anonymous = open_chat(dir.path(), None, "me")?;
        assert_ne!(anonymous.session_id(), "standup");
        Ok(())
    }
}
