use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::Agent;
use crate::errors::{SquadError, SquadResult};
use crate::models::agent::AgentDescriptor;

/// Agents available for routing, kept in registration order.
///
/// The registry is filled during setup and then shared read-only behind an
/// `Arc`; nothing is removed while the process runs.
#[derive(Default)]
pub struct AgentRegistry {
    agents: Vec<Arc<dyn Agent>>,
    index: HashMap<String, usize>,
    default: Option<usize>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) -> SquadResult<()> {
        let id = agent.id().to_string();
        if self.index.contains_key(&id) {
            return Err(SquadError::DuplicateAgent(id));
        }
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    pub fn get(&self, id: &str) -> SquadResult<Arc<dyn Agent>> {
        self.index
            .get(id)
            .map(|&position| self.agents[position].clone())
            .ok_or_else(|| SquadError::UnknownAgent(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Agents in the order they were registered
    pub fn agents(&self) -> impl Iterator<Item = &Arc<dyn Agent>> {
        self.agents.iter()
    }

    pub fn list(&self) -> Vec<&AgentDescriptor> {
        self.agents.iter().map(|agent| agent.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Choose the agent used when nothing else matches
    pub fn set_default(&mut self, id: &str) -> SquadResult<()> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| SquadError::UnknownAgent(id.to_string()))?;
        self.default = Some(position);
        Ok(())
    }

    /// The designated default, or the first registered agent when none was set
    pub fn default_agent(&self) -> SquadResult<Arc<dyn Agent>> {
        let position = self.default.unwrap_or(0);
        self.agents
            .get(position)
            .cloned()
            .ok_or(SquadError::NoAgentsRegistered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::demo::{DemoAgent, DemoPersona};
    use crate::models::agent::AgentConfig;

    fn agent(id: &str) -> Arc<dyn Agent> {
        Arc::new(DemoAgent::new(
            AgentDescriptor::new(id, id.to_uppercase(), format!("{id} agent")),
            AgentConfig::default(),
            DemoPersona::Assistant,
        ))
    }

    #[test]
    fn test_register_and_get() -> SquadResult<()> {
        let mut registry = AgentRegistry::new();
        registry.register(agent("tech"))?;
        registry.register(agent("general"))?;

        assert_eq!(registry.get("tech")?.id(), "tech");
        assert_eq!(registry.len(), 2);
        let ids: Vec<&str> = registry.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["tech", "general"]);
        Ok(())
    }

    #[test]
    fn test_duplicate_registration_fails() -> SquadResult<()> {
        let mut registry = AgentRegistry::new();
        registry.register(agent("tech"))?;

        let err = registry.register(agent("tech")).unwrap_err();
        assert_eq!(err, SquadError::DuplicateAgent("tech".to_string()));
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn test_unknown_agent() {
        let registry = AgentRegistry::new();
        assert_eq!(
            registry.get("nobody").err(),
            Some(SquadError::UnknownAgent("nobody".to_string()))
        );
    }

    #[test]
    fn test_default_agent_selection() -> SquadResult<()> {
        let mut registry = AgentRegistry::new();
        assert_eq!(
            registry.default_agent().err(),
            Some(SquadError::NoAgentsRegistered)
        );

        registry.register(agent("tech"))?;
        registry.register(agent("general"))?;
        assert_eq!(registry.default_agent()?.id(), "tech");

        registry.set_default("general")?;
        assert_eq!(registry.default_agent()?.id(), "general");

        assert!(registry.set_default("missing").is_err());
        assert_eq!(registry.default_agent()?.id(), "general");
        Ok(())
    }
}
