use anyhow::Result;

pub mod rustyline;

/// Terminal front end of an interactive session
pub trait Prompt {
    /// Print the header that precedes an agent's answer
    fn render_agent(&mut self, agent_id: &str);
    /// Print part of an answer as it arrives
    fn render_fragment(&mut self, fragment: &str);
    fn render_info(&mut self, text: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Clear,    // Start over with an empty history
    Stats,    // Show session statistics
    Exit,     // User wants to exit the session
}
