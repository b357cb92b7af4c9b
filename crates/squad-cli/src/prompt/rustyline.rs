use std::io::{self, Write};

use anyhow::Result;
use cliclack::spinner;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{Input, InputType, Prompt};

const PROMPT: &str = "\x1b[1m\x1b[38;5;45m(you)> \x1b[0m";

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: cliclack::ProgressBar,
    busy: bool,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: spinner(),
            busy: false,
        })
    }
}

fn print_help() {
    println!("Commands:");
    println!("/exit - Exit the session");
    println!("/clear - Forget the conversation and start a new session");
    println!("/stats - Show message counts for this session");
    println!("/? | /help - Display this help message");
    println!("Ctrl+C - Interrupt the current answer");
}

impl Prompt for RustylinePrompt {
    fn render_agent(&mut self, agent_id: &str) {
        self.hide_busy();
        println!();
        println!("{}", style(format!("─── {} ───", agent_id)).magenta().dim());
    }

    fn render_fragment(&mut self, fragment: &str) {
        print!("{}", fragment);
        let _ = io::stdout().flush();
    }

    fn render_info(&mut self, text: &str) {
        println!("{}", style(text).dim());
    }

    fn get_input(&mut self) -> Result<Input> {
        let message_text = match self.editor.readline(PROMPT) {
            Ok(text) => text.trim().to_string(),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                })
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                return Ok(Input {
                    input_type: InputType::Exit,
                    content: None,
                });
            }
        };

        if message_text.is_empty() {
            return Ok(Input {
                input_type: InputType::AskAgain,
                content: None,
            });
        }
        let _ = self.editor.add_history_entry(message_text.as_str());

        let input_type = match message_text.to_lowercase().as_str() {
            "/exit" | "/quit" => InputType::Exit,
            "/clear" => InputType::Clear,
            "/stats" => InputType::Stats,
            "/?" | "/help" => {
                print_help();
                InputType::AskAgain
            }
            _ => {
                return Ok(Input {
                    input_type: InputType::Message,
                    content: Some(message_text),
                })
            }
        };
        Ok(Input {
            input_type,
            content: None,
        })
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("routing your request...");
        self.busy = true;
    }

    fn hide_busy(&mut self) {
        if self.busy {
            self.spinner.stop("");
            self.busy = false;
        }
    }

    fn close(&self) {
        // No cleanup required
    }
}
