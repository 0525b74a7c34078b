//! Line-oriented console I/O.

use crate::error::{ChatbotError, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// The conversation surface: bot lines out, user lines in.
pub trait Console {
    /// Show one bot message.
    fn say(&mut self, message: &str) -> Result<()>;

    /// Block until the user enters one line. EOF is `InputClosed`.
    fn read_line(&mut self) -> Result<String>;
}

/// Console over stdin/stdout with coloured speaker names.
pub struct StdConsole {
    bot_name: String,
    user_name: String,
}

impl StdConsole {
    pub fn new(bot_name: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            user_name: user_name.into(),
        }
    }
}

impl Console for StdConsole {
    fn say(&mut self, message: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}: {}", self.bot_name.green().bold(), message)?;
        out.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        {
            let mut out = io::stdout().lock();
            write!(out, "{}: ", self.user_name.cyan())?;
            out.flush()?;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(ChatbotError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Console fed from a fixed script; records everything said.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    pub said: Vec<String>,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            said: Vec::new(),
        }
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn transcript(&self) -> String {
        self.said.join("\n")
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn say(&mut self, message: &str) -> Result<()> {
        self.said.push(message.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        self.inputs.pop_front().ok_or(ChatbotError::InputClosed)
    }
}
