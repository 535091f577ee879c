//! Caller-side input checks.
//!
//! Everything here runs before a single request is made, so an [`Error::Input`]
//! always means "nothing was sent".

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    pub max_messages: usize,
    /// Measured in characters, not bytes.
    pub max_message_chars: usize,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            max_messages: 100,
            max_message_chars: 1000,
        }
    }
}

impl InputPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_messages(mut self, n: usize) -> Self {
        self.max_messages = n;
        self
    }

    pub fn with_max_message_chars(mut self, n: usize) -> Self {
        self.max_message_chars = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_messages == 0 || self.max_message_chars == 0 {
            return Err(Error::configuration_with_context(
                "input limits must be at least 1",
                ErrorContext::new()
                    .with_details(format!(
                        "max_messages={}, max_message_chars={}",
                        self.max_messages, self.max_message_chars
                    ))
                    .with_source("input_policy"),
            ));
        }
        Ok(())
    }

    /// Check one message and return it trimmed.
    pub fn check_message<'a>(&self, message: &'a str) -> Result<&'a str> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(Error::input_with_context(
                "Please enter a message to analyze",
                ErrorContext::new().with_source("input_policy"),
            ));
        }
        let chars = trimmed.chars().count();
        if chars > self.max_message_chars {
            return Err(Error::input_with_context(
                format!(
                    "Message too long (max {} characters)",
                    self.max_message_chars
                ),
                ErrorContext::new()
                    .with_details(format!("got {chars} characters"))
                    .with_source("input_policy"),
            ));
        }
        Ok(trimmed)
    }

    /// Check a whole batch; messages are trimmed in the returned list.
    pub fn check_batch(&self, messages: Vec<String>) -> Result<Vec<String>> {
        if messages.is_empty() {
            return Err(Error::input_with_context(
                "Please enter at least one message",
                ErrorContext::new().with_source("input_policy"),
            ));
        }
        if messages.len() > self.max_messages {
            return Err(Error::input_with_context(
                format!("Maximum {} messages allowed per batch", self.max_messages),
                ErrorContext::new()
                    .with_details(format!("got {} messages", messages.len()))
                    .with_source("input_policy"),
            ));
        }
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                self.check_message(m)
                    .map(str::to_string)
                    .map_err(|e| match e {
                        Error::Input { message, context } => Error::Input {
                            message,
                            context: context.with_field_path(format!("messages[{i}]")),
                        },
                        other => other,
                    })
            })
            .collect()
    }
}

/// Split pasted batch text into messages: one per line, trimmed, blank lines dropped.
pub fn parse_batch_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
