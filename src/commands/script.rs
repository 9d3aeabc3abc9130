//! Script lines
//!
//! A script line names a command and its parameters:
//!
//! ```text
//! Export: Filename="my labels.txt" NumChannels=2
//! ```
//!
//! Values may be double-quoted to include spaces; inside quotes `\"` and
//! `\\` stand for a quote and a backslash.

use std::iter::Peekable;
use std::str::Chars;

use crate::commands::export::ExportCommand;
use crate::commands::import::ImportCommand;
use crate::commands::{Command, CommandContext};
use crate::error::{AutomationError, Result};

/// A parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub name: String,
    pub arguments: Vec<(String, String)>,
}

fn malformed(reason: impl Into<String>) -> AutomationError {
    AutomationError::MalformedCommand {
        reason: reason.into(),
    }
}

/// Split a script line into command name and `Key=Value` arguments.
pub fn parse_command_line(line: &str) -> Result<ScriptCommand> {
    let line = line.trim();
    let name_end = line
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    let name = &line[..name_end];
    if name.is_empty() {
        return Err(malformed("missing command name"));
    }

    let rest = line[name_end..].trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);

    let mut chars = rest.chars().peekable();
    let mut arguments = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        if chars.next_if_eq(&'=').is_none() {
            return Err(malformed(format!("expected Key=Value, found '{}'", key)));
        }
        if key.is_empty() {
            return Err(malformed("parameter name missing before '='"));
        }

        let value = parse_value(&mut chars, &key)?;
        arguments.push((key, value));
    }

    Ok(ScriptCommand {
        name: name.to_string(),
        arguments,
    })
}

fn parse_value(chars: &mut Peekable<Chars<'_>>, key: &str) -> Result<String> {
    let mut value = String::new();

    if chars.next_if_eq(&'"').is_none() {
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            value.push(c);
        }
        return Ok(value);
    }

    loop {
        match chars.next() {
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some(escaped @ ('"' | '\\')) => value.push(escaped),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => return Err(malformed(format!("unterminated quote in value of {}", key))),
            },
            Some(c) => value.push(c),
            None => return Err(malformed(format!("unterminated quote in value of {}", key))),
        }
    }

    if chars.peek().map_or(false, |c| !c.is_whitespace()) {
        return Err(malformed(format!("unexpected text after quoted value of {}", key)));
    }

    Ok(value)
}

fn apply_with<C: Command>(
    arguments: &[(String, String)],
    context: &mut CommandContext<'_>,
) -> bool {
    match C::with_arguments(arguments.iter().map(|(k, v)| (k.as_str(), v.as_str()))) {
        Ok(command) => command.apply(context),
        Err(e) => {
            context.error(&e.to_string());
            false
        }
    }
}

/// Parse and run one script line, reporting exactly one message.
pub fn run_script_line(line: &str, context: &mut CommandContext<'_>) -> bool {
    let command = match parse_command_line(line) {
        Ok(command) => command,
        Err(e) => {
            context.error(&e.to_string());
            return false;
        }
    };

    if command.name == ImportCommand::NAME {
        apply_with::<ImportCommand>(&command.arguments, context)
    } else if command.name == ExportCommand::NAME {
        apply_with::<ExportCommand>(&command.arguments, context)
    } else {
        let err = AutomationError::UnknownCommand { name: command.name };
        context.error(&err.to_string());
        false
    }
}
