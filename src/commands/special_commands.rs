//! Special commands parser for interactive chat
//!
//! This module parses the slash commands that can be entered during an
//! interactive chat. Special commands allow users to:
//! - Start a new chat or switch to a saved one
//! - Rename and delete saved sessions
//! - Rate or regenerate the last reply
//! - Change the colour theme
//! - Exit the session
//!
//! Command names are case-insensitive; arguments keep their case.

use crate::session::Feedback;
use crate::theme::Theme;
use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// What `/theme` should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Set(Theme),
    Toggle,
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session store or the display rather than
/// being sent to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Save the current session and start an empty one
    NewChat,

    /// List saved sessions
    ListSessions,

    /// Switch to a saved session
    LoadSession(String),

    /// Rename a saved session
    RenameSession { id: String, name: String },

    /// Delete a saved session (after confirmation)
    DeleteSession(String),

    /// Tag the last bot reply
    Rate(Feedback),

    /// Ask for a new reply to the current conversation
    Regenerate,

    /// Show, set or toggle the theme
    Theme(ThemeAction),

    /// Display the current session summary
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a prompt.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use scribe::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("/load session_1").unwrap(),
///     SpecialCommand::LoadSession("session_1".to_string())
/// );
/// assert_eq!(parse_special_command("write a haiku").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }

    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match name.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/list" | "/sessions" => Ok(SpecialCommand::ListSessions),

        "/load" => required_arg(&name, rest, "/load <session_id>")
            .map(|id| SpecialCommand::LoadSession(id.to_string())),

        "/delete" => required_arg(&name, rest, "/delete <session_id>")
            .map(|id| SpecialCommand::DeleteSession(id.to_string())),

        "/rename" => {
            let usage = "/rename <session_id> <new name>";
            let args = required_arg(&name, rest, usage)?;
            match args.split_once(char::is_whitespace) {
                Some((id, new_name)) if !new_name.trim().is_empty() => {
                    Ok(SpecialCommand::RenameSession {
                        id: id.to_string(),
                        name: new_name.trim().to_string(),
                    })
                }
                _ => Err(CommandError::MissingArgument {
                    command: name.clone(),
                    usage: usage.to_string(),
                }),
            }
        }

        "/good" => Ok(SpecialCommand::Rate(Feedback::Good)),
        "/bad" => Ok(SpecialCommand::Rate(Feedback::Bad)),
        "/regenerate" | "/retry" => Ok(SpecialCommand::Regenerate),

        "/theme" => match rest.to_lowercase().as_str() {
            "" => Ok(SpecialCommand::Theme(ThemeAction::Show)),
            "toggle" => Ok(SpecialCommand::Theme(ThemeAction::Toggle)),
            arg => Theme::parse_str(arg)
                .map(|t| SpecialCommand::Theme(ThemeAction::Set(t)))
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: name.clone(),
                    arg: arg.to_string(),
                }),
        },

        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn required_arg<'a>(command: &str, rest: &'a str, usage: &str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(rest)
    }
}

/// Print help for all special commands
pub fn print_help() {
    println!("\n{}", "Sessions".bold());
    println!("  /new                      Save this chat and start a new one");
    println!("  /list                     List saved sessions");
    println!("  /load <id>                Switch to a saved session");
    println!("  /rename <id> <name>       Rename a saved session");
    println!("  /delete <id>              Delete a saved session");
    println!("\n{}", "Replies".bold());
    println!("  /good, /bad               Rate the last reply");
    println!("  /regenerate, /retry       Ask for a new reply");
    println!("\n{}", "Display".bold());
    println!("  /theme [light|dark|toggle] Show or change the theme");
    println!("  /status                   Show the current session");
    println!("  /help                     Show this help");
    println!("  exit, quit                Leave the chat\n");
}
