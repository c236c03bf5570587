/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`   : Interactive chat
- `history`: List, show, rename and delete saved sessions
- `theme`  : Show or change the colour theme
*/

use crate::session::{Message, Role};
use crate::theme::Theme;
use colored::Colorize;

// Special commands parser for the interactive loop
pub mod special_commands;

// Saved session management
pub mod history;

// Theme preference
pub mod theme;

/// Print one message with a themed role label
pub fn print_message(message: &Message, theme: Theme) {
    let label = theme.role_label(message.role);
    match (message.role, message.feedback) {
        (Role::Bot, Some(feedback)) => {
            println!("{} {}", label, format!("[{}]", feedback).dimmed())
        }
        _ => println!("{}", label),
    }
    println!("{}\n", message.content);
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Opens local storage, builds the generation client and runs a
    //! readline loop. Lines starting with `/` are special commands; every
    //! other line is sent as a prompt.

    use super::history::{is_yes, print_sessions_table};
    use super::special_commands::{parse_special_command, print_help, SpecialCommand, ThemeAction};
    use super::*;
    use crate::client::HttpGenerator;
    use crate::config::Config;
    use crate::controller::ChatController;
    use crate::error::Result;
    use crate::session::SessionStore;
    use crate::storage::FileStorage;
    use crate::theme::{load_theme, save_theme};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `resume` - Optional saved session ID to continue
    pub async fn run_chat(config: Config, resume: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let storage = FileStorage::from_config(&config.storage)?;
        let store = SessionStore::open(Box::new(storage))?;
        let generator = HttpGenerator::new(config.api.clone())?;
        let mut chat = ChatController::new(store, Box::new(generator));

        let mut theme = load_theme(chat.store().storage(), config.default_theme())?;

        if let Some(id) = &resume {
            chat.store_mut().switch_to(id)?;
            tracing::info!("Resumed session {}", id);
        }

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config, chat.store().sessions().len());
        if resume.is_some() {
            print_transcript(&chat, theme);
        }

        loop {
            match rl.readline(&format!("{} ", "›".bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    // Storage failures end the command, not the chat
                    let outcome = match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::Help => {
                            print_help();
                            Ok(())
                        }
                        SpecialCommand::None => send_prompt(&mut chat, trimmed, theme).await,
                        SpecialCommand::Regenerate => regenerate(&mut chat, theme).await,
                        SpecialCommand::Theme(action) => {
                            apply_theme_action(&mut chat, &mut theme, action)
                        }
                        SpecialCommand::DeleteSession(id) => {
                            let question = format!("Permanently delete {}? [y/N] ", id);
                            match rl.readline(&question) {
                                Ok(answer) if is_yes(&answer) => delete_session(&mut chat, &id),
                                _ => {
                                    println!("Cancelled.\n");
                                    Ok(())
                                }
                            }
                        }
                        other => handle_session_command(&mut chat, other, theme),
                    };

                    if let Err(e) = outcome {
                        tracing::error!("Command failed: {:#}", e);
                        eprintln!("{}\n", format!("Error: {}", e).red());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        chat.store_mut().upsert_current()?;
        println!("Goodbye!");
        Ok(())
    }

    async fn send_prompt(chat: &mut ChatController, prompt: &str, theme: Theme) -> Result<()> {
        println!("{}", "Generating…".dimmed());
        if let Some(reply) = chat.submit(prompt).await? {
            print_message(&reply, theme);
        }
        Ok(())
    }

    async fn regenerate(chat: &mut ChatController, theme: Theme) -> Result<()> {
        println!("{}", "Regenerating…".dimmed());
        match chat.regenerate().await? {
            Some(reply) => print_message(&reply, theme),
            None => println!("{}\n", "Nothing to regenerate yet.".yellow()),
        }
        Ok(())
    }

    fn delete_session(chat: &mut ChatController, id: &str) -> Result<()> {
        if chat.store_mut().delete(id)? {
            println!("{}\n", format!("Deleted session {}", id).green());
        } else {
            println!("{}\n", format!("No saved session {}", id).yellow());
        }
        Ok(())
    }

    fn apply_theme_action(
        chat: &mut ChatController,
        theme: &mut Theme,
        action: ThemeAction,
    ) -> Result<()> {
        let next = match action {
            ThemeAction::Show => {
                println!("Theme: {}\n", theme);
                return Ok(());
            }
            ThemeAction::Set(t) => t,
            ThemeAction::Toggle => theme.toggled(),
        };
        save_theme(chat.store_mut().storage_mut(), next)?;
        *theme = next;
        println!("Theme: {}\n", theme);
        Ok(())
    }

    fn handle_session_command(
        chat: &mut ChatController,
        command: SpecialCommand,
        theme: Theme,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewChat => {
                chat.store_mut().new_chat()?;
                println!("{}\n", "Started a new chat.".green());
            }
            SpecialCommand::ListSessions => {
                chat.store_mut().load()?;
                let store = chat.store();
                print_sessions_table(store.sessions(), Some(store.current().id.as_str()));
            }
            SpecialCommand::LoadSession(id) => {
                chat.store_mut().switch_to(&id)?;
                print_transcript(chat, theme);
            }
            SpecialCommand::RenameSession { id, name } => {
                if chat.store_mut().rename(&id, &name)? {
                    println!("{}\n", format!("Renamed {} to \"{}\"", id, name).green());
                } else {
                    println!("{}\n", format!("No saved session {}", id).yellow());
                }
            }
            SpecialCommand::Rate(feedback) => {
                if chat.rate_last_reply(feedback)? {
                    println!("{}\n", format!("Marked last reply as {}.", feedback).green());
                } else {
                    println!("{}\n", "No reply to rate yet.".yellow());
                }
            }
            SpecialCommand::ShowStatus => print_status_display(chat),
            other => tracing::debug!("Unhandled session command: {:?}", other),
        }
        Ok(())
    }

    fn print_transcript(chat: &ChatController, theme: Theme) {
        let current = chat.store().current();
        println!("\n{} ({})\n", current.name.bold(), current.id.cyan());
        for message in &current.messages {
            print_message(message, theme);
        }
    }

    /// Display welcome banner at the start of interactive chat
    fn print_welcome_banner(config: &Config, saved: usize) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 Scribe Interactive Chat                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Endpoint: {}", config.api.endpoint.cyan());
        println!("Saved chats: {}\n", saved);
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status_display(chat: &ChatController) {
        let current = chat.store().current();
        println!("\nSession:  {} ({})", current.name.bold(), current.id.cyan());
        println!("Messages: {}", current.messages.len());
        println!(
            "Saved:    {}",
            if chat.store().find(&current.id).is_some() {
                "yes"
            } else {
                "no"
            }
        );
        println!("Saved chats: {}\n", chat.store().sessions().len());
    }
}
