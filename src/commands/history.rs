use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::session::{Session, SessionStore};
use crate::storage::FileStorage;
use crate::theme::load_theme;
use colored::Colorize;
use prettytable::{format, Table};
use std::io::{BufRead, Write};

/// Handle history commands
pub fn handle_history(command: HistoryCommand, config: &Config) -> Result<()> {
    let storage = FileStorage::from_config(&config.storage)?;
    let mut store = SessionStore::open(Box::new(storage))?;

    match command {
        HistoryCommand::List => {
            print_sessions_table(store.sessions(), None);
            if !store.sessions().is_empty() {
                println!(
                    "Use {} to resume a session.\n",
                    "scribe chat --resume <ID>".cyan()
                );
            }
        }
        HistoryCommand::Show { id } => {
            let theme = load_theme(store.storage(), config.default_theme())?;
            let session = store
                .find(&id)
                .ok_or_else(|| ScribeError::SessionNotFound(id.clone()))?;

            println!("\n{}\n", session.name.bold());
            for message in &session.messages {
                super::print_message(message, theme);
            }
        }
        HistoryCommand::Rename { id, name } => {
            let name = name.join(" ");
            if store.find(&id).is_none() {
                return Err(ScribeError::SessionNotFound(id).into());
            }
            if store.rename(&id, &name)? {
                println!("{}", format!("Renamed {} to \"{}\"", id, name.trim()).green());
            } else {
                println!("{}", "Name cannot be blank; nothing changed.".yellow());
            }
        }
        HistoryCommand::Delete { id, yes } => {
            if store.find(&id).is_none() {
                return Err(ScribeError::SessionNotFound(id).into());
            }
            if !yes && !confirm_stdin("Are you sure you want to permanently delete this chat?")? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}

/// Print saved sessions as a table, marking `current_id` if given
pub fn print_sessions_table(sessions: &[Session], current_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No saved chats yet.".yellow());
        return;
    }

    println!("\nSaved Chats:");
    sessions_table(sessions, current_id).printstd();
    println!();
}

fn sessions_table(sessions: &[Session], current_id: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Name".bold(),
        "Messages".bold()
    ]);

    for session in sessions {
        let marker = if current_id == Some(session.id.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(prettytable::row![
            marker,
            session.id.cyan(),
            session.name,
            session.messages.len()
        ]);
    }

    table
}

fn confirm_stdin(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Whether a confirmation answer means yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
