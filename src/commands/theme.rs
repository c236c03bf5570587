use crate::cli::ThemeCommand;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{FileStorage, LocalStorage, THEME_KEY};
use crate::theme::{load_theme, save_theme, Theme};

/// Handle theme commands
pub fn handle_theme(command: ThemeCommand, config: &Config) -> Result<()> {
    let mut storage = FileStorage::from_config(&config.storage)?;
    let theme = apply_theme_command(&mut storage, command, config.default_theme())?;
    println!("Theme: {}", theme);
    Ok(())
}

/// Apply a theme command to `storage` and return the resulting theme
pub fn apply_theme_command(
    storage: &mut dyn LocalStorage,
    command: ThemeCommand,
    default: Theme,
) -> Result<Theme> {
    let current = load_theme(storage, default)?;
    let theme = match command {
        ThemeCommand::Show => return Ok(current),
        ThemeCommand::Set { theme } => Theme::parse_str(&theme)?,
        ThemeCommand::Toggle => current.toggled(),
        ThemeCommand::Reset => {
            storage.remove_item(THEME_KEY)?;
            tracing::info!("Theme preference cleared");
            return Ok(default);
        }
    };
    save_theme(storage, theme)?;
    tracing::info!("Theme set to {}", theme);
    Ok(theme)
}
