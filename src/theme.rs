//! Theme preference
//!
//! The colour theme is persisted as `"light"` or `"dark"` under its own
//! storage key, separate from the session list. In the terminal it selects
//! the palette used for role labels.

use crate::error::{Result, ScribeError};
use crate::session::Role;
use crate::storage::{LocalStorage, THEME_KEY};
use colored::{ColoredString, Colorize};
use std::fmt;

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    /// Parse a theme name
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe::theme::Theme;
    ///
    /// assert_eq!(Theme::parse_str("Dark").unwrap(), Theme::Dark);
    /// assert!(Theme::parse_str("sepia").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, ScribeError> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ScribeError::InvalidTheme(other.to_string())),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Label printed before a message from `role`
    pub fn role_label(&self, role: Role) -> ColoredString {
        match (self, role) {
            (Self::Light, Role::User) => "You".blue().bold(),
            (Self::Light, Role::Bot) => "Scribe".magenta().bold(),
            (Self::Dark, Role::User) => "You".bright_cyan().bold(),
            (Self::Dark, Role::Bot) => "Scribe".bright_yellow().bold(),
        }
    }
}

/// Read the stored theme, falling back to `default` when unset or unrecognised
pub fn load_theme(storage: &dyn LocalStorage, default: Theme) -> Result<Theme> {
    let theme = match storage.get_item(THEME_KEY)? {
        Some(raw) => Theme::parse_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored theme: {}", e);
            default
        }),
        None => default,
    };
    Ok(theme)
}

/// Persist the theme preference
pub fn save_theme(storage: &mut dyn LocalStorage, theme: Theme) -> Result<()> {
    storage.set_item(THEME_KEY, &theme.to_string())
}
