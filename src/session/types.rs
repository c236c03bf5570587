use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Display name given to sessions before their first user message
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// Maximum number of characters kept when naming a session after a message
pub const SESSION_NAME_MAX_CHARS: usize = 40;

static LAST_ID_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Next time-derived identifier value
///
/// Normally the current Unix time in milliseconds. When called more than
/// once within the same millisecond the value is bumped past the previous
/// one, so identifiers stay unique within the process.
fn next_id_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ID_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Move the identifier clock past an existing `<prefix>_<millis>` id
///
/// Ids loaded from storage may be ahead of the local clock; new ids must
/// never collide with them. Ids without a numeric suffix are ignored.
pub(crate) fn observe_id(id: &str) {
    if let Some(millis) = id
        .rsplit_once('_')
        .and_then(|(_, suffix)| suffix.parse::<i64>().ok())
    {
        LAST_ID_MILLIS.fetch_max(millis, Ordering::Relaxed);
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// Feedback tag a user can put on a bot message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Good,
    Bad,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Time-derived identifier (`msg_<millis>`)
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Absent until the user tags the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe::session::{Message, Role};
    ///
    /// let msg = Message::user("Write a post about Rust");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.id.starts_with("msg_"));
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg_{}", next_id_millis()),
            role,
            content: content.into(),
            feedback: None,
        }
    }
}

/// A saved conversation with its own message history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Time-derived identifier (`session_<millis>`)
    pub id: String,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// Creates an empty session named [`DEFAULT_SESSION_NAME`]
    pub fn new() -> Self {
        Self {
            id: format!("session_{}", next_id_millis()),
            name: DEFAULT_SESSION_NAME.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// First message authored by the user, if any
    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == Role::User)
    }

    /// Most recent bot message, if any
    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Bot)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a session name from message content
///
/// Keeps the first 40 characters and appends `...` when the content is longer.
///
/// # Examples
///
/// ```
/// use scribe::session::derive_session_name;
///
/// assert_eq!(derive_session_name("Short prompt"), "Short prompt");
/// let long = "a".repeat(41);
/// assert_eq!(derive_session_name(&long), format!("{}...", "a".repeat(40)));
/// ```
pub fn derive_session_name(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(SESSION_NAME_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
