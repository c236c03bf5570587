//! Session store
//!
//! Holds the list of saved sessions plus the single current session, and
//! mirrors the saved list to [`LocalStorage`] as a JSON array under
//! [`SESSIONS_KEY`]. Saved sessions are ordered most-recently-created first.
//!
//! The current session lives only in memory until it has at least one
//! message; from then on [`SessionStore::upsert_current`] writes it through.

use crate::error::{Result, ScribeError};
use crate::storage::{LocalStorage, SESSIONS_KEY};

pub mod types;
use types::observe_id;
pub use types::{
    derive_session_name, Feedback, Message, Role, Session, DEFAULT_SESSION_NAME,
    SESSION_NAME_MAX_CHARS,
};

/// In-memory session list mirrored to local storage
pub struct SessionStore {
    storage: Box<dyn LocalStorage>,
    sessions: Vec<Session>,
    current: Session,
}

impl SessionStore {
    /// Open a store over `storage` and load the saved sessions
    ///
    /// The current session starts out empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe::session::{Message, SessionStore};
    /// use scribe::storage::MemoryStorage;
    ///
    /// let mut store = SessionStore::open(Box::new(MemoryStorage::new())).unwrap();
    /// assert!(store.sessions().is_empty());
    ///
    /// store.push_message(Message::user("Hello"));
    /// store.upsert_current().unwrap();
    /// assert_eq!(store.sessions().len(), 1);
    /// assert_eq!(store.sessions()[0].name, "Hello");
    /// ```
    pub fn open(storage: Box<dyn LocalStorage>) -> Result<Self> {
        let mut store = Self {
            storage,
            sessions: Vec::new(),
            current: Session::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Re-read the saved sessions from storage
    ///
    /// A missing key yields an empty list. So does a value that does not
    /// parse as a session list; that case is logged and the bad value is left
    /// in place until the next write replaces it. The current session is kept.
    pub fn load(&mut self) -> Result<()> {
        self.sessions = self.saved_sessions()?;
        tracing::debug!("Loaded {} saved sessions", self.sessions.len());
        Ok(())
    }

    /// Saved sessions, most recently created first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The session being displayed and edited
    pub fn current(&self) -> &Session {
        &self.current
    }

    /// Backing storage, shared with other persisted preferences
    pub fn storage(&self) -> &dyn LocalStorage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn LocalStorage {
        self.storage.as_mut()
    }

    /// Look up a saved session by identifier
    pub fn find(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Append a message to the current session without persisting
    pub fn push_message(&mut self, message: Message) {
        self.current.messages.push(message);
    }

    /// Save the current session if it has any messages
    ///
    /// Names the session after its first user message while it still has the
    /// default name, then replaces the saved entry with the same id or puts
    /// the session at the front of the list.
    pub fn upsert_current(&mut self) -> Result<()> {
        if self.current.is_empty() {
            return Ok(());
        }

        if self.current.name == DEFAULT_SESSION_NAME {
            if let Some(first) = self.current.first_user_message() {
                self.current.name = derive_session_name(&first.content);
            }
        }

        let mut sessions = self.saved_sessions()?;
        match sessions.iter().position(|s| s.id == self.current.id) {
            Some(idx) => sessions[idx] = self.current.clone(),
            None => sessions.insert(0, self.current.clone()),
        }

        self.commit(sessions)
    }

    /// Delete a saved session
    ///
    /// Returns whether a session was removed. Deleting the current session
    /// also replaces it with a fresh empty one.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut sessions = self.saved_sessions()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        let removed = sessions.len() != before;
        self.commit(sessions)?;

        if self.current.id == id {
            self.current = Session::new();
        }

        if removed {
            tracing::info!("Deleted session {}", id);
        }
        Ok(removed)
    }

    /// Rename a saved session
    ///
    /// The name is trimmed; blank names and unknown ids are ignored. Returns
    /// whether the rename happened.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let mut sessions = self.saved_sessions()?;
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            self.sessions = sessions;
            return Ok(false);
        };
        session.name = name.to_string();
        self.commit(sessions)?;

        if self.current.id == id {
            self.current.name = name.to_string();
        }
        Ok(true)
    }

    /// Save the current session and start a fresh one
    pub fn new_chat(&mut self) -> Result<()> {
        self.upsert_current()?;
        self.current = Session::new();
        Ok(())
    }

    /// Make a saved session current
    ///
    /// The previous current session is saved first. The loaded session is an
    /// independent copy; changes reach the saved list on the next upsert.
    pub fn switch_to(&mut self, id: &str) -> Result<()> {
        if self.current.id == id {
            return Ok(());
        }

        self.load()?;
        let target = self
            .find(id)
            .cloned()
            .ok_or_else(|| ScribeError::SessionNotFound(id.to_string()))?;

        self.upsert_current()?;
        self.current = target;
        Ok(())
    }

    /// Tag a message in the current session and save it
    ///
    /// Returns `false` when no message has `message_id`.
    pub fn set_feedback(&mut self, message_id: &str, feedback: Option<Feedback>) -> Result<bool> {
        let Some(message) = self
            .current
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
        else {
            return Ok(false);
        };

        message.feedback = feedback;
        self.upsert_current()?;
        Ok(true)
    }

    /// Saved list as it currently is in storage
    ///
    /// Other processes may have written since this store last looked, so every
    /// mutation starts from here rather than from `self.sessions`.
    fn saved_sessions(&self) -> Result<Vec<Session>> {
        let sessions = match self.storage.get_item(SESSIONS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Session>>(&raw) {
                Ok(sessions) => sessions,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable saved sessions: {}", e);
                    Vec::new()
                }
            },
        };

        for session in &sessions {
            observe_id(&session.id);
            for message in &session.messages {
                observe_id(&message.id);
            }
        }

        Ok(sessions)
    }

    /// Write `sessions` to storage, then adopt it as the in-memory list
    fn commit(&mut self, sessions: Vec<Session>) -> Result<()> {
        let raw = serde_json::to_string(&sessions).map_err(ScribeError::Serialization)?;
        self.storage.set_item(SESSIONS_KEY, &raw)?;
        self.sessions = sessions;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    /// Storage whose writes always fail
    struct ReadOnlyStorage(MemoryStorage);

    impl LocalStorage for ReadOnlyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(ScribeError::Storage("read-only".to_string()).into())
        }

        fn remove_item(&mut self, _key: &str) -> Result<()> {
            Err(ScribeError::Storage("read-only".to_string()).into())
        }
    }

    fn saved(id: &str, name: &str) -> Session {
        Session {
            id: id.to_string(),
            name: name.to_string(),
            messages: vec![Message::user(name)],
        }
    }

    fn storage_with(sessions: &[Session]) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(SESSIONS_KEY, &serde_json::to_string(sessions).unwrap())
            .unwrap();
        storage
    }

    fn empty_store() -> SessionStore {
        SessionStore::open(Box::new(MemoryStorage::new())).expect("open store")
    }

    fn persisted(store: &SessionStore) -> Vec<Session> {
        match store.storage.get_item(SESSIONS_KEY).unwrap() {
            Some(raw) => serde_json::from_str(&raw).unwrap(),
            None => Vec::new(),
        }
    }

    #[test]
    fn test_open_empty_storage() {
        let store = empty_store();
        assert!(store.sessions().is_empty());
        assert!(store.current().is_empty());
        assert_eq!(store.current().name, DEFAULT_SESSION_NAME);
    }

    #[test]
    fn test_load_corrupt_value_yields_empty_list() {
        let mut storage = MemoryStorage::new();
        storage.set_item(SESSIONS_KEY, "{not a list").unwrap();
        let store = SessionStore::open(Box::new(storage)).expect("corrupt value must not fail");
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_yields_empty_list() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(SESSIONS_KEY, r#"[{"id": 5, "messages": "nope"}]"#)
            .unwrap();
        let store = SessionStore::open(Box::new(storage)).unwrap();
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_upsert_empty_session_is_noop() {
        let mut store = empty_store();
        store.upsert_current().unwrap();
        assert!(store.sessions().is_empty());
        assert!(store.storage.get_item(SESSIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_upsert_twice_replaces_not_duplicates() {
        let mut store = empty_store();
        store.push_message(Message::user("first"));
        store.upsert_current().unwrap();
        store.push_message(Message::bot("reply"));
        store.upsert_current().unwrap();

        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.sessions()[0].messages.len(), 2);
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_upsert_prepends_new_sessions() {
        let mut store = empty_store();
        store.push_message(Message::user("older"));
        store.new_chat().unwrap();
        store.push_message(Message::user("newer"));
        store.upsert_current().unwrap();

        let names: Vec<&str> = store.sessions().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[test]
    fn test_upsert_derives_name_from_first_user_message() {
        let mut store = empty_store();
        store.push_message(Message::bot("greeting"));
        store.push_message(Message::user(
            "Please write a long article about sustainable urban gardening",
        ));
        store.upsert_current().unwrap();

        assert_eq!(
            store.current().name,
            "Please write a long article about sustai..."
        );
        assert_eq!(store.sessions()[0].name, store.current().name);
    }

    #[test]
    fn test_upsert_keeps_custom_name() {
        let mut store = empty_store();
        store.push_message(Message::user("topic"));
        store.upsert_current().unwrap();
        let id = store.current().id.clone();
        store.rename(&id, "My Drafts").unwrap();

        store.push_message(Message::user("another"));
        store.upsert_current().unwrap();
        assert_eq!(store.sessions()[0].name, "My Drafts");
    }

    #[test]
    fn test_upsert_bot_only_session_keeps_default_name() {
        let mut store = empty_store();
        store.push_message(Message::bot("only bot"));
        store.upsert_current().unwrap();
        assert_eq!(store.sessions()[0].name, DEFAULT_SESSION_NAME);
    }

    #[test]
    fn test_delete_current_session_resets_current() {
        let mut store = empty_store();
        store.push_message(Message::user("doomed"));
        store.upsert_current().unwrap();
        let id = store.current().id.clone();

        assert!(store.delete(&id).unwrap());
        assert!(store.sessions().is_empty());
        assert!(persisted(&store).is_empty());
        assert_ne!(store.current().id, id);
        assert!(store.current().is_empty());
    }

    #[test]
    fn test_delete_unsaved_current_session_still_resets_current() {
        let mut store = empty_store();
        store.push_message(Message::user("never saved"));
        let id = store.current().id.clone();

        assert!(!store.delete(&id).unwrap());
        assert!(store.current().is_empty());
        assert_ne!(store.current().id, id);
    }

    #[test]
    fn test_delete_other_session_keeps_current() {
        let mut store = empty_store();
        store.push_message(Message::user("first"));
        store.new_chat().unwrap();
        let first_id = store.sessions()[0].id.clone();
        store.push_message(Message::user("second"));
        let current_id = store.current().id.clone();

        assert!(store.delete(&first_id).unwrap());
        assert_eq!(store.current().id, current_id);
        assert_eq!(store.current().messages.len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_returns_false() {
        let mut store = empty_store();
        assert!(!store.delete("session_missing").unwrap());
    }

    #[test]
    fn test_rename_blank_name_is_noop() {
        let mut store = empty_store();
        store.push_message(Message::user("topic"));
        store.upsert_current().unwrap();
        let id = store.current().id.clone();

        assert!(!store.rename(&id, "").unwrap());
        assert!(!store.rename(&id, "   \t ").unwrap());
        assert_eq!(store.sessions()[0].name, "topic");
        assert_eq!(persisted(&store)[0].name, "topic");
    }

    #[test]
    fn test_rename_trims_and_updates_current() {
        let mut store = empty_store();
        store.push_message(Message::user("topic"));
        store.upsert_current().unwrap();
        let id = store.current().id.clone();

        assert!(store.rename(&id, "  Renamed  ").unwrap());
        assert_eq!(store.sessions()[0].name, "Renamed");
        assert_eq!(store.current().name, "Renamed");
        assert_eq!(persisted(&store)[0].name, "Renamed");
    }

    #[test]
    fn test_rename_unknown_id_is_noop() {
        let mut store = empty_store();
        assert!(!store.rename("session_missing", "Name").unwrap());
    }

    #[test]
    fn test_new_chat_saves_previous_and_starts_empty() {
        let mut store = empty_store();
        store.push_message(Message::user("keep me"));
        let old_id = store.current().id.clone();
        store.new_chat().unwrap();

        assert_ne!(store.current().id, old_id);
        assert!(store.current().is_empty());
        assert!(store.find(&old_id).is_some());
    }

    #[test]
    fn test_new_chat_from_empty_session_saves_nothing() {
        let mut store = empty_store();
        store.new_chat().unwrap();
        store.new_chat().unwrap();
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_switch_to_saves_previous_and_loads_copy() {
        let mut store = empty_store();
        store.push_message(Message::user("first chat"));
        store.new_chat().unwrap();
        let first_id = store.sessions()[0].id.clone();

        store.push_message(Message::user("second chat"));
        let second_id = store.current().id.clone();

        store.switch_to(&first_id).unwrap();
        assert_eq!(store.current().id, first_id);
        assert!(store.find(&second_id).is_some());

        // Edits to the loaded copy stay local until the next upsert
        store.push_message(Message::bot("reply"));
        assert_eq!(store.find(&first_id).unwrap().messages.len(), 1);
        store.upsert_current().unwrap();
        assert_eq!(store.find(&first_id).unwrap().messages.len(), 2);
    }

    #[test]
    fn test_switch_to_unknown_id_errors_and_keeps_current() {
        let mut store = empty_store();
        store.push_message(Message::user("stay"));
        let id = store.current().id.clone();

        let err = store.switch_to("session_missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScribeError>(),
            Some(ScribeError::SessionNotFound(_))
        ));
        assert_eq!(store.current().id, id);
    }

    #[test]
    fn test_switch_to_current_is_noop() {
        let mut store = empty_store();
        let id = store.current().id.clone();
        store.switch_to(&id).unwrap();
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_set_feedback_persists() {
        let mut store = empty_store();
        store.push_message(Message::user("q"));
        let bot = Message::bot("a");
        let bot_id = bot.id.clone();
        store.push_message(bot);

        assert!(store.set_feedback(&bot_id, Some(Feedback::Good)).unwrap());
        let saved = persisted(&store);
        assert_eq!(saved[0].messages[1].feedback, Some(Feedback::Good));

        assert!(store.set_feedback(&bot_id, Some(Feedback::Bad)).unwrap());
        assert_eq!(
            persisted(&store)[0].messages[1].feedback,
            Some(Feedback::Bad)
        );
    }

    #[test]
    fn test_set_feedback_unknown_message_is_noop() {
        let mut store = empty_store();
        store.push_message(Message::user("q"));
        assert!(!store.set_feedback("msg_missing", Some(Feedback::Good)).unwrap());
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn test_sessions_survive_reopen() {
        let mut storage = MemoryStorage::new();
        {
            let session = Session {
                id: "session_1".to_string(),
                name: "Saved".to_string(),
                messages: vec![Message::user("hi")],
            };
            storage
                .set_item(SESSIONS_KEY, &serde_json::to_string(&vec![session]).unwrap())
                .unwrap();
        }

        let store = SessionStore::open(Box::new(storage)).unwrap();
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.find("session_1").unwrap().name, "Saved");
        assert_ne!(store.current().id, "session_1");
    }

    #[test]
    fn test_new_sessions_never_reuse_saved_ids_ahead_of_clock() {
        let now = Utc::now().timestamp_millis();
        let storage = storage_with(&[
            saved(&format!("session_{}", now + 31), "keep b"),
            saved(&format!("session_{}", now + 30), "keep a"),
        ]);
        let mut store = SessionStore::open(Box::new(storage)).unwrap();

        for i in 0..200 {
            store.push_message(Message::user(format!("new {}", i)));
            store.new_chat().unwrap();
        }

        assert_eq!(store.sessions().len(), 202);
        assert_eq!(
            store.find(&format!("session_{}", now + 31)).unwrap().name,
            "keep b"
        );
        assert_eq!(
            store.find(&format!("session_{}", now + 30)).unwrap().name,
            "keep a"
        );
    }

    #[test]
    fn test_failed_write_leaves_memory_matching_storage() {
        let storage = ReadOnlyStorage(storage_with(&[saved("session_1", "Original")]));
        let mut store = SessionStore::open(Box::new(storage)).unwrap();

        assert!(store.delete("session_1").is_err());
        assert!(store.find("session_1").is_some());

        assert!(store.rename("session_1", "Renamed").is_err());
        assert_eq!(store.find("session_1").unwrap().name, "Original");

        store.push_message(Message::user("unsaved"));
        assert!(store.upsert_current().is_err());
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn test_mutations_start_from_what_storage_holds() {
        let mut store = SessionStore::open(Box::new(storage_with(&[
            saved("session_2", "Two"),
            saved("session_1", "One"),
        ])))
        .unwrap();

        // Another writer removes session_1 behind this store's back
        store
            .storage_mut()
            .set_item(
                SESSIONS_KEY,
                &serde_json::to_string(&[saved("session_2", "Two")]).unwrap(),
            )
            .unwrap();

        store.push_message(Message::user("fresh"));
        store.upsert_current().unwrap();

        let ids: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![store.current().id.as_str(), "session_2"]);
        assert_eq!(persisted(&store).len(), 2);
    }
}
