//! Scribe - conversational content generation client library
//!
//! This library provides the pieces behind the `scribe` chat client: a
//! session store mirrored to local key/value storage, a client for the
//! remote generation endpoint, and the controller that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Local key/value storage (file-backed and in-memory)
//! - `session`: Sessions, messages and the session store
//! - `client`: Generation endpoint abstraction and HTTP implementation
//! - `controller`: Submit/regenerate flow with optimistic updates
//! - `theme`: Persisted light/dark preference
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use scribe::client::HttpGenerator;
//! use scribe::controller::ChatController;
//! use scribe::session::SessionStore;
//! use scribe::storage::FileStorage;
//! use scribe::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let store = SessionStore::open(Box::new(FileStorage::from_config(&config.storage)?))?;
//!     let generator = HttpGenerator::new(config.api.clone())?;
//!     let mut chat = ChatController::new(store, Box::new(generator));
//!
//!     if let Some(reply) = chat.submit("Write a short post about tide pools").await? {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod storage;
pub mod theme;

// Re-export commonly used types
pub use client::{Generator, HttpGenerator};
pub use config::Config;
pub use controller::ChatController;
pub use error::{Result, ScribeError};
pub use session::{Feedback, Message, Role, Session, SessionStore};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use theme::Theme;
