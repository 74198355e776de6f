//! Session management module
//!
//! Sessions live in a [`SessionService`] provider; the [`SessionStore`] maps
//! callers to their current session.

mod service;
mod sqlite;
mod store;
mod types;

pub use service::{InMemorySessionService, SessionService};
pub use sqlite::SqliteSessionService;
pub use store::{APP_NAME, SessionStore};
pub use types::Session;
