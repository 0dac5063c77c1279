//! Dashboard helpers around the backend API: client records and
//! persisted preferences.

pub mod clients;
pub mod preferences;

pub use clients::{ClientRecord, filter_clients, normalize_client, normalize_clients};
pub use preferences::{AuthSession, Preferences, Theme};
