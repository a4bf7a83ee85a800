pub mod commands;
pub mod store;

pub use store::{CredentialPolicy, LoginError, SessionStore, SESSION_STORAGE_KEY};
