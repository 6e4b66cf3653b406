//! Authentication module for the portal's lawyer and client areas.
//!
//! This module provides:
//! - `UserDirectory`: the in-memory credential table, split by role
//! - `Session`: the persisted session snapshot with a 24-hour lifetime
//! - `Authenticator`: owns both and drives login, restore and logout
//!
//! Credentials are demo data compiled into the binary; nothing but the
//! session snapshot is ever written to storage.

pub mod authenticator;
pub mod session;
pub mod users;

pub use authenticator::Authenticator;
pub use session::{RestoreOutcome, Session, SessionData, SESSION_KEY};
pub use users::{
    validate_email, validate_password, NewClient, Profile, Role, RoleDetails, User,
    UserDirectory, MIN_PASSWORD_LENGTH,
};
