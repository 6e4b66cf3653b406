//! Core library for the Ayni Abogados portal.
//!
//! This crate holds everything the portal does that is not presentation:
//!
//! - `auth`: mock credential lookup, client registration and the session snapshot
//! - `storage`: the local key-value store the snapshot lives in
//! - `rut`: Chilean RUT check-digit validation
//! - `contact`: contact form validation and `mailto:`/WhatsApp deep links
//! - `config`: user configuration loaded from the config directory

pub mod auth;
pub mod config;
pub mod contact;
pub mod error;
pub mod rut;
pub mod storage;

pub use auth::{
    Authenticator, NewClient, Profile, Role, RoleDetails, SessionData, User, UserDirectory,
};
pub use config::Config;
pub use contact::{ContactForm, ContactSubmission};
pub use error::{AuthError, ContactError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
