use thiserror::Error;

/// Errors surfaced by the authentication component.
///
/// A wrong email and a wrong password both map to `InvalidCredentials`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    EmailTaken(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("Name is required")]
    MissingName,
}

/// Contact form validation failures, in the order the form checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please enter a valid name (at least {0} characters)")]
    NameTooShort(usize),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please select a practice area")]
    MissingSubject,

    #[error("Please enter a more detailed message (at least {0} characters)")]
    MessageTooShort(usize),
}
