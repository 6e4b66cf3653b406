use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Which portal a user signs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Role {
    #[serde(rename = "abogado")]
    Lawyer,
    #[serde(rename = "cliente")]
    Client,
}

impl Role {
    /// Storage tag, as written to the session snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lawyer => "abogado",
            Role::Client => "cliente",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Lawyer => "Lawyer",
            Role::Client => "Client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abogado" | "lawyer" => Ok(Role::Lawyer),
            "cliente" | "client" => Ok(Role::Client),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Role-specific profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum RoleDetails {
    Lawyer { title: String, specialty: String },
    Client { cases: Vec<String> },
}

/// The public part of a user record. This is what gets stored in the
/// session snapshot; it never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: u32,
    pub email: String,
    pub display_name: String,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl Profile {
    /// First word of the display name, used for the "Hola, Juan" greeting.
    pub fn first_name(&self) -> &str {
        self.display_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.display_name)
    }

    /// Open cases for a client; always empty for lawyers.
    pub fn cases(&self) -> &[String] {
        match &self.details {
            RoleDetails::Client { cases } => cases,
            RoleDetails::Lawyer { .. } => &[],
        }
    }
}

/// A credential record. The password is plaintext and lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub profile: Profile,
    pub password: String,
}

impl User {
    fn lawyer(
        id: u32,
        email: &str,
        password: &str,
        name: &str,
        title: &str,
        specialty: &str,
    ) -> Self {
        Self {
            profile: Profile {
                id,
                email: email.to_string(),
                display_name: name.to_string(),
                details: RoleDetails::Lawyer {
                    title: title.to_string(),
                    specialty: specialty.to_string(),
                },
            },
            password: password.to_string(),
        }
    }

    fn client(id: u32, email: &str, password: &str, name: &str, cases: &[&str]) -> Self {
        Self {
            profile: Profile {
                id,
                email: email.to_string(),
                display_name: name.to_string(),
                details: RoleDetails::Client {
                    cases: cases.iter().map(|c| c.to_string()).collect(),
                },
            },
            password: password.to_string(),
        }
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    fn matches(&self, email: &str, password: &str) -> bool {
        self.profile.email.to_lowercase() == email.to_lowercase() && self.password == password
    }
}

/// Input for a client self-registration.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Check an email address against the site's loose `a@b.c` pattern.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check a registration password; only length is enforced.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// In-memory credential table, one list per role.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    lawyers: Vec<User>,
    clients: Vec<User>,
}

impl UserDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo accounts the site ships with.
    pub fn seeded() -> Self {
        Self {
            lawyers: vec![
                User::lawyer(
                    1,
                    "juan.perez@ayniabogados.cl",
                    "abogado123",
                    "Juan Pérez",
                    "Socio Principal",
                    "Derecho Corporativo",
                ),
                User::lawyer(
                    2,
                    "maria.gonzalez@ayniabogados.cl",
                    "abogado123",
                    "María González",
                    "Socia",
                    "Derecho Laboral",
                ),
            ],
            clients: vec![
                User::client(
                    1,
                    "cliente@example.com",
                    "cliente123",
                    "Carlos Rodríguez",
                    &["Caso #2024-001", "Caso #2024-045"],
                ),
                User::client(
                    2,
                    "ana.silva@example.com",
                    "cliente123",
                    "Ana Silva",
                    &["Caso #2024-023"],
                ),
            ],
        }
    }

    /// All records for a role, in declaration order.
    pub fn users(&self, role: Role) -> &[User] {
        match role {
            Role::Lawyer => &self.lawyers,
            Role::Client => &self.clients,
        }
    }

    /// Find the first record for `role` whose email matches case-insensitively
    /// and whose password matches exactly.
    pub fn authenticate(&self, email: &str, password: &str, role: Role) -> Option<&User> {
        let found = self.users(role).iter().find(|u| u.matches(email, password));
        debug!(role = role.as_str(), found = found.is_some(), "Credential lookup");
        found
    }

    /// Append a new client record. Lives until the directory is dropped.
    pub fn register_client(&mut self, new: NewClient) -> Result<&User, AuthError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        if !validate_email(&new.email) {
            return Err(AuthError::InvalidEmail(new.email));
        }
        validate_password(&new.password)?;

        let email_lower = new.email.to_lowercase();
        if self
            .clients
            .iter()
            .any(|u| u.profile.email.to_lowercase() == email_lower)
        {
            return Err(AuthError::EmailTaken(new.email));
        }

        let id = self.clients.len() as u32 + 1;
        self.clients.push(User::client(id, &new.email, &new.password, name, &[]));
        debug!(id, "Client registered");

        let index = self.clients.len() - 1;
        Ok(&self.clients[index])
    }
}
