use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::session::{RestoreOutcome, Session, SessionData};
use super::users::{NewClient, Profile, Role, User, UserDirectory};
use crate::error::AuthError;
use crate::storage::KeyValueStore;

/// Owns the credential table and the session, and tracks who is signed in.
pub struct Authenticator {
    directory: UserDirectory,
    session: Session,
    current_user: Option<Profile>,
    user_type: Option<Role>,
}

impl Authenticator {
    pub fn new(directory: UserDirectory, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            directory,
            session: Session::new(store),
            current_user: None,
            user_type: None,
        }
    }

    /// Authenticator over the demo accounts.
    pub fn seeded(store: Box<dyn KeyValueStore>) -> Self {
        Self::new(UserDirectory::seeded(), store)
    }

    /// Look up the credentials and, on a match, sign the user in and store a
    /// session snapshot stamped with `now`.
    pub fn authenticate_at(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Option<Profile> {
        let profile = self
            .directory
            .authenticate(email, password, role)
            .map(|u| u.profile.clone());

        let Some(profile) = profile else {
            info!(role = role.as_str(), "Login rejected");
            return None;
        };

        self.current_user = Some(profile.clone());
        self.user_type = Some(role);

        self.session.update(SessionData::new(profile.clone(), role, now));
        if let Err(e) = self.session.save() {
            warn!(error = %e, "Failed to save session");
        }

        info!(user_id = profile.id, role = role.as_str(), "Login successful");
        Some(profile)
    }

    pub fn authenticate(&mut self, email: &str, password: &str, role: Role) -> Option<Profile> {
        self.authenticate_at(email, password, role, Utc::now())
    }

    /// `authenticate` for callers that want a `Result`.
    pub fn login(&mut self, email: &str, password: &str, role: Role) -> Result<Profile, AuthError> {
        self.authenticate(email, password, role)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Adopt a stored snapshot if one exists and is younger than 24 hours.
    ///
    /// Expired snapshots are removed and the authenticator is signed out.
    pub fn restore_session_at(&mut self, now: DateTime<Utc>) -> bool {
        match self.session.load_at(now) {
            RestoreOutcome::Restored => {
                if let Some(ref data) = self.session.data {
                    self.current_user = Some(data.user.clone());
                    self.user_type = Some(data.user_type);
                    info!(
                        user_id = data.user.id,
                        role = data.user_type.as_str(),
                        "Session restored"
                    );
                }
                true
            }
            RestoreOutcome::Expired => {
                self.logout();
                false
            }
            RestoreOutcome::Missing | RestoreOutcome::Unreadable => false,
        }
    }

    pub fn restore_session(&mut self) -> bool {
        self.restore_session_at(Utc::now())
    }

    /// Sign out and drop the stored snapshot.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.user_type = None;
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        info!("Logged out");
    }

    /// Register a new client account. The account is not signed in.
    pub fn register_client(&mut self, new: NewClient) -> Result<&User, AuthError> {
        self.directory.register_client(new)
    }

    pub fn current_user(&self) -> Option<&Profile> {
        self.current_user.as_ref()
    }

    pub fn user_type(&self) -> Option<Role> {
        self.user_type
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// The snapshot backing the current sign-in, if any.
    pub fn session_data(&self) -> Option<&SessionData> {
        self.session.data.as_ref()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Whether storage currently holds a snapshot.
    pub fn has_stored_session(&self) -> bool {
        self.session.has_snapshot()
    }
}
