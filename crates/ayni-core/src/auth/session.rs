use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::users::{Profile, Role};
use crate::storage::KeyValueStore;

/// Storage key the snapshot is written under.
pub const SESSION_KEY: &str = "ayniSession";

/// Session lifetime in hours.
const SESSION_EXPIRY_HOURS: i64 = 24;

/// Serialized snapshot: `{ "user": .., "userType": .., "timestamp": <ms> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: Profile,
    pub user_type: Role,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "ts", ts(type = "number"))]
    pub timestamp: DateTime<Utc>,
}

impl SessionData {
    pub fn new(user: Profile, user_type: Role, timestamp: DateTime<Utc>) -> Self {
        Self {
            user,
            user_type,
            timestamp,
        }
    }

    pub fn lifetime() -> Duration {
        Duration::hours(SESSION_EXPIRY_HOURS)
    }

    /// A snapshot is valid while `now - timestamp` is strictly below 24h.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp >= Self::lifetime()
    }

    pub fn time_until_expiry_at(&self, now: DateTime<Utc>) -> Duration {
        (self.timestamp + Self::lifetime()) - now
    }
}

/// Why a stored snapshot could not be adopted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Missing,
    Expired,
    Unreadable,
}

/// The persisted session snapshot and the store it lives in.
pub struct Session {
    store: Box<dyn KeyValueStore>,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store, data: None }
    }

    /// Load the snapshot from storage, judging expiry against `now`.
    ///
    /// An expired snapshot is removed from storage. A snapshot that cannot be
    /// read or parsed is logged and treated as absent.
    pub fn load_at(&mut self, now: DateTime<Utc>) -> RestoreOutcome {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RestoreOutcome::Missing,
            Err(e) => {
                warn!(error = %e, "Failed to read session");
                return RestoreOutcome::Unreadable;
            }
        };

        let data: SessionData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Failed to parse session");
                return RestoreOutcome::Unreadable;
            }
        };

        if data.is_expired_at(now) {
            debug!(timestamp = %data.timestamp, "Session expired");
            if let Err(e) = self.clear() {
                warn!(error = %e, "Failed to clear expired session");
            }
            return RestoreOutcome::Expired;
        }

        self.data = Some(data);
        RestoreOutcome::Restored
    }

    /// Save the current snapshot to storage
    pub fn save(&mut self) -> Result<()> {
        if let Some(ref data) = self.data {
            let contents = serde_json::to_string(data).context("Failed to serialize session")?;
            self.store.set(SESSION_KEY, &contents)?;
        }
        Ok(())
    }

    /// Clear session data, in memory and in storage
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        self.store.remove(SESSION_KEY)
    }

    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Whether storage currently holds a snapshot, valid or not.
    pub fn has_snapshot(&self) -> bool {
        matches!(self.store.get(SESSION_KEY), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserDirectory;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn snapshot(timestamp: DateTime<Utc>) -> SessionData {
        let directory = UserDirectory::seeded();
        let user = directory.users(Role::Client)[0].profile.clone();
        SessionData::new(user, Role::Client, timestamp)
    }

    fn session_with(raw: &str) -> Session {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, raw).unwrap();
        Session::new(Box::new(store))
    }

    #[test]
    fn test_snapshot_json_shape() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let json = serde_json::to_value(snapshot(ts)).unwrap();
        assert_eq!(json["userType"], "cliente");
        assert_eq!(json["timestamp"], 1_700_000_000_123i64);
        assert_eq!(json["user"]["email"], "cliente@example.com");
        assert_eq!(json["user"]["cases"][1], "Caso #2024-045");
    }

    #[test]
    fn test_expiry_boundary() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let data = snapshot(ts);
        assert!(!data.is_expired_at(ts));
        assert!(!data.is_expired_at(ts + Duration::milliseconds(86_399_999)));
        assert!(data.is_expired_at(ts + Duration::milliseconds(86_400_000)));
        assert!(data.is_expired_at(ts + Duration::days(3)));
    }

    #[test]
    fn test_time_until_expiry() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let data = snapshot(ts);
        assert_eq!(data.time_until_expiry_at(ts), Duration::hours(24));
        assert_eq!(
            data.time_until_expiry_at(ts + Duration::minutes(90)),
            Duration::minutes(22 * 60 + 30)
        );
        assert!(data.time_until_expiry_at(ts + Duration::hours(25)) < Duration::zero());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let data = snapshot(ts);

        let mut session = Session::new(Box::new(MemoryStore::new()));
        session.update(data.clone());
        session.save().unwrap();
        session.data = None;

        let outcome = session.load_at(ts + Duration::hours(23));
        assert_eq!(outcome, RestoreOutcome::Restored);
        assert_eq!(session.data, Some(data));
    }

    #[test]
    fn test_load_expired_clears_storage() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let raw = serde_json::to_string(&snapshot(ts)).unwrap();
        let mut session = session_with(&raw);

        let outcome = session.load_at(ts + Duration::hours(25));
        assert_eq!(outcome, RestoreOutcome::Expired);
        assert!(session.data.is_none());
        assert!(!session.has_snapshot());
    }

    #[test]
    fn test_load_garbage_is_unreadable() {
        let mut session = session_with("{not json");
        assert_eq!(session.load_at(Utc::now()), RestoreOutcome::Unreadable);
        assert!(session.data.is_none());
    }

    #[test]
    fn test_load_missing() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        assert_eq!(session.load_at(Utc::now()), RestoreOutcome::Missing);
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        session.update(snapshot(Utc::now()));
        session.save().unwrap();
        assert!(session.has_snapshot());

        session.clear().unwrap();
        assert!(!session.has_snapshot());
        assert!(session.data.is_none());
    }
}
