//! Authenticated session identity with sliding expiry.
//!
//! A session is issued at login and lives for [`SESSION_TTL_HOURS`]. Every request
//! that presents a still-valid session renews it for another full TTL; a
//! session left idle past its expiry is rejected.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ADMIN_ROLE_NAME, UserId};

/// Idle lifetime of a session, in hours.
pub const SESSION_TTL_HOURS: i64 = 8;

/// Idle lifetime of a session.
pub fn session_ttl() -> Duration {
    Duration::hours(SESSION_TTL_HOURS)
}

/// Identity carried by the session cookie.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use culinaria::domain::{SessionIdentity, UserId};
///
/// let now = Utc::now();
/// let session = SessionIdentity::issue(UserId::new(1), "ana@x.com", "Usuario", now);
/// assert!(!session.is_expired(now + Duration::hours(7)));
/// assert!(session.is_expired(now + Duration::hours(8)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// Authenticated user.
    pub subject_id: UserId,
    /// Login principal (the account email).
    pub principal: String,
    /// Role name at login time.
    pub role: String,
    /// When the session was first issued.
    pub issued_at: DateTime<Utc>,
    /// Instant after which the session is no longer accepted.
    pub expires_at: DateTime<Utc>,
}

impl SessionIdentity {
    /// Issue a fresh session at `now`.
    pub fn issue(
        subject_id: UserId,
        principal: impl Into<String>,
        role: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id,
            principal: principal.into(),
            role: role.into(),
            issued_at: now,
            expires_at: now + session_ttl(),
        }
    }

    /// Whether the session has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Slide the expiry to a full TTL after `now`.
    #[must_use]
    pub fn renewed(&self, now: DateTime<Utc>) -> Self {
        Self {
            expires_at: now + session_ttl(),
            ..self.clone()
        }
    }

    /// Whether the session belongs to an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE_NAME
    }
}
