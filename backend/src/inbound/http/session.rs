//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries a serialised [`SessionIdentity`]. Each guarded request
//! checks its expiry against the injected clock and writes back a renewed
//! copy, so an active user keeps their session while an idle one is logged
//! out after the TTL.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};

use crate::domain::{Error, SessionIdentity};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `identity`, replacing any previous session state.
    pub fn persist_identity(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.0.renew();
        self.store(identity)
    }

    fn store(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Read the identity from the cookie, if present and well-formed.
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.0
            .get::<SessionIdentity>(IDENTITY_KEY)
            .unwrap_or_else(|error| {
                warn!(%error, "unreadable identity in session cookie");
                None
            })
    }

    /// Require a live session at `now`, renewing its expiry.
    ///
    /// Missing, malformed and expired sessions all yield `401 Unauthorized`;
    /// an expired one is also cleared.
    pub fn require_identity(&self, now: DateTime<Utc>) -> Result<SessionIdentity, Error> {
        let identity = self
            .identity()
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if identity.is_expired(now) {
            info!(user_id = %identity.subject_id, "session expired");
            self.clear();
            return Err(Error::unauthorized("session expired"));
        }
        let renewed = identity.renewed(now);
        self.store(&renewed)?;
        Ok(renewed)
    }

    /// Require a live administrator session at `now`.
    ///
    /// Non-administrators receive `403 Forbidden`.
    pub fn require_admin(&self, now: DateTime<Utc>) -> Result<SessionIdentity, Error> {
        let identity = self.require_identity(now)?;
        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
