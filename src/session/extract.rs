use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};

use super::{SessionId, SessionRecord, SessionStore};

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "sporlauth.sid";

/// The caller's session, resolved from the signed session cookie.
///
/// A request without a cookie, or whose cookie is forged or refers to an
/// expired session, gets a fresh empty session. Changes made through
/// [`Session::record_mut`] are only stored by [`Session::commit`], whose jar
/// must be part of the response.
pub struct Session {
    id: SessionId,
    record: SessionRecord,
    fresh: bool,
    jar: SignedCookieJar,
    store: Arc<SessionStore>,
}

impl Session {
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut SessionRecord {
        &mut self.record
    }

    /// Stores the record and returns the cookie jar to send back.
    ///
    /// A fresh session that is still empty is neither stored nor announced
    /// to the browser.
    pub async fn commit(self) -> SignedCookieJar {
        if self.fresh && self.record.is_empty() {
            return self.jar;
        }

        self.store.save(&self.id, self.record).await;

        if self.fresh {
            self.jar.add(session_cookie(&self.id))
        } else {
            self.jar
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<SessionStore>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;
        let store = Arc::<SessionStore>::from_ref(state);

        let existing = match jar.get(SESSION_COOKIE) {
            Some(cookie) => {
                let id = SessionId::from(cookie.value().to_string());
                store.load(&id).await.map(|record| (id, record))
            }
            None => None,
        };

        let session = match existing {
            Some((id, record)) => Session {
                id,
                record,
                fresh: false,
                jar,
                store,
            },
            None => Session {
                id: SessionId::generate(),
                record: SessionRecord::default(),
                fresh: true,
                jar,
                store,
            },
        };

        Ok(session)
    }
}

fn session_cookie(id: &SessionId) -> Cookie<'static> {
    // Not marked Secure: the server is meant to run on plain http://localhost.
    Cookie::build((SESSION_COOKIE, id.as_str().to_string()))
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}
