/// Server-side session store
///
/// Sessions are opaque 32-byte random tokens in a Postgres table. The store
/// is built once at startup and injected via `web::Data`; nothing here is a
/// process-wide singleton.
use chrono::{Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::session_repo;
use crate::error::Result;
use crate::models::Session;

#[derive(Clone)]
pub struct SessionStore {
    pool: PgPool,
    ttl: Duration,
    cookie_name: String,
}

impl SessionStore {
    pub fn new(pool: PgPool, ttl_secs: i64, cookie_name: String) -> Self {
        Self {
            pool,
            ttl: Duration::seconds(ttl_secs),
            cookie_name,
        }
    }

    /// Create a session for a freshly authenticated user.
    ///
    /// The user's expired rows are purged here; with no background sweeper,
    /// sign-in is the natural purge point.
    pub async fn create(&self, user_id: Uuid) -> Result<Session> {
        session_repo::delete_expired_for_user(&self.pool, user_id).await?;

        let token = generate_token();
        let expires_at = Utc::now() + self.ttl;
        let session = session_repo::create_session(&self.pool, &token, user_id, expires_at).await?;

        Ok(session)
    }

    /// Resolve a cookie token to its user; None when unknown or expired.
    pub async fn resolve(&self, token: &str) -> Result<Option<Uuid>> {
        let session = session_repo::find_valid(&self.pool, token).await?;

        Ok(session.map(|s| s.user_id))
    }

    /// Drop a session, invalidating its token immediately.
    pub async fn destroy(&self, token: &str) -> Result<()> {
        session_repo::delete_session(&self.pool, token).await?;

        Ok(())
    }

    /// Session lifetime, also the cookie Max-Age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Name of the auth cookie this store reads and issues.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

/// 32 random bytes from the OS generator, hex encoded
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
