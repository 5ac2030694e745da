use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    user_id: Uuid,
    email: String,
    roles: Vec<String>,
}

/// Resolves opaque session tokens to users.
///
/// Tokens are written by the platform's auth service; this side only reads
/// them, which keeps the whole login surface out of this binary.
pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate a session token and return the user it belongs to.
    /// Unknown and expired tokens are indistinguishable to the caller.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT u.id AS user_id, u.email, u.roles
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up session: {:?}", e);
            AppError::Database(e)
        })?;

        let row = row
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        debug!("Session resolved for user {}", row.user_id);

        Ok(AuthenticatedUser {
            id: row.user_id,
            email: row.email,
            roles: row.roles,
        })
    }
}
