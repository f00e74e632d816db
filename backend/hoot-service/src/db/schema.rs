use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Ensure the hoot service tables exist.
///
/// Tables are created lazily at service startup to unblock environments
/// where migrations have not been applied yet (fresh developer machines,
/// CI spins).
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring hoot service tables exist");

    sqlx::query(USERS_TABLE).execute(pool).await?;
    sqlx::query(HOOTS_TABLE).execute(pool).await?;
    sqlx::query(HOOTS_CREATED_AT_INDEX).execute(pool).await?;

    Ok(())
}

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const HOOTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hoots (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    text TEXT NOT NULL,
    category TEXT NOT NULL,
    author_id UUID NOT NULL REFERENCES users(id),
    comments JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const HOOTS_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_hoots_created_at ON hoots (created_at DESC)
"#;
