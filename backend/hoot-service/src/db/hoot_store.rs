/// Hoot aggregate store
///
/// [`HootStore`] is the persistence contract the mutation service works
/// against; [`PgHootStore`] implements it over Postgres. Comment operations
/// never touch comments independently: they load the parent row, mutate the
/// in-memory sequence, and write the whole `comments` column back. The row
/// lock taken during that read-modify-write serializes concurrent mutations
/// of one hoot; there is no optimistic concurrency control beyond it.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, Hoot, UserProfile, ValidHootDraft};

/// Persistence contract for the hoot aggregate.
///
/// `None` results mean the referenced hoot or comment does not exist; the
/// service layer translates them to `NotFound`. I/O failures surface as
/// errors.
#[async_trait]
pub trait HootStore: Send + Sync {
    /// Persist a new hoot authored by `author`.
    async fn create(&self, draft: ValidHootDraft, author: &UserProfile) -> Result<Hoot>;

    /// All hoots, newest first, with authors resolved.
    async fn list_all(&self) -> Result<Vec<Hoot>>;

    /// One hoot with its author and every comment author resolved.
    async fn get_by_id(&self, hoot_id: Uuid) -> Result<Option<Hoot>>;

    /// Full-document update of title, text, and category.
    async fn replace(&self, hoot_id: Uuid, draft: ValidHootDraft) -> Result<Option<Hoot>>;

    /// Remove a hoot and return the prior version.
    async fn delete(&self, hoot_id: Uuid) -> Result<Option<Hoot>>;

    /// Append a comment to the hoot's sequence and persist the aggregate.
    async fn append_comment(
        &self,
        hoot_id: Uuid,
        text: String,
        author: &UserProfile,
    ) -> Result<Option<Comment>>;

    /// Replace the text of one comment inside the aggregate.
    async fn update_comment(
        &self,
        hoot_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Option<()>>;

    /// Remove one comment from the aggregate.
    async fn remove_comment(&self, hoot_id: Uuid, comment_id: Uuid) -> Result<Option<()>>;
}

/// Storage shape of an embedded comment. Only the author id is stored;
/// profiles are joined back in on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredComment {
    id: Uuid,
    text: String,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Postgres-backed [`HootStore`]
#[derive(Clone)]
pub struct PgHootStore {
    pool: PgPool,
}

impl PgHootStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record the author's profile snapshot so reads can resolve it later.
    async fn upsert_profile(
        tx: &mut Transaction<'_, Postgres>,
        profile: &UserProfile,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            "#,
        )
        .bind(profile.id)
        .bind(&profile.username)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn load_usernames(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query("SELECT id, username FROM users WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("id"), row.get("username")))
            .collect())
    }

    /// Read the comment column of one hoot, locking the row for the rest of
    /// the transaction.
    async fn comments_for_update(
        tx: &mut Transaction<'_, Postgres>,
        hoot_id: Uuid,
    ) -> Result<Option<Vec<StoredComment>>> {
        let row = sqlx::query("SELECT comments FROM hoots WHERE id = $1 FOR UPDATE")
            .bind(hoot_id)
            .fetch_optional(&mut **tx)
            .await?;

        match row {
            Some(row) => {
                let value: serde_json::Value = row.try_get("comments")?;
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    async fn write_comments(
        tx: &mut Transaction<'_, Postgres>,
        hoot_id: Uuid,
        comments: &[StoredComment],
    ) -> Result<()> {
        sqlx::query("UPDATE hoots SET comments = $2, updated_at = NOW() WHERE id = $1")
            .bind(hoot_id)
            .bind(serde_json::to_value(comments)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    fn resolve_comments(
        stored: Vec<StoredComment>,
        usernames: &HashMap<Uuid, String>,
    ) -> Result<Vec<Comment>> {
        stored
            .into_iter()
            .map(|c| {
                let username = usernames
                    .get(&c.author_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Internal(format!("missing profile for author {}", c.author_id))
                    })?;
                Ok(Comment {
                    id: c.id,
                    text: c.text,
                    author: UserProfile {
                        id: c.author_id,
                        username,
                    },
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                })
            })
            .collect()
    }

    async fn hoots_from_rows(&self, rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<Hoot>> {
        let mut parsed: Vec<(sqlx::postgres::PgRow, Vec<StoredComment>)> =
            Vec::with_capacity(rows.len());
        let mut comment_author_ids: Vec<Uuid> = Vec::new();

        for row in rows {
            let value: serde_json::Value = row.try_get("comments")?;
            let stored: Vec<StoredComment> = serde_json::from_value(value)?;
            for c in &stored {
                if !comment_author_ids.contains(&c.author_id) {
                    comment_author_ids.push(c.author_id);
                }
            }
            parsed.push((row, stored));
        }

        let usernames = self.load_usernames(comment_author_ids).await?;

        parsed
            .into_iter()
            .map(|(row, stored)| {
                let category_raw: String = row.try_get("category")?;
                let category = crate::models::Category::parse(&category_raw).ok_or_else(|| {
                    AppError::Internal(format!("invalid category '{category_raw}' in storage"))
                })?;

                Ok(Hoot {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    text: row.try_get("text")?,
                    category,
                    author: UserProfile {
                        id: row.try_get("author_id")?,
                        username: row.try_get("username")?,
                    },
                    comments: Self::resolve_comments(stored, &usernames)?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect()
    }
}

const SELECT_HOOT: &str = r#"
SELECT h.id, h.title, h.text, h.category, h.author_id, u.username, h.comments,
       h.created_at, h.updated_at
FROM hoots h
JOIN users u ON u.id = h.author_id
"#;

#[async_trait]
impl HootStore for PgHootStore {
    async fn create(&self, draft: ValidHootDraft, author: &UserProfile) -> Result<Hoot> {
        let mut tx = self.pool.begin().await?;

        Self::upsert_profile(&mut tx, author).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO hoots (title, text, category, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(draft.category.as_str())
        .bind(author.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Hoot {
            id: row.try_get("id")?,
            title: draft.title,
            text: draft.text,
            category: draft.category,
            author: author.clone(),
            comments: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn list_all(&self) -> Result<Vec<Hoot>> {
        let rows = sqlx::query(&format!("{SELECT_HOOT} ORDER BY h.created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

        self.hoots_from_rows(rows).await
    }

    async fn get_by_id(&self, hoot_id: Uuid) -> Result<Option<Hoot>> {
        let row = sqlx::query(&format!("{SELECT_HOOT} WHERE h.id = $1"))
            .bind(hoot_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hoots_from_rows(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn replace(&self, hoot_id: Uuid, draft: ValidHootDraft) -> Result<Option<Hoot>> {
        let result = sqlx::query(
            r#"
            UPDATE hoots
            SET title = $2, text = $3, category = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(hoot_id)
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(draft.category.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(hoot_id).await
    }

    async fn delete(&self, hoot_id: Uuid) -> Result<Option<Hoot>> {
        let Some(hoot) = self.get_by_id(hoot_id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM hoots WHERE id = $1")
            .bind(hoot_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(hoot))
    }

    async fn append_comment(
        &self,
        hoot_id: Uuid,
        text: String,
        author: &UserProfile,
    ) -> Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        Self::upsert_profile(&mut tx, author).await?;

        let Some(mut comments) = Self::comments_for_update(&mut tx, hoot_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let stored = StoredComment {
            id: Uuid::new_v4(),
            text,
            author_id: author.id,
            created_at: now,
            updated_at: now,
        };
        comments.push(stored.clone());

        Self::write_comments(&mut tx, hoot_id, &comments).await?;
        tx.commit().await?;

        Ok(Some(Comment {
            id: stored.id,
            text: stored.text,
            author: author.clone(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }))
    }

    async fn update_comment(
        &self,
        hoot_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Option<()>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut comments) = Self::comments_for_update(&mut tx, hoot_id).await? else {
            return Ok(None);
        };

        let Some(comment) = comments.iter_mut().find(|c| c.id == comment_id) else {
            return Ok(None);
        };
        comment.text = text;
        comment.updated_at = Utc::now();

        Self::write_comments(&mut tx, hoot_id, &comments).await?;
        tx.commit().await?;

        Ok(Some(()))
    }

    async fn remove_comment(&self, hoot_id: Uuid, comment_id: Uuid) -> Result<Option<()>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut comments) = Self::comments_for_update(&mut tx, hoot_id).await? else {
            return Ok(None);
        };

        let before = comments.len();
        comments.retain(|c| c.id != comment_id);
        if comments.len() == before {
            return Ok(None);
        }

        Self::write_comments(&mut tx, hoot_id, &comments).await?;
        tx.commit().await?;

        Ok(Some(()))
    }
}
