/// Shared test support: an in-process hoot store and request builders.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use hoot_service::db::HootStore;
use hoot_service::error::Result;
use hoot_service::models::{Comment, CommentDraft, Hoot, HootDraft, UserProfile, ValidHootDraft};
use hoot_service::services::HootService;

/// In-memory [`HootStore`] with the same aggregate semantics as the
/// Postgres store: comments only change by rewriting their parent hoot.
#[derive(Default)]
pub struct MemoryHootStore {
    hoots: RwLock<HashMap<Uuid, Hoot>>,
}

#[async_trait]
impl HootStore for MemoryHootStore {
    async fn create(&self, draft: ValidHootDraft, author: &UserProfile) -> Result<Hoot> {
        let now = Utc::now();
        let hoot = Hoot {
            id: Uuid::new_v4(),
            title: draft.title,
            text: draft.text,
            category: draft.category,
            author: author.clone(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.hoots.write().await.insert(hoot.id, hoot.clone());
        Ok(hoot)
    }

    async fn list_all(&self) -> Result<Vec<Hoot>> {
        let mut hoots: Vec<Hoot> = self.hoots.read().await.values().cloned().collect();
        hoots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(hoots)
    }

    async fn get_by_id(&self, hoot_id: Uuid) -> Result<Option<Hoot>> {
        Ok(self.hoots.read().await.get(&hoot_id).cloned())
    }

    async fn replace(&self, hoot_id: Uuid, draft: ValidHootDraft) -> Result<Option<Hoot>> {
        let mut hoots = self.hoots.write().await;
        let Some(hoot) = hoots.get_mut(&hoot_id) else {
            return Ok(None);
        };

        hoot.title = draft.title;
        hoot.text = draft.text;
        hoot.category = draft.category;
        hoot.updated_at = Utc::now();
        Ok(Some(hoot.clone()))
    }

    async fn delete(&self, hoot_id: Uuid) -> Result<Option<Hoot>> {
        Ok(self.hoots.write().await.remove(&hoot_id))
    }

    async fn append_comment(
        &self,
        hoot_id: Uuid,
        text: String,
        author: &UserProfile,
    ) -> Result<Option<Comment>> {
        let mut hoots = self.hoots.write().await;
        let Some(hoot) = hoots.get_mut(&hoot_id) else {
            return Ok(None);
        };

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            text,
            author: author.clone(),
            created_at: now,
            updated_at: now,
        };
        hoot.comments.push(comment.clone());
        hoot.updated_at = now;
        Ok(Some(comment))
    }

    async fn update_comment(
        &self,
        hoot_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<Option<()>> {
        let mut hoots = self.hoots.write().await;
        let Some(hoot) = hoots.get_mut(&hoot_id) else {
            return Ok(None);
        };
        let Some(comment) = hoot.comments.iter_mut().find(|c| c.id == comment_id) else {
            return Ok(None);
        };

        comment.text = text;
        comment.updated_at = Utc::now();
        hoot.updated_at = comment.updated_at;
        Ok(Some(()))
    }

    async fn remove_comment(&self, hoot_id: Uuid, comment_id: Uuid) -> Result<Option<()>> {
        let mut hoots = self.hoots.write().await;
        let Some(hoot) = hoots.get_mut(&hoot_id) else {
            return Ok(None);
        };

        let before = hoot.comments.len();
        hoot.comments.retain(|c| c.id != comment_id);
        if hoot.comments.len() == before {
            return Ok(None);
        }

        hoot.updated_at = Utc::now();
        Ok(Some(()))
    }
}

#[allow(dead_code)]
pub fn service() -> HootService {
    HootService::new(Arc::new(MemoryHootStore::default()))
}

#[allow(dead_code)]
pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        username: username.to_string(),
    }
}

#[allow(dead_code)]
pub fn hoot_draft(title: &str, text: &str, category: &str) -> HootDraft {
    HootDraft {
        title: title.to_string(),
        text: text.to_string(),
        category: category.to_string(),
    }
}

#[allow(dead_code)]
pub fn comment_draft(text: &str) -> CommentDraft {
    CommentDraft {
        text: text.to_string(),
    }
}
