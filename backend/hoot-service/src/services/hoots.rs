/// Hoot mutation service
///
/// Orchestrates every hoot and comment operation. Each method is a short
/// deterministic sequence over the store with a fixed ordering invariant:
/// existence is confirmed before ownership is checked, and ownership is
/// checked before any mutating store call. A request against a missing
/// resource reports `NotFound` even when the actor would also have been
/// denied; an existing resource owned by someone else reports `Forbidden`.
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::db::HootStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentDraft, Hoot, HootDraft, HootPatch, UserProfile};
use crate::services::authz::{authorize, Access};

pub struct HootService {
    store: Arc<dyn HootStore>,
}

impl HootService {
    pub fn new(store: Arc<dyn HootStore>) -> Self {
        Self { store }
    }

    /// Create a hoot authored by the actor. Nothing is persisted when the
    /// draft fails validation.
    pub async fn create_hoot(&self, actor: &UserProfile, draft: HootDraft) -> Result<Hoot> {
        let draft = draft.validated()?;
        let hoot = self.store.create(draft, actor).await?;

        info!(hoot_id = %hoot.id, author = %actor.id, "hoot created");
        Ok(hoot)
    }

    /// All hoots, newest first. The actor is only the authentication gate;
    /// listing is not owner-scoped.
    pub async fn list_hoots(&self) -> Result<Vec<Hoot>> {
        self.store.list_all().await
    }

    pub async fn get_hoot(&self, hoot_id: Uuid) -> Result<Hoot> {
        self.store
            .get_by_id(hoot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("hoot {hoot_id}")))
    }

    /// Full update of a hoot. Only its author may update it; omitted patch
    /// fields keep their current values and the merged result is
    /// re-validated like a fresh draft.
    pub async fn update_hoot(
        &self,
        actor: &UserProfile,
        hoot_id: Uuid,
        patch: HootPatch,
    ) -> Result<Hoot> {
        let current = self.get_hoot(hoot_id).await?;

        match authorize(actor.id, current.author.id) {
            Access::Allow => {}
            Access::Deny => {
                return Err(AppError::Forbidden(
                    "only the author may update this hoot".to_string(),
                ))
            }
        }

        let draft = patch.merge_into(&current).validated()?;

        self.store
            .replace(hoot_id, draft)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("hoot {hoot_id}")))
    }

    /// Delete a hoot and return the removed version. Only its author may
    /// delete it.
    pub async fn delete_hoot(&self, actor: &UserProfile, hoot_id: Uuid) -> Result<Hoot> {
        let current = self.get_hoot(hoot_id).await?;

        match authorize(actor.id, current.author.id) {
            Access::Allow => {}
            Access::Deny => {
                return Err(AppError::Forbidden(
                    "only the author may delete this hoot".to_string(),
                ))
            }
        }

        let deleted = self
            .store
            .delete(hoot_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("hoot {hoot_id}")))?;

        info!(hoot_id = %hoot_id, author = %actor.id, "hoot deleted");
        Ok(deleted)
    }

    /// Append a comment to a hoot. Any authenticated actor may comment;
    /// the actor becomes the comment's immutable author.
    pub async fn add_comment(
        &self,
        actor: &UserProfile,
        hoot_id: Uuid,
        draft: CommentDraft,
    ) -> Result<Comment> {
        let text = draft.validated()?;

        self.store
            .append_comment(hoot_id, text, actor)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("hoot {hoot_id}")))
    }

    /// Replace a comment's text. Only the comment's author may edit it;
    /// the hoot's author has no special rights over other people's
    /// comments.
    pub async fn update_comment(
        &self,
        actor: &UserProfile,
        hoot_id: Uuid,
        comment_id: Uuid,
        draft: CommentDraft,
    ) -> Result<()> {
        let text = draft.validated()?;
        let comment = self.find_comment(hoot_id, comment_id).await?;

        match authorize(actor.id, comment.author.id) {
            Access::Allow => {}
            Access::Deny => {
                return Err(AppError::Forbidden(
                    "only the author may update this comment".to_string(),
                ))
            }
        }

        self.store
            .update_comment(hoot_id, comment_id, text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
    }

    /// Remove a comment. Only the comment's author may delete it.
    pub async fn delete_comment(
        &self,
        actor: &UserProfile,
        hoot_id: Uuid,
        comment_id: Uuid,
    ) -> Result<()> {
        let comment = self.find_comment(hoot_id, comment_id).await?;

        match authorize(actor.id, comment.author.id) {
            Access::Allow => {}
            Access::Deny => {
                return Err(AppError::Forbidden(
                    "only the author may delete this comment".to_string(),
                ))
            }
        }

        self.store
            .remove_comment(hoot_id, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
    }

    /// Locate a comment through its parent aggregate. Reports the missing
    /// hoot before the missing comment.
    async fn find_comment(&self, hoot_id: Uuid, comment_id: Uuid) -> Result<Comment> {
        let hoot = self.get_hoot(hoot_id).await?;

        hoot.comments
            .into_iter()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
    }
}
