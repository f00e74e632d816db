/// Data models for the hoot service
///
/// A `Hoot` is the aggregate root: it embeds its full ordered comment
/// sequence and is always persisted as one unit. Comments have no identity
/// outside their parent hoot. Author fields carry a resolved [`UserProfile`]
/// in every API-facing shape; the bare author id only appears in storage.
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Closed set of hoot categories. Values are part of the external contract
/// and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    News,
    Sports,
    Games,
    Movies,
    Music,
    Television,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::News,
        Category::Sports,
        Category::Games,
        Category::Movies,
        Category::Music,
        Category::Television,
    ];

    /// Parse an external category value. Returns `None` for anything outside
    /// the closed set, including case mismatches.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "News" => Some(Category::News),
            "Sports" => Some(Category::Sports),
            "Games" => Some(Category::Games),
            "Movies" => Some(Category::Movies),
            "Music" => Some(Category::Music),
            "Television" => Some(Category::Television),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Sports => "Sports",
            Category::Games => "Games",
            Category::Movies => "Movies",
            Category::Music => "Music",
            Category::Television => "Television",
        }
    }
}

/// Public identity attached to hoots and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
}

/// Comment entity - lives inside exactly one hoot's comment sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hoot aggregate - a post plus its full embedded comment sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hoot {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub category: Category,
    pub author: UserProfile,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a hoot
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HootDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    pub category: String,
}

/// Request body for updating a hoot. Omitted fields keep their current
/// values; the merged result is re-validated like a fresh draft.
#[derive(Debug, Clone, Deserialize)]
pub struct HootPatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
}

/// Request body for creating or updating a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentDraft {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

/// A draft that has passed validation. This is the only shape the store
/// accepts, so nothing invalid can reach persistence.
#[derive(Debug, Clone)]
pub struct ValidHootDraft {
    pub title: String,
    pub text: String,
    pub category: Category,
}

impl HootDraft {
    /// Trim and validate the draft, resolving the category against the
    /// closed set.
    pub fn validated(self) -> Result<ValidHootDraft> {
        let draft = HootDraft {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            category: self.category,
        };
        draft.validate()?;

        let category = Category::parse(&draft.category).ok_or_else(|| {
            AppError::Validation(format!("unknown category '{}'", draft.category))
        })?;

        Ok(ValidHootDraft {
            title: draft.title,
            text: draft.text,
            category,
        })
    }
}

impl HootPatch {
    /// Merge the patch over the current hoot and produce a full draft for
    /// re-validation.
    pub fn merge_into(self, current: &Hoot) -> HootDraft {
        HootDraft {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            text: self.text.unwrap_or_else(|| current.text.clone()),
            category: self
                .category
                .unwrap_or_else(|| current.category.as_str().to_string()),
        }
    }
}

impl CommentDraft {
    /// Trim and validate the comment text.
    pub fn validated(self) -> Result<String> {
        let draft = CommentDraft {
            text: self.text.trim().to_string(),
        };
        draft.validate()?;
        Ok(draft.text)
    }
}
