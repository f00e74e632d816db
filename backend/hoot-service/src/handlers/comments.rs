/// Comment handlers - HTTP endpoints for comments nested under a hoot
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::CommentDraft;
use crate::services::HootService;

/// Add a comment to a hoot
pub async fn create_comment(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    hoot_id: web::Path<Uuid>,
    payload: web::Json<CommentDraft>,
) -> Result<HttpResponse> {
    let comment = service
        .add_comment(&user.profile(), *hoot_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Update a comment's text (comment author only)
pub async fn update_comment(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<CommentDraft>,
) -> Result<HttpResponse> {
    let (hoot_id, comment_id) = path.into_inner();

    service
        .update_comment(&user.profile(), hoot_id, comment_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment updated successfully"
    })))
}

/// Delete a comment (comment author only)
pub async fn delete_comment(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (hoot_id, comment_id) = path.into_inner();

    service
        .delete_comment(&user.profile(), hoot_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment deleted successfully"
    })))
}
