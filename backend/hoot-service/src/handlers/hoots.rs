/// Hoot handlers - HTTP endpoints for hoot operations
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{HootDraft, HootPatch};
use crate::services::HootService;

/// Create a new hoot
pub async fn create_hoot(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    payload: web::Json<HootDraft>,
) -> Result<HttpResponse> {
    let hoot = service
        .create_hoot(&user.profile(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(hoot))
}

/// List all hoots, newest first
pub async fn list_hoots(
    service: web::Data<HootService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    let hoots = service.list_hoots().await?;

    Ok(HttpResponse::Ok().json(hoots))
}

/// Get a single hoot with its comments
pub async fn get_hoot(
    service: web::Data<HootService>,
    _user: AuthenticatedUser,
    hoot_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let hoot = service.get_hoot(*hoot_id).await?;

    Ok(HttpResponse::Ok().json(hoot))
}

/// Update a hoot (author only)
pub async fn update_hoot(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    hoot_id: web::Path<Uuid>,
    payload: web::Json<HootPatch>,
) -> Result<HttpResponse> {
    let hoot = service
        .update_hoot(&user.profile(), *hoot_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(hoot))
}

/// Delete a hoot (author only); responds with the removed document
pub async fn delete_hoot(
    service: web::Data<HootService>,
    user: AuthenticatedUser,
    hoot_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let hoot = service.delete_hoot(&user.profile(), *hoot_id).await?;

    Ok(HttpResponse::Ok().json(hoot))
}
