/// HTTP handlers for hoot endpoints
///
/// Routes follow the hoot REST surface: hoot CRUD plus nested comment
/// create/update/delete, all under `/api/v1` behind bearer authentication.
pub mod comments;
pub mod hoots;

pub use comments::{create_comment, delete_comment, update_comment};
pub use hoots::{create_hoot, delete_hoot, get_hoot, list_hoots, update_hoot};

use actix_web::web;

use crate::middleware::JwtAuthMiddleware;

/// Register the protected API routes. Shared between `main` and the HTTP
/// tests so the route table cannot drift.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(JwtAuthMiddleware)
            .service(
                web::scope("/hoots")
                    .service(
                        web::resource("")
                            .route(web::post().to(create_hoot))
                            .route(web::get().to(list_hoots)),
                    )
                    .service(
                        web::resource("/{hoot_id}")
                            .route(web::get().to(get_hoot))
                            .route(web::put().to(update_hoot))
                            .route(web::delete().to(delete_hoot)),
                    )
                    .service(
                        web::resource("/{hoot_id}/comments")
                            .route(web::post().to(create_comment)),
                    )
                    .service(
                        web::resource("/{hoot_id}/comments/{comment_id}")
                            .route(web::put().to(update_comment))
                            .route(web::delete().to(delete_comment)),
                    ),
            ),
    );
}
