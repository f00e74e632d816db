/// HTTP middleware for the hoot service
///
/// Bearer-token authentication sits in front of every protected route and
/// turns a valid credential into an [`AuthenticatedUser`] in the request
/// extensions. Every failure mode — missing header, wrong scheme, bad
/// signature, expired token, unparseable subject — produces the same 401
/// response; the reason is logged but never sent to the client.
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UserProfile;

/// Verified identity claim attached to the request after authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl AuthenticatedUser {
    /// The public profile threaded through the mutation service.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("invalid or missing credentials".to_string())
}

/// Extract and verify the bearer token, or explain (to the log only) why it
/// was rejected.
fn verify_request(req: &ServiceRequest) -> Result<AuthenticatedUser, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or("missing Authorization header")?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or("Authorization scheme is not Bearer")?;

    let claims = auth_token::validate_token(token)
        .map_err(|_| "token validation failed")?
        .claims;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| "subject is not a UUID")?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
    })
}

/// Actix middleware validating `Authorization: Bearer <token>`.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match verify_request(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(reason) => {
                tracing::debug!(path = %req.path(), reason, "rejected credential");
                let (req, _payload) = req.into_parts();
                let response = unauthorized().error_response();
                Box::pin(async move {
                    Ok(ServiceResponse::new(req, response).map_into_right_body())
                })
            }
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| unauthorized().into()),
        )
    }
}
