use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::error;
use std::rc::Rc;

use crate::auth::service::IdentityService;
use crate::auth::token::decode_token;
use crate::config::Config;
use crate::error::AppError;

/// Identity-resolving middleware.
///
/// For every request under the protected scope it decodes and verifies the
/// bearer token, resolves the subject against the credential store exactly
/// once, and places the resulting `Identity` into request extensions for
/// downstream handlers. Any failure terminates the request with a generic
/// credentials error. Nothing is cached across requests.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Skip authentication for the auth endpoints
        let path = req.path();
        if path.starts_with("/api/auth/login") || path.starts_with("/api/auth/register") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let config = req
                .app_data::<web::Data<Config>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Server configuration is missing".into()))?;
            let identities = req
                .app_data::<web::Data<IdentityService>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Identity service is missing".into()))?;

            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or_else(|| {
                    error!("Request without bearer credentials to: {}", req.path());
                    AppError::Unauthorized("Missing token".into())
                })?;

            let claims = decode_token(&token, &config)?;
            if claims.sub.is_empty() {
                error!("Access token carries an empty subject");
                return Err(AppError::Unauthorized("Could not validate credentials".into()).into());
            }

            let identity = identities.resolve(&claims.sub).await?;
            req.extensions_mut().insert(identity);

            service.call(req).await
        })
    }
}
