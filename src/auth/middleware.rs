use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::{verify_token, AuthSettings, AuthenticatedUser, AUTH_HEADER};
use crate::db::Store;
use crate::error::AppError;

/// Rejects requests that do not present a live session token in `x-auth`.
///
/// On success the resolved user and the raw token are stored in request
/// extensions, where [`AuthenticatedUser`] picks them up. Otherwise the
/// request never reaches the handler and gets an empty 401.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
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
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(authenticated) => {
                    req.extensions_mut().insert(authenticated);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let (settings, store) = match (
        req.app_data::<web::Data<AuthSettings>>(),
        req.app_data::<web::Data<dyn Store>>(),
    ) {
        (Some(settings), Some(store)) => (settings.clone(), store.clone()),
        _ => {
            log::error!("AuthMiddleware needs AuthSettings and a Store in app data");
            return Err(AppError::Unauthorized);
        }
    };

    let claims = verify_token(&token, &settings)?;

    let user = store
        .find_user_by_token(claims.sub, &token)
        .await
        .map_err(|e| {
            log::debug!("token lookup failed: {}", e);
            AppError::Unauthorized
        })?
        .ok_or(AppError::Unauthorized)?;

    Ok(AuthenticatedUser { user, token })
}
