use std::{
    sync::Arc,
    task::{Context, Poll},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use tracing::warn;

use super::AdminCredentials;

/// Guards the admin scope. Without credentials every request passes through.
#[derive(Clone, Default)]
pub struct AdminGuard {
    credentials: Option<Arc<AdminCredentials>>,
}

impl AdminGuard {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self {
            credentials: Some(Arc::new(credentials)),
        }
    }

    pub fn open() -> Self {
        Self::default()
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminGuardService {
            service,
            credentials: self.credentials.clone(),
        })
    }
}

pub struct AdminGuardService<S> {
    service: S,
    credentials: Option<Arc<AdminCredentials>>,
}

impl<S, B> Service<ServiceRequest> for AdminGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authorized = self
            .credentials
            .as_ref()
            .map_or(true, |creds| creds.permits(req.headers()));

        if !authorized {
            warn!(path = %req.path(), "Rejected unauthenticated admin request");
            let response = HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Basic realm=\"admin\""))
                .finish()
                .map_into_right_body();
            return Box::pin(async move { Ok(req.into_response(response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
