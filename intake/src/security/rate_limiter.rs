use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    task::{Context, Poll},
    time::{Duration, Instant},
};

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use tracing::warn;

use super::client_ip;
use crate::error::ApiError;

const WINDOW: Duration = Duration::from_secs(60);
// Stale windows are swept once the table grows past this.
const SWEEP_THRESHOLD: usize = 1024;

type ClientWindows = Arc<Mutex<HashMap<String, (usize, Instant)>>>;

/// Fixed one-minute window per client IP. A limit of zero disables it.
#[derive(Clone)]
pub struct SubmissionLimiter {
    requests_per_minute: usize,
    clients: ClientWindows,
}

impl SubmissionLimiter {
    pub fn new(requests_per_minute: usize) -> Self {
        SubmissionLimiter {
            requests_per_minute,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records one request from `ip` and reports whether it is within the limit.
    fn admit(&self, ip: &str, now: Instant) -> bool {
        if self.requests_per_minute == 0 {
            return true;
        }

        let mut clients = match self.clients.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if clients.len() > SWEEP_THRESHOLD {
            clients.retain(|_, (_, start)| now.duration_since(*start) <= WINDOW);
        }

        let (count, start) = clients.entry(ip.to_string()).or_insert((0, now));
        if now.duration_since(*start) > WINDOW {
            *count = 0;
            *start = now;
        }
        if *count >= self.requests_per_minute {
            return false;
        }
        *count += 1;
        true
    }
}

impl<S, B> Transform<S, ServiceRequest> for SubmissionLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SubmissionLimiterMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SubmissionLimiterMiddleware {
            service,
            limiter: self.clone(),
        })
    }
}

pub struct SubmissionLimiterMiddleware<S> {
    service: S,
    limiter: SubmissionLimiter,
}

impl<S, B> Service<ServiceRequest> for SubmissionLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
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
        let ip = client_ip(req.peer_addr());

        if !self.limiter.admit(&ip, Instant::now()) {
            warn!(ip = %ip, "Submission rate limit exceeded");
            let response = ApiError::RateLimited.error_response().map_into_right_body();
            return Box::pin(async move { Ok(req.into_response(response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
