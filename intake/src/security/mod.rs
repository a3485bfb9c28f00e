use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::http;

mod rate_limiter;

pub use rate_limiter::SubmissionLimiter;

/// Permissive when no origins are configured, otherwise restricted to `allowed_origins`.
pub fn configure_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ])
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

/// Address recorded for a submission and used as the rate limiting key.
pub fn client_ip(peer: Option<SocketAddr>) -> String {
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
