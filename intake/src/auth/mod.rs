use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use base64::{engine::general_purpose::STANDARD, Engine};

mod middleware;

pub use middleware::AdminGuard;

/// Credentials accepted on the admin panel via HTTP Basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub user: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Whether the request headers carry a matching `Authorization: Basic` value.
    pub fn permits(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(decode_basic)
            .is_some_and(|(user, password)| {
                let user_ok = constant_time_eq(user.as_bytes(), self.user.as_bytes());
                let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
                user_ok & password_ok
            })
    }
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
