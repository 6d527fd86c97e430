//! One-shot flash messages carried in a cookie.
//!
//! A handler queues a message with [`push`] before redirecting; the next
//! page render drains the queue with [`take`] and shows it once. The cookie
//! holds a base64url-encoded JSON array of strings.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Cookie name for pending flash messages.
pub const FLASH_COOKIE: &str = "gradeview_flash";

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";
pub const ACCESS_DENIED: &str = "Access denied.";

fn decode(value: &str) -> Vec<String> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn encode(messages: &[String]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Pending messages in `jar`, without consuming them.
pub fn peek(jar: &CookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .map(|c| decode(c.value()))
        .unwrap_or_default()
}

/// Queue `message` for the next rendered page.
pub fn push(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    let mut messages = peek(&jar);
    messages.push(message.into());

    let cookie = Cookie::build((FLASH_COOKIE, encode(&messages)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Drain all pending messages, clearing the cookie when there were any.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = peek(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_take_in_order() {
        let jar = push(CookieJar::new(), "first");
        let jar = push(jar, "second");
        assert_eq!(peek(&jar), ["first", "second"]);

        let (jar, messages) = take(jar);
        assert_eq!(messages, ["first", "second"]);
        // A removal cookie replaces the value, so nothing is pending anymore.
        assert!(peek(&jar).is_empty());
    }

    #[test]
    fn take_on_empty_jar() {
        let (_, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "%%%not-base64"));
        assert!(peek(&jar).is_empty());
        let jar = push(jar, "fresh");
        assert_eq!(peek(&jar), ["fresh"]);
    }

    #[test]
    fn encoded_value_is_cookie_safe() {
        let value = encode(&["Username already exists; pick another, \"please\"".to_string()]);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode(&value).len(), 1);
    }
}
