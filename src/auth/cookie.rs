//! Session cookie helpers

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie carrying the signed access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Builds the session cookie: HttpOnly, SameSite=Strict, `Secure` when serving over TLS.
pub fn access_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(max_age_secs))
        .secure(secure)
        .build()
}

/// Expired, empty session cookie. Added to the jar directly so the
/// `Set-Cookie` is sent even when the request carried no cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}
