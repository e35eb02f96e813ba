use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    post, web, HttpResponse,
};
use serde::Serialize;

use crate::{
    auth_token::{now_ms, AuthTokenService, SessionIdentity, SESSION_COOKIE},
    config::CookiePolicy,
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct IssueTokenResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: bool,
}

fn session_cookie(value: String, policy: &CookiePolicy) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .finish()
}

#[post("/jwt")]
pub async fn issue_token(
    identity: web::Json<SessionIdentity>,
    auth_tokens: web::Data<AuthTokenService>,
    policy: web::Data<CookiePolicy>,
) -> Result<HttpResponse> {
    let token = auth_tokens.issue(&identity, now_ms())?;

    log::info!("Issued session token for {}", identity.email);

    // No max-age: the browser keeps it for the session, the token expires on its own.
    let cookie = session_cookie(token, &policy);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(IssueTokenResponse { success: true }))
}

#[post("/logout")]
pub async fn logout(policy: web::Data<CookiePolicy>) -> Result<HttpResponse> {
    let mut cookie = session_cookie(String::new(), &policy);
    cookie.set_max_age(CookieDuration::ZERO);

    log::info!("Session cookie cleared");

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(LogoutResponse { status: true }))
}
