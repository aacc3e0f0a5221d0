use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::auth::repo::CredentialStore;
use crate::auth::repo_types::User;
use crate::session::store::SessionStore;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Resolves the session cookie to a user record, if any. Lookup errors are
/// logged and treated as "no session".
pub async fn resolve_user(state: &AppState, jar: &CookieJar) -> Option<User> {
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    let user_id = state.sessions.get(&token).await?;
    match state.users.find_by_id(user_id).await {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, %user_id, "session user lookup failed");
            None
        }
    }
}

/// Guard for protected routes. Missing cookie, stale token and a token whose
/// account no longer exists all reject the same way: back to the login flow.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;
        match resolve_user(state, &jar).await {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(Redirect::to("/login")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, LOCATION};
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use uuid::Uuid;

    fn parts_with_cookie(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/dashboard");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    fn assert_redirects_to_login(redirect: Redirect) {
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn missing_session_redirects_to_login() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);

        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert_redirects_to_login(err);
    }

    #[tokio::test]
    async fn stale_token_redirects_to_login() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(Some(format!("{SESSION_COOKIE}=stale-token")));

        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert_redirects_to_login(err);
    }

    #[tokio::test]
    async fn token_for_deleted_account_redirects_to_login() {
        let state = AppState::fake();
        // Session exists but no user record backs it up.
        let token = state.sessions.create(Uuid::new_v4()).await;
        let mut parts = parts_with_cookie(Some(format!("{SESSION_COOKIE}={token}")));

        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("must reject");
        assert_redirects_to_login(err);
    }

    #[tokio::test]
    async fn valid_session_resolves_user() {
        let state = AppState::fake();
        let user = state
            .users
            .create("gate@example.com", "hash", None, None)
            .await
            .expect("create user");
        let token = state.sessions.create(user.id).await;
        let mut parts = parts_with_cookie(Some(format!("{SESSION_COOKIE}={token}")));

        let CurrentUser(current) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .expect("authorized");
        assert_eq!(current.id, user.id);
        assert_eq!(current.email, "gate@example.com");
    }
}
