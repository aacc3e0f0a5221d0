use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{error, info, instrument};

use crate::session::gate::{resolve_user, CurrentUser, SESSION_COOKIE};
use crate::state::AppState;

use super::dto::{LoginRequest, Notice, ProfileUpdateRequest, PublicUser, SignupRequest};
use super::password::hash_password;
use super::repo::CredentialStore;
use super::services::{self, is_valid_email, AuthError};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
        .route("/profile", get(get_profile).post(update_profile))
}

#[instrument(skip(state, jar))]
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Redirect {
    if resolve_user(&state, &jar).await.is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

#[instrument(skip(state, jar))]
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if resolve_user(&state, &jar).await.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Json(Notice {
        notice: "Please log in.".into(),
    })
    .into_response()
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Redirect), (StatusCode, String)> {
    let attempt = services::login(
        state.users.as_ref(),
        state.sessions.as_ref(),
        &payload.email,
        &payload.password,
    )
    .await;

    match attempt {
        Ok((token, _user)) => {
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .build();
            Ok((jar.add(cookie), Redirect::to("/dashboard")))
        }
        Err(AuthError::InvalidCredentials) => {
            Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()))
        }
        Err(e) => {
            error!(error = %e, "login failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred. Please try again.".into(),
            ))
        }
    }
}

pub async fn signup_page() -> Json<Notice> {
    Json(Notice {
        notice: "Create an account.".into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<PublicUser>), (StatusCode, String)> {
    // Emails are stored and compared exactly as submitted.
    let email = payload.email.trim();

    if !is_valid_email(email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    let created = services::signup(
        state.users.as_ref(),
        email,
        &payload.password,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await;

    match created {
        Ok(user) => Ok((StatusCode::CREATED, Json(user.into()))),
        Err(AuthError::DuplicateEmail) => Err((
            StatusCode::CONFLICT,
            "Email already exists. Please log in.".into(),
        )),
        Err(e) => {
            error!(error = %e, "signup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred. Please try again.".into(),
            ))
        }
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        services::logout(state.sessions.as_ref(), cookie.value()).await;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Redirect::to("/login"))
}

#[instrument(skip(user))]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

#[instrument(skip(state, user, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    user.first_name = payload.first_name;
    user.last_name = payload.last_name;

    if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
        user.password_hash = hash_password(password).map_err(|e| {
            error!(error = %e, "hash_password failed");
            internal()
        })?;
    }

    state.users.update(&user).await.map_err(|e| {
        error!(error = %e, user_id = %user.id, "profile update failed");
        internal()
    })?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again.".into(),
    )
}
