//! Registration, login and user lookup endpoints.

use api_types::{
    Message,
    user::{Login, Register, Session, User, UserQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Cookie mirroring the bearer token for browser clients.
const AUTH_COOKIE: &str = "authorization";

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_string()))
        .path("/")
        .secure(true)
        .http_only(false)
        .build()
}

fn session(state: &ServerState, user: engine::User) -> Result<Session, ServerError> {
    let token = state.keys.issue(user.id)?;
    Ok(Session {
        user_id: user.id,
        token,
        name: user.name,
        email: user.email,
    })
}

/// Handle requests for creating a new account
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, CookieJar, Json<Session>), ServerError> {
    let user = state
        .engine
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    let session = session(&state, user)?;
    let jar = jar.add(session_cookie(&session.token));
    Ok((StatusCode::CREATED, jar, Json(session)))
}

/// Handle login requests
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<(CookieJar, Json<Session>), ServerError> {
    let user = state.engine.login(&payload.email, &payload.password).await?;
    let session = session(&state, user)?;
    let jar = jar.add(session_cookie(&session.token));
    Ok((jar, Json(session)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Message>) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, Json(Message::new("user successfully logged out")))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ServerError> {
    let user = state.engine.user(user_id).await?;
    Ok(Json(views::user(user)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<User>>, ServerError> {
    let filter = engine::UserFilter {
        email: query.email,
        name: query.name,
    };
    let users = state.engine.list_users(&filter).await?;
    Ok(Json(users.into_iter().map(views::user).collect()))
}
