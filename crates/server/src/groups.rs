//! Group endpoints.

use api_types::{
    Message, PageQuery,
    group::{Group, GroupNew, GroupUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EngineError, GroupChanges};
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState, views};

/// Reject requests whose path user is not the caller.
fn ensure_caller(auth: AuthUser, user_id: Uuid) -> Result<(), ServerError> {
    if auth.0 != user_id {
        return Err(EngineError::Forbidden(
            "cannot act on behalf of another user".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Handle requests for creating a new group
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<Group>), ServerError> {
    ensure_caller(auth, user_id)?;
    let group = state
        .engine
        .create_group(user_id, &payload.name, payload.tag.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(views::group(group, None))))
}

pub async fn update(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((user_id, group_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<GroupUpdate>,
) -> Result<(StatusCode, Json<Group>), ServerError> {
    ensure_caller(auth, user_id)?;
    let changes = GroupChanges {
        name: payload.name,
        tag: payload.tag,
        total_spent: payload.total_spent,
    };
    let group = state.engine.update_group(group_id, user_id, changes).await?;
    Ok((StatusCode::ACCEPTED, Json(views::group(group, None))))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((user_id, group_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    ensure_caller(auth, user_id)?;
    state.engine.delete_group(group_id, user_id).await?;
    Ok((StatusCode::ACCEPTED, Json(Message::new("group deleted"))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Group>, ServerError> {
    let group = state.engine.group(group_id).await?;
    Ok(Json(views::group(group, None)))
}

/// Groups created by a user, paginated. The total goes in `X-Total-Count`.
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<([(&'static str, String); 1], Json<Vec<Group>>), ServerError> {
    let (groups, total) = state
        .engine
        .user_groups(user_id, views::pagination(&query))
        .await?;
    let body = groups
        .into_iter()
        .map(|entry| views::group(entry.group, entry.creator))
        .collect();
    Ok(([("x-total-count", total.to_string())], Json(body)))
}
