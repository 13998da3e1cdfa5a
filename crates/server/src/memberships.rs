//! Group membership endpoints.

use api_types::{
    Message,
    membership::{MemberNew, Membership},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState, views};

pub async fn add(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<MemberNew>,
) -> Result<(StatusCode, Json<Membership>), ServerError> {
    let membership = state.engine.add_member(payload.user_id, group_id).await?;
    Ok((StatusCode::CREATED, Json(views::membership(membership))))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path((group_id, membership_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    state.engine.remove_member(group_id, membership_id).await?;
    Ok((StatusCode::ACCEPTED, Json(Message::new("user removed from group"))))
}

/// Members of a group, with amounts relative to the caller
pub async fn list_for_group(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<Membership>>, ServerError> {
    let members = state.engine.group_members(group_id, auth.0).await?;
    Ok(Json(members.into_iter().map(views::group_member).collect()))
}

pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Membership>>, ServerError> {
    let memberships = state.engine.user_memberships(user_id).await?;
    Ok(Json(
        memberships
            .into_iter()
            .map(views::user_membership)
            .collect(),
    ))
}
