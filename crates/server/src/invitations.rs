//! Invitation endpoints.

use api_types::{
    Message,
    invitation::{Invitation, InvitationAnswer, InvitationNew, InvitationQuery},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::InvitationFilter;
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState, views};

/// Invite a user to a group on behalf of the caller
pub async fn invite(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<InvitationNew>,
) -> Result<(StatusCode, Json<Invitation>), ServerError> {
    let invitation = state
        .engine
        .invite(auth.0, payload.user_id, payload.group_id)
        .await?;
    Ok((StatusCode::CREATED, Json(views::invitation(invitation))))
}

/// Accept or reject an invitation addressed to the caller
pub async fn answer(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(invitation_id): Path<Uuid>,
    Json(payload): Json<InvitationAnswer>,
) -> Result<(StatusCode, Json<Invitation>), ServerError> {
    let invitation = state
        .engine
        .respond_to_invitation(invitation_id, payload.is_accepted, auth.0)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(views::invitation(invitation))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(invitation_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    state.engine.delete_invitation(invitation_id).await?;
    Ok((StatusCode::ACCEPTED, Json(Message::new("invitation deleted"))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<InvitationQuery>,
) -> Result<Json<Vec<Invitation>>, ServerError> {
    let filter = InvitationFilter {
        user_id: query.user_id,
    };
    let invitations = state.engine.invitations(&filter).await?;
    Ok(Json(
        invitations
            .into_iter()
            .map(views::invitation_details)
            .collect(),
    ))
}

pub async fn list_for_group(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<Invitation>>, ServerError> {
    let invitations = state.engine.group_invitations(group_id).await?;
    Ok(Json(invitations.into_iter().map(views::invitation).collect()))
}
