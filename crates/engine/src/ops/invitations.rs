use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Group, Invitation, InvitationDetails, ResultEngine, User, groups,
    invitations::{self, expiry_from},
    users,
};

use super::{Engine, with_work};

/// Filters for [`Engine::invitations`].
#[derive(Clone, Debug, Default)]
pub struct InvitationFilter {
    /// Only invitations addressed to this user.
    pub user_id: Option<Uuid>,
}

impl Engine {
    /// Invite `invitee_id` to a group. The invitation expires after
    /// [`crate::INVITATION_TTL_DAYS`] days.
    pub async fn invite(
        &self,
        inviter_id: Uuid,
        invitee_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<Invitation> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, inviter_id).await?;
            self.require_user(db, invitee_id).await?;
            self.require_group(db, group_id).await?;

            if self.active_membership(db, invitee_id, group_id).await?.is_some() {
                return Err(EngineError::ExistingKey(
                    "user already exist in group".to_string(),
                ));
            }

            let now = Utc::now();
            let already_invited = invitations::Entity::find()
                .filter(invitations::Column::UserId.eq(invitee_id))
                .filter(invitations::Column::GroupId.eq(group_id))
                .filter(invitations::Column::IsAccepted.is_null())
                .filter(invitations::Column::DeletedAt.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(Invitation::from)
                .any(|invitation| invitation.is_active(now));
            if already_invited {
                return Err(EngineError::ExistingKey("user already invited".to_string()));
            }

            let model = invitations::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(invitee_id),
                invited_by: ActiveValue::Set(inviter_id),
                group_id: ActiveValue::Set(group_id),
                is_accepted: ActiveValue::Set(None),
                expires_on: ActiveValue::Set(expiry_from(now)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(None),
            }
            .insert(db)
            .await?;

            tracing::info!(invitation_id = %model.id, %invitee_id, %group_id, "user invited");
            Ok(Invitation::from(model))
        })
    }

    /// Accept or reject an invitation addressed to `requester_id`.
    ///
    /// An invitation is answered once. Accepting inserts the membership
    /// without checking the member cap, and keeps an existing one as is.
    pub async fn respond_to_invitation(
        &self,
        invitation_id: Uuid,
        accepted: bool,
        requester_id: Uuid,
    ) -> ResultEngine<Invitation> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let model = invitations::Entity::find_by_id(invitation_id)
                .filter(invitations::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("invitation not found".to_string()))?;
            if model.user_id != requester_id {
                return Err(EngineError::Forbidden(
                    "invalid invitation specified".to_string(),
                ));
            }
            if model.is_accepted.is_some() {
                return Err(EngineError::ExistingKey(
                    "invitation already answered".to_string(),
                ));
            }

            let user_id = model.user_id;
            let group_id = model.group_id;
            let mut active: invitations::ActiveModel = model.into();
            active.is_accepted = ActiveValue::Set(Some(accepted));
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(db).await?;

            if accepted && self.active_membership(db, user_id, group_id).await?.is_none() {
                self.insert_membership(db, user_id, group_id).await?;
            }

            tracing::info!(%invitation_id, accepted, "invitation answered");
            Ok(Invitation::from(updated))
        })
    }

    /// Remove an invitation for good.
    pub async fn delete_invitation(&self, invitation_id: Uuid) -> ResultEngine<()> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let result = invitations::Entity::delete_by_id(invitation_id)
                .exec(db)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "invitation not found".to_string(),
                ));
            }
            tracing::info!(%invitation_id, "invitation deleted");
            Ok(())
        })
    }

    /// Invitations with the invitee, the inviter and the group resolved.
    pub async fn invitations(
        &self,
        filter: &InvitationFilter,
    ) -> ResultEngine<Vec<InvitationDetails>> {
        let mut query = invitations::Entity::find()
            .filter(invitations::Column::DeletedAt.is_null())
            .order_by_desc(invitations::Column::CreatedAt);
        if let Some(user_id) = filter.user_id {
            query = query.filter(invitations::Column::UserId.eq(user_id));
        }

        with_work!(self, |work| {
            let db = work.conn()?;
            let models = query.all(db).await?;

            let mut user_ids: Vec<Uuid> = models
                .iter()
                .flat_map(|m| [m.user_id, m.invited_by])
                .collect();
            user_ids.sort_unstable();
            user_ids.dedup();
            let mut group_ids: Vec<Uuid> = models.iter().map(|m| m.group_id).collect();
            group_ids.sort_unstable();
            group_ids.dedup();

            let users: HashMap<Uuid, User> = users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|u| (u.id, User::from(u)))
                .collect();
            let groups: HashMap<Uuid, Group> = groups::Entity::find()
                .filter(groups::Column::Id.is_in(group_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|g| (g.id, Group::from(g)))
                .collect();

            Ok(models
                .into_iter()
                .map(|model| InvitationDetails {
                    user: users.get(&model.user_id).cloned(),
                    invited_by: users.get(&model.invited_by).cloned(),
                    group: groups.get(&model.group_id).cloned(),
                    invitation: Invitation::from(model),
                })
                .collect())
        })
    }

    /// Every invitation sent for a group.
    pub async fn group_invitations(&self, group_id: Uuid) -> ResultEngine<Vec<Invitation>> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_group(db, group_id).await?;
            let models = invitations::Entity::find()
                .filter(invitations::Column::GroupId.eq(group_id))
                .filter(invitations::Column::DeletedAt.is_null())
                .order_by_desc(invitations::Column::CreatedAt)
                .all(db)
                .await?;
            Ok(models.into_iter().map(Invitation::from).collect())
        })
    }
}
