//! Group invitations (`user_invitations`).

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Group, User};

/// How long an invitation stays open after it was sent.
pub const INVITATION_TTL_DAYS: i64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invitation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invited_by: Uuid,
    pub group_id: Uuid,
    /// `None` until the invitee answers.
    pub is_accepted: Option<bool>,
    pub expires_on: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn status(&self) -> InvitationStatus {
        match self.is_accepted {
            None => InvitationStatus::Pending,
            Some(true) => InvitationStatus::Accepted,
            Some(false) => InvitationStatus::Rejected,
        }
    }

    /// Pending and not expired at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.is_accepted.is_none() && self.expires_on > now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_on <= now
    }
}

/// Expiry of an invitation sent at `sent_at`.
pub(crate) fn expiry_from(sent_at: DateTime<Utc>) -> DateTime<Utc> {
    sent_at + Duration::days(INVITATION_TTL_DAYS)
}

/// Invitation joined with the invitee, the inviter and the group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvitationDetails {
    pub invitation: Invitation,
    pub user: Option<User>,
    pub invited_by: Option<User>,
    pub group: Option<Group>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub invited_by: Uuid,
    pub group_id: Uuid,
    pub is_accepted: Option<bool>,
    pub expires_on: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Invitee,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InvitedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Inviter,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Invitation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            invited_by: model.invited_by,
            group_id: model.group_id,
            is_accepted: model.is_accepted,
            expires_on: model.expires_on,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
