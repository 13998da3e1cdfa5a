//! Group memberships (`user_groups`).
//!
//! Each row caches two aggregates of the outstanding ledger for its user,
//! scoped to the row's group: `incoming_amount` is what the user is owed and
//! `outgoing_amount` is what the user owes. The cache is refreshed after a
//! transaction is added or paid, not after a delete.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Group, User};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub outgoing_amount: i64,
    pub incoming_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outstanding amounts between a user and a counterparty (or the whole group).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    pub user_id: Uuid,
    pub outgoing_amount: i64,
    pub incoming_amount: i64,
}

impl BalanceSummary {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

/// A member row as seen by another member of the same group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMember {
    pub membership: Membership,
    pub user: User,
    /// Pairwise amounts between the requester and this member.
    pub summary: BalanceSummary,
}

/// A membership of the requesting user together with its group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMembership {
    pub membership: Membership,
    pub group: Group,
    pub summary: BalanceSummary,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub outgoing_amount: i64,
    pub incoming_amount: i64,
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
    User,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Membership {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            group_id: model.group_id,
            outgoing_amount: model.outgoing_amount,
            incoming_amount: model.incoming_amount,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
