use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    BalanceSummary, EngineError, Group, GroupMember, Membership, ResultEngine, User,
    UserMembership, groups, memberships, users,
};

use super::{Engine, MAX_MEMBERS_PER_GROUP, with_work};

impl Engine {
    /// Insert an active membership with zeroed balances.
    pub(super) async fn insert_membership(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<memberships::Model> {
        let now = Utc::now();
        memberships::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id),
            group_id: ActiveValue::Set(group_id),
            outgoing_amount: ActiveValue::Set(0),
            incoming_amount: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
        }
        .insert(db)
        .await
        .map_err(Into::into)
    }

    /// Add a user to a group, respecting the member cap.
    pub async fn add_member(&self, user_id: Uuid, group_id: Uuid) -> ResultEngine<Membership> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, user_id).await?;
            self.require_group(db, group_id).await?;

            if self.active_membership(db, user_id, group_id).await?.is_some() {
                return Err(EngineError::ExistingKey(
                    "user already exists in specified group".to_string(),
                ));
            }
            if self.active_member_count(db, group_id).await? >= MAX_MEMBERS_PER_GROUP {
                return Err(EngineError::LimitExceeded(
                    "maximum number of people already added".to_string(),
                ));
            }

            let model = self.insert_membership(db, user_id, group_id).await?;
            tracing::info!(%user_id, %group_id, "member added");
            Ok(Membership::from(model))
        })
    }

    /// Soft-delete a membership of `group_id`. Outstanding transactions are
    /// left as they are.
    pub async fn remove_member(&self, group_id: Uuid, membership_id: Uuid) -> ResultEngine<()> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let model = memberships::Entity::find_by_id(membership_id)
                .filter(memberships::Column::GroupId.eq(group_id))
                .filter(memberships::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not found in group".to_string()))?;

            let now = Utc::now();
            let mut active: memberships::ActiveModel = model.into();
            active.deleted_at = ActiveValue::Set(Some(now));
            active.updated_at = ActiveValue::Set(now);
            active.update(db).await?;

            tracing::info!(%membership_id, %group_id, "member removed");
            Ok(())
        })
    }

    /// Return the active membership of a user in a group.
    pub async fn membership(&self, user_id: Uuid, group_id: Uuid) -> ResultEngine<Membership> {
        with_work!(self, |work| {
            let model = self
                .require_membership(work.conn()?, user_id, group_id)
                .await?;
            Ok(Membership::from(model))
        })
    }

    /// Members of a group as seen by `requester_id`: each row carries what
    /// the member owes the requester (`incoming`) and what the requester
    /// owes the member (`outgoing`). The requester's own row has a zero
    /// summary.
    pub async fn group_members(
        &self,
        group_id: Uuid,
        requester_id: Uuid,
    ) -> ResultEngine<Vec<GroupMember>> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_group(db, group_id).await?;

            let rows = memberships::Entity::find()
                .filter(memberships::Column::GroupId.eq(group_id))
                .filter(memberships::Column::DeletedAt.is_null())
                .order_by_asc(memberships::Column::CreatedAt)
                .find_also_related(users::Entity)
                .all(db)
                .await?;

            let mut members = Vec::with_capacity(rows.len());
            for (membership, user) in rows {
                let Some(user) = user else {
                    continue;
                };
                let summary = if membership.user_id == requester_id {
                    BalanceSummary::empty(membership.user_id)
                } else {
                    BalanceSummary {
                        user_id: membership.user_id,
                        incoming_amount: self
                            .outstanding_between(db, group_id, requester_id, membership.user_id)
                            .await?,
                        outgoing_amount: self
                            .outstanding_between(db, group_id, membership.user_id, requester_id)
                            .await?,
                    }
                };
                members.push(GroupMember {
                    membership: Membership::from(membership),
                    user: User::from(user),
                    summary,
                });
            }
            Ok(members)
        })
    }

    /// Every group `user_id` belongs to, with the user's outstanding totals
    /// in that group.
    pub async fn user_memberships(&self, user_id: Uuid) -> ResultEngine<Vec<UserMembership>> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, user_id).await?;

            let rows = memberships::Entity::find()
                .filter(memberships::Column::UserId.eq(user_id))
                .filter(memberships::Column::DeletedAt.is_null())
                .order_by_asc(memberships::Column::CreatedAt)
                .find_also_related(groups::Entity)
                .all(db)
                .await?;

            let mut result = Vec::with_capacity(rows.len());
            for (membership, group) in rows {
                let Some(group) = group.filter(|g| g.deleted_at.is_none()) else {
                    continue;
                };
                let summary = BalanceSummary {
                    user_id,
                    outgoing_amount: self.outstanding_as_payer(db, group.id, user_id).await?,
                    incoming_amount: self.outstanding_as_payee(db, group.id, user_id).await?,
                };
                result.push(UserMembership {
                    membership: Membership::from(membership),
                    group: Group::from(group),
                    summary,
                });
            }
            Ok(result)
        })
    }
}
