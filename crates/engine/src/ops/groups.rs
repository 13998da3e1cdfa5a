use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Group, GroupWithCreator, ResultEngine, User, groups, invitations, memberships,
    transactions,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, MAX_GROUPS_PER_USER, with_work};

/// Page window for list operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// New values for an existing group. `tag` is overwritten, so `None` clears it.
#[derive(Clone, Debug, Default)]
pub struct GroupChanges {
    pub name: String,
    pub tag: Option<String>,
    /// Left untouched when `None`.
    pub total_spent: Option<i64>,
}

impl Engine {
    /// Create a group owned by `creator_id` and make the creator its first member.
    pub async fn create_group(
        &self,
        creator_id: Uuid,
        name: &str,
        tag: Option<&str>,
    ) -> ResultEngine<Group> {
        let name = normalize_required_name(name, "group")?;
        let tag = normalize_optional_text(tag);

        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, creator_id).await?;

            let owned = groups::Entity::find()
                .filter(groups::Column::CreatedBy.eq(creator_id))
                .filter(groups::Column::DeletedAt.is_null())
                .count(db)
                .await?;
            if owned >= MAX_GROUPS_PER_USER {
                return Err(EngineError::LimitExceeded(
                    "maximum groups already created".to_string(),
                ));
            }

            let now = Utc::now();
            let group = groups::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                tag: ActiveValue::Set(tag),
                total_spent: ActiveValue::Set(0),
                created_by: ActiveValue::Set(creator_id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(None),
            }
            .insert(db)
            .await?;

            self.insert_membership(db, creator_id, group.id).await?;

            tracing::info!(group_id = %group.id, %creator_id, "group created");
            Ok(Group::from(group))
        })
    }

    /// Rename or retag a group. Only its creator may do it.
    pub async fn update_group(
        &self,
        group_id: Uuid,
        requester_id: Uuid,
        changes: GroupChanges,
    ) -> ResultEngine<Group> {
        let name = normalize_required_name(&changes.name, "group")?;
        let tag = normalize_optional_text(changes.tag.as_deref());

        with_work!(self, |work| {
            let db = work.conn()?;
            let group = self.require_group(db, group_id).await?;
            self.require_user(db, group.created_by).await?;
            if group.created_by != requester_id {
                return Err(EngineError::Forbidden(
                    "only admin can update this group".to_string(),
                ));
            }

            let mut active: groups::ActiveModel = group.into();
            active.name = ActiveValue::Set(name);
            active.tag = ActiveValue::Set(tag);
            if let Some(total_spent) = changes.total_spent {
                active.total_spent = ActiveValue::Set(total_spent);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(db).await?;

            Ok(Group::from(updated))
        })
    }

    /// Delete a group together with its memberships, invitations and ledger.
    pub async fn delete_group(&self, group_id: Uuid, requester_id: Uuid) -> ResultEngine<()> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let group = self.require_group(db, group_id).await?;
            if group.created_by != requester_id {
                return Err(EngineError::Forbidden(
                    "only admin can delete this group".to_string(),
                ));
            }

            // Children first so foreign keys hold at every step.
            transactions::Entity::delete_many()
                .filter(transactions::Column::GroupId.eq(group_id))
                .exec(db)
                .await?;
            invitations::Entity::delete_many()
                .filter(invitations::Column::GroupId.eq(group_id))
                .exec(db)
                .await?;
            memberships::Entity::delete_many()
                .filter(memberships::Column::GroupId.eq(group_id))
                .exec(db)
                .await?;
            groups::Entity::delete_by_id(group_id).exec(db).await?;

            tracing::info!(%group_id, "group deleted");
            Ok(())
        })
    }

    /// Return a single group.
    pub async fn group(&self, group_id: Uuid) -> ResultEngine<Group> {
        with_work!(self, |work| {
            let model = self.require_group(work.conn()?, group_id).await?;
            Ok(Group::from(model))
        })
    }

    /// Groups created by `creator_id`, one page at a time, plus the total count.
    pub async fn user_groups(
        &self,
        creator_id: Uuid,
        page: Pagination,
    ) -> ResultEngine<(Vec<GroupWithCreator>, u64)> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, creator_id).await?;

            let query = groups::Entity::find()
                .filter(groups::Column::CreatedBy.eq(creator_id))
                .filter(groups::Column::DeletedAt.is_null());
            let total = query.clone().count(db).await?;

            let rows = query
                .order_by_asc(groups::Column::CreatedAt)
                .order_by_asc(groups::Column::Id)
                .limit(page.limit)
                .offset(page.offset)
                .find_also_related(crate::users::Entity)
                .all(db)
                .await?;

            let groups = rows
                .into_iter()
                .map(|(group, creator)| GroupWithCreator {
                    group: Group::from(group),
                    creator: creator.map(User::from),
                })
                .collect();
            Ok((groups, total))
        })
    }
}
