use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, groups, memberships, users};

use super::Engine;

impl Engine {
    pub(super) async fn find_active_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find_by_id(user_id)
            .filter(users::Column::DeletedAt.is_null())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        self.find_active_user(db, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }

    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id)
            .filter(groups::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not found".to_string()))
    }

    pub(super) async fn active_membership(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<Option<memberships::Model>> {
        memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(memberships::Column::GroupId.eq(group_id))
            .filter(memberships::Column::DeletedAt.is_null())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_membership(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<memberships::Model> {
        self.active_membership(db, user_id, group_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found in this group".to_string()))
    }

    pub(super) async fn active_member_count(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<u64> {
        memberships::Entity::find()
            .filter(memberships::Column::GroupId.eq(group_id))
            .filter(memberships::Column::DeletedAt.is_null())
            .count(db)
            .await
            .map_err(Into::into)
    }
}
