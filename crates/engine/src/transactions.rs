//! Group ledger (`group_transactions`).
//!
//! A row records that `payee_id` owes `amount` minor units to `payer_id`
//! within one group. Only outstanding rows (not paid, not adjusted, not
//! deleted) count toward balances.

use chrono::{DateTime, Utc};
use sea_orm::{FromQueryResult, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub group_id: Uuid,
    /// The user who fronted the money (creditor).
    pub payer_id: Uuid,
    /// The user who owes the money (debtor).
    pub payee_id: Uuid,
    pub amount: i64,
    pub description: Option<String>,
    pub is_paid: bool,
    pub is_adjusted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_outstanding(&self) -> bool {
        !self.is_paid && !self.is_adjusted
    }
}

/// Input for a single ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: i64,
    pub description: Option<String>,
}

/// Outstanding total a counterparty is owed by the requester.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct NetBalance {
    pub counterparty_id: Uuid,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: i64,
    pub description: Option<String>,
    pub is_paid: bool,
    pub is_adjusted: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PayerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Payer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PayeeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Payee,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            payer_id: model.payer_id,
            payee_id: model.payee_id,
            amount: model.amount,
            description: model.description,
            is_paid: model.is_paid,
            is_adjusted: model.is_adjusted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
