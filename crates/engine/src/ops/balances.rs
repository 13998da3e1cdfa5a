use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, Statement, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{BalanceSummary, NetBalance, ResultEngine, memberships, transactions};

use super::{Engine, with_work};

/// Rows that still count toward balances.
const OUTSTANDING: &str = "is_paid = 0 AND is_adjusted = 0 AND deleted_at IS NULL";

impl Engine {
    async fn outstanding_sum(
        &self,
        db: &DatabaseTransaction,
        filter: &str,
        values: Vec<sea_orm::Value>,
    ) -> ResultEngine<i64> {
        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            format!(
                "SELECT COALESCE(SUM(amount), 0) AS sum FROM group_transactions WHERE {filter} AND {OUTSTANDING};"
            ),
            values,
        );
        let row = db.query_one(stmt).await?;
        Ok(row
            .map(|r| r.try_get::<i64>("", "sum"))
            .transpose()?
            .unwrap_or(0))
    }

    /// Outstanding amount `payee_id` owes `payer_id` in a group.
    pub(super) async fn outstanding_between(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        payer_id: Uuid,
        payee_id: Uuid,
    ) -> ResultEngine<i64> {
        self.outstanding_sum(
            db,
            "group_id = ? AND payer_id = ? AND payee_id = ?",
            vec![group_id.into(), payer_id.into(), payee_id.into()],
        )
        .await
    }

    /// Outstanding amount the group owes `user_id` (rows where they paid).
    pub(super) async fn outstanding_as_payer(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<i64> {
        self.outstanding_sum(
            db,
            "group_id = ? AND payer_id = ?",
            vec![group_id.into(), user_id.into()],
        )
        .await
    }

    /// Outstanding amount `user_id` owes the group (rows where they are payee).
    pub(super) async fn outstanding_as_payee(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<i64> {
        self.outstanding_sum(
            db,
            "group_id = ? AND payee_id = ?",
            vec![group_id.into(), user_id.into()],
        )
        .await
    }

    /// Overwrite the cached aggregates of `user_id` in `group_id` from the
    /// ledger.
    pub(super) async fn recompute_member_balances(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<BalanceSummary> {
        let summary = BalanceSummary {
            user_id,
            incoming_amount: self.outstanding_as_payer(db, group_id, user_id).await?,
            outgoing_amount: self.outstanding_as_payee(db, group_id, user_id).await?,
        };

        memberships::Entity::update_many()
            .col_expr(
                memberships::Column::IncomingAmount,
                Expr::value(summary.incoming_amount),
            )
            .col_expr(
                memberships::Column::OutgoingAmount,
                Expr::value(summary.outgoing_amount),
            )
            .col_expr(memberships::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(memberships::Column::GroupId.eq(group_id))
            .filter(memberships::Column::DeletedAt.is_null())
            .exec(db)
            .await?;

        tracing::debug!(
            %user_id,
            %group_id,
            incoming = summary.incoming_amount,
            outgoing = summary.outgoing_amount,
            "member balances recomputed"
        );
        Ok(summary)
    }

    /// Recompute and store the aggregates of one member.
    pub async fn recompute_balances(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<BalanceSummary> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_membership(db, user_id, group_id).await?;
            self.recompute_member_balances(db, user_id, group_id).await
        })
    }

    /// What each counterparty owes `requester_id` in a group, smallest first.
    pub async fn net_balances(
        &self,
        requester_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<Vec<NetBalance>> {
        with_work!(self, |work| {
            let db = work.conn()?;
            self.require_user(db, requester_id).await?;
            self.require_group(db, group_id).await?;

            let balances = transactions::Entity::find()
                .select_only()
                .column_as(transactions::Column::PayerId, "counterparty_id")
                .column_as(Expr::col(transactions::Column::Amount).sum(), "amount")
                .filter(transactions::Column::GroupId.eq(group_id))
                .filter(transactions::Column::PayeeId.eq(requester_id))
                .filter(transactions::Column::IsPaid.eq(false))
                .filter(transactions::Column::IsAdjusted.eq(false))
                .filter(transactions::Column::DeletedAt.is_null())
                .group_by(transactions::Column::PayerId)
                .order_by_asc(Expr::col(transactions::Column::Amount).sum())
                .into_model::<NetBalance>()
                .all(db)
                .await?;
            Ok(balances)
        })
    }
}
