use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, transactions,
    util::{normalize_optional_text, validate_amount},
};

use super::{Engine, with_work};

impl Engine {
    async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not found".to_string()))
    }

    /// Validate and insert one ledger entry, then refresh both parties.
    async fn record_transaction(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        entry: NewTransaction,
    ) -> ResultEngine<Transaction> {
        validate_amount(entry.amount)?;
        if entry.payer_id == entry.payee_id {
            return Err(EngineError::InvalidInput(
                "payer and payee must be different users".to_string(),
            ));
        }
        self.require_user(db, entry.payer_id).await?;
        self.require_user(db, entry.payee_id).await?;
        self.require_group(db, group_id).await?;
        self.require_membership(db, entry.payer_id, group_id).await?;
        self.require_membership(db, entry.payee_id, group_id).await?;

        let now = Utc::now();
        let model = transactions::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            group_id: ActiveValue::Set(group_id),
            payer_id: ActiveValue::Set(entry.payer_id),
            payee_id: ActiveValue::Set(entry.payee_id),
            amount: ActiveValue::Set(entry.amount),
            description: ActiveValue::Set(normalize_optional_text(entry.description.as_deref())),
            is_paid: ActiveValue::Set(false),
            is_adjusted: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(None),
        }
        .insert(db)
        .await?;

        self.recompute_member_balances(db, model.payer_id, group_id)
            .await?;
        self.recompute_member_balances(db, model.payee_id, group_id)
            .await?;

        tracing::info!(
            transaction_id = %model.id,
            %group_id,
            amount = model.amount,
            "transaction recorded"
        );
        Ok(Transaction::from(model))
    }

    /// Record that `payee_id` owes `payer_id` an amount within a group.
    pub async fn add_transaction(
        &self,
        group_id: Uuid,
        entry: NewTransaction,
    ) -> ResultEngine<Transaction> {
        with_work!(self, |work| {
            self.record_transaction(work.conn()?, group_id, entry).await
        })
    }

    /// Record several entries at once. Either all of them are stored or none.
    pub async fn add_transactions(
        &self,
        group_id: Uuid,
        entries: Vec<NewTransaction>,
    ) -> ResultEngine<Vec<Transaction>> {
        if entries.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one transaction is required".to_string(),
            ));
        }
        with_work!(self, |work| {
            let db = work.conn()?;
            let mut recorded = Vec::with_capacity(entries.len());
            for entry in entries {
                recorded.push(self.record_transaction(db, group_id, entry).await?);
            }
            Ok(recorded)
        })
    }

    /// Settle a transaction. Only its payee may do it.
    pub async fn mark_transaction_paid(
        &self,
        transaction_id: Uuid,
        payee_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let model = self.require_transaction(db, transaction_id).await?;
            if model.payee_id != payee_id {
                return Err(EngineError::Forbidden(
                    "only payee can mark transaction as paid".to_string(),
                ));
            }

            let mut active: transactions::ActiveModel = model.into();
            active.is_paid = ActiveValue::Set(true);
            active.updated_at = ActiveValue::Set(Utc::now());
            let updated = active.update(db).await?;

            self.recompute_member_balances(db, updated.payer_id, updated.group_id)
                .await?;
            self.recompute_member_balances(db, updated.payee_id, updated.group_id)
                .await?;

            tracing::info!(%transaction_id, "transaction marked as paid");
            Ok(Transaction::from(updated))
        })
    }

    /// Soft-delete a transaction. Only its payer may do it.
    ///
    /// Cached member balances are not refreshed here; they catch up on the
    /// next add or mark-paid in the group.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        requester_id: Uuid,
    ) -> ResultEngine<()> {
        with_work!(self, |work| {
            let db = work.conn()?;
            let model = self.require_transaction(db, transaction_id).await?;
            if model.payer_id != requester_id {
                return Err(EngineError::Forbidden(
                    "only payer can delete a transaction".to_string(),
                ));
            }

            let now = Utc::now();
            let mut active: transactions::ActiveModel = model.into();
            active.deleted_at = ActiveValue::Set(Some(now));
            active.updated_at = ActiveValue::Set(now);
            active.update(db).await?;

            tracing::info!(%transaction_id, "transaction deleted");
            Ok(())
        })
    }

    /// Return a transaction that has not been deleted.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_work!(self, |work| {
            let model = self.require_transaction(work.conn()?, transaction_id).await?;
            Ok(Transaction::from(model))
        })
    }
}
