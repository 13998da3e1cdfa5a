//! Unit of work: one database transaction with commit-once semantics.
//!
//! A [`Work`] is created right before the statements of an operation and
//! committed on the success path. Any early return (including `?`) drops the
//! unfinished transaction, which rolls it back.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{EngineError, ResultEngine};

pub struct Work {
    tx: Option<DatabaseTransaction>,
    committed: bool,
}

impl Work {
    /// Starts a unit of work bound to a fresh database transaction.
    pub async fn begin(db: &DatabaseConnection) -> ResultEngine<Self> {
        Ok(Self {
            tx: Some(db.begin().await?),
            committed: false,
        })
    }

    /// The transaction every statement of the unit of work must go through.
    pub fn conn(&self) -> ResultEngine<&DatabaseTransaction> {
        self.tx.as_ref().ok_or(EngineError::WorkFinished)
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Commits the transaction. Calling it again after a commit is a no-op.
    pub async fn commit(&mut self) -> ResultEngine<()> {
        if self.committed {
            return Ok(());
        }
        let tx = self.tx.take().ok_or(EngineError::WorkFinished)?;
        self.committed = true;
        tx.commit().await?;
        Ok(())
    }

    /// Rolls back unless the work was already committed.
    pub async fn rollback(&mut self) -> ResultEngine<()> {
        if self.committed {
            return Ok(());
        }
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

/// Run a block inside a unit of work, committing on success. Errors (and
/// early `?` returns) drop the work, which rolls the transaction back.
macro_rules! with_work {
    ($self:expr, |$work:ident| $body:expr) => {{
        let mut $work = $crate::work::Work::begin(&$self.database).await?;
        let result = $body;
        match result {
            Ok(value) => {
                $work.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_work;

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, Statement};

    use super::*;

    async fn db_with_table() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        db.execute_unprepared("CREATE TABLE notes (body TEXT NOT NULL);")
            .await
            .unwrap();
        db
    }

    async fn insert_note(work: &Work) {
        let db = work.conn().unwrap();
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO notes (body) VALUES (?);",
            vec!["hello".into()],
        ))
        .await
        .unwrap();
    }

    async fn count_notes(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM notes;",
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn commit_twice_is_a_no_op() {
        let db = db_with_table().await;
        let mut work = Work::begin(&db).await.unwrap();
        insert_note(&work).await;

        work.commit().await.unwrap();
        work.commit().await.unwrap();

        assert!(work.is_committed());
        assert_eq!(count_notes(&db).await, 1);
    }

    #[tokio::test]
    async fn rollback_after_commit_keeps_the_data() {
        let db = db_with_table().await;
        let mut work = Work::begin(&db).await.unwrap();
        insert_note(&work).await;
        work.commit().await.unwrap();

        work.rollback().await.unwrap();

        assert_eq!(count_notes(&db).await, 1);
    }

    #[tokio::test]
    async fn rollback_discards_uncommitted_statements() {
        let db = db_with_table().await;
        let mut work = Work::begin(&db).await.unwrap();
        insert_note(&work).await;

        work.rollback().await.unwrap();
        work.rollback().await.unwrap();

        assert!(!work.is_committed());
        assert_eq!(work.conn().err(), Some(EngineError::WorkFinished));
        assert_eq!(count_notes(&db).await, 0);
    }

    #[tokio::test]
    async fn dropping_unfinished_work_rolls_back() {
        let db = db_with_table().await;
        {
            let work = Work::begin(&db).await.unwrap();
            insert_note(&work).await;
        }

        assert_eq!(count_notes(&db).await, 0);
    }
}
