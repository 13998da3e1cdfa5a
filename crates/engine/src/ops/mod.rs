use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod balances;
mod groups;
mod invitations;
mod ledger;
mod memberships;
mod users;

pub use groups::{GroupChanges, Pagination};
pub use invitations::InvitationFilter;
pub use users::UserFilter;

pub(crate) use crate::work::with_work;

/// A user may create at most this many groups.
pub const MAX_GROUPS_PER_USER: u64 = 10;
/// A group holds at most this many active members.
pub const MAX_MEMBERS_PER_GROUP: u64 = 10;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: Option<u32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt cost used when hashing passwords. Defaults to `bcrypt::DEFAULT_COST`.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = Some(cost);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let password_cost = self.password_cost.unwrap_or(bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&password_cost) {
            return Err(EngineError::InvalidInput(format!(
                "invalid bcrypt cost {password_cost}: must be between 4 and 31"
            )));
        }
        Ok(Engine {
            database: self.database,
            password_cost,
        })
    }
}
